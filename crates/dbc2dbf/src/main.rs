//! dbc2dbf — convert a Vector DBC database into BUSMASTER DBF files.
//!
//! Reads one DBC file and writes two DBF files at the requested output
//! stem: one for J1939-framed messages, one for classic CAN.

use std::path::Path;

use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "dbc2dbf starting");

    let mut args = std::env::args().skip(1);
    let (Some(dbc_path), Some(dbf_stem), None) = (args.next(), args.next(), args.next()) else {
        eprintln!("Usage: dbc2dbf <path_to_dbc_file> <path_to_dbf_file>");
        std::process::exit(2);
    };

    let text = candb::loader::load(Path::new(&dbc_path))?;
    let db = candb::dbc::parse(&text)?;
    tracing::info!(
        messages = db.messages.len(),
        protocol_type = %db.protocol_type,
        "database parsed"
    );

    let files = candb::dbf::encode(&db.messages, &dbf_stem)?;
    tracing::info!(
        j1939 = %files.j1939.display(),
        can = %files.can.display(),
        "conversion complete"
    );

    Ok(())
}
