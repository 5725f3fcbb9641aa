//! CAN database conversion: parse Vector DBC text and emit BUSMASTER DBF
//! files.
//!
//! [`convert`] is the whole pipeline in one call; the pieces are exposed
//! individually for callers that want the parsed [`Database`]:
//!
//! ```no_run
//! # fn run() -> candb::CandbResult<()> {
//! let text = candb::loader::load(std::path::Path::new("powertrain.dbc"))?;
//! let db = candb::dbc::parse(&text)?;
//! let files = candb::dbf::encode(&db.messages, "powertrain.dbf")?;
//! println!("wrote {} and {}", files.j1939.display(), files.can.display());
//! # Ok(())
//! # }
//! ```

pub mod dbc;
pub mod dbf;
pub mod error;
pub mod loader;
pub mod types;

pub use error::{CandbError, CandbResult};
pub use types::{AttributeMap, Database, Message, Signal, ValueTable, ValueType};

use std::path::Path;

/// Convert a DBC file into the J1939 and CAN DBF files for `dbf_stem`.
pub fn convert(dbc_path: impl AsRef<Path>, dbf_stem: &str) -> CandbResult<dbf::DbfFiles> {
    let text = loader::load(dbc_path.as_ref())?;
    let db = dbc::parse(&text)?;
    dbf::encode(&db.messages, dbf_stem)
}
