//! Input loading: read a DBC file into a `String`.
//!
//! DBC exports are not reliably UTF-8. Files written by Windows tooling
//! often carry Windows-1252 bytes in comments and units, so anything that
//! fails UTF-8 validation is re-decoded byte-for-byte as Latin-1, which
//! accepts every byte value.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{CandbError, CandbResult};

/// Read `path` and decode it to text.
///
/// Valid UTF-8 is used as-is, minus a leading byte-order mark; anything
/// else falls back to Latin-1.
pub fn load(path: &Path) -> CandbResult<String> {
    let bytes = fs::read(path).map_err(|source| CandbError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            debug!(path = %path.display(), "input is not UTF-8, decoding as Latin-1");
            err.as_bytes().iter().map(|&b| b as char).collect()
        }
    };

    // A BOM would stop the first statement from anchoring at column 0.
    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_owned(),
        None => text,
    })
}
