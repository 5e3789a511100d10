pub mod attest;
pub mod dual;
pub mod hash;
pub mod seal;
pub mod validate;
pub mod verify;

use std::fs;
use std::path::Path;

use crate::errors::CliError;

/// Reads a text input, replacing invalid UTF-8.
pub(crate) fn read_text(path: &Path) -> Result<String, CliError> {
    let bytes = fs::read(path).map_err(|e| CliError::io(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
