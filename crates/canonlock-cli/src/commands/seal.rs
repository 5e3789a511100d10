//! Seal command implementation.

use std::fs;
use std::path::PathBuf;

use canonlock_canonical::{seal, IntegrityError};

use crate::commands::read_text;
use crate::errors::CliError;
use crate::exit::ExitStatus;

pub fn run(document: PathBuf) -> Result<ExitStatus, Box<dyn std::error::Error>> {
    let text = read_text(&document)?;
    let sealed = match seal(&text) {
        Ok(sealed) => sealed,
        Err(e @ IntegrityError::HashFieldMissing) => {
            eprintln!("Error: {}: {}", document.display(), e);
            return Ok(ExitStatus::Failure);
        }
    };

    if sealed.text == text {
        println!("unchanged: {}", document.display());
    } else {
        fs::write(&document, sealed.text.as_bytes()).map_err(|e| CliError::io(&document, e))?;
        tracing::info!(document = %document.display(), sha256 = %sealed.digest, "sealed document");
        println!("sealed: {}", document.display());
    }
    println!("sha256: {}", sealed.digest);
    Ok(ExitStatus::Pass)
}
