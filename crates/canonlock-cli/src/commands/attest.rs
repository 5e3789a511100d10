//! Attest command implementation.

use std::path::PathBuf;

use canonlock_attest::attest;

use crate::config::AttestArgs;
use crate::errors::CliError;
use crate::exit::ExitStatus;
use crate::output::format_json;

pub fn run(
    lock_file: PathBuf,
    options: AttestArgs,
    json_output: bool,
) -> Result<ExitStatus, Box<dyn std::error::Error>> {
    let config = options.to_config()?;
    let attestation = attest(&lock_file, &config).map_err(CliError::from)?;

    if json_output {
        println!("{}", format_json(&attestation));
    } else {
        print!("{}", attestation.receipt.render());
        println!("receipt: {}", attestation.receipt_path.display());
    }
    Ok(ExitStatus::Pass)
}
