use std::io;
use std::path::PathBuf;

use canonlock_attest::AttestError;
use canonlock_blocks::SchemaError;
use thiserror::Error;

use crate::exit::ExitStatus;

/// Errors surfaced to the user before or outside of a lock verdict.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{} not found", .0.display())]
    NotFound(PathBuf),
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Attest(#[from] AttestError),
}

impl CliError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => CliError::NotFound(path),
            _ => CliError::Io { path, source },
        }
    }

    pub fn exit_status(&self) -> ExitStatus {
        match self {
            CliError::NotFound(_)
            | CliError::Schema(SchemaError::NotFound(_))
            | CliError::Attest(AttestError::NotFound(_)) => ExitStatus::NotFound,
            _ => ExitStatus::Failure,
        }
    }
}
