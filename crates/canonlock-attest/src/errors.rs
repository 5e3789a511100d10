use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while attesting a lock file.
#[derive(Error, Debug)]
pub enum AttestError {
    /// The lock file does not exist.
    #[error("{} not found", .0.display())]
    NotFound(PathBuf),
    /// I/O error while reading the source or writing a receipt.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl AttestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AttestError::Io {
            path: path.into(),
            source,
        }
    }
}
