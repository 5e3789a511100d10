use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use canonlock_canonical::{Digest, Timestamp};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::AttestError;
use crate::partitions::{count_partitions, PartitionSet};
use crate::receipt::AttestationReceipt;
use crate::writer::ReceiptWriter;

/// Options for attestation.
#[derive(Debug, Clone, Default)]
pub struct AttestConfig {
    /// Partitions counted into the receipt.
    pub partitions: PartitionSet,
    /// Receipt directory (default: `<lockfile-dir>/receipts`).
    pub receipts_dir: Option<PathBuf>,
}

impl AttestConfig {
    fn writer_for(&self, source: &Path) -> ReceiptWriter {
        match &self.receipts_dir {
            Some(dir) => ReceiptWriter::new(dir.clone()),
            None => ReceiptWriter::beside(source),
        }
    }
}

/// A written receipt and where it was written.
#[derive(Debug, Clone, Serialize)]
pub struct Attestation {
    /// Receipt contents.
    pub receipt: AttestationReceipt,
    /// Path of the receipt file.
    pub receipt_path: PathBuf,
}

/// Builds a receipt for `path` without writing it.
///
/// # Errors
///
/// Returns [`AttestError::NotFound`] if `path` does not exist.
pub fn inspect(
    path: impl AsRef<Path>,
    config: &AttestConfig,
    now: DateTime<Utc>,
) -> Result<AttestationReceipt, AttestError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => AttestError::NotFound(path.to_path_buf()),
        _ => AttestError::io(path, e),
    })?;

    let text = String::from_utf8_lossy(&bytes);
    let partition_counts = count_partitions(&text, &config.partitions);

    Ok(AttestationReceipt {
        timestamp: Timestamp::from_datetime(now),
        source_path: path.to_path_buf(),
        sha256: Digest::sha256(&bytes),
        byte_size: bytes.len() as u64,
        partition_counts,
    })
}

/// Attests `path` at `now` and persists the receipt.
pub fn attest_at(
    path: impl AsRef<Path>,
    config: &AttestConfig,
    now: DateTime<Utc>,
) -> Result<Attestation, AttestError> {
    let path = path.as_ref();
    let receipt = inspect(path, config, now)?;
    let receipt_path = config.writer_for(path).write(&receipt)?;
    tracing::info!(
        source = %path.display(),
        sha256 = %receipt.sha256,
        bytes = receipt.byte_size,
        receipt = %receipt_path.display(),
        "wrote attestation receipt"
    );
    Ok(Attestation {
        receipt,
        receipt_path,
    })
}

/// Attests `path` now and persists the receipt.
///
/// # Errors
///
/// Returns [`AttestError::NotFound`] if `path` does not exist, or
/// [`AttestError::Io`] if the file cannot be read or the receipt written.
pub fn attest(path: impl AsRef<Path>, config: &AttestConfig) -> Result<Attestation, AttestError> {
    attest_at(path, config, Utc::now())
}
