use std::fmt::Write as _;
use std::path::PathBuf;

use canonlock_canonical::{Digest, Timestamp};
use serde::Serialize;

use crate::partitions::PartitionCounts;

/// Timestamped record of a lock file's digest, size, and partition counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttestationReceipt {
    /// When the attestation ran.
    pub timestamp: Timestamp,
    /// Lock file path as supplied by the caller.
    pub source_path: PathBuf,
    /// SHA-256 over the raw file bytes.
    pub sha256: Digest,
    /// File size in bytes.
    pub byte_size: u64,
    /// Entry counts per configured partition.
    pub partition_counts: PartitionCounts,
}

impl AttestationReceipt {
    /// Renders the line-oriented receipt format.
    ///
    /// ```text
    /// canon.attest.ts: 2025-10-31T08:05:09Z
    /// canon.path: lexicon/canon.lock.yaml
    /// canon.sha256: 9f86d0…
    /// canon.bytes: 1024
    /// partitions:
    ///   schools: 20
    /// ```
    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(out, "canon.attest.ts: {}", self.timestamp);
        let _ = writeln!(out, "canon.path: {}", self.source_path.display());
        let _ = writeln!(out, "canon.sha256: {}", self.sha256);
        let _ = writeln!(out, "canon.bytes: {}", self.byte_size);
        out.push_str("partitions:\n");
        for entry in &self.partition_counts.entries {
            let _ = writeln!(out, "  {}: {}", entry.name, entry.count);
        }
        out
    }
}
