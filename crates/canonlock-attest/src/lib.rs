//! Attestation receipts for canon lock files.
//!
//! This crate provides:
//! - SHA-256 and byte size over the raw lock-file bytes
//! - Partition entry counts, from a structured YAML parse or a textual fallback
//! - Plain-text receipts written under collision-free, timestamped filenames
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use canonlock_attest::{attest, AttestConfig};
//!
//! let attestation = attest("canon.lock.yaml", &AttestConfig::default())?;
//! print!("{}", attestation.receipt.render());
//! println!("wrote: {}", attestation.receipt_path.display());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]

/// Attestation entry points and configuration.
pub mod attestor;
/// Error types for attestation.
pub mod errors;
/// Partition configuration and counting.
pub mod partitions;
/// Receipt structure and text rendering.
pub mod receipt;
/// Append-only receipt writer.
pub mod writer;

pub use attestor::{attest, attest_at, inspect, AttestConfig, Attestation};
pub use errors::AttestError;
pub use partitions::{count_partitions, CountMethod, PartitionCount, PartitionCounts, PartitionSet};
pub use receipt::AttestationReceipt;
pub use writer::ReceiptWriter;
