//! Dual-lock verification for canon corpora.
//!
//! This crate composes the two independent guarantees:
//! - Lock A: the canon document's canonical digest matches the hash
//!   embedded in its `metadata.integrity` block, and the lock file is
//!   attested into a timestamped receipt
//! - Lock B: every unit's LAW/LORE blocks build a payload that conforms to
//!   the payload schema
//!
//! Neither lock short-circuits the other. A run reports the union of all
//! failures, each attributed to the lock that raised it, and a unit that
//! fails never stops the rest of the batch.
//!
#![deny(missing_docs)]

/// Failures attributed to a lock.
pub mod failure;
/// Lock A: canonical integrity and lock-file attestation.
pub mod lock_a;
/// Lock B: per-unit structural conformance.
pub mod lock_b;
/// The orchestrator and its combined report.
pub mod dual;

pub use dual::{DualLock, DualLockPlan, DualLockReport};
pub use failure::{FailureKind, LockFailure, LockId, Verdict};
pub use lock_a::LockAOutcome;
pub use lock_b::{check_unit, LockBOutcome, UnitOutcome};
