use std::fmt;
use std::path::PathBuf;

use canonlock_attest::AttestError;
use canonlock_blocks::{UnitError, Violation};
use serde::Serialize;

/// Which of the two locks raised a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LockId {
    /// Canonical integrity and lock-file attestation.
    A,
    /// LAW/LORE structural conformance.
    B,
}

impl fmt::Display for LockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockId::A => f.write_str("Lock A"),
            LockId::B => f.write_str("Lock B"),
        }
    }
}

/// Pass/fail verdict for one lock or a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    /// Every check succeeded.
    Pass,
    /// At least one check failed.
    Fail,
}

impl Verdict {
    /// `Pass` when `failures` is empty.
    pub fn from_failures(failures: &[LockFailure]) -> Self {
        if failures.is_empty() {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => f.write_str("PASS"),
            Verdict::Fail => f.write_str("FAIL"),
        }
    }
}

/// Stable failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// An input path does not exist.
    NotFound,
    /// The embedded hash differs from the canonical digest.
    IntegrityMismatch,
    /// No `metadata.integrity.sha256` field in the canon document.
    MissingIntegrityHash,
    /// LAW or LORE block absent.
    MissingBlock,
    /// LAW or LORE block undecodable.
    MalformedBlock,
    /// Payload does not conform to the schema.
    SchemaViolation,
    /// Any other read, write, or serialization failure.
    Io,
}

/// One failure, attributed to a lock and a subject file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockFailure {
    /// Lock that raised the failure.
    pub lock: LockId,
    /// File the failure concerns.
    pub subject: PathBuf,
    /// Failure category.
    pub kind: FailureKind,
    /// Human-readable detail.
    pub message: String,
    /// Schema violations, for [`FailureKind::SchemaViolation`].
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
}

impl LockFailure {
    pub(crate) fn new(
        lock: LockId,
        subject: impl Into<PathBuf>,
        kind: FailureKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            lock,
            subject: subject.into(),
            kind,
            message: message.into(),
            violations: Vec::new(),
        }
    }

    pub(crate) fn from_attest(subject: impl Into<PathBuf>, err: &AttestError) -> Self {
        let kind = match err {
            AttestError::NotFound(_) => FailureKind::NotFound,
            AttestError::Io { .. } => FailureKind::Io,
        };
        Self::new(LockId::A, subject, kind, err.to_string())
    }

    pub(crate) fn from_unit(subject: impl Into<PathBuf>, err: UnitError) -> Self {
        let kind = match &err {
            UnitError::NotFound(_) => FailureKind::NotFound,
            UnitError::Io { .. } | UnitError::Canonicalization(_) => FailureKind::Io,
            UnitError::MissingBlock { .. } => FailureKind::MissingBlock,
            UnitError::MalformedBlock { .. } => FailureKind::MalformedBlock,
            UnitError::SchemaViolation { .. } => FailureKind::SchemaViolation,
        };
        let message = err.to_string();
        let violations = match err {
            UnitError::SchemaViolation { violations } => violations,
            _ => Vec::new(),
        };
        Self {
            violations,
            ..Self::new(LockId::B, subject, kind, message)
        }
    }
}

impl fmt::Display for LockFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.lock, self.subject.display(), self.message)
    }
}
