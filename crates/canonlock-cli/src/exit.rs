//! Stable process exit codes.
//!
//! | code | meaning |
//! |------|---------|
//! | 0 | pass |
//! | 1 | integrity failure or unexpected error |
//! | 2 | input not found |
//! | 3 | schema validation failed |
//! | 4 | missing LAW/LORE block(s) |
//! | 5 | malformed LAW/LORE block |
//!
//! A run with several failures exits with the most severe one; variants are
//! declared from least to most severe so `max` picks it.

use canonlock_core::FailureKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ExitStatus {
    Pass,
    Failure,
    SchemaViolation,
    MissingBlock,
    MalformedBlock,
    NotFound,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Pass => 0,
            ExitStatus::Failure => 1,
            ExitStatus::NotFound => 2,
            ExitStatus::SchemaViolation => 3,
            ExitStatus::MissingBlock => 4,
            ExitStatus::MalformedBlock => 5,
        }
    }

    pub fn from_failure(kind: FailureKind) -> Self {
        match kind {
            FailureKind::NotFound => ExitStatus::NotFound,
            FailureKind::MalformedBlock => ExitStatus::MalformedBlock,
            FailureKind::MissingBlock => ExitStatus::MissingBlock,
            FailureKind::SchemaViolation => ExitStatus::SchemaViolation,
            FailureKind::IntegrityMismatch | FailureKind::MissingIntegrityHash | FailureKind::Io => {
                ExitStatus::Failure
            }
        }
    }

    /// Most severe status among `kinds`, or `Pass` when there are none.
    pub fn worst(kinds: impl IntoIterator<Item = FailureKind>) -> Self {
        kinds
            .into_iter()
            .map(Self::from_failure)
            .max()
            .unwrap_or(ExitStatus::Pass)
    }
}
