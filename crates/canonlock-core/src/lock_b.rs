use std::path::{Path, PathBuf};

use canonlock_blocks::{Payload, UnitValidator};
use canonlock_canonical::Digest;
use serde::Serialize;

use crate::failure::{LockFailure, Verdict};

/// Result of Lock B for one unit file.
#[derive(Debug, Clone, Serialize)]
pub struct UnitOutcome {
    /// Unit file path.
    pub unit: PathBuf,
    /// Payload fingerprint, on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<Digest>,
    /// Validated payload, on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
    /// Why the unit failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<LockFailure>,
}

impl UnitOutcome {
    /// `Pass` when the unit validated.
    pub fn verdict(&self) -> Verdict {
        if self.failure.is_none() {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }
}

/// Result of Lock B over a batch of units.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LockBOutcome {
    /// One entry per unit, in input order.
    pub units: Vec<UnitOutcome>,
}

impl LockBOutcome {
    /// `Pass` when every unit validated; an empty batch passes.
    pub fn verdict(&self) -> Verdict {
        if self.units.iter().all(|u| u.failure.is_none()) {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }

    /// Failures across all units, in input order.
    pub fn failures(&self) -> impl Iterator<Item = &LockFailure> {
        self.units.iter().filter_map(|u| u.failure.as_ref())
    }
}

/// Validates a single unit file.
pub fn check_unit(validator: &UnitValidator, unit: &Path) -> UnitOutcome {
    match validator.validate_file(unit) {
        Ok(validated) => {
            tracing::info!(unit = %unit.display(), digest = %validated.digest, "unit conforms");
            UnitOutcome {
                unit: unit.to_path_buf(),
                digest: Some(validated.digest),
                payload: Some(validated.payload),
                failure: None,
            }
        }
        Err(err) => {
            let failure = LockFailure::from_unit(unit, err);
            tracing::warn!(kind = ?failure.kind, unit = %unit.display(), "{}", failure.message);
            UnitOutcome {
                unit: unit.to_path_buf(),
                digest: None,
                payload: None,
                failure: Some(failure),
            }
        }
    }
}

/// Validates every unit; one unit failing never stops the others.
pub(crate) fn run<P: AsRef<Path>>(validator: &UnitValidator, units: &[P]) -> LockBOutcome {
    let units: Vec<UnitOutcome> = units
        .iter()
        .map(|unit| check_unit(validator, unit.as_ref()))
        .collect();
    let outcome = LockBOutcome { units };
    tracing::info!(units = outcome.units.len(), verdict = %outcome.verdict(), "lock B complete");
    outcome
}
