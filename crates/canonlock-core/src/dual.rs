use std::path::PathBuf;

use canonlock_attest::AttestConfig;
use canonlock_blocks::UnitValidator;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::failure::{LockFailure, Verdict};
use crate::lock_a::{self, LockAOutcome};
use crate::lock_b::{self, LockBOutcome};

/// Inputs for one dual-lock run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DualLockPlan {
    /// Canon document carrying `metadata.integrity.sha256`.
    pub canon_document: PathBuf,
    /// Lock file to attest.
    pub lock_file: PathBuf,
    /// Unit files holding LAW/LORE blocks.
    pub units: Vec<PathBuf>,
}

/// Combined verdict of both locks.
#[derive(Debug, Clone, Serialize)]
pub struct DualLockReport {
    /// `PASS` only if both locks pass.
    pub verdict: Verdict,
    /// Lock A outcome.
    pub lock_a: LockAOutcome,
    /// Lock B outcome.
    pub lock_b: LockBOutcome,
}

impl DualLockReport {
    /// `true` when both locks passed.
    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }

    /// Every failure from both locks, Lock A first.
    pub fn failures(&self) -> Vec<&LockFailure> {
        self.lock_a
            .failures
            .iter()
            .chain(self.lock_b.failures())
            .collect()
    }
}

/// Runs Lock A and Lock B with fixed configuration.
///
/// The orchestrator keeps no state between runs; it can be shared across
/// threads and reused for any number of plans.
#[derive(Debug, Clone)]
pub struct DualLock {
    attest: AttestConfig,
    validator: UnitValidator,
}

impl DualLock {
    /// Creates an orchestrator from attestation and validation settings.
    pub fn new(attest: AttestConfig, validator: UnitValidator) -> Self {
        Self { attest, validator }
    }

    /// Attestation settings used for Lock A.
    pub fn attest_config(&self) -> &AttestConfig {
        &self.attest
    }

    /// Validator used for Lock B.
    pub fn validator(&self) -> &UnitValidator {
        &self.validator
    }

    /// Runs both locks now.
    pub fn run(&self, plan: &DualLockPlan) -> DualLockReport {
        self.run_at(plan, Utc::now())
    }

    /// Runs both locks, stamping the receipt with `now`.
    ///
    /// Both locks always run to completion; a failure in one never hides
    /// the other's result.
    pub fn run_at(&self, plan: &DualLockPlan, now: DateTime<Utc>) -> DualLockReport {
        let lock_a = lock_a::run(&plan.canon_document, &plan.lock_file, &self.attest, now);
        let lock_b = lock_b::run(&self.validator, &plan.units);

        let verdict = match (lock_a.verdict(), lock_b.verdict()) {
            (Verdict::Pass, Verdict::Pass) => Verdict::Pass,
            _ => Verdict::Fail,
        };
        tracing::info!(
            lock_a = %lock_a.verdict(),
            lock_b = %lock_b.verdict(),
            verdict = %verdict,
            "dual lock complete"
        );

        DualLockReport {
            verdict,
            lock_a,
            lock_b,
        }
    }
}
