use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use canonlock_attest::{attest_at, AttestConfig, Attestation};
use canonlock_canonical::{verify_integrity, Digest};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::failure::{FailureKind, LockFailure, LockId, Verdict};

/// Result of Lock A for one canon document and its lock file.
#[derive(Debug, Clone, Serialize)]
pub struct LockAOutcome {
    /// Canon document whose canonical digest was checked.
    pub canon_document: PathBuf,
    /// Lock file that was attested.
    pub lock_file: PathBuf,
    /// Canonical digest, when the document could be read.
    pub canonical_digest: Option<Digest>,
    /// Value embedded under `metadata.integrity.sha256`, if any.
    pub claimed: Option<String>,
    /// Receipt written for the lock file.
    pub attestation: Option<Attestation>,
    /// Everything that went wrong.
    pub failures: Vec<LockFailure>,
}

impl LockAOutcome {
    /// `Pass` when no failures were recorded.
    pub fn verdict(&self) -> Verdict {
        Verdict::from_failures(&self.failures)
    }
}

/// Checks the canon document's embedded hash, then attests the lock file.
///
/// The lock file is attested even when the canon document fails, since the
/// receipt records the lock file's own bytes.
pub(crate) fn run(
    canon_document: &Path,
    lock_file: &Path,
    config: &AttestConfig,
    now: DateTime<Utc>,
) -> LockAOutcome {
    let mut outcome = LockAOutcome {
        canon_document: canon_document.to_path_buf(),
        lock_file: lock_file.to_path_buf(),
        canonical_digest: None,
        claimed: None,
        attestation: None,
        failures: Vec::new(),
    };

    match fs::read(canon_document) {
        Ok(bytes) => {
            let check = verify_integrity(&String::from_utf8_lossy(&bytes));
            match check.claimed.as_deref() {
                None => outcome.failures.push(LockFailure::new(
                    LockId::A,
                    canon_document,
                    FailureKind::MissingIntegrityHash,
                    format!(
                        "metadata.integrity.sha256 not found; canonical digest is {}",
                        check.computed
                    ),
                )),
                Some(claimed) if !check.matches() => outcome.failures.push(LockFailure::new(
                    LockId::A,
                    canon_document,
                    FailureKind::IntegrityMismatch,
                    format!("claimed {} but computed {}", claimed, check.computed),
                )),
                Some(_) => {}
            }
            outcome.claimed = check.claimed;
            outcome.canonical_digest = Some(check.computed);
        }
        Err(e) => {
            let kind = match e.kind() {
                io::ErrorKind::NotFound => FailureKind::NotFound,
                _ => FailureKind::Io,
            };
            outcome.failures.push(LockFailure::new(
                LockId::A,
                canon_document,
                kind,
                format!("failed to read {}: {}", canon_document.display(), e),
            ));
        }
    }

    match attest_at(lock_file, config, now) {
        Ok(attestation) => outcome.attestation = Some(attestation),
        Err(err) => outcome
            .failures
            .push(LockFailure::from_attest(lock_file, &err)),
    }

    for failure in &outcome.failures {
        tracing::warn!(kind = ?failure.kind, subject = %failure.subject.display(), "{}", failure.message);
    }
    tracing::info!(
        canon = %canon_document.display(),
        verdict = %outcome.verdict(),
        "lock A complete"
    );
    outcome
}
