use canonlock_attest::AttestConfig;
use canonlock_blocks::{PayloadSchema, UnitValidator};
use canonlock_canonical::{seal, Digest};
use canonlock_core::{DualLock, DualLockPlan, FailureKind, LockId, Verdict};
use chrono::{TimeZone, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CANON: &str = "\
title: Canon
metadata:
  integrity:
    sha256: \"0000\"
  author: X
schools:
  - cantrips
";

const LOCK: &str = "schools:\n  - cantrips\nfoundations:\n  - core\n";

const UNIT: &str = "\
# Invocations

```json LAW
{\"axioms\": [\"A\"]}
```

```yaml LORE
archetype: X
```
";

fn make_dual_lock() -> DualLock {
    DualLock::new(
        AttestConfig::default(),
        UnitValidator::new(PayloadSchema::builtin().unwrap()),
    )
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn make_plan(dir: &TempDir, canon: &str, units: &[(&str, &str)]) -> DualLockPlan {
    DualLockPlan {
        canon_document: write(dir.path(), "canon.yaml", canon),
        lock_file: write(dir.path(), "canon.lock.yaml", LOCK),
        units: units
            .iter()
            .map(|(name, text)| write(dir.path(), name, text))
            .collect(),
    }
}

fn sealed_canon() -> String {
    seal(CANON).unwrap().text
}

#[test]
fn test_sealed_canon_and_valid_units_pass() {
    let temp_dir = TempDir::new().unwrap();
    let plan = make_plan(&temp_dir, &sealed_canon(), &[("02_invocations.md", UNIT)]);

    let at = Utc.with_ymd_and_hms(2025, 10, 31, 8, 5, 9).unwrap();
    let report = make_dual_lock().run_at(&plan, at);

    assert!(report.passed(), "failures: {:?}", report.failures());
    assert!(report.failures().is_empty());

    let attestation = report.lock_a.attestation.as_ref().unwrap();
    assert_eq!(attestation.receipt.sha256, Digest::sha256(LOCK.as_bytes()));
    assert!(attestation
        .receipt_path
        .ends_with("receipts/canon_attest_20251031_080509.txt"));
    assert_eq!(
        report.lock_a.claimed.as_deref(),
        Some(report.lock_a.canonical_digest.as_ref().unwrap().hex.as_str())
    );

    let unit = &report.lock_b.units[0];
    assert_eq!(unit.verdict(), Verdict::Pass);
    assert_eq!(unit.payload.as_ref().unwrap().name, "02 Invocations");
}

#[test]
fn test_integrity_mismatch_is_lock_a_only() {
    let temp_dir = TempDir::new().unwrap();
    let tampered = sealed_canon().replace("cantrips", "evocations");
    let plan = make_plan(&temp_dir, &tampered, &[("unit.md", UNIT)]);

    let report = make_dual_lock().run(&plan);

    assert_eq!(report.verdict, Verdict::Fail);
    assert_eq!(report.lock_a.verdict(), Verdict::Fail);
    assert_eq!(report.lock_b.verdict(), Verdict::Pass);
    let failures = report.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].lock, LockId::A);
    assert_eq!(failures[0].kind, FailureKind::IntegrityMismatch);
    // The lock file is still attested.
    assert!(report.lock_a.attestation.is_some());
}

#[test]
fn test_editing_only_the_integrity_block_keeps_lock_a_passing() {
    let temp_dir = TempDir::new().unwrap();
    let sealed = sealed_canon();
    let edited = sealed.replace("  integrity:\n", "  integrity:\n    signed_by: someone\n");
    let plan = make_plan(&temp_dir, &edited, &[]);

    let report = make_dual_lock().run(&plan);

    assert_eq!(report.lock_a.verdict(), Verdict::Pass);
    // No units: Lock B passes vacuously.
    assert!(report.passed());
}

#[test]
fn test_missing_integrity_hash() {
    let temp_dir = TempDir::new().unwrap();
    let plan = make_plan(&temp_dir, "title: Canon\nmetadata:\n  author: X\n", &[]);

    let report = make_dual_lock().run(&plan);

    assert_eq!(report.failures()[0].kind, FailureKind::MissingIntegrityHash);
    assert!(report.lock_a.claimed.is_none());
    assert!(report.lock_a.canonical_digest.is_some());
}

#[test]
fn test_failures_from_both_locks_are_unioned() {
    let temp_dir = TempDir::new().unwrap();
    let mut plan = make_plan(
        &temp_dir,
        CANON,
        &[
            ("good.md", UNIT),
            ("no_lore.md", "```json LAW\n{}\n```\n"),
            ("broken.md", "```json LAW\n{\n```\n```LORE\n{}\n```\n"),
            ("list_lore.md", &UNIT.replace("archetype: X", "- not a mapping")),
        ],
    );
    plan.units.push(temp_dir.path().join("absent.md"));

    let report = make_dual_lock().run(&plan);

    assert!(!report.passed());
    let kinds: Vec<_> = report
        .failures()
        .iter()
        .map(|f| (f.lock, f.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (LockId::A, FailureKind::IntegrityMismatch),
            (LockId::B, FailureKind::MissingBlock),
            (LockId::B, FailureKind::MalformedBlock),
            (LockId::B, FailureKind::MalformedBlock),
            (LockId::B, FailureKind::NotFound),
        ]
    );
    assert_eq!(report.lock_b.units[0].verdict(), Verdict::Pass);
    assert_eq!(report.lock_b.units.len(), 5);
}

#[test]
fn test_schema_violations_are_carried_in_the_report() {
    let temp_dir = TempDir::new().unwrap();
    let schema = PayloadSchema::from_value(serde_json::json!({
        "type": "object",
        "required": ["id", "name", "version", "law", "lore"],
        "properties": {
            "law": {"type": "object", "required": ["axioms", "edicts"]}
        }
    }))
    .unwrap();
    let dual = DualLock::new(AttestConfig::default(), UnitValidator::new(schema));
    let plan = make_plan(&temp_dir, &sealed_canon(), &[("unit.md", UNIT)]);

    let report = dual.run(&plan);

    let failure = report.lock_b.units[0].failure.as_ref().unwrap();
    assert_eq!(failure.kind, FailureKind::SchemaViolation);
    assert_eq!(failure.violations.len(), 1);
    assert_eq!(failure.violations[0].field_path, "law");

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["verdict"], "FAIL");
    assert_eq!(json["lock_b"]["units"][0]["failure"]["kind"], "schema_violation");
    assert_eq!(json["lock_b"]["units"][0]["failure"]["lock"], "B");
}

#[test]
fn test_missing_inputs_are_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let plan = DualLockPlan {
        canon_document: temp_dir.path().join("absent.yaml"),
        lock_file: temp_dir.path().join("absent.lock.yaml"),
        units: vec![],
    };

    let report = make_dual_lock().run(&plan);

    let kinds: Vec<_> = report.failures().iter().map(|f| f.kind).collect();
    assert_eq!(kinds, vec![FailureKind::NotFound, FailureKind::NotFound]);
    assert!(!temp_dir.path().join("receipts").exists());
}
