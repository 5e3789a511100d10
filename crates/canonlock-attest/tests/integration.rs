use canonlock_attest::{attest, attest_at, inspect, AttestConfig, AttestError, CountMethod};
use canonlock_canonical::Digest;
use chrono::{TimeZone, Utc};
use std::fs;
use tempfile::TempDir;

const LOCK: &str = "\
version: 2.0.0
schools:
  - id: 1
    name: cantrips
  - id: 2
    name: invocations
foundations:
  - core
grammar:
  tokens: 12
  rules: 4
";

fn write_lock(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("canon.lock.yaml");
    fs::write(&path, LOCK).unwrap();
    path
}

#[test]
fn test_receipt_covers_raw_bytes_and_counts() {
    let temp_dir = TempDir::new().unwrap();
    let lock = write_lock(&temp_dir);

    let at = Utc.with_ymd_and_hms(2025, 10, 31, 8, 5, 9).unwrap();
    let receipt = inspect(&lock, &AttestConfig::default(), at).unwrap();

    assert_eq!(receipt.sha256, Digest::sha256(LOCK.as_bytes()));
    assert_eq!(receipt.byte_size, LOCK.len() as u64);
    assert_eq!(receipt.timestamp.as_ref(), "2025-10-31T08:05:09Z");
    assert_eq!(receipt.partition_counts.method, CountMethod::Structured);
    assert_eq!(receipt.partition_counts.get("schools"), Some(2));
    assert_eq!(receipt.partition_counts.get("foundations"), Some(1));
    assert_eq!(receipt.partition_counts.get("grammar"), Some(2));
    assert_eq!(receipt.partition_counts.get("operators"), Some(0));
}

#[test]
fn test_receipt_written_beside_lock_file() {
    let temp_dir = TempDir::new().unwrap();
    let lock = write_lock(&temp_dir);

    let attestation = attest(&lock, &AttestConfig::default()).unwrap();

    assert_eq!(
        attestation.receipt_path.parent().unwrap(),
        temp_dir.path().join("receipts")
    );
    let name = attestation
        .receipt_path
        .file_name()
        .unwrap()
        .to_string_lossy()
        .to_string();
    assert!(name.starts_with("canon_attest_"));
    assert!(name.ends_with(".txt"));

    let written = fs::read_to_string(&attestation.receipt_path).unwrap();
    assert_eq!(written, attestation.receipt.render());
    assert!(written.contains(&format!("canon.sha256: {}", attestation.receipt.sha256)));
    assert!(written.contains("partitions:\n  schools: 2\n"));
}

#[test]
fn test_repeated_runs_never_overwrite() {
    let temp_dir = TempDir::new().unwrap();
    let lock = write_lock(&temp_dir);
    let at = Utc.with_ymd_and_hms(2025, 10, 31, 8, 5, 9).unwrap();

    let first = attest_at(&lock, &AttestConfig::default(), at).unwrap();
    fs::write(&lock, "schools:\n  - only\n").unwrap();
    let second = attest_at(&lock, &AttestConfig::default(), at).unwrap();
    let third = attest_at(&lock, &AttestConfig::default(), at).unwrap();

    assert!(first.receipt_path.ends_with("canon_attest_20251031_080509.txt"));
    assert!(second.receipt_path.ends_with("canon_attest_20251031_080509_1.txt"));
    assert!(third.receipt_path.ends_with("canon_attest_20251031_080509_2.txt"));

    let original = fs::read_to_string(&first.receipt_path).unwrap();
    assert!(original.contains("  schools: 2"));
    assert_eq!(fs::read_dir(temp_dir.path().join("receipts")).unwrap().count(), 3);
}

#[test]
fn test_concurrent_writers_get_distinct_files() {
    let temp_dir = TempDir::new().unwrap();
    let lock = write_lock(&temp_dir);
    let at = Utc.with_ymd_and_hms(2025, 10, 31, 8, 5, 9).unwrap();

    let paths: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let lock = &lock;
                scope.spawn(move || attest_at(lock, &AttestConfig::default(), at).unwrap())
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap().receipt_path)
            .collect()
    });

    let mut unique = paths.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 8);
}

#[test]
fn test_receipts_dir_override() {
    let temp_dir = TempDir::new().unwrap();
    let lock = write_lock(&temp_dir);
    let config = AttestConfig {
        receipts_dir: Some(temp_dir.path().join("elsewhere")),
        ..AttestConfig::default()
    };

    let attestation = attest(&lock, &config).unwrap();
    assert!(attestation
        .receipt_path
        .starts_with(temp_dir.path().join("elsewhere")));
}

#[test]
fn test_missing_lock_file_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("absent.lock.yaml");

    let err = attest(&missing, &AttestConfig::default()).unwrap_err();
    assert!(matches!(err, AttestError::NotFound(path) if path == missing));
    assert!(!temp_dir.path().join("receipts").exists());
}
