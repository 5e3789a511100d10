//! Dual command implementation.

use std::path::PathBuf;

use canonlock_core::{DualLock, DualLockPlan, DualLockReport};

use crate::config::{AttestArgs, UnitArgs};
use crate::exit::ExitStatus;
use crate::output::{format_json, print_violations};

pub fn run(
    canon: PathBuf,
    lock: PathBuf,
    units: Vec<PathBuf>,
    attest: AttestArgs,
    unit: UnitArgs,
    json_output: bool,
) -> Result<ExitStatus, Box<dyn std::error::Error>> {
    let dual = DualLock::new(attest.to_config()?, unit.to_validator()?);
    let plan = DualLockPlan {
        canon_document: canon,
        lock_file: lock,
        units,
    };
    let report = dual.run(&plan);

    if json_output {
        println!("{}", format_json(&report));
    } else {
        print_report(&report);
    }

    Ok(ExitStatus::worst(report.failures().iter().map(|f| f.kind)))
}

fn print_report(report: &DualLockReport) {
    let lock_a = &report.lock_a;
    println!("Lock A: {}  {}", lock_a.verdict(), lock_a.canon_document.display());
    if let Some(digest) = &lock_a.canonical_digest {
        println!("  canonical sha256: {}", digest);
    }
    if let Some(attestation) = &lock_a.attestation {
        println!("  lock sha256: {}", attestation.receipt.sha256);
        println!("  receipt: {}", attestation.receipt_path.display());
    }

    let lock_b = &report.lock_b;
    let passed = lock_b.units.iter().filter(|u| u.failure.is_none()).count();
    println!(
        "Lock B: {}  {}/{} units",
        lock_b.verdict(),
        passed,
        lock_b.units.len()
    );
    for unit in &lock_b.units {
        if let Some(digest) = &unit.digest {
            println!("  OK: {}  {}", unit.unit.display(), digest);
        }
    }

    for failure in report.failures() {
        eprintln!("{}", failure);
        print_violations(&failure.violations);
    }
    println!("{}", report.verdict);
}
