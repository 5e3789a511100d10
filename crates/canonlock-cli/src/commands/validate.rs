//! Validate command implementation.

use std::path::PathBuf;

use canonlock_blocks::Violation;
use canonlock_core::{check_unit, UnitOutcome};
use serde::Serialize;

use crate::config::UnitArgs;
use crate::exit::ExitStatus;
use crate::output::{format_json, print_violations};

#[derive(Serialize)]
struct UnitReport<'a> {
    unit: String,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    digest: Option<&'a str>,
    violations: &'a [Violation],
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl<'a> UnitReport<'a> {
    fn from_outcome(outcome: &'a UnitOutcome) -> Self {
        Self {
            unit: outcome.unit.display().to_string(),
            status: outcome.verdict().to_string(),
            digest: outcome.digest.as_ref().map(|d| d.hex.as_str()),
            violations: outcome
                .failure
                .as_ref()
                .map(|f| f.violations.as_slice())
                .unwrap_or_default(),
            error: outcome.failure.as_ref().map(|f| f.message.as_str()),
        }
    }
}

pub fn run(
    units: Vec<PathBuf>,
    options: UnitArgs,
    json_output: bool,
) -> Result<ExitStatus, Box<dyn std::error::Error>> {
    let validator = options.to_validator()?;
    let outcomes: Vec<UnitOutcome> = units
        .iter()
        .map(|unit| check_unit(&validator, unit))
        .collect();

    if json_output {
        let reports: Vec<_> = outcomes.iter().map(UnitReport::from_outcome).collect();
        println!("{}", format_json(&reports));
    } else {
        for outcome in &outcomes {
            match (&outcome.failure, &outcome.digest, &outcome.payload) {
                (None, Some(digest), Some(payload)) => {
                    println!("OK: {}", outcome.unit.display());
                    println!("sha256: {}", digest);
                    println!("{}", format_json(payload));
                }
                (Some(failure), _, _) => {
                    eprintln!("FAIL: {}: {}", outcome.unit.display(), failure.message);
                    print_violations(&failure.violations);
                }
                _ => {}
            }
        }
    }

    Ok(ExitStatus::worst(
        outcomes
            .iter()
            .filter_map(|o| o.failure.as_ref())
            .map(|f| f.kind),
    ))
}
