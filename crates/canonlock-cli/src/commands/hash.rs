//! Hash command implementation.

use std::path::PathBuf;

use canonlock_canonical::Canonicalizer;
use serde_json::json;

use crate::commands::read_text;
use crate::exit::ExitStatus;
use crate::output::{format_json, format_numbered_line};

pub fn run(
    document: PathBuf,
    stats: bool,
    lines: bool,
    json_output: bool,
) -> Result<ExitStatus, Box<dyn std::error::Error>> {
    let text = read_text(&document)?;
    let form = Canonicalizer::new().canonicalize(&text);
    let digest = form.digest();

    if json_output {
        let mut report = json!({
            "path": document.display().to_string(),
            "sha256": digest.hex,
            "total_lines": form.total_lines(),
            "retained_lines": form.retained_lines(),
            "excluded_lines": form.excluded_lines(),
        });
        if lines {
            report["lines"] = serde_json::to_value(form.lines())?;
        }
        println!("{}", format_json(&report));
        return Ok(ExitStatus::Pass);
    }

    if lines {
        for line in form.lines() {
            println!("{}", format_numbered_line(line.number, &line.text));
        }
    }
    if stats {
        println!("total_lines: {}", form.total_lines());
        println!("retained_lines: {}", form.retained_lines());
        println!("excluded_lines: {}", form.excluded_lines());
        println!("sha256: {}", digest);
    } else {
        println!("{}", digest);
    }
    Ok(ExitStatus::Pass)
}
