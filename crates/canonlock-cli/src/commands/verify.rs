//! Verify command implementation.

use std::path::PathBuf;

use canonlock_canonical::verify_integrity;
use serde_json::json;

use crate::commands::read_text;
use crate::exit::ExitStatus;
use crate::output::format_json;

pub fn run(document: PathBuf, json_output: bool) -> Result<ExitStatus, Box<dyn std::error::Error>> {
    let text = read_text(&document)?;
    let check = verify_integrity(&text);
    let matches = check.matches();

    if json_output {
        println!(
            "{}",
            format_json(&json!({
                "path": document.display().to_string(),
                "claimed": check.claimed,
                "computed": check.computed.hex,
                "matches": matches,
            }))
        );
    } else {
        match check.claimed.as_deref() {
            Some(_) if matches => println!("OK: {}", document.display()),
            Some(claimed) => {
                println!("MISMATCH: {}", document.display());
                println!("  claimed:  {}", claimed);
                println!("  computed: {}", check.computed);
            }
            None => {
                println!("MISSING: {}", document.display());
                println!("  metadata.integrity.sha256 not found");
                println!("  computed: {}", check.computed);
            }
        }
    }

    Ok(if matches {
        ExitStatus::Pass
    } else {
        ExitStatus::Failure
    })
}
