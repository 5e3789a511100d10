//! Output formatting utilities.

use canonlock_blocks::Violation;
use serde::Serialize;

/// Formats a value as pretty JSON.
pub fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Prints one `  - path: message` line per violation to stderr.
pub fn print_violations(violations: &[Violation]) {
    for violation in violations {
        eprintln!("  - {}: {}", violation.field_path, violation.message);
    }
}

/// Formats a retained canonical line with its source line number.
pub fn format_numbered_line(number: usize, text: &str) -> String {
    format!("{:>6}  {}", number, text)
}
