//! The `metadata.integrity.sha256` field embedded in canon documents.
//!
//! The field is located with the same state machine that builds the
//! canonical form. It is therefore always one of the excluded lines, and
//! rewriting it never changes the digest it records.

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::canonicalizer::{normalize_newlines, Canonicalizer};
use crate::digest::Digest;

/// Errors raised while sealing a document.
#[derive(Debug, Error)]
pub enum IntegrityError {
    /// No `sha256:` line exists under `metadata.integrity`.
    #[error("metadata.integrity.sha256 not found; refusing to write the hash anywhere else")]
    HashFieldMissing,
}

/// Location and current value of the embedded hash field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityField {
    /// 1-based line number in the newline-normalized document.
    pub line_number: usize,
    /// Indentation and key up to the value (`"    sha256: "`).
    pub prefix: String,
    /// Quote character wrapping the value, if any.
    pub quote: Option<char>,
    /// Raw value as written (may be a placeholder).
    pub value: String,
}

/// Claimed vs. computed canonical digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityCheck {
    /// Value found in `metadata.integrity.sha256`, if present.
    pub claimed: Option<String>,
    /// Digest of the canonical form.
    pub computed: Digest,
}

impl IntegrityCheck {
    /// `true` when a claim exists and equals the computed digest.
    pub fn matches(&self) -> bool {
        self.claimed
            .as_deref()
            .is_some_and(|claimed| self.computed.matches_hex(claimed))
    }
}

/// Document text with its integrity field rewritten to the canonical digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    /// LF-normalized text ending in exactly one LF.
    pub text: String,
    /// Digest written into the document.
    pub digest: Digest,
}

fn sha_line() -> Regex {
    Regex::new(r#"^(\s*sha256:\s*)(["']?)([^"'\s]*)(["']?)\s*$"#).expect("invalid regex")
}

fn locate_in(canonicalizer: &Canonicalizer, lines: &[&str]) -> Option<IntegrityField> {
    let re = sha_line();
    canonicalizer
        .verdicts(lines)
        .into_iter()
        .filter(|verdict| verdict.state.in_integrity() && !verdict.retained)
        .find_map(|verdict| {
            let caps = re.captures(lines[verdict.number - 1])?;
            Some(IntegrityField {
                line_number: verdict.number,
                prefix: caps[1].to_string(),
                quote: caps[2].chars().next(),
                value: caps[3].to_string(),
            })
        })
}

/// Finds the first `sha256:` line inside `metadata.integrity`, outside any fence.
pub fn locate_integrity_hash(text: &str) -> Option<IntegrityField> {
    let normalized = normalize_newlines(text);
    let lines: Vec<&str> = normalized.split('\n').collect();
    locate_in(&Canonicalizer::new(), &lines)
}

/// Computes the canonical digest and compares it with the embedded claim.
pub fn verify_integrity(text: &str) -> IntegrityCheck {
    let canonicalizer = Canonicalizer::new();
    let normalized = normalize_newlines(text);
    let lines: Vec<&str> = normalized.split('\n').collect();
    IntegrityCheck {
        claimed: locate_in(&canonicalizer, &lines).map(|field| field.value),
        computed: canonicalizer.canonicalize(&normalized).digest(),
    }
}

/// Writes the canonical digest into the existing integrity field.
///
/// Only the value on the located line changes; no block is ever appended.
/// Sealing already-sealed text returns identical bytes.
pub fn seal(text: &str) -> Result<Sealed, IntegrityError> {
    let canonicalizer = Canonicalizer::new();
    let normalized = normalize_newlines(text);
    let mut lines: Vec<String> = normalized.split('\n').map(str::to_string).collect();
    let field = {
        let borrowed: Vec<&str> = lines.iter().map(String::as_str).collect();
        locate_in(&canonicalizer, &borrowed).ok_or(IntegrityError::HashFieldMissing)?
    };

    let digest = canonicalizer.canonicalize(&normalized).digest();
    let quote = field.quote.unwrap_or('"');
    lines[field.line_number - 1] = format!("{}{}{}{}", field.prefix, quote, digest.hex, quote);

    let mut sealed = lines.join("\n");
    if !sealed.ends_with('\n') {
        sealed.push('\n');
    }
    Ok(Sealed {
        text: sealed,
        digest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "# Canon\nmetadata:\n  version: 2\n  integrity:\n    algorithm: sha256\n    sha256: \"pending\"\n  author: X\n\nBody text.";

    #[test]
    fn locates_field_under_metadata_integrity() {
        let field = locate_integrity_hash(DOC).unwrap();
        assert_eq!(field.line_number, 6);
        assert_eq!(field.prefix, "    sha256: ");
        assert_eq!(field.quote, Some('"'));
        assert_eq!(field.value, "pending");
    }

    #[test]
    fn ignores_sha_lines_in_fences_and_outside_integrity() {
        let doc = "```\nmetadata:\n  integrity:\n    sha256: fenced\n```\nmetadata:\n  sha256: loose\n";
        assert!(locate_integrity_hash(doc).is_none());
    }

    #[test]
    fn seal_writes_digest_and_verifies() {
        let sealed = seal(DOC).unwrap();
        assert!(sealed.text.ends_with("Body text.\n"));
        assert!(sealed
            .text
            .contains(&format!("    sha256: \"{}\"", sealed.digest.hex)));
        let check = verify_integrity(&sealed.text);
        assert!(check.matches());
        assert_eq!(check.computed, sealed.digest);
    }

    #[test]
    fn seal_is_idempotent() {
        let first = seal(DOC).unwrap();
        let second = seal(&first.text).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unquoted_values_gain_double_quotes() {
        let sealed = seal("metadata:\n  integrity:\n    sha256: 0\n").unwrap();
        assert!(sealed.text.contains(&format!("sha256: \"{}\"", sealed.digest.hex)));
    }

    #[test]
    fn single_quotes_are_preserved() {
        let sealed = seal("metadata:\n  integrity:\n    sha256: ''\n").unwrap();
        assert!(sealed.text.contains(&format!("sha256: '{}'", sealed.digest.hex)));
    }

    #[test]
    fn seal_without_field_fails() {
        let err = seal("metadata:\n  author: X\n").unwrap_err();
        assert!(matches!(err, IntegrityError::HashFieldMissing));
    }

    #[test]
    fn tampering_outside_integrity_breaks_verification() {
        let sealed = seal(DOC).unwrap();
        let tampered = sealed.text.replace("Body text.", "Body text!");
        let check = verify_integrity(&tampered);
        assert!(check.claimed.is_some());
        assert!(!check.matches());
    }

    #[test]
    fn missing_claim_never_matches() {
        let check = verify_integrity("plain text\n");
        assert_eq!(check.claimed, None);
        assert!(!check.matches());
    }
}
