use regex::Regex;
use serde::Serialize;

use crate::digest::Digest;

/// Structural scope outside of fences.
///
/// A fence remembers the scope it was opened in and resumes it on close, so
/// a fenced example inside `metadata:` does not end the metadata block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum Scope {
    /// Outside any tracked block.
    Document,
    /// Inside a `metadata:` block.
    Metadata {
        /// Column at which `metadata:` appeared.
        metadata_indent: usize,
    },
    /// Inside `metadata.integrity:`.
    Integrity {
        /// Column at which `metadata:` appeared.
        metadata_indent: usize,
        /// Column at which `integrity:` appeared.
        integrity_indent: usize,
    },
}

/// Parser state carried from one line to the next during a canonicalization pass.
///
/// Integrity is only representable nested inside metadata, and a fence
/// suspends every other transition until it closes. Fenced lines are
/// retained verbatim, except for a fence opened inside `integrity:`, which
/// is integrity content and dropped whole, closing line included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ParserState {
    /// Outside any tracked block.
    Default,
    /// Inside a ```` ``` ```` or `~~~` fence.
    InFence {
        /// Scope restored when the fence closes.
        resume: Scope,
    },
    /// Inside a `metadata:` block.
    InMetadata {
        /// Column at which `metadata:` appeared.
        metadata_indent: usize,
    },
    /// Inside the `integrity:` sub-block of `metadata:`.
    InMetadataIntegrity {
        /// Column at which `metadata:` appeared.
        metadata_indent: usize,
        /// Column at which `integrity:` appeared.
        integrity_indent: usize,
    },
}

impl ParserState {
    fn from_scope(scope: Scope) -> Self {
        match scope {
            Scope::Document => ParserState::Default,
            Scope::Metadata { metadata_indent } => ParserState::InMetadata { metadata_indent },
            Scope::Integrity {
                metadata_indent,
                integrity_indent,
            } => ParserState::InMetadataIntegrity {
                metadata_indent,
                integrity_indent,
            },
        }
    }

    fn scope(self) -> Scope {
        match self {
            ParserState::Default => Scope::Document,
            ParserState::InFence { resume } => resume,
            ParserState::InMetadata { metadata_indent } => Scope::Metadata { metadata_indent },
            ParserState::InMetadataIntegrity {
                metadata_indent,
                integrity_indent,
            } => Scope::Integrity {
                metadata_indent,
                integrity_indent,
            },
        }
    }

    /// Returns `true` while strictly inside `metadata.integrity` and outside any fence.
    pub fn in_integrity(self) -> bool {
        matches!(self, ParserState::InMetadataIntegrity { .. })
    }

    /// Decides whether the classified line is retained, then returns the
    /// state for the following line.
    ///
    /// Retention is always decided against the state *before* the line is
    /// applied, so the line that closes a fence is retained (unless the fence
    /// opened inside `integrity:`) and the `integrity:` header that opens the
    /// excluded sub-block is dropped.
    pub fn step(self, class: &LineClass) -> (bool, ParserState) {
        match self {
            ParserState::InFence { resume } => {
                let next = if class.is_fence {
                    ParserState::from_scope(resume)
                } else {
                    self
                };
                (!matches!(resume, Scope::Integrity { .. }), next)
            }
            ParserState::Default => {
                let next = if class.is_fence {
                    ParserState::InFence {
                        resume: Scope::Document,
                    }
                } else if class.is_metadata_header {
                    ParserState::InMetadata {
                        metadata_indent: class.indent,
                    }
                } else {
                    self
                };
                (true, next)
            }
            ParserState::InMetadata { metadata_indent } => {
                let closes = class.is_top_kv && class.indent <= metadata_indent;
                let opens_integrity =
                    class.is_integrity_header && class.indent > metadata_indent;
                let retained = closes || !opens_integrity;
                let next = if class.is_fence {
                    ParserState::InFence {
                        resume: self.scope(),
                    }
                } else if closes {
                    ParserState::Default
                } else if opens_integrity {
                    ParserState::InMetadataIntegrity {
                        metadata_indent,
                        integrity_indent: class.indent,
                    }
                } else {
                    self
                };
                (retained, next)
            }
            ParserState::InMetadataIntegrity {
                metadata_indent,
                integrity_indent,
            } => {
                let sibling = class.is_top_kv && class.indent <= integrity_indent;
                let next = if class.is_fence {
                    ParserState::InFence {
                        resume: self.scope(),
                    }
                } else if class.is_top_kv && class.indent <= metadata_indent {
                    ParserState::Default
                } else if sibling {
                    ParserState::InMetadata { metadata_indent }
                } else {
                    self
                };
                (sibling, next)
            }
        }
    }
}

/// Structural classification of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineClass {
    /// Starts with ```` ``` ```` or `~~~` after leading whitespace.
    pub is_fence: bool,
    /// A bare `metadata:` key.
    pub is_metadata_header: bool,
    /// A bare `integrity:` key.
    pub is_integrity_header: bool,
    /// Any `key:` line, bare or with an inline value.
    pub is_top_kv: bool,
    /// Number of leading space characters.
    pub indent: usize,
}

/// One retained line of a document, in original order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalLine {
    /// 1-based line number in the newline-normalized source.
    pub number: usize,
    /// Line content, byte-for-byte (no trimming).
    pub text: String,
}

impl AsRef<str> for CanonicalLine {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Retention decision for one source line, with the state it was decided in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineVerdict {
    /// 1-based line number.
    pub number: usize,
    /// State in effect before the line was applied.
    pub state: ParserState,
    /// Whether the line belongs to the canonical form.
    pub retained: bool,
}

/// Canonical line form of a document plus pass statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalForm {
    lines: Vec<CanonicalLine>,
    total_lines: usize,
}

impl CanonicalForm {
    /// Retained lines in document order.
    pub fn lines(&self) -> &[CanonicalLine] {
        &self.lines
    }

    /// Consumes the form, returning the retained lines.
    pub fn into_lines(self) -> Vec<CanonicalLine> {
        self.lines
    }

    /// Number of lines in the normalized source.
    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Number of retained lines.
    pub fn retained_lines(&self) -> usize {
        self.lines.len()
    }

    /// Number of lines dropped from the canonical form.
    pub fn excluded_lines(&self) -> usize {
        self.total_lines - self.lines.len()
    }

    /// Joins the retained lines with LF and guarantees exactly one final LF
    /// when the join does not already end in one.
    pub fn to_text(&self) -> String {
        let mut text = self
            .lines
            .iter()
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        if !text.ends_with('\n') {
            text.push('\n');
        }
        text
    }

    /// SHA-256 over [`CanonicalForm::to_text`].
    pub fn digest(&self) -> Digest {
        Digest::sha256(self.to_text().as_bytes())
    }
}

/// Reduces raw document text to its canonical line form.
///
/// The pass is total: unbalanced fences or blocks simply extend to the end of
/// the document under their own retention rule.
pub struct Canonicalizer {
    metadata_header: Regex,
    integrity_header: Regex,
    top_kv: Regex,
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Canonicalizer {
    /// Creates a canonicalizer with the line patterns compiled.
    pub fn new() -> Self {
        Self {
            metadata_header: Regex::new(r"^\s*metadata:\s*$").expect("invalid regex"),
            integrity_header: Regex::new(r"^\s*integrity:\s*$").expect("invalid regex"),
            top_kv: Regex::new(r"^\s*[A-Za-z0-9_]+\s*:\s*").expect("invalid regex"),
        }
    }

    /// Classifies a single line (without its terminating newline).
    pub fn classify(&self, line: &str) -> LineClass {
        let stripped = line.trim_start();
        LineClass {
            is_fence: stripped.starts_with("```") || stripped.starts_with("~~~"),
            is_metadata_header: self.metadata_header.is_match(line),
            is_integrity_header: self.integrity_header.is_match(line),
            is_top_kv: self.top_kv.is_match(line),
            indent: line.len() - line.trim_start_matches(' ').len(),
        }
    }

    /// Runs the state machine over already-split lines.
    pub fn verdicts(&self, lines: &[&str]) -> Vec<LineVerdict> {
        let mut state = ParserState::Default;
        lines
            .iter()
            .enumerate()
            .map(|(idx, line)| {
                let (retained, next) = state.step(&self.classify(line));
                let verdict = LineVerdict {
                    number: idx + 1,
                    state,
                    retained,
                };
                state = next;
                verdict
            })
            .collect()
    }

    /// Produces the canonical form of `text`.
    pub fn canonicalize(&self, text: &str) -> CanonicalForm {
        let normalized = normalize_newlines(text);
        let lines: Vec<&str> = normalized.split('\n').collect();
        let verdicts = self.verdicts(&lines);

        let retained = lines
            .iter()
            .zip(verdicts)
            .filter(|(_, verdict)| verdict.retained)
            .map(|(line, verdict)| CanonicalLine {
                number: verdict.number,
                text: (*line).to_string(),
            })
            .collect();

        CanonicalForm {
            lines: retained,
            total_lines: lines.len(),
        }
    }
}

/// Canonical line sequence of `text`.
pub fn canonicalize(text: &str) -> Vec<CanonicalLine> {
    Canonicalizer::new().canonicalize(text).into_lines()
}

/// Rewrites `\r\n` and lone `\r` to `\n`.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}
