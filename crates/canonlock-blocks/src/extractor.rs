//! Tagged fenced-block scanner.

use std::fmt;

use canonlock_canonical::canonicalizer::normalize_newlines;
use serde::Serialize;

/// Which half of a unit a block carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BlockTag {
    /// Rules and constraints.
    Law,
    /// Narrative and context.
    Lore,
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockTag::Law => f.write_str("LAW"),
            BlockTag::Lore => f.write_str("LORE"),
        }
    }
}

/// Tokens recognized as LAW or LORE tags, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSet {
    law: Vec<String>,
    lore: Vec<String>,
}

impl Default for TagSet {
    fn default() -> Self {
        Self::new(["law"], ["lore"])
    }
}

impl TagSet {
    pub fn new<L, R>(law: L, lore: R) -> Self
    where
        L: IntoIterator,
        L::Item: AsRef<str>,
        R: IntoIterator,
        R::Item: AsRef<str>,
    {
        Self {
            law: law.into_iter().map(|t| t.as_ref().to_lowercase()).collect(),
            lore: lore.into_iter().map(|t| t.as_ref().to_lowercase()).collect(),
        }
    }

    pub fn classify(&self, token: &str) -> Option<BlockTag> {
        let token = token.to_lowercase();
        if self.law.contains(&token) {
            Some(BlockTag::Law)
        } else if self.lore.contains(&token) {
            Some(BlockTag::Lore)
        } else {
            None
        }
    }
}

/// One tagged fenced region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedBlock {
    pub tag: BlockTag,
    /// Language token preceding the tag (`json`, `yaml`, …), as written.
    pub language_hint: Option<String>,
    /// Fence contents with leading and trailing blank lines removed.
    pub body: String,
    /// 1-based line number of the opening fence.
    pub line: usize,
}

/// First LAW and first LORE block of a unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectedBlocks<'a> {
    pub law: Option<&'a ExtractedBlock>,
    pub lore: Option<&'a ExtractedBlock>,
}

/// Extracts LAW/LORE blocks using the default tag set.
pub fn extract_blocks(text: &str) -> Vec<ExtractedBlock> {
    extract_blocks_with(text, &TagSet::default())
}

/// Extracts tagged blocks in document order.
///
/// An opening fence line is ```` ``` ```` or `~~~` followed by either a
/// single tag token or a language token and a tag token. Untagged fences are
/// skipped whole, so nothing inside them is ever mistaken for a block. A
/// fence that never closes yields no block.
pub fn extract_blocks_with(text: &str, tags: &TagSet) -> Vec<ExtractedBlock> {
    let normalized = normalize_newlines(text);
    let lines: Vec<&str> = normalized.split('\n').collect();
    let mut blocks = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let opener = lines[i].trim_start();
        let Some(fence) = fence_char(opener) else {
            i += 1;
            continue;
        };

        let Some(close) = (i + 1..lines.len()).find(|&j| closes(lines[j], fence)) else {
            break;
        };

        let info = opener.trim_start_matches(fence);
        if let Some((tag, language_hint)) = parse_info(info, tags) {
            blocks.push(ExtractedBlock {
                tag,
                language_hint,
                body: trim_blank_lines(&lines[i + 1..close]),
                line: i + 1,
            });
        }
        i = close + 1;
    }

    blocks
}

/// Picks the first block of each tag; later duplicates are ignored.
pub fn first_of_each(blocks: &[ExtractedBlock]) -> SelectedBlocks<'_> {
    SelectedBlocks {
        law: blocks.iter().find(|b| b.tag == BlockTag::Law),
        lore: blocks.iter().find(|b| b.tag == BlockTag::Lore),
    }
}

fn fence_char(line: &str) -> Option<char> {
    if line.starts_with("```") {
        Some('`')
    } else if line.starts_with("~~~") {
        Some('~')
    } else {
        None
    }
}

fn closes(line: &str, fence: char) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 3 && trimmed.chars().all(|c| c == fence)
}

fn parse_info(info: &str, tags: &TagSet) -> Option<(BlockTag, Option<String>)> {
    let tokens: Vec<&str> = info.split_whitespace().collect();
    match tokens.as_slice() {
        [tag] => tags.classify(tag).map(|tag| (tag, None)),
        [hint, tag] if is_word(hint) => tags.classify(tag).map(|tag| (tag, Some(hint.to_string()))),
        _ => None,
    }
}

fn is_word(token: &str) -> bool {
    token.chars().all(|c| c.is_alphanumeric() || c == '_')
}

fn trim_blank_lines(lines: &[&str]) -> String {
    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());
    match (start, end) {
        (Some(start), Some(end)) => lines[start..=end].join("\n"),
        _ => String::new(),
    }
}
