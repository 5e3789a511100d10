use std::path::{Path, PathBuf};

use canonlock_canonical::CanonicalizationError;
use thiserror::Error;

use crate::decode::DecodeError;
use crate::extractor::BlockTag;
use crate::schema::Violation;

/// Why a single unit failed Lock B.
///
/// Every variant is fatal for its unit only; a batch keeps going.
#[derive(Debug, Error)]
pub enum UnitError {
    /// The unit file does not exist.
    #[error("unit not found: {}", .0.display())]
    NotFound(PathBuf),
    /// The unit file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// One or both tagged blocks are absent.
    #[error("missing {} block(s)", join_tags(missing))]
    MissingBlock { missing: Vec<BlockTag> },
    /// A block body is neither JSON nor YAML, or is not a mapping.
    #[error("malformed {tag} block: {source}")]
    MalformedBlock {
        tag: BlockTag,
        #[source]
        source: DecodeError,
    },
    /// The payload does not conform to the schema.
    #[error("schema validation failed with {} violation(s)", violations.len())]
    SchemaViolation { violations: Vec<Violation> },
    /// The payload could not be canonicalized for hashing.
    #[error(transparent)]
    Canonicalization(#[from] CanonicalizationError),
}

impl UnitError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => UnitError::NotFound(path.to_path_buf()),
            _ => UnitError::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

fn join_tags(tags: &[BlockTag]) -> String {
    tags.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("/")
}
