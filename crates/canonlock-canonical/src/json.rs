use canonical_json::to_string;
use serde_json::Value;

use crate::digest::Digest;

/// Error returned when a JSON value cannot be canonicalized.
#[derive(thiserror::Error, Debug)]
pub enum CanonicalizationError {
    /// Serializer failure.
    #[error("canonical serialization failed: {0}")]
    Other(String),
}

/// RFC 8785 canonical bytes: object keys sorted, no insignificant whitespace.
///
/// Two values that differ only in the source order of mapping keys produce
/// identical bytes.
pub fn canonical_bytes(value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
    let canonical = to_string(value).map_err(|err| CanonicalizationError::Other(err.to_string()))?;
    Ok(canonical.into_bytes())
}

/// SHA-256 over [`canonical_bytes`].
pub fn digest_json(value: &Value) -> Result<Digest, CanonicalizationError> {
    Ok(Digest::sha256(&canonical_bytes(value)?))
}
