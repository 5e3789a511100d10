//! Normalized payload built from a unit's LAW and LORE blocks.

use canonlock_canonical::{digest_json, CanonicalizationError, Digest, UnitId};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::decode::decode;
use crate::errors::UnitError;
use crate::extractor::{BlockTag, ExtractedBlock};
use crate::schema::PayloadSchema;

/// Default payload `version`.
pub const DEFAULT_PAYLOAD_VERSION: &str = "0.1";

/// Caller-supplied payload settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadOptions {
    pub version: String,
}

impl Default for PayloadOptions {
    fn default() -> Self {
        Self {
            version: DEFAULT_PAYLOAD_VERSION.to_string(),
        }
    }
}

/// The document validated and hashed for Lock B.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payload {
    pub id: UnitId,
    pub name: String,
    pub version: String,
    pub law: Map<String, Value>,
    pub lore: Map<String, Value>,
}

/// A payload that passed the schema, with its fingerprint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedPayload {
    pub payload: Payload,
    /// SHA-256 of the payload's RFC 8785 canonical bytes.
    pub digest: Digest,
}

/// Lowercases `unit_name` and collapses every run of characters outside
/// `[a-z0-9_]` into a single `_`.
pub fn unit_id(unit_name: &str) -> UnitId {
    let re = Regex::new(r"[^a-z0-9_]+").expect("invalid regex");
    UnitId::new(re.replace_all(&unit_name.to_lowercase(), "_").into_owned())
}

/// Display name: underscores become spaces, then each word is title-cased.
///
/// A letter is uppercased when the character before it is not a letter and
/// lowercased otherwise, so `02_invocations` becomes `02 Invocations`.
pub fn title_case(unit_name: &str) -> String {
    let mut out = String::with_capacity(unit_name.len());
    let mut prev_cased = false;
    for c in unit_name.chars().map(|c| if c == '_' { ' ' } else { c }) {
        if prev_cased {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_cased = c.is_alphabetic();
    }
    out
}

/// Assembles a payload from already-decoded LAW and LORE mappings.
pub fn build_payload(
    unit_name: &str,
    law: Map<String, Value>,
    lore: Map<String, Value>,
    options: &PayloadOptions,
) -> Payload {
    Payload {
        id: unit_id(unit_name),
        name: title_case(unit_name),
        version: options.version.clone(),
        law,
        lore,
    }
}

/// Decodes, builds, validates, and fingerprints one unit.
///
/// Checks run in a fixed order: both blocks must be present, both must
/// decode to mappings, and the payload must satisfy `schema`. Every schema
/// violation is reported, not just the first.
pub fn build_and_validate(
    unit_name: &str,
    law: Option<&ExtractedBlock>,
    lore: Option<&ExtractedBlock>,
    schema: &PayloadSchema,
    options: &PayloadOptions,
) -> Result<ValidatedPayload, UnitError> {
    let (law, lore) = match (law, lore) {
        (Some(law), Some(lore)) => (law, lore),
        (law, lore) => {
            let mut missing = Vec::new();
            if law.is_none() {
                missing.push(BlockTag::Law);
            }
            if lore.is_none() {
                missing.push(BlockTag::Lore);
            }
            return Err(UnitError::MissingBlock { missing });
        }
    };

    let payload = build_payload(
        unit_name,
        decode_block(law)?,
        decode_block(lore)?,
        options,
    );
    let document = serde_json::to_value(&payload)
        .map_err(|e| CanonicalizationError::Other(e.to_string()))?;

    let violations = schema.validate(&document);
    if !violations.is_empty() {
        return Err(UnitError::SchemaViolation { violations });
    }

    let digest = digest_json(&document)?;
    Ok(ValidatedPayload { payload, digest })
}

fn decode_block(block: &ExtractedBlock) -> Result<Map<String, Value>, UnitError> {
    decode(block.language_hint.as_deref(), &block.body)
        .and_then(|decoded| decoded.into_mapping())
        .map_err(|source| UnitError::MalformedBlock {
            tag: block.tag,
            source,
        })
}
