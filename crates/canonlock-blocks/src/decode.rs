//! JSON/YAML decoding of block bodies.

use serde_json::{Map, Value};
use thiserror::Error;

/// A decoded block body, tagged with the syntax that accepted it.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Json(Value),
    Yaml(Value),
}

/// Errors raised while decoding a block body.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[source] serde_json::Error),
    #[error("invalid YAML: {0}")]
    Yaml(#[source] serde_yaml::Error),
    /// The fallback path failed both ways.
    #[error("neither JSON ({json}) nor YAML ({yaml})")]
    Neither {
        json: serde_json::Error,
        yaml: serde_yaml::Error,
    },
    #[error("expected a mapping, found {0}")]
    NotAMapping(&'static str),
}

impl Decoded {
    pub fn value(&self) -> &Value {
        match self {
            Decoded::Json(v) | Decoded::Yaml(v) => v,
        }
    }

    /// Unwraps the top-level mapping a LAW/LORE block must hold.
    pub fn into_mapping(self) -> Result<Map<String, Value>, DecodeError> {
        match self {
            Decoded::Json(Value::Object(map)) | Decoded::Yaml(Value::Object(map)) => Ok(map),
            Decoded::Json(other) | Decoded::Yaml(other) => {
                Err(DecodeError::NotAMapping(kind_of(&other)))
            }
        }
    }
}

/// Decodes `body` according to its fence language hint.
///
/// `json`, or no hint at all, is strict JSON and `yaml`/`yml` strict YAML.
/// Any other hint tries JSON first and falls back to YAML.
pub fn decode(hint: Option<&str>, body: &str) -> Result<Decoded, DecodeError> {
    match hint.map(str::to_ascii_lowercase).as_deref() {
        None | Some("json") => serde_json::from_str(body)
            .map(Decoded::Json)
            .map_err(DecodeError::Json),
        Some("yaml" | "yml") => serde_yaml::from_str(body)
            .map(Decoded::Yaml)
            .map_err(DecodeError::Yaml),
        _ => match serde_json::from_str(body) {
            Ok(value) => Ok(Decoded::Json(value)),
            Err(json) => {
                tracing::debug!(hint = ?hint, error = %json, "JSON decode failed, trying YAML");
                serde_yaml::from_str(body)
                    .map(Decoded::Yaml)
                    .map_err(|yaml| DecodeError::Neither { json, yaml })
            }
        },
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
