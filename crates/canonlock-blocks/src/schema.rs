//! Draft-07 schema validation of payloads.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use jsonschema::{Draft, JSONSchema};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

const BUILTIN_SCHEMA: &str = include_str!("../schemas/unit_payload.schema.json");

/// Errors raised while loading a schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read schema {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("schema is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("schema does not compile: {0}")]
    Invalid(String),
}

/// One schema mismatch.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Violation {
    /// Dot-joined instance path, `root` for the document itself.
    pub field_path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field_path, self.message)
    }
}

/// A compiled Draft-07 schema for unit payloads.
#[derive(Clone)]
pub struct PayloadSchema {
    source: Arc<Value>,
    compiled: Arc<JSONSchema>,
}

impl fmt::Debug for PayloadSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayloadSchema")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl PayloadSchema {
    /// Compiles `schema` with Draft-07 semantics.
    pub fn from_value(schema: Value) -> Result<Self, SchemaError> {
        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&schema)
            .map_err(|e| SchemaError::Invalid(e.to_string()))?;
        Ok(Self {
            source: Arc::new(schema),
            compiled: Arc::new(compiled),
        })
    }

    /// Reads and compiles a schema file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => SchemaError::NotFound(path.to_path_buf()),
            _ => SchemaError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        Self::from_value(serde_json::from_str(&text)?)
    }

    /// The schema shipped with this crate: `id`, `name`, `version`, `law`
    /// and `lore`, nothing else.
    pub fn builtin() -> Result<Self, SchemaError> {
        Self::from_value(serde_json::from_str(BUILTIN_SCHEMA)?)
    }

    pub fn source(&self) -> &Value {
        &self.source
    }

    /// Every violation of `instance`, sorted by path then message.
    pub fn validate(&self, instance: &Value) -> Vec<Violation> {
        let mut violations: Vec<Violation> = match self.compiled.validate(instance) {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .map(|error| Violation {
                    field_path: dotted_path(&error.instance_path.to_string()),
                    message: error.to_string(),
                })
                .collect(),
        };
        violations.sort();
        violations
    }
}

/// `/law/axioms/0` becomes `law.axioms.0`; the empty pointer becomes `root`.
fn dotted_path(pointer: &str) -> String {
    let segments: Vec<String> = pointer
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| s.replace("~1", "/").replace("~0", "~"))
        .collect();
    if segments.is_empty() {
        "root".to_string()
    } else {
        segments.join(".")
    }
}
