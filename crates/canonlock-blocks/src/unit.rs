use std::fs;
use std::path::Path;

use crate::errors::UnitError;
use crate::extractor::{extract_blocks_with, first_of_each, TagSet};
use crate::payload::{build_and_validate, PayloadOptions, ValidatedPayload};
use crate::schema::PayloadSchema;

/// Lock B for unit files: extract, build, validate, fingerprint.
///
/// Holds no per-unit state, so one validator can check any number of units
/// from any number of threads.
#[derive(Debug, Clone)]
pub struct UnitValidator {
    schema: PayloadSchema,
    tags: TagSet,
    options: PayloadOptions,
}

impl UnitValidator {
    pub fn new(schema: PayloadSchema) -> Self {
        Self {
            schema,
            tags: TagSet::default(),
            options: PayloadOptions::default(),
        }
    }

    pub fn with_tags(mut self, tags: TagSet) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_options(mut self, options: PayloadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn schema(&self) -> &PayloadSchema {
        &self.schema
    }

    /// Validates unit text already in memory.
    pub fn validate_text(&self, unit_name: &str, text: &str) -> Result<ValidatedPayload, UnitError> {
        let blocks = extract_blocks_with(text, &self.tags);
        let selected = first_of_each(&blocks);
        tracing::debug!(
            unit = unit_name,
            blocks = blocks.len(),
            law = ?selected.law.map(|b| b.line),
            lore = ?selected.lore.map(|b| b.line),
            "extracted tagged blocks"
        );
        build_and_validate(
            unit_name,
            selected.law,
            selected.lore,
            &self.schema,
            &self.options,
        )
    }

    /// Validates a unit file; its file stem names the unit.
    ///
    /// Invalid UTF-8 is replaced rather than rejected.
    pub fn validate_file(&self, path: impl AsRef<Path>) -> Result<ValidatedPayload, UnitError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| UnitError::io(path, e))?;
        let text = String::from_utf8_lossy(&bytes);
        let unit_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.validate_text(&unit_name, &text)
    }
}
