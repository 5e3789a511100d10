//! Command-line options shared between subcommands, and their conversion
//! into library configuration.

use std::path::{Path, PathBuf};

use canonlock_attest::{AttestConfig, PartitionSet};
use canonlock_blocks::{PayloadOptions, PayloadSchema, TagSet, UnitValidator};
use clap::Args;

use crate::errors::CliError;

/// Schema used when `--schema` is not given and this file exists.
pub const DEFAULT_SCHEMA_PATH: &str = "validators/school_schema.json";

#[derive(Args, Debug, Clone, Default)]
pub struct AttestArgs {
    /// Partition to count (repeatable; default: schools, foundations,
    /// parameters, syntax_variants, operators, grammar)
    #[arg(long = "partition", value_name = "NAME")]
    pub partitions: Vec<String>,
    /// Directory for receipts (default: <lockfile-dir>/receipts)
    #[arg(long, value_name = "DIR")]
    pub receipts_dir: Option<PathBuf>,
}

impl AttestArgs {
    pub fn to_config(&self) -> Result<AttestConfig, CliError> {
        let partitions = if self.partitions.is_empty() {
            PartitionSet::default()
        } else {
            PartitionSet::parse(self.partitions.iter().cloned())
                .map_err(|e| CliError::InvalidArgument(e.to_string()))?
        };
        Ok(AttestConfig {
            partitions,
            receipts_dir: self.receipts_dir.clone(),
        })
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct UnitArgs {
    /// JSON Schema for payloads (default: validators/school_schema.json if
    /// present, else the built-in schema)
    #[arg(long, value_name = "FILE")]
    pub schema: Option<PathBuf>,
    /// Token marking a LAW block (repeatable; default: LAW)
    #[arg(long = "law-tag", value_name = "TOKEN")]
    pub law_tags: Vec<String>,
    /// Token marking a LORE block (repeatable; default: LORE)
    #[arg(long = "lore-tag", value_name = "TOKEN")]
    pub lore_tags: Vec<String>,
    /// Payload version string
    #[arg(long, value_name = "VERSION", default_value = "0.1")]
    pub payload_version: String,
}

impl UnitArgs {
    pub fn to_validator(&self) -> Result<UnitValidator, CliError> {
        let schema = self.load_schema()?;
        let law = if self.law_tags.is_empty() {
            vec!["law".to_string()]
        } else {
            self.law_tags.clone()
        };
        let lore = if self.lore_tags.is_empty() {
            vec!["lore".to_string()]
        } else {
            self.lore_tags.clone()
        };
        Ok(UnitValidator::new(schema)
            .with_tags(TagSet::new(law, lore))
            .with_options(PayloadOptions {
                version: self.payload_version.clone(),
            }))
    }

    fn load_schema(&self) -> Result<PayloadSchema, CliError> {
        if let Some(path) = &self.schema {
            tracing::debug!(schema = %path.display(), "loading schema");
            return Ok(PayloadSchema::load(path)?);
        }
        let conventional = Path::new(DEFAULT_SCHEMA_PATH);
        if conventional.is_file() {
            tracing::debug!(schema = %conventional.display(), "loading conventional schema");
            Ok(PayloadSchema::load(conventional)?)
        } else {
            tracing::debug!("using built-in schema");
            Ok(PayloadSchema::builtin()?)
        }
    }
}
