//! Structural conformance of LAW/LORE data embedded in canon units.
//!
//! A unit is a markdown file carrying one fenced LAW block (rules and
//! constraints) and one fenced LORE block (narrative context), each written
//! in JSON or YAML:
//!
//! ````text
//! ```json LAW
//! {"axioms": ["A"]}
//! ```
//!
//! ```yaml LORE
//! archetype: X
//! ```
//! ````
//!
//! The blocks are decoded into a normalized [`Payload`], validated against a
//! Draft-07 JSON Schema, and fingerprinted by the SHA-256 of the payload's
//! RFC 8785 canonical form.

pub mod decode;
pub mod errors;
pub mod extractor;
pub mod payload;
pub mod schema;
pub mod unit;

pub use decode::{decode, DecodeError, Decoded};
pub use errors::UnitError;
pub use extractor::{
    extract_blocks, extract_blocks_with, first_of_each, BlockTag, ExtractedBlock, SelectedBlocks,
    TagSet,
};
pub use payload::{
    build_and_validate, build_payload, title_case, unit_id, Payload, PayloadOptions,
    ValidatedPayload,
};
pub use schema::{PayloadSchema, SchemaError, Violation};
pub use unit::UnitValidator;
