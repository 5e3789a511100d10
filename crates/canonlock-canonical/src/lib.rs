//! Canonical forms and digests for canon documents and conformance payloads.
//!
//! A canon document embeds its own tamper-evidence hash under
//! `metadata.integrity.sha256`. The canonical line form drops exactly that
//! sub-block, so the hash can be written back into the document without
//! changing the value it certifies. Every edit outside the sub-block remains
//! hash-sensitive.
//!
//! Nothing in this crate performs I/O; callers hand in text and receive
//! values.
//!
#![deny(missing_docs)]

/// Line state machine producing the canonical line form.
pub mod canonicalizer;
/// Digest primitives.
pub mod digest;
/// Core identifiers and newtypes.
pub mod identifiers;
/// Locating, verifying, and sealing the embedded integrity hash.
pub mod integrity;
/// RFC 8785 canonical bytes for JSON payloads.
pub mod json;
/// Validation helpers used by canonical types.
pub mod validation;

pub use canonicalizer::{
    canonicalize, CanonicalForm, CanonicalLine, Canonicalizer, LineClass, ParserState, Scope,
};
pub use digest::{Digest, DigestAlg};
pub use identifiers::{PartitionName, Timestamp, UnitId};
pub use integrity::{
    locate_integrity_hash, seal, verify_integrity, IntegrityCheck, IntegrityError, IntegrityField,
    Sealed,
};
pub use json::{canonical_bytes, digest_json, CanonicalizationError};
pub use validation::ValidationError;
