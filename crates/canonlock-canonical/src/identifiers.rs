use crate::validation::ValidationError;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

macro_rules! newtype {
    ($name:ident, $doc:expr, $pattern:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new instance without validation; callers are responsible for conformity.
            pub fn new(value: String) -> Self {
                Self(value)
            }

            /// Parses a validated identifier from a string.
            pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
                let s = value.into();
                if !Regex::new($pattern).expect("invalid regex").is_match(&s) {
                    return Err(ValidationError::PatternMismatch {
                        field: stringify!($name),
                        value: s,
                    });
                }
                Ok(Self(s))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

newtype!(
    UnitId,
    "Lowercase slug identifying a corpus unit (pattern: `[a-z0-9_]+`).",
    r"^[a-z0-9_]+$"
);
newtype!(
    PartitionName,
    "Name of a top-level lock-file partition such as `schools` or `foundations`.",
    r"^[A-Za-z0-9_]+$"
);
newtype!(
    Timestamp,
    "UTC RFC3339 timestamp with `Z` suffix.",
    r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d{1,9})?Z$"
);

impl Timestamp {
    /// Second-precision timestamp for `at`.
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(at.format("%Y-%m-%dT%H:%M:%SZ").to_string())
    }

    /// Compact `YYYYmmdd_HHMMSS` form used in receipt filenames.
    pub fn file_stamp(&self) -> String {
        self.0
            .split('.')
            .next()
            .unwrap_or_default()
            .chars()
            .map(|c| if c == 'T' { '_' } else { c })
            .filter(|c| c.is_ascii_digit() || *c == '_')
            .collect()
    }
}
