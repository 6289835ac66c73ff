//! Record identifiers.
//!
//! Artwork records carry a `recordId` that was written by hand-maintained
//! JSON over time, so it may be either a JSON number or a JSON string. Both
//! forms are kept exactly as found so a rewrite never changes their encoding.

use serde::{Deserialize, Serialize};

/// Identifier of an artwork record, unique within a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// A JSON number, e.g. `12`.
    Number(serde_json::Number),
    /// A JSON string, e.g. `"12"` or `"A-17"`.
    Text(String),
}

impl RecordId {
    /// Whether this id renders to the given text.
    ///
    /// Used to match path segments such as `/api/artworks/12` against both
    /// numeric and string ids.
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Self::Number(n) => n.to_string() == text,
            Self::Text(s) => s == text,
        }
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for RecordId {
                fn from(n: $t) -> Self {
                    Self::Number(n.into())
                }
            }
        )*
    };
}

impl_from_integer!(i32, i64, u32, u64);

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}
