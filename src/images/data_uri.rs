//! Parsing and building of base64 `data:` URIs.

use std::sync::OnceLock;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use regex::Regex;

/// A `data:<mime>;base64,<payload>` string split into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUri<'a> {
    pub mime_type: &'a str,
    pub payload: &'a str,
}

fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)\Adata:([^;,]+);base64,(.*)\z").expect("data URI pattern is valid")
    })
}

impl<'a> DataUri<'a> {
    /// Split `value` if it carries a complete `data:<mime>;base64,` prefix.
    ///
    /// Anything else, including strings that merely contain a comma, yields
    /// `None`.
    pub fn parse(value: &'a str) -> Option<Self> {
        let caps = pattern().captures(value)?;
        Some(Self {
            mime_type: caps.get(1)?.as_str(),
            payload: caps.get(2)?.as_str(),
        })
    }
}

/// Build a data URI embedding `bytes` with the given MIME type.
pub fn encode(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}
