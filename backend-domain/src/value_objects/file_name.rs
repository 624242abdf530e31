// Upload file name value object

use std::fmt;

use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

pub const ALLOWED_EXTENSIONS: &[&str] = &["xlsx"];
pub const PROCESSED_PREFIX: &str = "Processed_";

/// Checks the extension of the name as the client sent it.
pub fn has_allowed_extension(raw: &str) -> bool {
    match raw.rsplit_once('.') {
        Some((_, ext)) => ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str()),
        None => false,
    }
}

/// A file name that is safe to join onto a staging directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SafeFileName(String);

impl SafeFileName {
    /// Characters are NFKD-decomposed and folded to ASCII (accents dropped,
    /// other non-ASCII removed), path separators and whitespace
    /// runs become `_`, anything outside `[A-Za-z0-9_.-]` is removed and
    /// leading/trailing dots and underscores are stripped.
    pub fn sanitize(raw: &str) -> Option<Self> {
        let ascii: String = raw
            .nfkd()
            .filter(char::is_ascii)
            .map(|ch| if ch == '/' || ch == '\\' { ' ' } else { ch })
            .collect();
        let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
        let filtered: String = joined
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | '-'))
            .collect();
        let trimmed = filtered.trim_matches(|ch| ch == '.' || ch == '_');
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    /// Accepts the name only if sanitizing leaves it unchanged.
    pub fn parse_exact(raw: &str) -> Option<Self> {
        Self::sanitize(raw).filter(|safe| safe.0 == raw)
    }

    pub fn processed(&self) -> Self {
        Self(format!("{}{}", PROCESSED_PREFIX, self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SafeFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
