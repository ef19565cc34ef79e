//! Cascade and run identity types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a cascade: the id of its source post.
///
/// In PHEME this is the tweet id, which is also the name of the cascade
/// directory and of the source tweet file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CascadeId(pub String);

impl CascadeId {
    /// Parse and validate a cascade id.
    ///
    /// Rejects empty strings, path separators, and dot-prefixed names
    /// (`.DS_Store` and similar filesystem litter).
    pub fn parse(s: &str) -> Option<Self> {
        if s.is_empty() || s.starts_with('.') {
            return None;
        }
        if s.contains('/') || s.contains('\\') {
            return None;
        }
        Some(CascadeId(s.to_string()))
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CascadeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Run ID correlating all log events of one invocation.
///
/// Format: `cs-YYYYMMDD-HHMMSS-XXXX`
/// Example: `cs-20260115-143022-a7xq`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub String);

impl RunId {
    /// Generate a new run ID.
    pub fn new() -> Self {
        let now = chrono::Utc::now();
        let suffix = generate_base32_suffix();
        RunId(format!(
            "cs-{}-{}-{}",
            now.format("%Y%m%d"),
            now.format("%H%M%S"),
            suffix
        ))
    }

    /// Parse an existing run ID string.
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() != 23 {
            return None;
        }
        let bytes = s.as_bytes();
        if !s.starts_with("cs-")
            || bytes.get(11) != Some(&b'-')
            || bytes.get(18) != Some(&b'-')
        {
            return None;
        }
        let date = &s[3..11];
        let time = &s[12..18];
        let suffix = &s[19..23];
        if !date.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        if !time.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        if !suffix.chars().all(|c| matches!(c, 'a'..='z' | '2'..='7')) {
            return None;
        }
        Some(RunId(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn generate_base32_suffix() -> String {
    let uuid = uuid::Uuid::new_v4();
    let bytes = uuid.as_bytes();
    let mut value = ((bytes[0] as u32) << 16) | ((bytes[1] as u32) << 8) | (bytes[2] as u32);
    value &= 0x000F_FFFF;
    let alphabet = b"abcdefghijklmnopqrstuvwxyz234567";
    let mut out = String::with_capacity(4);
    for shift in [15_u32, 10, 5, 0] {
        let idx = ((value >> shift) & 0x1F) as usize;
        out.push(alphabet[idx] as char);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_id_format() {
        let rid = RunId::new();
        assert!(rid.0.starts_with("cs-"));
        assert_eq!(rid.0.len(), 23);
        assert!(RunId::parse(&rid.0).is_some());
    }

    #[test]
    fn test_run_id_parse_rejects_garbage() {
        assert!(RunId::parse("xx-20260115-143022-a7xq").is_none());
        assert!(RunId::parse("cs-2026011x-143022-a7xq").is_none());
        assert!(RunId::parse("cs-20260115-143022-A7XQ").is_none());
        assert!(RunId::parse("").is_none());
    }

    #[test]
    fn test_cascade_id_parse() {
        assert_eq!(
            CascadeId::parse("552783667052167168").map(|c| c.0),
            Some("552783667052167168".to_string())
        );
        assert!(CascadeId::parse("").is_none());
        assert!(CascadeId::parse(".DS_Store").is_none());
        assert!(CascadeId::parse("a/b").is_none());
    }

    #[test]
    fn test_cascade_id_serializes_transparently() {
        let id = CascadeId("42".to_string());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"42\"");
        assert_eq!(id.to_string(), "42");
    }
}
