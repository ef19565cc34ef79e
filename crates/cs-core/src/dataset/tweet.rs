//! Tweet file timestamps.
//!
//! Only the `created_at` field of each tweet JSON is read; every other field
//! is ignored by the deserializer.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::DateTime;
use cs_common::{Error, Result};
use serde::Deserialize;

use crate::temporal::Timestamp;

#[derive(Debug, Deserialize)]
struct TweetTime {
    #[serde(default)]
    created_at: Option<String>,
}

/// Parse a `created_at` string with `format`.
pub fn parse_tweet_time(value: &str, format: &str) -> Result<Timestamp> {
    DateTime::parse_from_str(value.trim(), format).map_err(|e| Error::InvalidTimestamp {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Timestamp of one tweet file, or None when it has no `created_at`.
pub fn read_tweet_time(path: &Path, format: &str) -> Result<Option<Timestamp>> {
    let text = fs::read_to_string(path)?;
    let tweet: TweetTime = serde_json::from_str(&text)?;
    tweet
        .created_at
        .map(|value| parse_tweet_time(&value, format))
        .transpose()
}

/// `*.json` files of `dir`, sorted by file name.
pub fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
        if is_json && entry.file_type()?.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Timestamps of every tweet file in `dir`; files without `created_at` are skipped.
pub fn read_tweet_times(dir: &Path, format: &str) -> Result<Vec<Timestamp>> {
    let mut times = Vec::new();
    for path in json_files(dir)? {
        if let Some(t) = read_tweet_time(&path, format)? {
            times.push(t);
        }
    }
    Ok(times)
}
