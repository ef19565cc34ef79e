//! Analysis parameters: temporal entropy and text embedding.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default bucket width: 6 hours.
pub const DEFAULT_BUCKET_WIDTH_SECS: u64 = 6 * 60 * 60;

/// Default padding added after the last reaction: 1 day.
pub const DEFAULT_END_PADDING_SECS: u64 = 24 * 60 * 60;

/// Largest accepted end padding: 365 days.
pub const MAX_END_PADDING_SECS: u64 = 365 * 24 * 60 * 60;

/// Twitter API v1 `created_at` format, e.g. `Wed Jan 07 11:07:51 +0000 2015`.
pub const TWITTER_TIME_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Model names the embedding layer recognizes.
pub const KNOWN_MODELS: &[&str] = &[
    "word2vec",
    "xlm-roberta-base",
    "xlm-roberta-large",
    "bertweet-base",
    "t5-base-finetuned-summarize-news",
    "buzz-article-gpt-2",
];

/// Which buckets the smoothing mass is spread over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportMode {
    /// Only buckets that received at least one event.
    #[default]
    Observed,
    /// Every bucket tiling the cascade window, empty ones included.
    Full,
}

impl std::fmt::Display for SupportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SupportMode::Observed => write!(f, "observed"),
            SupportMode::Full => write!(f, "full"),
        }
    }
}

impl std::str::FromStr for SupportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "observed" | "sparse" => Ok(SupportMode::Observed),
            "full" | "dense" => Ok(SupportMode::Full),
            _ => Err(format!("unknown support mode: {}", s)),
        }
    }
}

/// Temporal entropy parameters and the cascade directory layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntropyConfig {
    #[serde(default = "default_bucket_width_secs")]
    pub bucket_width_secs: u64,

    #[serde(default = "default_alpha")]
    pub alpha: f64,

    #[serde(default)]
    pub support: SupportMode,

    /// Window end = last reaction + this padding.
    #[serde(default = "default_end_padding_secs")]
    pub end_padding_secs: u64,

    /// Suffix identifying event folders under the dataset root.
    #[serde(default = "default_event_suffix")]
    pub event_suffix: String,

    /// Annotation class directories inside each event folder.
    #[serde(default = "default_classes")]
    pub classes: Vec<String>,

    #[serde(default = "default_source_dir")]
    pub source_dir: String,

    #[serde(default = "default_reactions_dir")]
    pub reactions_dir: String,

    /// Directory entries skipped while listing cascades.
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,

    #[serde(default = "default_time_format")]
    pub timestamp_format: String,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_bucket_width_secs() -> u64 {
    DEFAULT_BUCKET_WIDTH_SECS
}

fn default_alpha() -> f64 {
    1.0
}

fn default_end_padding_secs() -> u64 {
    DEFAULT_END_PADDING_SECS
}

fn default_event_suffix() -> String {
    "-all-rnr-threads".to_string()
}

fn default_classes() -> Vec<String> {
    vec!["rumours".to_string(), "non-rumours".to_string()]
}

fn default_source_dir() -> String {
    "source-tweet".to_string()
}

fn default_reactions_dir() -> String {
    "reactions".to_string()
}

fn default_ignore() -> Vec<String> {
    vec![".DS_Store".to_string()]
}

fn default_time_format() -> String {
    TWITTER_TIME_FORMAT.to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("entropy")
}

impl Default for EntropyConfig {
    fn default() -> Self {
        EntropyConfig {
            bucket_width_secs: default_bucket_width_secs(),
            alpha: default_alpha(),
            support: SupportMode::default(),
            end_padding_secs: default_end_padding_secs(),
            event_suffix: default_event_suffix(),
            classes: default_classes(),
            source_dir: default_source_dir(),
            reactions_dir: default_reactions_dir(),
            ignore: default_ignore(),
            timestamp_format: default_time_format(),
            output_dir: default_output_dir(),
        }
    }
}

/// Tokenizer used ahead of the word2vec lookup and for length statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerKind {
    /// Split on Unicode whitespace.
    #[default]
    Whitespace,
    /// One token per character (unsegmented scripts such as Chinese).
    Char,
}

impl std::fmt::Display for TokenizerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenizerKind::Whitespace => write!(f, "whitespace"),
            TokenizerKind::Char => write!(f, "char"),
        }
    }
}

impl std::str::FromStr for TokenizerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "whitespace" | "ws" => Ok(TokenizerKind::Whitespace),
            "char" | "chars" => Ok(TokenizerKind::Char),
            _ => Err(format!("unknown tokenizer: {}", s)),
        }
    }
}

/// Text embedding parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedConfig {
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Model location; defaults to the model name when unset.
    #[serde(default)]
    pub model_path: Option<PathBuf>,

    #[serde(default = "default_max_seq_len")]
    pub max_seq_len: usize,

    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default)]
    pub tokenizer: TokenizerKind,
}

fn default_model_name() -> String {
    "word2vec".to_string()
}

fn default_max_seq_len() -> usize {
    49
}

fn default_batch_size() -> usize {
    32
}

impl Default for EmbedConfig {
    fn default() -> Self {
        EmbedConfig {
            model_name: default_model_name(),
            model_path: None,
            max_seq_len: default_max_seq_len(),
            batch_size: default_batch_size(),
            tokenizer: TokenizerKind::default(),
        }
    }
}

impl EmbedConfig {
    /// Resolved model location: explicit path or the model name itself.
    pub fn resolved_model_path(&self) -> PathBuf {
        self.model_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.model_name))
    }
}
