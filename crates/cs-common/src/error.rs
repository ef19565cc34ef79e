//! Error types for cascade statistics.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints for batch runs
//! - Remediation suggestions for humans
//!
//! # Human-Facing Output
//!
//! ```text
//! ✗ Invalid Timestamp
//!   Reason: invalid timestamp "yesterday": input contains invalid characters
//!   Fix: Check the created_at field of the tweet file.
//! ```
//!
//! # Machine-Facing Output
//!
//! ```json
//! {
//!   "code": 22,
//!   "category": "dataset",
//!   "message": "invalid timestamp \"yesterday\": input contains invalid characters",
//!   "recoverable": true,
//!   "suggested_action": "skip"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for cascade statistics operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Configuration file and preset errors.
    Config,
    /// Dataset layout and file content errors.
    Dataset,
    /// Entropy estimation input errors.
    Analysis,
    /// Text embedding errors.
    Embed,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Dataset => write!(f, "dataset"),
            ErrorCategory::Analysis => write!(f, "analysis"),
            ErrorCategory::Embed => write!(f, "embed"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Suggested follow-up for automation consuming structured errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    /// Retry the operation.
    Retry,
    /// Run `config validate`.
    RunCheck,
    /// Fix the offending input and rerun.
    FixInput,
    /// Skip this item and continue.
    Skip,
    /// Abort the run.
    Abort,
}

impl std::fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuggestedAction::Retry => write!(f, "retry"),
            SuggestedAction::RunCheck => write!(f, "run_check"),
            SuggestedAction::FixInput => write!(f, "fix_input"),
            SuggestedAction::Skip => write!(f, "skip"),
            SuggestedAction::Abort => write!(f, "abort"),
        }
    }
}

/// Unified error type for cascade statistics.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid value for {field}: {message}")]
    InvalidConfig { field: String, message: String },

    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    // Dataset errors (20-29)
    #[error("dataset path not found: {}", path.display())]
    DatasetNotFound { path: PathBuf },

    #[error("source tweet missing: {}", path.display())]
    MissingSourceTweet { path: PathBuf },

    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("malformed edge at {}:{line}", file.display())]
    MalformedEdge { file: PathBuf, line: usize },

    // Analysis errors (30-39)
    #[error("analysis failed: {0}")]
    Analysis(String),

    #[error("invalid interval: end time {end} precedes start time {start}")]
    InvalidInterval { start: String, end: String },

    #[error("invalid bucket width: {0} (must be positive)")]
    InvalidBucketWidth(String),

    #[error("invalid smoothing constant: {0} (must be positive and finite)")]
    InvalidSmoothing(f64),

    // Embedding errors (40-49)
    #[error("embedding failed: {0}")]
    Embed(String),

    #[error("unknown model: {0}")]
    UnknownModel(String),

    #[error("no in-process backend for model {model}")]
    BackendUnavailable { model: String },

    #[error("empty input: {0}")]
    EmptyInput(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Dataset errors
    /// - 30-39: Analysis errors
    /// - 40-49: Embedding errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidConfig { .. } => 11,
            Error::UnknownPreset(_) => 12,
            Error::DatasetNotFound { .. } => 20,
            Error::MissingSourceTweet { .. } => 21,
            Error::InvalidTimestamp { .. } => 22,
            Error::MalformedEdge { .. } => 23,
            Error::Analysis(_) => 30,
            Error::InvalidInterval { .. } => 31,
            Error::InvalidBucketWidth(_) => 32,
            Error::InvalidSmoothing(_) => 33,
            Error::Embed(_) => 40,
            Error::UnknownModel(_) => 41,
            Error::BackendUnavailable { .. } => 42,
            Error::EmptyInput(_) => 43,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::InvalidConfig { .. } | Error::UnknownPreset(_) => {
                ErrorCategory::Config
            }

            Error::DatasetNotFound { .. }
            | Error::MissingSourceTweet { .. }
            | Error::InvalidTimestamp { .. }
            | Error::MalformedEdge { .. } => ErrorCategory::Dataset,

            Error::Analysis(_)
            | Error::InvalidInterval { .. }
            | Error::InvalidBucketWidth(_)
            | Error::InvalidSmoothing(_) => ErrorCategory::Analysis,

            Error::Embed(_)
            | Error::UnknownModel(_)
            | Error::BackendUnavailable { .. }
            | Error::EmptyInput(_) => ErrorCategory::Embed,

            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether a batch run can continue past this error.
    ///
    /// Per-cascade data problems are recoverable (the cascade is skipped);
    /// configuration and caller-input errors are not.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Config(_) | Error::InvalidConfig { .. } | Error::UnknownPreset(_) => false,

            Error::DatasetNotFound { .. } => false,
            Error::MissingSourceTweet { .. } => true,
            Error::InvalidTimestamp { .. } => true,
            Error::MalformedEdge { .. } => false,

            Error::Analysis(_) => true,
            Error::InvalidInterval { .. } => true,
            Error::InvalidBucketWidth(_) => false,
            Error::InvalidSmoothing(_) => false,

            Error::Embed(_) => true,
            Error::UnknownModel(_) => false,
            Error::BackendUnavailable { .. } => false,
            Error::EmptyInput(_) => false,

            Error::Io(_) => true,
            Error::Json(_) => true,
        }
    }

    /// Returns the suggested action for automation.
    pub fn suggested_action(&self) -> SuggestedAction {
        match self {
            Error::Config(_) | Error::InvalidConfig { .. } => SuggestedAction::RunCheck,
            Error::UnknownPreset(_) => SuggestedAction::FixInput,

            Error::DatasetNotFound { .. } => SuggestedAction::FixInput,
            Error::MissingSourceTweet { .. } | Error::InvalidTimestamp { .. } => {
                SuggestedAction::Skip
            }
            Error::MalformedEdge { .. } => SuggestedAction::FixInput,

            Error::Analysis(_) | Error::InvalidInterval { .. } => SuggestedAction::Skip,
            Error::InvalidBucketWidth(_) | Error::InvalidSmoothing(_) => SuggestedAction::FixInput,

            Error::Embed(_) => SuggestedAction::Retry,
            Error::UnknownModel(_) | Error::EmptyInput(_) => SuggestedAction::FixInput,
            Error::BackendUnavailable { .. } => SuggestedAction::Abort,

            Error::Io(_) => SuggestedAction::Retry,
            Error::Json(_) => SuggestedAction::Skip,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) | Error::InvalidConfig { .. } => {
                "Run 'cs-core config validate' to check the configuration file."
            }
            Error::UnknownPreset(_) => "List available presets with 'cs-core config presets'.",

            Error::DatasetNotFound { .. } => {
                "Check --root / dataset.root and that the dataset is unpacked."
            }
            Error::MissingSourceTweet { .. } => {
                "The cascade directory has no source-tweet file; it is skipped."
            }
            Error::InvalidTimestamp { .. } => "Check the created_at field of the tweet file.",
            Error::MalformedEdge { .. } => {
                "Each edge line needs two whitespace-separated node ids."
            }

            Error::Analysis(_) | Error::InvalidInterval { .. } => {
                "The cascade has inconsistent timestamps; it is skipped."
            }
            Error::InvalidBucketWidth(_) => "Use a positive --bucket-hours value.",
            Error::InvalidSmoothing(_) => "Use a positive, finite --alpha value.",

            Error::Embed(_) => "Retry; if persistent, check the model file.",
            Error::UnknownModel(_) => "Use one of the supported model names (see --help).",
            Error::BackendUnavailable { .. } => {
                "Only word2vec runs in-process; serve transformer models externally."
            }
            Error::EmptyInput(_) => "Provide at least one text via arguments or --input.",

            Error::Io(_) => "Check paths and permissions, then retry.",
            Error::Json(_) => "The file is not valid JSON; inspect it with 'jq .'.",
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::InvalidConfig { .. } => "Invalid Configuration Value",
            Error::UnknownPreset(_) => "Unknown Preset",

            Error::DatasetNotFound { .. } => "Dataset Not Found",
            Error::MissingSourceTweet { .. } => "Missing Source Tweet",
            Error::InvalidTimestamp { .. } => "Invalid Timestamp",
            Error::MalformedEdge { .. } => "Malformed Edge File",

            Error::Analysis(_) => "Analysis Error",
            Error::InvalidInterval { .. } => "Invalid Interval",
            Error::InvalidBucketWidth(_) => "Invalid Bucket Width",
            Error::InvalidSmoothing(_) => "Invalid Smoothing Constant",

            Error::Embed(_) => "Embedding Error",
            Error::UnknownModel(_) => "Unknown Model",
            Error::BackendUnavailable { .. } => "Backend Unavailable",
            Error::EmptyInput(_) => "Empty Input",

            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Parse Error",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether a batch run can continue past the error.
    pub recoverable: bool,

    /// Suggested action for automation.
    pub suggested_action: SuggestedAction,

    /// Additional structured context (e.g., file path).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::DatasetNotFound { path } | Error::MissingSourceTweet { path } => {
                context.insert("path".to_string(), serde_json::json!(path));
            }
            Error::MalformedEdge { file, line } => {
                context.insert("path".to_string(), serde_json::json!(file));
                context.insert("line".to_string(), serde_json::json!(line));
            }
            Error::InvalidConfig { field, .. } => {
                context.insert("field".to_string(), serde_json::json!(field));
            }
            Error::BackendUnavailable { model } => {
                context.insert("model".to_string(), serde_json::json!(model));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            suggested_action: err.suggested_action(),
            context,
        }
    }
}

impl StructuredError {
    /// Add additional context to the error.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }

    /// Serialize to pretty JSON string.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_json())
    }
}

/// Result of a batch operation that may have partial success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult<T> {
    /// Successfully completed items.
    pub succeeded: Vec<T>,

    /// Failed items with their errors.
    pub failed: Vec<BatchError>,

    /// Summary statistics.
    pub summary: BatchSummary,
}

/// A single error in a batch operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchError {
    /// Identifier of the failed item (e.g. the cascade id).
    pub item_id: String,

    /// The structured error.
    pub error: StructuredError,
}

/// Summary of batch operation results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Total items attempted.
    pub total: usize,

    /// Number of successful items.
    pub succeeded: usize,

    /// Number of failed items.
    pub failed: usize,

    /// Whether all items succeeded.
    pub all_succeeded: bool,

    /// Whether any items succeeded.
    pub any_succeeded: bool,
}

impl<T> BatchResult<T> {
    /// Create a new batch result from succeeded and failed items.
    pub fn new(succeeded: Vec<T>, failed: Vec<BatchError>) -> Self {
        let total = succeeded.len() + failed.len();
        let succeeded_count = succeeded.len();
        let failed_count = failed.len();

        BatchResult {
            succeeded,
            failed,
            summary: BatchSummary {
                total,
                succeeded: succeeded_count,
                failed: failed_count,
                all_succeeded: failed_count == 0,
                any_succeeded: succeeded_count > 0,
            },
        }
    }

    /// Add a failure to the batch result.
    pub fn add_failure(&mut self, item_id: impl Into<String>, error: &Error) {
        self.failed.push(BatchError {
            item_id: item_id.into(),
            error: StructuredError::from(error),
        });
        self.summary.failed += 1;
        self.summary.total += 1;
        self.summary.all_succeeded = false;
    }

    /// Add a success to the batch result.
    pub fn add_success(&mut self, item: T) {
        self.succeeded.push(item);
        self.summary.succeeded += 1;
        self.summary.total += 1;
        self.summary.any_succeeded = true;
    }

    /// Merge another batch into this one.
    pub fn extend(&mut self, other: BatchResult<T>) {
        for item in other.succeeded {
            self.add_success(item);
        }
        for failure in other.failed {
            self.failed.push(failure);
            self.summary.failed += 1;
            self.summary.total += 1;
            self.summary.all_succeeded = false;
        }
    }
}

impl<T> Default for BatchResult<T> {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

/// Format an error for human-readable stderr output.
///
/// Output format:
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(Error::Config("test".into()).code(), 10);
        assert_eq!(Error::InvalidSmoothing(0.0).code(), 33);
        assert_eq!(
            Error::BackendUnavailable {
                model: "bertweet-base".into()
            }
            .code(),
            42
        );
    }

    #[test]
    fn test_error_category() {
        assert_eq!(Error::UnknownPreset("x".into()).category(), ErrorCategory::Config);
        assert_eq!(
            Error::MalformedEdge {
                file: "a.txt".into(),
                line: 3
            }
            .category(),
            ErrorCategory::Dataset
        );
        assert_eq!(
            Error::InvalidBucketWidth("0s".into()).category(),
            ErrorCategory::Analysis
        );
        assert_eq!(Error::EmptyInput("texts".into()).category(), ErrorCategory::Embed);
    }

    #[test]
    fn test_error_recoverable() {
        assert!(Error::InvalidTimestamp {
            value: "x".into(),
            reason: "bad".into()
        }
        .is_recoverable());
        assert!(!Error::InvalidSmoothing(-1.0).is_recoverable());
        assert!(!Error::Config("x".into()).is_recoverable());
    }

    #[test]
    fn test_structured_error_from_error() {
        let err = Error::MalformedEdge {
            file: PathBuf::from("graph/PhemeNewsPost.txt"),
            line: 7,
        };
        let structured = StructuredError::from(&err);

        assert_eq!(structured.code, 23);
        assert_eq!(structured.category, ErrorCategory::Dataset);
        assert!(!structured.recoverable);
        assert_eq!(structured.suggested_action, SuggestedAction::FixInput);
        assert_eq!(structured.context.get("line"), Some(&serde_json::json!(7)));
    }

    #[test]
    fn test_structured_error_json() {
        let err = Error::InvalidTimestamp {
            value: "yesterday".into(),
            reason: "input contains invalid characters".into(),
        };
        let json = StructuredError::from(&err).to_json();

        assert!(json.contains(r#""code":22"#));
        assert!(json.contains(r#""category":"dataset""#));
        assert!(json.contains(r#""recoverable":true"#));
        assert!(json.contains(r#""suggested_action":"skip""#));
    }

    #[test]
    fn test_batch_result() {
        let mut batch: BatchResult<String> = BatchResult::default();
        batch.add_success("552783667052167168".to_string());
        batch.add_failure(
            "552784600502915072",
            &Error::MissingSourceTweet {
                path: "x.json".into(),
            },
        );

        assert_eq!(batch.summary.total, 2);
        assert_eq!(batch.summary.succeeded, 1);
        assert_eq!(batch.summary.failed, 1);
        assert!(!batch.summary.all_succeeded);
        assert!(batch.summary.any_succeeded);
    }

    #[test]
    fn test_batch_extend() {
        let mut a: BatchResult<u32> = BatchResult::new(vec![1], Vec::new());
        let mut b: BatchResult<u32> = BatchResult::default();
        b.add_failure("2", &Error::Analysis("x".into()));
        a.extend(b);
        assert_eq!(a.summary.total, 2);
        assert_eq!(a.failed.len(), 1);
        assert!(!a.summary.all_succeeded);
    }

    #[test]
    fn test_format_error_human() {
        let out = format_error_human(&Error::UnknownPreset("weibo".into()), false);
        assert!(out.starts_with("✗ Unknown Preset"));
        assert!(out.contains("Reason: unknown preset: weibo"));
        assert!(out.contains("Fix: "));
    }
}
