//! Structured event vocabulary for logging.
//!
//! Every event carries the run id, the dataset name and a stage, so JSONL
//! logs of a batch run can be filtered per cascade or per phase.

use cs_common::RunId;
use serde::{Deserialize, Serialize};

/// Log levels as serialized in JSONL output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Level::Trace,
            tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::ERROR => Level::Error,
        }
    }
}

/// Phases of a cascade-stats run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup and configuration.
    Init,
    /// Walking the dataset tree.
    Scan,
    /// Per-cascade entropy estimation.
    Analyze,
    /// Graph node and edge counting.
    Graph,
    /// Model loading and text embedding.
    Embed,
    /// Writing output files.
    Write,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Scan => "scan",
            Stage::Analyze => "analyze",
            Stage::Graph => "graph",
            Stage::Embed => "embed",
            Stage::Write => "write",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names, used as the tracing target.
pub mod event_names {
    // Run lifecycle
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";
    pub const RUN_FAILED: &str = "run.failed";

    // Config
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";
    pub const CONFIG_ERROR: &str = "config.error";

    // Dataset walk
    pub const SCAN_EVENT: &str = "scan.event";
    pub const SCAN_CLASS_MISSING: &str = "scan.class_missing";

    // Per-cascade analysis
    pub const CASCADE_ANALYZED: &str = "cascade.analyzed";
    pub const CASCADE_SKIPPED: &str = "cascade.skipped";
    pub const CASCADE_FAILED: &str = "cascade.failed";

    // Output
    pub const RECORDS_WRITTEN: &str = "records.written";

    // Graph
    pub const GRAPH_FILE_COUNTED: &str = "graph.file_counted";
    pub const GRAPH_COUNTED: &str = "graph.counted";

    // Embedding
    pub const EMBED_MODEL_LOADED: &str = "embed.model_loaded";
    pub const EMBED_BATCH: &str = "embed.batch";
}

/// Correlation fields shared by every event of one run.
#[derive(Debug, Clone)]
pub struct LogContext {
    pub run_id: String,
    pub dataset: String,
}

impl LogContext {
    pub fn new(run_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        LogContext {
            run_id: run_id.into(),
            dataset: dataset.into(),
        }
    }

    /// Context with a freshly generated run id.
    pub fn for_dataset(dataset: impl Into<String>) -> Self {
        Self::new(RunId::new().to_string(), dataset)
    }

    /// Same run, different dataset.
    pub fn with_dataset(mut self, dataset: impl Into<String>) -> Self {
        self.dataset = dataset.into();
        self
    }
}
