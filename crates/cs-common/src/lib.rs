//! Cascade statistics common types, IDs, and errors.
//!
//! This crate provides foundational types shared across cs-core modules:
//! - Cascade and run identifiers
//! - Common error types with stable codes
//! - Output records (entropy records, graph statistics)
//! - Output formats

pub mod error;
pub mod id;
pub mod output;
pub mod record;
pub mod schema;

pub use error::{
    format_error_human, BatchError, BatchResult, BatchSummary, Error, ErrorCategory, Result,
    StructuredError, SuggestedAction,
};
pub use id::{CascadeId, RunId};
pub use output::OutputFormat;
pub use record::{EntropyRecord, GraphStats};
pub use schema::SCHEMA_VERSION;
