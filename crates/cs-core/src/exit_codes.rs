//! Process exit codes for the `cs-core` CLI.
//!
//! Ranges:
//! - 0-1: run outcomes
//! - 10-19: user or environment errors (fixable by the caller)
//! - 20-29: internal and I/O errors

use cs_common::{Error, ErrorCategory};

/// Exit codes for cs-core operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Every item processed.
    Clean = 0,

    /// Output written, but some cascades failed and were skipped.
    PartialFail = 1,

    /// Invalid arguments or configuration.
    ArgsError = 10,

    /// Dataset root or graph directory missing.
    DatasetError = 11,

    /// Requested embedding backend cannot run in-process.
    BackendUnavailable = 12,

    /// Internal error (bug).
    InternalError = 20,

    IoError = 21,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Clean)
    }

    /// Codes 10-19: resolvable by the caller.
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&(self as i32))
    }

    /// Stable name for JSON output.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::PartialFail => "ERR_PARTIAL",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::DatasetError => "ERR_DATASET",
            ExitCode::BackendUnavailable => "ERR_BACKEND",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }

    /// Exit code for a fatal error.
    pub fn for_error(err: &Error) -> ExitCode {
        match err {
            Error::DatasetNotFound { .. } | Error::MalformedEdge { .. } => ExitCode::DatasetError,
            Error::BackendUnavailable { .. } => ExitCode::BackendUnavailable,
            Error::Io(_) => ExitCode::IoError,
            _ => match err.category() {
                ErrorCategory::Config | ErrorCategory::Analysis => ExitCode::ArgsError,
                ErrorCategory::Embed => ExitCode::ArgsError,
                ErrorCategory::Dataset => ExitCode::DatasetError,
                ErrorCategory::Io => ExitCode::InternalError,
            },
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
