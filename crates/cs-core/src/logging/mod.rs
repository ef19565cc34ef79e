//! Structured logging for cs-core.
//!
//! Two output modes, both on stderr so stdout stays reserved for payloads:
//! - human-readable console lines for interactive use
//! - JSONL for pipelines and batch jobs
//!
//! # Usage
//!
//! ```ignore
//! use cs_core::logging::{init_logging, LogConfig, LogContext, Stage, event_names};
//! use cs_core::log_event;
//!
//! init_logging(&LogConfig::from_env(None, None));
//! let ctx = LogContext::for_dataset("pheme");
//! log_event!(ctx, INFO, event_names::RUN_STARTED, Stage::Init, "starting entropy run");
//! ```

pub mod config;
pub mod events;
pub mod layer;

pub use config::{LogConfig, LogFormat, LogLevel};
pub use events::{event_names, Level, LogContext, Stage};
pub use layer::JsonlLayer;

use std::io::IsTerminal;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::fmt;

/// Install the global subscriber.
///
/// Call once at startup. A second call is ignored.
pub fn init_logging(config: &LogConfig) {
    let filter = LevelFilter::from(config.level);

    match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(use_ansi);

            if config.timestamps {
                let _ = tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer)
                    .try_init();
            } else {
                let _ = tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.without_time())
                    .try_init();
            }
        }
        LogFormat::Jsonl => {
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(JsonlLayer::stderr())
                .try_init();
        }
    }
}

/// Emit an event with the run's correlation fields.
///
/// ```ignore
/// log_event!(ctx, INFO, "records.written", Stage::Write, "wrote entropy file",
///     path = %path.display(), records = 12u64);
/// ```
#[macro_export]
macro_rules! log_event {
    (@emit $level:ident, $ctx:expr, $event:expr, $stage:expr, $msg:expr $(, $($fields:tt)+)?) => {
        tracing::$level!(
            target: $event,
            run_id = %$ctx.run_id,
            dataset = %$ctx.dataset,
            stage = %$stage,
            $($($fields)+,)?
            message = $msg,
        )
    };
    ($ctx:expr, INFO, $event:expr, $stage:expr, $msg:expr $(, $($fields:tt)+)?) => {
        $crate::log_event!(@emit info, $ctx, $event, $stage, $msg $(, $($fields)+)?)
    };
    ($ctx:expr, DEBUG, $event:expr, $stage:expr, $msg:expr $(, $($fields:tt)+)?) => {
        $crate::log_event!(@emit debug, $ctx, $event, $stage, $msg $(, $($fields)+)?)
    };
    ($ctx:expr, WARN, $event:expr, $stage:expr, $msg:expr $(, $($fields:tt)+)?) => {
        $crate::log_event!(@emit warn, $ctx, $event, $stage, $msg $(, $($fields)+)?)
    };
    ($ctx:expr, ERROR, $event:expr, $stage:expr, $msg:expr $(, $($fields:tt)+)?) => {
        $crate::log_event!(@emit error, $ctx, $event, $stage, $msg $(, $($fields)+)?)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.format, LogFormat::Human);
        assert_eq!(config.level, LogLevel::Info);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        let config = LogConfig::default().with_level(LogLevel::Off);
        init_logging(&config);
        init_logging(&config.with_format(LogFormat::Jsonl));
    }

    #[test]
    fn test_log_event_macro_compiles_with_fields() {
        let ctx = LogContext::new("cs-20260115-143022-a7xq", "pheme");
        let path = std::path::PathBuf::from("entropy/x.json");
        log_event!(ctx, INFO, event_names::RECORDS_WRITTEN, Stage::Write, "wrote",
            path = %path.display(), records = 2u64);
        log_event!(ctx, DEBUG, event_names::SCAN_EVENT, Stage::Scan, "scanning");
    }
}
