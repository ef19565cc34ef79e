//! Cascade statistics configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for the dataset layout and analysis parameters
//! - Built-in dataset presets
//! - Config path resolution (CLI → env → XDG → preset)
//! - Semantic validation

pub mod analysis;
pub mod dataset;
pub mod preset;
pub mod resolve;
pub mod validate;

pub use analysis::{EmbedConfig, EntropyConfig, SupportMode, TokenizerKind};
pub use dataset::{DatasetConfig, EdgeFile};
pub use preset::{get_preset, list_presets, PresetName};
pub use resolve::{resolve_config_path, ConfigSource};
pub use validate::{validate_config, ValidationError, ValidationResult};

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";

/// Complete configuration for one dataset.
///
/// Replaces the module-level dataset name / file-name maps of ad-hoc
/// scripts; every command receives this struct explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    pub dataset: DatasetConfig,

    #[serde(default)]
    pub entropy: EntropyConfig,

    #[serde(default)]
    pub embed: EmbedConfig,
}

fn default_schema_version() -> String {
    CONFIG_SCHEMA_VERSION.to_string()
}

impl Default for StatsConfig {
    fn default() -> Self {
        get_preset(PresetName::Pheme)
    }
}

impl StatsConfig {
    /// Load configuration from a TOML or JSON file (chosen by extension).
    pub fn from_file(path: &Path) -> ValidationResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::parse_json(&content),
            _ => Self::parse_toml(&content),
        }
    }

    /// Parse configuration from a TOML string.
    pub fn parse_toml(text: &str) -> ValidationResult<Self> {
        toml::from_str(text)
            .map_err(|e| ValidationError::ParseError(format!("Invalid TOML: {}", e)))
    }

    /// Parse configuration from a JSON string.
    pub fn parse_json(json: &str) -> ValidationResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// Render as TOML (used by `config show`).
    pub fn to_toml(&self) -> ValidationResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ValidationError::ParseError(format!("TOML encode failed: {}", e)))
    }
}
