//! Configuration loading for cs-core.
//!
//! Resolution order (highest priority first):
//! 1. `--config <FILE>`
//! 2. `--preset <NAME>`
//! 3. `CASCADE_STATS_CONFIG` / `CASCADE_STATS_CONFIG_DIR`
//! 4. `~/.config/cascade-stats/config.toml`
//! 5. The built-in `pheme` preset

pub use cs_config::preset::{get_preset, list_presets, PresetInfo, PresetName};
pub use cs_config::{ConfigSource, StatsConfig, ValidationError};

pub use cs_config::validate_config;

use cs_config::resolve_config_path;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to load {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },

    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),
}

impl ConfigError {
    /// Workspace error code.
    pub fn code(&self) -> u32 {
        match self {
            ConfigError::NotFound { .. } => 10,
            ConfigError::Load { source, .. } => source.code(),
            ConfigError::Validation(e) => e.code(),
        }
    }
}

impl From<ConfigError> for cs_common::Error {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation(ValidationError::InvalidValue { field, message }) => {
                cs_common::Error::InvalidConfig { field, message }
            }
            other => cs_common::Error::Config(other.to_string()),
        }
    }
}

/// Where the configuration came from.
#[derive(Debug, Default)]
pub struct ConfigOptions {
    /// Explicit config file.
    pub config_path: Option<PathBuf>,
    /// Preset to use when no file is given.
    pub preset: Option<PresetName>,
}

/// Loaded configuration with provenance.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: StatsConfig,
    /// File the config was read from (None for presets).
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
    /// SHA-256 of the file content.
    pub hash: Option<String>,
    pub preset: Option<PresetName>,
}

impl ResolvedConfig {
    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            source: self.source.to_string(),
            path: self.path.clone(),
            hash: self.hash.clone(),
            preset: self.preset.map(|p| p.as_str().to_string()),
            schema_version: self.config.schema_version.clone(),
            dataset: self.config.dataset.name.clone(),
        }
    }
}

/// Provenance summary attached to command output.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSnapshot {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    pub schema_version: String,
    pub dataset: String,
}

/// Resolve, parse and validate the configuration.
pub fn load_config(options: &ConfigOptions) -> Result<ResolvedConfig, ConfigError> {
    let resolved = resolve(options)?;
    validate_config(&resolved.config)?;
    Ok(resolved)
}

/// Resolve and parse the configuration without semantic checks.
pub fn resolve(options: &ConfigOptions) -> Result<ResolvedConfig, ConfigError> {
    if let Some(path) = &options.config_path {
        return load_file(path, ConfigSource::CliArgument);
    }
    if let Some(preset) = options.preset {
        return Ok(from_preset(preset));
    }
    match resolve_config_path(None) {
        (Some(path), source) => load_file(&path, source),
        (None, _) => Ok(from_preset(PresetName::Pheme)),
    }
}

fn from_preset(preset: PresetName) -> ResolvedConfig {
    ResolvedConfig {
        config: get_preset(preset),
        path: None,
        source: ConfigSource::BuiltinPreset,
        hash: None,
        preset: Some(preset),
    }
}

/// Load a config file without resolution.
pub fn load_file(path: &Path, source: ConfigSource) -> Result<ResolvedConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let bytes = std::fs::read(path).map_err(|e| ConfigError::Load {
        path: path.to_path_buf(),
        source: ValidationError::IoError(e.to_string()),
    })?;
    let config = StatsConfig::from_file(path).map_err(|source| ConfigError::Load {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(ResolvedConfig {
        config,
        path: Some(path.to_path_buf()),
        source,
        hash: Some(compute_hash(&bytes)),
        preset: None,
    })
}

/// Hex SHA-256 of config file content.
pub fn compute_hash(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_preset_option() {
        let resolved = load_config(&ConfigOptions {
            config_path: None,
            preset: Some(PresetName::Pheme),
        })
        .unwrap();
        assert_eq!(resolved.source, ConfigSource::BuiltinPreset);
        assert_eq!(resolved.config.dataset.name, "pheme");
        assert!(resolved.hash.is_none());
    }

    #[test]
    fn test_explicit_file_wins_and_is_hashed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cfg.toml");
        fs::write(
            &path,
            r#"
[dataset]
name = "toy"
root = "data"
graph_dir = "data/graph"
node_types = ["n"]
"#,
        )
        .unwrap();
        let resolved = load_config(&ConfigOptions {
            config_path: Some(path.clone()),
            preset: Some(PresetName::Pheme),
        })
        .unwrap();
        assert_eq!(resolved.config.dataset.name, "toy");
        assert_eq!(resolved.source, ConfigSource::CliArgument);
        assert_eq!(resolved.hash.as_deref().map(str::len), Some(64));
        assert_eq!(resolved.snapshot().path, Some(path));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = load_config(&ConfigOptions {
            config_path: Some(PathBuf::from("/nonexistent/cs.toml")),
            preset: None,
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
        assert_eq!(err.code(), 10);
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cfg.toml");
        fs::write(
            &path,
            r#"
[dataset]
name = "toy"
root = "data"
graph_dir = "data/graph"
node_types = ["n"]

[entropy]
alpha = -1.0
"#,
        )
        .unwrap();
        let err = load_config(&ConfigOptions {
            config_path: Some(path),
            preset: None,
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        let common: cs_common::Error = err.into();
        assert_eq!(common.code(), 11);
    }

    #[test]
    fn test_hash_is_stable() {
        assert_eq!(
            compute_hash(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
