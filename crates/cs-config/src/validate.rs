//! Configuration validation errors and semantic validation.

use crate::analysis::{KNOWN_MODELS, MAX_END_PADDING_SECS};
use crate::StatsConfig;
use std::collections::HashSet;
use thiserror::Error;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SemanticError(_) => 13,
            ValidationError::MissingField(_) => 14,
            ValidationError::InvalidValue { .. } => 11,
            ValidationError::VersionMismatch { .. } => 15,
        }
    }
}

fn invalid(field: &str, message: impl Into<String>) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Validate a full configuration semantically.
pub fn validate_config(config: &StatsConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    validate_dataset(config)?;
    validate_entropy(config)?;
    validate_embed(config)?;
    Ok(())
}

fn validate_dataset(config: &StatsConfig) -> ValidationResult<()> {
    let dataset = &config.dataset;

    if dataset.name.trim().is_empty() {
        return Err(ValidationError::MissingField("dataset.name".to_string()));
    }
    if dataset.node_types.is_empty() {
        return Err(ValidationError::MissingField(
            "dataset.node_types".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for t in &dataset.node_types {
        if t.trim().is_empty() {
            return Err(invalid("dataset.node_types", "node type names must be non-empty"));
        }
        if !seen.insert(t.as_str()) {
            return Err(invalid(
                "dataset.node_types",
                format!("duplicate node type '{}'", t),
            ));
        }
    }

    for (i, edge) in dataset.edge_files.iter().enumerate() {
        for endpoint in [&edge.source, &edge.target] {
            if !dataset.has_node_type(endpoint) {
                return Err(ValidationError::SemanticError(format!(
                    "dataset.edge_files[{}] ({}) references undeclared node type '{}'",
                    i, edge.file, endpoint
                )));
            }
        }
        if edge.file.trim().is_empty() {
            return Err(invalid(
                &format!("dataset.edge_files[{}].file", i),
                "file name must be non-empty",
            ));
        }
    }

    Ok(())
}

fn validate_entropy(config: &StatsConfig) -> ValidationResult<()> {
    let entropy = &config.entropy;

    if entropy.bucket_width_secs == 0 {
        return Err(invalid("entropy.bucket_width_secs", "must be > 0"));
    }
    if !entropy.alpha.is_finite() || entropy.alpha <= 0.0 {
        return Err(invalid(
            "entropy.alpha",
            format!("must be positive and finite, got {}", entropy.alpha),
        ));
    }
    if entropy.end_padding_secs > MAX_END_PADDING_SECS {
        return Err(invalid(
            "entropy.end_padding_secs",
            format!(
                "must be at most {} seconds, got {}",
                MAX_END_PADDING_SECS, entropy.end_padding_secs
            ),
        ));
    }
    if entropy.classes.is_empty() {
        return Err(ValidationError::MissingField("entropy.classes".to_string()));
    }
    if entropy.timestamp_format.trim().is_empty() {
        return Err(invalid("entropy.timestamp_format", "must be non-empty"));
    }
    if entropy.source_dir.trim().is_empty() || entropy.reactions_dir.trim().is_empty() {
        return Err(invalid(
            "entropy.source_dir",
            "source and reactions directory names must be non-empty",
        ));
    }

    Ok(())
}

fn validate_embed(config: &StatsConfig) -> ValidationResult<()> {
    let embed = &config.embed;

    if !KNOWN_MODELS.contains(&embed.model_name.as_str()) {
        return Err(invalid(
            "embed.model_name",
            format!(
                "unknown model '{}', expected one of: {}",
                embed.model_name,
                KNOWN_MODELS.join(", ")
            ),
        ));
    }
    if embed.max_seq_len == 0 {
        return Err(invalid("embed.max_seq_len", "must be > 0"));
    }
    if embed.batch_size == 0 {
        return Err(invalid("embed.batch_size", "must be > 0"));
    }

    Ok(())
}
