//! Command payloads and their rendering.
//!
//! Every payload is wrapped in an [`Envelope`] carrying the schema version,
//! run id and generation time. `json` pretty-prints the envelope, `jsonl`
//! writes it on one line, `md` and `summary` go through [`HumanReport`].

use std::fmt::Write as _;
use std::path::PathBuf;

use cs_common::{Error, GraphStats, OutputFormat, StructuredError, SCHEMA_VERSION};
use cs_config::{PresetName, StatsConfig, SupportMode, TokenizerKind};
use serde::Serialize;

use crate::config::{ConfigSnapshot, PresetInfo};
use crate::dataset::AnalysisReport;
use crate::embed::{ModelName, SeqLenStats};

/// Human renderings of a payload.
pub trait HumanReport {
    /// Markdown body (without the command heading).
    fn markdown(&self) -> String;

    /// One line, no trailing newline.
    fn summary(&self) -> String;
}

/// Common wrapper of all command payloads.
#[derive(Debug, Serialize)]
pub struct Envelope<'a, T: Serialize> {
    pub schema_version: &'static str,
    pub run_id: &'a str,
    pub generated_at: String,
    pub command: &'a str,
    #[serde(flatten)]
    pub body: &'a T,
}

impl<'a, T: Serialize> Envelope<'a, T> {
    pub fn new(run_id: &'a str, command: &'a str, body: &'a T) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            run_id,
            generated_at: chrono::Utc::now().to_rfc3339(),
            command,
            body,
        }
    }
}

/// Render a payload in `format`.
pub fn render<T>(format: OutputFormat, run_id: &str, command: &str, body: &T) -> Result<String, Error>
where
    T: Serialize + HumanReport,
{
    let envelope = Envelope::new(run_id, command, body);
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(&envelope)?,
        OutputFormat::Jsonl => serde_json::to_string(&envelope)?,
        OutputFormat::Md => format!(
            "# cs-core {}\n\n{}\nRun: {}",
            command,
            body.markdown(),
            run_id
        ),
        OutputFormat::Summary => format!("[{}] {}: {}", run_id, command, body.summary()),
    })
}

/// Render a failed command. Machine formats get the structured error.
pub fn render_error(format: OutputFormat, run_id: &str, command: &str, err: &Error) -> String {
    match format {
        OutputFormat::Json | OutputFormat::Jsonl => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "run_id": run_id,
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "command": command,
                "status": "error",
                "error": StructuredError::from(err),
            });
            let text = if format == OutputFormat::Json {
                serde_json::to_string_pretty(&response)
            } else {
                serde_json::to_string(&response)
            };
            text.unwrap_or_else(|_| StructuredError::from(err).to_json())
        }
        OutputFormat::Summary => format!("[{}] {} error {}: {}", run_id, command, err.code(), err),
        OutputFormat::Md => cs_common::format_error_human(err, false),
    }
}

/// Parameters an entropy run actually used.
#[derive(Debug, Clone, Serialize)]
pub struct EntropyParams {
    pub bucket_width_secs: u64,
    pub alpha: f64,
    pub support: SupportMode,
    pub end_padding_secs: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntropyOutput {
    pub config: ConfigSnapshot,
    pub parameters: EntropyParams,
    pub report: AnalysisReport,
}

impl HumanReport for EntropyOutput {
    fn markdown(&self) -> String {
        let r = &self.report;
        let mut out = String::new();
        let _ = writeln!(out, "Root: {}", r.root.display());
        let _ = writeln!(out, "Output: {}", r.output_dir.display());
        let _ = writeln!(
            out,
            "Bucket width: {}s, alpha: {}, support: {}",
            self.parameters.bucket_width_secs, self.parameters.alpha, self.parameters.support
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "| event | class | records | skipped | failed |");
        let _ = writeln!(out, "|---|---|---|---|---|");
        for f in &r.files {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} |",
                f.event, f.class, f.records, f.skipped, f.failed
            );
        }
        if !r.missing_classes.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Missing classes: {}", r.missing_classes.join(", "));
        }
        if !r.batch.failed.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "## Failures");
            for failure in &r.batch.failed {
                let _ = writeln!(out, "- {}: {}", failure.item_id, failure.error.message);
            }
        }
        out
    }

    fn summary(&self) -> String {
        let r = &self.report;
        format!(
            "{} records in {} files ({} skipped, {} failed)",
            r.records(),
            r.files.len(),
            r.skipped,
            r.batch.failed.len()
        )
    }
}

impl HumanReport for GraphStats {
    fn markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Dataset: {}", self.dataset);
        let _ = writeln!(out);
        let _ = writeln!(out, "| node type | count |");
        let _ = writeln!(out, "|---|---|");
        for (node_type, count) in &self.nodes {
            let _ = writeln!(out, "| {} | {} |", node_type, count);
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "| relation | edges |");
        let _ = writeln!(out, "|---|---|");
        for (relation, count) in &self.edges {
            let _ = writeln!(out, "| {} | {} |", relation, count);
        }
        out
    }

    fn summary(&self) -> String {
        let nodes: Vec<String> = self
            .nodes
            .iter()
            .map(|(t, n)| format!("{}={}", t, n))
            .collect();
        format!(
            "{} nodes ({}), {} edges",
            self.total_nodes(),
            nodes.join(" "),
            self.total_edges()
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedOutput {
    pub model: ModelName,
    /// `[texts, max_seq_len, embed_dim]`
    pub shape: [usize; 3],
    /// One flattened `max_seq_len × embed_dim` row per text.
    pub embeddings: Vec<Vec<f32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Vec<Vec<String>>>,
}

impl HumanReport for EmbedOutput {
    fn markdown(&self) -> String {
        let [n, seq, dim] = self.shape;
        let mut out = String::new();
        let _ = writeln!(out, "Model: {}", self.model);
        let _ = writeln!(out, "Shape: {} × {} × {}", n, seq, dim);
        if let Some(tokens) = &self.tokens {
            let _ = writeln!(out);
            for (i, t) in tokens.iter().enumerate() {
                let _ = writeln!(out, "{}. {}", i + 1, t.join(" "));
            }
        }
        out
    }

    fn summary(&self) -> String {
        let [n, seq, dim] = self.shape;
        format!("{} embedded {} texts to {}x{}", self.model, n, seq, dim)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SeqStatsOutput {
    pub texts: usize,
    pub tokenizer: TokenizerKind,
    pub batch_size: usize,
    pub stats: SeqLenStats,
}

impl HumanReport for SeqStatsOutput {
    fn markdown(&self) -> String {
        let s = &self.stats;
        let mut out = String::new();
        let _ = writeln!(out, "Texts: {} (tokenizer: {})", self.texts, self.tokenizer);
        let _ = writeln!(out);
        let _ = writeln!(out, "| mean | std | min | max |");
        let _ = writeln!(out, "|---|---|---|---|");
        let _ = writeln!(out, "| {:.3} | {:.3} | {} | {} |", s.mean, s.std, s.min, s.max);
        out
    }

    fn summary(&self) -> String {
        let s = &self.stats;
        format!(
            "{} texts, mean {:.2}, std {:.2}, min {}, max {}",
            self.texts, s.mean, s.std, s.min, s.max
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigShowOutput {
    pub source: ConfigSnapshot,
    pub values: StatsConfig,
}

impl HumanReport for ConfigShowOutput {
    fn markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Source: {}", self.source.source);
        if let Some(path) = &self.source.path {
            let _ = writeln!(out, "Path: {}", path.display());
            let _ = writeln!(out, "Hash: {}", self.source.hash.as_deref().unwrap_or("n/a"));
        }
        if let Some(preset) = &self.source.preset {
            let _ = writeln!(out, "Preset: {}", preset);
        }
        let _ = writeln!(out);
        match self.values.to_toml() {
            Ok(text) => {
                let _ = writeln!(out, "```toml\n{}```", text);
            }
            Err(e) => {
                let _ = writeln!(out, "(could not render TOML: {})", e);
            }
        }
        out
    }

    fn summary(&self) -> String {
        let origin = self
            .source
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .or_else(|| self.source.preset.clone())
            .unwrap_or_else(|| "defaults".to_string());
        format!("dataset={} source={}", self.source.dataset, origin)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigValidateOutput {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<PresetName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HumanReport for ConfigValidateOutput {
    fn markdown(&self) -> String {
        let target = match (&self.path, self.preset) {
            (Some(path), _) => path.display().to_string(),
            (None, Some(preset)) => format!("preset {}", preset),
            (None, None) => "configuration".to_string(),
        };
        match &self.error {
            None => format!("{}: valid\n", target),
            Some(error) => format!("{}: invalid\n\n{}\n", target, error),
        }
    }

    fn summary(&self) -> String {
        match &self.error {
            None => "valid".to_string(),
            Some(error) => format!("invalid: {}", error),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PresetsOutput {
    pub presets: Vec<PresetInfo>,
}

impl HumanReport for PresetsOutput {
    fn markdown(&self) -> String {
        let mut out = String::new();
        for p in &self.presets {
            let _ = writeln!(out, "- **{}**: {}", p.name, p.description);
        }
        out
    }

    fn summary(&self) -> String {
        let names: Vec<&str> = self.presets.iter().map(|p| p.name.as_str()).collect();
        names.join(", ")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VersionOutput {
    pub cs_core_version: &'static str,
    pub rust_version: &'static str,
}

impl Default for VersionOutput {
    fn default() -> Self {
        Self {
            cs_core_version: env!("CARGO_PKG_VERSION"),
            rust_version: env!("CARGO_PKG_RUST_VERSION"),
        }
    }
}

impl HumanReport for VersionOutput {
    fn markdown(&self) -> String {
        format!(
            "cs-core {}\nschema version: {}\n",
            self.cs_core_version, SCHEMA_VERSION
        )
    }

    fn summary(&self) -> String {
        format!("cs-core {}", self.cs_core_version)
    }
}
