//! Built-in dataset presets.
//!
//! A preset is a complete [`StatsConfig`] for a known dataset layout.

use crate::analysis::{EmbedConfig, EntropyConfig};
use crate::dataset::{DatasetConfig, EdgeFile};
use crate::{StatsConfig, CONFIG_SCHEMA_VERSION};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Available configuration presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetName {
    /// PHEME rumour threads (news / post / user graph).
    Pheme,
}

impl PresetName {
    /// All available preset names.
    pub const ALL: &'static [PresetName] = &[PresetName::Pheme];

    /// Get preset name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PresetName::Pheme => "pheme",
        }
    }

    /// Parse preset name from string.
    pub fn parse(s: &str) -> Option<PresetName> {
        match s.to_lowercase().as_str() {
            "pheme" | "pheme-rnr" => Some(PresetName::Pheme),
            _ => None,
        }
    }

    /// Get a description of the preset.
    pub fn description(&self) -> &'static str {
        match self {
            PresetName::Pheme => {
                "PHEME rumour/non-rumour threads with news, post and user graph relations"
            }
        }
    }
}

impl fmt::Display for PresetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PresetName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PresetName::parse(s).ok_or_else(|| {
            format!(
                "Unknown preset '{}'. Available: {}",
                s,
                PresetName::ALL
                    .iter()
                    .map(|p| p.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
    }
}

/// Summary of a preset for listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetInfo {
    pub name: PresetName,
    pub description: String,
}

/// List all presets.
pub fn list_presets() -> Vec<PresetInfo> {
    PresetName::ALL
        .iter()
        .map(|&name| PresetInfo {
            name,
            description: name.description().to_string(),
        })
        .collect()
}

/// Get the configuration for a preset.
pub fn get_preset(name: PresetName) -> StatsConfig {
    match name {
        PresetName::Pheme => pheme_preset(),
    }
}

/// PHEME: `./PHEME/<event>-all-rnr-threads/...`, graph in `PHEME/graph_def`.
///
/// Reference node counts for the published graph: n=5802, p=97410, u=49778.
fn pheme_preset() -> StatsConfig {
    StatsConfig {
        schema_version: CONFIG_SCHEMA_VERSION.to_string(),
        dataset: DatasetConfig {
            name: "pheme".to_string(),
            prefix: "pheme_".to_string(),
            root: PathBuf::from("PHEME"),
            graph_dir: PathBuf::from("PHEME").join("graph_def"),
            node_types: vec!["n".to_string(), "p".to_string(), "u".to_string()],
            edge_files: vec![
                EdgeFile::new("n", "p", "PhemeNewsPost.txt"),
                EdgeFile::new("n", "u", "PhemeNewsUser.txt"),
                EdgeFile::new("p", "p", "PhemePostPost.txt"),
                EdgeFile::new("p", "u", "PhemePostUser.txt"),
                EdgeFile::new("u", "u", "PhemeUserUser.txt"),
            ],
        },
        entropy: EntropyConfig::default(),
        embed: EmbedConfig {
            model_name: "bertweet-base".to_string(),
            ..EmbedConfig::default()
        },
    }
}
