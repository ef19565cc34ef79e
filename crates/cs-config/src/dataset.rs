//! Dataset layout configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One typed edge list file of the heterogeneous graph.
///
/// Each line holds `<source id> <target id>`; the source id is a node of
/// `source` type and the target id of `target` type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeFile {
    pub source: String,
    pub target: String,
    /// File name relative to [`DatasetConfig::graph_dir`].
    pub file: String,
}

impl EdgeFile {
    pub fn new(source: &str, target: &str, file: &str) -> Self {
        EdgeFile {
            source: source.to_string(),
            target: target.to_string(),
            file: file.to_string(),
        }
    }
}

/// Where a dataset lives on disk and how its graph is typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Dataset name (reported in outputs).
    pub name: String,

    /// File-name prefix used by derived artifacts.
    #[serde(default)]
    pub prefix: String,

    /// Root directory holding the event folders.
    pub root: PathBuf,

    /// Directory holding the graph edge files.
    pub graph_dir: PathBuf,

    /// Node types, e.g. `n` (news), `p` (post), `u` (user).
    pub node_types: Vec<String>,

    /// Typed edge list files.
    #[serde(default)]
    pub edge_files: Vec<EdgeFile>,
}

impl DatasetConfig {
    /// Absolute-or-relative path of an edge file.
    pub fn edge_path(&self, edge: &EdgeFile) -> PathBuf {
        self.graph_dir.join(&edge.file)
    }

    /// Whether `node_type` is declared.
    pub fn has_node_type(&self, node_type: &str) -> bool {
        self.node_types.iter().any(|t| t == node_type)
    }
}
