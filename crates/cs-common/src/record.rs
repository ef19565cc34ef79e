//! Output records persisted by analysis commands.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::id::CascadeId;

/// Smoothed temporal entropy of one cascade.
///
/// Serialized as `{"news_id": "...", "entropy": 0.97}`; an (event, class)
/// pair is written as a JSON array of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntropyRecord {
    /// Source post id of the cascade.
    pub news_id: CascadeId,
    /// Smoothed entropy in bits.
    pub entropy: f64,
}

impl EntropyRecord {
    pub fn new(news_id: CascadeId, entropy: f64) -> Self {
        Self { news_id, entropy }
    }
}

/// Node and edge counts of a heterogeneous graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Dataset name the counts were computed for.
    pub dataset: String,
    /// Distinct node ids per node type.
    pub nodes: BTreeMap<String, usize>,
    /// Edge lines per relation, keyed `"<source>-<target>"`.
    pub edges: BTreeMap<String, usize>,
}

impl GraphStats {
    /// Total distinct nodes across all types.
    pub fn total_nodes(&self) -> usize {
        self.nodes.values().sum()
    }

    /// Total edges across all relations.
    pub fn total_edges(&self) -> usize {
        self.edges.values().sum()
    }
}

/// Key used for a typed relation in [`GraphStats::edges`].
pub fn relation_key(source: &str, target: &str) -> String {
    format!("{}-{}", source, target)
}
