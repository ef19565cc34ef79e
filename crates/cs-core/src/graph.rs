//! Node and edge counts of the heterogeneous news/post/user graph.
//!
//! Each edge file holds one edge per line, `<source id> <target id>`, with the
//! node types fixed by the file. Node counts are distinct ids per type across
//! all files.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use cs_common::record::relation_key;
use cs_common::{Error, GraphStats, Result};
use cs_config::dataset::{DatasetConfig, EdgeFile};

use crate::log_event;
use crate::logging::{event_names, LogContext, Stage};

/// Distinct node ids per type, filled from edge files.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    ids: HashMap<String, HashSet<String>>,
    edges: BTreeMap<String, usize>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read edges of `edge` from `reader`; `file` names the source in errors.
    ///
    /// Returns the number of edges read.
    pub fn add_edges<R: BufRead>(&mut self, edge: &EdgeFile, reader: R, file: &Path) -> Result<usize> {
        let mut count = 0;
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let mut tokens = line.split_whitespace();
            let Some(source) = tokens.next() else {
                continue;
            };
            let Some(target) = tokens.next() else {
                return Err(Error::MalformedEdge {
                    file: file.to_path_buf(),
                    line: index + 1,
                });
            };
            self.insert(&edge.source, source);
            self.insert(&edge.target, target);
            count += 1;
        }
        *self
            .edges
            .entry(relation_key(&edge.source, &edge.target))
            .or_insert(0) += count;
        Ok(count)
    }

    fn insert(&mut self, node_type: &str, id: &str) {
        let ids = self.ids.entry(node_type.to_string()).or_default();
        if !ids.contains(id) {
            ids.insert(id.to_string());
        }
    }

    /// Distinct ids seen for `node_type`.
    pub fn count(&self, node_type: &str) -> usize {
        self.ids.get(node_type).map_or(0, HashSet::len)
    }

    /// Final counts for `node_types`; types without edges report 0.
    pub fn into_stats(self, dataset: &str, node_types: &[String]) -> GraphStats {
        let nodes = node_types
            .iter()
            .map(|t| (t.clone(), self.count(t)))
            .collect();
        GraphStats {
            dataset: dataset.to_string(),
            nodes,
            edges: self.edges,
        }
    }
}

/// Count nodes and edges of every edge file in `dataset.graph_dir`.
pub fn compute_graph_stats(dataset: &DatasetConfig, ctx: &LogContext) -> Result<GraphStats> {
    if !dataset.graph_dir.is_dir() {
        return Err(Error::DatasetNotFound {
            path: dataset.graph_dir.clone(),
        });
    }

    let mut registry = NodeRegistry::new();
    for edge in &dataset.edge_files {
        let path = dataset.edge_path(edge);
        let file = File::open(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::DatasetNotFound { path: path.clone() },
            _ => Error::Io(e),
        })?;
        let edges = registry.add_edges(edge, BufReader::new(file), &path)?;
        log_event!(ctx, DEBUG, event_names::GRAPH_FILE_COUNTED, Stage::Graph, "edge file counted",
            path = %path.display(), edges = edges as u64);
    }

    let stats = registry.into_stats(&dataset.name, &dataset.node_types);
    log_event!(ctx, INFO, event_names::GRAPH_COUNTED, Stage::Graph, "graph counted",
        nodes = stats.total_nodes() as u64, edges = stats.total_edges() as u64);
    Ok(stats)
}
