//! Fuzz target for graph edge file parsing.

#![no_main]

use cs_config::EdgeFile;
use cs_core::graph::NodeRegistry;
use libfuzzer_sys::fuzz_target;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    let mut registry = NodeRegistry::new();
    let edge = EdgeFile::new("p", "u", "fuzz.txt");
    let _ = registry.add_edges(&edge, data, Path::new("fuzz.txt"));
});
