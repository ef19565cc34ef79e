//! Fuzz target for TOML configuration parsing.
//!
//! Parsing and validating arbitrary text must return errors, never panic.

#![no_main]

use cs_config::{validate_config, StatsConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(config) = StatsConfig::parse_toml(data) {
        let _ = validate_config(&config);
    }
});
