//! Fuzz target for JSON configuration parsing.

#![no_main]

use cs_config::{validate_config, StatsConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(config) = serde_json::from_slice::<StatsConfig>(data) {
        let _ = validate_config(&config);
    }
});
