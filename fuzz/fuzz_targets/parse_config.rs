//! Fuzz harness for session configuration files (treetrace.yaml)
//!
//! Target: `SessionConfig` YAML and JSON deserialization

#![no_main]

use libfuzzer_sys::fuzz_target;
use treetrace_config::{SessionConfig, validate_config};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    // Failures are fine; panics are not.
    if let Ok(config) = serde_yaml::from_str::<SessionConfig>(input) {
        let _ = validate_config(&config);
    }
    if let Ok(config) = serde_json::from_str::<SessionConfig>(input) {
        let _ = validate_config(&config);
    }
});
