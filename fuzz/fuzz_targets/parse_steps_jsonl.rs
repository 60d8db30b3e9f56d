//! Fuzz harness for JSONL trace replay
//!
//! Target: `treetrace_render_json::read_steps_jsonl`

#![no_main]

use libfuzzer_sys::fuzz_target;
use treetrace_render_json::read_steps_jsonl;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(steps) = read_steps_jsonl::<i64>(input) {
        // Anything that parsed must serialize again.
        for step in &steps {
            serde_json::to_string(step).unwrap();
        }
    }
});
