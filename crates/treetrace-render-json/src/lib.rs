//! JSON writers for insertion traces.
//!
//! External renderers consume traces as either one pretty JSON document or
//! JSONL with one step per line. JSONL is the streaming-friendly form: a
//! player can start animating before the whole file is read.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::Write;
use std::path::Path;
use treetrace_trace::{Trace, TraceStep};

pub fn trace_to_json<K: Serialize>(trace: &Trace<K>) -> Result<String> {
    serde_json::to_string_pretty(trace).context("serialize trace")
}

/// One compact JSON object per step, newline-terminated.
pub fn trace_to_jsonl<K: Serialize>(trace: &Trace<K>) -> Result<String> {
    let mut out = String::new();
    for step in trace {
        let line = serde_json::to_string(step)
            .with_context(|| format!("serialize step {}", step.index()))?;
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}

/// A whole session history as a JSON array of traces.
pub fn traces_to_json<K: Serialize>(traces: &[Trace<K>]) -> Result<String> {
    serde_json::to_string_pretty(traces).context("serialize traces")
}

pub fn write_trace_json<K: Serialize>(path: &Path, trace: &Trace<K>) -> Result<()> {
    let text = trace_to_json(trace)?;
    std::fs::write(path, text).with_context(|| format!("write {path:?}"))?;
    Ok(())
}

pub fn write_trace_jsonl<K: Serialize>(path: &Path, trace: &Trace<K>) -> Result<()> {
    let mut f = std::fs::File::create(path).with_context(|| format!("create {path:?}"))?;
    for step in trace {
        let line = serde_json::to_string(step).context("serialize step")?;
        f.write_all(line.as_bytes())?;
        f.write_all(b"\n")?;
    }
    Ok(())
}

pub fn read_trace_json<K: DeserializeOwned>(path: &Path) -> Result<Trace<K>> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read {path:?}"))?;
    serde_json::from_str(&text).with_context(|| format!("parse trace {path:?}"))
}

/// Parse steps back from JSONL, skipping blank lines.
pub fn read_steps_jsonl<K: DeserializeOwned>(text: &str) -> Result<Vec<TraceStep<K>>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str(line).with_context(|| format!("parse step on line {}", n + 1))
        })
        .collect()
}
