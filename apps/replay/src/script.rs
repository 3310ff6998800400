//! JSON-lines replay scripts.
//!
//! Each non-blank line that does not start with `#` is either a host
//! message envelope (`{"command": ..., "params": ...}`) or a user intent
//! (`{"intent": ..., "params": ...}`). Host lines are passed through raw so
//! the bridge applies its own lenient decoding; intent lines must decode.

use anyhow::{Context, Result};
use client_core::{BridgeInput, UserIntent};
use serde_json::Value;

pub fn parse_script(text: &str) -> Result<Vec<BridgeInput>> {
    let mut inputs = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line_no = index + 1;

        let is_intent = serde_json::from_str::<Value>(line)
            .map(|value| value.get("intent").is_some())
            .unwrap_or(false);

        if is_intent {
            let intent: UserIntent = serde_json::from_str(line)
                .with_context(|| format!("line {line_no}: invalid user intent"))?;
            inputs.push(BridgeInput::User(intent));
        } else {
            inputs.push(BridgeInput::Raw(line.to_string()));
        }
    }

    Ok(inputs)
}
