//! Command output: one JSON object under `--json`, plain lines otherwise

use serde_json::{Map, Value};

/// Collects both renderings of a command result and prints the one selected
pub struct Output {
    json_mode: bool,
    fields: Map<String, Value>,
    lines: Vec<String>,
}

impl Output {
    /// Start an empty result
    pub fn new(json_mode: bool) -> Self {
        Self {
            json_mode,
            fields: Map::new(),
            lines: Vec::new(),
        }
    }

    /// String field (JSON only)
    pub fn field(mut self, key: &str, value: &str) -> Self {
        self.fields.insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    /// Byte string rendered as `0x` hex, in JSON and as a text line
    pub fn bytes(mut self, key: &str, data: &[u8]) -> Self {
        let hex = format!("0x{}", hex::encode(data));
        self.lines.push(hex.clone());
        self.fields.insert(key.to_string(), Value::String(hex));
        self
    }

    /// Arbitrary JSON field (JSON only)
    pub fn field_value(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    /// Text line (text only)
    pub fn line(mut self, text: &str) -> Self {
        self.lines.push(text.to_string());
        self
    }

    /// Write to stdout
    pub fn print(self) {
        if self.json_mode {
            let json = Value::Object(self.fields);
            println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
        } else if !self.lines.is_empty() {
            println!("{}", self.lines.join("\n"));
        }
    }
}
