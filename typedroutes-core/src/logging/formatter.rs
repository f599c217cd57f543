//! Log formatting options for different output styles

use chrono::{SecondsFormat, Utc};

/// How logs should be formatted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format (development default)
    /// Example: 2024-01-15 10:30:00.123 INFO  [typedroutes_core::http::server] GET /items/ 200
    Human,

    /// Structured JSON format, one object per line
    /// Example: {"timestamp":"2024-01-15T10:30:00.123Z","level":"INFO","target":"...","message":"..."}
    Json,
}

impl LogFormat {
    /// Parse a configuration value (case-insensitive)
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "human" | "text" => Some(LogFormat::Human),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }

    /// Format a log record according to this format
    pub fn format_record(&self, record: &log::Record<'_>) -> String {
        match self {
            LogFormat::Human => format_human(record),
            LogFormat::Json => format_json(record),
        }
    }
}

fn format_human(record: &log::Record<'_>) -> String {
    let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let level = format!("{:5}", record.level());
    format!("{} {} [{}] {}", timestamp, level, record.target(), record.args())
}

fn format_json(record: &log::Record<'_>) -> String {
    let mut json = serde_json::Map::new();

    json.insert(
        "timestamp".to_string(),
        serde_json::Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    json.insert("level".to_string(), serde_json::Value::String(record.level().to_string()));
    json.insert("target".to_string(), serde_json::Value::String(record.target().to_string()));
    json.insert("message".to_string(), serde_json::Value::String(record.args().to_string()));

    if let (Some(file), Some(line)) = (record.file(), record.line()) {
        json.insert("file".to_string(), serde_json::Value::String(file.to_string()));
        json.insert("line".to_string(), serde_json::Value::Number(line.into()));
    }

    serde_json::to_string(&json).unwrap_or_else(|_| "Failed to serialize log entry".to_string())
}
