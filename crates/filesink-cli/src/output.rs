//! Output formatting utilities.

use filesink_appender::{Adjustment, FileConfig};
use filesink_status::Status;
use serde_json::{json, Value};

/// Renders a status report as a JSON object.
pub fn status_json(status: &Status) -> Value {
    json!({
        "level": status.level.as_str(),
        "origin": status.origin,
        "message": status.message,
        "cause": status.cause.as_ref().map(|c| c.to_string()),
        "timestamp": status.timestamp.to_rfc3339(),
    })
}

/// Renders a reconciliation adjustment as a JSON object.
pub fn adjustment_json(adjustment: &Adjustment) -> Value {
    json!({
        "level": adjustment.level.as_str(),
        "setting": adjustment.setting,
        "message": adjustment.message,
    })
}

/// Renders the outcome of `check`: the effective settings plus every override.
pub fn check_report(effective: &FileConfig, adjustments: &[Adjustment]) -> Value {
    json!({
        "effective": effective,
        "adjustments": adjustments.iter().map(adjustment_json).collect::<Vec<_>>(),
    })
}

/// Formats a JSON value for the terminal.
pub fn format_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}
