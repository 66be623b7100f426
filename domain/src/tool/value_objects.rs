//! Tool domain value objects — immutable execution results
//!
//! Every dispatch produces exactly one [`ToolResult`]: a success carrying
//! the projected API data, or a failure carrying an error message. Handler
//! errors never escape the dispatch boundary as panics or `Err`s.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of a tool execution.
///
/// `data` holds the projection the result formatter understands: a list of
/// objects, a flat map, or a scalar. `extras` carries diagnostic fields
/// (counts, totals) that ride alongside the main payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Name of the tool that was executed
    pub tool_name: String,
    /// Whether the execution was successful
    pub success: bool,
    /// Error message (for failed execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Projected payload (for successful execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Diagnostic side-channel fields
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, serde_json::Value>,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(tool_name: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            error: None,
            data: Some(data),
            extras: BTreeMap::new(),
        }
    }

    /// Create a failed result
    pub fn failure(tool_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            error: Some(error.into()),
            data: None,
            extras: BTreeMap::new(),
        }
    }

    /// Attach a diagnostic field
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extras.insert(key.into(), value);
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&serde_json::Value> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_result() {
        let result = ToolResult::success("get_monitors", serde_json::json!([{"name": "cpu"}]))
            .with_extra("total_monitors", serde_json::json!(12));

        assert!(result.is_success());
        assert!(result.error().is_none());
        assert_eq!(result.extras.get("total_monitors"), Some(&serde_json::json!(12)));
    }

    #[test]
    fn test_failure_result() {
        let result = ToolResult::failure("search_logs", "Missing required argument: query");

        assert!(!result.is_success());
        assert!(result.data().is_none());
        assert_eq!(result.error(), Some("Missing required argument: query"));
    }
}
