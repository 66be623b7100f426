//! Rendering of tool results and assistant replies.
//!
//! Turns a [`ToolResult`] into the plain-text scan block shown to the
//! operator (and echoed back to the model in the `TOOL_RESULT` turn), and
//! assembles the final assistant message around it. Entry formatting
//! dispatches on the discriminating key of each object: `name` for monitors
//! and services, `title` for dashboards and events, `metric` for metric
//! series, `message` for log events.

use crate::core::value::ArgValue;
use crate::tool::value_objects::ToolResult;
use std::collections::BTreeMap;

/// Entries beyond this count are summarized, not listed.
const DISPLAY_CAP: usize = 50;

/// Log message previews are cut at this many characters.
const MESSAGE_PREVIEW_CHARS: usize = 100;

/// Echo lines longer than this wrap one argument per line.
const ECHO_WRAP_WIDTH: usize = 80;

/// Format a tool result as the plain-text scan block.
pub fn format_tool_result(result: &ToolResult) -> String {
    if !result.is_success() {
        return format!("Error: {}", result.error().unwrap_or("unknown failure"));
    }

    match result.data() {
        None => "No results found.".to_string(),
        Some(serde_json::Value::Array(items)) if items.is_empty() => {
            "No results found.".to_string()
        }
        Some(serde_json::Value::Array(items)) => format_entries(items),
        Some(serde_json::Value::Object(map)) => format_map(map),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn format_entries(items: &[serde_json::Value]) -> String {
    let mut lines = Vec::new();
    for (i, item) in items.iter().take(DISPLAY_CAP).enumerate() {
        lines.push(format_entry(i + 1, item));
    }
    if items.len() > DISPLAY_CAP {
        lines.push(format!("... and {} more entries", items.len() - DISPLAY_CAP));
    }
    lines.join("\n")
}

fn format_entry(index: usize, item: &serde_json::Value) -> String {
    if let Some(name) = item.get("name").and_then(|v| v.as_str()) {
        let mut line = format!("{}. {}", index, name);
        if let Some(status) = item.get("status").and_then(|v| v.as_str()) {
            line.push_str(&format!(" [{}]", status));
        }
        if let Some(priority) = item.get("priority").and_then(|v| v.as_str()) {
            line.push_str(&format!(" ({})", priority));
        }
        return line;
    }

    if let Some(title) = item.get("title").and_then(|v| v.as_str()) {
        let mut line = format!("{}. {}", index, title);
        if let Some(id) = item.get("id") {
            line.push_str(&format!(" (id: {})", scalar_text(id)));
        }
        if let Some(time) = item.get("time").and_then(|v| v.as_str()) {
            line.push_str(&format!(" [{}]", time));
        }
        return line;
    }

    if let Some(metric) = item.get("metric").and_then(|v| v.as_str()) {
        let mut line = format!("{}. {}", index, metric);
        if let Some(latest) = item.get("latest_value").and_then(|v| v.as_f64()) {
            line.push_str(&format!(" = {:.2}", latest));
        }
        if let Some(scope) = item.get("scope").and_then(|v| v.as_str()) {
            line.push_str(&format!(" ({})", scope));
        }
        return line;
    }

    if let Some(message) = item.get("message").and_then(|v| v.as_str()) {
        let preview: String = message.chars().take(MESSAGE_PREVIEW_CHARS).collect();
        let time = item.get("time").and_then(|v| v.as_str()).unwrap_or("-");
        let status = item.get("status").and_then(|v| v.as_str()).unwrap_or("info");
        return format!("{}. [{}] [{}] {}", index, time, status, preview);
    }

    format!("{}. {}", index, item)
}

fn format_map(map: &serde_json::Map<String, serde_json::Value>) -> String {
    let mut lines = Vec::new();
    for (key, value) in map {
        match value {
            serde_json::Value::Array(items) => {
                lines.push(format!("{}: {} entries", key, items.len()));
            }
            other => lines.push(format!("{}: {}", key, scalar_text(other))),
        }
    }
    lines.join("\n")
}

fn scalar_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Echo the invoked command, wrapping one argument per line when long.
pub fn format_call_echo(name: &str, args: &BTreeMap<String, ArgValue>) -> String {
    let rendered: Vec<String> = args.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    let single = format!("{}({})", name, rendered.join(", "));
    if single.len() <= ECHO_WRAP_WIDTH {
        return single;
    }
    format!("{}(\n  {}\n)", name, rendered.join(",\n  "))
}

/// Assemble the assistant message for a turn where a tool ran.
pub fn compose_tool_reply(echo: &str, scan: &str, narration: &str) -> String {
    format!(
        "[engaged] {}\n\n```\n{}\n```\n\n{}\n\n-- dogtalk, standing watch",
        echo, scan, narration
    )
}

/// Assemble the assistant message for a direct (no-tool) answer.
pub fn compose_direct_reply(text: &str) -> String {
    format!("[transmission] {}", text)
}

/// Assemble the assistant message for a failed turn.
pub fn compose_error_reply(detail: &str) -> String {
    format!("[malfunction] {}", detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn failure_renders_error_line() {
        let result = ToolResult::failure("search_logs", "Missing required argument: query");
        assert_eq!(
            format_tool_result(&result),
            "Error: Missing required argument: query"
        );
    }

    #[test]
    fn empty_list_renders_no_results() {
        let result = ToolResult::success("get_monitors", json!([]));
        assert_eq!(format_tool_result(&result), "No results found.");
    }

    #[test]
    fn monitor_entries_show_status_and_priority() {
        let result = ToolResult::success(
            "get_monitors",
            json!([{"name": "High CPU", "status": "Alert", "priority": "P1"}]),
        );
        assert_eq!(format_tool_result(&result), "1. High CPU [Alert] (P1)");
    }

    #[test]
    fn service_entries_omit_missing_fields() {
        let result = ToolResult::success("get_available_services", json!([{"name": "web"}]));
        assert_eq!(format_tool_result(&result), "1. web");
    }

    #[test]
    fn event_entries_show_id_and_time() {
        let result = ToolResult::success(
            "search_events",
            json!([{"title": "Deploy finished", "id": 42, "time": "2026-08-23 10:15:00"}]),
        );
        assert_eq!(
            format_tool_result(&result),
            "1. Deploy finished (id: 42) [2026-08-23 10:15:00]"
        );
    }

    #[test]
    fn metric_entries_show_two_decimal_latest_and_scope() {
        let result = ToolResult::success(
            "query_metrics",
            json!([{"metric": "system.cpu.user", "latest_value": 42.1234, "scope": "host:a"}]),
        );
        assert_eq!(format_tool_result(&result), "1. system.cpu.user = 42.12 (host:a)");
    }

    #[test]
    fn log_entries_preview_the_message() {
        let long = "x".repeat(300);
        let result = ToolResult::success(
            "search_logs",
            json!([{"message": long, "time": "2026-08-23T10:00:00Z", "status": "error"}]),
        );
        let rendered = format_tool_result(&result);
        assert!(rendered.starts_with("1. [2026-08-23T10:00:00Z] [error] "));
        assert!(rendered.chars().count() < 150);
    }

    #[test]
    fn display_cap_summarizes_the_remainder() {
        let items: Vec<_> = (0..60).map(|i| json!({"name": format!("m{}", i)})).collect();
        let result = ToolResult::success("get_monitors", json!(items));
        let rendered = format_tool_result(&result);

        assert!(rendered.contains("50. m49"));
        assert!(!rendered.contains("m50"));
        assert!(rendered.ends_with("... and 10 more entries"));
    }

    #[test]
    fn map_data_summarizes_collections_by_length() {
        let result = ToolResult::success(
            "get_metric_metadata",
            json!({"description": "CPU time", "unit": "percent", "hosts": ["a", "b", "c"]}),
        );
        let rendered = format_tool_result(&result);

        assert!(rendered.contains("description: CPU time"));
        assert!(rendered.contains("hosts: 3 entries"));
    }

    #[test]
    fn scalar_data_is_stringified() {
        let result = ToolResult::success("get_dashboard", json!("dashboard is empty"));
        assert_eq!(format_tool_result(&result), "dashboard is empty");
    }

    #[test]
    fn short_echo_stays_on_one_line() {
        let mut args = BTreeMap::new();
        args.insert("limit".to_string(), ArgValue::Int(5));
        assert_eq!(format_call_echo("get_monitors", &args), "get_monitors(limit=5)");
    }

    #[test]
    fn long_echo_wraps_per_argument() {
        let mut args = BTreeMap::new();
        args.insert(
            "query".to_string(),
            ArgValue::Str("status:error OR status:critical OR status:emergency".to_string()),
        );
        args.insert("time_range".to_string(), ArgValue::Str("2 days".to_string()));

        let echo = format_call_echo("search_logs", &args);
        assert!(echo.starts_with("search_logs(\n"));
        assert!(echo.contains("\n  time_range=\"2 days\"\n)"));
    }

    #[test]
    fn reply_composition_markers() {
        assert!(compose_tool_reply("a()", "1. x", "all quiet").starts_with("[engaged] a()"));
        assert!(compose_direct_reply("hello").starts_with("[transmission]"));
        assert!(compose_error_reply("gateway down").starts_with("[malfunction]"));
    }
}
