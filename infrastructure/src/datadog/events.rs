//! Event stream tool handlers.

use super::{DatadogClient, DatadogError, distribution_line};
use chrono::{DateTime, Utc};
use dogtalk_domain::util::truncate_str;
use dogtalk_domain::{ToolCall, ToolResult, parse_time_range};
use serde_json::json;
use std::collections::BTreeMap;

/// Terms marking an event as deployment-related.
const DEPLOY_TERMS: &[&str] = &["deploy", "deployment", "release", "updated", "rolled out"];

/// Terms marking an event as alert-related.
const ALERT_TERMS: &[&str] = &["alert", "monitor", "triggered", "warning", "critical"];

/// Search the event stream with a text filter.
///
/// The v1 endpoint has no text search of its own, so the filter runs
/// client-side against title and body.
pub async fn search_events(
    client: &DatadogClient,
    call: &ToolCall,
) -> Result<ToolResult, DatadogError> {
    let any_of: Vec<String> = call
        .get_string("query")
        .map(|q| vec![q.to_lowercase()])
        .unwrap_or_default();
    let filter = EventFilter {
        any_of,
        require: None,
    };
    fetch_events(client, "search_events", call, filter, "1 day", 100).await
}

/// Fetch recent events with no text filter.
pub async fn get_recent_events(
    client: &DatadogClient,
    call: &ToolCall,
) -> Result<ToolResult, DatadogError> {
    fetch_events(client, "get_recent_events", call, EventFilter::default(), "4 hours", 50).await
}

/// Fetch deployment-related events, optionally scoped to one service.
pub async fn get_deployment_events(
    client: &DatadogClient,
    call: &ToolCall,
) -> Result<ToolResult, DatadogError> {
    let filter = EventFilter {
        any_of: DEPLOY_TERMS.iter().map(|t| t.to_string()).collect(),
        require: call.get_string("service").map(str::to_lowercase),
    };
    fetch_events(client, "get_deployment_events", call, filter, "1 day", 50).await
}

/// Fetch alert and monitoring events.
pub async fn get_alert_events(
    client: &DatadogClient,
    call: &ToolCall,
) -> Result<ToolResult, DatadogError> {
    let filter = EventFilter {
        any_of: ALERT_TERMS.iter().map(|t| t.to_string()).collect(),
        require: None,
    };
    fetch_events(client, "get_alert_events", call, filter, "4 hours", 100).await
}

/// Summarize the event stream over a window: priority and alert-type
/// distributions, deployment and error counts.
pub async fn analyze_event_patterns(
    client: &DatadogClient,
    call: &ToolCall,
) -> Result<ToolResult, DatadogError> {
    let events = raw_events(client, call, "1 day").await?;
    let rows = project_events(&events, &EventFilter::default(), 1000);
    Ok(ToolResult::success("analyze_event_patterns", summarize_events(&rows))
        .with_extra("total_events", json!(events.len())))
}

/// Client-side event filter: the title or body must contain at least one of
/// `any_of` (when non-empty), and must contain `require` (when set).
#[derive(Default)]
struct EventFilter {
    any_of: Vec<String>,
    require: Option<String>,
}

impl EventFilter {
    fn matches(&self, title: &str, text: &str) -> bool {
        let haystack = format!("{} {}", title.to_lowercase(), text.to_lowercase());
        if !self.any_of.is_empty() && !self.any_of.iter().any(|t| haystack.contains(t.as_str())) {
            return false;
        }
        if let Some(require) = &self.require
            && !haystack.contains(require.as_str())
        {
            return false;
        }
        true
    }
}

async fn fetch_events(
    client: &DatadogClient,
    tool_name: &str,
    call: &ToolCall,
    filter: EventFilter,
    default_range: &str,
    default_limit: i64,
) -> Result<ToolResult, DatadogError> {
    let events = raw_events(client, call, default_range).await?;
    let limit = call.get_i64("limit").unwrap_or(default_limit).max(1) as usize;
    let rows = project_events(&events, &filter, limit);

    Ok(ToolResult::success(tool_name, json!(rows)).with_extra("total_events", json!(events.len())))
}

async fn raw_events(
    client: &DatadogClient,
    call: &ToolCall,
    default_range: &str,
) -> Result<Vec<serde_json::Value>, DatadogError> {
    let range = parse_time_range(call.get_string("time_range").unwrap_or(default_range));
    let end = Utc::now().timestamp();
    let start = end - range.as_secs() as i64;

    let mut query: Vec<(&str, String)> = vec![("start", start.to_string()), ("end", end.to_string())];
    if let Some(priority) = call.get_string("priority") {
        query.push(("priority", priority.to_string()));
    }
    if let Some(tags) = call.get_string("tags") {
        query.push(("tags", tags.to_string()));
    }

    let body = client.get("/api/v1/events", &query).await?;
    body.get("events")
        .and_then(|v| v.as_array())
        .cloned()
        .ok_or_else(|| DatadogError::Shape("expected an events array".to_string()))
}

fn project_events(
    events: &[serde_json::Value],
    filter: &EventFilter,
    limit: usize,
) -> Vec<serde_json::Value> {
    let mut rows = Vec::new();
    for event in events {
        let title = event.get("title").and_then(|v| v.as_str()).unwrap_or("");
        let text = event.get("text").and_then(|v| v.as_str()).unwrap_or("");

        if !filter.matches(title, text) {
            continue;
        }

        rows.push(json!({
            "id": event.get("id"),
            "title": if title.is_empty() { "untitled event" } else { title },
            "text": truncate_str(text, 200),
            "time": event
                .get("date_happened")
                .and_then(|v| v.as_i64())
                .map(format_epoch),
            "priority": event.get("priority"),
            "alert_type": event.get("alert_type"),
            "host": event.get("host"),
        }));

        if rows.len() >= limit {
            break;
        }
    }
    rows
}

/// Distill projected event rows into distributions and counts.
fn summarize_events(rows: &[serde_json::Value]) -> serde_json::Value {
    if rows.is_empty() {
        return json!({"total_events": 0, "note": "No events found in the window."});
    }

    let mut priorities: BTreeMap<String, usize> = BTreeMap::new();
    let mut alert_types: BTreeMap<String, usize> = BTreeMap::new();
    let mut deployments = 0usize;
    let mut errors = 0usize;

    for row in rows {
        let field = |name: &str| {
            row.get(name)
                .and_then(|v| v.as_str())
                .unwrap_or("unknown")
                .to_string()
        };
        *priorities.entry(field("priority")).or_default() += 1;
        let alert_type = field("alert_type");
        if alert_type == "error" {
            errors += 1;
        }
        *alert_types.entry(alert_type).or_default() += 1;

        let title = row.get("title").and_then(|v| v.as_str()).unwrap_or("");
        let text = row.get("text").and_then(|v| v.as_str()).unwrap_or("");
        let haystack = format!("{} {}", title.to_lowercase(), text.to_lowercase());
        if DEPLOY_TERMS.iter().any(|t| haystack.contains(t)) {
            deployments += 1;
        }
    }

    json!({
        "total_events": rows.len(),
        "priorities": distribution_line(&priorities),
        "alert_types": distribution_line(&alert_types),
        "deployment_events": deployments,
        "error_events": errors,
    })
}

fn format_epoch(secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| secs.to_string())
}
