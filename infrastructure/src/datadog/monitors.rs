//! Monitor tool handlers.

use super::{DatadogClient, DatadogError};
use dogtalk_domain::util::truncate_str;
use dogtalk_domain::{ToolCall, ToolResult};
use serde_json::json;

/// Fetch monitors, optionally filtered by state, priority, and tags.
///
/// The API filters by `group_states` and `monitor_tags`; state and priority
/// are re-checked client-side because grouped monitors come back with their
/// full state set.
pub async fn get_monitors(
    client: &DatadogClient,
    call: &ToolCall,
) -> Result<ToolResult, DatadogError> {
    let states = requested_states(call);
    let mut query: Vec<(&str, String)> = Vec::new();
    if let Some(states) = &states {
        query.push(("group_states", states.join(",")));
    }
    if let Some(tags) = call.get_string("tags") {
        query.push(("monitor_tags", tags.to_string()));
    }

    let limit = call.get_i64("limit").unwrap_or(50).max(1) as usize;
    let priority = call
        .get_string("priority")
        .map(str::to_string)
        .or_else(|| call.get_i64("priority").map(|n| format!("P{}", n)));

    let body = client.get("/api/v1/monitor", &query).await?;
    let monitors = body
        .as_array()
        .ok_or_else(|| DatadogError::Shape("expected a monitor array".to_string()))?;

    let rows = project_monitors(monitors, states.as_deref(), priority.as_deref(), limit);
    let filtered = rows.len();

    Ok(ToolResult::success("get_monitors", json!(rows))
        .with_extra("total_monitors", json!(monitors.len()))
        .with_extra("filtered_alerts", json!(filtered)))
}

/// Requested states, accepting a list or a comma-separated string.
fn requested_states(call: &ToolCall) -> Option<Vec<String>> {
    call.get_string_list("group_states").or_else(|| {
        call.get_string("group_states")
            .map(|s| s.split(',').map(|part| part.trim().to_string()).collect())
    })
}

/// Map a state to the display form the API uses ("alert" -> "Alert").
fn display_state(state: &str) -> String {
    match state.to_lowercase().as_str() {
        "alert" => "Alert".to_string(),
        "warn" => "Warn".to_string(),
        "ok" => "OK".to_string(),
        "no data" | "no_data" | "nodata" => "No Data".to_string(),
        "skipped" => "Skipped".to_string(),
        "unknown" => "Unknown".to_string(),
        _ => state.to_string(),
    }
}

fn project_monitors(
    monitors: &[serde_json::Value],
    states: Option<&[String]>,
    priority: Option<&str>,
    limit: usize,
) -> Vec<serde_json::Value> {
    let wanted: Option<Vec<String>> =
        states.map(|s| s.iter().map(|state| display_state(state)).collect());

    let mut rows = Vec::new();
    for monitor in monitors {
        let status = display_state(
            monitor
                .get("overall_state")
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown"),
        );
        if let Some(wanted) = &wanted
            && !wanted.contains(&status)
        {
            continue;
        }

        let monitor_priority = monitor
            .get("priority")
            .and_then(|v| v.as_i64())
            .map(|n| format!("P{}", n));
        if let Some(priority) = priority
            && monitor_priority.as_deref() != Some(priority)
        {
            continue;
        }

        let message = monitor
            .get("message")
            .and_then(|v| v.as_str())
            .unwrap_or("");

        rows.push(json!({
            "id": monitor.get("id"),
            "name": monitor.get("name").and_then(|v| v.as_str()).unwrap_or("unnamed"),
            "status": status,
            "message": truncate_str(message, 500),
            "query": monitor.get("query"),
            "priority": monitor_priority,
            "last_triggered": monitor.get("overall_state_modified"),
            "tags": monitor.get("tags"),
            "type": monitor.get("type"),
        }));

        if rows.len() >= limit {
            break;
        }
    }
    rows
}
