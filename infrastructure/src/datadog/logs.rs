//! Log tool handlers.

use super::{DatadogClient, DatadogError, distribution_line};
use chrono::Utc;
use dogtalk_domain::util::truncate_str;
use dogtalk_domain::{ToolCall, ToolResult, parse_time_range};
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};

/// Error-severity statuses, ORed together for the error-log search.
const ERROR_STATUSES: &str = "status:error OR status:critical OR status:emergency OR status:alert";

/// Message terms counted as failure signals in pattern analysis.
const ERROR_TERMS: &[&str] = &["error", "exception", "failed", "timeout", "crash"];

/// Search log events with an arbitrary query.
pub async fn search_logs(
    client: &DatadogClient,
    call: &ToolCall,
) -> Result<ToolResult, DatadogError> {
    let query = call.get_string("query").unwrap_or("*").to_string();
    run_search(client, "search_logs", &query, call).await
}

/// Search error-severity logs, optionally scoped to one service.
pub async fn search_error_logs(
    client: &DatadogClient,
    call: &ToolCall,
) -> Result<ToolResult, DatadogError> {
    let query = match call.get_string("service") {
        Some(service) => format!("({}) AND service:{}", ERROR_STATUSES, service),
        None => ERROR_STATUSES.to_string(),
    };
    run_search(client, "search_error_logs", &query, call).await
}

/// Fetch log streams filtered by service and/or source.
pub async fn get_log_streams(
    client: &DatadogClient,
    call: &ToolCall,
) -> Result<ToolResult, DatadogError> {
    let mut parts = Vec::new();
    if let Some(service) = call.get_string("service") {
        parts.push(format!("service:{}", service));
    }
    if let Some(source) = call.get_string("source") {
        parts.push(format!("source:{}", source));
    }
    let query = if parts.is_empty() {
        "*".to_string()
    } else {
        parts.join(" ")
    };
    run_search(client, "get_log_streams", &query, call).await
}

/// Analyze log traffic over a window: status/service/host distributions
/// and a failure-signal count, computed from a large sample.
pub async fn analyze_log_patterns(
    client: &DatadogClient,
    call: &ToolCall,
) -> Result<ToolResult, DatadogError> {
    let query = call.get_string("query").unwrap_or("*").to_string();
    let response = search_request(client, &query, call, 1000).await?;
    let rows = project_log_events(&log_events(&response));

    Ok(ToolResult::success("analyze_log_patterns", summarize_logs(&rows))
        .with_extra("query", json!(query))
        .with_extra("log_sample_size", json!(rows.len())))
}

/// Discover service names from recent log traffic.
///
/// Datadog has no service listing endpoint at this API level, so services
/// are aggregated from a log sample over the requested window.
pub async fn get_available_services(
    client: &DatadogClient,
    call: &ToolCall,
) -> Result<ToolResult, DatadogError> {
    let sample_size = call.get_i64("limit").unwrap_or(1000);
    let response = search_request(client, "*", call, sample_size).await?;
    let events = log_events(&response);

    let mut services = BTreeSet::new();
    for event in &events {
        if let Some(service) = event
            .get("attributes")
            .and_then(|a| a.get("service"))
            .and_then(|v| v.as_str())
        {
            services.insert(service.to_string());
        }
    }

    let rows: Vec<_> = services.iter().map(|name| json!({"name": name})).collect();
    Ok(ToolResult::success("get_available_services", json!(rows))
        .with_extra("log_sample_size", json!(events.len())))
}

async fn run_search(
    client: &DatadogClient,
    tool_name: &str,
    query: &str,
    call: &ToolCall,
) -> Result<ToolResult, DatadogError> {
    let limit = call.get_i64("limit").unwrap_or(100);
    let response = search_request(client, query, call, limit).await?;
    let rows = project_log_events(&log_events(&response));

    Ok(ToolResult::success(tool_name, json!(rows)).with_extra("query", json!(query)))
}

async fn search_request(
    client: &DatadogClient,
    query: &str,
    call: &ToolCall,
    limit: i64,
) -> Result<serde_json::Value, DatadogError> {
    let range = parse_time_range(call.get_string("time_range").unwrap_or("1 hour"));
    let sort = match call.get_string("sort") {
        Some("asc") | Some("timestamp:asc") => "timestamp:asc",
        _ => "timestamp:desc",
    };

    let to = Utc::now().timestamp_millis();
    let from = to - (range.as_secs() as i64) * 1000;

    let body = json!({
        "filter": { "query": query, "from": from, "to": to },
        "page": { "limit": limit.clamp(1, 1000) },
        "sort": sort,
    });

    client.post("/api/v2/logs/events/search", &body).await
}

fn log_events(response: &serde_json::Value) -> Vec<serde_json::Value> {
    response
        .get("data")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default()
}

/// Distill projected log rows into distributions and a failure count.
fn summarize_logs(rows: &[serde_json::Value]) -> serde_json::Value {
    if rows.is_empty() {
        return json!({"total_logs": 0, "note": "No logs found in the window."});
    }

    let mut statuses: BTreeMap<String, usize> = BTreeMap::new();
    let mut services: BTreeMap<String, usize> = BTreeMap::new();
    let mut hosts: BTreeMap<String, usize> = BTreeMap::new();
    let mut error_logs = 0usize;

    for row in rows {
        let field = |name: &str| {
            row.get(name)
                .and_then(|v| v.as_str())
                .unwrap_or("unknown")
                .to_string()
        };
        *statuses.entry(field("status")).or_default() += 1;
        *services.entry(field("service")).or_default() += 1;
        *hosts.entry(field("host")).or_default() += 1;

        let message = row
            .get("message")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_lowercase();
        if ERROR_TERMS.iter().any(|t| message.contains(t)) {
            error_logs += 1;
        }
    }

    json!({
        "total_logs": rows.len(),
        "statuses": distribution_line(&statuses),
        "services": distribution_line(&services),
        "hosts": distribution_line(&hosts),
        "error_logs": error_logs,
    })
}

fn project_log_events(events: &[serde_json::Value]) -> Vec<serde_json::Value> {
    events
        .iter()
        .map(|event| {
            let attrs = event.get("attributes");
            let field = |name: &str| attrs.and_then(|a| a.get(name)).cloned();
            let message = attrs
                .and_then(|a| a.get("message"))
                .and_then(|v| v.as_str())
                .unwrap_or("");

            json!({
                "time": field("timestamp"),
                "status": field("status"),
                "service": field("service"),
                "host": field("host"),
                "message": truncate_str(message, 1000),
            })
        })
        .collect()
}
