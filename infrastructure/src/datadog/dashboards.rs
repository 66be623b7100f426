//! Dashboard tool handlers.

use super::{DatadogClient, DatadogError, distribution_line, metrics};
use chrono::Utc;
use dogtalk_domain::{ToolCall, ToolResult, parse_time_range};
use serde_json::json;
use std::collections::BTreeMap;

/// Widget queries executed per dashboard, to bound the API call fan-out.
const MAX_WIDGET_QUERIES: usize = 20;

/// List dashboards, optionally filtered by a case-insensitive name match
/// and by tags.
///
/// The list endpoint carries no tag field, so tags are read from the
/// comma-separated dashboard description; every requested tag must appear.
pub async fn list_dashboards(
    client: &DatadogClient,
    call: &ToolCall,
) -> Result<ToolResult, DatadogError> {
    let body = client.get("/api/v1/dashboard", &[]).await?;
    let dashboards = body
        .get("dashboards")
        .and_then(|v| v.as_array())
        .ok_or_else(|| DatadogError::Shape("expected a dashboards array".to_string()))?;

    let needle = call.get_string("name").map(str::to_lowercase);
    let required_tags = requested_tags(call);
    let limit = call.get_i64("limit").unwrap_or(50).max(1) as usize;

    let mut rows = Vec::new();
    for dashboard in dashboards {
        let title = dashboard
            .get("title")
            .and_then(|v| v.as_str())
            .unwrap_or("untitled");
        if let Some(needle) = &needle
            && !title.to_lowercase().contains(needle)
        {
            continue;
        }

        if let Some(required) = &required_tags
            && !has_all_tags(dashboard, required)
        {
            continue;
        }

        let id = dashboard.get("id").and_then(|v| v.as_str()).unwrap_or("");
        rows.push(json!({
            "id": id,
            "title": title,
            "description": dashboard.get("description"),
            "url": client.dashboard_url(id),
            "author": dashboard.get("author_handle"),
            "time": dashboard.get("modified_at"),
        }));

        if rows.len() >= limit {
            break;
        }
    }

    Ok(ToolResult::success("list_dashboards", json!(rows))
        .with_extra("total_dashboards", json!(dashboards.len())))
}

/// Requested tags, accepting a list or a comma-separated string.
fn requested_tags(call: &ToolCall) -> Option<Vec<String>> {
    call.get_string_list("tags").or_else(|| {
        call.get_string("tags")
            .map(|s| s.split(',').map(|part| part.trim().to_string()).collect())
    })
}

fn has_all_tags(dashboard: &serde_json::Value, required: &[String]) -> bool {
    let description = dashboard
        .get("description")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    let present: Vec<&str> = description
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();
    required.iter().all(|tag| present.contains(&tag.as_str()))
}

/// GET one dashboard; a 404 comes back as a ready-made failure result.
async fn fetch_dashboard(
    client: &DatadogClient,
    tool_name: &str,
    id: &str,
) -> Result<Result<serde_json::Value, ToolResult>, DatadogError> {
    match client.get(&format!("/api/v1/dashboard/{}", id), &[]).await {
        Ok(body) => Ok(Ok(body)),
        Err(DatadogError::Api { status: 404, .. }) => Ok(Err(ToolResult::failure(
            tool_name,
            format!("Dashboard not found: {}", id),
        ))),
        Err(e) => Err(e),
    }
}

/// Fetch one dashboard with a widget inventory.
pub async fn get_dashboard(
    client: &DatadogClient,
    call: &ToolCall,
) -> Result<ToolResult, DatadogError> {
    let id = match call.require_string("dashboard_id") {
        Ok(id) => id,
        Err(e) => return Ok(ToolResult::failure("get_dashboard", e)),
    };

    let body = match fetch_dashboard(client, "get_dashboard", id).await? {
        Ok(body) => body,
        Err(failure) => return Ok(failure),
    };

    let widgets = body
        .get("widgets")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();

    Ok(ToolResult::success(
        "get_dashboard",
        json!({
            "title": body.get("title"),
            "description": body.get("description"),
            "url": client.dashboard_url(id),
            "author": body.get("author_handle"),
            "created_at": body.get("created_at"),
            "modified_at": body.get("modified_at"),
            "widget_count": widgets.len(),
            "widgets": widget_inventory(&widgets),
        }),
    ))
}

/// Static analysis of one dashboard: widget type counts and the metric
/// queries its widgets run, without executing anything.
pub async fn analyze_dashboard(
    client: &DatadogClient,
    call: &ToolCall,
) -> Result<ToolResult, DatadogError> {
    let id = match call.require_string("dashboard_id") {
        Ok(id) => id,
        Err(e) => return Ok(ToolResult::failure("analyze_dashboard", e)),
    };

    let body = match fetch_dashboard(client, "analyze_dashboard", id).await? {
        Ok(body) => body,
        Err(failure) => return Ok(failure),
    };

    let widgets = body
        .get("widgets")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();
    let queries = collect_widget_queries(&widgets);

    let mut types: BTreeMap<String, usize> = BTreeMap::new();
    for widget in &widgets {
        let widget_type = widget
            .get("definition")
            .and_then(|d| d.get("type"))
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        *types.entry(widget_type.to_string()).or_default() += 1;
    }

    let sample: Vec<String> = queries
        .iter()
        .take(5)
        .map(|(title, query)| format!("{}: {}", title, query))
        .collect();

    Ok(ToolResult::success(
        "analyze_dashboard",
        json!({
            "title": body.get("title"),
            "url": client.dashboard_url(id),
            "widget_count": widgets.len(),
            "widget_types": distribution_line(&types),
            "query_count": queries.len(),
            "sample_queries": sample.join("; "),
        }),
    ))
}

/// Execute the metric queries behind a dashboard's widgets and summarize
/// every returned series.
pub async fn get_widget_data(
    client: &DatadogClient,
    call: &ToolCall,
) -> Result<ToolResult, DatadogError> {
    let id = match call.require_string("dashboard_id") {
        Ok(id) => id,
        Err(e) => return Ok(ToolResult::failure("get_widget_data", e)),
    };

    let body = match fetch_dashboard(client, "get_widget_data", id).await? {
        Ok(body) => body,
        Err(failure) => return Ok(failure),
    };

    let widgets = body
        .get("widgets")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();
    let queries = collect_widget_queries(&widgets);

    let range = parse_time_range(call.get_string("time_range").unwrap_or("1 week"));
    let to = Utc::now().timestamp();
    let from = to - range.as_secs() as i64;

    let mut rows = Vec::new();
    for (_, query) in queries.iter().take(MAX_WIDGET_QUERIES) {
        let params = [
            ("from", from.to_string()),
            ("to", to.to_string()),
            ("query", query.clone()),
        ];
        let response = client.get("/api/v1/query", &params).await?;
        let series = response
            .get("series")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();
        for s in &series {
            rows.push(metrics::project_series(s, query));
        }
    }

    Ok(ToolResult::success("get_widget_data", json!(rows))
        .with_extra("queries_executed", json!(queries.len().min(MAX_WIDGET_QUERIES)))
        .with_extra("queries_found", json!(queries.len())))
}

/// Walk widgets (descending into groups) and collect `(widget title, query)`
/// pairs from each request, covering both the `queries` array and the legacy
/// direct `q`/`query` forms.
fn collect_widget_queries(widgets: &[serde_json::Value]) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for (i, widget) in widgets.iter().enumerate() {
        let Some(definition) = widget.get("definition") else {
            continue;
        };
        let title = definition
            .get("title")
            .and_then(|v| v.as_str())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("widget {}", i + 1));

        if definition.get("type").and_then(|v| v.as_str()) == Some("group") {
            if let Some(sub) = definition.get("widgets").and_then(|v| v.as_array()) {
                out.extend(collect_widget_queries(sub));
            }
            continue;
        }

        let Some(requests) = definition.get("requests").and_then(|v| v.as_array()) else {
            continue;
        };
        for request in requests {
            let query_objects = request
                .get("queries")
                .and_then(|v| v.as_array())
                .cloned()
                .unwrap_or_default();
            for object in &query_objects {
                if let Some(query) = object.get("query").and_then(|v| v.as_str())
                    && !query.is_empty()
                {
                    out.push((title.clone(), query.to_string()));
                }
            }
            // Legacy format: the query sits directly on the request
            if query_objects.is_empty()
                && let Some(query) = request
                    .get("q")
                    .or_else(|| request.get("query"))
                    .and_then(|v| v.as_str())
                && !query.is_empty()
            {
                out.push((title.clone(), query.to_string()));
            }
        }
    }
    out
}

/// One label per widget: its title when set, its type otherwise.
fn widget_inventory(widgets: &[serde_json::Value]) -> Vec<String> {
    widgets
        .iter()
        .map(|widget| {
            let definition = widget.get("definition");
            definition
                .and_then(|d| d.get("title"))
                .and_then(|v| v.as_str())
                .filter(|t| !t.is_empty())
                .or_else(|| {
                    definition
                        .and_then(|d| d.get("type"))
                        .and_then(|v| v.as_str())
                })
                .unwrap_or("widget")
                .to_string()
        })
        .collect()
}
