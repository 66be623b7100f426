//! Metric tool handlers.

use super::{DatadogClient, DatadogError};
use chrono::Utc;
use dogtalk_domain::{ToolCall, ToolResult, parse_time_range};
use serde_json::json;

/// Run a timeseries query and summarize each returned series.
pub async fn query_metrics(
    client: &DatadogClient,
    call: &ToolCall,
) -> Result<ToolResult, DatadogError> {
    let metric_query = match call.require_string("query") {
        Ok(q) => q,
        Err(e) => return Ok(ToolResult::failure("query_metrics", e)),
    };

    let range = parse_time_range(call.get_string("time_range").unwrap_or("1 hour"));
    let to = Utc::now().timestamp();
    let from = to - range.as_secs() as i64;

    let query = [
        ("from", from.to_string()),
        ("to", to.to_string()),
        ("query", metric_query.to_string()),
    ];
    let body = client.get("/api/v1/query", &query).await?;

    let series = body
        .get("series")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();

    let rows: Vec<_> = series
        .iter()
        .map(|s| project_series(s, metric_query))
        .collect();

    Ok(ToolResult::success("query_metrics", json!(rows))
        .with_extra("series_count", json!(series.len()))
        .with_extra("window_seconds", json!(range.as_secs())))
}

/// Run a timeseries query and report trends: series with data, high-variance
/// series, and rising or falling recent values.
pub async fn analyze_metric_trends(
    client: &DatadogClient,
    call: &ToolCall,
) -> Result<ToolResult, DatadogError> {
    let metric_query = match call.require_string("query") {
        Ok(q) => q,
        Err(e) => return Ok(ToolResult::failure("analyze_metric_trends", e)),
    };

    let range = parse_time_range(call.get_string("time_range").unwrap_or("4 hours"));
    let to = Utc::now().timestamp();
    let from = to - range.as_secs() as i64;

    let query = [
        ("from", from.to_string()),
        ("to", to.to_string()),
        ("query", metric_query.to_string()),
    ];
    let body = client.get("/api/v1/query", &query).await?;

    let series = body
        .get("series")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();

    Ok(ToolResult::success("analyze_metric_trends", analyze_series_trends(&series))
        .with_extra("window_seconds", json!(range.as_secs())))
}

/// Find metric names matching a substring.
pub async fn search_metrics(
    client: &DatadogClient,
    call: &ToolCall,
) -> Result<ToolResult, DatadogError> {
    let name = match call.require_string("metric_name") {
        Ok(n) => n,
        Err(e) => return Ok(ToolResult::failure("search_metrics", e)),
    };

    let query = [("q", format!("metrics:{}", name))];
    let body = client.get("/api/v1/search", &query).await?;

    let metrics = body
        .get("results")
        .and_then(|r| r.get("metrics"))
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();

    let rows: Vec<_> = metrics
        .iter()
        .filter_map(|m| m.as_str())
        .map(|m| json!({"metric": m}))
        .collect();

    Ok(ToolResult::success("search_metrics", json!(rows))
        .with_extra("total_matches", json!(rows.len())))
}

/// Fetch the metadata record of one metric.
pub async fn get_metric_metadata(
    client: &DatadogClient,
    call: &ToolCall,
) -> Result<ToolResult, DatadogError> {
    let name = match call.require_string("metric_name") {
        Ok(n) => n,
        Err(e) => return Ok(ToolResult::failure("get_metric_metadata", e)),
    };

    let body = client
        .get(&format!("/api/v1/metrics/{}", name), &[])
        .await?;

    Ok(ToolResult::success(
        "get_metric_metadata",
        json!({
            "metric": name,
            "description": body.get("description"),
            "type": body.get("type"),
            "unit": body.get("unit"),
            "per_unit": body.get("per_unit"),
            "statsd_interval": body.get("statsd_interval"),
            "integration": body.get("integration"),
        }),
    ))
}

/// Reduce one series to its latest/min/max/avg values.
///
/// Points arrive as `[timestamp, value]` pairs, newest last; null values
/// (gaps) are skipped.
pub(super) fn project_series(series: &serde_json::Value, fallback_name: &str) -> serde_json::Value {
    let metric = series_name(series, fallback_name);
    let scope = series.get("scope").and_then(|v| v.as_str()).unwrap_or("*");
    let values = series_values(series);

    if values.is_empty() {
        return json!({"metric": metric, "scope": scope, "points": 0});
    }

    let latest = values[values.len() - 1];
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let avg = values.iter().sum::<f64>() / values.len() as f64;

    json!({
        "metric": metric,
        "scope": scope,
        "latest_value": latest,
        "min": min,
        "max": max,
        "avg": avg,
        "points": values.len(),
    })
}

fn series_name<'a>(series: &'a serde_json::Value, fallback_name: &'a str) -> &'a str {
    series
        .get("metric")
        .or_else(|| series.get("expression"))
        .and_then(|v| v.as_str())
        .unwrap_or(fallback_name)
}

fn series_values(series: &serde_json::Value) -> Vec<f64> {
    series
        .get("pointlist")
        .and_then(|v| v.as_array())
        .map(|points| {
            points
                .iter()
                .filter_map(|p| p.get(1).and_then(|v| v.as_f64()))
                .collect()
        })
        .unwrap_or_default()
}

/// Per-query trend report across all returned series.
///
/// A series is flagged high-variance when its value range exceeds twice its
/// average; rising/falling means the last three non-null values are strictly
/// monotone.
fn analyze_series_trends(series: &[serde_json::Value]) -> serde_json::Value {
    if series.is_empty() {
        return json!({"total_series": 0, "note": "No metric data found in the window."});
    }

    let mut series_with_data = 0usize;
    let mut high_variance = Vec::new();
    let mut rising = Vec::new();
    let mut falling = Vec::new();

    for s in series {
        let values = series_values(s);
        if values.is_empty() {
            continue;
        }
        series_with_data += 1;
        let name = series_name(s, "series");

        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let avg = values.iter().sum::<f64>() / values.len() as f64;
        if avg != 0.0 {
            let variance_ratio = (max - min) / avg;
            if variance_ratio > 2.0 {
                high_variance.push(format!("{} (ratio {:.2})", name, variance_ratio));
            }
        }

        if let [a, b, c] = &values[values.len().saturating_sub(3)..] {
            if c > b && b > a {
                rising.push(name.to_string());
            } else if c < b && b < a {
                falling.push(name.to_string());
            }
        }
    }

    let line = |items: Vec<String>| {
        if items.is_empty() {
            "none".to_string()
        } else {
            items.join(", ")
        }
    };

    json!({
        "total_series": series.len(),
        "series_with_data": series_with_data,
        "high_variance": line(high_variance),
        "rising": line(rising),
        "falling": line(falling),
    })
}
