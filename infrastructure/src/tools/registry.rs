//! Tool Registry
//!
//! Built at startup from a declarative table pairing each [`ToolDefinition`]
//! with its handler, then shared read-only behind an `Arc`. Dispatch is
//! total: unknown names and handler errors both come back as failure
//! results listing what went wrong, never as panics.

use crate::datadog::{DatadogClient, DatadogError, dashboards, events, logs, metrics, monitors};
use async_trait::async_trait;
use dogtalk_application::ports::tool_executor::ToolExecutorPort;
use dogtalk_domain::{ToolCall, ToolDefinition, ToolParameter, ToolResult, ToolSpec, render_tool_catalog};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

type Handler = for<'a> fn(&'a DatadogClient, &'a ToolCall) -> BoxFuture<'a, Result<ToolResult, DatadogError>>;

/// Registry of Datadog tools implementing [`ToolExecutorPort`].
pub struct DatadogToolRegistry {
    client: Arc<DatadogClient>,
    spec: ToolSpec,
    handlers: HashMap<String, Handler>,
}

impl DatadogToolRegistry {
    pub fn new(client: Arc<DatadogClient>) -> Self {
        let (spec, handlers) = Self::build(Self::table());
        Self {
            client,
            spec,
            handlers,
        }
    }

    /// Register a table of definitions. A duplicate name logs a warning and
    /// the later entry wins.
    fn build(table: Vec<(ToolDefinition, Handler)>) -> (ToolSpec, HashMap<String, Handler>) {
        let mut spec = ToolSpec::new();
        let mut handlers = HashMap::new();
        for (definition, handler) in table {
            if handlers.contains_key(&definition.name) {
                warn!(
                    "Duplicate tool registration for '{}'; keeping the latest definition",
                    definition.name
                );
            }
            handlers.insert(definition.name.clone(), handler);
            spec = spec.register(definition);
        }
        (spec, handlers)
    }

    /// The declarative tool table: definition and handler, side by side.
    fn table() -> Vec<(ToolDefinition, Handler)> {
        vec![
            (
                ToolDefinition::new(
                    "get_monitors",
                    "Fetch monitors with their current state, filtered by state, priority, or tags.",
                    "monitors",
                )
                .with_parameter(ToolParameter::new(
                    "group_states",
                    "Comma-separated states to include: alert, warn, no data, ok",
                    false,
                ))
                .with_parameter(ToolParameter::new("priority", "Monitor priority, e.g. P1", false))
                .with_parameter(ToolParameter::new("tags", "Monitor tag filter, e.g. env:prod", false))
                .with_parameter(
                    ToolParameter::new("limit", "Maximum monitors to return", false)
                        .with_type("integer"),
                )
                .with_example("TOOL_CALL: get_monitors(group_states=\"alert\", limit=10)"),
                |client, call| monitors::get_monitors(client, call).boxed(),
            ),
            (
                ToolDefinition::new(
                    "list_dashboards",
                    "List dashboards, optionally filtered by a name substring.",
                    "dashboards",
                )
                .with_parameter(ToolParameter::new("name", "Case-insensitive name filter", false))
                .with_parameter(ToolParameter::new(
                    "tags",
                    "Tags the dashboard description must carry, e.g. env:prod",
                    false,
                ))
                .with_parameter(
                    ToolParameter::new("limit", "Maximum dashboards to return", false)
                        .with_type("integer"),
                )
                .with_example("TOOL_CALL: list_dashboards(name=\"payments\")"),
                |client, call| dashboards::list_dashboards(client, call).boxed(),
            ),
            (
                ToolDefinition::new(
                    "get_dashboard",
                    "Fetch one dashboard with its widget inventory.",
                    "dashboards",
                )
                .with_parameter(ToolParameter::new("dashboard_id", "Dashboard id", true))
                .with_example("TOOL_CALL: get_dashboard(dashboard_id=\"abc-def-123\")"),
                |client, call| dashboards::get_dashboard(client, call).boxed(),
            ),
            (
                ToolDefinition::new(
                    "analyze_dashboard",
                    "Inspect a dashboard's widget types and the metric queries behind them.",
                    "dashboards",
                )
                .with_parameter(ToolParameter::new("dashboard_id", "Dashboard id", true))
                .with_example("TOOL_CALL: analyze_dashboard(dashboard_id=\"abc-def-123\")"),
                |client, call| dashboards::analyze_dashboard(client, call).boxed(),
            ),
            (
                ToolDefinition::new(
                    "get_widget_data",
                    "Execute the queries behind a dashboard's widgets and summarize each series.",
                    "dashboards",
                )
                .with_parameter(ToolParameter::new("dashboard_id", "Dashboard id", true))
                .with_parameter(ToolParameter::new("time_range", "Window, e.g. \"1 week\"", false))
                .with_example("TOOL_CALL: get_widget_data(dashboard_id=\"abc-def-123\", time_range=\"1 day\")"),
                |client, call| dashboards::get_widget_data(client, call).boxed(),
            ),
            (
                ToolDefinition::new(
                    "search_logs",
                    "Search log events with Datadog log search syntax.",
                    "logs",
                )
                .with_parameter(ToolParameter::new(
                    "query",
                    "Log search query, e.g. service:web status:error",
                    false,
                ))
                .with_parameter(ToolParameter::new("time_range", "Window, e.g. \"1 hour\", \"2 days\"", false))
                .with_parameter(
                    ToolParameter::new("limit", "Maximum log events to return (up to 1000)", false)
                        .with_type("integer"),
                )
                .with_parameter(ToolParameter::new("sort", "\"asc\" for oldest first", false))
                .with_example("TOOL_CALL: search_logs(query=\"service:web status:error\", time_range=\"30 minutes\")"),
                |client, call| logs::search_logs(client, call).boxed(),
            ),
            (
                ToolDefinition::new(
                    "search_error_logs",
                    "Search error-severity logs, optionally scoped to one service.",
                    "logs",
                )
                .with_parameter(ToolParameter::new("service", "Service name", false))
                .with_parameter(ToolParameter::new("time_range", "Window, e.g. \"1 hour\"", false))
                .with_parameter(
                    ToolParameter::new("limit", "Maximum log events to return", false)
                        .with_type("integer"),
                )
                .with_example("TOOL_CALL: search_error_logs(service=\"payments\", time_range=\"1 hour\")"),
                |client, call| logs::search_error_logs(client, call).boxed(),
            ),
            (
                ToolDefinition::new(
                    "get_available_services",
                    "Discover service names from recent log traffic.",
                    "logs",
                )
                .with_parameter(ToolParameter::new("time_range", "Sampling window, e.g. \"1 hour\"", false))
                .with_parameter(
                    ToolParameter::new("limit", "Log sample size (up to 1000)", false)
                        .with_type("integer"),
                )
                .with_example("TOOL_CALL: get_available_services(time_range=\"1 hour\")"),
                |client, call| logs::get_available_services(client, call).boxed(),
            ),
            (
                ToolDefinition::new(
                    "get_log_streams",
                    "Fetch log streams filtered by service and/or source.",
                    "logs",
                )
                .with_parameter(ToolParameter::new("service", "Service name", false))
                .with_parameter(ToolParameter::new("source", "Log source, e.g. nginx, python", false))
                .with_parameter(ToolParameter::new("time_range", "Window, e.g. \"1 hour\"", false))
                .with_parameter(
                    ToolParameter::new("limit", "Maximum log events to return", false)
                        .with_type("integer"),
                )
                .with_example("TOOL_CALL: get_log_streams(service=\"web\", source=\"nginx\")"),
                |client, call| logs::get_log_streams(client, call).boxed(),
            ),
            (
                ToolDefinition::new(
                    "analyze_log_patterns",
                    "Summarize log traffic: status/service/host distributions and failure counts.",
                    "logs",
                )
                .with_parameter(ToolParameter::new("query", "Log search query to analyze", false))
                .with_parameter(ToolParameter::new("time_range", "Window, e.g. \"1 hour\"", false))
                .with_example("TOOL_CALL: analyze_log_patterns(query=\"service:web\", time_range=\"1 hour\")"),
                |client, call| logs::analyze_log_patterns(client, call).boxed(),
            ),
            (
                ToolDefinition::new(
                    "search_events",
                    "Search the event stream by text, priority, or tags.",
                    "events",
                )
                .with_parameter(ToolParameter::new("query", "Text matched against title and body", false))
                .with_parameter(ToolParameter::new("time_range", "Window, e.g. \"1 day\"", false))
                .with_parameter(ToolParameter::new("priority", "\"normal\" or \"low\"", false))
                .with_parameter(ToolParameter::new("tags", "Comma-separated tag filter", false))
                .with_parameter(
                    ToolParameter::new("limit", "Maximum events to return", false)
                        .with_type("integer"),
                )
                .with_example("TOOL_CALL: search_events(query=\"deploy\", time_range=\"1 day\")"),
                |client, call| events::search_events(client, call).boxed(),
            ),
            (
                ToolDefinition::new(
                    "get_recent_events",
                    "Fetch the most recent events from the event stream.",
                    "events",
                )
                .with_parameter(ToolParameter::new("time_range", "Window, e.g. \"1 day\"", false))
                .with_parameter(
                    ToolParameter::new("limit", "Maximum events to return", false)
                        .with_type("integer"),
                )
                .with_example("TOOL_CALL: get_recent_events(limit=10)"),
                |client, call| events::get_recent_events(client, call).boxed(),
            ),
            (
                ToolDefinition::new(
                    "get_deployment_events",
                    "Fetch deployment-related events, optionally scoped to one service.",
                    "events",
                )
                .with_parameter(ToolParameter::new("service", "Service name", false))
                .with_parameter(ToolParameter::new("time_range", "Window, e.g. \"1 day\"", false))
                .with_parameter(
                    ToolParameter::new("limit", "Maximum events to return", false)
                        .with_type("integer"),
                )
                .with_example("TOOL_CALL: get_deployment_events(service=\"payments\")"),
                |client, call| events::get_deployment_events(client, call).boxed(),
            ),
            (
                ToolDefinition::new(
                    "get_alert_events",
                    "Fetch alert and monitoring events from the event stream.",
                    "events",
                )
                .with_parameter(ToolParameter::new("time_range", "Window, e.g. \"4 hours\"", false))
                .with_parameter(
                    ToolParameter::new("limit", "Maximum events to return", false)
                        .with_type("integer"),
                )
                .with_example("TOOL_CALL: get_alert_events(time_range=\"4 hours\")"),
                |client, call| events::get_alert_events(client, call).boxed(),
            ),
            (
                ToolDefinition::new(
                    "analyze_event_patterns",
                    "Summarize the event stream: priority/type distributions, deployment and error counts.",
                    "events",
                )
                .with_parameter(ToolParameter::new("time_range", "Window, e.g. \"1 day\"", false))
                .with_parameter(ToolParameter::new("priority", "\"normal\" or \"low\"", false))
                .with_parameter(ToolParameter::new("tags", "Comma-separated tag filter", false))
                .with_example("TOOL_CALL: analyze_event_patterns(time_range=\"1 day\")"),
                |client, call| events::analyze_event_patterns(client, call).boxed(),
            ),
            (
                ToolDefinition::new(
                    "query_metrics",
                    "Run a timeseries query and summarize each series (latest/min/max/avg).",
                    "metrics",
                )
                .with_parameter(ToolParameter::new(
                    "query",
                    "Datadog metric query, e.g. avg:system.cpu.user{*}",
                    true,
                ))
                .with_parameter(ToolParameter::new("time_range", "Window, e.g. \"1 hour\"", false))
                .with_example("TOOL_CALL: query_metrics(query=\"avg:system.cpu.user{*}\", time_range=\"1 hour\")"),
                |client, call| metrics::query_metrics(client, call).boxed(),
            ),
            (
                ToolDefinition::new(
                    "analyze_metric_trends",
                    "Report trends for a timeseries query: high-variance series and rising/falling values.",
                    "metrics",
                )
                .with_parameter(ToolParameter::new(
                    "query",
                    "Datadog metric query, e.g. avg:system.cpu.user{*}",
                    true,
                ))
                .with_parameter(ToolParameter::new("time_range", "Window, e.g. \"4 hours\"", false))
                .with_example("TOOL_CALL: analyze_metric_trends(query=\"avg:api.latency{*}\", time_range=\"4 hours\")"),
                |client, call| metrics::analyze_metric_trends(client, call).boxed(),
            ),
            (
                ToolDefinition::new(
                    "search_metrics",
                    "Find metric names matching a substring.",
                    "metrics",
                )
                .with_parameter(ToolParameter::new("metric_name", "Name or substring to search for", true))
                .with_example("TOOL_CALL: search_metrics(metric_name=\"cpu\")"),
                |client, call| metrics::search_metrics(client, call).boxed(),
            ),
            (
                ToolDefinition::new(
                    "get_metric_metadata",
                    "Fetch the metadata record (type, unit, description) of one metric.",
                    "metrics",
                )
                .with_parameter(ToolParameter::new("metric_name", "Exact metric name", true))
                .with_example("TOOL_CALL: get_metric_metadata(metric_name=\"system.cpu.user\")"),
                |client, call| metrics::get_metric_metadata(client, call).boxed(),
            ),
        ]
    }

    pub fn spec(&self) -> &ToolSpec {
        &self.spec
    }
}

#[async_trait]
impl ToolExecutorPort for DatadogToolRegistry {
    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let Some(handler) = self.handlers.get(&call.tool_name) else {
            let mut names = self.tool_names();
            names.sort();
            return ToolResult::failure(
                &call.tool_name,
                format!(
                    "Unknown tool '{}'. Available tools: {}",
                    call.tool_name,
                    names.join(", ")
                ),
            );
        };

        match handler(&self.client, call).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Tool '{}' failed: {}", call.tool_name, e);
                ToolResult::failure(&call.tool_name, e.to_string())
            }
        }
    }

    fn catalog(&self) -> String {
        render_tool_catalog(&self.spec)
    }

    fn tool_names(&self) -> Vec<String> {
        self.spec.names().map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileDatadogConfig;

    fn registry() -> DatadogToolRegistry {
        // Empty credentials: handlers fail fast without touching the network
        let client = Arc::new(DatadogClient::new(&FileDatadogConfig::default()).unwrap());
        DatadogToolRegistry::new(client)
    }

    #[test]
    fn every_table_entry_has_definition_and_handler() {
        let registry = registry();
        assert_eq!(registry.spec().len(), 19);
        for name in registry.tool_names() {
            assert!(registry.handlers.contains_key(&name));
        }
    }

    #[test]
    fn analysis_tools_are_registered() {
        let registry = registry();
        for name in [
            "analyze_log_patterns",
            "get_log_streams",
            "analyze_metric_trends",
            "analyze_event_patterns",
            "get_deployment_events",
            "get_alert_events",
            "analyze_dashboard",
            "get_widget_data",
        ] {
            assert!(registry.spec().contains(name), "missing {}", name);
        }
    }

    #[tokio::test]
    async fn unknown_tool_lists_available_names() {
        let registry = registry();
        let result = registry.execute(&ToolCall::new("restart_server")).await;

        assert!(!result.is_success());
        let error = result.error().unwrap();
        assert!(error.contains("Unknown tool 'restart_server'"));
        assert!(error.contains("get_monitors"));
        assert!(error.contains("query_metrics"));
    }

    #[tokio::test]
    async fn handler_errors_become_failure_results() {
        // Missing credentials surface as a failure result, not an Err or panic
        let registry = registry();
        let result = registry.execute(&ToolCall::new("get_monitors")).await;

        assert!(!result.is_success());
        assert!(result.error().unwrap().contains("credentials"));
    }

    #[tokio::test]
    async fn missing_required_argument_is_contained() {
        let registry = registry();
        let result = registry.execute(&ToolCall::new("query_metrics")).await;

        assert!(!result.is_success());
        assert!(result.error().unwrap().contains("Missing required argument: query"));
    }

    #[test]
    fn duplicate_registration_keeps_the_last_definition() {
        let table: Vec<(ToolDefinition, Handler)> = vec![
            (
                ToolDefinition::new("get_monitors", "old", "monitors"),
                |client, call| monitors::get_monitors(client, call).boxed(),
            ),
            (
                ToolDefinition::new("get_monitors", "new", "monitors"),
                |client, call| monitors::get_monitors(client, call).boxed(),
            ),
        ];
        let (spec, handlers) = DatadogToolRegistry::build(table);

        assert_eq!(spec.len(), 1);
        assert_eq!(handlers.len(), 1);
        assert_eq!(spec.get("get_monitors").map(|t| t.description.as_str()), Some("new"));
    }

    #[test]
    fn catalog_covers_every_group() {
        let catalog = registry().catalog();
        for group in ["monitors", "dashboards", "logs", "events", "metrics"] {
            assert!(catalog.contains(&format!("## {}", group)), "missing {}", group);
        }
    }
}
