//! Datadog REST API client and tool handlers.
//!
//! [`DatadogClient`] wraps the v1/v2 HTTP endpoints with the `DD-API-KEY` /
//! `DD-APPLICATION-KEY` header scheme and a bounded per-request timeout.
//! Each submodule hosts the handlers for one tool group; all of them return
//! `Result<ToolResult, DatadogError>` and are converted into failure results
//! at the registry boundary.

pub mod dashboards;
pub mod events;
pub mod logs;
pub mod metrics;
pub mod monitors;

use crate::config::FileDatadogConfig;
use dogtalk_domain::util::truncate_str;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// "error: 3, info: 12" style rendering of a count map, largest first.
pub(crate) fn distribution_line(counts: &BTreeMap<String, usize>) -> String {
    let mut entries: Vec<_> = counts.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    entries
        .into_iter()
        .map(|(name, count)| format!("{}: {}", name, count))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors from Datadog API access
#[derive(Error, Debug)]
pub enum DatadogError {
    #[error("Datadog credentials are not configured (set DD_API_KEY and DD_APP_KEY)")]
    MissingCredentials,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Datadog API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Unexpected response shape: {0}")]
    Shape(String),
}

/// Client for the Datadog REST API
#[derive(Debug, Clone)]
pub struct DatadogClient {
    http: reqwest::Client,
    api_key: String,
    app_key: String,
    api_base: String,
    app_base: String,
}

impl DatadogClient {
    pub fn new(config: &FileDatadogConfig) -> Result<Self, DatadogError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.insecure_skip_verify)
            .build()?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            app_key: config.app_key.clone(),
            api_base: format!("https://api.{}", config.site),
            app_base: format!("https://app.{}", config.site),
        })
    }

    /// Browser URL of a dashboard, for linking in results.
    pub fn dashboard_url(&self, id: &str) -> String {
        format!("{}/dashboard/{}", self.app_base, id)
    }

    fn check_credentials(&self) -> Result<(), DatadogError> {
        if self.api_key.is_empty() || self.app_key.is_empty() {
            return Err(DatadogError::MissingCredentials);
        }
        Ok(())
    }

    /// GET an API path with query parameters, returning the JSON body.
    pub async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, DatadogError> {
        self.check_credentials()?;
        let response = self
            .http
            .get(format!("{}{}", self.api_base, path))
            .header("DD-API-KEY", &self.api_key)
            .header("DD-APPLICATION-KEY", &self.app_key)
            .query(query)
            .send()
            .await?;
        Self::into_json(response).await
    }

    /// POST a JSON body to an API path, returning the JSON response body.
    pub async fn post(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DatadogError> {
        self.check_credentials()?;
        let response = self
            .http
            .post(format!("{}{}", self.api_base, path))
            .header("DD-API-KEY", &self.api_key)
            .header("DD-APPLICATION-KEY", &self.app_key)
            .json(body)
            .send()
            .await?;
        Self::into_json(response).await
    }

    async fn into_json(response: reqwest::Response) -> Result<serde_json::Value, DatadogError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DatadogError::Api {
                status: status.as_u16(),
                body: truncate_str(&body, 500).to_string(),
            });
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_credentials_are_rejected_before_any_request() {
        let client = DatadogClient::new(&FileDatadogConfig::default()).unwrap();
        assert!(matches!(
            client.check_credentials(),
            Err(DatadogError::MissingCredentials)
        ));
    }

    #[test]
    fn site_determines_both_hosts() {
        let config = FileDatadogConfig {
            site: "datadoghq.eu".to_string(),
            ..Default::default()
        };
        let client = DatadogClient::new(&config).unwrap();
        assert_eq!(client.api_base, "https://api.datadoghq.eu");
        assert_eq!(client.dashboard_url("abc-123"), "https://app.datadoghq.eu/dashboard/abc-123");
    }
}
