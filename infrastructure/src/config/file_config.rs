//! Raw configuration file structures
//!
//! Mirrors the layout of `dogtalk.toml`. Every section and field has a
//! default, so a missing or partial file always produces a usable config.

use serde::{Deserialize, Serialize};

/// Top-level configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub llm: FileLlmConfig,
    pub datadog: FileDatadogConfig,
    pub chat: FileChatConfig,
}

/// `[llm]` section: the OpenAI-compatible completion endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLlmConfig {
    /// Full URL of the chat completions endpoint
    pub api_url: String,
    /// Model name sent with each request
    pub model: String,
    /// Bearer token (usually set via OPENAI_API_KEY instead)
    pub api_key: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for FileLlmConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: String::new(),
            max_tokens: 1500,
            temperature: 0.3,
        }
    }
}

/// `[datadog]` section: API credentials and site
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDatadogConfig {
    /// API key (usually set via DD_API_KEY instead)
    pub api_key: String,
    /// Application key (usually set via DD_APP_KEY instead)
    pub app_key: String,
    /// Datadog site, e.g. "datadoghq.com" or "datadoghq.eu"
    pub site: String,
    /// Per-request timeout for Datadog API calls
    pub timeout_secs: u64,
    /// Skip TLS certificate verification (for intercepting proxies)
    pub insecure_skip_verify: bool,
}

impl Default for FileDatadogConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            app_key: String::new(),
            site: "datadoghq.com".to_string(),
            timeout_secs: 30,
            insecure_skip_verify: false,
        }
    }
}

/// `[chat]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChatConfig {
    /// History messages sent with each request
    pub max_history_turns: usize,
}

impl Default for FileChatConfig {
    fn default() -> Self {
        Self {
            max_history_turns: 20,
        }
    }
}
