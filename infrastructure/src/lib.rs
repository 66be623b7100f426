//! Infrastructure layer for dogtalk
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the OpenAI-compatible chat gateway, the Datadog REST
//! client with its tool handlers, the tool registry, and configuration
//! file loading.

pub mod config;
pub mod datadog;
pub mod llm;
pub mod tools;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileChatConfig, FileConfig, FileDatadogConfig, FileLlmConfig,
};
pub use datadog::{DatadogClient, DatadogError};
pub use llm::OpenAiGateway;
pub use tools::DatadogToolRegistry;
