//! Application layer for dogtalk
//!
//! This crate contains the chat use case, port definitions, and application
//! configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ChatParams;
pub use ports::llm_gateway::{GatewayError, LlmGateway};
pub use ports::tool_executor::ToolExecutorPort;
pub use use_cases::run_chat::RunChatUseCase;
