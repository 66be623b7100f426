//! Port definitions (interfaces for external adapters)

pub mod llm_gateway;
pub mod tool_executor;
