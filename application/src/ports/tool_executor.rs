//! Tool Executor port
//!
//! Defines the interface for dispatching tool calls.

use async_trait::async_trait;
use dogtalk_domain::{ToolCall, ToolResult};

/// Port for tool dispatch
///
/// This port defines how the application layer runs tools. Implementations
/// (adapters) live in the infrastructure layer. `execute` is total: unknown
/// names and handler errors come back as failure results, never as panics.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Execute a tool call, always producing a well-formed result.
    async fn execute(&self, call: &ToolCall) -> ToolResult;

    /// Render the tool catalog for the system prompt.
    fn catalog(&self) -> String;

    /// Names of all registered tools.
    fn tool_names(&self) -> Vec<String>;

    /// Check if a tool is registered
    fn has_tool(&self, name: &str) -> bool {
        self.tool_names().iter().any(|n| n == name)
    }
}
