//! Domain layer for dogtalk
//!
//! Pure types and parsing logic with no I/O: conversation entities, tool
//! definitions and results, the textual tool-call extractor and argument
//! parser, prompt and catalog rendering, and time-range parsing.

pub mod call;
pub mod core;
pub mod prompt;
pub mod render;
pub mod session;
pub mod timerange;
pub mod tool;
pub mod util;

// Re-export commonly used types
pub use crate::call::args::{ArgParseError, parse_arguments};
pub use crate::call::extract::{ExtractedCall, MatchConfidence, extract_tool_call};
pub use crate::core::value::ArgValue;
pub use crate::render::{
    compose_direct_reply, compose_error_reply, compose_tool_reply, format_call_echo,
    format_tool_result,
};
pub use crate::session::entities::{Conversation, Message, Role};
pub use crate::timerange::parse_time_range;
pub use crate::tool::catalog::render_tool_catalog;
pub use crate::tool::entities::{ToolCall, ToolDefinition, ToolParameter, ToolSpec};
pub use crate::tool::value_objects::ToolResult;
