//! Tool domain entities

use crate::core::value::ArgValue;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Definition of a tool the model can invoke
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "get_monitors")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Catalog group this tool belongs to (e.g., "monitors", "logs")
    pub group: String,
    /// Parameter specifications
    pub parameters: Vec<ToolParameter>,
    /// Example invocations, shown verbatim in the catalog
    pub examples: Vec<String>,
}

/// Parameter specification for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Whether this parameter is required
    pub required: bool,
    /// Parameter type hint (e.g., "string", "integer", "list")
    pub param_type: String,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            group: group.into(),
            parameters: Vec::new(),
            examples: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.examples.push(example.into());
        self
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }
}

/// Specification of available tools
#[derive(Debug, Clone, Default)]
pub struct ToolSpec {
    tools: HashMap<String, ToolDefinition>,
}

impl ToolSpec {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool definition. Re-registering a name replaces the
    /// previous definition (last wins).
    pub fn register(mut self, tool: ToolDefinition) -> Self {
        self.tools.insert(tool.name.clone(), tool);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    pub fn all(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// A call to a tool with typed arguments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to call
    pub tool_name: String,
    /// Arguments passed to the tool
    pub arguments: HashMap<String, serde_json::Value>,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: HashMap::new(),
        }
    }

    /// Build a call from parsed argument values.
    pub fn from_args(tool_name: impl Into<String>, args: &BTreeMap<String, ArgValue>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: args
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    /// Get a required string argument or return an error message
    pub fn require_string(&self, key: &str) -> Result<&str, String> {
        self.get_string(key)
            .ok_or_else(|| format!("Missing required argument: {}", key))
    }

    /// Get an optional i64 argument
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.arguments.get(key).and_then(|v| v.as_i64())
    }

    /// Get an optional bool argument
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.arguments.get(key).and_then(|v| v.as_bool())
    }

    /// Get a list argument as strings
    pub fn get_string_list(&self, key: &str) -> Option<Vec<String>> {
        self.arguments.get(key).and_then(|v| v.as_array()).map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_definition() {
        let tool = ToolDefinition::new("get_monitors", "Fetch monitor states", "monitors")
            .with_parameter(ToolParameter::new("limit", "Max results", false).with_type("integer"))
            .with_example("TOOL_CALL: get_monitors(limit=10)");

        assert_eq!(tool.name, "get_monitors");
        assert_eq!(tool.group, "monitors");
        assert_eq!(tool.parameters.len(), 1);
        assert_eq!(tool.examples.len(), 1);
    }

    #[test]
    fn test_tool_spec_last_wins() {
        let spec = ToolSpec::new()
            .register(ToolDefinition::new("search_logs", "old", "logs"))
            .register(ToolDefinition::new("search_logs", "new", "logs"));

        assert_eq!(spec.len(), 1);
        assert_eq!(spec.get("search_logs").map(|t| t.description.as_str()), Some("new"));
    }

    #[test]
    fn test_tool_call_from_args() {
        let mut args = BTreeMap::new();
        args.insert("query".to_string(), ArgValue::Str("service:web".to_string()));
        args.insert("limit".to_string(), ArgValue::Int(5));

        let call = ToolCall::from_args("search_logs", &args);
        assert_eq!(call.get_string("query"), Some("service:web"));
        assert_eq!(call.get_i64("limit"), Some(5));
        assert!(call.require_string("missing").is_err());
    }

    #[test]
    fn test_tool_call_list_arg() {
        let call = ToolCall::new("get_monitors").with_arg("group_states", serde_json::json!(["alert", "warn"]));
        assert_eq!(
            call.get_string_list("group_states"),
            Some(vec!["alert".to_string(), "warn".to_string()])
        );
    }
}
