//! Tool catalog rendering.
//!
//! Renders every registered tool into the markdown block embedded in the
//! system prompt. Regenerated on demand from the live spec, so the prompt
//! always matches what the dispatcher will actually accept. Groups and
//! tool names are sorted for a stable rendering.

use crate::tool::entities::ToolSpec;
use std::collections::BTreeMap;

/// Render the full tool catalog as markdown.
pub fn render_tool_catalog(spec: &ToolSpec) -> String {
    let mut groups: BTreeMap<&str, Vec<&crate::tool::entities::ToolDefinition>> = BTreeMap::new();
    for tool in spec.all() {
        groups.entry(tool.group.as_str()).or_default().push(tool);
    }

    let mut out = String::from("# Available tools\n");
    for (group, mut tools) in groups {
        tools.sort_by(|a, b| a.name.cmp(&b.name));

        out.push_str(&format!("\n## {}\n", group));
        for tool in tools {
            out.push_str(&format!("\n### {}\n{}\n", tool.name, tool.description));

            if !tool.parameters.is_empty() {
                out.push_str("\nParameters:\n");
                for param in &tool.parameters {
                    let requirement = if param.required { "required" } else { "optional" };
                    out.push_str(&format!(
                        "- `{}` ({}, {}): {}\n",
                        param.name, param.param_type, requirement, param.description
                    ));
                }
            }

            for example in &tool.examples {
                out.push_str(&format!("\nExample: {}\n", example));
            }
        }
    }
    out
}
