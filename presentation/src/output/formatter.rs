//! Console output formatting
//!
//! Colors the assembled assistant reply for the terminal. The reply markers
//! come from the domain renderer; this only decorates them.

use colored::Colorize;

/// Formats assistant replies for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Colorize a reply line by line.
    pub fn render(reply: &str) -> String {
        let mut out = Vec::new();
        let mut in_fence = false;

        for line in reply.lines() {
            if line.starts_with("```") {
                in_fence = !in_fence;
                out.push(line.dimmed().to_string());
            } else if in_fence {
                out.push(line.to_string());
            } else if let Some(rest) = line.strip_prefix("[engaged] ") {
                out.push(format!("{} {}", "[engaged]".cyan().bold(), rest));
            } else if let Some(rest) = line.strip_prefix("[transmission] ") {
                out.push(format!("{} {}", "[transmission]".green().bold(), rest));
            } else if let Some(rest) = line.strip_prefix("[malfunction] ") {
                out.push(format!("{} {}", "[malfunction]".red().bold(), rest));
            } else if line.starts_with("-- dogtalk") {
                out.push(line.dimmed().to_string());
            } else {
                out.push(line.to_string());
            }
        }

        out.join("\n")
    }

    /// The startup banner for chat mode.
    pub fn banner(tool_count: usize) -> String {
        format!(
            "\n{}\n{}\n\n{} tools online. Ask about monitors, dashboards, logs, events, or metrics.\nType /help for commands.\n",
            "dogtalk".cyan().bold(),
            "monitoring operations droid".dimmed(),
            tool_count
        )
    }
}
