//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for dogtalk
#[derive(Parser, Debug)]
#[command(name = "dogtalk")]
#[command(author, version, about = "Conversational Datadog assistant - ask about monitors, logs, events, and metrics in plain English")]
#[command(long_about = r#"
Dogtalk answers questions about your Datadog installation. An LLM translates
the question into a tool call, the tool queries the Datadog API, and a second
pass narrates the result.

Credentials come from DD_API_KEY / DD_APP_KEY (Datadog) and OPENAI_API_KEY
(completions), or from a config file.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./dogtalk.toml      Project-level config
3. ~/.config/dogtalk/config.toml   Global config

Example:
  dogtalk "any monitors alerting right now?"
  dogtalk "error logs for the payments service in the last hour"
  dogtalk --chat
"#)]
pub struct Cli {
    /// The question to ask (not required in chat mode)
    pub question: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress the banner and decorations
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
