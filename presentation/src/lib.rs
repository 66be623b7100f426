//! Presentation layer for dogtalk
//!
//! This crate contains the CLI definition, the interactive chat REPL, and
//! console output formatting.

pub mod chat;
pub mod cli;
pub mod output;

// Re-export commonly used types
pub use chat::repl::ChatRepl;
pub use cli::commands::Cli;
pub use output::formatter::ConsoleFormatter;
