//! Tool-call extraction and argument parsing.
//!
//! The LLM signals a tool invocation in plain text. This module finds the
//! invocation ([`extract`]) and turns its argument text into typed values
//! ([`args`]). Both are pure string processing with no I/O.

pub mod args;
pub mod extract;
