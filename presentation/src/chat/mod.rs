//! Interactive chat module

pub mod repl;
