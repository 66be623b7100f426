//! Use cases

pub mod run_chat;
