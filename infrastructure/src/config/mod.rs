//! Configuration file loading for dogtalk

pub mod file_config;
pub mod loader;

pub use file_config::{FileChatConfig, FileConfig, FileDatadogConfig, FileLlmConfig};
pub use loader::ConfigLoader;
