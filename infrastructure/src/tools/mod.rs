//! Tool registry binding definitions to Datadog handlers.

pub mod registry;

pub use registry::DatadogToolRegistry;
