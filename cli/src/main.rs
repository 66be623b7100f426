//! CLI entrypoint for dogtalk
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, bail};
use clap::Parser;
use dogtalk_application::{ChatParams, RunChatUseCase};
use dogtalk_domain::Conversation;
use dogtalk_infrastructure::{ConfigLoader, DatadogClient, DatadogToolRegistry, OpenAiGateway};
use dogtalk_presentation::{ChatRepl, Cli, ConsoleFormatter};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!(e))?
    };

    info!("Starting dogtalk (site: {})", config.datadog.site);

    // === Dependency Injection ===
    let gateway = Arc::new(OpenAiGateway::new(&config.llm));
    let client = Arc::new(DatadogClient::new(&config.datadog)?);
    let registry = Arc::new(DatadogToolRegistry::new(client));

    let use_case = RunChatUseCase::new(gateway, registry.clone()).with_params(
        ChatParams::default().with_max_history_turns(config.chat.max_history_turns),
    );

    // Chat mode
    if cli.chat {
        let repl = ChatRepl::new(use_case, registry);
        repl.run().await?;
        return Ok(());
    }

    // Single question mode - question is required
    let question = match cli.question {
        Some(q) => q,
        None => bail!("Question is required. Use --chat for interactive mode."),
    };

    let mut conversation = Conversation::new();
    let reply = use_case.execute(&question, &mut conversation).await;

    if cli.quiet {
        println!("{}", reply);
    } else {
        println!("\n{}", ConsoleFormatter::render(&reply));
    }

    Ok(())
}
