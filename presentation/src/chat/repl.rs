//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::ConsoleFormatter;
use dogtalk_application::{RunChatUseCase, ToolExecutorPort};
use dogtalk_domain::Conversation;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::sync::Arc;

/// Interactive chat REPL
pub struct ChatRepl {
    use_case: RunChatUseCase,
    tools: Arc<dyn ToolExecutorPort>,
}

impl ChatRepl {
    pub fn new(use_case: RunChatUseCase, tools: Arc<dyn ToolExecutorPort>) -> Self {
        Self { use_case, tools }
    }

    /// Run the interactive REPL
    pub async fn run(&self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        // Try to load history
        let history_path = dirs::data_dir().map(|p| p.join("dogtalk").join("history.txt"));

        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        println!("{}", ConsoleFormatter::banner(self.tools.tool_names().len()));

        let mut conversation = Conversation::new();

        loop {
            let readline = rl.readline("dogtalk> ");

            match readline {
                Ok(line) => {
                    let line = line.trim();

                    // Skip empty lines
                    if line.is_empty() {
                        continue;
                    }

                    // Handle commands
                    if line.starts_with('/') {
                        if self.handle_command(line, &mut conversation) {
                            break;
                        }
                        continue;
                    }

                    // Add to history
                    let _ = rl.add_history_entry(line);

                    let reply = self.use_case.execute(line, &mut conversation).await;
                    println!("\n{}\n", ConsoleFormatter::render(&reply));
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("dogtalk powering down.");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        // Save history
        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    /// Handle slash commands. Returns true if should exit.
    fn handle_command(&self, cmd: &str, conversation: &mut Conversation) -> bool {
        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("dogtalk powering down.");
                true
            }
            "/help" | "/h" | "/?" => {
                println!();
                println!("Commands:");
                println!("  /help, /h, /?    - Show this help");
                println!("  /tools           - List available tools");
                println!("  /clear           - Forget the conversation so far");
                println!("  /quit, /exit, /q - Exit chat");
                println!();
                false
            }
            "/tools" => {
                let mut names = self.tools.tool_names();
                names.sort();
                println!();
                println!("Available tools:");
                for name in names {
                    println!("  - {}", name);
                }
                println!();
                false
            }
            "/clear" => {
                conversation.clear();
                println!("Conversation cleared.");
                false
            }
            _ => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
                false
            }
        }
    }
}
