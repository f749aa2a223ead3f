//! Line-oriented shell over the whale tools.
//!
//! Unlike the one-shot commands, the shell keeps a single registry (and so a
//! single pattern store) for the whole session, which lets `check` see what
//! `learn` stored.

use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use super::{load_registry, report};
use crate::command::ToolInput;

/// Strategy for the interactive tool shell.
#[derive(Debug, Clone, Copy)]
pub struct ShellStrategy;

impl super::CommandStrategy for ShellStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let registry = load_registry()?;
        info!("Shell ready with tools: {}", registry.names().join(", "));

        println!("Commands: learn <address> [limit], check <address>, summary <address>");
        println!("Type 'tools' to list tools, 'exit' to quit.");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let line = line.trim();

            match line {
                "" => {}
                "exit" | "quit" => break,
                "tools" => {
                    for definition in registry.definitions() {
                        println!("{}: {}", definition.name, definition.description);
                    }
                }
                _ => match ToolInput::parse_line(line) {
                    Ok(input) => {
                        let result = registry.execute(input.tool, input.arguments).await;
                        if let Err(e) = report(&result) {
                            eprintln!("{e}");
                        }
                    }
                    Err(e) => eprintln!("{e}"),
                },
            }
        }

        Ok(())
    }
}
