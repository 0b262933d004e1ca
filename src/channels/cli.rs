//! CLI channel — stdin/stdout REPL for local conversations.

use async_trait::async_trait;
use futures::stream;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::channels::{ActionResult, Channel, InboundEvent, InboundStream, Role, Turn, Utterance};
use crate::error::ChannelError;

/// A simple CLI channel that reads from stdin and writes to stdout.
pub struct CliChannel;

impl CliChannel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CliChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Channel for CliChannel {
    fn name(&self) -> &str {
        "cli"
    }

    async fn start(&self) -> Result<InboundStream, ChannelError> {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

        tokio::spawn(async move {
            let stdin = tokio::io::stdin();
            let reader = BufReader::new(stdin);
            let mut lines = reader.lines();

            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let line = line.trim().to_string();
                        if line.is_empty() {
                            eprint!("> ");
                            continue;
                        }
                        if tx.send(InboundEvent::Utterance(Utterance::user(line))).is_err() {
                            break;
                        }
                    }
                    Ok(None) => break, // EOF
                    Err(e) => {
                        tracing::error!("Error reading stdin: {}", e);
                        break;
                    }
                }
            }
        });

        let stream = stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|event| (event, rx))
        });

        Ok(Box::pin(stream))
    }

    async fn emit_turn(&self, turn: &Turn) -> Result<(), ChannelError> {
        match turn.role {
            Role::User => eprintln!("you> {}", turn.content),
            Role::Assistant => {
                println!("\n{}\n", turn.content);
                eprint!("> ");
            }
        }
        Ok(())
    }

    async fn emit_action_result(&self, result: &ActionResult) -> Result<(), ChannelError> {
        let mark = if result.success { "✅" } else { "❌" };
        eprintln!("{mark} {} → {}", result.name, result.output);
        Ok(())
    }
}
