//! ConversationSession — drives one controller over one channel until the
//! inbound stream ends.

use std::sync::Arc;

use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::actions::ActionRegistry;
use crate::channels::{Channel, InboundEvent};
use crate::error::Error;

use super::controller::ConversationController;
use super::state::ConversationPhase;

/// How a finished conversation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOutcome {
    /// User turns that produced a response (empty utterances excluded).
    pub turns_handled: usize,
    /// Action calls executed on behalf of the driving model.
    pub actions_handled: usize,
    pub final_phase: ConversationPhase,
}

/// One conversation: its own controller and profile state, one channel.
///
/// Events are processed strictly in arrival order; a turn finishes before
/// the next one is read.
pub struct ConversationSession {
    controller: ConversationController,
    channel: Arc<dyn Channel>,
    label: String,
}

impl ConversationSession {
    pub fn new(registry: Arc<ActionRegistry>, channel: Arc<dyn Channel>) -> Self {
        let label = channel.name().to_string();
        Self {
            controller: ConversationController::new(registry),
            channel,
            label,
        }
    }

    /// Tag log lines with a room or connection name.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Run until the channel's inbound stream ends.
    pub async fn run(mut self) -> Result<SessionOutcome, Error> {
        let channel = Arc::clone(&self.channel);
        let mut inbound = channel.start().await?;
        info!(session = %self.label, channel = channel.name(), "Conversation started");

        self.controller.start(channel.as_ref()).await?;

        let mut turns_handled = 0;
        let mut actions_handled = 0;
        while let Some(event) = inbound.next().await {
            match event {
                InboundEvent::Utterance(utterance) => {
                    if self
                        .controller
                        .handle_utterance(&utterance, channel.as_ref())
                        .await?
                    {
                        turns_handled += 1;
                    }
                }
                InboundEvent::ActionCall(call) => {
                    self.controller
                        .handle_action_call(call, channel.as_ref())
                        .await?;
                    actions_handled += 1;
                }
            }
        }

        if let Err(e) = channel.shutdown().await {
            warn!(session = %self.label, error = %e, "Channel shutdown failed");
        }

        let outcome = SessionOutcome {
            turns_handled,
            actions_handled,
            final_phase: self.controller.phase(),
        };
        info!(
            session = %self.label,
            turns = outcome.turns_handled,
            actions = outcome.actions_handled,
            phase = %outcome.final_phase,
            "Conversation ended"
        );
        Ok(outcome)
    }

    /// Run on its own task.
    pub fn spawn(self) -> JoinHandle<Result<SessionOutcome, Error>> {
        tokio::spawn(self.run())
    }
}
