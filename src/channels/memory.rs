//! In-process channel — feeds scripted turns in and records what comes out.
//!
//! Used by tests and by callers embedding the assistant without a transport.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::channels::{ActionCall, ActionResult, Channel, InboundEvent, InboundStream, Turn, Utterance};
use crate::error::ChannelError;

/// Anything the conversation emitted, in emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Turn(Turn),
    ActionResult(ActionResult),
}

pub struct MemoryChannel {
    inbound_tx: Mutex<Option<mpsc::UnboundedSender<InboundEvent>>>,
    inbound_rx: Mutex<Option<mpsc::UnboundedReceiver<InboundEvent>>>,
    outbound: Mutex<Vec<Outbound>>,
}

impl MemoryChannel {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            inbound_tx: Mutex::new(Some(tx)),
            inbound_rx: Mutex::new(Some(rx)),
            outbound: Mutex::new(Vec::new()),
        }
    }

    /// Queue a plain-text user utterance.
    pub fn say(&self, text: &str) -> Result<(), ChannelError> {
        self.push(InboundEvent::Utterance(Utterance::user(text)))
    }

    /// Queue a model-requested action call.
    pub fn call(
        &self,
        call_id: &str,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<(), ChannelError> {
        self.push(InboundEvent::ActionCall(ActionCall {
            call_id: call_id.to_string(),
            name: name.to_string(),
            arguments,
        }))
    }

    pub fn push(&self, event: InboundEvent) -> Result<(), ChannelError> {
        let guard = lock(&self.inbound_tx);
        let tx = guard.as_ref().ok_or_else(|| ChannelError::Disconnected {
            name: "memory".to_string(),
            reason: "channel closed".to_string(),
        })?;
        tx.send(event).map_err(|_| ChannelError::Disconnected {
            name: "memory".to_string(),
            reason: "conversation ended".to_string(),
        })
    }

    /// Stop accepting input; the conversation ends once queued events drain.
    pub fn close(&self) {
        lock(&self.inbound_tx).take();
    }

    /// Everything emitted so far.
    pub fn outbound(&self) -> Vec<Outbound> {
        lock(&self.outbound).clone()
    }

    /// Emitted turns only.
    pub fn turns(&self) -> Vec<Turn> {
        lock(&self.outbound)
            .iter()
            .filter_map(|item| match item {
                Outbound::Turn(turn) => Some(turn.clone()),
                Outbound::ActionResult(_) => None,
            })
            .collect()
    }

    /// Emitted action results only.
    pub fn action_results(&self) -> Vec<ActionResult> {
        lock(&self.outbound)
            .iter()
            .filter_map(|item| match item {
                Outbound::ActionResult(result) => Some(result.clone()),
                Outbound::Turn(_) => None,
            })
            .collect()
    }
}

impl Default for MemoryChannel {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl Channel for MemoryChannel {
    fn name(&self) -> &str {
        "memory"
    }

    async fn start(&self) -> Result<InboundStream, ChannelError> {
        let rx = lock(&self.inbound_rx)
            .take()
            .ok_or_else(|| ChannelError::StartupFailed {
                name: "memory".to_string(),
                reason: "start() already called".to_string(),
            })?;
        Ok(Box::pin(UnboundedReceiverStream::new(rx)))
    }

    async fn emit_turn(&self, turn: &Turn) -> Result<(), ChannelError> {
        lock(&self.outbound).push(Outbound::Turn(turn.clone()));
        Ok(())
    }

    async fn emit_action_result(&self, result: &ActionResult) -> Result<(), ChannelError> {
        lock(&self.outbound).push(Outbound::ActionResult(result.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;
    use crate::channels::Role;

    #[tokio::test]
    async fn delivers_in_order_and_ends_on_close() {
        let channel = MemoryChannel::new();
        let mut stream = channel.start().await.unwrap();

        channel.say("first").unwrap();
        channel.say("second").unwrap();
        channel.close();

        let mut seen = Vec::new();
        while let Some(InboundEvent::Utterance(u)) = stream.next().await {
            seen.push(u.normalized_text());
        }
        assert_eq!(seen, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn start_twice_fails() {
        let channel = MemoryChannel::new();
        channel.start().await.unwrap();
        assert!(matches!(
            channel.start().await,
            Err(ChannelError::StartupFailed { .. })
        ));
    }

    #[tokio::test]
    async fn say_after_close_fails() {
        let channel = MemoryChannel::new();
        channel.close();
        assert!(channel.say("hello").is_err());
    }

    #[tokio::test]
    async fn records_emitted_turns() {
        let channel = MemoryChannel::new();
        channel.emit_turn(&Turn::user("hi")).await.unwrap();
        channel.emit_turn(&Turn::assistant("hello")).await.unwrap();

        let roles: Vec<Role> = channel.turns().iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant]);
        assert!(channel.action_results().is_empty());
    }
}
