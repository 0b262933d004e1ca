//! Channel trait and the turn types that flow through it.

use std::pin::Pin;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::error::ChannelError;

/// Placeholder substituted for non-text content before decision logic runs.
pub const MEDIA_PLACEHOLDER: &str = "[media]";

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One element of a structured message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    Image { url: String },
}

/// Message content: plain text or a list of parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UtteranceContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// An inbound message as received from a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    pub role: Role,
    pub content: UtteranceContent,
}

impl Utterance {
    /// A plain-text user utterance.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: UtteranceContent::Text(text.into()),
        }
    }

    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self {
            role: Role::User,
            content: UtteranceContent::Parts(parts),
        }
    }

    /// Text the controller decides on: media parts become `[media]`,
    /// parts are joined by newlines, and the result is trimmed.
    pub fn normalized_text(&self) -> String {
        match &self.content {
            UtteranceContent::Text(text) => text.trim().to_string(),
            UtteranceContent::Parts(parts) => parts
                .iter()
                .map(|part| match part {
                    ContentPart::Text { text } => text.as_str(),
                    ContentPart::Image { .. } => MEDIA_PLACEHOLDER,
                })
                .collect::<Vec<_>>()
                .join("\n")
                .trim()
                .to_string(),
        }
    }
}

/// An outbound turn on the conversation channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub at: DateTime<Utc>,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            at: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// A function call requested by the driving model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionCall {
    pub call_id: String,
    pub name: String,
    #[serde(default)]
    pub arguments: serde_json::Value,
}

/// The reply to an [`ActionCall`], returned to the driving model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub call_id: String,
    pub name: String,
    pub output: String,
    pub success: bool,
}

/// Everything a channel can deliver to a conversation.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    Utterance(Utterance),
    ActionCall(ActionCall),
}

/// Stream of inbound events, in arrival order.
pub type InboundStream = Pin<Box<dyn Stream<Item = InboundEvent> + Send>>;

/// A transport carrying one conversation's turns.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Channel name for logs.
    fn name(&self) -> &str;

    /// Begin receiving. Can only be called once per channel.
    async fn start(&self) -> Result<InboundStream, ChannelError>;

    /// Push a turn outward.
    async fn emit_turn(&self, turn: &Turn) -> Result<(), ChannelError>;

    /// Return the outcome of a model-requested action.
    async fn emit_action_result(&self, result: &ActionResult) -> Result<(), ChannelError>;

    async fn shutdown(&self) -> Result<(), ChannelError> {
        Ok(())
    }
}
