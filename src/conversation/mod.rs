//! Conversation control: phases, decisions, per-conversation sessions.

pub mod controller;
pub mod prompts;
pub mod session;
pub mod state;
pub mod transition;

#[cfg(test)]
mod proptests;

pub use controller::ConversationController;
pub use session::{ConversationSession, SessionOutcome};
pub use state::ConversationPhase;
pub use transition::{Decision, decide};
