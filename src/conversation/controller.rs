//! ConversationController — decides, per user turn, which action to run and
//! what to say, and keeps the conversation's profile state.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::actions::{ActionKind, ActionRegistry};
use crate::channels::{ActionCall, ActionResult, Channel, Turn, Utterance};
use crate::error::{ActionError, ChannelError};
use crate::profile::ProfileState;

use super::prompts;
use super::state::ConversationPhase;
use super::transition::{Decision, decide};

/// Per-conversation controller. Owned by exactly one session task.
pub struct ConversationController {
    registry: Arc<ActionRegistry>,
    profile: ProfileState,
    phase: ConversationPhase,
}

impl ConversationController {
    pub fn new(registry: Arc<ActionRegistry>) -> Self {
        Self {
            registry,
            profile: ProfileState::default(),
            phase: ConversationPhase::default(),
        }
    }

    pub fn phase(&self) -> ConversationPhase {
        self.phase
    }

    pub fn profile(&self) -> &ProfileState {
        &self.profile
    }

    /// Emit the welcome message. Called once, before any user turn.
    pub async fn start(&self, channel: &dyn Channel) -> Result<(), ChannelError> {
        channel
            .emit_turn(&Turn::assistant(prompts::WELCOME_MESSAGE))
            .await
    }

    /// Handle one user utterance: echo it, decide, act, respond.
    ///
    /// Returns `false` when the utterance was empty and ignored.
    pub async fn handle_utterance(
        &mut self,
        utterance: &Utterance,
        channel: &dyn Channel,
    ) -> Result<bool, ChannelError> {
        let text = utterance.normalized_text();
        if text.is_empty() {
            debug!("Ignoring empty utterance");
            return Ok(false);
        }

        channel.emit_turn(&Turn::user(text.as_str())).await?;
        let reply = self.respond(&text).await;
        channel.emit_turn(&Turn::assistant(reply)).await?;
        Ok(true)
    }

    /// Run a model-requested action and return its result on the channel.
    pub async fn handle_action_call(
        &mut self,
        call: ActionCall,
        channel: &dyn Channel,
    ) -> Result<(), ChannelError> {
        let (output, success) = match self.invoke_action(&call.name, call.arguments).await {
            Ok(output) => (output, true),
            Err(ActionError::StoreUnavailable(reason)) => {
                error!(action = %call.name, reason = %reason, "Profile store unavailable");
                (prompts::RETRY_LATER.to_string(), false)
            }
            Err(e) => {
                warn!(action = %call.name, error = %e, "Model action call failed");
                (e.to_string(), false)
            }
        };
        channel
            .emit_action_result(&ActionResult {
                call_id: call.call_id,
                name: call.name,
                output,
                success,
            })
            .await
    }

    /// Decide on normalized user text and produce the assistant's reply.
    ///
    /// Never fails: action errors become conversational replies.
    pub async fn respond(&mut self, text: &str) -> String {
        let decision = decide(self.phase, text);
        debug!(phase = %self.phase, decision = ?decision, "Handling user turn");

        match decision {
            Decision::PromptCreation => {
                self.transition(ConversationPhase::AwaitingCreationDetails);
                prompts::CREATION_INSTRUCTIONS.to_string()
            }
            Decision::RepromptCreation => prompts::CREATION_INSTRUCTIONS.to_string(),
            Decision::Lookup { name } => {
                match self
                    .run(ActionKind::LookupProfile, serde_json::json!({ "name": name }))
                    .await
                {
                    Ok(reply) => {
                        if self.profile.is_active() {
                            self.transition(ConversationPhase::ProfileActive);
                        }
                        reply
                    }
                    Err(e) => self.recover(ActionKind::LookupProfile, e),
                }
            }
            Decision::Create {
                name,
                school,
                interview_status,
            } => {
                let arguments = serde_json::json!({
                    "name": name,
                    "school": school,
                    "interview_status": interview_status,
                });
                match self.run(ActionKind::CreateProfile, arguments).await {
                    Ok(reply) => {
                        self.transition(ConversationPhase::ProfileActive);
                        reply
                    }
                    Err(e) => self.recover(ActionKind::CreateProfile, e),
                }
            }
            Decision::ShowProfile => {
                match self
                    .run(ActionKind::GetProfile, serde_json::json!({}))
                    .await
                {
                    Ok(summary) => prompts::profile_details(&summary),
                    Err(e) => self.recover(ActionKind::GetProfile, e),
                }
            }
        }
    }

    /// Invoke any registered action by name on behalf of the driving model.
    pub async fn invoke_action(
        &mut self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<String, ActionError> {
        let kind = self.registry.resolve(name)?;
        let output = self.run(kind, arguments).await?;
        let next = self.phase.reconcile(&self.profile);
        self.transition(next);
        Ok(output)
    }

    async fn run(
        &mut self,
        kind: ActionKind,
        arguments: serde_json::Value,
    ) -> Result<String, ActionError> {
        self.registry
            .invoke(kind, arguments, &mut self.profile)
            .await
    }

    /// Turn an action failure into a reply. The phase never changes here.
    fn recover(&self, kind: ActionKind, err: ActionError) -> String {
        match err {
            ActionError::Validation { field } => {
                debug!(action = %kind, field = %field, "Rejected incomplete profile details");
                prompts::missing_field(&field)
            }
            ActionError::Conflict { id } => {
                info!(action = %kind, profile_id = %id, "Profile already exists");
                prompts::PROFILE_EXISTS.to_string()
            }
            ActionError::StoreUnavailable(reason) => {
                error!(action = %kind, phase = %self.phase, reason = %reason, "Profile store unavailable");
                prompts::RETRY_LATER.to_string()
            }
            other => {
                error!(action = %kind, phase = %self.phase, error = %other, "Action failed");
                prompts::GENERIC_APOLOGY.to_string()
            }
        }
    }

    fn transition(&mut self, next: ConversationPhase) {
        if next == self.phase {
            return;
        }
        if !self.phase.can_transition_to(next) {
            warn!(from = %self.phase, to = %next, "Unexpected phase transition");
        }
        debug!(from = %self.phase, to = %next, "Phase transition");
        self.phase = next;
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::actions::builtin;
    use crate::channels::{MemoryChannel, Role};
    use crate::error::StoreError;
    use crate::profile::ProfileRecord;
    use crate::store::{InMemoryProfileStore, ProfileStore};

    /// Store whose every call fails like a dropped database.
    struct UnavailableStore;

    #[async_trait]
    impl ProfileStore for UnavailableStore {
        async fn get(&self, _id: &str) -> Result<Option<ProfileRecord>, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn create(&self, _record: ProfileRecord) -> Result<ProfileRecord, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
    }

    fn controller_with(store: Arc<dyn ProfileStore>) -> ConversationController {
        ConversationController::new(Arc::new(ActionRegistry::new(store)))
    }

    fn controller() -> ConversationController {
        controller_with(Arc::new(InMemoryProfileStore::new()))
    }

    #[tokio::test]
    async fn starts_without_profile_and_welcomes() {
        let controller = controller();
        let channel = MemoryChannel::new();
        assert_eq!(controller.phase(), ConversationPhase::NoProfile);

        controller.start(&channel).await.unwrap();
        let turns = channel.turns();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].role, Role::Assistant);
        assert_eq!(turns[0].content, prompts::WELCOME_MESSAGE);
    }

    #[tokio::test]
    async fn create_profile_trigger_awaits_details() {
        let mut controller = controller();
        let reply = controller.respond("I want to Create Profile").await;
        assert_eq!(reply, prompts::CREATION_INSTRUCTIONS);
        assert_eq!(controller.phase(), ConversationPhase::AwaitingCreationDetails);
        assert!(!controller.profile().is_active());
    }

    #[tokio::test]
    async fn full_creation_flow() {
        let store = Arc::new(InMemoryProfileStore::new());
        let mut controller = controller_with(store.clone());

        controller.respond("create profile").await;
        let reply = controller.respond("Ada Lovelace, Imperial, scheduled").await;
        assert_eq!(reply, builtin::PROFILE_CREATED);
        assert_eq!(controller.phase(), ConversationPhase::ProfileActive);
        assert!(store.get("ada_lovelace").await.unwrap().is_some());

        let first = controller.respond("what do you know about me?").await;
        let second = controller.respond("and again?").await;
        assert_eq!(first, second);
        assert_eq!(
            first,
            "Your profile details:\nName: Ada Lovelace\nSchool: Imperial\nInterview_status: scheduled"
        );
    }

    #[tokio::test]
    async fn malformed_details_reprompt_and_stay() {
        let mut controller = controller();
        controller.respond("create profile").await;
        let reply = controller.respond("just some text").await;
        assert_eq!(reply, prompts::CREATION_INSTRUCTIONS);
        assert_eq!(controller.phase(), ConversationPhase::AwaitingCreationDetails);
    }

    #[tokio::test]
    async fn empty_field_is_corrected_and_stays() {
        let mut controller = controller();
        controller.respond("create profile").await;
        let reply = controller.respond("Ada, , scheduled").await;
        assert_eq!(reply, prompts::missing_field("school"));
        assert_eq!(controller.phase(), ConversationPhase::AwaitingCreationDetails);
        assert!(!controller.profile().is_active());
    }

    #[tokio::test]
    async fn lookup_of_unknown_name_stays_without_profile() {
        let mut controller = controller();
        let reply = controller.respond("nonexistent-name").await;
        assert_eq!(reply, builtin::PROFILE_NOT_FOUND);
        assert_eq!(controller.phase(), ConversationPhase::NoProfile);
        assert!(!controller.profile().is_active());
    }

    #[tokio::test]
    async fn lookup_of_known_name_activates_profile() {
        let store = Arc::new(InMemoryProfileStore::new());
        store
            .create(ProfileRecord::new("Ada Lovelace", "Imperial", "scheduled"))
            .await
            .unwrap();

        let mut controller = controller_with(store);
        let reply = controller.respond("ada lovelace").await;
        assert!(reply.starts_with("Profile found:\n"));
        assert_eq!(controller.phase(), ConversationPhase::ProfileActive);
        assert_eq!(controller.profile().school, "Imperial");
    }

    #[tokio::test]
    async fn duplicate_name_keeps_awaiting_details() {
        let store = Arc::new(InMemoryProfileStore::new());
        store
            .create(ProfileRecord::new("Ada Lovelace", "Imperial", "scheduled"))
            .await
            .unwrap();

        let mut controller = controller_with(store);
        controller.respond("create profile").await;
        let reply = controller.respond("Ada Lovelace, Oxford, pending").await;
        assert_eq!(reply, prompts::PROFILE_EXISTS);
        assert_eq!(controller.phase(), ConversationPhase::AwaitingCreationDetails);
        assert!(!controller.profile().is_active());

        let reply = controller.respond("Ada King, Oxford, pending").await;
        assert_eq!(reply, builtin::PROFILE_CREATED);
        assert_eq!(controller.phase(), ConversationPhase::ProfileActive);
        assert_eq!(controller.profile().name, "Ada King");
    }

    #[tokio::test]
    async fn model_action_call_during_outage_reports_retry() {
        let mut controller = controller_with(Arc::new(UnavailableStore));
        let channel = MemoryChannel::new();

        controller
            .handle_action_call(
                ActionCall {
                    call_id: "call-1".into(),
                    name: "lookup_profile".into(),
                    arguments: serde_json::json!({"name": "Ada"}),
                },
                &channel,
            )
            .await
            .unwrap();

        let results = channel.action_results();
        assert_eq!(results.len(), 1);
        assert!(!results[0].success);
        assert_eq!(results[0].output, prompts::RETRY_LATER);
        assert!(!results[0].output.contains("connection refused"));
        assert_eq!(controller.phase(), ConversationPhase::NoProfile);
    }

    #[tokio::test]
    async fn store_outage_keeps_phase_and_apologizes() {
        let mut controller = controller_with(Arc::new(UnavailableStore));
        let reply = controller.respond("Ada Lovelace").await;
        assert_eq!(reply, prompts::RETRY_LATER);
        assert_eq!(controller.phase(), ConversationPhase::NoProfile);

        controller.respond("create profile").await;
        let reply = controller.respond("Ada, Imperial, scheduled").await;
        assert_eq!(reply, prompts::RETRY_LATER);
        assert_eq!(controller.phase(), ConversationPhase::AwaitingCreationDetails);
    }

    #[tokio::test]
    async fn echo_precedes_response() {
        let mut controller = controller();
        let channel = MemoryChannel::new();

        let handled = controller
            .handle_utterance(&Utterance::user("  create profile  "), &channel)
            .await
            .unwrap();
        assert!(handled);

        let turns = channel.turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[0].content, "create profile");
        assert_eq!(turns[1].role, Role::Assistant);
        assert_eq!(turns[1].content, prompts::CREATION_INSTRUCTIONS);
    }

    #[tokio::test]
    async fn empty_utterance_is_ignored() {
        let mut controller = controller();
        let channel = MemoryChannel::new();
        let handled = controller
            .handle_utterance(&Utterance::user("   "), &channel)
            .await
            .unwrap();
        assert!(!handled);
        assert!(channel.turns().is_empty());
    }

    #[tokio::test]
    async fn model_set_profile_activates_and_clearing_deactivates() {
        let mut controller = controller();
        let reply = controller
            .invoke_action(
                "set_profile",
                serde_json::json!({"name": "Grace", "school": "Yale", "interview_status": "offer"}),
            )
            .await
            .unwrap();
        assert_eq!(reply, builtin::PROFILE_UPDATED);
        assert_eq!(controller.phase(), ConversationPhase::ProfileActive);

        controller
            .invoke_action(
                "set_profile",
                serde_json::json!({"name": "", "school": "", "interview_status": ""}),
            )
            .await
            .unwrap();
        assert_eq!(controller.phase(), ConversationPhase::NoProfile);
    }

    #[tokio::test]
    async fn model_action_call_reports_failures() {
        let mut controller = controller();
        let channel = MemoryChannel::new();

        controller
            .handle_action_call(
                ActionCall {
                    call_id: "call-1".into(),
                    name: "launch_rockets".into(),
                    arguments: serde_json::Value::Null,
                },
                &channel,
            )
            .await
            .unwrap();
        controller
            .handle_action_call(
                ActionCall {
                    call_id: "call-2".into(),
                    name: "interview_tips".into(),
                    arguments: serde_json::Value::Null,
                },
                &channel,
            )
            .await
            .unwrap();

        let results = channel.action_results();
        assert_eq!(results.len(), 2);
        assert!(!results[0].success);
        assert_eq!(results[0].output, "Unknown action: launch_rockets");
        assert!(results[1].success);
        assert_eq!(results[1].output, builtin::INTERVIEW_TIPS);
        assert!(channel.turns().is_empty());
    }
}
