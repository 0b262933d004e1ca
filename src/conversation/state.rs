//! Conversation phases — what the controller is waiting for.

use serde::{Deserialize, Serialize};

use crate::profile::ProfileState;

/// The phases of an intake conversation.
///
/// NoProfile → AwaitingCreationDetails, either → ProfileActive. Failed
/// actions never move the phase; only a model clearing the profile leaves
/// ProfileActive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationPhase {
    #[default]
    NoProfile,
    AwaitingCreationDetails,
    ProfileActive,
}

impl ConversationPhase {
    /// Check if a transition from `self` to `target` is valid.
    ///
    /// Staying in the same phase is always valid.
    pub fn can_transition_to(&self, target: ConversationPhase) -> bool {
        use ConversationPhase::*;
        *self == target
            || matches!(
                (self, target),
                (NoProfile, AwaitingCreationDetails)
                    | (NoProfile, ProfileActive)
                    | (AwaitingCreationDetails, ProfileActive)
                    | (ProfileActive, NoProfile)
            )
    }

    /// Phase implied by the profile after a model-driven action.
    ///
    /// An active profile always means ProfileActive; an inactive one only
    /// forces a change when the conversation believed a profile was loaded.
    pub fn reconcile(&self, profile: &ProfileState) -> ConversationPhase {
        match (profile.is_active(), self) {
            (true, _) => Self::ProfileActive,
            (false, Self::ProfileActive) => Self::NoProfile,
            (false, phase) => *phase,
        }
    }
}

impl std::fmt::Display for ConversationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NoProfile => "no_profile",
            Self::AwaitingCreationDetails => "awaiting_creation_details",
            Self::ProfileActive => "profile_active",
        };
        write!(f, "{s}")
    }
}
