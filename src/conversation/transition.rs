//! Pure decision function: phase + utterance text → what to do.
//!
//! No I/O happens here; the controller carries the decision out.

use super::ConversationPhase;

const CREATE_TRIGGER: &str = "create profile";

/// What the controller should do with one user utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Ask for `name, school, status`.
    PromptCreation,
    /// Treat the utterance as a name and look it up.
    Lookup { name: String },
    /// Create a profile from parsed details.
    Create {
        name: String,
        school: String,
        interview_status: String,
    },
    /// The details did not parse; ask again.
    RepromptCreation,
    /// Answer with the loaded profile.
    ShowProfile,
}

/// Decide how to handle `text` (already normalized) in `phase`.
pub fn decide(phase: ConversationPhase, text: &str) -> Decision {
    match phase {
        ConversationPhase::NoProfile if wants_new_profile(text) => Decision::PromptCreation,
        ConversationPhase::NoProfile => Decision::Lookup {
            name: text.to_string(),
        },
        ConversationPhase::AwaitingCreationDetails => match parse_creation_details(text) {
            Some((name, school, interview_status)) => Decision::Create {
                name,
                school,
                interview_status,
            },
            None => Decision::RepromptCreation,
        },
        ConversationPhase::ProfileActive => Decision::ShowProfile,
    }
}

/// Whether the user asked to create a profile (case-insensitive).
pub fn wants_new_profile(text: &str) -> bool {
    text.to_lowercase().contains(CREATE_TRIGGER)
}

/// Split `name, school, status`. Commas after the second belong to the status.
///
/// Fields are trimmed but may be empty; emptiness is the create action's
/// concern.
pub fn parse_creation_details(text: &str) -> Option<(String, String, String)> {
    let mut parts = text.splitn(3, ',').map(|part| part.trim().to_string());
    let name = parts.next()?;
    let school = parts.next()?;
    let interview_status = parts.next()?;
    Some((name, school, interview_status))
}
