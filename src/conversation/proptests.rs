//! Property tests for the decision function.

use proptest::prelude::*;

use super::state::ConversationPhase;
use super::transition::{Decision, decide, parse_creation_details};

fn arb_phase() -> impl Strategy<Value = ConversationPhase> {
    prop_oneof![
        Just(ConversationPhase::NoProfile),
        Just(ConversationPhase::AwaitingCreationDetails),
        Just(ConversationPhase::ProfileActive),
    ]
}

/// Random casing of the trigger phrase.
fn arb_trigger() -> impl Strategy<Value = String> {
    proptest::collection::vec(any::<bool>(), "create profile".len()).prop_map(|upper| {
        "create profile"
            .chars()
            .zip(upper)
            .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
            .collect()
    })
}

fn arb_field() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z .'-]{0,20}[A-Za-z]"
}

proptest! {
    #[test]
    fn trigger_in_any_case_prompts_creation(
        prefix in "[a-z ]{0,10}",
        trigger in arb_trigger(),
        suffix in "[a-z ]{0,10}",
    ) {
        let text = format!("{prefix}{trigger}{suffix}");
        prop_assert_eq!(decide(ConversationPhase::NoProfile, &text), Decision::PromptCreation);
    }

    #[test]
    fn three_fields_while_awaiting_create(
        name in arb_field(),
        school in arb_field(),
        status in arb_field(),
    ) {
        let text = format!("{name}, {school} ,{status}");
        prop_assert_eq!(
            decide(ConversationPhase::AwaitingCreationDetails, &text),
            Decision::Create {
                name: name.trim().to_string(),
                school: school.trim().to_string(),
                interview_status: status.trim().to_string(),
            }
        );
    }

    #[test]
    fn fewer_than_two_commas_never_parse(text in "[^,]{0,40}(,[^,]{0,40})?") {
        prop_assert!(parse_creation_details(&text).is_none());
        prop_assert_eq!(
            decide(ConversationPhase::AwaitingCreationDetails, &text),
            Decision::RepromptCreation
        );
    }

    #[test]
    fn active_profile_always_shows_profile(text in ".{0,80}") {
        prop_assert_eq!(decide(ConversationPhase::ProfileActive, &text), Decision::ShowProfile);
    }

    #[test]
    fn decisions_stay_within_allowed_transitions(phase in arb_phase(), text in ".{0,60}") {
        let next = match decide(phase, &text) {
            Decision::PromptCreation => ConversationPhase::AwaitingCreationDetails,
            Decision::Lookup { .. } | Decision::Create { .. } => ConversationPhase::ProfileActive,
            Decision::RepromptCreation | Decision::ShowProfile => phase,
        };
        prop_assert!(phase.can_transition_to(next), "{phase} -> {next}");
    }
}
