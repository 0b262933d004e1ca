//! Built-in profile and informational actions.

use tracing::{debug, info};

use crate::error::ActionError;
use crate::profile::{ProfileRecord, ProfileState, profile_id};
use crate::store::ProfileStore;

pub const PROFILE_NOT_FOUND: &str = "Profile not found. Please provide your details to create a new profile by saying \"create profile\".";

pub const PROFILE_CREATED: &str = "Profile created successfully!";

pub const PROFILE_UPDATED: &str = "User profile updated.";

pub const INTERVIEW_TIPS: &str = "Here are some interview tips:\n\
- Research the company beforehand.\n\
- Practice common interview questions.\n\
- Dress professionally.\n\
- Be confident and clear in your answers.";

/// Look a profile up by name and load it into `profile` when found.
pub async fn lookup_profile(
    store: &dyn ProfileStore,
    profile: &mut ProfileState,
    name: &str,
) -> Result<String, ActionError> {
    let id = profile_id(name);
    if id.is_empty() {
        return Ok(PROFILE_NOT_FOUND.to_string());
    }

    match store.get(&id).await? {
        Some(record) => {
            info!(profile_id = %id, "Profile found");
            profile.load(&record);
            Ok(format!("Profile found:\n{}", profile.summary()))
        }
        None => {
            debug!(profile_id = %id, "Profile not found");
            Ok(PROFILE_NOT_FOUND.to_string())
        }
    }
}

/// Persist a new profile and make it the conversation's active profile.
pub async fn create_profile(
    store: &dyn ProfileStore,
    profile: &mut ProfileState,
    name: &str,
    school: &str,
    interview_status: &str,
) -> Result<String, ActionError> {
    let name = required("name", name)?;
    let school = required("school", school)?;
    let interview_status = required("interview_status", interview_status)?;

    let record = store
        .create(ProfileRecord::new(name, school, interview_status))
        .await?;
    info!(profile_id = %record.id, "Profile created");
    profile.load(&record);
    Ok(PROFILE_CREATED.to_string())
}

pub fn get_profile(profile: &ProfileState) -> String {
    profile.summary()
}

/// Overwrite the in-memory profile without touching the store.
pub fn set_profile(
    profile: &mut ProfileState,
    name: &str,
    school: &str,
    interview_status: &str,
) -> String {
    info!(
        name = %name,
        school = %school,
        interview_status = %interview_status,
        "Setting profile"
    );
    profile.set(name.trim(), school.trim(), interview_status.trim());
    PROFILE_UPDATED.to_string()
}

pub fn interview_tips() -> String {
    INTERVIEW_TIPS.to_string()
}

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, ActionError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ActionError::Validation {
            field: field.to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryProfileStore;

    #[tokio::test]
    async fn create_then_lookup_in_fresh_state() {
        let store = InMemoryProfileStore::new();
        let mut first = ProfileState::default();
        let reply = create_profile(&store, &mut first, "Ada Lovelace", "Imperial", "scheduled")
            .await
            .unwrap();
        assert_eq!(reply, PROFILE_CREATED);
        assert!(first.is_active());

        let mut fresh = ProfileState::default();
        let reply = lookup_profile(&store, &mut fresh, "Ada Lovelace").await.unwrap();
        assert!(reply.starts_with("Profile found:\n"));
        assert!(reply.contains("Name: Ada Lovelace"));
        assert!(reply.contains("School: Imperial"));
        assert!(reply.contains("Interview_status: scheduled"));
        assert_eq!(fresh.name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn lookup_missing_profile_leaves_state_inactive() {
        let store = InMemoryProfileStore::new();
        let mut state = ProfileState::default();
        let reply = lookup_profile(&store, &mut state, "nonexistent-name")
            .await
            .unwrap();
        assert_eq!(reply, PROFILE_NOT_FOUND);
        assert!(!state.is_active());
    }

    #[tokio::test]
    async fn lookup_blank_name_is_not_found() {
        let store = InMemoryProfileStore::new();
        let mut state = ProfileState::default();
        let reply = lookup_profile(&store, &mut state, "   ").await.unwrap();
        assert_eq!(reply, PROFILE_NOT_FOUND);
    }

    #[tokio::test]
    async fn create_rejects_empty_fields() {
        let store = InMemoryProfileStore::new();
        let mut state = ProfileState::default();
        let err = create_profile(&store, &mut state, "Ada", "  ", "scheduled")
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Validation { field } if field == "school"));
        assert!(!state.is_active());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn create_trims_fields() {
        let store = InMemoryProfileStore::new();
        let mut state = ProfileState::default();
        create_profile(&store, &mut state, " Ada ", " Imperial ", " scheduled ")
            .await
            .unwrap();
        assert_eq!(state.summary(), "Name: Ada\nSchool: Imperial\nInterview_status: scheduled");
    }

    #[tokio::test]
    async fn duplicate_create_is_a_conflict() {
        let store = InMemoryProfileStore::new();
        let mut state = ProfileState::default();
        create_profile(&store, &mut state, "Ada", "Imperial", "scheduled")
            .await
            .unwrap();

        let mut other = ProfileState::default();
        let err = create_profile(&store, &mut other, "ada", "UCL", "none")
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Conflict { id } if id == "ada"));
        assert!(!other.is_active());
    }

    #[test]
    fn get_profile_is_idempotent() {
        let mut state = ProfileState::default();
        set_profile(&mut state, "Ada", "Imperial", "scheduled");
        assert_eq!(get_profile(&state), get_profile(&state));
    }

    #[test]
    fn set_profile_overwrites_everything() {
        let mut state = ProfileState::default();
        set_profile(&mut state, "Ada", "Imperial", "scheduled");
        let reply = set_profile(&mut state, "Grace", "Yale", "offer");
        assert_eq!(reply, PROFILE_UPDATED);
        assert_eq!(state.name, "Grace");
        assert_eq!(state.school, "Yale");
        assert_eq!(state.interview_status, "offer");
    }

    #[test]
    fn tips_do_not_depend_on_state() {
        assert!(interview_tips().starts_with("Here are some interview tips:"));
        assert_eq!(interview_tips().lines().count(), 5);
    }
}
