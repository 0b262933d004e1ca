//! Profile data models.

use serde::{Deserialize, Serialize};

/// Derive the storage id for a profile name.
///
/// Lowercases the name and joins its whitespace-separated words with `_`,
/// so `"Ada  Lovelace "` and `"ada lovelace"` map to the same id.
pub fn profile_id(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// A stored profile, keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub id: String,
    pub name: String,
    pub school: String,
    pub interview_status: String,
}

impl ProfileRecord {
    /// Build a record whose id is derived from `name`.
    pub fn new(
        name: impl Into<String>,
        school: impl Into<String>,
        interview_status: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            id: profile_id(&name),
            name,
            school: school.into(),
            interview_status: interview_status.into(),
        }
    }
}

/// The profile currently known to one conversation.
///
/// Starts empty. Considered active once `name` is non-empty. Carries no
/// stored id: the record id is always derived from `name`, see [`ProfileState::id`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileState {
    pub name: String,
    pub school: String,
    pub interview_status: String,
}

impl ProfileState {
    pub fn is_active(&self) -> bool {
        !self.name.is_empty()
    }

    /// Storage id of the active profile, `None` while inactive.
    pub fn id(&self) -> Option<String> {
        self.is_active().then(|| profile_id(&self.name))
    }

    /// Overwrite every field.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        school: impl Into<String>,
        interview_status: impl Into<String>,
    ) {
        self.name = name.into();
        self.school = school.into();
        self.interview_status = interview_status.into();
    }

    /// Overwrite every field from a stored record.
    pub fn load(&mut self, record: &ProfileRecord) {
        self.set(&record.name, &record.school, &record.interview_status);
    }

    /// Render `<Field>: <value>` lines in fixed order.
    pub fn summary(&self) -> String {
        [
            ("Name", &self.name),
            ("School", &self.school),
            ("Interview_status", &self.interview_status),
        ]
        .iter()
        .map(|(label, value)| format!("{label}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
    }
}

impl From<&ProfileRecord> for ProfileState {
    fn from(record: &ProfileRecord) -> Self {
        let mut state = Self::default();
        state.load(record);
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_id_lowercases_and_joins_words() {
        assert_eq!(profile_id("Ada Lovelace"), "ada_lovelace");
        assert_eq!(profile_id("  Ada   Lovelace  "), "ada_lovelace");
        assert_eq!(profile_id("GRACE"), "grace");
        assert_eq!(profile_id("nonexistent-name"), "nonexistent-name");
        assert_eq!(profile_id("   "), "");
    }

    #[test]
    fn record_new_derives_id() {
        let record = ProfileRecord::new("Ada Lovelace", "Imperial", "scheduled");
        assert_eq!(record.id, "ada_lovelace");
        assert_eq!(record.name, "Ada Lovelace");
    }

    #[test]
    fn default_state_is_inactive() {
        let state = ProfileState::default();
        assert!(!state.is_active());
        assert!(state.school.is_empty());
        assert!(state.interview_status.is_empty());
    }

    #[test]
    fn state_is_active_once_name_is_set() {
        let mut state = ProfileState::default();
        state.set("Ada", "", "");
        assert!(state.is_active());
    }

    #[test]
    fn loaded_state_recovers_record_id() {
        let record = ProfileRecord::new("  Ada   Lovelace ", "Imperial", "scheduled");
        let state = ProfileState::from(&record);
        assert_eq!(state.id(), Some(record.id));
        assert_eq!(ProfileState::default().id(), None);
    }

    #[test]
    fn summary_has_three_lines_in_fixed_order() {
        let state = ProfileState::from(&ProfileRecord::new("Ada Lovelace", "Imperial", "scheduled"));
        let summary = state.summary();
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Name: Ada Lovelace",
                "School: Imperial",
                "Interview_status: scheduled"
            ]
        );
    }

    #[test]
    fn empty_summary_still_lists_every_field() {
        let summary = ProfileState::default().summary();
        assert_eq!(summary, "Name: \nSchool: \nInterview_status: ");
    }

    #[test]
    fn record_serde_roundtrip() {
        let record = ProfileRecord::new("Grace Hopper", "Yale", "offer");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "grace_hopper");
        let parsed: ProfileRecord = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, record);
    }
}
