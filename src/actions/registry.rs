//! Action registry — the closed set of actions exposed to the driving model.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::actions::builtin;
use crate::error::ActionError;
use crate::profile::ProfileState;
use crate::store::ProfileStore;

/// Every action the assistant can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    LookupProfile,
    CreateProfile,
    GetProfile,
    SetProfile,
    InterviewTips,
}

impl ActionKind {
    pub const ALL: [ActionKind; 5] = [
        Self::LookupProfile,
        Self::CreateProfile,
        Self::GetProfile,
        Self::SetProfile,
        Self::InterviewTips,
    ];

    /// Wire name used in function calls.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LookupProfile => "lookup_profile",
            Self::CreateProfile => "create_profile",
            Self::GetProfile => "get_profile",
            Self::SetProfile => "set_profile",
            Self::InterviewTips => "interview_tips",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::LookupProfile => "Look up user profile by name",
            Self::CreateProfile => "Create user profile",
            Self::GetProfile => "Get the current user profile details",
            Self::SetProfile => "Set user profile information",
            Self::InterviewTips => "Provide interview tips",
        }
    }

    pub fn parameters_schema(&self) -> serde_json::Value {
        match self {
            Self::LookupProfile => serde_json::json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "User's name to look up"
                    }
                },
                "required": ["name"]
            }),
            Self::CreateProfile | Self::SetProfile => serde_json::json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "User's name"
                    },
                    "school": {
                        "type": "string",
                        "description": "User's school name"
                    },
                    "interview_status": {
                        "type": "string",
                        "description": "Interview status or notes"
                    }
                },
                "required": ["name", "school", "interview_status"]
            }),
            Self::GetProfile | Self::InterviewTips => serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        }
    }

    pub fn descriptor(&self) -> ActionDescriptor {
        ActionDescriptor {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Static metadata advertising one action to the driving model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct LookupParams {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ProfileParams {
    name: String,
    school: String,
    interview_status: String,
}

/// Registry of available actions, bound to one shared profile store.
pub struct ActionRegistry {
    store: Arc<dyn ProfileStore>,
    by_name: HashMap<&'static str, ActionKind>,
}

impl ActionRegistry {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        let by_name = ActionKind::ALL
            .iter()
            .map(|kind| (kind.name(), *kind))
            .collect();
        Self { store, by_name }
    }

    /// Resolve a wire name to its action.
    pub fn resolve(&self, name: &str) -> Result<ActionKind, ActionError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| ActionError::UnknownAction {
                name: name.to_string(),
            })
    }

    /// Descriptors for every action, in declaration order.
    pub fn descriptors(&self) -> Vec<ActionDescriptor> {
        ActionKind::ALL.iter().map(ActionKind::descriptor).collect()
    }

    /// Number of registered actions.
    pub fn count(&self) -> usize {
        self.by_name.len()
    }

    /// Invoke an action by wire name.
    pub async fn invoke_by_name(
        &self,
        name: &str,
        arguments: serde_json::Value,
        profile: &mut ProfileState,
    ) -> Result<String, ActionError> {
        let kind = self.resolve(name)?;
        self.invoke(kind, arguments, profile).await
    }

    /// Invoke an action against the conversation's profile state.
    pub async fn invoke(
        &self,
        kind: ActionKind,
        arguments: serde_json::Value,
        profile: &mut ProfileState,
    ) -> Result<String, ActionError> {
        tracing::debug!(action = %kind, "Invoking action");
        let store = self.store.as_ref();
        match kind {
            ActionKind::LookupProfile => {
                let params: LookupParams = parse_params(kind, arguments)?;
                builtin::lookup_profile(store, profile, &params.name).await
            }
            ActionKind::CreateProfile => {
                let params: ProfileParams = parse_params(kind, arguments)?;
                builtin::create_profile(
                    store,
                    profile,
                    &params.name,
                    &params.school,
                    &params.interview_status,
                )
                .await
            }
            ActionKind::GetProfile => Ok(builtin::get_profile(profile)),
            ActionKind::SetProfile => {
                let params: ProfileParams = parse_params(kind, arguments)?;
                Ok(builtin::set_profile(
                    profile,
                    &params.name,
                    &params.school,
                    &params.interview_status,
                ))
            }
            ActionKind::InterviewTips => Ok(builtin::interview_tips()),
        }
    }
}

fn parse_params<T: DeserializeOwned>(
    kind: ActionKind,
    arguments: serde_json::Value,
) -> Result<T, ActionError> {
    serde_json::from_value(arguments).map_err(|e| ActionError::InvalidParameters {
        name: kind.name().to_string(),
        reason: e.to_string(),
    })
}
