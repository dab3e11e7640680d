use crate::error::SkillError;
use serde::Deserialize;
use std::collections::HashMap;


/// Inbound voice-platform request envelope.
#[derive(Clone, Debug, Deserialize)]
pub struct SkillRequest {
    pub session: Session,
    pub request: Event,
}

/// Platform session metadata
#[derive(Clone, Debug, Deserialize)]
pub struct Session {
    /// True on the first turn of a session
    #[serde(default)]
    pub new: bool,

    #[serde(rename = "sessionId")]
    pub session_id: String,

    pub application: Application,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Application {
    #[serde(rename = "applicationId")]
    pub application_id: String,
}

/// The request body, tagged by its `type` field.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    #[serde(rename = "LaunchRequest")]
    Launch {
        #[serde(rename = "requestId")]
        request_id: String,
    },

    #[serde(rename = "IntentRequest")]
    Intent {
        #[serde(rename = "requestId")]
        request_id: String,
        intent: Intent,
    },

    #[serde(rename = "SessionEndedRequest")]
    SessionEnded {
        #[serde(rename = "requestId")]
        request_id: String,
        #[serde(default)]
        reason: Option<String>,
    },

    /// Any request type this skill does not handle
    #[serde(other)]
    Unsupported,
}

/// A recognized intent with its slot values
#[derive(Clone, Debug, Deserialize)]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub slots: HashMap<String, Slot>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Slot {
    #[serde(default)]
    pub value: Option<String>,
}

impl SkillRequest {
    /// Fails closed unless the envelope carries `expected_application_id`.
    pub fn verify_application(&self, expected_application_id: &str) -> Result<(), SkillError> {
        let actual = &self.session.application.application_id;
        if actual != expected_application_id {
            return Err(SkillError::InvalidApplication(actual.clone()));
        }
        Ok(())
    }
}

impl Event {
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Event::Launch { request_id }
            | Event::Intent { request_id, .. }
            | Event::SessionEnded { request_id, .. } => Some(request_id.as_str()),
            Event::Unsupported => None,
        }
    }
}

impl Intent {
    /// Value of slot `name`, if present and non-blank.
    ///
    /// The platform sends slots the user did not fill with no `value`, so a
    /// key alone does not mean the slot was spoken.
    pub fn slot_value(&self, name: &str) -> Option<&str> {
        self.slots
            .get(name)
            .and_then(|slot| slot.value.as_deref())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}
