//! Outbound skill responses.
//!
//! [`build_response`] assembles a [`SkillResponse`]; [`ResponseEnvelope`] is
//! its wire form (`version`, `sessionAttributes`, `response`).

use serde::Serialize;
use serde_json::{Map, Value};

pub const SKILL_NAME: &str = "Bird Fetcher";

const LOCATION_PROMPT: &str =
    "Please tell me your location of interest by saying, birds near Binghamton New York.";

/// A fully assembled reply, before serialization.
#[derive(Clone, Debug, PartialEq)]
pub struct SkillResponse {
    pub session_attributes: Map<String, Value>,
    pub card_title: String,
    pub card_text: String,
    pub speech_text: String,
    pub reprompt_text: Option<String>,
    pub end_session: bool,
}

/// Assemble a response. No validation: a missing reprompt is only
/// meaningful when `end_session` is true, and callers keep to that.
pub fn build_response(
    session_attributes: Map<String, Value>,
    title: &str,
    speech_text: &str,
    reprompt_text: Option<&str>,
    end_session: bool,
) -> SkillResponse {
    SkillResponse {
        session_attributes,
        card_title: format!("{} - {}", SKILL_NAME, title),
        card_text: format!("{} - {}", SKILL_NAME, speech_text),
        speech_text: speech_text.to_string(),
        reprompt_text: reprompt_text.map(str::to_string),
        end_session,
    }
}

/// Launch and help reply: asks for a location and keeps the session open.
pub fn welcome_response() -> SkillResponse {
    let speech = format!("Welcome to the {} skill! {}", SKILL_NAME, LOCATION_PROMPT);
    build_response(Map::new(), "Welcome", &speech, Some(LOCATION_PROMPT), false)
}

/// Cancel and stop reply.
pub fn goodbye_response() -> SkillResponse {
    let speech = format!("Thank you for trying {}. Have a nice day!", SKILL_NAME);
    build_response(Map::new(), "Session Ended", &speech, None, true)
}

/// Reply when the location slot is missing or could not be looked up.
pub fn retry_response(title: &str) -> SkillResponse {
    build_response(
        Map::new(),
        title,
        "I'm not sure what your city is. Please try again by saying, birds near Binghamton New York",
        Some(LOCATION_PROMPT),
        false,
    )
}

/// Reply carrying the sightings summary; always ends the session.
pub fn sightings_response(title: &str, speech: &str) -> SkillResponse {
    build_response(Map::new(), title, speech, None, true)
}

/// Wire form of a [`SkillResponse`]
#[derive(Debug, Serialize)]
pub struct ResponseEnvelope {
    pub version: &'static str,
    #[serde(rename = "sessionAttributes")]
    pub session_attributes: Map<String, Value>,
    pub response: ResponseBody,
}

#[derive(Debug, Serialize)]
pub struct ResponseBody {
    #[serde(rename = "outputSpeech")]
    pub output_speech: OutputSpeech,
    pub card: Card,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    #[serde(rename = "shouldEndSession")]
    pub should_end_session: bool,
}

#[derive(Debug, Serialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub speech_type: &'static str,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct Card {
    #[serde(rename = "type")]
    pub card_type: &'static str,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct Reprompt {
    #[serde(rename = "outputSpeech")]
    pub output_speech: OutputSpeech,
}

impl OutputSpeech {
    fn plain_text(text: String) -> Self {
        Self {
            speech_type: "PlainText",
            text,
        }
    }
}

impl From<SkillResponse> for ResponseEnvelope {
    fn from(r: SkillResponse) -> Self {
        Self {
            version: "1.0",
            session_attributes: r.session_attributes,
            response: ResponseBody {
                output_speech: OutputSpeech::plain_text(r.speech_text),
                card: Card {
                    card_type: "Simple",
                    title: r.card_title,
                    content: r.card_text,
                },
                reprompt: r.reprompt_text.map(|text| Reprompt {
                    output_speech: OutputSpeech::plain_text(text),
                }),
                should_end_session: r.end_session,
            },
        }
    }
}
