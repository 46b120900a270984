//! Outbound response envelope.

use serde::{Deserialize, Serialize};

/// Permission scope for reading a device's country and postal code.
pub const POSTAL_CODE_PERMISSION: &str = "read::alexa:device:all:address:country_and_postal_code";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillResponse {
    pub version: String,
    pub response: ResponseBody,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_end_session: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl OutputSpeech {
    fn plain(text: impl Into<String>) -> Self {
        Self { kind: "PlainText".to_string(), text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Card {
    LinkAccount,
    AskForPermissionsConsent { permissions: Vec<String> },
}

impl SkillResponse {
    fn with_body(response: ResponseBody) -> Self {
        Self { version: "1.0".to_string(), response }
    }

    /// Speak and keep the session open for an answer.
    pub fn ask(speech: impl Into<String>, reprompt: impl Into<String>) -> Self {
        Self::with_body(ResponseBody {
            output_speech: Some(OutputSpeech::plain(speech)),
            reprompt: Some(Reprompt { output_speech: OutputSpeech::plain(reprompt) }),
            should_end_session: Some(false),
            ..Default::default()
        })
    }

    /// Speak and end the session.
    pub fn tell(speech: impl Into<String>) -> Self {
        Self::with_body(ResponseBody {
            output_speech: Some(OutputSpeech::plain(speech)),
            should_end_session: Some(true),
            ..Default::default()
        })
    }

    pub fn tell_with_link_account(speech: impl Into<String>) -> Self {
        let mut response = Self::tell(speech);
        response.response.card = Some(Card::LinkAccount);
        response
    }

    pub fn tell_with_permissions(speech: impl Into<String>, permissions: &[&str]) -> Self {
        let mut response = Self::tell(speech);
        response.response.card = Some(Card::AskForPermissionsConsent {
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        });
        response
    }

    /// Acknowledgement for requests that must not produce speech.
    pub fn empty() -> Self {
        Self::with_body(ResponseBody::default())
    }

    pub fn speech(&self) -> Option<&str> {
        self.response.output_speech.as_ref().map(|s| s.text.as_str())
    }

    pub fn reprompt(&self) -> Option<&str> {
        self.response.reprompt.as_ref().map(|r| r.output_speech.text.as_str())
    }

    pub fn ends_session(&self) -> bool {
        self.response.should_end_session.unwrap_or(true)
    }

    pub fn card(&self) -> Option<&Card> {
        self.response.card.as_ref()
    }
}
