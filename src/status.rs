//! Mapping free-form status phrases to a Slack status.

use serde::Serialize;

const FALLBACK_EMOJI: &str = ":speech_balloon:";
const DO_NOT_DISTURB: &str = "Do not disturb";

/// Checked in order; the first keyword found in the phrase wins.
const KEYWORDS: &[(&str, &str)] = &[
    ("lunch", ":hamburger:"),
    ("coffee", ":coffee:"),
    ("busy", ":no_entry:"),
    ("errand", ":car:"),
    ("doctor", ":hospital:"),
    ("away", ":no_entry:"),
    ("call", ":phone:"),
    ("meeting", ":calendar:"),
    ("sick", ":face_with_thermometer:"),
    ("commuting", ":bus:"),
];

/// The text and emoji shown next to a Slack user's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusProfile {
    #[serde(rename = "status_text")]
    pub text: String,
    #[serde(rename = "status_emoji")]
    pub emoji: String,
}

impl StatusProfile {
    pub fn cleared() -> Self {
        Self { text: String::new(), emoji: String::new() }
    }

    pub fn is_cleared(&self) -> bool {
        self.text.is_empty() && self.emoji.is_empty()
    }
}

pub fn map_status(input: &str) -> StatusProfile {
    let lowered = input.to_lowercase();

    for (keyword, emoji) in KEYWORDS {
        if lowered.contains(keyword) {
            let text = if *keyword == "busy" { DO_NOT_DISTURB } else { input };
            return StatusProfile { text: text.to_string(), emoji: emoji.to_string() };
        }
    }

    StatusProfile { text: input.to_string(), emoji: FALLBACK_EMOJI.to_string() }
}
