//! Error types for the skill.
//!
//! The `Display` text of every variant is what the user hears, so keep the
//! wording speakable.

use thiserror::Error;

use crate::location::ResolveError;

#[derive(Debug, Error)]
pub enum SkillError {
    #[error("Please link your Slack account using the Alexa app.")]
    NotLinked,

    #[error("I didn't understand the {0} you asked for.")]
    MissingSlot(&'static str),

    #[error("I couldn't understand the time {0}.")]
    InvalidTime(String),

    #[error(transparent)]
    Location(#[from] ResolveError),

    #[error("Slack returned an error: {0}")]
    Slack(String),
}

pub type Result<T> = std::result::Result<T, SkillError>;
