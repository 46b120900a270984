//! Handler for anything the skill doesn't recognise.

use super::{Services, Turn, TurnHandler};
use crate::alexa::SkillResponse;
use async_trait::async_trait;
use log::warn;

pub const NOT_UNDERSTOOD: &str = "Sorry, I didn't get that. What would you like to do?";
pub const NOT_UNDERSTOOD_REPROMPT: &str = "You can say, set my status, or, clear my status.";

#[derive(Debug)]
pub struct FallbackHandler;

#[async_trait]
impl TurnHandler for FallbackHandler {
    async fn handle(&self, turn: &Turn<'_>, _services: &Services) -> SkillResponse {
        warn!(
            "Unhandled request {} / {}",
            turn.envelope.request.kind,
            turn.envelope.intent_name().unwrap_or("-")
        );
        SkillResponse::ask(NOT_UNDERSTOOD, NOT_UNDERSTOOD_REPROMPT)
    }
}
