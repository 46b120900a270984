//! Launch handler
//!
//! Answers "Alexa, open ..." with a prompt, or asks for account linking.

use super::{error_response, Services, Turn, TurnHandler};
use crate::alexa::SkillResponse;
use crate::error::SkillError;
use async_trait::async_trait;

pub const WELCOME: &str = "What would you like to do?";
pub const WELCOME_REPROMPT: &str =
    "You can say, set my status to lunch until one p.m., or, clear my status.";

#[derive(Debug)]
pub struct LaunchHandler;

#[async_trait]
impl TurnHandler for LaunchHandler {
    async fn handle(&self, turn: &Turn<'_>, _services: &Services) -> SkillResponse {
        if turn.access_token().is_none() {
            return error_response(SkillError::NotLinked);
        }
        SkillResponse::ask(WELCOME, WELCOME_REPROMPT)
    }
}
