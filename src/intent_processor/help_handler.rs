//! Help handler

use super::{Services, Turn, TurnHandler};
use crate::alexa::SkillResponse;
use async_trait::async_trait;

pub const HELP: &str = "I can set your Slack status and pause notifications until a time you choose. \
Try saying, I'm in a meeting until three p.m., or, clear my status.";
pub const HELP_REPROMPT: &str = "What would you like to do?";

#[derive(Debug)]
pub struct HelpHandler;

#[async_trait]
impl TurnHandler for HelpHandler {
    async fn handle(&self, _turn: &Turn<'_>, _services: &Services) -> SkillResponse {
        SkillResponse::ask(HELP, HELP_REPROMPT)
    }
}
