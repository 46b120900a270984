//! Stop and cancel handler

use super::{Services, Turn, TurnHandler};
use crate::alexa::SkillResponse;
use async_trait::async_trait;

#[derive(Debug)]
pub struct StopHandler;

#[async_trait]
impl TurnHandler for StopHandler {
    async fn handle(&self, _turn: &Turn<'_>, _services: &Services) -> SkillResponse {
        SkillResponse::tell("Okay")
    }
}
