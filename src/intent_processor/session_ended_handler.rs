//! Session end notifications.
//!
//! The platform does not accept speech in reply, so this only logs.

use super::{Services, Turn, TurnHandler};
use crate::alexa::SkillResponse;
use async_trait::async_trait;
use log::info;

#[derive(Debug)]
pub struct SessionEndedHandler;

#[async_trait]
impl TurnHandler for SessionEndedHandler {
    async fn handle(&self, turn: &Turn<'_>, _services: &Services) -> SkillResponse {
        info!(
            "Session ended: {}",
            turn.envelope.request.reason.as_deref().unwrap_or("no reason given")
        );
        SkillResponse::empty()
    }
}
