//! Clear status handler
//!
//! Empties the Slack status text and emoji.

use super::{error_response, Services, Turn, TurnHandler};
use crate::alexa::SkillResponse;
use crate::error::SkillError;
use crate::status::StatusProfile;
use async_trait::async_trait;

pub const CLEARED: &str = "Your status has been cleared.";

#[derive(Debug)]
pub struct ClearStatusHandler;

#[async_trait]
impl TurnHandler for ClearStatusHandler {
    async fn handle(&self, turn: &Turn<'_>, services: &Services) -> SkillResponse {
        let Some(token) = turn.access_token() else {
            return error_response(SkillError::NotLinked);
        };

        match services.status.set_profile(&token, &StatusProfile::cleared()).await {
            Ok(()) => SkillResponse::tell(CLEARED),
            Err(e) => error_response(e),
        }
    }
}
