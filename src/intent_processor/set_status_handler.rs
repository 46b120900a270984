//! Set status handler
//!
//! Handles "I'm busy until 3pm" style requests: works out how long until the
//! requested time on the user's clock, snoozes Slack notifications for that
//! long and sets a matching status.
//
// Validation happens in order (linked account, status slot, time slot) and
// each failed check ends the turn with its own prompt.

use super::{error_response, Services, Turn, TurnHandler, STATUS_SLOT, TIME_SLOT};
use crate::alexa::SkillResponse;
use crate::clock::RequestedTime;
use crate::error::{Result, SkillError};
use crate::location::ResolveError;
use crate::snooze::minutes_until;
use crate::status::map_status;
use async_trait::async_trait;
use log::{info, warn};
use secrecy::SecretString;

pub const ASK_STATUS: &str = "What would you like your status to be?";
pub const ASK_STATUS_REPROMPT: &str = "You can say things like lunch, in a meeting, or busy.";
pub const ASK_TIME: &str = "Until what time?";
pub const ASK_TIME_REPROMPT: &str = "Tell me a time, like three p.m., or this evening.";

#[derive(Debug)]
pub struct SetStatusHandler;

#[async_trait]
impl TurnHandler for SetStatusHandler {
    async fn handle(&self, turn: &Turn<'_>, services: &Services) -> SkillResponse {
        let Some(token) = turn.access_token() else {
            return error_response(SkillError::NotLinked);
        };

        let (status_text, requested) = match requested_slots(turn) {
            Ok(slots) => slots,
            Err(e) => return ask_again(e),
        };

        match set_status(turn, services, &token, status_text, requested).await {
            Ok(response) => response,
            Err(e) => error_response(e),
        }
    }
}

/// Status text and requested time, in the order they are checked.
fn requested_slots<'a>(turn: &Turn<'a>) -> Result<(&'a str, RequestedTime)> {
    let status_text =
        turn.envelope.slot_value(STATUS_SLOT).ok_or(SkillError::MissingSlot(STATUS_SLOT))?;
    let time = turn.envelope.slot_value(TIME_SLOT).ok_or(SkillError::MissingSlot(TIME_SLOT))?;
    Ok((status_text, time.parse()?))
}

/// Prompt for whichever slot failed, keeping the session open.
fn ask_again(err: SkillError) -> SkillResponse {
    match err {
        SkillError::MissingSlot(STATUS_SLOT) => SkillResponse::ask(ASK_STATUS, ASK_STATUS_REPROMPT),
        SkillError::MissingSlot(_) => SkillResponse::ask(ASK_TIME, ASK_TIME_REPROMPT),
        other => {
            warn!("Rejected time slot: {}", other);
            SkillResponse::ask(format!("{} {}", other, ASK_TIME), ASK_TIME_REPROMPT)
        }
    }
}

async fn set_status(
    turn: &Turn<'_>,
    services: &Services,
    token: &SecretString,
    status_text: &str,
    requested: RequestedTime,
) -> Result<SkillResponse> {
    let device = turn.device().ok_or(SkillError::Location(ResolveError::PermissionNotGranted))?;
    let offset = services.resolver.resolve(&device, turn.now).await?;

    let until = requested.normalize();
    let duration = minutes_until(until, offset, turn.now);
    let profile = map_status(status_text);
    info!("Setting status {:?} {} for {} (until {})", profile.text, profile.emoji, duration, until);

    services.status.snooze(token, duration).await?;
    services.status.set_profile(token, &profile).await?;

    Ok(SkillResponse::tell(format!(
        "Okay, your status is set to {} and notifications are paused until {}.",
        profile.text, until
    )))
}
