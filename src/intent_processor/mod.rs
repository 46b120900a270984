//! Intent dispatch for a single voice turn.
//!
//! Every inbound request is classified into an [`IntentKind`] and handed to
//! exactly one [`TurnHandler`], which produces exactly one response.

use crate::alexa::{RequestEnvelope, SkillResponse, POSTAL_CODE_PERMISSION};
use crate::error::SkillError;
use crate::location::{DeviceContext, OffsetResolver, ResolveError};
use crate::slack::StatusService;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use secrecy::SecretString;
use std::fmt::Debug;
use std::sync::Arc;

pub mod clear_status_handler;
pub mod fallback_handler;
pub mod help_handler;
pub mod launch_handler;
pub mod session_ended_handler;
pub mod set_status_handler;
pub mod stop_handler;

pub const SET_STATUS_INTENT: &str = "SetStatusIntent";
pub const BUSY_INTENT: &str = "BusyIntent";
pub const CLEAR_STATUS_INTENT: &str = "ClearStatusIntent";
pub const STOP_INTENT: &str = "AMAZON.StopIntent";
pub const CANCEL_INTENT: &str = "AMAZON.CancelIntent";
pub const HELP_INTENT: &str = "AMAZON.HelpIntent";

pub const STATUS_SLOT: &str = "status";
pub const TIME_SLOT: &str = "time";

/// Every kind of turn the skill knows how to answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentKind {
    Launch,
    SetStatus,
    ClearStatus,
    Stop,
    Cancel,
    Help,
    SessionEnded,
    Unhandled,
}

impl IntentKind {
    pub fn classify(envelope: &RequestEnvelope) -> Self {
        match envelope.request.kind.as_str() {
            "LaunchRequest" => IntentKind::Launch,
            "SessionEndedRequest" => IntentKind::SessionEnded,
            "IntentRequest" => match envelope.intent_name() {
                Some(SET_STATUS_INTENT) | Some(BUSY_INTENT) => IntentKind::SetStatus,
                Some(CLEAR_STATUS_INTENT) => IntentKind::ClearStatus,
                Some(STOP_INTENT) => IntentKind::Stop,
                Some(CANCEL_INTENT) => IntentKind::Cancel,
                Some(HELP_INTENT) => IntentKind::Help,
                _ => IntentKind::Unhandled,
            },
            _ => IntentKind::Unhandled,
        }
    }
}

/// External collaborators a turn may call.
#[derive(Clone)]
pub struct Services {
    pub resolver: OffsetResolver,
    pub status: Arc<dyn StatusService>,
}

impl Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").field("resolver", &self.resolver).finish_non_exhaustive()
    }
}

/// Request-scoped data for one turn.
#[derive(Debug)]
pub struct Turn<'a> {
    pub envelope: &'a RequestEnvelope,
    pub now: DateTime<Utc>,
}

impl<'a> Turn<'a> {
    pub fn new(envelope: &'a RequestEnvelope, now: DateTime<Utc>) -> Self {
        Self { envelope, now }
    }

    pub fn access_token(&self) -> Option<SecretString> {
        self.envelope.access_token().map(|t| SecretString::from(t.to_string()))
    }

    pub fn device(&self) -> Option<DeviceContext> {
        Some(DeviceContext {
            api_endpoint: self.envelope.api_endpoint()?.to_string(),
            device_id: self.envelope.device_id()?.to_string(),
            consent_token: self.envelope.consent_token().map(|t| SecretString::from(t.to_string())),
        })
    }
}

#[async_trait]
pub trait TurnHandler: Debug + Send + Sync {
    async fn handle(&self, turn: &Turn<'_>, services: &Services) -> SkillResponse;
}

/// Turn a failed chain into the single spoken answer for this turn.
pub fn error_response(err: SkillError) -> SkillResponse {
    warn!("Turn failed: {}", err);
    match err {
        SkillError::NotLinked => SkillResponse::tell_with_link_account(err.to_string()),
        SkillError::Location(ResolveError::PermissionNotGranted) => {
            SkillResponse::tell_with_permissions(err.to_string(), &[POSTAL_CODE_PERMISSION])
        }
        other => SkillResponse::tell(other.to_string()),
    }
}

#[derive(Debug, Clone)]
pub struct IntentProcessor {
    services: Services,
}

impl IntentProcessor {
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    pub fn handler_for(kind: IntentKind) -> &'static dyn TurnHandler {
        match kind {
            IntentKind::Launch => &launch_handler::LaunchHandler,
            IntentKind::SetStatus => &set_status_handler::SetStatusHandler,
            IntentKind::ClearStatus => &clear_status_handler::ClearStatusHandler,
            IntentKind::Stop | IntentKind::Cancel => &stop_handler::StopHandler,
            IntentKind::Help => &help_handler::HelpHandler,
            IntentKind::SessionEnded => &session_ended_handler::SessionEndedHandler,
            IntentKind::Unhandled => &fallback_handler::FallbackHandler,
        }
    }

    pub async fn process(&self, envelope: &RequestEnvelope, now: DateTime<Utc>) -> SkillResponse {
        let kind = IntentKind::classify(envelope);
        info!(
            "Handling {:?} ({} / {})",
            kind,
            envelope.request.kind,
            envelope.intent_name().unwrap_or("-")
        );

        let turn = Turn::new(envelope, now);
        let response = Self::handler_for(kind).handle(&turn, &self.services).await;
        debug!("Responding with {:?}", response.speech());
        response
    }
}
