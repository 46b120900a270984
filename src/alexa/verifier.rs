//! Checks applied to every inbound request before it reaches a handler.

use super::RequestEnvelope;
use chrono::{DateTime, Utc};
use log::warn;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Request has no application id")]
    MissingApplicationId,
    #[error("Request is for application '{0}'")]
    ApplicationMismatch(String),
    #[error("Request has no timestamp")]
    MissingTimestamp,
    #[error("Request timestamp is {0} seconds away from now")]
    StaleTimestamp(i64),
}

#[derive(Debug, Clone)]
pub struct RequestVerifier {
    application_id: Option<String>,
    tolerance_secs: u64,
}

impl RequestVerifier {
    /// `application_id` of `None` accepts any skill; a tolerance of 0 skips
    /// the timestamp check.
    pub fn new(application_id: Option<String>, tolerance_secs: u64) -> Self {
        Self { application_id, tolerance_secs }
    }

    pub fn verify(
        &self,
        envelope: &RequestEnvelope,
        now: DateTime<Utc>,
    ) -> Result<(), VerificationError> {
        if let Some(expected) = &self.application_id {
            match envelope.application_id() {
                None => return Err(VerificationError::MissingApplicationId),
                Some(actual) if actual != expected => {
                    warn!("Rejecting request for application {}", actual);
                    return Err(VerificationError::ApplicationMismatch(actual.to_string()));
                }
                Some(_) => {}
            }
        }

        if self.tolerance_secs > 0 {
            let timestamp = envelope.request.timestamp.ok_or(VerificationError::MissingTimestamp)?;
            let skew = (now - timestamp).num_seconds();
            if skew.unsigned_abs() > self.tolerance_secs {
                return Err(VerificationError::StaleTimestamp(skew.abs()));
            }
        }

        Ok(())
    }
}
