//! Alexa request/response envelopes and request verification.

pub mod request;
pub mod response;
pub mod verifier;

pub use request::RequestEnvelope;
pub use response::{Card, SkillResponse, POSTAL_CODE_PERMISSION};
pub use verifier::{RequestVerifier, VerificationError};
