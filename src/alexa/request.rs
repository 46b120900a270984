//! Inbound request envelope sent by the Alexa service.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize)]
pub struct RequestEnvelope {
    #[serde(default)]
    pub version: String,
    pub session: Option<Session>,
    pub context: Option<Context>,
    pub request: Request,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub new: bool,
    pub session_id: Option<String>,
    pub application: Option<Application>,
    pub user: Option<User>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub application_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: Option<String>,
    pub access_token: Option<String>,
    pub permissions: Option<Permissions>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    pub consent_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Context {
    #[serde(rename = "System")]
    pub system: SystemContext,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemContext {
    pub application: Option<Application>,
    pub user: Option<User>,
    pub device: Option<Device>,
    pub api_endpoint: Option<String>,
    pub api_access_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub device_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(rename = "type")]
    pub kind: String,
    pub request_id: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub intent: Option<Intent>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub slots: HashMap<String, Slot>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Slot {
    pub name: String,
    pub value: Option<String>,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn consent_of(user: Option<&User>) -> Option<&str> {
    non_empty(user.and_then(|u| u.permissions.as_ref()).and_then(|p| p.consent_token.as_ref()))
}

impl RequestEnvelope {
    fn system(&self) -> Option<&SystemContext> {
        self.context.as_ref().map(|c| &c.system)
    }

    fn system_user(&self) -> Option<&User> {
        self.system().and_then(|s| s.user.as_ref())
    }

    fn session_user(&self) -> Option<&User> {
        self.session.as_ref().and_then(|s| s.user.as_ref())
    }

    pub fn application_id(&self) -> Option<&str> {
        self.system()
            .and_then(|s| s.application.as_ref())
            .or_else(|| self.session.as_ref().and_then(|s| s.application.as_ref()))
            .map(|a| a.application_id.as_str())
    }

    /// Linked-account token for the messaging platform.
    pub fn access_token(&self) -> Option<&str> {
        non_empty(self.system_user().and_then(|u| u.access_token.as_ref()))
            .or_else(|| non_empty(self.session_user().and_then(|u| u.access_token.as_ref())))
    }

    /// Token for the device settings API. Older requests carry it as a
    /// user permission, newer ones as the system `apiAccessToken`.
    pub fn consent_token(&self) -> Option<&str> {
        consent_of(self.system_user())
            .or_else(|| consent_of(self.session_user()))
            .or_else(|| non_empty(self.system().and_then(|s| s.api_access_token.as_ref())))
    }

    pub fn device_id(&self) -> Option<&str> {
        self.system().and_then(|s| s.device.as_ref()).map(|d| d.device_id.as_str())
    }

    pub fn api_endpoint(&self) -> Option<&str> {
        non_empty(self.system().and_then(|s| s.api_endpoint.as_ref()))
    }

    pub fn intent_name(&self) -> Option<&str> {
        self.request.intent.as_ref().map(|i| i.name.as_str())
    }

    /// Value of a slot, if the user filled it.
    pub fn slot_value(&self, name: &str) -> Option<&str> {
        non_empty(
            self.request
                .intent
                .as_ref()
                .and_then(|i| i.slots.get(name))
                .and_then(|s| s.value.as_ref()),
        )
    }
}
