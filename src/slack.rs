//! Slack Web API calls for do-not-disturb and profile status.

use crate::error::{Result, SkillError};
use crate::snooze::SnoozeDuration;
use crate::status::StatusProfile;
use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

#[async_trait]
pub trait StatusService: Send + Sync {
    async fn snooze(&self, token: &SecretString, duration: SnoozeDuration) -> Result<()>;
    async fn set_profile(&self, token: &SecretString, profile: &StatusProfile) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct SlackResponse {
    #[serde(default)]
    ok: bool,
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SlackClient {
    http: Client,
    api_base: Url,
}

impl SlackClient {
    pub fn new(http: Client, api_base: Url) -> Self {
        Self { http, api_base }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.api_base.as_str().trim_end_matches('/'), method)
    }

    async fn post_form(&self, method: &str, form: &[(&str, &str)]) -> Result<()> {
        let url = self.method_url(method);
        debug!("Calling Slack method {}", method);

        let response = self.http.post(&url).form(form).send().await.map_err(|e| {
            error!("Slack request to {} failed: {}", method, e);
            SkillError::Slack(e.to_string())
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| SkillError::Slack(e.to_string()))?;
        check_response(status, &body)
    }
}

/// Slack reports success as HTTP 200 with `"ok": true`.
pub fn check_response(status: StatusCode, body: &str) -> Result<()> {
    let parsed: Option<SlackResponse> = serde_json::from_str(body).ok();

    match parsed {
        Some(SlackResponse { ok: true, .. }) if status == StatusCode::OK => Ok(()),
        Some(SlackResponse { error: Some(error), .. }) => Err(SkillError::Slack(error)),
        _ => Err(SkillError::Slack(
            status.canonical_reason().unwrap_or("unexpected response").to_string(),
        )),
    }
}

#[async_trait]
impl StatusService for SlackClient {
    async fn snooze(&self, token: &SecretString, duration: SnoozeDuration) -> Result<()> {
        let minutes = duration.minutes().to_string();
        self.post_form(
            "dnd.setSnooze",
            &[("num_minutes", minutes.as_str()), ("token", token.expose_secret())],
        )
        .await?;
        info!("Snoozed notifications for {}", duration);
        Ok(())
    }

    async fn set_profile(&self, token: &SecretString, profile: &StatusProfile) -> Result<()> {
        let profile_json =
            serde_json::to_string(profile).map_err(|e| SkillError::Slack(e.to_string()))?;
        self.post_form(
            "users.profile.set",
            &[("profile", profile_json.as_str()), ("token", token.expose_secret())],
        )
        .await?;
        info!("Set status to {:?} {}", profile.text, profile.emoji);
        Ok(())
    }
}
