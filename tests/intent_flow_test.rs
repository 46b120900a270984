use async_trait::async_trait;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use snooze_skill::alexa::{Card, RequestEnvelope, RequestVerifier, SkillResponse};
use snooze_skill::api_server::{alexa_handler, ApiState};
use snooze_skill::error::{Result as SkillResult, SkillError};
use snooze_skill::intent_processor::fallback_handler::{NOT_UNDERSTOOD, NOT_UNDERSTOOD_REPROMPT};
use snooze_skill::intent_processor::help_handler::{HELP, HELP_REPROMPT};
use snooze_skill::intent_processor::set_status_handler::{
    ASK_STATUS, ASK_STATUS_REPROMPT, ASK_TIME, ASK_TIME_REPROMPT,
};
use snooze_skill::location::{
    AddressLookup, Coordinates, DeviceAddress, DeviceContext, Geocoder, OffsetResolver,
    ResolveError, TimezoneLookup, UtcOffset,
};
use snooze_skill::slack::StatusService;
use snooze_skill::snooze::SnoozeDuration;
use snooze_skill::status::StatusProfile;
use snooze_skill::{IntentProcessor, Services};
use std::sync::{Arc, Mutex};
use test_case::test_case;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Address,
    Geocode(String),
    Timezone,
    Snooze(String, u32),
    Profile(String, StatusProfile),
}

#[derive(Default)]
struct Fakes {
    calls: Mutex<Vec<Call>>,
    deny_address: bool,
    geocode_error: Option<&'static str>,
    snooze_error: Option<&'static str>,
    profile_error: Option<&'static str>,
    timezone_error: Option<&'static str>,
    offset_secs: i32,
}

impl Fakes {
    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AddressLookup for Fakes {
    async fn lookup(&self, device: &DeviceContext) -> Result<DeviceAddress, ResolveError> {
        self.record(Call::Address);
        if self.deny_address || device.consent_token.is_none() {
            return Err(ResolveError::PermissionNotGranted);
        }
        Ok(DeviceAddress { postal_code: "98109".into(), country_code: "US".into() })
    }
}

#[async_trait]
impl Geocoder for Fakes {
    async fn geocode(&self, query: &str) -> Result<Coordinates, ResolveError> {
        self.record(Call::Geocode(query.to_string()));
        if let Some(error) = self.geocode_error {
            return Err(ResolveError::AddressNotUnderstood(error.to_string()));
        }
        Ok(Coordinates { lat: 47.62, lng: -122.35 })
    }
}

#[async_trait]
impl TimezoneLookup for Fakes {
    async fn offset_at(
        &self,
        _coordinates: Coordinates,
        _at: DateTime<Utc>,
    ) -> Result<UtcOffset, ResolveError> {
        self.record(Call::Timezone);
        if let Some(error) = self.timezone_error {
            return Err(ResolveError::TimezoneLookupFailed(error.to_string()));
        }
        Ok(UtcOffset::from_seconds(self.offset_secs).unwrap())
    }
}

#[async_trait]
impl StatusService for Fakes {
    async fn snooze(&self, token: &SecretString, duration: SnoozeDuration) -> SkillResult<()> {
        self.record(Call::Snooze(token.expose_secret().to_string(), duration.minutes()));
        match self.snooze_error {
            Some(error) => Err(SkillError::Slack(error.to_string())),
            None => Ok(()),
        }
    }

    async fn set_profile(&self, token: &SecretString, profile: &StatusProfile) -> SkillResult<()> {
        self.record(Call::Profile(token.expose_secret().to_string(), profile.clone()));
        match self.profile_error {
            Some(error) => Err(SkillError::Slack(error.to_string())),
            None => Ok(()),
        }
    }
}

fn pacific() -> Fakes {
    Fakes { offset_secs: -7 * 3600, ..Default::default() }
}

fn processor(fakes: &Arc<Fakes>) -> IntentProcessor {
    IntentProcessor::new(Services {
        resolver: OffsetResolver::new(fakes.clone(), fakes.clone(), fakes.clone()),
        status: fakes.clone(),
    })
}

/// 15:00 UTC, which is 08:00 in the fakes' default UTC-7 zone.
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 14, 15, 0, 0).unwrap()
}

fn envelope(request: Value, access_token: Option<&str>) -> RequestEnvelope {
    let mut user = json!({
        "userId": "amzn1.ask.account.1",
        "permissions": {"consentToken": "consent"}
    });
    if let Some(token) = access_token {
        user["accessToken"] = json!(token);
    }
    serde_json::from_value(json!({
        "version": "1.0",
        "session": {
            "new": true,
            "application": {"applicationId": "amzn1.ask.skill.test"},
            "user": user.clone()
        },
        "context": {
            "System": {
                "application": {"applicationId": "amzn1.ask.skill.test"},
                "user": user,
                "device": {"deviceId": "amzn1.ask.device.1"},
                "apiEndpoint": "https://api.amazonalexa.com"
            }
        },
        "request": request
    }))
    .unwrap()
}

fn launch(token: Option<&str>) -> RequestEnvelope {
    envelope(json!({"type": "LaunchRequest", "requestId": "r1", "timestamp": "2024-03-14T15:00:00Z"}), token)
}

fn intent(name: &str, slots: Value, token: Option<&str>) -> RequestEnvelope {
    envelope(
        json!({
            "type": "IntentRequest",
            "requestId": "r1",
            "timestamp": "2024-03-14T15:00:00Z",
            "intent": {"name": name, "slots": slots}
        }),
        token,
    )
}

fn set_status(status: Option<&str>, time: Option<&str>) -> RequestEnvelope {
    let slot = |name: &str, value: Option<&str>| match value {
        Some(v) => json!({"name": name, "value": v}),
        None => json!({"name": name}),
    };
    intent(
        "SetStatusIntent",
        json!({"status": slot("status", status), "time": slot("time", time)}),
        Some("xoxp-1"),
    )
}

#[tokio::test]
async fn launch_asks_what_to_do_when_linked() {
    let fakes = Arc::new(pacific());
    let response = processor(&fakes).process(&launch(Some("xoxp-1")), now()).await;
    assert_eq!(response.speech(), Some("What would you like to do?"));
    assert!(!response.ends_session());
}

#[tokio::test]
async fn launch_without_link_shows_link_card() {
    let fakes = Arc::new(pacific());
    let response = processor(&fakes).process(&launch(None), now()).await;
    assert_eq!(response.card(), Some(&Card::LinkAccount));
    assert!(response.ends_session());
}

#[tokio::test]
async fn morning_snooze_from_eight_am_is_an_hour() {
    let fakes = Arc::new(pacific());
    let response =
        processor(&fakes).process(&set_status(Some("in a meeting"), Some("MO")), now()).await;

    let profile =
        StatusProfile { text: "in a meeting".to_string(), emoji: ":calendar:".to_string() };
    assert_eq!(
        fakes.calls(),
        vec![
            Call::Address,
            Call::Geocode("98109 US".to_string()),
            Call::Timezone,
            Call::Snooze("xoxp-1".to_string(), 60),
            Call::Profile("xoxp-1".to_string(), profile),
        ]
    );
    assert_eq!(
        response.speech(),
        Some("Okay, your status is set to in a meeting and notifications are paused until 09:00.")
    );
    assert!(response.ends_session());
}

#[tokio::test]
async fn past_time_rolls_over_to_tomorrow() {
    // 17:00 UTC is 10:00 at UTC-7.
    let fakes = Arc::new(pacific());
    let later = Utc.with_ymd_and_hms(2024, 3, 14, 17, 0, 0).unwrap();
    processor(&fakes).process(&set_status(Some("busy"), Some("09:00")), later).await;

    let calls = fakes.calls();
    assert!(calls.contains(&Call::Snooze("xoxp-1".to_string(), 23 * 60)));
    assert!(calls.contains(&Call::Profile(
        "xoxp-1".to_string(),
        StatusProfile { text: "Do not disturb".to_string(), emoji: ":no_entry:".to_string() }
    )));
}

#[test_case(None, Some("MO"), ASK_STATUS, ASK_STATUS_REPROMPT; "missing status")]
#[test_case(None, None, ASK_STATUS, ASK_STATUS_REPROMPT; "status checked before time")]
#[test_case(Some("lunch"), None, ASK_TIME, ASK_TIME_REPROMPT; "missing time")]
#[tokio::test]
async fn missing_slots_reprompt_without_side_effects(
    status: Option<&str>,
    time: Option<&str>,
    expected: &str,
    reprompt: &str,
) {
    let fakes = Arc::new(pacific());
    let response = processor(&fakes).process(&set_status(status, time), now()).await;
    assert_eq!(response.speech(), Some(expected));
    assert_eq!(response.reprompt(), Some(reprompt));
    assert!(!response.ends_session());
    assert!(fakes.calls().is_empty());
}

#[tokio::test]
async fn malformed_time_is_rejected_before_any_call() {
    let fakes = Arc::new(pacific());
    let response =
        processor(&fakes).process(&set_status(Some("lunch"), Some("25:00")), now()).await;
    assert_eq!(
        response.speech(),
        Some("I couldn't understand the time 25:00. Until what time?")
    );
    assert_eq!(response.reprompt(), Some(ASK_TIME_REPROMPT));
    assert!(fakes.calls().is_empty());
}

#[tokio::test]
async fn unlinked_set_status_shows_link_card() {
    let fakes = Arc::new(pacific());
    let request = intent(
        "BusyIntent",
        json!({"status": {"name": "status", "value": "busy"}, "time": {"name": "time", "value": "EV"}}),
        None,
    );
    let response = processor(&fakes).process(&request, now()).await;
    assert_eq!(response.card(), Some(&Card::LinkAccount));
    assert!(fakes.calls().is_empty());
}

#[tokio::test]
async fn geocode_failure_stops_the_chain() {
    let fakes = Arc::new(Fakes { geocode_error: Some("ZERO_RESULTS"), ..pacific() });
    let response = processor(&fakes).process(&set_status(Some("lunch"), Some("AF")), now()).await;

    assert_eq!(fakes.calls(), vec![Call::Address, Call::Geocode("98109 US".to_string())]);
    assert_eq!(response.speech(), Some("I couldn't understand your address: ZERO_RESULTS"));
    assert!(response.ends_session());
}

#[tokio::test]
async fn timezone_failure_stops_before_slack() {
    let fakes = Arc::new(Fakes { timezone_error: Some("OVER_QUERY_LIMIT"), ..pacific() });
    let response = processor(&fakes).process(&set_status(Some("lunch"), Some("AF")), now()).await;

    assert_eq!(
        fakes.calls(),
        vec![Call::Address, Call::Geocode("98109 US".to_string()), Call::Timezone]
    );
    assert_eq!(
        response.speech(),
        Some("I couldn't look up your timezone: OVER_QUERY_LIMIT")
    );
}

#[tokio::test]
async fn missing_location_permission_asks_for_consent() {
    let fakes = Arc::new(Fakes { deny_address: true, ..pacific() });
    let response = processor(&fakes).process(&set_status(Some("lunch"), Some("AF")), now()).await;

    assert_eq!(fakes.calls(), vec![Call::Address]);
    assert!(matches!(response.card(), Some(Card::AskForPermissionsConsent { .. })));
}

#[tokio::test]
async fn snooze_failure_skips_status_update() {
    let fakes = Arc::new(Fakes { snooze_error: Some("invalid_auth"), ..pacific() });
    let response = processor(&fakes).process(&set_status(Some("lunch"), Some("AF")), now()).await;

    let calls = fakes.calls();
    assert_eq!(calls.last(), Some(&Call::Snooze("xoxp-1".to_string(), 5 * 60)));
    assert!(!calls.iter().any(|c| matches!(c, Call::Profile(..))));
    assert_eq!(response.speech(), Some("Slack returned an error: invalid_auth"));
}

#[tokio::test]
async fn set_profile_failure_is_spoken() {
    let fakes = Arc::new(Fakes { profile_error: Some("profile_set_failed"), ..pacific() });
    let response = processor(&fakes).process(&set_status(Some("lunch"), Some("AF")), now()).await;

    let calls = fakes.calls();
    assert!(calls.contains(&Call::Snooze("xoxp-1".to_string(), 5 * 60)));
    assert!(matches!(calls.last(), Some(Call::Profile(..))));
    assert_eq!(response.speech(), Some("Slack returned an error: profile_set_failed"));
    assert!(response.ends_session());
}

#[tokio::test]
async fn clear_status_empties_profile() {
    let fakes = Arc::new(pacific());
    let response =
        processor(&fakes).process(&intent("ClearStatusIntent", json!({}), Some("xoxp-1")), now()).await;

    assert_eq!(fakes.calls(), vec![Call::Profile("xoxp-1".to_string(), StatusProfile::cleared())]);
    assert_eq!(response.speech(), Some("Your status has been cleared."));
}

#[tokio::test]
async fn clear_status_requires_link() {
    let fakes = Arc::new(pacific());
    let response =
        processor(&fakes).process(&intent("ClearStatusIntent", json!({}), None), now()).await;
    assert_eq!(response.card(), Some(&Card::LinkAccount));
    assert!(fakes.calls().is_empty());
}

#[test_case("AMAZON.StopIntent", true; "stop")]
#[test_case("AMAZON.CancelIntent", true; "cancel")]
#[test_case("AMAZON.HelpIntent", false; "help")]
#[test_case("AMAZON.FallbackIntent", false; "unhandled")]
#[tokio::test]
async fn simple_intents_make_no_calls(name: &str, ends_session: bool) {
    let fakes = Arc::new(pacific());
    let response = processor(&fakes).process(&intent(name, json!({}), Some("xoxp-1")), now()).await;
    assert!(response.speech().is_some());
    assert_eq!(response.ends_session(), ends_session);
    assert!(fakes.calls().is_empty());
}

#[tokio::test]
async fn help_explains_and_reprompts() {
    let fakes = Arc::new(pacific());
    let response =
        processor(&fakes).process(&intent("AMAZON.HelpIntent", json!({}), None), now()).await;
    assert_eq!(response.speech(), Some(HELP));
    assert_eq!(response.reprompt(), Some(HELP_REPROMPT));
}

#[tokio::test]
async fn unknown_intent_asks_again() {
    let fakes = Arc::new(pacific());
    let response = processor(&fakes)
        .process(&intent("AMAZON.FallbackIntent", json!({}), Some("xoxp-1")), now())
        .await;
    assert_eq!(response.speech(), Some(NOT_UNDERSTOOD));
    assert_eq!(response.reprompt(), Some(NOT_UNDERSTOOD_REPROMPT));
}

#[tokio::test]
async fn stop_says_okay() {
    let fakes = Arc::new(pacific());
    let response =
        processor(&fakes).process(&intent("AMAZON.StopIntent", json!({}), None), now()).await;
    assert_eq!(response.speech(), Some("Okay"));
}

#[tokio::test]
async fn session_end_is_silent() {
    let fakes = Arc::new(pacific());
    let request = envelope(
        json!({"type": "SessionEndedRequest", "requestId": "r1", "reason": "USER_INITIATED"}),
        None,
    );
    let response = processor(&fakes).process(&request, now()).await;
    assert_eq!(response, SkillResponse::empty());
}

#[tokio::test]
async fn endpoint_rejects_other_skills() {
    let fakes = Arc::new(pacific());
    let state = Arc::new(ApiState::new(
        RequestVerifier::new(Some("amzn1.ask.skill.other".into()), 0),
        processor(&fakes),
    ));

    let err = alexa_handler(State(state), Json(launch(Some("xoxp-1")))).await.unwrap_err();
    assert_eq!(err.0, StatusCode::BAD_REQUEST);
    assert!(!err.1.success);
}

#[tokio::test]
async fn endpoint_answers_matching_skill() {
    let fakes = Arc::new(pacific());
    let state = Arc::new(ApiState::new(
        RequestVerifier::new(Some("amzn1.ask.skill.test".into()), 0),
        processor(&fakes),
    ));

    let Json(response) = alexa_handler(State(state), Json(launch(Some("xoxp-1")))).await.unwrap();
    assert_eq!(response.speech(), Some("What would you like to do?"));
}
