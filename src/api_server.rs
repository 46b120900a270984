use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tower_http::limit::RequestBodyLimitLayer;
use serde::Serialize;
use std::sync::Arc;
use anyhow::{Result, anyhow};
use chrono::Utc;
use log::{info, debug, error, warn};
use reqwest::Client;
use secrecy::SecretString;
use tokio::net::TcpListener;
use uuid::Uuid;

use crate::alexa::{RequestEnvelope, RequestVerifier, SkillResponse};
use crate::config::Config;
use crate::intent_processor::{IntentProcessor, Services};
use crate::location::{AlexaAddressClient, GoogleMapsClient, OffsetResolver};
use crate::slack::SlackClient;

// API state that will be shared across handlers
pub struct ApiState {
    pub verifier: RequestVerifier,
    pub processor: IntentProcessor,
}

impl ApiState {
    pub fn new(verifier: RequestVerifier, processor: IntentProcessor) -> Self {
        Self { verifier, processor }
    }

    /// Wire the real HTTP clients up from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;

        let google = Arc::new(GoogleMapsClient::new(
            http.clone(),
            SecretString::from(config.google_api_key()?.to_string()),
            config.geocode_url()?,
            config.timezone_url()?,
        ));
        let resolver = OffsetResolver::new(
            Arc::new(AlexaAddressClient::new(http.clone())),
            google.clone(),
            google,
        );
        let services = Services {
            resolver,
            status: Arc::new(SlackClient::new(http, config.slack_api_base()?)),
        };

        let verifier = RequestVerifier::new(
            config.alexa.application_id.clone(),
            config.alexa.timestamp_tolerance_secs,
        );
        Ok(Self::new(verifier, IntentProcessor::new(services)))
    }
}

// General API response
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

// Skill endpoint: one request in, exactly one response out
pub async fn alexa_handler(
    State(state): State<Arc<ApiState>>,
    Json(envelope): Json<RequestEnvelope>,
) -> Result<Json<SkillResponse>, (StatusCode, Json<ApiResponse>)> {
    let request_id = Uuid::new_v4();
    let now = Utc::now();
    info!(
        "Request[{}]: {} {}",
        request_id,
        envelope.request.kind,
        envelope.request.request_id.as_deref().unwrap_or("-")
    );

    if let Err(e) = state.verifier.verify(&envelope, now) {
        warn!("Request[{}]: Rejected: {}", request_id, e);
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse {
                success: false,
                message: e.to_string(),
            }),
        ));
    }

    let response = state.processor.process(&envelope, now).await;
    debug!("Request[{}]: Completed", request_id);
    Ok(Json(response))
}

// Health check endpoint
async fn health_check() -> &'static str {
    "Snooze skill is running"
}

pub fn router(state: Arc<ApiState>, body_limit_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/alexa", post(alexa_handler))
        .layer(RequestBodyLimitLayer::new(body_limit_bytes))
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}

// Create and start the API server
pub async fn start_api_server(config: Config) -> Result<()> {
    config.validate()?;
    let addr = config.bind_addr()?;
    let state = Arc::new(ApiState::from_config(&config)?);
    let app = router(state, config.server.body_limit_bytes);

    info!("API server starting on http://{}", addr);
    let listener = TcpListener::bind(addr).await
        .map_err(|e| anyhow!("Failed to bind to address: {}", e))?;

    info!("Skill endpoint available at http://{}/alexa", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow!("Failed to start API server: {}", e))?;

    Ok(())
}
