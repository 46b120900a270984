//! Geocoding and timezone lookups against the Google Maps web services.

use super::{Coordinates, Geocoder, ResolveError, TimezoneLookup, UtcOffset};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, error};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

const STATUS_OK: &str = "OK";

#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimezoneResponse {
    pub status: String,
    pub raw_offset: Option<f64>,
    pub dst_offset: Option<f64>,
    pub time_zone_id: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Debug)]
pub struct GoogleMapsClient {
    http: Client,
    api_key: SecretString,
    geocode_url: Url,
    timezone_url: Url,
}

impl GoogleMapsClient {
    pub fn new(http: Client, api_key: SecretString, geocode_url: Url, timezone_url: Url) -> Self {
        Self { http, api_key, geocode_url, timezone_url }
    }
}

fn upstream_message(status: String, error_message: Option<String>) -> String {
    match error_message {
        Some(message) if !message.is_empty() => format!("{} ({})", message, status),
        _ => status,
    }
}

/// First result's coordinates, provided the service reported success.
pub fn coordinates_from(response: GeocodeResponse) -> Result<Coordinates, ResolveError> {
    if response.status != STATUS_OK {
        return Err(ResolveError::AddressNotUnderstood(upstream_message(
            response.status,
            response.error_message,
        )));
    }

    response
        .results
        .into_iter()
        .next()
        .map(|result| Coordinates { lat: result.geometry.location.lat, lng: result.geometry.location.lng })
        .ok_or_else(|| ResolveError::AddressNotUnderstood("no matching location".to_string()))
}

/// Combined raw and daylight-saving offset.
pub fn offset_from(response: TimezoneResponse) -> Result<UtcOffset, ResolveError> {
    if response.status != STATUS_OK {
        return Err(ResolveError::TimezoneLookupFailed(upstream_message(
            response.status,
            response.error_message,
        )));
    }

    let seconds = match (response.raw_offset, response.dst_offset) {
        (None, None) => {
            return Err(ResolveError::TimezoneLookupFailed("missing offset".to_string()))
        }
        (raw, dst) => raw.unwrap_or(0.0) + dst.unwrap_or(0.0),
    };
    debug!(
        "Timezone {} has offset of {} minutes",
        response.time_zone_id.as_deref().unwrap_or("unknown"),
        seconds / 60.0
    );
    UtcOffset::from_seconds(seconds.round() as i32).ok_or_else(|| {
        ResolveError::TimezoneLookupFailed(format!("offset of {} seconds is out of range", seconds))
    })
}

#[async_trait]
impl Geocoder for GoogleMapsClient {
    async fn geocode(&self, query: &str) -> Result<Coordinates, ResolveError> {
        debug!("Geocoding '{}'", query);
        let response = self
            .http
            .get(self.geocode_url.clone())
            .query(&[("address", query), ("key", self.api_key.expose_secret())])
            .send()
            .await
            .map_err(|e| {
                error!("Geocode request failed: {}", e);
                ResolveError::AddressNotUnderstood(e.to_string())
            })?;

        let body: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| ResolveError::AddressNotUnderstood(e.to_string()))?;
        coordinates_from(body)
    }
}

#[async_trait]
impl TimezoneLookup for GoogleMapsClient {
    async fn offset_at(
        &self,
        coordinates: Coordinates,
        at: DateTime<Utc>,
    ) -> Result<UtcOffset, ResolveError> {
        let location = format!("{},{}", coordinates.lat, coordinates.lng);
        let timestamp = at.timestamp().to_string();
        debug!("Looking up timezone for {} at {}", location, timestamp);

        let response = self
            .http
            .get(self.timezone_url.clone())
            .query(&[
                ("location", location.as_str()),
                ("timestamp", timestamp.as_str()),
                ("key", self.api_key.expose_secret()),
            ])
            .send()
            .await
            .map_err(|e| {
                error!("Timezone request failed: {}", e);
                ResolveError::TimezoneLookupFailed(e.to_string())
            })?;

        let body: TimezoneResponse = response
            .json()
            .await
            .map_err(|e| ResolveError::TimezoneLookupFailed(e.to_string()))?;
        offset_from(body)
    }
}
