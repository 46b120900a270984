//! Device address lookup through the Alexa device settings API.

use super::{AddressLookup, DeviceAddress, DeviceContext, ResolveError};
use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CountryAndPostalCode {
    country_code: Option<String>,
    postal_code: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AlexaAddressClient {
    http: Client,
}

impl AlexaAddressClient {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    fn address_url(api_endpoint: &str, device_id: &str) -> String {
        format!(
            "{}/v1/devices/{}/settings/address/countryAndPostalCode",
            api_endpoint.trim_end_matches('/'),
            device_id
        )
    }
}

#[async_trait]
impl AddressLookup for AlexaAddressClient {
    async fn lookup(&self, device: &DeviceContext) -> Result<DeviceAddress, ResolveError> {
        let Some(consent_token) = device.consent_token.as_ref() else {
            warn!("No consent token for device {}", device.device_id);
            return Err(ResolveError::PermissionNotGranted);
        };

        let url = Self::address_url(&device.api_endpoint, &device.device_id);
        debug!("Requesting device address from {}", url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(consent_token.expose_secret())
            .send()
            .await
            .map_err(|e| {
                error!("Device address request failed: {}", e);
                ResolveError::PermissionNotGranted
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read device address response: {}", e);
            ResolveError::PermissionNotGranted
        })?;
        address_from_response(status, &body)
    }
}

/// Interpret the device settings API response.
pub fn address_from_response(status: StatusCode, body: &str) -> Result<DeviceAddress, ResolveError> {
    if status != StatusCode::OK {
        warn!("Device address lookup returned {}", status);
        return Err(ResolveError::PermissionNotGranted);
    }

    let parsed: CountryAndPostalCode = serde_json::from_str(body)
        .map_err(|e| ResolveError::AddressNotUnderstood(e.to_string()))?;

    match (parsed.postal_code, parsed.country_code) {
        (Some(postal_code), Some(country_code)) => Ok(DeviceAddress { postal_code, country_code }),
        _ => Err(ResolveError::AddressNotUnderstood(
            "the device has no postal code or country set".to_string(),
        )),
    }
}
