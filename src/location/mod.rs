//! Resolving a device's UTC offset.
//!
//! Three stages run strictly in order, each consuming the previous stage's
//! output:
//!
//! 1. device id + consent token -> [`DeviceAddress`] (voice platform settings API)
//! 2. `"<postal code> <country>"` -> [`Coordinates`] (geocoding service)
//! 3. coordinates + timestamp -> [`UtcOffset`] (timezone service)
//!
//! A failing stage ends the chain with its own [`ResolveError`] kind.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use log::{debug, info};
use secrecy::SecretString;
use std::sync::Arc;
use thiserror::Error;

pub mod alexa_address;
pub mod google;

pub use alexa_address::AlexaAddressClient;
pub use google::GoogleMapsClient;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(
        "Please grant permission to use your device's country and postal code in the Alexa app."
    )]
    PermissionNotGranted,

    #[error("I couldn't understand your address: {0}")]
    AddressNotUnderstood(String),

    #[error("I couldn't look up your timezone: {0}")]
    TimezoneLookupFailed(String),
}

/// What the voice platform tells us about the device that spoke.
#[derive(Debug)]
pub struct DeviceContext {
    pub api_endpoint: String,
    pub device_id: String,
    pub consent_token: Option<SecretString>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceAddress {
    pub postal_code: String,
    pub country_code: String,
}

impl DeviceAddress {
    /// Query string handed to the geocoder.
    pub fn geocode_query(&self) -> String {
        format!("{} {}", self.postal_code, self.country_code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Signed distance of a local clock from UTC.
///
/// Timezone services report whole seconds, so the offset is kept exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtcOffset(FixedOffset);

impl UtcOffset {
    pub fn utc() -> Self {
        Self(Utc.fix())
    }

    /// Returns `None` for offsets of a day or more.
    pub fn from_seconds(seconds: i32) -> Option<Self> {
        FixedOffset::east_opt(seconds).map(Self)
    }

    pub fn seconds(&self) -> i32 {
        self.0.local_minus_utc()
    }

    /// Offset in minutes, `seconds / 60` without rounding.
    pub fn minutes(&self) -> f64 {
        f64::from(self.seconds()) / 60.0
    }

    pub fn fixed(&self) -> FixedOffset {
        self.0
    }
}

#[async_trait]
pub trait AddressLookup: Send + Sync {
    async fn lookup(&self, device: &DeviceContext) -> Result<DeviceAddress, ResolveError>;
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, query: &str) -> Result<Coordinates, ResolveError>;
}

#[async_trait]
pub trait TimezoneLookup: Send + Sync {
    async fn offset_at(
        &self,
        coordinates: Coordinates,
        at: DateTime<Utc>,
    ) -> Result<UtcOffset, ResolveError>;
}

/// Runs the address -> geocode -> timezone pipeline.
#[derive(Clone)]
pub struct OffsetResolver {
    address: Arc<dyn AddressLookup>,
    geocoder: Arc<dyn Geocoder>,
    timezone: Arc<dyn TimezoneLookup>,
}

impl OffsetResolver {
    pub fn new(
        address: Arc<dyn AddressLookup>,
        geocoder: Arc<dyn Geocoder>,
        timezone: Arc<dyn TimezoneLookup>,
    ) -> Self {
        Self { address, geocoder, timezone }
    }

    pub async fn resolve(
        &self,
        device: &DeviceContext,
        now: DateTime<Utc>,
    ) -> Result<UtcOffset, ResolveError> {
        let address = self.address.lookup(device).await?;
        debug!("Device {} is at {:?}", device.device_id, address);

        let coordinates = self.geocoder.geocode(&address.geocode_query()).await?;
        debug!("Geocoded {} to {:?}", address.geocode_query(), coordinates);

        let offset = self.timezone.offset_at(coordinates, now).await?;
        info!("Resolved UTC offset of {} minutes for device {}", offset.minutes(), device.device_id);
        Ok(offset)
    }
}

impl std::fmt::Debug for OffsetResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OffsetResolver").finish_non_exhaustive()
    }
}
