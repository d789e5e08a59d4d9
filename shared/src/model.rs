use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::capabilities::GeolocationError;
use crate::config::SosConfig;
use crate::session::EmergencySession;
use crate::AppError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CoordinateError {
    #[error("Latitude {0} is out of valid range [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("Longitude {0} is out of valid range [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("Coordinate value is not finite (NaN or Infinity)")]
    NonFinite,
}

/// Validated, NaN-free device position.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct Position {
    latitude: f64,
    longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(CoordinateError::NonFinite);
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Map query link: `<base>?q=<lat>,<lng>`, coordinates written verbatim.
    #[must_use]
    pub fn map_url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        url.set_query(Some(&format!("q={},{}", self.latitude, self.longitude)));
        url.set_fragment(None);
        url
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.latitude.to_bits() == other.latitude.to_bits()
            && self.longitude.to_bits() == other.longitude.to_bits()
    }
}

impl Eq for Position {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationStatus {
    #[default]
    Unknown,
    Requesting,
    Acquired,
    /// Advisory only: arming and dispatch still work without a fix.
    Unavailable(GeolocationError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShareStatus {
    #[default]
    Idle,
    /// Native share requested for `url`.
    Sharing { url: String },
    /// Native share unsupported; clipboard copy of `url` requested.
    Copying { url: String },
    Shared,
    Copied,
    Failed,
}

impl ShareStatus {
    pub fn pending_url(&self) -> Option<&str> {
        match self {
            Self::Sharing { url } | Self::Copying { url } => Some(url),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct Model {
    pub session: EmergencySession,
    pub config: SosConfig,

    pub location_status: LocationStatus,
    pub share_status: ShareStatus,

    // Generic UI state
    pub active_error: Option<AppError>,
    pub active_toast: Option<String>,
}

impl Model {
    pub fn set_error(&mut self, error: impl Into<AppError>) {
        self.active_error = Some(error.into());
    }

    pub fn clear_error(&mut self) {
        self.active_error = None;
    }
}
