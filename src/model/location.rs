use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::AppError;

/// A latitude/longitude pair captured from the client device.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    #[schema(example = 1.3521)]
    pub lat: f64,
    #[schema(example = 103.8198)]
    pub long: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, long: f64) -> Result<Self, AppError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(AppError::InvalidInput(format!(
                "Latitude must be between -90 and 90, got {lat}"
            )));
        }
        if !long.is_finite() || !(-180.0..=180.0).contains(&long) {
            return Err(AppError::InvalidInput(format!(
                "Longitude must be between -180 and 180, got {long}"
            )));
        }
        Ok(Self { lat, long })
    }
}

/// Capture state for one user, as shown next to the punch buttons.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum LocationStatus {
    /// Requested from the browser, no answer yet.
    Pending,
    Available { lat: f64, long: f64 },
    /// Denied, unsupported or timed out.
    Unavailable { reason: String },
}
