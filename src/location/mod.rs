//! Geolocation capability consumed by the punch clock.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

use crate::errors::{AppError, AppResult};
use crate::model::location::GeoPoint;

pub mod store;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocationError {
    #[error("location has not been reported yet")]
    Pending,
    #[error("location unavailable: {0}")]
    Unavailable(String),
    #[error("location request timed out")]
    Timeout,
}

/// Yields one reading per request, or an error value. No retries.
#[async_trait]
pub trait LocationSource: Send + Sync {
    async fn request_location(&self, user_id: u64) -> Result<GeoPoint, LocationError>;
}

/// Asks `source` for a reading, bounded by `timeout`. Every failure, including
/// "nothing reported yet", becomes `LocationUnavailable`.
pub async fn capture_location(
    source: &dyn LocationSource,
    user_id: u64,
    timeout: Duration,
) -> AppResult<GeoPoint> {
    let reading = actix_web::rt::time::timeout(timeout, source.request_location(user_id))
        .await
        .unwrap_or(Err(LocationError::Timeout));

    reading.map_err(|e| {
        warn!(user_id, reason = %e, "Punch blocked without location");
        AppError::LocationUnavailable
    })
}
