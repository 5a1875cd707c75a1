use async_trait::async_trait;
use moka::future::Cache;
use std::time::{Duration, Instant};

use super::{LocationError, LocationSource};
use crate::model::location::{GeoPoint, LocationStatus};

pub const TIMED_OUT_REASON: &str = "timed out";

#[derive(Clone)]
struct Entry {
    status: LocationStatus,
    since: Instant,
}

/// Per-user capture state reported by the browser. Entries expire so a
/// stale reading is never reused for a later punch. A request left pending
/// past `timeout` reads as unavailable.
#[derive(Clone)]
pub struct LocationStore {
    entries: Cache<u64, Entry>,
    timeout: Duration,
}

impl LocationStore {
    pub fn new(ttl: Duration, timeout: Duration) -> Self {
        Self {
            // One entry per logged-in user, bounded by the TTL only.
            entries: Cache::builder().time_to_live(ttl).build(),
            timeout,
        }
    }

    async fn put(&self, user_id: u64, status: LocationStatus) {
        self.entries
            .insert(
                user_id,
                Entry {
                    status,
                    since: Instant::now(),
                },
            )
            .await;
    }

    /// Called at login, before the browser has answered.
    pub async fn mark_pending(&self, user_id: u64) {
        self.put(user_id, LocationStatus::Pending).await;
    }

    pub async fn record(&self, user_id: u64, point: GeoPoint) {
        self.put(
            user_id,
            LocationStatus::Available {
                lat: point.lat,
                long: point.long,
            },
        )
        .await;
    }

    pub async fn record_failure(&self, user_id: u64, reason: String) {
        self.put(user_id, LocationStatus::Unavailable { reason })
            .await;
    }

    pub async fn status(&self, user_id: u64) -> LocationStatus {
        match self.entries.get(&user_id).await {
            Some(Entry {
                status: LocationStatus::Pending,
                since,
            }) if since.elapsed() >= self.timeout => LocationStatus::Unavailable {
                reason: TIMED_OUT_REASON.to_string(),
            },
            Some(entry) => entry.status,
            None => LocationStatus::Pending,
        }
    }

    pub async fn forget(&self, user_id: u64) {
        self.entries.invalidate(&user_id).await;
    }
}

#[async_trait]
impl LocationSource for LocationStore {
    async fn request_location(&self, user_id: u64) -> Result<GeoPoint, LocationError> {
        match self.status(user_id).await {
            LocationStatus::Available { lat, long } => Ok(GeoPoint { lat, long }),
            LocationStatus::Pending => Err(LocationError::Pending),
            LocationStatus::Unavailable { reason } if reason == TIMED_OUT_REASON => {
                Err(LocationError::Timeout)
            }
            LocationStatus::Unavailable { reason } => Err(LocationError::Unavailable(reason)),
        }
    }
}
