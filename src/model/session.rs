use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// One reconstructed IN -> OUT interval. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Session {
    #[schema(example = "2026-01-05T09:00:00Z", value_type = String, format = "date-time")]
    pub punch_in_time: DateTime<Utc>,
    #[schema(example = "2026-01-05T17:00:00Z", value_type = String, format = "date-time")]
    pub punch_out_time: DateTime<Utc>,
    #[schema(example = 8.0)]
    pub hours_worked: f64,
}
