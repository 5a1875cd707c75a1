use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use crate::errors::AppError;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum PunchType {
    In,
    Out,
}

impl PunchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PunchType::In => "IN",
            PunchType::Out => "OUT",
        }
    }

    pub fn complement(self) -> Self {
        match self {
            PunchType::In => PunchType::Out,
            PunchType::Out => PunchType::In,
        }
    }
}

/// Append-only punch event.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PunchRecord {
    #[schema(example = 1)]
    pub punch_id: u64,
    #[schema(example = 7)]
    pub user_id: u64,
    pub punch_type: PunchType,
    #[schema(example = "2026-01-05T09:00:00Z", value_type = String, format = "date-time")]
    pub punch_time: DateTime<Utc>,
    #[schema(example = 1.3521, nullable = true)]
    pub location_lat: Option<f64>,
    #[schema(example = 103.8198, nullable = true)]
    pub location_long: Option<f64>,
}

/// A punch about to be written. The timestamp is assigned by the writer.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPunch {
    pub user_id: u64,
    pub punch_type: PunchType,
    pub location_lat: f64,
    pub location_long: f64,
}

/// `punch_records` row as read by sqlx. MySQL hands ENUM columns back as text.
#[derive(FromRow)]
pub struct PunchRecordSql {
    pub punch_id: u64,
    pub user_id: u64,
    pub punch_type: String,
    pub punch_time: DateTime<Utc>,
    pub location_lat: Option<f64>,
    pub location_long: Option<f64>,
}

impl TryFrom<PunchRecordSql> for PunchRecord {
    type Error = AppError;

    fn try_from(row: PunchRecordSql) -> Result<Self, Self::Error> {
        Ok(PunchRecord {
            punch_id: row.punch_id,
            user_id: row.user_id,
            punch_type: parse_punch_type(&row.punch_type)?,
            punch_time: row.punch_time,
            location_lat: row.location_lat,
            location_long: row.location_long,
        })
    }
}

pub(crate) fn parse_punch_type(raw: &str) -> Result<PunchType, AppError> {
    raw.parse().map_err(|_| {
        AppError::PersistenceFailure(sqlx::Error::Decode(
            format!("unknown punch_type {raw:?}").into(),
        ))
    })
}

/// One row of the staff punch report: a punch joined with its owner's
/// name, role and employment type.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(example = json!({
    "punch_id": 12,
    "user_id": 7,
    "full_name": "John Doe",
    "role_name": "Cashier",
    "type_name": "Full-time",
    "punch_type": "IN",
    "punch_time": "2026-01-05T09:00:00Z",
    "location_lat": 1.3521,
    "location_long": 103.8198
}))]
pub struct PunchReportRow {
    pub punch_id: u64,
    pub user_id: u64,
    pub full_name: String,
    #[schema(nullable = true)]
    pub role_name: Option<String>,
    #[schema(nullable = true)]
    pub type_name: Option<String>,
    pub punch_type: PunchType,
    #[schema(value_type = String, format = "date-time")]
    pub punch_time: DateTime<Utc>,
    #[schema(nullable = true)]
    pub location_lat: Option<f64>,
    #[schema(nullable = true)]
    pub location_long: Option<f64>,
}

#[derive(FromRow)]
pub struct PunchReportSql {
    pub punch_id: u64,
    pub user_id: u64,
    pub full_name: String,
    pub role_name: Option<String>,
    pub type_name: Option<String>,
    pub punch_type: String,
    pub punch_time: DateTime<Utc>,
    pub location_lat: Option<f64>,
    pub location_long: Option<f64>,
}

impl TryFrom<PunchReportSql> for PunchReportRow {
    type Error = AppError;

    fn try_from(row: PunchReportSql) -> Result<Self, Self::Error> {
        Ok(PunchReportRow {
            punch_id: row.punch_id,
            user_id: row.user_id,
            full_name: row.full_name,
            role_name: row.role_name,
            type_name: row.type_name,
            punch_type: parse_punch_type(&row.punch_type)?,
            punch_time: row.punch_time,
            location_lat: row.location_lat,
            location_long: row.location_long,
        })
    }
}
