use crate::auth::auth::AuthUser;
use crate::errors::AppError;
use crate::location::store::LocationStore;
use crate::model::location::GeoPoint;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::ToSchema;

/// What the browser's geolocation callback posts back: coordinates on
/// success, or the error message when access is denied or unsupported.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum LocationReport {
    Position {
        #[schema(example = 1.3521)]
        lat: f64,
        #[schema(example = 103.8198)]
        long: f64,
    },
    Failure {
        #[schema(example = "User denied Geolocation")]
        error: String,
    },
}

/// Receive a geolocation reading (or failure) for the current user
#[utoipa::path(
    post,
    path = "/api/location",
    request_body = LocationReport,
    responses(
        (status = 200, description = "Resulting location status", body = crate::model::location::LocationStatus),
        (status = 400, description = "Coordinates out of range"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Location"
)]
#[instrument(name = "report_location", skip(auth, locations, report), fields(user_id = auth.user_id))]
pub async fn report_location(
    auth: AuthUser,
    locations: web::Data<LocationStore>,
    report: web::Json<LocationReport>,
) -> Result<HttpResponse, AppError> {
    match report.into_inner() {
        LocationReport::Position { lat, long } => {
            let point = GeoPoint::new(lat, long)?;
            locations.record(auth.user_id, point).await;
        }
        LocationReport::Failure { error } => {
            info!(reason = %error, "Browser could not provide a location");
            locations.record_failure(auth.user_id, error).await;
        }
    }

    Ok(HttpResponse::Ok().json(locations.status(auth.user_id).await))
}

/// Current location capture status
#[utoipa::path(
    get,
    path = "/api/location",
    responses(
        (status = 200, description = "pending / available / unavailable", body = crate::model::location::LocationStatus),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Location"
)]
pub async fn location_status(
    auth: AuthUser,
    locations: web::Data<LocationStore>,
) -> HttpResponse {
    HttpResponse::Ok().json(locations.status(auth.user_id).await)
}
