use crate::attendance::clock::{ClockStatus, clock_status, submit_punch};
use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::errors::AppError;
use crate::location::store::LocationStore;
use crate::model::location::LocationStatus;
use crate::model::punch::{PunchRecord, PunchType};
use crate::repository::PunchClockRepository;
use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct PunchScreen {
    #[serde(flatten)]
    pub clock: ClockStatus,
    pub location: LocationStatus,
}

#[derive(Serialize, ToSchema)]
pub struct PunchResponse {
    #[schema(example = "Punched IN at 1.3521, 103.8198")]
    pub message: String,
    pub record: PunchRecord,
}

/// Current punch state, button enablement and location status
#[utoipa::path(
    get,
    path = "/api/punch",
    responses(
        (status = 200, description = "Punch screen state", body = PunchScreen),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Punch"
)]
#[instrument(name = "punch_status", skip(auth, repo, locations), fields(user_id = auth.user_id))]
pub async fn punch_status(
    auth: AuthUser,
    repo: web::Data<dyn PunchClockRepository>,
    locations: web::Data<LocationStore>,
) -> Result<HttpResponse, AppError> {
    let clock = clock_status(repo.get_ref(), auth.user_id).await?;
    let location = locations.status(auth.user_id).await;

    Ok(HttpResponse::Ok().json(PunchScreen { clock, location }))
}

/// Punch-in endpoint
#[utoipa::path(
    post,
    path = "/api/punch/in",
    responses(
        (status = 201, description = "Punched in", body = PunchResponse),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Already punched in", body = Object, example = json!({
            "error": "Cannot punch IN while the last punch is IN"
        })),
        (status = 422, description = "No location captured", body = Object, example = json!({
            "error": "Location not available. Please enable location services."
        })),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Punch"
)]
pub async fn punch_in(
    auth: AuthUser,
    repo: web::Data<dyn PunchClockRepository>,
    locations: web::Data<LocationStore>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    punch(auth, repo, locations, config, PunchType::In).await
}

/// Punch-out endpoint
#[utoipa::path(
    post,
    path = "/api/punch/out",
    responses(
        (status = 201, description = "Punched out", body = PunchResponse),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Not punched in", body = Object, example = json!({
            "error": "Cannot punch OUT while the last punch is OUT"
        })),
        (status = 422, description = "No location captured"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Punch"
)]
pub async fn punch_out(
    auth: AuthUser,
    repo: web::Data<dyn PunchClockRepository>,
    locations: web::Data<LocationStore>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    punch(auth, repo, locations, config, PunchType::Out).await
}

#[instrument(
    name = "punch",
    skip(auth, repo, locations, config),
    fields(user_id = auth.user_id, full_name = %auth.full_name)
)]
async fn punch(
    auth: AuthUser,
    repo: web::Data<dyn PunchClockRepository>,
    locations: web::Data<LocationStore>,
    config: web::Data<Config>,
    punch_type: PunchType,
) -> Result<HttpResponse, AppError> {
    let record = submit_punch(
        repo.get_ref(),
        locations.get_ref(),
        auth.user_id,
        punch_type,
        config.location_timeout,
    )
    .await?;

    let message = format!(
        "Punched {} at {}, {}",
        record.punch_type,
        record.location_lat.unwrap_or_default(),
        record.location_long.unwrap_or_default()
    );

    Ok(HttpResponse::Created().json(PunchResponse { message, record }))
}
