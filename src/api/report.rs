use crate::attendance::sessions::{reconstruct_sessions, total_hours};
use crate::auth::auth::AuthUser;
use crate::errors::AppError;
use crate::model::punch::PunchReportRow;
use crate::model::session::Session;
use crate::repository::PunchClockRepository;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::{IntoParams, ToSchema};

#[derive(Serialize, ToSchema)]
pub struct PunchReport {
    pub data: Vec<PunchReportRow>,
    #[schema(example = 1)]
    pub total: usize,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct SessionQuery {
    /// Defaults to the caller
    #[schema(example = 7)]
    pub user_id: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct SessionReport {
    #[schema(example = 7)]
    pub user_id: u64,
    pub sessions: Vec<Session>,
    #[schema(example = 8.0)]
    pub total_hours: f64,
}

/// Staff punch locations: every punch with name, role and employment type
#[utoipa::path(
    get,
    path = "/api/punches",
    responses(
        (status = 200, description = "All punches, newest first", body = PunchReport),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Report"
)]
#[instrument(name = "punch_report", skip(auth, repo), fields(user_id = auth.user_id))]
pub async fn list_punches(
    auth: AuthUser,
    repo: web::Data<dyn PunchClockRepository>,
) -> Result<HttpResponse, AppError> {
    let data = repo.all_punches_joined().await?;
    debug!(rows = data.len(), "Punch report loaded");

    Ok(HttpResponse::Ok().json(PunchReport {
        total: data.len(),
        data,
    }))
}

/// Worked sessions reconstructed from a user's punches
#[utoipa::path(
    get,
    path = "/api/sessions",
    params(SessionQuery),
    responses(
        (status = 200, description = "Sessions in OUT order with total hours", body = SessionReport),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Report"
)]
#[instrument(name = "session_report", skip(auth, repo, query), fields(user_id = auth.user_id))]
pub async fn list_sessions(
    auth: AuthUser,
    repo: web::Data<dyn PunchClockRepository>,
    query: web::Query<SessionQuery>,
) -> Result<HttpResponse, AppError> {
    let user_id = query.user_id.unwrap_or(auth.user_id);
    let punches = repo.punches_for_user(user_id).await?;
    let sessions = reconstruct_sessions(&punches);

    Ok(HttpResponse::Ok().json(SessionReport {
        user_id,
        total_hours: total_hours(&sessions),
        sessions,
    }))
}
