use crate::errors::AppError;
use crate::repository::PunchClockRepository;
use actix_web::{HttpResponse, web};

/// Job roles offered on the registration form
#[utoipa::path(
    get,
    path = "/reference/roles",
    responses(
        (status = 200, description = "All roles", body = [crate::model::role::Role]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Reference"
)]
pub async fn list_roles(
    repo: web::Data<dyn PunchClockRepository>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(repo.list_roles().await?))
}

/// Employment types offered on the registration form
#[utoipa::path(
    get,
    path = "/reference/employment-types",
    responses(
        (status = 200, description = "All employment types", body = [crate::model::role::EmploymentType]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Reference"
)]
pub async fn list_employment_types(
    repo: web::Data<dyn PunchClockRepository>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(repo.list_employment_types().await?))
}
