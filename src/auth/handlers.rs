use crate::{
    auth::{
        auth::AuthUser,
        jwt::generate_access_token,
        password::{hash_password, verify_against_dummy, verify_password},
        revocation::RevokedTokens,
    },
    config::Config,
    errors::AppError,
    location::store::LocationStore,
    model::user::{LoginReq, NewUser, RegisterReq},
    repository::PunchClockRepository,
};
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

/// User registration handler
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterReq,
    responses(
        (status = 201, description = "User registered", body = Object, example = json!({
            "message": "User registered successfully",
            "user_id": 7
        })),
        (status = 400, description = "Empty or duplicate name, empty password, unknown role"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_register", skip(user, repo), fields(full_name = %user.full_name))]
pub async fn register(
    user: web::Json<RegisterReq>,
    repo: web::Data<dyn PunchClockRepository>,
) -> Result<HttpResponse, AppError> {
    let user = user.into_inner();
    let full_name = user.full_name.trim();

    if full_name.is_empty() || user.password.is_empty() {
        info!("Validation failed: empty name or password");
        return Err(AppError::DuplicateOrEmptyInput(
            "Name and password must not be empty".to_string(),
        ));
    }

    if repo.find_user_by_name(full_name).await?.is_some() {
        info!("Validation failed: name already registered");
        return Err(AppError::DuplicateOrEmptyInput(
            "Name already registered".to_string(),
        ));
    }

    let password_hash = hash_password(&user.password)
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?;

    let user_id = repo
        .insert_user_with_role(NewUser {
            full_name: full_name.to_string(),
            password_hash,
            role_id: user.role_id,
            employment_type_id: user.employment_type_id,
        })
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "User registered successfully",
        "user_id": user_id
    })))
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    #[schema(example = 7)]
    pub user_id: u64,
    #[schema(example = "John Doe")]
    pub full_name: String,
}

/// Login handler. Unknown names and wrong passwords get the same answer.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = Object, example = json!({
            "error": "Invalid credentials"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip(user, repo, config, locations), fields(full_name = %user.full_name))]
pub async fn login(
    user: web::Json<LoginReq>,
    repo: web::Data<dyn PunchClockRepository>,
    config: web::Data<Config>,
    locations: web::Data<LocationStore>,
) -> Result<HttpResponse, AppError> {
    info!("Login request received");

    let full_name = user.full_name.trim();
    if full_name.is_empty() || user.password.is_empty() {
        verify_against_dummy(&user.password);
        return Err(AppError::InvalidCredentials);
    }

    debug!("Fetching user from database");

    let db_user = repo.find_user_by_name(full_name).await?;

    let (db_user, hash) = match db_user {
        Some(u) => match u.password_hash.clone() {
            Some(hash) => (u, hash),
            None => {
                info!(user_id = u.user_id, "Invalid credentials: no password set");
                verify_against_dummy(&user.password);
                return Err(AppError::InvalidCredentials);
            }
        },
        None => {
            info!("Invalid credentials: user not found");
            verify_against_dummy(&user.password);
            return Err(AppError::InvalidCredentials);
        }
    };

    if let Err(e) = verify_password(&user.password, &hash) {
        info!(error = %e, "Invalid credentials: password mismatch");
        return Err(AppError::InvalidCredentials);
    }

    debug!(user_id = db_user.user_id, "Password verified, issuing token");

    let (access_token, _) = generate_access_token(
        db_user.user_id,
        db_user.full_name.clone(),
        &config.jwt_secret,
        config.access_token_ttl,
    )
    .map_err(|e| AppError::Internal(format!("token signing failed: {e}")))?;

    // Fresh session: the browser is asked for a new reading.
    locations.mark_pending(db_user.user_id).await;

    info!(user_id = db_user.user_id, "Login successful");

    Ok(HttpResponse::Ok().json(LoginResponse {
        access_token,
        user_id: db_user.user_id,
        full_name: db_user.full_name,
    }))
}

/// Logout: revokes the presented token and drops the captured location.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 204, description = "Logged out"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_logout", skip(auth, revoked, locations), fields(user_id = auth.user_id))]
pub async fn logout(
    auth: AuthUser,
    revoked: web::Data<RevokedTokens>,
    locations: web::Data<LocationStore>,
) -> HttpResponse {
    revoked.revoke(&auth.jti).await;
    locations.forget(auth.user_id).await;

    info!("Logout successful");
    HttpResponse::NoContent().finish()
}
