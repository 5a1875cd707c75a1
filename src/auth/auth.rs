use crate::auth::jwt::verify_token;
use crate::auth::revocation::RevokedTokens;
use crate::config::Config;
use crate::errors::AppError;
use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, web::Data};
use futures::future::{Ready, ready};

/// Per-request identity of the caller. Replaces any ambient "logged in"
/// state: handlers receive it as an argument.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: u64,
    pub full_name: String,
    pub jti: String,
}

/// Validates the bearer token in `headers`.
pub fn authenticate(
    headers: &HeaderMap,
    config: &Config,
    revoked: &RevokedTokens,
) -> Result<AuthUser, AppError> {
    let header_value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header encoding".to_string()))?;

    let token = header_value.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized("Authorization header must start with Bearer".to_string())
    })?;

    let claims = verify_token(token, &config.jwt_secret)
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

    if revoked.is_revoked(&claims.jti) {
        return Err(AppError::Unauthorized("Token has been revoked".to_string()));
    }

    Ok(AuthUser {
        user_id: claims.user_id,
        full_name: claims.sub,
        jti: claims.jti,
    })
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // Already resolved by the middleware on protected scopes.
        if let Some(user) = req.extensions().get::<AuthUser>() {
            return ready(Ok(user.clone()));
        }

        let (config, revoked) = match (
            req.app_data::<Data<Config>>(),
            req.app_data::<Data<RevokedTokens>>(),
        ) {
            (Some(c), Some(r)) => (c, r),
            _ => {
                return ready(Err(actix_web::error::ErrorInternalServerError(
                    "Auth state missing",
                )));
            }
        };

        ready(authenticate(req.headers(), config, revoked).map_err(Into::into))
    }
}
