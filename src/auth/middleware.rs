use crate::auth::auth::authenticate;
use crate::auth::revocation::RevokedTokens;
use crate::config::Config;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, ResponseError,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};

pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("App config missing"))?;
    let revoked = req
        .app_data::<Data<RevokedTokens>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("Revocation list missing"))?;

    let auth_user = match authenticate(req.headers(), config, revoked) {
        Ok(user) => user,
        Err(e) => {
            let resp = e.error_response();
            return Ok(req.into_response(resp));
        }
    };

    req.extensions_mut().insert(auth_user);

    next.call(req).await
}
