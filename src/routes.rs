use crate::{
    api::{location, punch, reference, report},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

// Helper to build per-route limiter
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        (60_000 / requests_per_min as u64).max(1)
    };
    let cfg = GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms)
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("burst size and period are non-zero");
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let register_limiter = Arc::new(build_limiter(config.rate_register_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(register_limiter.clone())
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::logout)),
            ),
    );

    cfg.service(
        web::scope("/reference")
            .wrap(register_limiter)
            .service(web::resource("/roles").route(web::get().to(reference::list_roles)))
            .service(
                web::resource("/employment-types")
                    .route(web::get().to(reference::list_employment_types)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/punch")
                    // /punch
                    .service(web::resource("").route(web::get().to(punch::punch_status)))
                    // /punch/in, /punch/out
                    .service(web::resource("/in").route(web::post().to(punch::punch_in)))
                    .service(web::resource("/out").route(web::post().to(punch::punch_out))),
            )
            .service(
                web::resource("/location")
                    .route(web::get().to(location::location_status))
                    .route(web::post().to(location::report_location)),
            )
            .service(web::resource("/punches").route(web::get().to(report::list_punches)))
            .service(web::resource("/sessions").route(web::get().to(report::list_sessions))),
    );
}

// LOGIN
//  └─ access_token (ACCESS_TOKEN_TTL), location marked pending

// BROWSER
//  └─ POST /api/location  {lat, long} | {error}

// PUNCH
//  └─ GET /api/punch → enabled button → POST /api/punch/{in|out}
