use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;
use std::sync::Arc;

mod api;
mod attendance;
mod auth;
mod config;
mod db;
mod docs;
mod errors;
mod location;
mod model;
mod repository;
mod routes;

use config::Config;
use db::init_db;

use crate::auth::revocation::RevokedTokens;
use crate::docs::ApiDoc;
use crate::location::store::LocationStore;
use crate::repository::PunchClockRepository;
use crate::repository::mysql::MySqlRepository;
use std::time::Duration;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Punch clock is running"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url, config.db_max_connections).await?;

    let repo: Arc<dyn PunchClockRepository> = Arc::new(MySqlRepository::new(pool));
    let repo = Data::from(repo);
    let locations = Data::new(LocationStore::new(
        config.location_ttl,
        config.location_timeout,
    ));
    let revoked = Data::new(RevokedTokens::new(Duration::from_secs(
        config.access_token_ttl as u64,
    )));

    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(repo.clone())
            .app_data(locations.clone())
            .app_data(revoked.clone())
            .app_data(Data::new(config.clone()))
            .service(index)
            // Configure auth + protected routes with rate limiting
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await?;

    info!("Server stopped");
    Ok(())
}
