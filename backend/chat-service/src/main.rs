use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chat_service::config::Settings;
use chat_service::registry::SessionRegistry;
use chat_service::routes::{self, AppState};

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = Settings::load().context("Failed to load settings")?;

    auth_core::jwt::initialize(&settings.jwt.secret).context("Failed to initialize JWT keys")?;

    let pool = PgPoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect(&settings.database.url)
        .await
        .context("Failed to connect to Postgres")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    tokio::fs::create_dir_all(&settings.media.root)
        .await
        .context("Failed to create media root")?;

    let state = AppState {
        db: pool,
        registry: SessionRegistry::new(),
        media: settings.media.clone(),
    };

    let bind_addr = (settings.server.host.clone(), settings.server.port);
    info!("chat-service listening on {}:{}", bind_addr.0, bind_addr.1);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Cors::permissive())
            .route("/health", web::get().to(health))
            .configure(routes::configure)
    })
    .bind(bind_addr)?
    .run()
    .await
    .context("Server error")
}
