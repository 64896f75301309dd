pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod http;
mod middleware;
pub mod models;
pub mod state;
pub mod uploads;
pub mod validation;

use axum::{Router, middleware as axum_middleware};
use config::Config;
use errors::AppError;
use middleware::{cors_layer, create_global_rate_limiter, rate_limit_middleware};
use sqlx::postgres::PgPoolOptions;
use state::AppState;
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing_subscriber::EnvFilter;
use uploads::UploadStore;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// The full application router: API routes, stored uploads and middleware.
pub fn build_app(state: AppState, allowed_origins: &[String]) -> Router {
    let global_rate_limiter = create_global_rate_limiter();
    let uploads = ServeDir::new(state.uploads.root());

    Router::new()
        .merge(http::create_http_routes(state))
        .nest_service("/uploads", uploads)
        .layer(axum_middleware::from_fn(move |req, next| {
            rate_limit_middleware(global_rate_limiter.clone(), req, next)
        }))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(allowed_origins)),
        )
        .fallback(|| async { "404 Not Found" })
}

pub async fn start_server() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let postgres = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to connect to Postgres: {e}")))?;

    MIGRATOR
        .run(&postgres)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to run migrations: {e}")))?;
    tracing::info!("Database migrations applied");

    let uploads = UploadStore::new(&config.upload_root);
    uploads.ensure_dirs().await?;

    let state = AppState::new(postgres, uploads, &config.jwt_secret);
    let app = build_app(state, &config.allowed_origins);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .map_err(|e| AppError::EnvError(format!("Failed to bind port {}: {e}", config.port)))?;
    tracing::info!("EagleWorks server listening on port {}", config.port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| {
        tracing::error!("Server error: {}", e);
        AppError::InternalError
    })
}
