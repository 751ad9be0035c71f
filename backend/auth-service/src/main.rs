/// Planora Auth Service - Main entry point
/// Issues, rotates and revokes the bearer tokens that gate every other
/// Planora service.
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use redis::aio::ConnectionManager;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use auth_service::{
    config::Config,
    db::PgMemberDirectory,
    handlers::{join, login, logout, reissue},
    middleware::require_auth,
    services::TokenService,
    store::RedisSessionStore,
    AppState,
};
use jwt_codec::TokenCodec;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env().expect("Failed to load configuration from environment");

    tracing::info!(
        "Starting Planora Auth Service on {}:{}",
        config.server_host,
        config.server_port
    );

    // Signing key is loaded exactly once; a malformed secret aborts startup.
    let codec = Arc::new(
        TokenCodec::from_base64_secret(&config.jwt_secret)
            .map_err(|e| format!("Failed to initialize JWT signing key: {e}"))?,
    );

    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Database connection pool initialized");

    let redis_client = redis::Client::open(config.redis_url.clone())?;
    let redis_conn = ConnectionManager::new(redis_client).await?;

    tracing::info!("Redis connection initialized");

    let sessions: Arc<dyn auth_service::store::SessionStore> = Arc::new(RedisSessionStore::new(
        redis_conn,
        config.store_timeout(),
    ));

    let directory: Arc<dyn auth_service::services::MemberDirectory> =
        Arc::new(PgMemberDirectory::new(db_pool));

    let tokens = TokenService::new(
        codec.clone(),
        sessions.clone(),
        directory.clone(),
        config.access_token_ttl(),
        config.refresh_token_ttl(),
    );

    let app_state = AppState {
        directory,
        codec,
        sessions,
        tokens,
    };

    // Login, join and reissue must stay reachable without a live session.
    let public_routes = Router::new()
        .route("/api/healthcheck", get(health_check))
        .route("/api/member/join", post(join))
        .route("/api/member/login", post(login))
        .route("/api/jwt/reissue", post(reissue));

    let protected_routes = Router::new()
        .route("/api/member/logout", post(logout))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    let app = public_routes
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("REST API listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
