pub mod config;
pub mod modules;
pub mod services;

use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use config::DbPool;
use modules::auth::crud::{MySqlSessionRepo, MySqlTwoFactorTokenRepo, MySqlUserRepo};
use modules::auth::interface::{SessionRepository, TwoFactorTokenRepository, UserRepository};
use modules::auth::memory::{MemorySessionRepo, MemoryTwoFactorTokenRepo, MemoryUserRepo};
use modules::auth::auth_routes;
use modules::security::security_routes;
use services::jwt::JwtService;
use services::mailer::Mailer;
use services::rate_limit::{create_rate_limiter, RateLimitLayer};
use services::security::security_headers;

/// Dependency container. Storage sits behind repository ports so the same
/// service logic runs against MySQL in production and the in-memory
/// backend in tests.
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub two_factor_tokens: Arc<dyn TwoFactorTokenRepository>,
    pub jwt: JwtService,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn mysql(pool: DbPool, jwt: JwtService, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            users: Arc::new(MySqlUserRepo::new(pool.clone())),
            sessions: Arc::new(MySqlSessionRepo::new(pool.clone())),
            two_factor_tokens: Arc::new(MySqlTwoFactorTokenRepo::new(pool)),
            jwt,
            mailer,
        }
    }

    pub fn in_memory(jwt: JwtService, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            users: Arc::new(MemoryUserRepo::default()),
            sessions: Arc::new(MemorySessionRepo::default()),
            two_factor_tokens: Arc::new(MemoryTwoFactorTokenRepo::default()),
            jwt,
            mailer,
        }
    }
}

pub async fn create_app(state: AppState, rate_limit_burst: u32) -> Router {
    let state = Arc::new(state);

    let rate_limiter = create_rate_limiter(rate_limit_burst);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/security", security_routes(state.clone()))
        .layer(middleware::from_fn(security_headers))
        .layer(RequestBodyLimitLayer::new(1024 * 100)) // 100KB max body
        .layer(RateLimitLayer::new(rate_limiter))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> &'static str {
    "Financas Auth API"
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
