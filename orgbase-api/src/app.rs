/// Application state and router builder
///
/// Defines the shared application state and assembles the Axum router with
/// all routes and middleware.
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                          # Health check (public)
/// ├── /auth/                           # Authentication (public)
/// │   ├── POST /register
/// │   └── POST /login
/// ├── /api/                            # Protected (bearer token required)
/// │   ├── GET  /users/:id
/// │   ├── GET  /organisations
/// │   ├── POST /organisations
/// │   ├── GET  /organisations/:org_id
/// │   └── POST /organisations/:org_id/users
/// └── /admin/                          # Operational tooling
///     ├── POST /migrate
///     └── POST /migrate/drop/:table
/// ```
///
/// Middleware stack, bottom to top: request logging (tower-http TraceLayer),
/// CORS, and the per-route bearer-token layer on `/api`.

use crate::config::Config;
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use chrono::Duration;
use orgbase_shared::auth::{
    guard::{self, AuthContext, GuardError},
    token,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned per request via Axum's `State` extractor; Arc keeps the clone
/// cheap.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Secret used for token signing and verification
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Configured token time-to-live
    pub fn token_ttl(&self) -> Duration {
        Duration::hours(self.config.jwt.ttl_hours as i64)
    }
}

/// Builds the complete Axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    // Protected API routes (bearer token required)
    let api_routes = Router::new()
        .route("/users/:id", get(routes::users::get_user))
        .route(
            "/organisations",
            get(routes::organisations::list_organisations)
                .post(routes::organisations::create_organisation),
        )
        .route(
            "/organisations/:org_id",
            get(routes::organisations::get_organisation),
        )
        .route(
            "/organisations/:org_id/users",
            post(routes::organisations::add_user),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            bearer_auth_layer,
        ));

    // Table bootstrap (operational tooling)
    let admin_routes = Router::new()
        .route("/migrate", post(routes::admin::migrate))
        .route("/migrate/drop/:table", post(routes::admin::drop_table));

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/auth", auth_routes)
        .nest("/api", api_routes)
        .nest("/admin", admin_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Bearer-token middleware layer for protected routes
///
/// Extracts and verifies the token from the Authorization header, then
/// injects an `AuthContext` into request extensions. A missing credential
/// short-circuits with 400, an invalid one with 401; handlers behind this
/// layer always see an authenticated subject.
async fn bearer_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, GuardError> {
    let token = guard::bearer_token(req.headers()).ok_or(GuardError::MissingToken)?;

    let claims = token::verify_token(token, state.jwt_secret())
        .map_err(|e| GuardError::InvalidToken(e.to_string()))?;

    req.extensions_mut()
        .insert(AuthContext::from_claims(&claims));

    Ok(next.run(req).await)
}
