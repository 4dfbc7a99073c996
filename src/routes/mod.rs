//! Route definitions for the admin API.

pub mod applications;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod users;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Largest accepted request body; every endpoint takes small JSON bodies.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/me", get(auth::me));

    let admin_routes = Router::new()
        .route("/applications", get(applications::list))
        .route(
            "/applications/{id}",
            get(applications::get_by_id).patch(applications::update_status),
        )
        .route("/users", get(users::list))
        .route("/dashboard/stats", get(dashboard::stats))
        .route("/dashboard/reports", post(dashboard::download_report))
        .route("/dashboard/reports/stats", post(dashboard::report_stats));

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest("/api", auth_routes.merge(admin_routes))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(cors_layer(&state.config.frontend_url))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(frontend_url: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    match frontend_url.parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin),
        Err(e) => {
            tracing::warn!(error = %e, frontend_url, "Invalid FRONTEND_URL, CORS origin not set");
            cors
        }
    }
}
