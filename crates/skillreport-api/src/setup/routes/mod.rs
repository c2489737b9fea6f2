//! Route configuration and setup.
//!
//! Domain route groups live in [domains](domains); health checks in [health](health).

mod domains;
mod health;

use crate::auth::{auth_middleware, AuthState};
use crate::middleware::{make_request_span, request_id_middleware};
use crate::state::AppState;
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use skillreport_core::Config;
use std::sync::Arc;
use std::time::Duration;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Smallest global body limit; bulk uploads raise it to their file limit
const MIN_BODY_LIMIT_BYTES: usize = 2 * 1024 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let auth_state = AuthState {
        jwt: state.jwt.clone(),
    };

    let public_routes = public_routes(state.clone());
    let protected_routes = protected_routes(state.clone()).layer(
        axum::middleware::from_fn_with_state(Arc::new(auth_state), auth_middleware),
    );

    let http_concurrency_limit = config.http_concurrency_limit();
    let request_timeout_secs = config.request_timeout_secs();
    let body_limit = (config.bulk().max_file_size_bytes + 64 * 1024).max(MIN_BODY_LIMIT_BYTES);
    tracing::info!(
        http_concurrency_limit,
        request_timeout_secs,
        body_limit,
        "HTTP limits configured"
    );

    let app = public_routes
        .merge(protected_routes)
        .nest(
            "/docs",
            utoipa_rapidoc::RapiDoc::new("/api/openapi.json")
                .path("/docs")
                .into(),
        )
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(TimeoutLayer::new(Duration::from_secs(request_timeout_secs)))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .expose_headers([header::CONTENT_DISPOSITION])
    };
    Ok(cors)
}

fn public_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::liveness_check))
        .route("/health/ready", get(health::readiness_check))
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .with_state(state)
}

fn protected_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .merge(domains::profile_routes(state.clone()))
        .merge(domains::master_routes(state.clone()))
        .merge(domains::skill_routes(state.clone()))
        .merge(domains::certification_routes(state.clone()))
        .merge(domains::training_routes(state.clone()))
        .merge(domains::career_routes(state.clone()))
        .merge(domains::work_record_routes(state.clone()))
        .merge(domains::bulk_routes(state.clone()))
        .with_state(state)
}
