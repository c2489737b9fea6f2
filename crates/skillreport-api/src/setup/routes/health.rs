//! Health check handlers and response types.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Run an async check with timeout; returns "ready", "timeout", or "{prefix}: {error}".
async fn run_check<F, E>(timeout: Duration, f: F, error_prefix: &str) -> String
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(())) => "ready".to_string(),
        Ok(Err(e)) => format!("{}: {}", error_prefix, e),
        Err(_) => "timeout".to_string(),
    }
}

#[derive(serde::Serialize)]
pub(super) struct ReadinessResponse {
    pub status: &'static str,
    pub database: String,
    /// Validation runs currently awaiting execution
    pub pending_validations: usize,
}

/// Liveness check: process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness check: database reachable.
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let pool = state.db.pool.clone();
    let database = run_check(
        CHECK_TIMEOUT,
        async move { sqlx::query("SELECT 1").execute(&pool).await.map(drop) },
        "not_ready",
    )
    .await;

    let ready = database == "ready";
    if !ready {
        tracing::error!(database = %database, "Readiness check failed");
    }

    let response = ReadinessResponse {
        status: if ready { "ready" } else { "not_ready" },
        database,
        pending_validations: state.bulk.service.pending_validations().await,
    };

    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status_code, Json(response))
}
