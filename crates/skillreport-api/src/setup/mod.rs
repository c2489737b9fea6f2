//! Application setup and initialization
//!
//! Everything `main` needs to go from a [`Config`] to a running router.

pub mod database;
pub mod routes;
pub mod server;
pub mod services;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use skillreport_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.log_format(), config.environment())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    validation::validate_config(&config).context("Configuration validation failed")?;
    tracing::info!("Configuration loaded and validated successfully");

    let pool = database::setup_database(&config).await?;
    let state = services::initialize_services(&config, pool).await?;
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
