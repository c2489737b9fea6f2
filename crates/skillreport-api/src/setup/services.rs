//! Service initialization and application state setup

use crate::auth::JwtService;
use crate::services::bulk::{spawn_sweeper, BulkUploadService, ValidationStore};
use crate::state::{AppState, BulkState, DbState, EmployeeState};
use anyhow::Result;
use skillreport_core::{Config, WorkRecordStore};
use skillreport_db::WorkRecordRepository;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

/// Initialize repositories and services, returning the application state.
///
/// Also starts the background sweeper that evicts expired validation runs.
pub async fn initialize_services(config: &Config, pool: PgPool) -> Result<Arc<AppState>> {
    let ttl = Duration::from_secs(config.bulk().validation_ttl_secs);
    let store = Arc::new(ValidationStore::new(ttl));
    let _sweeper = spawn_sweeper(store.clone());
    tracing::info!(ttl_secs = ttl.as_secs(), "Validation store sweeper started");

    let records: Arc<dyn WorkRecordStore> = Arc::new(WorkRecordRepository::new(pool.clone()));
    let state = build_app_state(config, pool, store, records);

    tracing::info!(
        is_production = state.is_production,
        "Application services initialized"
    );
    Ok(state)
}

/// Assemble [`AppState`] from its parts.
///
/// `records` is the sink bulk execution writes to; integration tests pass an
/// in-memory store here.
pub fn build_app_state(
    config: &Config,
    pool: PgPool,
    store: Arc<ValidationStore>,
    records: Arc<dyn WorkRecordStore>,
) -> Arc<AppState> {
    let bulk_service = BulkUploadService::new(store, records, config.bulk().clone());

    Arc::new(AppState {
        db: DbState { pool: pool.clone() },
        employees: EmployeeState::new(&pool),
        bulk: BulkState {
            service: Arc::new(bulk_service),
        },
        jwt: JwtService::new(config.jwt_secret(), config.jwt_expiry_hours()),
        is_production: config.is_production(),
    })
}
