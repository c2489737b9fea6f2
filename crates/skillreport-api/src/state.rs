//! Application state shared by every handler as `State<Arc<AppState>>`.

use crate::auth::JwtService;
use crate::services::bulk::BulkUploadService;
use skillreport_db::{
    CareerRepository, CertificationRepository, MasterRepository, ProfileRepository,
    SkillRepository, TrainingRepository, WorkRecordRepository,
};
use sqlx::PgPool;
use std::sync::Arc;

// ----- Sub-state types -----

/// Database pool, used directly by the readiness check
#[derive(Clone)]
pub struct DbState {
    pub pool: PgPool,
}

/// Repositories for employee-owned data and master data
#[derive(Clone)]
pub struct EmployeeState {
    pub profiles: ProfileRepository,
    pub skills: SkillRepository,
    pub certifications: CertificationRepository,
    pub trainings: TrainingRepository,
    pub careers: CareerRepository,
    pub work_records: WorkRecordRepository,
    pub master: MasterRepository,
}

impl EmployeeState {
    pub fn new(pool: &PgPool) -> Self {
        Self {
            profiles: ProfileRepository::new(pool.clone()),
            skills: SkillRepository::new(pool.clone()),
            certifications: CertificationRepository::new(pool.clone()),
            trainings: TrainingRepository::new(pool.clone()),
            careers: CareerRepository::new(pool.clone()),
            work_records: WorkRecordRepository::new(pool.clone()),
            master: MasterRepository::new(pool.clone()),
        }
    }
}

/// Bulk work-record upload pipeline
#[derive(Clone)]
pub struct BulkState {
    pub service: Arc<BulkUploadService>,
}

// ----- AppState -----

/// Main application state: aggregates sub-states for dependency injection.
#[derive(Clone)]
pub struct AppState {
    pub db: DbState,
    pub employees: EmployeeState,
    pub bulk: BulkState,
    pub jwt: JwtService,
    pub is_production: bool,
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
