//! Persistence traits
//!
//! The bulk execution pipeline writes through this trait rather than a concrete
//! repository, so the database crate provides the implementation and tests can
//! substitute their own.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{NewWorkRecord, WorkRecord};

#[async_trait]
pub trait WorkRecordStore: Send + Sync {
    /// Persist one work record for the given employee
    async fn create_work_record(
        &self,
        employee_id: Uuid,
        record: &NewWorkRecord,
    ) -> Result<WorkRecord, AppError>;
}
