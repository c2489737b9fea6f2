use async_trait::async_trait;
use skillreport_core::{
    models::{NewWorkRecord, WorkRecord},
    AppError, WorkRecordStore,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

const WORK_RECORD_COLUMNS: &str = r#"id, employee_id, project_name, project_code, client_name, role_title,
    start_date, end_date, participation_rate, team_size, status, technologies,
    responsibilities, achievements, description, created_at, updated_at"#;

/// Repository for work records (`project_records` table)
#[derive(Clone)]
pub struct WorkRecordRepository {
    pool: PgPool,
}

impl WorkRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "project_records", db.operation = "select"))]
    pub async fn list_by_employee(&self, employee_id: Uuid) -> Result<Vec<WorkRecord>, AppError> {
        let rows = sqlx::query_as::<Postgres, WorkRecord>(&format!(
            "SELECT {WORK_RECORD_COLUMNS} FROM project_records WHERE employee_id = $1 ORDER BY start_date DESC, created_at DESC"
        ))
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    #[tracing::instrument(skip(self), fields(db.table = "project_records", db.operation = "select", db.record_id = %id))]
    pub async fn get(&self, id: Uuid) -> Result<Option<WorkRecord>, AppError> {
        let row = sqlx::query_as::<Postgres, WorkRecord>(&format!(
            "SELECT {WORK_RECORD_COLUMNS} FROM project_records WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    #[tracing::instrument(skip(self, record), fields(db.table = "project_records", db.operation = "insert", project_code = %record.project_code))]
    pub async fn create(
        &self,
        employee_id: Uuid,
        record: &NewWorkRecord,
    ) -> Result<WorkRecord, AppError> {
        let row = sqlx::query_as::<Postgres, WorkRecord>(&format!(
            r#"
            INSERT INTO project_records
                (employee_id, project_name, project_code, client_name, role_title, start_date,
                 end_date, participation_rate, team_size, status, technologies,
                 responsibilities, achievements, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {WORK_RECORD_COLUMNS}
            "#
        ))
        .bind(employee_id)
        .bind(&record.project_name)
        .bind(&record.project_code)
        .bind(&record.client_name)
        .bind(&record.role_title)
        .bind(record.start_date)
        .bind(record.end_date)
        .bind(record.participation_rate)
        .bind(record.team_size)
        .bind(record.status)
        .bind(&record.technologies)
        .bind(&record.responsibilities)
        .bind(&record.achievements)
        .bind(&record.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    #[tracing::instrument(skip(self, record), fields(db.table = "project_records", db.operation = "update", db.record_id = %id))]
    pub async fn update(
        &self,
        id: Uuid,
        record: &NewWorkRecord,
    ) -> Result<Option<WorkRecord>, AppError> {
        let row = sqlx::query_as::<Postgres, WorkRecord>(&format!(
            r#"
            UPDATE project_records
            SET project_name = $2, project_code = $3, client_name = $4, role_title = $5,
                start_date = $6, end_date = $7, participation_rate = $8, team_size = $9,
                status = $10, technologies = $11, responsibilities = $12,
                achievements = $13, description = $14, updated_at = NOW()
            WHERE id = $1
            RETURNING {WORK_RECORD_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&record.project_name)
        .bind(&record.project_code)
        .bind(&record.client_name)
        .bind(&record.role_title)
        .bind(record.start_date)
        .bind(record.end_date)
        .bind(record.participation_rate)
        .bind(record.team_size)
        .bind(record.status)
        .bind(&record.technologies)
        .bind(&record.responsibilities)
        .bind(&record.achievements)
        .bind(&record.description)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    #[tracing::instrument(skip(self), fields(db.table = "project_records", db.operation = "delete", db.record_id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM project_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl WorkRecordStore for WorkRecordRepository {
    async fn create_work_record(
        &self,
        employee_id: Uuid,
        record: &NewWorkRecord,
    ) -> Result<WorkRecord, AppError> {
        self.create(employee_id, record).await
    }
}
