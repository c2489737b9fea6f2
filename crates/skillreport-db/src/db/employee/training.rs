use skillreport_core::{
    models::{TrainingHistory, TrainingRequest},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

const TRAINING_COLUMNS: &str = "id, employee_id, training_name, provider, start_date, end_date, hours, status, certificate_obtained, notes, created_at, updated_at";

/// Repository for training history
#[derive(Clone)]
pub struct TrainingRepository {
    pool: PgPool,
}

impl TrainingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "training_histories", db.operation = "select"))]
    pub async fn list_by_employee(
        &self,
        employee_id: Uuid,
    ) -> Result<Vec<TrainingHistory>, AppError> {
        let rows = sqlx::query_as::<Postgres, TrainingHistory>(&format!(
            "SELECT {TRAINING_COLUMNS} FROM training_histories WHERE employee_id = $1 ORDER BY start_date DESC"
        ))
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    #[tracing::instrument(skip(self), fields(db.table = "training_histories", db.operation = "select", db.record_id = %id))]
    pub async fn get(&self, id: Uuid) -> Result<Option<TrainingHistory>, AppError> {
        let row = sqlx::query_as::<Postgres, TrainingHistory>(&format!(
            "SELECT {TRAINING_COLUMNS} FROM training_histories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    #[tracing::instrument(skip(self, request), fields(db.table = "training_histories", db.operation = "insert"))]
    pub async fn create(
        &self,
        employee_id: Uuid,
        request: &TrainingRequest,
    ) -> Result<TrainingHistory, AppError> {
        let row = sqlx::query_as::<Postgres, TrainingHistory>(&format!(
            r#"
            INSERT INTO training_histories
                (employee_id, training_name, provider, start_date, end_date, hours, status, certificate_obtained, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {TRAINING_COLUMNS}
            "#
        ))
        .bind(employee_id)
        .bind(request.training_name.trim())
        .bind(&request.provider)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.hours)
        .bind(request.status)
        .bind(request.certificate_obtained)
        .bind(&request.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    #[tracing::instrument(skip(self, request), fields(db.table = "training_histories", db.operation = "update", db.record_id = %id))]
    pub async fn update(
        &self,
        id: Uuid,
        request: &TrainingRequest,
    ) -> Result<Option<TrainingHistory>, AppError> {
        let row = sqlx::query_as::<Postgres, TrainingHistory>(&format!(
            r#"
            UPDATE training_histories
            SET training_name = $2, provider = $3, start_date = $4, end_date = $5, hours = $6,
                status = $7, certificate_obtained = $8, notes = $9, updated_at = NOW()
            WHERE id = $1
            RETURNING {TRAINING_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.training_name.trim())
        .bind(&request.provider)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.hours)
        .bind(request.status)
        .bind(request.certificate_obtained)
        .bind(&request.notes)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    #[tracing::instrument(skip(self), fields(db.table = "training_histories", db.operation = "delete", db.record_id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM training_histories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
