use skillreport_core::{
    models::{Certification, CertificationRequest},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

const CERTIFICATION_COLUMNS: &str = "id, employee_id, name, issuer, acquired_date, expiry_date, credential_id, score, created_at, updated_at";

/// Repository for certifications
#[derive(Clone)]
pub struct CertificationRepository {
    pool: PgPool,
}

impl CertificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "certifications", db.operation = "select"))]
    pub async fn list_by_employee(&self, employee_id: Uuid) -> Result<Vec<Certification>, AppError> {
        let rows = sqlx::query_as::<Postgres, Certification>(&format!(
            "SELECT {CERTIFICATION_COLUMNS} FROM certifications WHERE employee_id = $1 ORDER BY acquired_date DESC"
        ))
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    #[tracing::instrument(skip(self), fields(db.table = "certifications", db.operation = "select", db.record_id = %id))]
    pub async fn get(&self, id: Uuid) -> Result<Option<Certification>, AppError> {
        let row = sqlx::query_as::<Postgres, Certification>(&format!(
            "SELECT {CERTIFICATION_COLUMNS} FROM certifications WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    #[tracing::instrument(skip(self, request), fields(db.table = "certifications", db.operation = "insert"))]
    pub async fn create(
        &self,
        employee_id: Uuid,
        request: &CertificationRequest,
    ) -> Result<Certification, AppError> {
        let row = sqlx::query_as::<Postgres, Certification>(&format!(
            r#"
            INSERT INTO certifications
                (employee_id, name, issuer, acquired_date, expiry_date, credential_id, score)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {CERTIFICATION_COLUMNS}
            "#
        ))
        .bind(employee_id)
        .bind(request.name.trim())
        .bind(request.issuer.trim())
        .bind(request.acquired_date)
        .bind(request.expiry_date)
        .bind(&request.credential_id)
        .bind(request.score)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    #[tracing::instrument(skip(self, request), fields(db.table = "certifications", db.operation = "update", db.record_id = %id))]
    pub async fn update(
        &self,
        id: Uuid,
        request: &CertificationRequest,
    ) -> Result<Option<Certification>, AppError> {
        let row = sqlx::query_as::<Postgres, Certification>(&format!(
            r#"
            UPDATE certifications
            SET name = $2, issuer = $3, acquired_date = $4, expiry_date = $5,
                credential_id = $6, score = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING {CERTIFICATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.name.trim())
        .bind(request.issuer.trim())
        .bind(request.acquired_date)
        .bind(request.expiry_date)
        .bind(&request.credential_id)
        .bind(request.score)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    #[tracing::instrument(skip(self), fields(db.table = "certifications", db.operation = "delete", db.record_id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM certifications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
