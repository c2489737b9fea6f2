use skillreport_core::{
    models::{Department, Position, SkillCategory},
    AppError,
};
use sqlx::{PgPool, Postgres};

/// Read-only access to seeded master data
#[derive(Clone)]
pub struct MasterRepository {
    pool: PgPool,
}

impl MasterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "departments", db.operation = "select"))]
    pub async fn list_departments(&self) -> Result<Vec<Department>, AppError> {
        let rows = sqlx::query_as::<Postgres, Department>(
            "SELECT id, code, name, sort_order FROM departments ORDER BY sort_order, name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    #[tracing::instrument(skip(self), fields(db.table = "positions", db.operation = "select"))]
    pub async fn list_positions(&self) -> Result<Vec<Position>, AppError> {
        let rows = sqlx::query_as::<Postgres, Position>(
            "SELECT id, code, name, sort_order FROM positions ORDER BY sort_order, name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    #[tracing::instrument(skip(self), fields(db.table = "skill_categories", db.operation = "select"))]
    pub async fn list_skill_categories(&self) -> Result<Vec<SkillCategory>, AppError> {
        let rows = sqlx::query_as::<Postgres, SkillCategory>(
            "SELECT id, code, name, sort_order FROM skill_categories ORDER BY sort_order, name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
