use skillreport_core::{
    models::{SkillRecord, SkillRequest},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::db::errors::map_constraint_error;

// Joins the category name onto the rows produced by the `s` source
const SKILL_PROJECTION: &str = r#"
    SELECT s.id, s.employee_id, s.skill_name, s.category_id, c.name AS category_name,
           s.level, s.years_of_experience, s.last_used_date, s.notes,
           s.created_at, s.updated_at
    FROM s
    LEFT JOIN skill_categories c ON c.id = s.category_id
"#;

fn duplicate_skill() -> AppError {
    AppError::Conflict("同じ名前のスキルが既に登録されています".to_string())
}

fn unknown_category() -> AppError {
    AppError::invalid_field("category_id", "指定されたスキルカテゴリが存在しません")
}

/// Repository for employee skill records
#[derive(Clone)]
pub struct SkillRepository {
    pool: PgPool,
}

impl SkillRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "skill_records", db.operation = "select"))]
    pub async fn list_by_employee(&self, employee_id: Uuid) -> Result<Vec<SkillRecord>, AppError> {
        let skills = sqlx::query_as::<Postgres, SkillRecord>(&format!(
            "WITH s AS (SELECT * FROM skill_records WHERE employee_id = $1) {SKILL_PROJECTION} ORDER BY s.level DESC, s.skill_name"
        ))
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(skills)
    }

    #[tracing::instrument(skip(self), fields(db.table = "skill_records", db.operation = "select", db.record_id = %id))]
    pub async fn get(&self, id: Uuid) -> Result<Option<SkillRecord>, AppError> {
        let skill = sqlx::query_as::<Postgres, SkillRecord>(&format!(
            "WITH s AS (SELECT * FROM skill_records WHERE id = $1) {SKILL_PROJECTION}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(skill)
    }

    #[tracing::instrument(skip(self, request), fields(db.table = "skill_records", db.operation = "insert"))]
    pub async fn create(
        &self,
        employee_id: Uuid,
        request: &SkillRequest,
    ) -> Result<SkillRecord, AppError> {
        let skill = sqlx::query_as::<Postgres, SkillRecord>(&format!(
            r#"
            WITH s AS (
                INSERT INTO skill_records
                    (employee_id, skill_name, category_id, level, years_of_experience, last_used_date, notes)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
            )
            {SKILL_PROJECTION}
            "#
        ))
        .bind(employee_id)
        .bind(request.skill_name.trim())
        .bind(request.category_id)
        .bind(request.level)
        .bind(request.years_of_experience)
        .bind(request.last_used_date)
        .bind(&request.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_constraint_error(e, duplicate_skill, unknown_category))?;
        Ok(skill)
    }

    #[tracing::instrument(skip(self, request), fields(db.table = "skill_records", db.operation = "update", db.record_id = %id))]
    pub async fn update(
        &self,
        id: Uuid,
        request: &SkillRequest,
    ) -> Result<Option<SkillRecord>, AppError> {
        let skill = sqlx::query_as::<Postgres, SkillRecord>(&format!(
            r#"
            WITH s AS (
                UPDATE skill_records
                SET skill_name = $2, category_id = $3, level = $4, years_of_experience = $5,
                    last_used_date = $6, notes = $7, updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            {SKILL_PROJECTION}
            "#
        ))
        .bind(id)
        .bind(request.skill_name.trim())
        .bind(request.category_id)
        .bind(request.level)
        .bind(request.years_of_experience)
        .bind(request.last_used_date)
        .bind(&request.notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_constraint_error(e, duplicate_skill, unknown_category))?;
        Ok(skill)
    }

    /// Returns true if a row was deleted
    #[tracing::instrument(skip(self), fields(db.table = "skill_records", db.operation = "delete", db.record_id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM skill_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
