use skillreport_core::{
    models::{ActionPlan, ActionPlanRequest, CareerGoal, CareerGoalRequest},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

const GOAL_COLUMNS: &str = "id, employee_id, title, description, target_date, status, priority, progress, created_at, updated_at";
const PLAN_COLUMNS: &str = "id, goal_id, title, due_date, completed, completed_at, created_at, updated_at";

/// Repository for career goals and their action plans
#[derive(Clone)]
pub struct CareerRepository {
    pool: PgPool,
}

impl CareerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "career_goals", db.operation = "select"))]
    pub async fn list_goals(&self, employee_id: Uuid) -> Result<Vec<CareerGoal>, AppError> {
        let rows = sqlx::query_as::<Postgres, CareerGoal>(&format!(
            "SELECT {GOAL_COLUMNS} FROM career_goals WHERE employee_id = $1 ORDER BY priority, target_date NULLS LAST, created_at"
        ))
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    #[tracing::instrument(skip(self), fields(db.table = "career_goals", db.operation = "select", db.record_id = %id))]
    pub async fn get_goal(&self, id: Uuid) -> Result<Option<CareerGoal>, AppError> {
        let row = sqlx::query_as::<Postgres, CareerGoal>(&format!(
            "SELECT {GOAL_COLUMNS} FROM career_goals WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    #[tracing::instrument(skip(self, request), fields(db.table = "career_goals", db.operation = "insert"))]
    pub async fn create_goal(
        &self,
        employee_id: Uuid,
        request: &CareerGoalRequest,
    ) -> Result<CareerGoal, AppError> {
        let row = sqlx::query_as::<Postgres, CareerGoal>(&format!(
            r#"
            INSERT INTO career_goals (employee_id, title, description, target_date, status, priority, progress)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {GOAL_COLUMNS}
            "#
        ))
        .bind(employee_id)
        .bind(request.title.trim())
        .bind(&request.description)
        .bind(request.target_date)
        .bind(request.status)
        .bind(request.priority)
        .bind(request.progress)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    #[tracing::instrument(skip(self, request), fields(db.table = "career_goals", db.operation = "update", db.record_id = %id))]
    pub async fn update_goal(
        &self,
        id: Uuid,
        request: &CareerGoalRequest,
    ) -> Result<Option<CareerGoal>, AppError> {
        let row = sqlx::query_as::<Postgres, CareerGoal>(&format!(
            r#"
            UPDATE career_goals
            SET title = $2, description = $3, target_date = $4, status = $5,
                priority = $6, progress = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING {GOAL_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.title.trim())
        .bind(&request.description)
        .bind(request.target_date)
        .bind(request.status)
        .bind(request.priority)
        .bind(request.progress)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Deletes the goal; its action plans go with it (ON DELETE CASCADE)
    #[tracing::instrument(skip(self), fields(db.table = "career_goals", db.operation = "delete", db.record_id = %id))]
    pub async fn delete_goal(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM career_goals WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), fields(db.table = "action_plans", db.operation = "select"))]
    pub async fn list_action_plans(&self, goal_id: Uuid) -> Result<Vec<ActionPlan>, AppError> {
        let rows = sqlx::query_as::<Postgres, ActionPlan>(&format!(
            "SELECT {PLAN_COLUMNS} FROM action_plans WHERE goal_id = $1 ORDER BY due_date NULLS LAST, created_at"
        ))
        .bind(goal_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    #[tracing::instrument(skip(self), fields(db.table = "action_plans", db.operation = "select", db.record_id = %id))]
    pub async fn get_action_plan(&self, id: Uuid) -> Result<Option<ActionPlan>, AppError> {
        let row = sqlx::query_as::<Postgres, ActionPlan>(&format!(
            "SELECT {PLAN_COLUMNS} FROM action_plans WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    #[tracing::instrument(skip(self, request), fields(db.table = "action_plans", db.operation = "insert"))]
    pub async fn create_action_plan(
        &self,
        goal_id: Uuid,
        request: &ActionPlanRequest,
    ) -> Result<ActionPlan, AppError> {
        let row = sqlx::query_as::<Postgres, ActionPlan>(&format!(
            r#"
            INSERT INTO action_plans (goal_id, title, due_date, completed, completed_at)
            VALUES ($1, $2, $3, $4, CASE WHEN $4 THEN NOW() ELSE NULL END)
            RETURNING {PLAN_COLUMNS}
            "#
        ))
        .bind(goal_id)
        .bind(request.title.trim())
        .bind(request.due_date)
        .bind(request.completed)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update a plan; `completed_at` is kept while it stays completed
    #[tracing::instrument(skip(self, request), fields(db.table = "action_plans", db.operation = "update", db.record_id = %id))]
    pub async fn update_action_plan(
        &self,
        id: Uuid,
        request: &ActionPlanRequest,
    ) -> Result<Option<ActionPlan>, AppError> {
        let row = sqlx::query_as::<Postgres, ActionPlan>(&format!(
            r#"
            UPDATE action_plans
            SET title = $2, due_date = $3, completed = $4,
                completed_at = CASE WHEN $4 THEN COALESCE(completed_at, NOW()) ELSE NULL END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PLAN_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.title.trim())
        .bind(request.due_date)
        .bind(request.completed)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    #[tracing::instrument(skip(self), fields(db.table = "action_plans", db.operation = "delete", db.record_id = %id))]
    pub async fn delete_action_plan(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM action_plans WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
