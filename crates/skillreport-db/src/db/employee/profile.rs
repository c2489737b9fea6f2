use skillreport_core::{
    models::{Profile, UpdateProfileRequest},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::db::errors::map_constraint_error;
use crate::db::transaction::TransactionGuard;

const PROFILE_SELECT: &str = r#"
    SELECT e.id, e.user_id, e.employee_number, e.last_name, e.first_name,
           e.last_name_kana, e.first_name_kana, e.email, e.phone,
           e.department_id, d.name AS department_name,
           e.position_id, p.name AS position_name,
           e.hire_date, e.bio, e.role, e.created_at, e.updated_at
    FROM employees e
    LEFT JOIN departments d ON d.id = e.department_id
    LEFT JOIN positions p ON p.id = e.position_id
"#;

/// Repository for employee profiles
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a profile by the authenticated user's id
    #[tracing::instrument(skip(self), fields(db.table = "employees", db.operation = "select", user_id = %user_id))]
    pub async fn get_by_user_id(&self, user_id: Uuid) -> Result<Option<Profile>, AppError> {
        let profile =
            sqlx::query_as::<Postgres, Profile>(&format!("{PROFILE_SELECT} WHERE e.user_id = $1"))
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(profile)
    }

    /// Resolve the employee id that belongs to a user
    #[tracing::instrument(skip(self), fields(db.table = "employees", db.operation = "select", user_id = %user_id))]
    pub async fn employee_id_for_user(&self, user_id: Uuid) -> Result<Option<Uuid>, AppError> {
        let id = sqlx::query_scalar::<Postgres, Uuid>("SELECT id FROM employees WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(id)
    }

    /// Replace the editable profile fields of a user.
    ///
    /// Department and position must exist and the email must not belong to another
    /// employee. Returns `None` when the user has no employee record.
    #[tracing::instrument(skip(self, request), fields(db.table = "employees", db.operation = "update", user_id = %user_id))]
    pub async fn update_by_user_id(
        &self,
        user_id: Uuid,
        request: &UpdateProfileRequest,
    ) -> Result<Option<Profile>, AppError> {
        let mut tx = TransactionGuard::begin(&self.pool).await?;

        if let Some(department_id) = request.department_id {
            let exists = sqlx::query_scalar::<Postgres, bool>(
                "SELECT EXISTS(SELECT 1 FROM departments WHERE id = $1)",
            )
            .bind(department_id)
            .fetch_one(&mut **tx)
            .await?;
            if !exists {
                return Err(AppError::invalid_field(
                    "department_id",
                    "指定された部署が存在しません",
                ));
            }
        }

        if let Some(position_id) = request.position_id {
            let exists = sqlx::query_scalar::<Postgres, bool>(
                "SELECT EXISTS(SELECT 1 FROM positions WHERE id = $1)",
            )
            .bind(position_id)
            .fetch_one(&mut **tx)
            .await?;
            if !exists {
                return Err(AppError::invalid_field(
                    "position_id",
                    "指定された役職が存在しません",
                ));
            }
        }

        let email_taken = sqlx::query_scalar::<Postgres, bool>(
            "SELECT EXISTS(SELECT 1 FROM employees WHERE lower(email) = lower($1) AND user_id <> $2)",
        )
        .bind(&request.email)
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await?;
        if email_taken {
            return Err(AppError::EmailAlreadyExists(
                "このメールアドレスは既に使用されています".to_string(),
            ));
        }

        let updated = sqlx::query_scalar::<Postgres, Uuid>(
            r#"
            UPDATE employees
            SET last_name = $2, first_name = $3, last_name_kana = $4, first_name_kana = $5,
                email = $6, phone = $7, department_id = $8, position_id = $9,
                hire_date = $10, bio = $11, updated_at = NOW()
            WHERE user_id = $1
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(&request.last_name)
        .bind(&request.first_name)
        .bind(&request.last_name_kana)
        .bind(&request.first_name_kana)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(request.department_id)
        .bind(request.position_id)
        .bind(request.hire_date)
        .bind(&request.bio)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| {
            map_constraint_error(
                e,
                || AppError::EmailAlreadyExists("このメールアドレスは既に使用されています".to_string()),
                || AppError::InvalidParameter("部署または役職が存在しません".to_string()),
            )
        })?;

        if updated.is_none() {
            return Ok(None);
        }

        tx.commit().await?;
        self.get_by_user_id(user_id).await
    }
}
