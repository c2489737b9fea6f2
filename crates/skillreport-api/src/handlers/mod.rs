pub mod bulk;
pub mod career;
pub mod certifications;
pub mod master;
pub mod profiles;
pub mod skills;
pub mod trainings;
pub mod work_records;

use serde::Deserialize;
use skillreport_core::AppError;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::auth::AuthContext;
use crate::state::AppState;

/// `?user_id=` selects another employee's data; omitted means the caller
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct TargetUserQuery {
    pub user_id: Option<Uuid>,
}

/// Resolve the employee a request acts on
pub(crate) async fn target_employee(
    state: &AppState,
    ctx: &AuthContext,
    user_id: Option<Uuid>,
) -> Result<Uuid, AppError> {
    match user_id {
        None => Ok(ctx.employee_id),
        Some(user_id) if user_id == ctx.user_id => Ok(ctx.employee_id),
        Some(user_id) => state
            .employees
            .profiles
            .employee_id_for_user(user_id)
            .await?
            .ok_or_else(|| AppError::UserNotFound("ユーザーが見つかりません".to_string())),
    }
}

pub(crate) fn not_found(what: &str) -> AppError {
    AppError::NotFound(format!("{}が見つかりません", what))
}

/// Body of successful DELETE responses
#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct DeletedResponse {
    pub id: Uuid,
}
