use crate::error::HttpAppError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};
use skillreport_core::models::EmployeeRole;
use skillreport_core::AppError;
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: Uuid, // user_id
    pub employee_id: Uuid,
    pub role: EmployeeRole,
    pub exp: i64, // expiration timestamp
    pub iat: i64, // issued at timestamp
}

/// Result of verifying a bearer token: `{success, user_id, employee_id}` plus the role
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthOutcome {
    pub success: bool,
    pub user_id: Option<Uuid>,
    pub employee_id: Option<Uuid>,
    pub role: Option<EmployeeRole>,
}

impl AuthOutcome {
    pub fn failed() -> Self {
        Self {
            success: false,
            user_id: None,
            employee_id: None,
            role: None,
        }
    }

    /// The authenticated caller; `None` unless verification succeeded
    pub fn context(&self) -> Option<AuthContext> {
        if !self.success {
            return None;
        }
        Some(AuthContext {
            user_id: self.user_id?,
            employee_id: self.employee_id?,
            role: self.role?,
        })
    }
}

/// Authenticated caller, stored in request extensions by the auth middleware
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub employee_id: Uuid,
    pub role: EmployeeRole,
}

impl AuthContext {
    /// Self, admins and managers may read an employee's data
    pub fn ensure_can_read(&self, employee_id: Uuid) -> Result<(), AppError> {
        if self.employee_id == employee_id || self.role.can_read_others() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "他の社員の情報を参照する権限がありません".to_string(),
            ))
        }
    }

    /// Only self and admins may modify an employee's data
    pub fn ensure_can_write(&self, employee_id: Uuid) -> Result<(), AppError> {
        if self.employee_id == employee_id || self.role.can_write_others() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "他の社員の情報を変更する権限がありません".to_string(),
            ))
        }
    }
}

// Extract directly from request parts so it composes with Multipart
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| HttpAppError(AppError::Unauthorized("認証が必要です".to_string())))
    }
}
