use crate::auth::jwt::JwtService;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use skillreport_core::AppError;
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: JwtService,
}

/// Require a valid `Authorization: Bearer <jwt>` header and attach [`AuthContext`](crate::auth::AuthContext)
pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => {
            tracing::debug!("Missing authorization header");
            return HttpAppError(AppError::Unauthorized("認証が必要です".to_string()))
                .into_response();
        }
    };

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        tracing::debug!("Invalid authorization header format");
        return HttpAppError(AppError::Unauthorized(
            "Authorizationヘッダーの形式が正しくありません".to_string(),
        ))
        .into_response();
    };

    let Some(context) = auth_state.jwt.verify_token(token.trim()).context() else {
        return HttpAppError(AppError::InvalidToken(
            "トークンが無効または期限切れです".to_string(),
        ))
        .into_response();
    };

    tracing::debug!(user_id = %context.user_id, employee_id = %context.employee_id, "Authenticated request");
    request.extensions_mut().insert(context);
    next.run(request).await
}
