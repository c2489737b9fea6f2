//! Employee profile handlers

use axum::{
    extract::State,
    response::IntoResponse,
};
use skillreport_core::models::{Profile, UpdateProfileRequest};
use skillreport_core::AppError;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::AuthContext;
use crate::error::{ApiPath, ApiResponse, ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

fn user_not_found() -> AppError {
    AppError::UserNotFound("ユーザーが見つかりません".to_string())
}

/// Get the caller's profile
#[utoipa::path(
    get,
    path = "/api/profiles/me",
    responses(
        (status = 200, description = "Caller's profile", body = Profile),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "No employee record", body = ErrorResponse)
    ),
    tag = "profiles",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(user_id = %ctx.user_id))]
pub async fn get_my_profile(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
) -> Result<impl IntoResponse, HttpAppError> {
    let profile = state
        .employees
        .profiles
        .get_by_user_id(ctx.user_id)
        .await?
        .ok_or_else(user_not_found)?;
    Ok(ApiResponse::ok(profile))
}

/// Update the caller's profile
#[utoipa::path(
    put,
    path = "/api/profiles/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = Profile),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse)
    ),
    tag = "profiles",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx, request), fields(user_id = %ctx.user_id))]
pub async fn update_my_profile(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let profile = state
        .employees
        .profiles
        .update_by_user_id(ctx.user_id, &request.normalized())
        .await?
        .ok_or_else(user_not_found)?;
    tracing::info!(employee_id = %profile.id, "Profile updated");
    Ok(ApiResponse::ok(profile))
}

/// Get another user's profile (self, managers and admins)
#[utoipa::path(
    get,
    path = "/api/profiles/{user_id}",
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Profile", body = Profile),
        (status = 403, description = "Not allowed", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "profiles",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(caller = %ctx.user_id))]
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let profile = state
        .employees
        .profiles
        .get_by_user_id(user_id)
        .await?
        .ok_or_else(user_not_found)?;
    ctx.ensure_can_read(profile.id)?;
    Ok(ApiResponse::ok(profile))
}

/// Update another user's profile (self and admins)
#[utoipa::path(
    put,
    path = "/api/profiles/{user_id}",
    params(("user_id" = Uuid, Path, description = "User ID")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = Profile),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 403, description = "Not allowed", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse)
    ),
    tag = "profiles",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx, request), fields(caller = %ctx.user_id))]
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ApiPath(user_id): ApiPath<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let employee_id = state
        .employees
        .profiles
        .employee_id_for_user(user_id)
        .await?
        .ok_or_else(user_not_found)?;
    ctx.ensure_can_write(employee_id)?;

    let profile = state
        .employees
        .profiles
        .update_by_user_id(user_id, &request.normalized())
        .await?
        .ok_or_else(user_not_found)?;
    tracing::info!(employee_id = %profile.id, "Profile updated");
    Ok(ApiResponse::ok(profile))
}
