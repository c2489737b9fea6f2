//! Training history handlers

use axum::{
    extract::State,
    response::IntoResponse,
};
use skillreport_core::models::{TrainingHistory, TrainingRequest};
use std::sync::Arc;
use uuid::Uuid;

use super::{not_found, target_employee, DeletedResponse, TargetUserQuery};
use crate::auth::AuthContext;
use crate::error::{ApiPath, ApiQuery, ApiResponse, ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

const RESOURCE: &str = "研修履歴";

#[utoipa::path(
    get,
    path = "/api/trainings",
    params(TargetUserQuery),
    responses(
        (status = 200, description = "Training history, newest first", body = Vec<TrainingHistory>),
        (status = 403, description = "Not allowed", body = ErrorResponse)
    ),
    tag = "trainings",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(user_id = %ctx.user_id))]
pub async fn list_trainings(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ApiQuery(query): ApiQuery<TargetUserQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let employee_id = target_employee(&state, &ctx, query.user_id).await?;
    ctx.ensure_can_read(employee_id)?;
    let trainings = state
        .employees
        .trainings
        .list_by_employee(employee_id)
        .await?;
    Ok(ApiResponse::ok(trainings))
}

#[utoipa::path(
    get,
    path = "/api/trainings/{id}",
    params(("id" = Uuid, Path, description = "Training history ID")),
    responses(
        (status = 200, description = "Training history entry", body = TrainingHistory),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "trainings",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(user_id = %ctx.user_id))]
pub async fn get_training(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let training = state
        .employees
        .trainings
        .get(id)
        .await?
        .ok_or_else(|| not_found(RESOURCE))?;
    ctx.ensure_can_read(training.employee_id)?;
    Ok(ApiResponse::ok(training))
}

#[utoipa::path(
    post,
    path = "/api/trainings",
    params(TargetUserQuery),
    request_body = TrainingRequest,
    responses(
        (status = 201, description = "Training created", body = TrainingHistory),
        (status = 400, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "trainings",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx, request), fields(user_id = %ctx.user_id))]
pub async fn create_training(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ApiQuery(query): ApiQuery<TargetUserQuery>,
    ValidatedJson(request): ValidatedJson<TrainingRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.check_dates()?;
    let employee_id = target_employee(&state, &ctx, query.user_id).await?;
    ctx.ensure_can_write(employee_id)?;
    let training = state
        .employees
        .trainings
        .create(employee_id, &request)
        .await?;
    tracing::info!(training_id = %training.id, "Training created");
    Ok(ApiResponse::created(training))
}

#[utoipa::path(
    put,
    path = "/api/trainings/{id}",
    params(("id" = Uuid, Path, description = "Training history ID")),
    request_body = TrainingRequest,
    responses(
        (status = 200, description = "Training updated", body = TrainingHistory),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "trainings",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx, request), fields(user_id = %ctx.user_id))]
pub async fn update_training(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(request): ValidatedJson<TrainingRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.check_dates()?;
    let existing = state
        .employees
        .trainings
        .get(id)
        .await?
        .ok_or_else(|| not_found(RESOURCE))?;
    ctx.ensure_can_write(existing.employee_id)?;

    let training = state
        .employees
        .trainings
        .update(id, &request)
        .await?
        .ok_or_else(|| not_found(RESOURCE))?;
    Ok(ApiResponse::ok(training))
}

#[utoipa::path(
    delete,
    path = "/api/trainings/{id}",
    params(("id" = Uuid, Path, description = "Training history ID")),
    responses(
        (status = 200, description = "Training deleted", body = DeletedResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "trainings",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(user_id = %ctx.user_id))]
pub async fn delete_training(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let existing = state
        .employees
        .trainings
        .get(id)
        .await?
        .ok_or_else(|| not_found(RESOURCE))?;
    ctx.ensure_can_write(existing.employee_id)?;

    if !state.employees.trainings.delete(id).await? {
        return Err(not_found(RESOURCE).into());
    }
    Ok(ApiResponse::ok(DeletedResponse { id }))
}
