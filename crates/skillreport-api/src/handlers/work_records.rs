//! Work record (project history) handlers

use axum::{
    extract::State,
    response::IntoResponse,
};
use skillreport_core::models::{NewWorkRecord, WorkRecord};
use std::sync::Arc;
use uuid::Uuid;

use super::{not_found, target_employee, DeletedResponse, TargetUserQuery};
use crate::auth::AuthContext;
use crate::error::{ApiPath, ApiQuery, ApiResponse, ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

const RESOURCE: &str = "業務経歴";

#[utoipa::path(
    get,
    path = "/api/work",
    params(TargetUserQuery),
    responses(
        (status = 200, description = "Work records, most recent project first", body = Vec<WorkRecord>),
        (status = 403, description = "Not allowed", body = ErrorResponse)
    ),
    tag = "work",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(user_id = %ctx.user_id))]
pub async fn list_work_records(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ApiQuery(query): ApiQuery<TargetUserQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let employee_id = target_employee(&state, &ctx, query.user_id).await?;
    ctx.ensure_can_read(employee_id)?;
    let work_records = state
        .employees
        .work_records
        .list_by_employee(employee_id)
        .await?;
    Ok(ApiResponse::ok(work_records))
}

#[utoipa::path(
    get,
    path = "/api/work/{id}",
    params(("id" = Uuid, Path, description = "Work record ID")),
    responses(
        (status = 200, description = "Work record", body = WorkRecord),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "work",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(user_id = %ctx.user_id))]
pub async fn get_work_record(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let record = state
        .employees
        .work_records
        .get(id)
        .await?
        .ok_or_else(|| not_found(RESOURCE))?;
    ctx.ensure_can_read(record.employee_id)?;
    Ok(ApiResponse::ok(record))
}

#[utoipa::path(
    post,
    path = "/api/work",
    params(TargetUserQuery),
    request_body = NewWorkRecord,
    responses(
        (status = 201, description = "Work record created", body = WorkRecord),
        (status = 400, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "work",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx, request), fields(user_id = %ctx.user_id))]
pub async fn create_work_record(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ApiQuery(query): ApiQuery<TargetUserQuery>,
    ValidatedJson(request): ValidatedJson<NewWorkRecord>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.check_dates()?;
    let employee_id = target_employee(&state, &ctx, query.user_id).await?;
    ctx.ensure_can_write(employee_id)?;
    let record = state
        .employees
        .work_records
        .create(employee_id, &request)
        .await?;
    tracing::info!(work_record_id = %record.id, "Work record created");
    Ok(ApiResponse::created(record))
}

#[utoipa::path(
    put,
    path = "/api/work/{id}",
    params(("id" = Uuid, Path, description = "Work record ID")),
    request_body = NewWorkRecord,
    responses(
        (status = 200, description = "Work record updated", body = WorkRecord),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "work",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx, request), fields(user_id = %ctx.user_id))]
pub async fn update_work_record(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(request): ValidatedJson<NewWorkRecord>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.check_dates()?;
    let existing = state
        .employees
        .work_records
        .get(id)
        .await?
        .ok_or_else(|| not_found(RESOURCE))?;
    ctx.ensure_can_write(existing.employee_id)?;

    let record = state
        .employees
        .work_records
        .update(id, &request)
        .await?
        .ok_or_else(|| not_found(RESOURCE))?;
    Ok(ApiResponse::ok(record))
}

#[utoipa::path(
    delete,
    path = "/api/work/{id}",
    params(("id" = Uuid, Path, description = "Work record ID")),
    responses(
        (status = 200, description = "Work record deleted", body = DeletedResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "work",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(user_id = %ctx.user_id))]
pub async fn delete_work_record(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let existing = state
        .employees
        .work_records
        .get(id)
        .await?
        .ok_or_else(|| not_found(RESOURCE))?;
    ctx.ensure_can_write(existing.employee_id)?;

    if !state.employees.work_records.delete(id).await? {
        return Err(not_found(RESOURCE).into());
    }
    Ok(ApiResponse::ok(DeletedResponse { id }))
}
