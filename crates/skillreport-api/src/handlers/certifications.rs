//! Certification handlers

use axum::{
    extract::State,
    response::IntoResponse,
};
use skillreport_core::models::{Certification, CertificationRequest};
use std::sync::Arc;
use uuid::Uuid;

use super::{not_found, target_employee, DeletedResponse, TargetUserQuery};
use crate::auth::AuthContext;
use crate::error::{ApiPath, ApiQuery, ApiResponse, ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

const RESOURCE: &str = "資格";

#[utoipa::path(
    get,
    path = "/api/certifications",
    params(TargetUserQuery),
    responses(
        (status = 200, description = "Certifications, newest first", body = Vec<Certification>),
        (status = 403, description = "Not allowed", body = ErrorResponse)
    ),
    tag = "certifications",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(user_id = %ctx.user_id))]
pub async fn list_certifications(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ApiQuery(query): ApiQuery<TargetUserQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let employee_id = target_employee(&state, &ctx, query.user_id).await?;
    ctx.ensure_can_read(employee_id)?;
    let certifications = state
        .employees
        .certifications
        .list_by_employee(employee_id)
        .await?;
    Ok(ApiResponse::ok(certifications))
}

#[utoipa::path(
    get,
    path = "/api/certifications/{id}",
    params(("id" = Uuid, Path, description = "Certification ID")),
    responses(
        (status = 200, description = "Certification", body = Certification),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "certifications",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(user_id = %ctx.user_id))]
pub async fn get_certification(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let certification = state
        .employees
        .certifications
        .get(id)
        .await?
        .ok_or_else(|| not_found(RESOURCE))?;
    ctx.ensure_can_read(certification.employee_id)?;
    Ok(ApiResponse::ok(certification))
}

#[utoipa::path(
    post,
    path = "/api/certifications",
    params(TargetUserQuery),
    request_body = CertificationRequest,
    responses(
        (status = 201, description = "Certification created", body = Certification),
        (status = 400, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "certifications",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx, request), fields(user_id = %ctx.user_id))]
pub async fn create_certification(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ApiQuery(query): ApiQuery<TargetUserQuery>,
    ValidatedJson(request): ValidatedJson<CertificationRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.check_dates()?;
    let employee_id = target_employee(&state, &ctx, query.user_id).await?;
    ctx.ensure_can_write(employee_id)?;
    let certification = state
        .employees
        .certifications
        .create(employee_id, &request)
        .await?;
    tracing::info!(certification_id = %certification.id, "Certification created");
    Ok(ApiResponse::created(certification))
}

#[utoipa::path(
    put,
    path = "/api/certifications/{id}",
    params(("id" = Uuid, Path, description = "Certification ID")),
    request_body = CertificationRequest,
    responses(
        (status = 200, description = "Certification updated", body = Certification),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "certifications",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx, request), fields(user_id = %ctx.user_id))]
pub async fn update_certification(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(request): ValidatedJson<CertificationRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.check_dates()?;
    let existing = state
        .employees
        .certifications
        .get(id)
        .await?
        .ok_or_else(|| not_found(RESOURCE))?;
    ctx.ensure_can_write(existing.employee_id)?;

    let certification = state
        .employees
        .certifications
        .update(id, &request)
        .await?
        .ok_or_else(|| not_found(RESOURCE))?;
    Ok(ApiResponse::ok(certification))
}

#[utoipa::path(
    delete,
    path = "/api/certifications/{id}",
    params(("id" = Uuid, Path, description = "Certification ID")),
    responses(
        (status = 200, description = "Certification deleted", body = DeletedResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "certifications",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(user_id = %ctx.user_id))]
pub async fn delete_certification(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let existing = state
        .employees
        .certifications
        .get(id)
        .await?
        .ok_or_else(|| not_found(RESOURCE))?;
    ctx.ensure_can_write(existing.employee_id)?;

    if !state.employees.certifications.delete(id).await? {
        return Err(not_found(RESOURCE).into());
    }
    Ok(ApiResponse::ok(DeletedResponse { id }))
}
