//! Skill record handlers

use axum::{
    extract::State,
    response::IntoResponse,
};
use skillreport_core::models::{SkillRecord, SkillRequest};
use std::sync::Arc;
use uuid::Uuid;

use super::{not_found, target_employee, DeletedResponse, TargetUserQuery};
use crate::auth::AuthContext;
use crate::error::{ApiPath, ApiQuery, ApiResponse, ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

/// List skills of the caller, or of `user_id`
#[utoipa::path(
    get,
    path = "/api/skills",
    params(TargetUserQuery),
    responses(
        (status = 200, description = "Skills ordered by level", body = Vec<SkillRecord>),
        (status = 403, description = "Not allowed", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "skills",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(user_id = %ctx.user_id))]
pub async fn list_skills(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ApiQuery(query): ApiQuery<TargetUserQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let employee_id = target_employee(&state, &ctx, query.user_id).await?;
    ctx.ensure_can_read(employee_id)?;
    let skills = state.employees.skills.list_by_employee(employee_id).await?;
    Ok(ApiResponse::ok(skills))
}

#[utoipa::path(
    get,
    path = "/api/skills/{id}",
    params(("id" = Uuid, Path, description = "Skill record ID")),
    responses(
        (status = 200, description = "Skill record", body = SkillRecord),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "skills",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(user_id = %ctx.user_id))]
pub async fn get_skill(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let skill = state
        .employees
        .skills
        .get(id)
        .await?
        .ok_or_else(|| not_found("スキル"))?;
    ctx.ensure_can_read(skill.employee_id)?;
    Ok(ApiResponse::ok(skill))
}

#[utoipa::path(
    post,
    path = "/api/skills",
    params(TargetUserQuery),
    request_body = SkillRequest,
    responses(
        (status = 201, description = "Skill created", body = SkillRecord),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 409, description = "Skill already registered", body = ErrorResponse)
    ),
    tag = "skills",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx, request), fields(user_id = %ctx.user_id))]
pub async fn create_skill(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ApiQuery(query): ApiQuery<TargetUserQuery>,
    ValidatedJson(request): ValidatedJson<SkillRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let employee_id = target_employee(&state, &ctx, query.user_id).await?;
    ctx.ensure_can_write(employee_id)?;
    let skill = state.employees.skills.create(employee_id, &request).await?;
    tracing::info!(skill_id = %skill.id, "Skill created");
    Ok(ApiResponse::created(skill))
}

#[utoipa::path(
    put,
    path = "/api/skills/{id}",
    params(("id" = Uuid, Path, description = "Skill record ID")),
    request_body = SkillRequest,
    responses(
        (status = 200, description = "Skill updated", body = SkillRecord),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "skills",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx, request), fields(user_id = %ctx.user_id))]
pub async fn update_skill(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(request): ValidatedJson<SkillRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let existing = state
        .employees
        .skills
        .get(id)
        .await?
        .ok_or_else(|| not_found("スキル"))?;
    ctx.ensure_can_write(existing.employee_id)?;

    let skill = state
        .employees
        .skills
        .update(id, &request)
        .await?
        .ok_or_else(|| not_found("スキル"))?;
    Ok(ApiResponse::ok(skill))
}

#[utoipa::path(
    delete,
    path = "/api/skills/{id}",
    params(("id" = Uuid, Path, description = "Skill record ID")),
    responses(
        (status = 200, description = "Skill deleted", body = DeletedResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "skills",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(user_id = %ctx.user_id))]
pub async fn delete_skill(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let existing = state
        .employees
        .skills
        .get(id)
        .await?
        .ok_or_else(|| not_found("スキル"))?;
    ctx.ensure_can_write(existing.employee_id)?;

    if !state.employees.skills.delete(id).await? {
        return Err(not_found("スキル").into());
    }
    Ok(ApiResponse::ok(DeletedResponse { id }))
}
