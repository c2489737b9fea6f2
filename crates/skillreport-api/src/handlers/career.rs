//! Career goal and action plan handlers
//!
//! Action plans carry no owner of their own; access is decided by the goal they
//! belong to.

use axum::{
    extract::State,
    response::IntoResponse,
};
use skillreport_core::models::{
    ActionPlan, ActionPlanRequest, CareerGoal, CareerGoalDetail, CareerGoalRequest,
};
use skillreport_core::AppError;
use std::sync::Arc;
use uuid::Uuid;

use super::{not_found, target_employee, DeletedResponse, TargetUserQuery};
use crate::auth::AuthContext;
use crate::error::{ApiPath, ApiQuery, ApiResponse, ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

const GOAL: &str = "キャリア目標";
const PLAN: &str = "アクションプラン";

async fn load_goal(state: &AppState, id: Uuid) -> Result<CareerGoal, AppError> {
    state
        .employees
        .careers
        .get_goal(id)
        .await?
        .ok_or_else(|| not_found(GOAL))
}

async fn load_plan(state: &AppState, id: Uuid) -> Result<(ActionPlan, CareerGoal), AppError> {
    let plan = state
        .employees
        .careers
        .get_action_plan(id)
        .await?
        .ok_or_else(|| not_found(PLAN))?;
    let goal = load_goal(state, plan.goal_id).await?;
    Ok((plan, goal))
}

#[utoipa::path(
    get,
    path = "/api/career/goals",
    params(TargetUserQuery),
    responses(
        (status = 200, description = "Career goals by priority", body = Vec<CareerGoal>),
        (status = 403, description = "Not allowed", body = ErrorResponse)
    ),
    tag = "career",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(user_id = %ctx.user_id))]
pub async fn list_goals(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ApiQuery(query): ApiQuery<TargetUserQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let employee_id = target_employee(&state, &ctx, query.user_id).await?;
    ctx.ensure_can_read(employee_id)?;
    let goals = state.employees.careers.list_goals(employee_id).await?;
    Ok(ApiResponse::ok(goals))
}

/// Get a goal with its action plans
#[utoipa::path(
    get,
    path = "/api/career/goals/{id}",
    params(("id" = Uuid, Path, description = "Career goal ID")),
    responses(
        (status = 200, description = "Goal and action plans", body = CareerGoalDetail),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "career",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(user_id = %ctx.user_id))]
pub async fn get_goal(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let goal = load_goal(&state, id).await?;
    ctx.ensure_can_read(goal.employee_id)?;
    let action_plans = state.employees.careers.list_action_plans(id).await?;
    Ok(ApiResponse::ok(CareerGoalDetail { goal, action_plans }))
}

#[utoipa::path(
    post,
    path = "/api/career/goals",
    params(TargetUserQuery),
    request_body = CareerGoalRequest,
    responses(
        (status = 201, description = "Goal created", body = CareerGoal),
        (status = 400, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "career",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx, request), fields(user_id = %ctx.user_id))]
pub async fn create_goal(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ApiQuery(query): ApiQuery<TargetUserQuery>,
    ValidatedJson(request): ValidatedJson<CareerGoalRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let employee_id = target_employee(&state, &ctx, query.user_id).await?;
    ctx.ensure_can_write(employee_id)?;
    let goal = state
        .employees
        .careers
        .create_goal(employee_id, &request)
        .await?;
    tracing::info!(goal_id = %goal.id, "Career goal created");
    Ok(ApiResponse::created(goal))
}

#[utoipa::path(
    put,
    path = "/api/career/goals/{id}",
    params(("id" = Uuid, Path, description = "Career goal ID")),
    request_body = CareerGoalRequest,
    responses(
        (status = 200, description = "Goal updated", body = CareerGoal),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "career",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx, request), fields(user_id = %ctx.user_id))]
pub async fn update_goal(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(request): ValidatedJson<CareerGoalRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let existing = load_goal(&state, id).await?;
    ctx.ensure_can_write(existing.employee_id)?;
    let goal = state
        .employees
        .careers
        .update_goal(id, &request)
        .await?
        .ok_or_else(|| not_found(GOAL))?;
    Ok(ApiResponse::ok(goal))
}

/// Delete a goal together with its action plans
#[utoipa::path(
    delete,
    path = "/api/career/goals/{id}",
    params(("id" = Uuid, Path, description = "Career goal ID")),
    responses(
        (status = 200, description = "Goal deleted", body = DeletedResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "career",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(user_id = %ctx.user_id))]
pub async fn delete_goal(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let existing = load_goal(&state, id).await?;
    ctx.ensure_can_write(existing.employee_id)?;
    if !state.employees.careers.delete_goal(id).await? {
        return Err(not_found(GOAL).into());
    }
    Ok(ApiResponse::ok(DeletedResponse { id }))
}

#[utoipa::path(
    get,
    path = "/api/career/goals/{id}/action-plans",
    params(("id" = Uuid, Path, description = "Career goal ID")),
    responses(
        (status = 200, description = "Action plans by due date", body = Vec<ActionPlan>),
        (status = 404, description = "Goal not found", body = ErrorResponse)
    ),
    tag = "career",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(user_id = %ctx.user_id))]
pub async fn list_action_plans(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ApiPath(goal_id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let goal = load_goal(&state, goal_id).await?;
    ctx.ensure_can_read(goal.employee_id)?;
    let plans = state.employees.careers.list_action_plans(goal_id).await?;
    Ok(ApiResponse::ok(plans))
}

#[utoipa::path(
    post,
    path = "/api/career/goals/{id}/action-plans",
    params(("id" = Uuid, Path, description = "Career goal ID")),
    request_body = ActionPlanRequest,
    responses(
        (status = 201, description = "Action plan created", body = ActionPlan),
        (status = 404, description = "Goal not found", body = ErrorResponse)
    ),
    tag = "career",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx, request), fields(user_id = %ctx.user_id))]
pub async fn create_action_plan(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ApiPath(goal_id): ApiPath<Uuid>,
    ValidatedJson(request): ValidatedJson<ActionPlanRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let goal = load_goal(&state, goal_id).await?;
    ctx.ensure_can_write(goal.employee_id)?;
    let plan = state
        .employees
        .careers
        .create_action_plan(goal_id, &request)
        .await?;
    Ok(ApiResponse::created(plan))
}

/// Update an action plan; marking it completed stamps `completed_at`
#[utoipa::path(
    put,
    path = "/api/career/action-plans/{id}",
    params(("id" = Uuid, Path, description = "Action plan ID")),
    request_body = ActionPlanRequest,
    responses(
        (status = 200, description = "Action plan updated", body = ActionPlan),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "career",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx, request), fields(user_id = %ctx.user_id))]
pub async fn update_action_plan(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(request): ValidatedJson<ActionPlanRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let (_, goal) = load_plan(&state, id).await?;
    ctx.ensure_can_write(goal.employee_id)?;
    let plan = state
        .employees
        .careers
        .update_action_plan(id, &request)
        .await?
        .ok_or_else(|| not_found(PLAN))?;
    Ok(ApiResponse::ok(plan))
}

#[utoipa::path(
    delete,
    path = "/api/career/action-plans/{id}",
    params(("id" = Uuid, Path, description = "Action plan ID")),
    responses(
        (status = 200, description = "Action plan deleted", body = DeletedResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "career",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx), fields(user_id = %ctx.user_id))]
pub async fn delete_action_plan(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let (_, goal) = load_plan(&state, id).await?;
    ctx.ensure_can_write(goal.employee_id)?;
    if !state.employees.careers.delete_action_plan(id).await? {
        return Err(not_found(PLAN).into());
    }
    Ok(ApiResponse::ok(DeletedResponse { id }))
}
