//! Master data lookups used by profile and skill forms

use axum::{extract::State, response::IntoResponse};
use skillreport_core::models::{Department, Position, SkillCategory};
use std::sync::Arc;

use crate::auth::AuthContext;
use crate::error::{ApiResponse, HttpAppError};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/master/departments",
    responses((status = 200, description = "Departments in display order", body = Vec<Department>)),
    tag = "master",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, _ctx))]
pub async fn list_departments(
    State(state): State<Arc<AppState>>,
    _ctx: AuthContext,
) -> Result<impl IntoResponse, HttpAppError> {
    let departments = state.employees.master.list_departments().await?;
    Ok(ApiResponse::ok(departments))
}

#[utoipa::path(
    get,
    path = "/api/master/positions",
    responses((status = 200, description = "Positions in display order", body = Vec<Position>)),
    tag = "master",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, _ctx))]
pub async fn list_positions(
    State(state): State<Arc<AppState>>,
    _ctx: AuthContext,
) -> Result<impl IntoResponse, HttpAppError> {
    let positions = state.employees.master.list_positions().await?;
    Ok(ApiResponse::ok(positions))
}

#[utoipa::path(
    get,
    path = "/api/master/skill-categories",
    responses((status = 200, description = "Skill categories in display order", body = Vec<SkillCategory>)),
    tag = "master",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, _ctx))]
pub async fn list_skill_categories(
    State(state): State<Arc<AppState>>,
    _ctx: AuthContext,
) -> Result<impl IntoResponse, HttpAppError> {
    let categories = state.employees.master.list_skill_categories().await?;
    Ok(ApiResponse::ok(categories))
}
