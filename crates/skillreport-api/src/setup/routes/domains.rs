//! Domain route groups (profiles, skills, career, work records, bulk upload, ...).

use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;
use std::sync::Arc;

/// Multipart framing overhead allowed on top of the file itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn profile_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/profiles/me", API_PREFIX),
            get(handlers::profiles::get_my_profile).put(handlers::profiles::update_my_profile),
        )
        .route(
            &format!("{}/profiles/{{user_id}}", API_PREFIX),
            get(handlers::profiles::get_profile).put(handlers::profiles::update_profile),
        )
        .with_state(state)
}

pub fn master_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/master/departments", API_PREFIX),
            get(handlers::master::list_departments),
        )
        .route(
            &format!("{}/master/positions", API_PREFIX),
            get(handlers::master::list_positions),
        )
        .route(
            &format!("{}/master/skill-categories", API_PREFIX),
            get(handlers::master::list_skill_categories),
        )
        .with_state(state)
}

pub fn skill_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/skills", API_PREFIX),
            get(handlers::skills::list_skills).post(handlers::skills::create_skill),
        )
        .route(
            &format!("{}/skills/{{id}}", API_PREFIX),
            get(handlers::skills::get_skill)
                .put(handlers::skills::update_skill)
                .delete(handlers::skills::delete_skill),
        )
        .with_state(state)
}

pub fn certification_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/certifications", API_PREFIX),
            get(handlers::certifications::list_certifications)
                .post(handlers::certifications::create_certification),
        )
        .route(
            &format!("{}/certifications/{{id}}", API_PREFIX),
            get(handlers::certifications::get_certification)
                .put(handlers::certifications::update_certification)
                .delete(handlers::certifications::delete_certification),
        )
        .with_state(state)
}

pub fn training_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/trainings", API_PREFIX),
            get(handlers::trainings::list_trainings).post(handlers::trainings::create_training),
        )
        .route(
            &format!("{}/trainings/{{id}}", API_PREFIX),
            get(handlers::trainings::get_training)
                .put(handlers::trainings::update_training)
                .delete(handlers::trainings::delete_training),
        )
        .with_state(state)
}

pub fn career_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/career/goals", API_PREFIX),
            get(handlers::career::list_goals).post(handlers::career::create_goal),
        )
        .route(
            &format!("{}/career/goals/{{id}}", API_PREFIX),
            get(handlers::career::get_goal)
                .put(handlers::career::update_goal)
                .delete(handlers::career::delete_goal),
        )
        .route(
            &format!("{}/career/goals/{{id}}/action-plans", API_PREFIX),
            get(handlers::career::list_action_plans).post(handlers::career::create_action_plan),
        )
        .route(
            &format!("{}/career/action-plans/{{id}}", API_PREFIX),
            put(handlers::career::update_action_plan).delete(handlers::career::delete_action_plan),
        )
        .with_state(state)
}

pub fn work_record_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/work", API_PREFIX),
            get(handlers::work_records::list_work_records)
                .post(handlers::work_records::create_work_record),
        )
        .route(
            &format!("{}/work/{{id}}", API_PREFIX),
            get(handlers::work_records::get_work_record)
                .put(handlers::work_records::update_work_record)
                .delete(handlers::work_records::delete_work_record),
        )
        .with_state(state)
}

/// Bulk upload routes; the validate route gets a body limit sized to the file limit
pub fn bulk_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let body_limit = state.bulk.service.config().max_file_size_bytes + MULTIPART_OVERHEAD_BYTES;
    Router::new()
        .route(
            &format!("{}/work/bulk/template", API_PREFIX),
            get(handlers::bulk::download_template),
        )
        .route(
            &format!("{}/work/bulk/validate", API_PREFIX),
            post(handlers::bulk::validate_upload).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route(
            &format!("{}/work/bulk/execute", API_PREFIX),
            post(handlers::bulk::execute_upload),
        )
        .with_state(state)
}
