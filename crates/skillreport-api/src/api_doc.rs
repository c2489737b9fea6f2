//! OpenAPI documentation, served at `/api/openapi.json` and rendered by RapiDoc at `/docs`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use skillreport_core::models;

/// Registers the `bearer_auth` scheme referenced by every protected path
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "SkillReport API",
        version = "0.1.0",
        description = "Employee skill reports: profiles, skills, certifications, trainings, career goals and work history, with bulk work-record upload from CSV/Excel."
    ),
    modifiers(&BearerAuth),
    paths(
        // Profiles
        handlers::profiles::get_my_profile,
        handlers::profiles::update_my_profile,
        handlers::profiles::get_profile,
        handlers::profiles::update_profile,
        // Master data
        handlers::master::list_departments,
        handlers::master::list_positions,
        handlers::master::list_skill_categories,
        // Skills
        handlers::skills::list_skills,
        handlers::skills::get_skill,
        handlers::skills::create_skill,
        handlers::skills::update_skill,
        handlers::skills::delete_skill,
        // Certifications
        handlers::certifications::list_certifications,
        handlers::certifications::get_certification,
        handlers::certifications::create_certification,
        handlers::certifications::update_certification,
        handlers::certifications::delete_certification,
        // Trainings
        handlers::trainings::list_trainings,
        handlers::trainings::get_training,
        handlers::trainings::create_training,
        handlers::trainings::update_training,
        handlers::trainings::delete_training,
        // Career
        handlers::career::list_goals,
        handlers::career::get_goal,
        handlers::career::create_goal,
        handlers::career::update_goal,
        handlers::career::delete_goal,
        handlers::career::list_action_plans,
        handlers::career::create_action_plan,
        handlers::career::update_action_plan,
        handlers::career::delete_action_plan,
        // Work records
        handlers::work_records::list_work_records,
        handlers::work_records::get_work_record,
        handlers::work_records::create_work_record,
        handlers::work_records::update_work_record,
        handlers::work_records::delete_work_record,
        // Bulk upload
        handlers::bulk::download_template,
        handlers::bulk::validate_upload,
        handlers::bulk::execute_upload,
    ),
    components(
        schemas(
            models::Profile,
            models::UpdateProfileRequest,
            models::EmployeeRole,
            models::Department,
            models::Position,
            models::SkillCategory,
            models::SkillRecord,
            models::SkillRequest,
            models::Certification,
            models::CertificationRequest,
            models::TrainingHistory,
            models::TrainingRequest,
            models::TrainingStatus,
            models::CareerGoal,
            models::CareerGoalRequest,
            models::CareerGoalDetail,
            models::GoalStatus,
            models::ActionPlan,
            models::ActionPlanRequest,
            models::WorkRecord,
            models::NewWorkRecord,
            models::ProjectStatus,
            // Bulk upload
            models::WorkRecordRow,
            models::RowStatus,
            models::FieldError,
            models::ValidationResultItem,
            models::ValidationSummary,
            models::BulkValidateResponse,
            models::BulkExecuteRequest,
            models::ExecutionStatus,
            models::RowOutcome,
            models::ExecutionResult,
            handlers::DeletedResponse,
            // Error
            error::ErrorResponse,
            error::BulkErrorResponse,
        )
    ),
    tags(
        (name = "profiles", description = "Employee profiles"),
        (name = "master", description = "Departments, positions and skill categories"),
        (name = "skills", description = "Skill records"),
        (name = "certifications", description = "Certifications"),
        (name = "trainings", description = "Training history"),
        (name = "career", description = "Career goals and action plans"),
        (name = "work", description = "Work history (project records)"),
        (name = "bulk", description = "Bulk work-record upload from CSV/Excel")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_bulk_paths() {
        let spec = get_openapi_spec();
        assert!(spec.paths.paths.contains_key("/api/work/bulk/validate"));
        assert!(spec.paths.paths.contains_key("/api/work/bulk/execute"));
        assert!(spec.paths.paths.contains_key("/api/work/bulk/template"));
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let spec = get_openapi_spec();
        let components = spec.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
