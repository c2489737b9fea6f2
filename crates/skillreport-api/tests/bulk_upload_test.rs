//! Bulk work-record upload integration tests.
//!
//! Run with: `cargo test -p skillreport-api --test bulk_upload_test`

mod helpers;

use axum::http::StatusCode;
use helpers::fixtures::{csv, csv_form, csv_with_missing_start_date, file_form, valid_csv};
use helpers::{api_path, spawn_app, spawn_app_with, MemoryWorkRecords, TestApp, TestUser};
use serde_json::{json, Value};
use skillreport_api::services::bulk::{UploadWizard, WizardError, WizardStep};
use skillreport_core::models::{BulkValidateResponse, EmployeeRole, ExecutionResult};

async fn validate(app: &TestApp, user: &TestUser, data: Vec<u8>) -> Value {
    let response = app
        .client()
        .post(&api_path("/work/bulk/validate"))
        .add_header("Authorization", user.bearer())
        .multipart(csv_form(data))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response.json::<Value>()
}

async fn execute(app: &TestApp, user: &TestUser, validation_id: &str) -> axum_test::TestResponse {
    app.client()
        .post(&api_path("/work/bulk/execute"))
        .add_header("Authorization", user.bearer())
        .json(&json!({ "validation_id": validation_id }))
        .await
}

#[tokio::test]
async fn test_validate_reports_missing_start_date() {
    let app = spawn_app().await;
    let user = app.user(EmployeeRole::Member);

    let body = validate(&app, &user, csv_with_missing_start_date()).await;

    assert_eq!(body["success"], true);
    assert!(body["validation_id"].is_string());
    assert_eq!(body["summary"]["total_count"], 3);
    assert_eq!(body["summary"]["success_count"], 2);
    assert_eq!(body["summary"]["error_count"], 1);
    assert_eq!(body["summary"]["success_rate"], 66.7);

    let results = body["validation_result"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[1]["row"], 2);
    assert_eq!(results[1]["status"], "ERROR");
    assert_eq!(
        results[1]["errors"],
        json!([{ "field": "start_date", "message": "開始日は必須です" }])
    );
    assert_eq!(results[0]["status"], "OK");
    assert_eq!(results[1]["data"]["project_code"], "PRJ-002");
}

#[tokio::test]
async fn test_execute_persists_rows_once() {
    let app = spawn_app().await;
    let user = app.user(EmployeeRole::Member);

    let body = validate(&app, &user, valid_csv(&["A-1", "A-2", "A-3"])).await;
    let validation_id = body["validation_id"].as_str().unwrap().to_string();

    let response = execute(&app, &user, &validation_id).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let result = response.json::<Value>();
    assert_eq!(result["success"], true);
    assert_eq!(result["success_count"], 3);
    assert_eq!(result["error_count"], 0);
    assert_eq!(app.records.count(), 3);

    let inserted = app.records.inserted.lock().unwrap().clone();
    assert!(inserted.iter().all(|(employee_id, _)| *employee_id == user.employee_id));

    let again = execute(&app, &user, &validation_id).await;
    assert_eq!(again.status_code(), StatusCode::NOT_FOUND);
    let body = again.json::<Value>();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_NOT_FOUND");
    assert_eq!(app.records.count(), 3);
}

#[tokio::test]
async fn test_execute_reports_row_failures() {
    let app = spawn_app_with(MemoryWorkRecords::failing(&["B-3"])).await;
    let user = app.user(EmployeeRole::Member);

    let body = validate(&app, &user, valid_csv(&["B-1", "B-2", "B-3", "B-4"])).await;
    let validation_id = body["validation_id"].as_str().unwrap();

    let response = execute(&app, &user, validation_id).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let result = response.json::<Value>();
    assert_eq!(result["success"], false);
    assert_eq!(result["success_count"], 3);
    assert_eq!(result["error_count"], 1);

    let failed: Vec<&Value> = result["result_details"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|detail| detail["status"] == "error")
        .collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0]["row"], 3);
}

#[tokio::test]
async fn test_execute_refuses_run_with_errors() {
    let app = spawn_app().await;
    let user = app.user(EmployeeRole::Member);

    let body = validate(&app, &user, csv_with_missing_start_date()).await;
    let validation_id = body["validation_id"].as_str().unwrap();

    let response = execute(&app, &user, validation_id).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_HAS_ERRORS");
    assert_eq!(app.records.count(), 0);
}

#[tokio::test]
async fn test_execute_rejects_foreign_and_unknown_ids() {
    let app = spawn_app().await;
    let owner = app.user(EmployeeRole::Member);
    let other = app.user(EmployeeRole::Admin);

    let body = validate(&app, &owner, valid_csv(&["C-1"])).await;
    let validation_id = body["validation_id"].as_str().unwrap();

    let foreign = execute(&app, &other, validation_id).await;
    assert_eq!(foreign.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(foreign.json::<Value>()["error"]["code"], "VALIDATION_NOT_FOUND");

    let unknown = execute(&app, &owner, "not-a-uuid").await;
    assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);
    assert!(unknown.json::<Value>()["message"].is_string());

    // Still executable by its owner
    let response = execute(&app, &owner, validation_id).await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_execute_rejects_malformed_body() {
    let app = spawn_app().await;
    let user = app.user(EmployeeRole::Member);

    let response = app
        .client()
        .post(&api_path("/work/bulk/execute"))
        .add_header("Authorization", user.bearer())
        .json(&json!({ "id": "missing-field" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "INVALID_PARAMETER");
}

#[tokio::test]
async fn test_validate_rejects_unsupported_file_type() {
    let app = spawn_app().await;
    let user = app.user(EmployeeRole::Member);

    let response = app
        .client()
        .post(&api_path("/work/bulk/validate"))
        .add_header("Authorization", user.bearer())
        .multipart(file_form(b"hello".to_vec(), "notes.txt", "text/plain"))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "INVALID_FILE_TYPE");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_validate_rejects_missing_required_column() {
    let app = spawn_app().await;
    let user = app.user(EmployeeRole::Member);

    let data = "プロジェクト名,役割\n基幹システム刷新,PL\n".as_bytes().to_vec();
    let response = app
        .client()
        .post(&api_path("/work/bulk/validate"))
        .add_header("Authorization", user.bearer())
        .multipart(csv_form(data))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "FILE_PARSE_ERROR");
}

#[tokio::test]
async fn test_validate_rejects_header_only_file() {
    let app = spawn_app().await;
    let user = app.user(EmployeeRole::Member);

    let response = app
        .client()
        .post(&api_path("/work/bulk/validate"))
        .add_header("Authorization", user.bearer())
        .multipart(csv_form(csv(&[])))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["code"], "FILE_PARSE_ERROR");
}

#[tokio::test]
async fn test_validate_rejects_oversized_file() {
    let app = spawn_app().await;
    let user = app.user(EmployeeRole::Member);

    // Test config allows 64 KiB
    let data = vec![b'a'; 80 * 1024];
    let response = app
        .client()
        .post(&api_path("/work/bulk/validate"))
        .add_header("Authorization", user.bearer())
        .multipart(csv_form(data))
        .await;
    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_template_downloads() {
    let app = spawn_app().await;
    let user = app.user(EmployeeRole::Member);

    let response = app
        .client()
        .get(&api_path("/work/bulk/template"))
        .add_header("Authorization", user.bearer())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.header("content-type"), "text/csv; charset=utf-8");
    let disposition = response.header("content-disposition");
    assert!(disposition
        .to_str()
        .unwrap()
        .contains("work_record_template.csv"));
    assert!(response.as_bytes().starts_with(&[0xEF, 0xBB, 0xBF]));

    let response = app
        .client()
        .get(&api_path("/work/bulk/template"))
        .add_query_param("format", "xlsx")
        .add_header("Authorization", user.bearer())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.header("content-type"),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    // xlsx is a zip archive
    assert!(response.as_bytes().starts_with(b"PK"));
}

#[tokio::test]
async fn test_template_unknown_format() {
    let app = spawn_app().await;
    let user = app.user(EmployeeRole::Member);

    let response = app
        .client()
        .get(&api_path("/work/bulk/template"))
        .add_query_param("format", "pdf")
        .add_header("Authorization", user.bearer())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["code"], "INVALID_PARAMETER");
}

#[tokio::test]
async fn test_wizard_driven_by_api_responses() {
    let app = spawn_app().await;
    let user = app.user(EmployeeRole::Member);
    let mut wizard = UploadWizard::new();

    let body = validate(&app, &user, valid_csv(&["W-1", "W-2"])).await;
    let validated: BulkValidateResponse = serde_json::from_value(body).unwrap();
    wizard.on_validated(Ok(validated)).unwrap();
    assert_eq!(wizard.step(), WizardStep::Validation);
    assert!(wizard.can_execute());

    let request = wizard.execute_request().unwrap();
    let response = execute(&app, &user, &request.validation_id).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    wizard.on_executed(Ok(response.json::<ExecutionResult>())).unwrap();

    assert_eq!(wizard.step(), WizardStep::Execution);
    assert_eq!(app.records.count(), 2);
}

#[tokio::test]
async fn test_wizard_blocks_execution_of_rows_with_errors() {
    let app = spawn_app().await;
    let user = app.user(EmployeeRole::Member);
    let mut wizard = UploadWizard::new();

    let body = validate(&app, &user, csv_with_missing_start_date()).await;
    let validated: BulkValidateResponse = serde_json::from_value(body).unwrap();
    wizard.on_validated(Ok(validated)).unwrap();

    assert!(!wizard.can_execute());
    assert!(matches!(
        wizard.execute_request(),
        Err(WizardError::ExecutionBlocked)
    ));
    wizard.toggle_errors_only().unwrap();
    let visible = wizard.visible_items();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].row, 2);
}
