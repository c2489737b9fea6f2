//! Bulk work-record upload: template download, validate, execute

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use skillreport_core::models::{BulkExecuteRequest, BulkValidateResponse, ExecutionResult};
use skillreport_core::AppError;
use std::sync::Arc;
use utoipa::IntoParams;

use crate::auth::AuthContext;
use crate::error::{ApiQuery, BulkError, BulkErrorResponse, ErrorResponse, HttpAppError};
use crate::services::bulk::TemplateFormat;
use crate::state::AppState;
use crate::utils::extract_multipart_file;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct TemplateQuery {
    /// `csv` (default) or `xlsx`
    pub format: Option<String>,
}

/// Download the upload template
#[utoipa::path(
    get,
    path = "/api/work/bulk/template",
    params(TemplateQuery),
    responses(
        (status = 200, description = "Template file", content_type = "application/octet-stream"),
        (status = 400, description = "Unknown format", body = ErrorResponse)
    ),
    tag = "bulk",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(_ctx))]
pub async fn download_template(
    _ctx: AuthContext,
    ApiQuery(query): ApiQuery<TemplateQuery>,
) -> Result<Response, HttpAppError> {
    let format = TemplateFormat::parse(query.format.as_deref())?;
    let bytes = format.render()?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, format.content_type())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", format.file_name()),
        )
        .body(Body::from(bytes))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build template response");
            HttpAppError::from(AppError::Internal(e.to_string()))
        })?;

    Ok(response)
}

/// Validate an uploaded CSV/Excel file without saving anything
///
/// The file goes in the multipart field `file`. The returned `validation_id`
/// stays usable for execution until it expires or is consumed.
#[utoipa::path(
    post,
    path = "/api/work/bulk/validate",
    request_body(content_type = "multipart/form-data", description = "Multipart form with a `file` field"),
    responses(
        (status = 200, description = "Validation result", body = BulkValidateResponse),
        (status = 400, description = "Invalid file type or unparsable file", body = BulkErrorResponse),
        (status = 413, description = "File too large", body = BulkErrorResponse)
    ),
    tag = "bulk",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx, multipart), fields(user_id = %ctx.user_id))]
pub async fn validate_upload(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    multipart: Multipart,
) -> Result<impl IntoResponse, BulkError> {
    let file = extract_multipart_file(multipart).await?;
    let response = state.bulk.service.validate(&ctx, file).await?;
    Ok(Json(response))
}

/// Register every row of a validated upload
#[utoipa::path(
    post,
    path = "/api/work/bulk/execute",
    request_body = BulkExecuteRequest,
    responses(
        (status = 200, description = "Execution result, including per-row failures", body = ExecutionResult),
        (status = 400, description = "Run still has errors", body = BulkErrorResponse),
        (status = 404, description = "Unknown, expired or consumed validation_id", body = BulkErrorResponse)
    ),
    tag = "bulk",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, ctx, payload), fields(user_id = %ctx.user_id))]
pub async fn execute_upload(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    payload: Result<Json<BulkExecuteRequest>, JsonRejection>,
) -> Result<impl IntoResponse, BulkError> {
    let Json(request) = payload.map_err(|rejection| {
        AppError::InvalidParameter(format!("リクエストボディが不正です: {}", rejection.body_text()))
    })?;
    let result = state
        .bulk
        .service
        .execute(&ctx, &request.validation_id)
        .await?;
    Ok(Json(result))
}
