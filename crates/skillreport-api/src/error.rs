//! HTTP error response conversion
//!
//! This module provides HTTP-specific error response conversion for AppError.
//!
//! **Preferred handler pattern:** Return `Result<impl IntoResponse, HttpAppError>`. Use
//! `AppError` (or types that implement `Into<AppError>`) for errors and `?` so they
//! become `HttpAppError` and render consistently (status, envelope, logging).
//!
//! The bulk upload endpoints render their failures with [`BulkError`], whose body also
//! carries a top-level `message` so the upload wizard can show it inline.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use skillreport_core::{AppError, ErrorMetadata, InvalidField, LogLevel};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDetails {
    pub invalid_fields: Vec<InvalidField>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code, e.g. `VALIDATION_ERROR`
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetails>,
}

/// Failure envelope: `{success: false, error: {code, message, details?}}`
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorBody,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    fn from_app_error(error: &AppError) -> Self {
        let invalid_fields = error.invalid_fields();
        let details = (!invalid_fields.is_empty()).then(|| ErrorDetails {
            invalid_fields: invalid_fields.to_vec(),
        });
        Self {
            success: false,
            error: ErrorBody {
                code: error.error_code().to_string(),
                message: error.client_message(),
                details,
            },
        }
    }
}

/// Success envelope: `{success: true, data}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }

    pub fn created(data: T) -> (StatusCode, Json<Self>) {
        (StatusCode::CREATED, Self::ok(data))
    }
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from skillreport-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<validator::ValidationErrors> for HttpAppError {
    fn from(err: validator::ValidationErrors) -> Self {
        HttpAppError(err.into())
    }
}

/// Convert JSON body deserialization failures into a 400 `INVALID_PARAMETER`.
impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::InvalidParameter(format!(
            "リクエストボディが不正です: {}",
            rejection.body_text()
        )))
    }
}

/// Path segments that fail to deserialize (e.g. a malformed UUID) are a 400 `INVALID_PARAMETER`.
impl From<PathRejection> for HttpAppError {
    fn from(rejection: PathRejection) -> Self {
        HttpAppError(AppError::InvalidParameter(format!(
            "URLパラメータが不正です: {}",
            rejection.body_text()
        )))
    }
}

impl From<QueryRejection> for HttpAppError {
    fn from(rejection: QueryRejection) -> Self {
        HttpAppError(AppError::InvalidParameter(format!(
            "クエリパラメータが不正です: {}",
            rejection.body_text()
        )))
    }
}

/// `Path` extractor whose rejection renders the error envelope
#[derive(Debug, Clone, Copy)]
pub struct ApiPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(inner) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(ApiPath(inner))
    }
}

/// `Query` extractor whose rejection renders the error envelope
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(inner) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(ApiQuery(inner))
    }
}

/// JSON body extractor that rejects malformed bodies with `INVALID_PARAMETER` and
/// bodies failing their `validator` rules with `VALIDATION_ERROR`.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        inner.validate()?;
        Ok(ValidatedJson(inner))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error,
                error_type = error_type,
                details = %error.detailed_message(),
                "Error occurred"
            );
        }
    }
}

fn status_of(error: &AppError) -> StatusCode {
    StatusCode::from_u16(error.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;
        log_error(app_error);
        // Sensitive errors already render a generic client_message
        (status_of(app_error), Json(ErrorResponse::from_app_error(app_error))).into_response()
    }
}

/// Failure body of the bulk endpoints: `{success: false, message, error: {code, message}}`
#[derive(Debug, Serialize, ToSchema)]
pub struct BulkErrorResponse {
    pub success: bool,
    pub message: String,
    pub error: ErrorBody,
}

#[derive(Debug)]
pub struct BulkError(pub AppError);

impl From<AppError> for BulkError {
    fn from(err: AppError) -> Self {
        BulkError(err)
    }
}

impl IntoResponse for BulkError {
    fn into_response(self) -> Response {
        let app_error = &self.0;
        log_error(app_error);
        let message = app_error.client_message();
        let body = BulkErrorResponse {
            success: false,
            message: message.clone(),
            error: ErrorBody {
                code: app_error.error_code().to_string(),
                message,
                details: None,
            },
        };
        (status_of(app_error), Json(body)).into_response()
    }
}
