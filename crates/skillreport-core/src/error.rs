//! Error types module
//!
//! All errors are unified under the `AppError` enum. Each variant maps to one entry of the
//! public error taxonomy (`UNAUTHORIZED`, `VALIDATION_ERROR`, `VALIDATION_NOT_FOUND`, ...)
//! through the `ErrorMetadata` trait, which the HTTP layer uses to build the response envelope.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx` feature.

use serde::Serialize;
use std::io;
use utoipa::ToSchema;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like oversized uploads
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// One rejected request field, reported to the client under `details.invalid_fields`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct InvalidField {
    pub field: String,
    pub reason: String,
}

impl InvalidField {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "VALIDATION_ERROR")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from the client
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        invalid_fields: Vec<InvalidField>,
    },

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation run not found: {0}")]
    ValidationNotFound(String),

    #[error("Validation run has {error_count} error rows")]
    ValidationHasErrors { error_count: usize },

    #[error("Invalid file type: {0}")]
    InvalidFileType(String),

    #[error("File could not be parsed: {0}")]
    FileParse(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Build a `VALIDATION_ERROR` for a single field.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Validation {
            message: "入力内容に誤りがあります".to_string(),
            invalid_fields: vec![InvalidField::new(field, reason)],
        }
    }

    /// Field-level details for validation failures; empty for every other variant.
    pub fn invalid_fields(&self) -> &[InvalidField] {
        match self {
            AppError::Validation { invalid_fields, .. } => invalid_fields,
            _ => &[],
        }
    }
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidParameter(format!("JSON parsing error: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidParameter(format!("UUID parsing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut invalid_fields: Vec<InvalidField> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let reason = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    InvalidField::new(field.to_string(), reason)
                })
            })
            .collect();
        // HashMap iteration order is unstable; keep responses deterministic
        invalid_fields.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::Validation {
            message: "入力内容に誤りがあります".to_string(),
            invalid_fields,
        }
    }
}

/// Static metadata for each variant: (http_status, error_code, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::Database(_) => (500, "INTERNAL_SERVER_ERROR", true, LogLevel::Error),
        AppError::Unauthorized(_) => (401, "UNAUTHORIZED", false, LogLevel::Debug),
        AppError::InvalidToken(_) => (401, "INVALID_TOKEN", false, LogLevel::Debug),
        AppError::Forbidden(_) => (403, "PERMISSION_DENIED", false, LogLevel::Debug),
        AppError::InvalidParameter(_) => (400, "INVALID_PARAMETER", false, LogLevel::Debug),
        AppError::Validation { .. } => (400, "VALIDATION_ERROR", false, LogLevel::Debug),
        AppError::UserNotFound(_) => (404, "USER_NOT_FOUND", false, LogLevel::Debug),
        AppError::NotFound(_) => (404, "NOT_FOUND", false, LogLevel::Debug),
        AppError::ValidationNotFound(_) => (404, "VALIDATION_NOT_FOUND", false, LogLevel::Debug),
        AppError::ValidationHasErrors { .. } => {
            (400, "VALIDATION_HAS_ERRORS", false, LogLevel::Debug)
        }
        AppError::InvalidFileType(_) => (400, "INVALID_FILE_TYPE", false, LogLevel::Debug),
        AppError::FileParse(_) => (400, "FILE_PARSE_ERROR", false, LogLevel::Debug),
        AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE", false, LogLevel::Warn),
        AppError::EmailAlreadyExists(_) => (409, "EMAIL_ALREADY_EXISTS", false, LogLevel::Debug),
        AppError::Conflict(_) => (409, "CONFLICT", false, LogLevel::Debug),
        AppError::Internal(_) => (500, "INTERNAL_SERVER_ERROR", true, LogLevel::Error),
        AppError::InternalWithSource { .. } => {
            (500, "INTERNAL_SERVER_ERROR", true, LogLevel::Error)
        }
    }
}

impl AppError {
    /// Get the error type name for detailed error responses and logs
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Database(_) => "Database",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::InvalidToken(_) => "InvalidToken",
            AppError::Forbidden(_) => "Forbidden",
            AppError::InvalidParameter(_) => "InvalidParameter",
            AppError::Validation { .. } => "Validation",
            AppError::UserNotFound(_) => "UserNotFound",
            AppError::NotFound(_) => "NotFound",
            AppError::ValidationNotFound(_) => "ValidationNotFound",
            AppError::ValidationHasErrors { .. } => "ValidationHasErrors",
            AppError::InvalidFileType(_) => "InvalidFileType",
            AppError::FileParse(_) => "FileParse",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::EmailAlreadyExists(_) => "EmailAlreadyExists",
            AppError::Conflict(_) => "Conflict",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Database(_) | AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "サーバー内部でエラーが発生しました".to_string()
            }
            AppError::Validation { message, .. } => message.clone(),
            AppError::ValidationHasErrors { error_count } => format!(
                "エラーのある行が{}件あるため実行できません",
                error_count
            ),
            AppError::Unauthorized(msg)
            | AppError::InvalidToken(msg)
            | AppError::Forbidden(msg)
            | AppError::InvalidParameter(msg)
            | AppError::UserNotFound(msg)
            | AppError::NotFound(msg)
            | AppError::ValidationNotFound(msg)
            | AppError::InvalidFileType(msg)
            | AppError::FileParse(msg)
            | AppError::PayloadTooLarge(msg)
            | AppError::EmailAlreadyExists(msg)
            | AppError::Conflict(msg) => msg.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_error_metadata_database() {
        #[cfg(feature = "sqlx")]
        let err = AppError::from(sqlx::Error::PoolClosed);
        #[cfg(not(feature = "sqlx"))]
        let err = AppError::Database("pool closed".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "INTERNAL_SERVER_ERROR");
        assert!(err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Error);
        assert!(!err.client_message().contains("pool"));
    }

    #[test]
    fn test_error_metadata_taxonomy_codes() {
        let cases = [
            (AppError::Unauthorized("x".into()), 401, "UNAUTHORIZED"),
            (AppError::InvalidToken("x".into()), 401, "INVALID_TOKEN"),
            (AppError::Forbidden("x".into()), 403, "PERMISSION_DENIED"),
            (AppError::UserNotFound("x".into()), 404, "USER_NOT_FOUND"),
            (
                AppError::ValidationNotFound("x".into()),
                404,
                "VALIDATION_NOT_FOUND",
            ),
            (
                AppError::EmailAlreadyExists("x".into()),
                409,
                "EMAIL_ALREADY_EXISTS",
            ),
            (AppError::InvalidFileType("x".into()), 400, "INVALID_FILE_TYPE"),
            (AppError::PayloadTooLarge("x".into()), 413, "PAYLOAD_TOO_LARGE"),
        ];
        for (err, status, code) in cases {
            assert_eq!(err.http_status_code(), status, "{}", code);
            assert_eq!(err.error_code(), code);
            assert!(!err.is_sensitive());
        }
    }

    #[test]
    fn test_validation_error_keeps_field_details() {
        let err = AppError::invalid_field("email", "メールアドレスの形式が正しくありません");
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(err.invalid_fields().len(), 1);
        assert_eq!(err.invalid_fields()[0].field, "email");
        assert!(AppError::NotFound("x".into()).invalid_fields().is_empty());
    }

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "名前は必須です"))]
        name: String,
        #[validate(range(min = 1, max = 5))]
        level: i32,
    }

    #[test]
    fn test_from_validation_errors_sorted_fields() {
        let sample = Sample {
            name: String::new(),
            level: 9,
        };
        let err: AppError = sample.validate().unwrap_err().into();
        let fields = err.invalid_fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].field, "level");
        assert_eq!(fields[0].reason, "range");
        assert_eq!(fields[1].field, "name");
        assert_eq!(fields[1].reason, "名前は必須です");
    }

    #[test]
    fn test_detailed_message_includes_source_chain() {
        let err = AppError::from(anyhow::anyhow!("disk unplugged"));
        assert!(err.detailed_message().contains("disk unplugged"));
        assert_eq!(err.error_type(), "Internal");
    }
}
