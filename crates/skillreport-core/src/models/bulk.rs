//! Bulk work-record upload: validation and execution results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::work_record::WorkRecordRow;

/// Per-row validation outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum RowStatus {
    Ok,
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ValidationResultItem {
    /// 1-based data row number (the header is not counted)
    pub row: usize,
    pub status: RowStatus,
    pub errors: Vec<FieldError>,
    pub data: WorkRecordRow,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct ValidationSummary {
    pub total_count: usize,
    /// OK and WARNING rows
    pub success_count: usize,
    pub error_count: usize,
    /// Percentage rounded to one decimal
    pub success_rate: f64,
}

impl ValidationSummary {
    pub fn from_items(items: &[ValidationResultItem]) -> Self {
        let total_count = items.len();
        let error_count = items
            .iter()
            .filter(|item| item.status == RowStatus::Error)
            .count();
        let success_count = total_count - error_count;
        let success_rate = if total_count == 0 {
            0.0
        } else {
            (success_count as f64 / total_count as f64 * 1000.0).round() / 10.0
        };
        Self {
            total_count,
            success_count,
            error_count,
            success_rate,
        }
    }
}

/// Response of `POST /api/work/bulk/validate`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkValidateResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_id: Option<Uuid>,
    pub summary: ValidationSummary,
    pub validation_result: Vec<ValidationResultItem>,
}

/// Validation run retained between the validate and execute requests
#[derive(Debug, Clone)]
pub struct ValidationRun {
    pub validation_id: Uuid,
    pub user_id: Uuid,
    pub employee_id: Uuid,
    pub items: Vec<ValidationResultItem>,
    pub summary: ValidationSummary,
    pub created_at: DateTime<Utc>,
}

/// Request body of `POST /api/work/bulk/execute`
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct BulkExecuteRequest {
    pub validation_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RowOutcome {
    pub row: usize,
    pub status: ExecutionStatus,
    pub message: String,
}

/// Response of `POST /api/work/bulk/execute`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExecutionResult {
    pub success: bool,
    pub message: String,
    pub success_count: usize,
    pub error_count: usize,
    #[serde(default)]
    pub result_details: Vec<RowOutcome>,
}

impl ExecutionResult {
    pub fn from_outcomes(result_details: Vec<RowOutcome>) -> Self {
        let success_count = result_details
            .iter()
            .filter(|o| o.status == ExecutionStatus::Success)
            .count();
        let error_count = result_details.len() - success_count;
        let message = if error_count == 0 {
            format!("{}件の業務経歴を登録しました", success_count)
        } else {
            format!(
                "{}件を登録し、{}件の登録に失敗しました",
                success_count, error_count
            )
        };
        Self {
            success: error_count == 0,
            message,
            success_count,
            error_count,
            result_details,
        }
    }
}
