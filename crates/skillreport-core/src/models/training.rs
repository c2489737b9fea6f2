use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "training_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum TrainingStatus {
    Planned,
    InProgress,
    Completed,
    Cancelled,
}

/// Training course taken (or planned) by an employee
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TrainingHistory {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub training_name: String,
    pub provider: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[schema(value_type = Option<f64>)]
    pub hours: Option<Decimal>,
    pub status: TrainingStatus,
    pub certificate_obtained: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for creating or replacing a training entry
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct TrainingRequest {
    #[validate(length(min = 1, max = 200, message = "研修名は1〜200文字で入力してください"))]
    pub training_name: String,
    #[serde(default)]
    #[validate(length(max = 200, message = "提供元は200文字以内で入力してください"))]
    pub provider: Option<String>,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    #[validate(custom(function = "crate::validation::validate_hours"))]
    pub hours: Option<Decimal>,
    pub status: TrainingStatus,
    #[serde(default)]
    pub certificate_obtained: bool,
    #[serde(default)]
    #[validate(length(max = 1000, message = "備考は1000文字以内で入力してください"))]
    pub notes: Option<String>,
}

impl TrainingRequest {
    pub fn check_dates(&self) -> Result<(), AppError> {
        match self.end_date {
            Some(end) if end < self.start_date => Err(AppError::invalid_field(
                "end_date",
                "終了日は開始日以降の日付を指定してください",
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&TrainingStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let req = TrainingRequest {
            training_name: "Rust入門".to_string(),
            provider: None,
            start_date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            hours: Some(Decimal::from(8)),
            status: TrainingStatus::Completed,
            certificate_obtained: false,
            notes: None,
        };
        assert!(req.validate().is_ok());
        let err = req.check_dates().unwrap_err();
        assert_eq!(err.invalid_fields()[0].field, "end_date");
    }
}
