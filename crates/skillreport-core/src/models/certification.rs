use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

/// Certification or license acquired by an employee
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Certification {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub name: String,
    pub issuer: String,
    pub acquired_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    pub credential_id: Option<String>,
    pub score: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for creating or replacing a certification
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct CertificationRequest {
    #[validate(length(min = 1, max = 200, message = "資格名は1〜200文字で入力してください"))]
    pub name: String,
    #[validate(length(min = 1, max = 200, message = "発行機関は1〜200文字で入力してください"))]
    pub issuer: String,
    pub acquired_date: NaiveDate,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    #[validate(length(max = 100, message = "認定番号は100文字以内で入力してください"))]
    pub credential_id: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, message = "スコアは0以上で入力してください"))]
    pub score: Option<i32>,
}

impl CertificationRequest {
    pub fn check_dates(&self) -> Result<(), AppError> {
        match self.expiry_date {
            Some(expiry) if expiry < self.acquired_date => Err(AppError::invalid_field(
                "expiry_date",
                "有効期限は取得日以降の日付を指定してください",
            )),
            _ => Ok(()),
        }
    }
}
