use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Skill held by an employee, with self-assessed level
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SkillRecord {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub skill_name: String,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    /// 1 (beginner) to 5 (expert)
    pub level: i32,
    pub years_of_experience: i32,
    pub last_used_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for creating or replacing a skill record
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct SkillRequest {
    #[validate(length(min = 1, max = 100, message = "スキル名は1〜100文字で入力してください"))]
    pub skill_name: String,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[validate(range(min = 1, max = 5, message = "レベルは1〜5で指定してください"))]
    pub level: i32,
    #[serde(default)]
    #[validate(range(min = 0, max = 50, message = "経験年数は0〜50で指定してください"))]
    pub years_of_experience: i32,
    #[serde(default)]
    pub last_used_date: Option<NaiveDate>,
    #[serde(default)]
    #[validate(length(max = 500, message = "備考は500文字以内で入力してください"))]
    pub notes: Option<String>,
}
