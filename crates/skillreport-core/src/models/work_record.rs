use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

/// Project status (matches database enum)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "project_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planned,
    InProgress,
    Completed,
    Suspended,
}

impl ProjectStatus {
    /// Parse a spreadsheet cell: English key or Japanese label
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim() {
            "planned" | "計画中" => Some(ProjectStatus::Planned),
            "in_progress" | "進行中" => Some(ProjectStatus::InProgress),
            "completed" | "完了" => Some(ProjectStatus::Completed),
            "suspended" | "中断" => Some(ProjectStatus::Suspended),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::Planned => "計画中",
            ProjectStatus::InProgress => "進行中",
            ProjectStatus::Completed => "完了",
            ProjectStatus::Suspended => "中断",
        }
    }
}

impl Display for ProjectStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ProjectStatus::Planned => write!(f, "planned"),
            ProjectStatus::InProgress => write!(f, "in_progress"),
            ProjectStatus::Completed => write!(f, "completed"),
            ProjectStatus::Suspended => write!(f, "suspended"),
        }
    }
}

/// Persisted work record (`project_records` table)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct WorkRecord {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub project_name: String,
    pub project_code: String,
    pub client_name: Option<String>,
    pub role_title: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[schema(value_type = Option<f64>)]
    pub participation_rate: Option<Decimal>,
    pub team_size: Option<i32>,
    pub status: ProjectStatus,
    pub technologies: Vec<String>,
    pub responsibilities: Option<String>,
    pub achievements: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Typed work record ready to be stored.
///
/// Used both as the JSON body of the single-record endpoints and as the output of
/// bulk row parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
pub struct NewWorkRecord {
    #[validate(length(min = 1, max = 200, message = "プロジェクト名は200文字以内で入力してください"))]
    pub project_name: String,
    #[validate(length(min = 1, max = 50, message = "プロジェクトコードは50文字以内で入力してください"))]
    pub project_code: String,
    #[serde(default)]
    #[validate(length(max = 200, message = "クライアント名は200文字以内で入力してください"))]
    pub client_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "役割は100文字以内で入力してください"))]
    pub role_title: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    #[validate(custom(function = "crate::validation::validate_percentage"))]
    pub participation_rate: Option<Decimal>,
    #[serde(default)]
    #[validate(range(min = 1, message = "チーム人数は1以上の整数で指定してください"))]
    pub team_size: Option<i32>,
    pub status: ProjectStatus,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub responsibilities: Option<String>,
    #[serde(default)]
    pub achievements: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewWorkRecord {
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

/// Template columns: (field key, Japanese header label)
pub const WORK_RECORD_COLUMNS: [(&str, &str); 13] = [
    ("project_name", "プロジェクト名"),
    ("project_code", "プロジェクトコード"),
    ("client_name", "クライアント名"),
    ("role_title", "役割"),
    ("start_date", "開始日"),
    ("end_date", "終了日"),
    ("participation_rate", "参画率"),
    ("team_size", "チーム人数"),
    ("status", "ステータス"),
    ("technologies", "使用技術"),
    ("responsibilities", "担当業務"),
    ("achievements", "成果"),
    ("description", "説明"),
];

/// Columns a bulk file must contain
pub const REQUIRED_WORK_RECORD_COLUMNS: [&str; 5] = [
    "project_name",
    "project_code",
    "role_title",
    "start_date",
    "status",
];

/// Resolve a header cell (English key or Japanese label) to its field key
pub fn work_record_column_key(header: &str) -> Option<&'static str> {
    let header = header.trim();
    WORK_RECORD_COLUMNS
        .iter()
        .find(|(key, label)| header.eq_ignore_ascii_case(key) || header == *label)
        .map(|(key, _)| *key)
}

/// One candidate work record as read from a file, cells kept as text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WorkRecordRow {
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub project_code: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub role_title: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub participation_rate: String,
    #[serde(default)]
    pub team_size: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub technologies: String,
    #[serde(default)]
    pub responsibilities: String,
    #[serde(default)]
    pub achievements: String,
    #[serde(default)]
    pub description: String,
}

impl WorkRecordRow {
    /// Set a cell by field key; unknown keys are ignored
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into().trim().to_string();
        let slot = match key {
            "project_name" => &mut self.project_name,
            "project_code" => &mut self.project_code,
            "client_name" => &mut self.client_name,
            "role_title" => &mut self.role_title,
            "start_date" => &mut self.start_date,
            "end_date" => &mut self.end_date,
            "participation_rate" => &mut self.participation_rate,
            "team_size" => &mut self.team_size,
            "status" => &mut self.status,
            "technologies" => &mut self.technologies,
            "responsibilities" => &mut self.responsibilities,
            "achievements" => &mut self.achievements,
            "description" => &mut self.description,
            _ => return,
        };
        *slot = value;
    }

    /// True when every cell is empty
    pub fn is_blank(&self) -> bool {
        [
            &self.project_name,
            &self.project_code,
            &self.client_name,
            &self.role_title,
            &self.start_date,
            &self.end_date,
            &self.participation_rate,
            &self.team_size,
            &self.status,
            &self.technologies,
            &self.responsibilities,
            &self.achievements,
            &self.description,
        ]
        .iter()
        .all(|cell| cell.trim().is_empty())
    }
}
