use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Application role of an employee (matches database enum)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "employee_role", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeRole {
    Admin,
    Manager,
    Member,
}

impl EmployeeRole {
    /// Admins may modify anyone's data
    pub fn can_write_others(&self) -> bool {
        matches!(self, EmployeeRole::Admin)
    }

    /// Admins and managers may read anyone's data
    pub fn can_read_others(&self) -> bool {
        matches!(self, EmployeeRole::Admin | EmployeeRole::Manager)
    }
}

impl Display for EmployeeRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            EmployeeRole::Admin => write!(f, "admin"),
            EmployeeRole::Manager => write!(f, "manager"),
            EmployeeRole::Member => write!(f, "member"),
        }
    }
}

/// Employee profile joined with department and position names
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub employee_number: String,
    pub last_name: String,
    pub first_name: String,
    pub last_name_kana: Option<String>,
    pub first_name_kana: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub department_id: Option<Uuid>,
    pub department_name: Option<String>,
    pub position_id: Option<Uuid>,
    pub position_name: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub bio: Option<String>,
    pub role: EmployeeRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for updating a profile (full replacement of editable fields)
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 50, message = "姓は1〜50文字で入力してください"))]
    pub last_name: String,
    #[validate(length(min = 1, max = 50, message = "名は1〜50文字で入力してください"))]
    pub first_name: String,
    #[serde(default)]
    #[validate(custom(function = "crate::validation::validate_katakana"))]
    pub last_name_kana: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "crate::validation::validate_katakana"))]
    pub first_name_kana: Option<String>,
    #[validate(email(message = "メールアドレスの形式が正しくありません"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "crate::validation::validate_phone"))]
    pub phone: Option<String>,
    #[serde(default)]
    pub department_id: Option<Uuid>,
    #[serde(default)]
    pub position_id: Option<Uuid>,
    #[serde(default)]
    pub hire_date: Option<NaiveDate>,
    #[serde(default)]
    #[validate(length(max = 1000, message = "自己紹介は1000文字以内で入力してください"))]
    pub bio: Option<String>,
}

impl UpdateProfileRequest {
    /// Drop empty optional strings so they are stored as NULL
    pub fn normalized(mut self) -> Self {
        fn blank_to_none(value: Option<String>) -> Option<String> {
            value
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        }
        self.last_name = self.last_name.trim().to_string();
        self.first_name = self.first_name.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        self.last_name_kana = blank_to_none(self.last_name_kana);
        self.first_name_kana = blank_to_none(self.first_name_kana);
        self.phone = blank_to_none(self.phone);
        self.bio = blank_to_none(self.bio);
        self
    }
}
