use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "goal_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    NotStarted,
    InProgress,
    Achieved,
    Abandoned,
}

/// Career goal set by an employee
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CareerGoal {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub status: GoalStatus,
    /// 1 (high) to 3 (low)
    pub priority: i32,
    /// Percentage 0-100
    pub progress: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct CareerGoalRequest {
    #[validate(length(min = 1, max = 200, message = "目標は1〜200文字で入力してください"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 2000, message = "説明は2000文字以内で入力してください"))]
    pub description: Option<String>,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
    pub status: GoalStatus,
    #[validate(range(min = 1, max = 3, message = "優先度は1〜3で指定してください"))]
    pub priority: i32,
    #[serde(default)]
    #[validate(range(min = 0, max = 100, message = "進捗は0〜100で指定してください"))]
    pub progress: i32,
}

/// Concrete step towards a career goal
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ActionPlan {
    pub id: Uuid,
    pub goal_id: Uuid,
    pub title: String,
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct ActionPlanRequest {
    #[validate(length(min = 1, max = 200, message = "アクションは1〜200文字で入力してください"))]
    pub title: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
}

/// Goal together with its action plans
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CareerGoalDetail {
    #[serde(flatten)]
    pub goal: CareerGoal,
    pub action_plans: Vec<ActionPlan>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_and_progress_bounds() {
        let req = CareerGoalRequest {
            title: "テックリードになる".to_string(),
            description: None,
            target_date: None,
            status: GoalStatus::NotStarted,
            priority: 4,
            progress: 120,
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("priority"));
        assert!(fields.contains_key("progress"));
    }

    #[test]
    fn test_goal_status_deserializes() {
        let status: GoalStatus = serde_json::from_str("\"not_started\"").unwrap();
        assert_eq!(status, GoalStatus::NotStarted);
    }
}
