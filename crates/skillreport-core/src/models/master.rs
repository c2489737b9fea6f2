use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Department master data
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Department {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub sort_order: i32,
}

/// Position (job title) master data
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Position {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub sort_order: i32,
}

/// Skill category master data
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SkillCategory {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub sort_order: i32,
}
