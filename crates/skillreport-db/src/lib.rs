//! Skill Report database layer
//!
//! PostgreSQL repositories built on sqlx. Each repository owns a clone of the
//! connection pool and maps rows onto the models in `skillreport-core`.

pub mod db;

pub use db::*;
