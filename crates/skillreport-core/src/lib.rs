//! Skill Report Core Library
//!
//! This crate provides core domain models, error types, configuration, and validation
//! that are shared across all Skill Report components.

pub mod config;
pub mod error;
pub mod models;
pub mod persistence;
pub mod validation;

// Re-export commonly used types
pub use config::{BaseConfig, BulkConfig, Config, SkillReportConfig};
pub use error::{AppError, ErrorMetadata, InvalidField, LogLevel};
pub use persistence::WorkRecordStore;
