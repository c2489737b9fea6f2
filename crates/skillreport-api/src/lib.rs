//! SkillReport API Library
//!
//! HTTP handlers, middleware, the bulk upload pipeline and application setup.

pub mod api_doc;
pub mod auth;
pub mod constants;
pub mod error;
mod handlers;
pub mod middleware;
pub mod services;
pub mod setup;
pub mod state;
mod telemetry;
pub mod utils;

pub use error::ErrorResponse;
pub use services::bulk::{BulkUploadService, UploadWizard, ValidationStore};
