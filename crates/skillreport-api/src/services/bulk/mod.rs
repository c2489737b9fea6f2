//! Bulk work-record upload pipeline

pub mod parser;
pub mod service;
pub mod store;
pub mod template;
pub mod wizard;

pub use parser::parse_rows;
pub use service::BulkUploadService;
pub use store::{spawn_sweeper, ValidationStore};
pub use template::TemplateFormat;
pub use wizard::{UploadWizard, WizardError, WizardState, WizardStep};
