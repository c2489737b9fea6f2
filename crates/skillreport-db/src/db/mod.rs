//! Database repositories for data access layer
//!
//! Repositories are organized into employee/ (profile and the per-employee records:
//! skills, certifications, trainings, career goals, work records) and master data.
//! Each repository is responsible for a specific domain entity and provides CRUD
//! operations and specialized queries.
//
// Per-employee repositories
pub mod employee;
//
// Seeded master data (departments, positions, skill categories)
pub mod master;
//
// Constraint violation mapping
pub mod errors;
//
// Transaction utilities
pub mod transaction;

pub use employee::{
    CareerRepository, CertificationRepository, ProfileRepository, SkillRepository,
    TrainingRepository, WorkRecordRepository,
};
pub use master::MasterRepository;
