//! Data models for the application
//!
//! This module contains all data structures used throughout the application,
//! organized by domain. Each sub-module represents a specific feature area.

mod bulk;
mod career;
mod certification;
mod employee;
mod master;
mod skill;
mod training;
mod work_record;

// Re-export all models for convenient imports
pub use bulk::*;
pub use career::*;
pub use certification::*;
pub use employee::*;
pub use master::*;
pub use skill::*;
pub use training::*;
pub use work_record::*;
