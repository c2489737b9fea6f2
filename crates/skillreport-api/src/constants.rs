//! API constants

/// Prefix of every JSON API route
pub const API_PREFIX: &str = "/api";
