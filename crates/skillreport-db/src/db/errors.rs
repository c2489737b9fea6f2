//! Mapping of PostgreSQL constraint violations onto domain errors

use skillreport_core::AppError;

/// Translate unique / foreign-key violations; every other error stays a database error.
pub fn map_constraint_error(
    err: sqlx::Error,
    on_unique: impl FnOnce() -> AppError,
    on_foreign_key: impl FnOnce() -> AppError,
) -> AppError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
        if db_err.is_foreign_key_violation() {
            return on_foreign_key();
        }
    }
    AppError::Database(err)
}
