//! Configuration validation
//!
//! Startup checks on top of `Config::validate`, run before anything connects.

use anyhow::Result;
use skillreport_core::Config;

/// Fail fast on settings that would make the service insecure or unusable
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    let is_production = config.is_production();
    let env_var = std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .ok();
    if is_production && env_var.is_none() {
        tracing::warn!(
            "Production mode detected but ENVIRONMENT/APP_ENV not set - error details may leak"
        );
    }

    if is_production && config.cors_origins().iter().any(|o| o == "*") {
        return Err(anyhow::anyhow!(
            "CORS configured to allow all origins (*) in production. \
            Set explicit origins via CORS_ORIGINS."
        ));
    }

    if config.db_timeout_seconds() == 0 {
        return Err(anyhow::anyhow!("Database timeout cannot be 0"));
    }

    if config.jwt_expiry_hours() <= 0 {
        return Err(anyhow::anyhow!("JWT_EXPIRY_HOURS must be positive"));
    }

    let bulk = config.bulk();
    if bulk.validation_ttl_secs < 60 {
        tracing::warn!(
            validation_ttl_secs = bulk.validation_ttl_secs,
            "Bulk validation TTL is under a minute - users may lose runs before executing"
        );
    }

    tracing::info!("Configuration validation passed");
    Ok(())
}
