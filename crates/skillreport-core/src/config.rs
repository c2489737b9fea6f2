//! Configuration module
//!
//! Configuration for the HTTP service: database, authentication, CORS, logging and the
//! limits of the bulk work-record upload pipeline. Values come from the environment
//! (optionally a `.env` file loaded through `dotenvy`).

use std::env;

// Common constants
const SERVER_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const JWT_EXPIRY_HOURS: i64 = 24;
const REQUEST_TIMEOUT_SECS: u64 = 60;
const HTTP_CONCURRENCY_LIMIT: usize = 1024;
const BULK_MAX_FILE_SIZE_MB: usize = 10;
const BULK_MAX_ROWS: usize = 1000;
const BULK_VALIDATION_TTL_SECS: u64 = 1800;

/// Base configuration shared by every binary
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub environment: String,
    pub request_timeout_secs: u64,
    pub http_concurrency_limit: usize,
    /// "json" for structured log lines, anything else for the compact console format
    pub log_format: String,
}

/// Limits of the bulk upload pipeline
#[derive(Clone, Debug)]
pub struct BulkConfig {
    pub max_file_size_bytes: usize,
    pub max_rows: usize,
    pub validation_ttl_secs: u64,
}

impl Default for BulkConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: BULK_MAX_FILE_SIZE_MB * 1024 * 1024,
            max_rows: BULK_MAX_ROWS,
            validation_ttl_secs: BULK_VALIDATION_TTL_SECS,
        }
    }
}

/// Skill report service configuration
#[derive(Clone, Debug)]
pub struct SkillReportConfig {
    pub base: BaseConfig,
    pub database_url: String,
    pub bulk: BulkConfig,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<SkillReportConfig>);

impl Config {
    fn inner(&self) -> &SkillReportConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_environment(&self.inner().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = SkillReportConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn jwt_secret(&self) -> &str {
        &self.inner().base.jwt_secret
    }

    pub fn jwt_expiry_hours(&self) -> i64 {
        self.inner().base.jwt_expiry_hours
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn database_url(&self) -> &str {
        &self.inner().database_url
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.inner().base.request_timeout_secs
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.inner().base.http_concurrency_limit
    }

    pub fn log_format(&self) -> &str {
        &self.inner().base.log_format
    }

    pub fn bulk(&self) -> &BulkConfig {
        &self.inner().bulk
    }
}

fn is_production_environment(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl SkillReportConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production_environment(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            db_max_connections: env_or("DB_MAX_CONNECTIONS", MAX_CONNECTIONS),
            db_timeout_seconds: env_or("DB_TIMEOUT_SECONDS", CONNECTION_TIMEOUT_SECS),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            jwt_expiry_hours: env_or("JWT_EXPIRY_HOURS", JWT_EXPIRY_HOURS),
            environment,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", REQUEST_TIMEOUT_SECS).max(1),
            http_concurrency_limit: env_or("HTTP_CONCURRENCY_LIMIT", HTTP_CONCURRENCY_LIMIT)
                .max(1),
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "compact".to_string())
                .to_lowercase(),
        };

        let bulk = BulkConfig {
            max_file_size_bytes: env_or("BULK_MAX_FILE_SIZE_MB", BULK_MAX_FILE_SIZE_MB)
                * 1024
                * 1024,
            max_rows: env_or("BULK_MAX_ROWS", BULK_MAX_ROWS),
            validation_ttl_secs: env_or("BULK_VALIDATION_TTL_SECS", BULK_VALIDATION_TTL_SECS),
        };

        let config = SkillReportConfig {
            base,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            bulk,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if !self.database_url.starts_with("postgresql://")
            && !self.database_url.starts_with("postgres://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.base.db_max_connections == 0 {
            return Err(anyhow::anyhow!("DB_MAX_CONNECTIONS cannot be 0"));
        }

        if self.bulk.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("BULK_MAX_FILE_SIZE_MB cannot be 0"));
        }

        if self.bulk.max_rows == 0 {
            return Err(anyhow::anyhow!("BULK_MAX_ROWS cannot be 0"));
        }

        if self.bulk.validation_ttl_secs == 0 {
            return Err(anyhow::anyhow!("BULK_VALIDATION_TTL_SECS cannot be 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SkillReportConfig {
        SkillReportConfig {
            base: BaseConfig {
                server_port: 4000,
                cors_origins: vec!["*".to_string()],
                db_max_connections: 5,
                db_timeout_seconds: 30,
                jwt_secret: "a".repeat(32),
                jwt_expiry_hours: 24,
                environment: "development".to_string(),
                request_timeout_secs: 60,
                http_concurrency_limit: 16,
                log_format: "compact".to_string(),
            },
            database_url: "postgres://localhost/skillreport".to_string(),
            bulk: BulkConfig::default(),
        }
    }

    #[test]
    fn test_validate_accepts_sample() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_jwt_secret() {
        let mut config = sample();
        config.base.jwt_secret = "short".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn test_validate_rejects_non_postgres_url() {
        let mut config = sample();
        config.database_url = "mysql://localhost/db".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_bulk_limits() {
        let mut config = sample();
        config.bulk.max_rows = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_is_production() {
        let mut config = sample();
        config.base.environment = "PROD".to_string();
        assert!(Config(Box::new(config)).is_production());
        assert!(!Config(Box::new(sample())).is_production());
    }

    #[test]
    fn test_bulk_defaults() {
        let bulk = BulkConfig::default();
        assert_eq!(bulk.max_file_size_bytes, 10 * 1024 * 1024);
        assert_eq!(bulk.max_rows, 1000);
        assert_eq!(bulk.validation_ttl_secs, 1800);
    }
}
