//! HS256 JWT issuing and verification

use crate::auth::models::{AuthOutcome, JwtClaims};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use skillreport_core::models::EmployeeRole;
use skillreport_core::AppError;
use uuid::Uuid;

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_hours: i64,
}

impl JwtService {
    pub fn new(secret: &str, expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_hours,
        }
    }

    pub fn issue_token(
        &self,
        user_id: Uuid,
        employee_id: Uuid,
        role: EmployeeRole,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: user_id,
            employee_id,
            role,
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.expiry_hours)).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    fn decode_claims(&self, token: &str) -> Result<JwtClaims, jsonwebtoken::errors::Error> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<JwtClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
    }

    /// Verify a token and report who it belongs to
    pub fn verify_token(&self, token: &str) -> AuthOutcome {
        match self.decode_claims(token) {
            Ok(claims) => AuthOutcome {
                success: true,
                user_id: Some(claims.sub),
                employee_id: Some(claims.employee_id),
                role: Some(claims.role),
            },
            Err(e) => {
                tracing::debug!(error = %e, "JWT verification failed");
                AuthOutcome::failed()
            }
        }
    }
}
