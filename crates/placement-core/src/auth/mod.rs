//! Authentication module - bearer token verification and report authorization

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::error::{Error, Result};
use crate::models::{Claims, ReportRequest, ReportType};

const TOKEN_EXPIRY_DAYS: i64 = 7;

/// Only principals with this role may download reports
pub const STUDENT_ROLE: &str = "student";

/// JWT secret - reads from environment variable or generates a random key.
/// In production, set PLACEMENT_JWT_SECRET environment variable
pub fn load_jwt_secret() -> Vec<u8> {
    match std::env::var("PLACEMENT_JWT_SECRET") {
        Ok(secret) if secret.len() >= 32 => secret.into_bytes(),
        Ok(secret) if !secret.is_empty() => {
            log::warn!("PLACEMENT_JWT_SECRET is shorter than 32 characters. Consider using a longer secret.");
            secret.into_bytes()
        }
        _ => {
            // Tokens won't survive a restart with a generated secret
            log::warn!("PLACEMENT_JWT_SECRET not set. Generating random secret.");
            use rand::Rng;
            let mut rng = rand::thread_rng();
            (0..64).map(|_| rng.gen::<u8>()).collect()
        }
    }
}

/// Signing and verification keys for bearer tokens
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Create a JWT token for a principal
    pub fn issue(&self, sub: &str, role: &str) -> Result<String> {
        let expiration = Utc::now()
            .checked_add_signed(Duration::days(TOKEN_EXPIRY_DAYS))
            .ok_or_else(|| Error::validation("token expiry out of range"))?
            .timestamp();

        let claims = Claims {
            sub: sub.to_string(),
            role: role.to_string(),
            exp: expiration,
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Verify and decode a JWT token
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(token_data.claims)
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value
pub fn bearer_token(header: Option<&str>) -> Result<&str> {
    let header = header.ok_or_else(|| Error::unauthenticated("Authentication required"))?;
    match header.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(Error::unauthenticated("Authentication required")),
    }
}

/// Resolve the caller of a report download.
///
/// Missing or invalid credentials are `Unauthenticated`; a valid token whose
/// role is not `student` is `Forbidden`.
pub fn authenticate_student(keys: &TokenKeys, header: Option<&str>) -> Result<Claims> {
    let token = bearer_token(header)?;
    let claims = keys.verify(token).map_err(|e| {
        log::debug!("Rejected bearer token: {}", e);
        Error::unauthenticated("Invalid token")
    })?;

    if claims.role != STUDENT_ROLE {
        return Err(Error::forbidden("Access denied"));
    }

    Ok(claims)
}

/// Precondition on a request: individual reports belong to their student only
pub fn authorize(claims: &Claims, request: &ReportRequest) -> Result<()> {
    if request.report_type == ReportType::Individual.as_str()
        && request.student_id.as_deref() != Some(claims.sub.as_str())
    {
        return Err(Error::forbidden("Unauthorized access to report"));
    }
    Ok(())
}
