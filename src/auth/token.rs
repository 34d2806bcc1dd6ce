use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Claims encoded within an issued bearer token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's email.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Issues and validates signed, time-limited bearer tokens.
///
/// The signing secret and TTL are fixed at construction; rotating the secret
/// invalidates every previously issued token. Both `issue` and `validate`
/// take the clock as an argument rather than reading it themselves.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Produces a signed token for `subject` expiring one TTL after `now`.
    pub fn issue(&self, subject: &str, now: DateTime<Utc>) -> Result<String, AppError> {
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to issue token: {}", e)))
    }

    /// Verifies signature and expiry and returns the token's subject.
    ///
    /// Every failure mode comes back as `Unauthorized`: malformed token, bad
    /// signature, expired token, missing subject. A token is expired from the
    /// exact expiry instant onward, with no leeway.
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<String, AppError> {
        let mut validation = Validation::default();
        // Expiry is checked below against the caller's clock, not the
        // library's wall clock with its built-in leeway.
        validation.validate_exp = false;

        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;

        if now.timestamp() >= data.claims.exp {
            return Err(AppError::Unauthorized("Token has expired".to_string()));
        }
        if data.claims.sub.is_empty() {
            return Err(AppError::Unauthorized("Token has no subject".to_string()));
        }

        Ok(data.claims.sub)
    }
}
