use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Token handling errors
#[derive(Debug)]
pub enum TokenError {
    /// No Authorization header was supplied
    Missing,

    /// Header is present but not "Bearer <token>"
    InvalidFormat,

    /// Token has expired
    Expired,

    /// Signature or claim verification failed
    Invalid(String),

    /// Signing a new token failed
    Creation(String),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::Missing => write!(f, "Authorization header is required"),
            TokenError::InvalidFormat => {
                write!(f, "Invalid token format (expected 'Bearer <token>')")
            }
            TokenError::Expired => write!(f, "Token has expired"),
            TokenError::Invalid(msg) => write!(f, "Invalid token: {}", msg),
            TokenError::Creation(msg) => write!(f, "Failed to create token: {}", msg),
        }
    }
}

impl std::error::Error for TokenError {}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id as a string)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Owning user's database id
    pub user_id: i64,

    /// Marks the demo identity; tokens issued before this claim
    /// existed simply read as writable
    #[serde(default)]
    pub read_only: bool,
}

/// Issues and verifies the HS256 session tokens
#[derive(Clone)]
pub struct TokenManager {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lifetime_hours: i64,
}

impl TokenManager {
    pub fn new(secret: &str, lifetime_hours: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 60; // seconds of clock skew

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifetime_hours,
        }
    }

    /// Sign a fresh token for a user
    pub fn issue(&self, user_id: i64, read_only: bool) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + self.lifetime_hours * 3600,
            user_id,
            read_only,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Creation(e.to_string()))
    }

    /// Validate a raw token (no "Bearer " prefix) and return its claims
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let token_data =
            decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Invalid(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }

    /// Extract the raw token from an Authorization header value
    pub fn extract_bearer(auth_header: &str) -> Result<&str, TokenError> {
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(TokenError::InvalidFormat)?;

        if token.is_empty() {
            return Err(TokenError::Missing);
        }

        Ok(token)
    }
}
