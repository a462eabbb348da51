use crate::data::models::user::UserRole;
use crate::security::errors::AuthError;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Issues and verifies HS256 access tokens.
#[derive(Clone)]
pub struct JwtService {
    secret: Arc<str>,
    expiration_minutes: u64,
}

impl JwtService {
    pub fn new(secret: &str, expiration_minutes: u64) -> Self {
        JwtService {
            secret: Arc::from(secret),
            expiration_minutes,
        }
    }

    pub fn generate_token(&self, user_id: i32, role: UserRole) -> Result<String, AuthError> {
        let curr_time = chrono::Utc::now().timestamp() as usize;
        let exp = self
            .expiration_minutes
            .checked_mul(60)
            .and_then(|secs| usize::try_from(secs).ok())
            .and_then(|secs| curr_time.checked_add(secs))
            .ok_or(AuthError::TokenCreationError)?;

        let claims = AccessClaims {
            sub: user_id,
            role,
            iat: curr_time,
            exp,
        };

        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|_| AuthError::TokenCreationError)?;

        tracing::debug!(user_id, role = role.as_str(), "Token generated");

        Ok(token)
    }

    pub fn decode_token<T: for<'de> Deserialize<'de>>(&self, token: &str) -> Result<T, AuthError> {
        let validation = Validation::default();

        let token_data = jsonwebtoken::decode::<T>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?;

        Ok(token_data.claims)
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("expiration_minutes", &self.expiration_minutes)
            .finish_non_exhaustive()
    }
}

/// Identity attached to a request by the bearer-token extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: i32,
    pub role: UserRole,
    /// Issued at (as UTC timestamp)
    pub iat: usize,
    /// Expiration time (as UTC timestamp)
    pub exp: usize,
}

impl AccessClaims {
    pub fn user_id(&self) -> i32 {
        self.sub
    }
}
