pub mod password;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::access::{Principal, ResourceStore};
use crate::config::SecurityConfig;

/// Why a bearer token did not resolve to a principal.
///
/// Everything except `Backend` is an expected outcome and leaves the request
/// anonymous; `Backend` is a collaborator fault.
#[derive(Debug, Error)]
pub enum AuthFailure {
    #[error("Missing Authorization header")]
    MissingToken,

    #[error("Authorization header must use Bearer token format")]
    MalformedHeader,

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),

    #[error("User {0} is unknown or inactive")]
    UnknownPrincipal(i64),

    #[error("Authentication backend error: {0}")]
    Backend(String),
}

/// Resolves a bearer token to the acting principal.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, bearer_token: &str) -> Result<Principal, AuthFailure>;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// Fails instead of panicking when the expiry does not fit a timestamp
    pub fn new(user_id: i64, expiry_hours: u64) -> Result<Self, AuthFailure> {
        let now = Utc::now();
        let expires_at = i64::try_from(expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| AuthFailure::Backend(format!("JWT expiry of {} hours is out of range", expiry_hours)))?;

        Ok(Self {
            id: user_id,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        })
    }
}

/// HS256 bearer tokens whose `id` claim names an active user.
pub struct JwtAuthenticator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_hours: u64,
    store: Arc<dyn ResourceStore>,
}

impl JwtAuthenticator {
    pub fn new(security: &SecurityConfig, store: Arc<dyn ResourceStore>) -> Self {
        let secret = security.jwt_secret.as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expiry_hours: security.jwt_expiry_hours,
            store,
        }
    }

    pub fn expires_in_secs(&self) -> Result<u64, AuthFailure> {
        self.expiry_hours
            .checked_mul(3600)
            .ok_or_else(|| AuthFailure::Backend(format!("JWT expiry of {} hours is out of range", self.expiry_hours)))
    }

    /// Sign a token for `user_id`
    pub fn issue(&self, user_id: i64) -> Result<String, AuthFailure> {
        let claims = Claims::new(user_id, self.expiry_hours)?;
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthFailure::Backend(format!("JWT generation error: {}", e)))
    }

    /// Validate signature and expiry, returning the claims
    pub fn verify(&self, token: &str) -> Result<Claims, AuthFailure> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| AuthFailure::InvalidToken(e.to_string()))
    }
}

#[async_trait]
impl Authenticator for JwtAuthenticator {
    async fn authenticate(&self, bearer_token: &str) -> Result<Principal, AuthFailure> {
        let claims = self.verify(bearer_token)?;

        let principal = self
            .store
            .principal(claims.id)
            .await
            .map_err(|e| AuthFailure::Backend(e.to_string()))?
            .ok_or(AuthFailure::UnknownPrincipal(claims.id))?;

        tracing::debug!("Authenticated user {} (admin: {})", principal.id, principal.is_admin);
        Ok(principal)
    }
}
