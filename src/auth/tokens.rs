//! JWT issuance and verification

use crate::config::AuthConfig;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::SessionError;

/// JWT claims carried by both token kinds
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Unique token id, fresh per issuance. Timestamps alone are
    /// second-granular, so without this two tokens minted in the
    /// same second would be byte-identical and rotation would
    /// replace a refresh token with itself.
    pub jti: String,
    /// Issued at
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
}

impl Claims {
    fn new(user_id: &str, ttl_secs: i64) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            jti: uuid::Uuid::new_v4().to_string(),
            iat: now,
            exp: now + ttl_secs,
        }
    }
}

/// Signs and verifies access and refresh tokens.
///
/// The two kinds use distinct secrets, so a refresh token never
/// verifies as an access token or vice versa.
#[derive(Clone)]
pub struct TokenIssuer {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(config.access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            access_ttl_secs: config.access_ttl_secs,
            refresh_ttl_secs: config.refresh_ttl_secs,
        }
    }

    /// Sign a short-lived access token for a user
    pub fn issue_access_token(&self, user_id: &str) -> Result<String, SessionError> {
        let claims = Claims::new(user_id, self.access_ttl_secs);
        encode(&Header::default(), &claims, &self.access_encoding)
            .map_err(|_| SessionError::InvalidToken)
    }

    /// Sign a long-lived refresh token for a user
    pub fn issue_refresh_token(&self, user_id: &str) -> Result<String, SessionError> {
        let claims = Claims::new(user_id, self.refresh_ttl_secs);
        encode(&Header::default(), &claims, &self.refresh_encoding)
            .map_err(|_| SessionError::InvalidToken)
    }

    /// Verify an access token: signature, expiry, shape
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, SessionError> {
        decode::<Claims>(token, &self.access_decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| SessionError::InvalidToken)
    }

    /// Verify a refresh token against the refresh secret
    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, SessionError> {
        decode::<Claims>(token, &self.refresh_decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| SessionError::InvalidToken)
    }
}
