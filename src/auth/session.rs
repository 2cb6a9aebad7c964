//! Session lifecycle: login, refresh rotation, logout, password change
//!
//! All session state lives on the user record in the credential
//! store; the manager itself holds no mutable state and every
//! operation is a short lookup-verify-write sequence.

use std::sync::Arc;

use thiserror::Error;

use crate::store::UserStore;

use super::models::{
    AuthenticatedSession, LoginIdentifier, NewUser, TokenPair, UserAccount, UserProfile,
};
use super::password::{hash_password, verify_password};
use super::tokens::TokenIssuer;

/// Typed failure outcomes of session operations. The boundary layer
/// maps each variant to an HTTP status; none of them carry internal
/// detail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("user does not exist")]
    NotFound,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("refresh token mismatch")]
    TokenMismatch,

    #[error("unauthorized request")]
    Unauthorized,

    #[error("username or email already exists")]
    AlreadyExists,

    #[error("store error: {0}")]
    Store(String),
}

/// Orchestrates the credential store, password hasher and token
/// issuer. Cheap to clone; all handlers share one instance.
#[derive(Clone)]
pub struct SessionManager {
    users: Arc<dyn UserStore>,
    tokens: TokenIssuer,
}

impl SessionManager {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenIssuer) -> Self {
        Self { users, tokens }
    }

    pub fn users(&self) -> &Arc<dyn UserStore> {
        &self.users
    }

    /// Create a new account. Username is stored lowercase; duplicate
    /// username or email is rejected.
    pub async fn register(&self, new_user: NewUser) -> Result<UserProfile, SessionError> {
        let username = new_user.username.trim().to_lowercase();
        let email = new_user.email.trim().to_string();

        if username.is_empty()
            || email.is_empty()
            || new_user.fullname.trim().is_empty()
            || new_user.password.is_empty()
        {
            return Err(SessionError::InvalidCredentials);
        }

        if self.find_by_username(&username).await?.is_some()
            || self.find_by_email(&email).await?.is_some()
        {
            return Err(SessionError::AlreadyExists);
        }

        let password_hash =
            hash_password(&new_user.password).map_err(|e| SessionError::Store(e.to_string()))?;

        let account = UserAccount::new(
            username,
            email,
            new_user.fullname.trim().to_string(),
            new_user.avatar.unwrap_or_default(),
            new_user.cover_image.unwrap_or_default(),
            password_hash,
        );
        let profile = account.profile();

        self.users
            .insert(account)
            .await
            .map_err(|e| SessionError::Store(e.to_string()))?;

        tracing::info!(username = %profile.username, "user registered");
        Ok(profile)
    }

    /// Verify credentials and open a session.
    ///
    /// On success a fresh token pair is issued and the refresh token
    /// is persisted on the account, overwriting any prior value. That
    /// overwrite is the rotation invariant: at most one refresh token
    /// is valid per user. Exactly one store write happens, and only
    /// after the password check passes.
    pub async fn login(
        &self,
        identifier: &LoginIdentifier,
        password: &str,
    ) -> Result<AuthenticatedSession, SessionError> {
        let account = match identifier {
            LoginIdentifier::Username(username) => {
                self.find_by_username(&username.to_lowercase()).await?
            }
            LoginIdentifier::Email(email) => self.find_by_email(email).await?,
        }
        .ok_or(SessionError::NotFound)?;

        let valid = verify_password(password, &account.password_hash)
            .map_err(|e| SessionError::Store(e.to_string()))?;
        if !valid {
            return Err(SessionError::InvalidCredentials);
        }

        let pair = self.issue_pair(&account.id)?;
        self.persist_refresh_token(&account.id, &pair.refresh_token)
            .await?;

        tracing::debug!(user_id = %account.id, "login succeeded");
        Ok(AuthenticatedSession {
            user: account.profile(),
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        })
    }

    /// Exchange a refresh token for a new pair.
    ///
    /// Refresh tokens are single-use: the presented token must match
    /// the stored one byte for byte, and the replacement is written
    /// with a compare-and-swap against the presented value so that
    /// concurrent refreshes cannot both succeed. Presenting a
    /// superseded token always fails with [`SessionError::TokenMismatch`],
    /// which bounds a leaked refresh token to one use.
    pub async fn refresh(
        &self,
        presented: Option<&str>,
    ) -> Result<AuthenticatedSession, SessionError> {
        let presented = presented.ok_or(SessionError::Unauthorized)?;

        let claims = self.tokens.verify_refresh_token(presented)?;

        let account = self
            .find_by_id(&claims.sub)
            .await?
            .ok_or(SessionError::NotFound)?;

        if account.refresh_token.is_empty() || account.refresh_token != presented {
            tracing::warn!(user_id = %account.id, "superseded refresh token presented");
            return Err(SessionError::TokenMismatch);
        }

        let pair = self.issue_pair(&account.id)?;
        let swapped = self
            .users
            .swap_refresh_token(&account.id, presented, &pair.refresh_token)
            .await
            .map_err(|e| SessionError::Store(e.to_string()))?;
        if !swapped {
            // Lost a race against a concurrent refresh or logout
            return Err(SessionError::TokenMismatch);
        }

        Ok(AuthenticatedSession {
            user: account.profile(),
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        })
    }

    /// Revoke the user's refresh token. Access tokens already issued
    /// expire naturally; refresh attempts fail until the next login.
    pub async fn logout(&self, user_id: &str) -> Result<(), SessionError> {
        let cleared = self
            .users
            .set_refresh_token(user_id, "")
            .await
            .map_err(|e| SessionError::Store(e.to_string()))?;
        if !cleared {
            return Err(SessionError::NotFound);
        }
        tracing::debug!(user_id = %user_id, "logged out");
        Ok(())
    }

    /// Replace the password after verifying the old one. Outstanding
    /// refresh tokens are left untouched.
    pub async fn change_password(
        &self,
        user_id: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), SessionError> {
        let account = self
            .find_by_id(user_id)
            .await?
            .ok_or(SessionError::NotFound)?;

        let valid = verify_password(old_password, &account.password_hash)
            .map_err(|e| SessionError::Store(e.to_string()))?;
        if !valid {
            return Err(SessionError::InvalidCredentials);
        }

        let new_hash =
            hash_password(new_password).map_err(|e| SessionError::Store(e.to_string()))?;
        self.users
            .set_password_hash(user_id, &new_hash)
            .await
            .map_err(|e| SessionError::Store(e.to_string()))?;

        Ok(())
    }

    /// Resolve an access token to a sanitized user, for the request
    /// guard.
    pub async fn authenticate(&self, token: Option<&str>) -> Result<UserProfile, SessionError> {
        let token = token.ok_or(SessionError::Unauthorized)?;
        let claims = self.tokens.verify_access_token(token)?;
        let account = self
            .find_by_id(&claims.sub)
            .await?
            .ok_or(SessionError::Unauthorized)?;
        Ok(account.profile())
    }

    fn issue_pair(&self, user_id: &str) -> Result<TokenPair, SessionError> {
        Ok(TokenPair {
            access_token: self.tokens.issue_access_token(user_id)?,
            refresh_token: self.tokens.issue_refresh_token(user_id)?,
        })
    }

    async fn persist_refresh_token(
        &self,
        user_id: &str,
        token: &str,
    ) -> Result<(), SessionError> {
        let updated = self
            .users
            .set_refresh_token(user_id, token)
            .await
            .map_err(|e| SessionError::Store(e.to_string()))?;
        if !updated {
            return Err(SessionError::NotFound);
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserAccount>, SessionError> {
        self.users
            .find_by_id(id)
            .await
            .map_err(|e| SessionError::Store(e.to_string()))
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserAccount>, SessionError> {
        self.users
            .find_by_username(username)
            .await
            .map_err(|e| SessionError::Store(e.to_string()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, SessionError> {
        self.users
            .find_by_email(email)
            .await
            .map_err(|e| SessionError::Store(e.to_string()))
    }
}
