//! Account and session models

use serde::{Deserialize, Serialize};

/// A stored user record.
///
/// `password_hash` and `refresh_token` never leave the server; every
/// response carries a [`UserProfile`] instead. An empty
/// `refresh_token` means no session is refreshable for this user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    /// Unique user identifier, immutable after registration
    pub id: String,
    /// Login name, stored lowercase, unique
    pub username: String,
    /// Unique email address
    pub email: String,
    /// Display name
    pub fullname: String,
    /// Avatar image URL
    pub avatar: String,
    /// Cover image URL (optional, empty when unset)
    pub cover_image: String,
    pub password_hash: String,
    /// Currently valid refresh token, empty when logged out.
    /// At most one value is valid at a time; issuing a new token
    /// overwrites this field.
    pub refresh_token: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl UserAccount {
    pub fn new(
        username: String,
        email: String,
        fullname: String,
        avatar: String,
        cover_image: String,
        password_hash: String,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.to_lowercase(),
            email,
            fullname,
            avatar,
            cover_image,
            password_hash,
            refresh_token: String::new(),
            created_at: chrono::Utc::now(),
        }
    }

    /// Strip credentials for use in responses
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            fullname: self.fullname.clone(),
            avatar: self.avatar.clone(),
            cover_image: self.cover_image.clone(),
            created_at: self.created_at,
        }
    }
}

/// Sanitized user view: a [`UserAccount`] without `password_hash`
/// and `refresh_token`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    pub fullname: String,
    pub avatar: String,
    pub cover_image: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Registration input
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub fullname: String,
    pub password: String,
    /// Avatar URL; media upload itself happens elsewhere
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
}

/// Which field to match a login attempt against.
///
/// The boundary layer requires at least one of username/email and
/// prefers username when both are present. Username matching is
/// case-insensitive (accounts store usernames lowercased).
#[derive(Debug, Clone)]
pub enum LoginIdentifier {
    Username(String),
    Email(String),
}

impl LoginIdentifier {
    /// Build from optional request fields, username taking precedence
    pub fn from_parts(username: Option<String>, email: Option<String>) -> Option<Self> {
        match (username, email) {
            (Some(u), _) if !u.trim().is_empty() => Some(Self::Username(u)),
            (_, Some(e)) if !e.trim().is_empty() => Some(Self::Email(e)),
            _ => None,
        }
    }
}

/// Access/refresh pair returned by login and refresh. Never persisted
/// as a whole; only the refresh half is stored on the account for
/// rotation checks.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Result of a successful login or refresh
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedSession {
    pub user: UserProfile,
    pub access_token: String,
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_normalized_to_lowercase() {
        let user = UserAccount::new(
            "Alice".to_string(),
            "alice@x.com".to_string(),
            "Alice A".to_string(),
            String::new(),
            String::new(),
            "hash".to_string(),
        );
        assert_eq!(user.username, "alice");
    }

    #[test]
    fn test_profile_strips_credentials() {
        let user = UserAccount::new(
            "bob".to_string(),
            "bob@x.com".to_string(),
            "Bob B".to_string(),
            String::new(),
            String::new(),
            "hash".to_string(),
        );
        let json = serde_json::to_value(user.profile()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("refresh_token").is_none());
        assert_eq!(json["username"], "bob");
    }

    #[test]
    fn test_login_identifier_prefers_username() {
        let id = LoginIdentifier::from_parts(
            Some("alice".to_string()),
            Some("alice@x.com".to_string()),
        );
        assert!(matches!(id, Some(LoginIdentifier::Username(_))));
    }

    #[test]
    fn test_login_identifier_requires_one() {
        assert!(LoginIdentifier::from_parts(None, None).is_none());
        assert!(LoginIdentifier::from_parts(Some("  ".to_string()), None).is_none());
    }
}
