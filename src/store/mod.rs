//! Persistence traits and the in-memory document store
//!
//! The session core and the HTTP handlers only see these traits; the
//! in-memory implementation stands in for the document database and
//! keeps the whole stack testable without external services.

mod memory;

pub use memory::{MemorySubscriptionStore, MemoryTweetStore, MemoryUserStore};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::auth::UserAccount;
use crate::error::Result;

/// Credential store: user records keyed by id, with unique username
/// and email.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, account: UserAccount) -> Result<()>;

    async fn find_by_id(&self, id: &str) -> Result<Option<UserAccount>>;

    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>>;

    /// Unconditionally overwrite the stored refresh token. Returns
    /// false when the user does not exist. An empty token revokes.
    async fn set_refresh_token(&self, id: &str, token: &str) -> Result<bool>;

    /// Replace the refresh token only if the stored value still
    /// equals `expected`. Returns false on mismatch or missing user.
    /// This is what keeps rotation sound under concurrent refreshes.
    async fn swap_refresh_token(&self, id: &str, expected: &str, new: &str) -> Result<bool>;

    async fn set_password_hash(&self, id: &str, password_hash: &str) -> Result<bool>;

    /// Patch profile fields, returning the updated record
    async fn update_profile(
        &self,
        id: &str,
        fullname: Option<String>,
        email: Option<String>,
    ) -> Result<Option<UserAccount>>;
}

/// A short text post owned by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tweet {
    pub id: String,
    pub owner: String,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Tweet {
    pub fn new(owner: String, content: String) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner,
            content,
            created_at: now,
            updated_at: now,
        }
    }
}

#[async_trait]
pub trait TweetStore: Send + Sync {
    async fn insert(&self, tweet: Tweet) -> Result<()>;

    async fn find(&self, id: &str) -> Result<Option<Tweet>>;

    /// All tweets by one user, newest first
    async fn by_owner(&self, owner: &str) -> Result<Vec<Tweet>>;

    async fn update_content(&self, id: &str, content: &str) -> Result<Option<Tweet>>;

    async fn delete(&self, id: &str) -> Result<bool>;
}

/// Subscriber/channel edges between users. Both ends are user ids;
/// a pair appears at most once.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Flip the subscription state, returning true when the edge now
    /// exists.
    async fn toggle(&self, subscriber: &str, channel: &str) -> Result<bool>;

    async fn is_subscribed(&self, subscriber: &str, channel: &str) -> Result<bool>;

    /// User ids subscribed to a channel
    async fn subscribers_of(&self, channel: &str) -> Result<Vec<String>>;

    /// Channel ids a user is subscribed to
    async fn channels_of(&self, subscriber: &str) -> Result<Vec<String>>;

    async fn subscriber_count(&self, channel: &str) -> Result<usize>;

    async fn subscription_count(&self, subscriber: &str) -> Result<usize>;
}
