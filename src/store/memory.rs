//! In-memory store implementations backed by `RwLock<HashMap>`

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::auth::UserAccount;
use crate::error::Result;

use super::{SubscriptionStore, Tweet, TweetStore, UserStore};

/// User records keyed by id
#[derive(Default)]
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<String, UserAccount>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, account: UserAccount) -> Result<()> {
        self.users
            .write()
            .await
            .insert(account.id.clone(), account);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserAccount>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn set_refresh_token(&self, id: &str, token: &str) -> Result<bool> {
        let mut users = self.users.write().await;
        match users.get_mut(id) {
            Some(user) => {
                user.refresh_token = token.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn swap_refresh_token(&self, id: &str, expected: &str, new: &str) -> Result<bool> {
        // Compare and write under one lock; concurrent refreshes with
        // the same token cannot both win.
        let mut users = self.users.write().await;
        match users.get_mut(id) {
            Some(user) if user.refresh_token == expected => {
                user.refresh_token = new.to_string();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn set_password_hash(&self, id: &str, password_hash: &str) -> Result<bool> {
        let mut users = self.users.write().await;
        match users.get_mut(id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_profile(
        &self,
        id: &str,
        fullname: Option<String>,
        email: Option<String>,
    ) -> Result<Option<UserAccount>> {
        let mut users = self.users.write().await;
        match users.get_mut(id) {
            Some(user) => {
                if let Some(fullname) = fullname {
                    user.fullname = fullname;
                }
                if let Some(email) = email {
                    user.email = email;
                }
                Ok(Some(user.clone()))
            }
            None => Ok(None),
        }
    }
}

/// Tweets keyed by id
#[derive(Default)]
pub struct MemoryTweetStore {
    tweets: Arc<RwLock<HashMap<String, Tweet>>>,
}

impl MemoryTweetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TweetStore for MemoryTweetStore {
    async fn insert(&self, tweet: Tweet) -> Result<()> {
        self.tweets.write().await.insert(tweet.id.clone(), tweet);
        Ok(())
    }

    async fn find(&self, id: &str) -> Result<Option<Tweet>> {
        Ok(self.tweets.read().await.get(id).cloned())
    }

    async fn by_owner(&self, owner: &str) -> Result<Vec<Tweet>> {
        let mut tweets: Vec<Tweet> = self
            .tweets
            .read()
            .await
            .values()
            .filter(|t| t.owner == owner)
            .cloned()
            .collect();
        tweets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tweets)
    }

    async fn update_content(&self, id: &str, content: &str) -> Result<Option<Tweet>> {
        let mut tweets = self.tweets.write().await;
        match tweets.get_mut(id) {
            Some(tweet) => {
                tweet.content = content.to_string();
                tweet.updated_at = chrono::Utc::now();
                Ok(Some(tweet.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.tweets.write().await.remove(id).is_some())
    }
}

/// Subscription edges as (subscriber, channel) pairs
#[derive(Default)]
pub struct MemorySubscriptionStore {
    edges: Arc<RwLock<Vec<(String, String)>>>,
}

impl MemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriptionStore for MemorySubscriptionStore {
    async fn toggle(&self, subscriber: &str, channel: &str) -> Result<bool> {
        let mut edges = self.edges.write().await;
        let before = edges.len();
        edges.retain(|(s, c)| !(s == subscriber && c == channel));
        if edges.len() < before {
            Ok(false)
        } else {
            edges.push((subscriber.to_string(), channel.to_string()));
            Ok(true)
        }
    }

    async fn is_subscribed(&self, subscriber: &str, channel: &str) -> Result<bool> {
        Ok(self
            .edges
            .read()
            .await
            .iter()
            .any(|(s, c)| s == subscriber && c == channel))
    }

    async fn subscribers_of(&self, channel: &str) -> Result<Vec<String>> {
        Ok(self
            .edges
            .read()
            .await
            .iter()
            .filter(|(_, c)| c == channel)
            .map(|(s, _)| s.clone())
            .collect())
    }

    async fn channels_of(&self, subscriber: &str) -> Result<Vec<String>> {
        Ok(self
            .edges
            .read()
            .await
            .iter()
            .filter(|(s, _)| s == subscriber)
            .map(|(_, c)| c.clone())
            .collect())
    }

    async fn subscriber_count(&self, channel: &str) -> Result<usize> {
        Ok(self.subscribers_of(channel).await?.len())
    }

    async fn subscription_count(&self, subscriber: &str) -> Result<usize> {
        Ok(self.channels_of(subscriber).await?.len())
    }
}
