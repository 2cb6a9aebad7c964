//! Tweet and subscription route handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;

use crate::auth::{CurrentUser, SessionError, UserProfile};
use crate::store::Tweet;

use super::routes::{session_failure, validation_failure, ApiResponse};
use super::server::SharedState;

#[derive(Debug, Deserialize)]
pub struct CreateTweetRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTweetRequest {
    pub content: String,
}

fn forbidden(message: &str) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(ApiResponse::<()>::err(message)),
    )
        .into_response()
}

// Tweets

pub async fn create_tweet(
    State(state): State<SharedState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<CreateTweetRequest>,
) -> Response {
    if req.content.trim().is_empty() {
        return validation_failure("Tweet content is required");
    }

    let tweet = Tweet::new(user.id, req.content.trim().to_string());
    match state.tweets.insert(tweet.clone()).await {
        Ok(()) => (
            StatusCode::CREATED,
            Json(ApiResponse::ok("Tweet created successfully", tweet)),
        )
            .into_response(),
        Err(e) => session_failure(SessionError::Store(e.to_string())),
    }
}

pub async fn user_tweets(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> Response {
    match state.tweets.by_owner(&user_id).await {
        Ok(tweets) => (
            StatusCode::OK,
            Json(ApiResponse::ok("User tweets fetched successfully", tweets)),
        )
            .into_response(),
        Err(e) => session_failure(SessionError::Store(e.to_string())),
    }
}

pub async fn update_tweet(
    State(state): State<SharedState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(tweet_id): Path<String>,
    Json(req): Json<UpdateTweetRequest>,
) -> Response {
    if req.content.trim().is_empty() {
        return validation_failure("Tweet content is required");
    }

    let existing = match state.tweets.find(&tweet_id).await {
        Ok(Some(tweet)) => tweet,
        Ok(None) => return session_failure(SessionError::NotFound),
        Err(e) => return session_failure(SessionError::Store(e.to_string())),
    };
    if existing.owner != user.id {
        return forbidden("Only the owner can update a tweet");
    }

    match state.tweets.update_content(&tweet_id, req.content.trim()).await {
        Ok(Some(tweet)) => (
            StatusCode::OK,
            Json(ApiResponse::ok("Tweet updated successfully", tweet)),
        )
            .into_response(),
        Ok(None) => session_failure(SessionError::NotFound),
        Err(e) => session_failure(SessionError::Store(e.to_string())),
    }
}

pub async fn delete_tweet(
    State(state): State<SharedState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(tweet_id): Path<String>,
) -> Response {
    let existing = match state.tweets.find(&tweet_id).await {
        Ok(Some(tweet)) => tweet,
        Ok(None) => return session_failure(SessionError::NotFound),
        Err(e) => return session_failure(SessionError::Store(e.to_string())),
    };
    if existing.owner != user.id {
        return forbidden("Only the owner can delete a tweet");
    }

    match state.tweets.delete(&tweet_id).await {
        Ok(_) => (
            StatusCode::OK,
            Json(ApiResponse::ok(
                "Tweet deleted successfully",
                serde_json::json!({}),
            )),
        )
            .into_response(),
        Err(e) => session_failure(SessionError::Store(e.to_string())),
    }
}

// Subscriptions

pub async fn toggle_subscription(
    State(state): State<SharedState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(channel_id): Path<String>,
) -> Response {
    if channel_id == user.id {
        return validation_failure("Users cannot subscribe to their own channel");
    }

    match state.sessions.users().find_by_id(&channel_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return session_failure(SessionError::NotFound),
        Err(e) => return session_failure(SessionError::Store(e.to_string())),
    }

    match state.subscriptions.toggle(&user.id, &channel_id).await {
        Ok(subscribed) => {
            let message = if subscribed {
                "Subscribed successfully"
            } else {
                "Unsubscribed successfully"
            };
            (
                StatusCode::OK,
                Json(ApiResponse::ok(
                    message,
                    serde_json::json!({ "subscribed": subscribed }),
                )),
            )
                .into_response()
        }
        Err(e) => session_failure(SessionError::Store(e.to_string())),
    }
}

/// Join a list of user ids against the credential store, dropping
/// ids that no longer resolve.
async fn resolve_profiles(state: &SharedState, ids: Vec<String>) -> Result<Vec<UserProfile>, Response> {
    let mut profiles = Vec::with_capacity(ids.len());
    for id in ids {
        match state.sessions.users().find_by_id(&id).await {
            Ok(Some(account)) => profiles.push(account.profile()),
            Ok(None) => {}
            Err(e) => return Err(session_failure(SessionError::Store(e.to_string()))),
        }
    }
    Ok(profiles)
}

pub async fn channel_subscribers(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> Response {
    let ids = match state.subscriptions.subscribers_of(&user_id).await {
        Ok(ids) => ids,
        Err(e) => return session_failure(SessionError::Store(e.to_string())),
    };

    match resolve_profiles(&state, ids).await {
        Ok(profiles) => (
            StatusCode::OK,
            Json(ApiResponse::ok("Subscribers fetched successfully", profiles)),
        )
            .into_response(),
        Err(response) => response,
    }
}

pub async fn subscribed_channels(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> Response {
    let ids = match state.subscriptions.channels_of(&user_id).await {
        Ok(ids) => ids,
        Err(e) => return session_failure(SessionError::Store(e.to_string())),
    };

    match resolve_profiles(&state, ids).await {
        Ok(profiles) => (
            StatusCode::OK,
            Json(ApiResponse::ok(
                "Subscribed channels fetched successfully",
                profiles,
            )),
        )
            .into_response(),
        Err(response) => response,
    }
}
