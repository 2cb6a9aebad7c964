//! HTTP API server

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{require_auth, SessionManager, TokenIssuer};
use crate::config::Config;
use crate::error::Result;
use crate::store::{
    MemorySubscriptionStore, MemoryTweetStore, MemoryUserStore, SubscriptionStore, TweetStore,
};

use super::{routes, social};

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub sessions: SessionManager,
    pub tweets: Arc<dyn TweetStore>,
    pub subscriptions: Arc<dyn SubscriptionStore>,
}

pub type SharedState = Arc<AppState>;

/// Build state with in-memory stores
pub fn build_state(config: Config) -> SharedState {
    let tokens = TokenIssuer::new(&config.auth);
    let sessions = SessionManager::new(Arc::new(MemoryUserStore::new()), tokens);

    Arc::new(AppState {
        config,
        sessions,
        tweets: Arc::new(MemoryTweetStore::new()),
        subscriptions: Arc::new(MemorySubscriptionStore::new()),
    })
}

/// Run the HTTP API server
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    let state = build_state(config);
    let app = create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the router with all routes
pub fn create_router(state: SharedState) -> Router {
    let public = Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/users/register", post(routes::register))
        .route("/api/users/login", post(routes::login))
        .route("/api/users/refresh-token", post(routes::refresh_token))
        .route("/api/users/channel/{username}", get(routes::get_channel))
        .route("/api/tweets/user/{user_id}", get(social::user_tweets))
        .route(
            "/api/subscriptions/subscribers/{user_id}",
            get(social::channel_subscribers),
        );

    let guarded = Router::new()
        .route("/api/users/logout", post(routes::logout))
        .route("/api/users/update-password", post(routes::update_password))
        .route("/api/users/update-account", patch(routes::update_account))
        .route("/api/tweets", post(social::create_tweet))
        .route(
            "/api/tweets/{tweet_id}",
            patch(social::update_tweet).delete(social::delete_tweet),
        )
        .route(
            "/api/subscriptions/toggle/{channel_id}",
            post(social::toggle_subscription),
        )
        .route(
            "/api/subscriptions/channels/{user_id}",
            get(social::subscribed_channels),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    public
        .merge(guarded)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
