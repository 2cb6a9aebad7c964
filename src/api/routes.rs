//! Account and session route handlers

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header::SET_COOKIE, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::{
    extract_access_token, extract_cookie, AuthenticatedSession, CurrentUser, LoginIdentifier,
    NewUser, SessionError, UserProfile,
};
use crate::config::CookieConfig;

use super::server::SharedState;

// Response envelope

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn err(message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

/// Map a session failure to its HTTP status
fn session_error_status(err: &SessionError) -> StatusCode {
    match err {
        SessionError::NotFound => StatusCode::NOT_FOUND,
        SessionError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        SessionError::Unauthorized => StatusCode::UNAUTHORIZED,
        SessionError::InvalidToken => StatusCode::NOT_ACCEPTABLE,
        SessionError::TokenMismatch => StatusCode::REQUEST_TIMEOUT,
        SessionError::AlreadyExists => StatusCode::CONFLICT,
        SessionError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Render a session failure as the error envelope. Store errors are
/// logged server-side and reduced to a generic message; the client
/// only ever sees the variant's own text.
pub fn session_failure(err: SessionError) -> Response {
    let status = session_error_status(&err);
    let message = match &err {
        SessionError::Store(detail) => {
            tracing::error!(detail = %detail, "store failure");
            "Internal server error".to_string()
        }
        other => other.to_string(),
    };
    (status, Json(ApiResponse::<()>::err(message))).into_response()
}

pub fn validation_failure(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::err(message))).into_response()
}

// Cookies

/// Format a session cookie per the configured attributes.
///
/// `same_site` is normalized to one of the three valid values, with
/// Lax for anything unrecognized, so misconfiguration cannot inject
/// arbitrary bytes into the header.
fn cookie_header(name: &str, value: &str, max_age_secs: i64, opts: &CookieConfig) -> HeaderValue {
    let same_site = match opts.same_site.to_ascii_lowercase().as_str() {
        "strict" => "Strict",
        "none" => "None",
        _ => "Lax",
    };

    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; SameSite={}",
        name, value, max_age_secs, same_site
    );
    if opts.http_only {
        cookie.push_str("; HttpOnly");
    }
    if opts.secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
        .unwrap_or_else(|_| HeaderValue::from_static("invalid=; Path=/; Max-Age=0"))
}

fn clear_cookie_header(name: &str, opts: &CookieConfig) -> HeaderValue {
    cookie_header(name, "", 0, opts)
}

/// 200 response carrying the session JSON plus both token cookies
fn session_response(
    state: &SharedState,
    session: AuthenticatedSession,
    message: &str,
) -> Response {
    let cookies = &state.config.cookies;
    let auth = &state.config.auth;

    let access_cookie = cookie_header(
        "accessToken",
        &session.access_token,
        auth.access_ttl_secs,
        cookies,
    );
    let refresh_cookie = cookie_header(
        "refreshToken",
        &session.refresh_token,
        auth.refresh_ttl_secs,
        cookies,
    );

    let mut response =
        (StatusCode::OK, Json(ApiResponse::ok(message, session))).into_response();
    response.headers_mut().append(SET_COOKIE, access_cookie);
    response.headers_mut().append(SET_COOKIE, refresh_cookie);
    response
}

// Request types

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
struct RefreshRequest {
    refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    pub fullname: Option<String>,
    pub email: Option<String>,
}

/// Channel view: sanitized profile plus subscription aggregates
#[derive(Debug, Serialize)]
pub struct ChannelProfile {
    #[serde(flatten)]
    pub user: UserProfile,
    pub subscriber_count: usize,
    pub subscribed_to_count: usize,
    /// Present only when the request carried a valid access token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_subscribed: Option<bool>,
}

// Handlers

pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok("OK", "healthy"))
}

pub async fn register(
    State(state): State<SharedState>,
    Json(req): Json<NewUser>,
) -> Response {
    match state.sessions.register(req).await {
        Ok(profile) => (
            StatusCode::CREATED,
            Json(ApiResponse::ok("User registered successfully", profile)),
        )
            .into_response(),
        Err(SessionError::InvalidCredentials) => {
            validation_failure("All fields are mandatory")
        }
        Err(e) => session_failure(e),
    }
}

pub async fn login(State(state): State<SharedState>, Json(req): Json<LoginRequest>) -> Response {
    let Some(identifier) = LoginIdentifier::from_parts(req.username, req.email) else {
        return validation_failure("Username or email is required");
    };

    match state.sessions.login(&identifier, &req.password).await {
        Ok(session) => session_response(&state, session, "User logged in successfully"),
        Err(e) => session_failure(e),
    }
}

/// Rotate the session: the presented refresh token (cookie first,
/// then body) is exchanged for a fresh pair.
pub async fn refresh_token(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let from_cookie = extract_cookie(&headers, "refreshToken");
    let from_body = serde_json::from_slice::<RefreshRequest>(&body)
        .ok()
        .and_then(|r| r.refresh_token);
    let presented = from_cookie.or(from_body);

    match state.sessions.refresh(presented.as_deref()).await {
        Ok(session) => session_response(&state, session, "Session refreshed successfully"),
        Err(e) => session_failure(e),
    }
}

pub async fn logout(
    State(state): State<SharedState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Response {
    if let Err(e) = state.sessions.logout(&user.id).await {
        return session_failure(e);
    }

    let cookies = &state.config.cookies;
    let mut response = (
        StatusCode::OK,
        Json(ApiResponse::ok(
            "User logged out successfully",
            serde_json::json!({}),
        )),
    )
        .into_response();
    response
        .headers_mut()
        .append(SET_COOKIE, clear_cookie_header("accessToken", cookies));
    response
        .headers_mut()
        .append(SET_COOKIE, clear_cookie_header("refreshToken", cookies));
    response
}

pub async fn update_password(
    State(state): State<SharedState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<UpdatePasswordRequest>,
) -> Response {
    if req.new_password.is_empty() {
        return validation_failure("New password is required");
    }

    match state
        .sessions
        .change_password(&user.id, &req.old_password, &req.new_password)
        .await
    {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::ok(
                "Password updated successfully",
                serde_json::json!({}),
            )),
        )
            .into_response(),
        Err(e) => session_failure(e),
    }
}

pub async fn update_account(
    State(state): State<SharedState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<UpdateAccountRequest>,
) -> Response {
    if req.fullname.is_none() && req.email.is_none() {
        return validation_failure("Nothing to update");
    }

    // Email stays unique across accounts; a taken address belonging
    // to someone else is a conflict
    if let Some(ref email) = req.email {
        match state.sessions.users().find_by_email(email).await {
            Ok(Some(existing)) if existing.id != user.id => {
                return session_failure(SessionError::AlreadyExists);
            }
            Ok(_) => {}
            Err(e) => return session_failure(SessionError::Store(e.to_string())),
        }
    }

    match state
        .sessions
        .users()
        .update_profile(&user.id, req.fullname, req.email)
        .await
    {
        Ok(Some(account)) => (
            StatusCode::OK,
            Json(ApiResponse::ok(
                "Account updated successfully",
                account.profile(),
            )),
        )
            .into_response(),
        Ok(None) => session_failure(SessionError::NotFound),
        Err(e) => session_failure(SessionError::Store(e.to_string())),
    }
}

/// Channel profile with subscriber aggregates. Works unauthenticated;
/// with a valid access token the response also says whether the
/// caller subscribes to this channel.
pub async fn get_channel(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(username): Path<String>,
) -> Response {
    let account = match state
        .sessions
        .users()
        .find_by_username(&username.to_lowercase())
        .await
    {
        Ok(Some(account)) => account,
        Ok(None) => return session_failure(SessionError::NotFound),
        Err(e) => return session_failure(SessionError::Store(e.to_string())),
    };

    let subscriber_count = match state.subscriptions.subscriber_count(&account.id).await {
        Ok(n) => n,
        Err(e) => return session_failure(SessionError::Store(e.to_string())),
    };
    let subscribed_to_count = match state.subscriptions.subscription_count(&account.id).await {
        Ok(n) => n,
        Err(e) => return session_failure(SessionError::Store(e.to_string())),
    };

    let token = extract_access_token(&headers);
    let is_subscribed = match state.sessions.authenticate(token.as_deref()).await {
        Ok(viewer) => state
            .subscriptions
            .is_subscribed(&viewer.id, &account.id)
            .await
            .ok(),
        Err(_) => None,
    };

    let channel = ChannelProfile {
        user: account.profile(),
        subscriber_count,
        subscribed_to_count,
        is_subscribed,
    };

    (
        StatusCode::OK,
        Json(ApiResponse::ok("Channel fetched successfully", channel)),
    )
        .into_response()
}
