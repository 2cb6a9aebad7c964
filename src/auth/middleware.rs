//! Request guard and token extraction

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::api::server::SharedState;

use super::models::UserProfile;

/// The authenticated user attached to guarded requests
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserProfile);

/// Pull an access token from the `Authorization: Bearer` header or
/// the `accessToken` cookie, header taking precedence.
pub fn extract_access_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth_header) = headers.get("Authorization") {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }

    extract_cookie(headers, "accessToken")
}

/// Read a single cookie value from the `Cookie` header
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookie_header = headers.get("Cookie")?.to_str().ok()?;
    for cookie in cookie_header.split(';') {
        if let Some(value) = cookie.trim().strip_prefix(name) {
            if let Some(value) = value.strip_prefix('=') {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Middleware for routes that require a valid access token.
///
/// On success the sanitized user is attached to request extensions.
/// Every failure mode (missing, malformed, expired, signature
/// mismatch, unknown subject) gets the same 401 so callers cannot
/// probe which check failed.
pub async fn require_auth(
    State(state): State<SharedState>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = extract_access_token(req.headers());

    match state.sessions.authenticate(token.as_deref()).await {
        Ok(user) => {
            req.extensions_mut().insert(CurrentUser(user));
            next.run(req).await
        }
        Err(_) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "success": false,
                "message": "Unauthorized request",
                "data": null,
            })),
        )
            .into_response(),
    }
}
