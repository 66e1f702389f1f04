use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::error::AuthError;
use crate::auth::session::SessionUser;
use crate::http::server::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub user: SessionUser,
    pub expires_at: i64,
}

/// Exchange credentials for a session cookie.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, AuthError> {
    let accounts = state.accounts.clone();
    let email = req.email.clone();
    let account = tokio::task::spawn_blocking(move || {
        accounts
            .authenticate(&req.email, &req.password)
            .map(Clone::clone)
    })
    .await
    .map_err(|e| AuthError::Internal(e.to_string()))?
    .inspect_err(|e| tracing::info!(email = %email, reason = %e, "Sign-in rejected"))?;

    let (token, session) = state.codec.issue(&account)?;
    tracing::info!(
        user_id = %session.user.id,
        role = ?session.user.role,
        has_access_token = session.access_token.is_some(),
        "Session issued"
    );

    let cookie = session_cookie(&state, &token, state.codec.ttl_secs())?;
    let body = SessionView {
        expires_at: session.expires_at,
        user: session.user,
    };

    Ok(([(header::SET_COOKIE, cookie)], Json(body)).into_response())
}

/// Clear the session cookie.
pub async fn logout(State(state): State<AppState>) -> Result<Response, AuthError> {
    let cookie = session_cookie(&state, "", 0)?;
    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]).into_response())
}

/// Describe the current session, or `{}` when signed out.
pub async fn current_session(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match state.sessions.resolve(&headers).await {
        Some(session) => Json(SessionView {
            user: session.user,
            expires_at: session.expires_at,
        })
        .into_response(),
        None => Json(serde_json::json!({})).into_response(),
    }
}

fn session_cookie(state: &AppState, token: &str, max_age: u64) -> Result<HeaderValue, AuthError> {
    let session = &state.config.session;
    let secure = if session.secure_cookie { "; Secure" } else { "" };
    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}{}",
        session.cookie_name, token, max_age, secure
    );
    HeaderValue::from_str(&cookie).map_err(|e| AuthError::Signing(e.to_string()))
}
