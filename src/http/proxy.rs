//! Authenticated request proxy.
//!
//! Forwards `<mount>/<segments>` to the backend API, attaching the
//! session's bearer token. Single pass: no retry, no backoff, no caching.

use std::time::Instant;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderValue, Request},
    response::{IntoResponse, Response},
};

use crate::http::request::{forwards_body, outbound_headers, path_segments, target_url, JSON_CONTENT_TYPE};
use crate::http::response::ProxyError;
use crate::http::server::AppState;
use crate::observability::logging::Redacted;
use crate::observability::metrics;

/// Main proxy handler.
pub async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let response = match forward(&state, request).await {
        Ok(response) => response,
        Err(e) => {
            match &e {
                ProxyError::InvalidPath => {
                    tracing::warn!(request_id = %request_id, "Rejected proxy call without a path")
                }
                other => {
                    tracing::error!(request_id = %request_id, error = %other, "Proxy request failed")
                }
            }
            e.into_response()
        }
    };

    metrics::record_request(method.as_str(), response.status().as_u16(), start_time);
    response
}

async fn forward(state: &AppState, request: Request<Body>) -> Result<Response, ProxyError> {
    let segments = path_segments(request.uri().path(), &state.config.proxy.mount_path);
    if segments.is_empty() {
        return Err(ProxyError::InvalidPath);
    }

    let session = state.sessions.resolve(request.headers()).await;
    let token = session.as_ref().and_then(|s| s.access_token.as_deref());

    tracing::debug!(
        has_session = session.is_some(),
        user_id = session.as_ref().map(|s| s.user.id.as_str()),
        has_access_token = token.is_some(),
        token = token.map(Redacted).map(tracing::field::display),
        "Resolved proxy session"
    );
    match (&session, token) {
        (None, _) => tracing::warn!("No session found - request will be unauthenticated"),
        (Some(_), None) => tracing::warn!("Session exists but carries no access token"),
        (Some(_), Some(_)) => {}
    }

    let url = target_url(
        &state.config.backend.base_url,
        &segments,
        request.uri().query(),
    );
    let headers = outbound_headers(
        request.headers(),
        token,
        &state.config.session.cookie_name,
    )?;
    let method = request.method().clone();

    tracing::debug!(
        method = %method,
        url = %url,
        has_auth = headers.contains_key(header::AUTHORIZATION),
        "Forwarding request"
    );

    let body = if forwards_body(&method) {
        Body::from(axum::body::to_bytes(request.into_body(), state.config.security.max_body_size).await?)
    } else {
        Body::empty()
    };

    let mut outbound = Request::builder().method(method).uri(&url).body(body)?;
    *outbound.headers_mut() = headers;

    let upstream = state.client.request(outbound).await?;

    let status = upstream.status();
    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(JSON_CONTENT_TYPE));
    let body: Bytes = axum::body::to_bytes(Body::new(upstream.into_body()), usize::MAX).await?;

    tracing::debug!(status = %status, bytes = body.len(), "Relaying backend response");

    Ok((status, [(header::CONTENT_TYPE, content_type)], body).into_response())
}
