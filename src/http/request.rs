//! Outbound request construction.
//!
//! # Responsibilities
//! - Split the proxied sub-path into segments
//! - Build the backend target URL
//! - Filter inbound headers and attach credentials
//!
//! # Design Decisions
//! - Segments come from the raw request path so percent-encoding survives
//! - Headers are allow-by-default with a fixed denylist
//! - The gateway's own session cookie never leaves the gateway
//! - The body is never inspected

use axum::http::{
    header::{self, HeaderName},
    HeaderMap, HeaderValue, Method,
};

/// Inbound headers never copied to the backend. Compared case-insensitively
/// (header names are normalised to lowercase by `http`).
pub const EXCLUDED_REQUEST_HEADERS: [&str; 5] = [
    "host",
    "content-length",
    "connection",
    "transfer-encoding",
    "content-type",
];

/// Content type stamped on every outbound request and defaulted on replies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Path segments below `mount`, ignoring empty segments.
///
/// Returns an empty vector when the path is the mount itself or lies
/// outside it.
pub fn path_segments<'a>(path: &'a str, mount: &str) -> Vec<&'a str> {
    match path.strip_prefix(mount) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => {
            rest.split('/').filter(|s| !s.is_empty()).collect()
        }
        _ => Vec::new(),
    }
}

/// `<base>/<segments joined by "/">[?query]`.
pub fn target_url(base: &str, segments: &[&str], query: Option<&str>) -> String {
    let mut url = format!("{}/{}", base.trim_end_matches('/'), segments.join("/"));
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        url.push('?');
        url.push_str(query);
    }
    url
}

fn is_excluded(name: &HeaderName) -> bool {
    EXCLUDED_REQUEST_HEADERS.contains(&name.as_str())
}

/// A `Cookie` value without the `session_cookie` pair, or `None` when
/// nothing is left. Values that are not valid UTF-8 are dropped.
fn without_cookie(value: &HeaderValue, session_cookie: &str) -> Option<HeaderValue> {
    let kept: Vec<&str> = value
        .to_str()
        .ok()?
        .split(';')
        .map(str::trim)
        .filter(|pair| {
            let key = pair.split_once('=').map_or(*pair, |(key, _)| key);
            !pair.is_empty() && key.trim() != session_cookie
        })
        .collect();

    if kept.is_empty() {
        return None;
    }
    HeaderValue::from_str(&kept.join("; ")).ok()
}

/// Copy inbound headers minus the denylist and the session cookie, then set
/// the JSON content type and, when a token is present, the bearer credential.
pub fn outbound_headers(
    inbound: &HeaderMap,
    bearer_token: Option<&str>,
    session_cookie: &str,
) -> Result<HeaderMap, header::InvalidHeaderValue> {
    let mut headers = HeaderMap::with_capacity(inbound.len() + 2);
    for (name, value) in inbound.iter().filter(|(name, _)| !is_excluded(name)) {
        if name == header::COOKIE {
            if let Some(value) = without_cookie(value, session_cookie) {
                headers.append(header::COOKIE, value);
            }
            continue;
        }
        headers.append(name.clone(), value.clone());
    }

    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));

    if let Some(token) = bearer_token {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))?;
        value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, value);
    }

    Ok(headers)
}

/// GET and DELETE are forwarded without a body.
pub fn forwards_body(method: &Method) -> bool {
    !matches!(*method, Method::GET | Method::DELETE)
}
