//! Per-request session lookup.
//!
//! Handlers receive a [`SessionResolver`] through application state rather
//! than reaching for a global, so tests can substitute a fixed session.

use std::sync::Arc;

use axum::http::{header, HeaderMap};
use futures_util::future::{self, BoxFuture, FutureExt};

use crate::auth::session::{Session, SessionCodec};

/// Resolves the current session from request headers.
pub trait SessionResolver: Send + Sync {
    fn resolve<'a>(&'a self, headers: &'a HeaderMap) -> BoxFuture<'a, Option<Session>>;
}

/// Reads the session cookie and verifies it with the codec.
pub struct CookieSessionResolver {
    codec: Arc<SessionCodec>,
    cookie_name: String,
}

impl CookieSessionResolver {
    pub fn new(codec: Arc<SessionCodec>, cookie_name: impl Into<String>) -> Self {
        Self {
            codec,
            cookie_name: cookie_name.into(),
        }
    }
}

impl SessionResolver for CookieSessionResolver {
    fn resolve<'a>(&'a self, headers: &'a HeaderMap) -> BoxFuture<'a, Option<Session>> {
        let session = extract_cookie(headers, &self.cookie_name).and_then(|token| {
            self.codec
                .decode(token)
                .map_err(|e| tracing::debug!(error = %e, "Ignoring unusable session cookie"))
                .ok()
        });
        future::ready(session).boxed()
    }
}

/// Always resolves to the same session. Useful for tests and local tooling.
pub struct StaticSessionResolver(pub Option<Session>);

impl SessionResolver for StaticSessionResolver {
    fn resolve<'a>(&'a self, _headers: &'a HeaderMap) -> BoxFuture<'a, Option<Session>> {
        future::ready(self.0.clone()).boxed()
    }
}

/// Find a cookie value by name across every `Cookie` header.
pub fn extract_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}
