//! Page guards.
//!
//! Console pages are protected by path prefix. A signed-out caller on a
//! protected page is sent to the login page; a signed-in caller without the
//! privileged role is sent home. The login page itself bounces signed-in
//! callers home. Paths under the proxy mount are never guarded.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::auth::{is_super_admin, Session};
use crate::config::schema::{Access, ConsoleConfig};
use crate::http::server::AppState;
use crate::routing::matcher::{Matcher, PathPrefixMatcher};

#[derive(Debug)]
struct GuardRule {
    matcher: PathPrefixMatcher,
    access: Access,
}

/// Outcome of evaluating a path against the guard table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

/// Guard rules ordered longest prefix first.
#[derive(Debug)]
pub struct GuardTable {
    rules: Vec<GuardRule>,
    proxy: PathPrefixMatcher,
    login_path: String,
    home_path: String,
}

impl GuardTable {
    pub fn from_config(console: &ConsoleConfig, proxy_mount: &str) -> Self {
        let mut rules: Vec<GuardRule> = console
            .guards
            .iter()
            .map(|g| GuardRule {
                matcher: PathPrefixMatcher::new(g.path_prefix.as_str()),
                access: g.access,
            })
            .collect();
        rules.sort_by(|a, b| b.matcher.prefix().len().cmp(&a.matcher.prefix().len()));

        Self {
            rules,
            proxy: PathPrefixMatcher::new(proxy_mount),
            login_path: console.login_path.clone(),
            home_path: console.home_path.clone(),
        }
    }

    /// Access level required by the most specific matching rule.
    pub fn required_access(&self, path: &str) -> Option<Access> {
        if self.proxy.matches(path) {
            return None;
        }
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(path))
            .map(|rule| rule.access)
    }

    fn is_login(&self, path: &str) -> bool {
        path == self.login_path
    }

    /// Whether deciding this path needs the caller's session at all.
    pub fn needs_session(&self, path: &str) -> bool {
        self.is_login(path) || self.required_access(path).is_some()
    }

    pub fn decide(&self, path: &str, session: Option<&Session>) -> GuardDecision {
        if self.is_login(path) {
            return match session {
                Some(_) => GuardDecision::Redirect(self.home_path.clone()),
                None => GuardDecision::Allow,
            };
        }

        match (self.required_access(path), session) {
            (None, _) => GuardDecision::Allow,
            (Some(_), None) => GuardDecision::Redirect(self.login_path.clone()),
            (Some(Access::Authenticated), Some(_)) => GuardDecision::Allow,
            (Some(Access::SuperAdmin), Some(session)) => {
                if is_super_admin(Some(session)) {
                    GuardDecision::Allow
                } else {
                    GuardDecision::Redirect(self.home_path.clone())
                }
            }
        }
    }
}

/// Redirects callers away from pages they may not see.
pub async fn guard_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    if !state.guards.needs_session(&path) {
        return next.run(request).await;
    }

    let session = state.sessions.resolve(request.headers()).await;
    match state.guards.decide(&path, session.as_ref()) {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::Redirect(to) => {
            tracing::debug!(
                path = %path,
                redirect = %to,
                has_session = session.is_some(),
                "Page guard redirect"
            );
            Redirect::to(&to).into_response()
        }
    }
}
