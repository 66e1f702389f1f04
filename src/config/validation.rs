//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the backend URL is something the outbound client can reach
//! - Validate mount and guard paths
//! - Detect duplicate accounts
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::auth::Role;
use crate::config::schema::GatewayConfig;
use crate::routing::matcher::{Matcher, PathPrefixMatcher};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("backend.base_url '{0}' is not a valid URL")]
    BackendUrl(String),

    #[error("backend.base_url must use http or https, got '{0}'")]
    BackendScheme(String),

    #[error("proxy.mount_path '{0}' must start with '/' and not end with '/'")]
    MountPath(String),

    #[error("session.secret must be set (or provide SESSION_SECRET)")]
    EmptySecret,

    #[error("session.ttl_secs must be greater than zero")]
    ZeroTtl,

    #[error("session.cookie_name must not be empty")]
    EmptyCookieName,

    #[error("account '{0}' is listed more than once")]
    DuplicateAccount(String),

    #[error("account '{0}' has an unrecognised role")]
    UnknownRole(String),

    #[error("guard path_prefix '{0}' must start with '/'")]
    GuardPath(String),

    #[error("guard path_prefix '{0}' overlaps the proxy mount")]
    GuardOnProxy(String),
}

/// Validate a loaded configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    match Url::parse(&config.backend.base_url) {
        Ok(url) if !matches!(url.scheme(), "http" | "https") => {
            errors.push(ValidationError::BackendScheme(url.scheme().to_string()));
        }
        Ok(_) => {}
        Err(_) => errors.push(ValidationError::BackendUrl(config.backend.base_url.clone())),
    }

    let mount = &config.proxy.mount_path;
    if !mount.starts_with('/') || mount.len() < 2 || mount.ends_with('/') {
        errors.push(ValidationError::MountPath(mount.clone()));
    }

    if config.session.secret.trim().is_empty() {
        errors.push(ValidationError::EmptySecret);
    }
    if config.session.ttl_secs == 0 {
        errors.push(ValidationError::ZeroTtl);
    }
    if config.session.cookie_name.trim().is_empty() {
        errors.push(ValidationError::EmptyCookieName);
    }

    let mut seen = HashSet::new();
    for account in &config.accounts {
        if !seen.insert(account.email.as_str()) {
            errors.push(ValidationError::DuplicateAccount(account.email.clone()));
        }
        if account.role == Role::Unknown {
            errors.push(ValidationError::UnknownRole(account.email.clone()));
        }
    }

    for guard in &config.console.guards {
        if !guard.path_prefix.starts_with('/') {
            errors.push(ValidationError::GuardPath(guard.path_prefix.clone()));
        } else if PathPrefixMatcher::new(mount.as_str()).matches(&guard.path_prefix)
            || PathPrefixMatcher::new(guard.path_prefix.as_str()).matches(mount)
        {
            errors.push(ValidationError::GuardOnProxy(guard.path_prefix.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{AccountConfig, Access, GuardConfig};

    fn account(email: &str, role: Role) -> AccountConfig {
        AccountConfig {
            id: "1".into(),
            email: email.into(),
            full_name: String::new(),
            role,
            password_hash: String::new(),
            access_token: None,
        }
    }

    #[test]
    fn test_default_config_needs_a_secret() {
        assert_eq!(
            validate_config(&GatewayConfig::default()),
            Err(vec![ValidationError::EmptySecret])
        );

        let mut config = GatewayConfig::default();
        config.session.secret = "s3cret".into();
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_backend_schemes() {
        let mut config = GatewayConfig::default();
        config.session.secret = "s3cret".into();

        config.backend.base_url = "https://api.example.com/api/v1".into();
        assert_eq!(validate_config(&config), Ok(()));

        config.backend.base_url = "ftp://backend/api".into();
        config.session.secret = "   ".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::BackendScheme("ftp".into())));
        assert!(errors.contains(&ValidationError::EmptySecret));
    }

    #[test]
    fn test_reports_all_errors() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.proxy.mount_path = "/proxy/".into();
        config.accounts = vec![
            account("a@example.com", Role::Admin),
            account("a@example.com", Role::Unknown),
        ];
        config.console.guards.push(GuardConfig {
            path_prefix: "users".into(),
            access: Access::Authenticated,
        });

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 6);
    }

    #[test]
    fn test_rejects_guard_over_proxy_mount() {
        let mut config = GatewayConfig::default();
        config.session.secret = "s3cret".into();
        config.console.guards.push(GuardConfig {
            path_prefix: "/proxy/admins".into(),
            access: Access::SuperAdmin,
        });

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::GuardOnProxy("/proxy/admins".into())]
        );
    }

    #[test]
    fn test_rejects_guard_covering_proxy_mount() {
        let mut config = GatewayConfig::default();
        config.session.secret = "s3cret".into();
        config.proxy.mount_path = "/api/proxy".into();
        for prefix in ["/", "/api"] {
            config.console.guards.push(GuardConfig {
                path_prefix: prefix.into(),
                access: Access::Authenticated,
            });
        }
        config.console.guards.push(GuardConfig {
            path_prefix: "/apix".into(),
            access: Access::Authenticated,
        });

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::GuardOnProxy("/".into()),
                ValidationError::GuardOnProxy("/api".into()),
            ]
        );
    }
}
