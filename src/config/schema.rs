//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::auth::Role;

/// Default backend API origin used when neither the config file nor
/// `BACKEND_API_URL` provide one.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000/api/v1";

/// Root configuration for the console gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Backend API the proxy forwards to.
    pub backend: BackendConfig,

    /// Proxy route settings.
    pub proxy: ProxySettings,

    /// Session cookie and signing settings.
    pub session: SessionConfig,

    /// Administrator accounts allowed to sign in.
    pub accounts: Vec<AccountConfig>,

    /// Page guards and console assets.
    pub console: ConsoleConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Request hardening.
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Backend API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL every proxied path is appended to.
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
        }
    }
}

/// Proxy route configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxySettings {
    /// Path the proxy is mounted under; everything below it is forwarded.
    pub mount_path: String,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            mount_path: "/proxy".to_string(),
        }
    }
}

/// Session configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// HMAC secret used to sign session tokens. Required; there is no
    /// built-in fallback.
    pub secret: String,

    /// Session lifetime in seconds.
    pub ttl_secs: u64,

    /// Cookie name carrying the session token.
    pub cookie_name: String,

    /// Mark the cookie `Secure` (HTTPS-only).
    pub secure_cookie: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            ttl_secs: 30 * 24 * 60 * 60,
            cookie_name: "console_session".to_string(),
            secure_cookie: false,
        }
    }
}

/// An administrator allowed to sign in to the console.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountConfig {
    /// Stable user identifier, copied into sessions.
    pub id: String,

    /// Login email (matched exactly).
    pub email: String,

    /// Display name.
    #[serde(default)]
    pub full_name: String,

    /// Console role.
    pub role: Role,

    /// Bcrypt hash of the account password.
    pub password_hash: String,

    /// Backend API bearer token attached to proxied requests.
    #[serde(default)]
    pub access_token: Option<String>,
}

/// Access level a guarded page requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    Authenticated,
    SuperAdmin,
}

/// A path prefix protected by a page guard.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GuardConfig {
    pub path_prefix: String,
    pub access: Access,
}

/// Console page configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Sign-in page; signed-out callers are redirected here.
    pub login_path: String,

    /// Landing page; unprivileged callers are redirected here.
    pub home_path: String,

    /// Directory holding the built console front-end, if served by the gateway.
    pub assets_dir: Option<String>,

    /// Guarded page prefixes.
    pub guards: Vec<GuardConfig>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        let authenticated = ["/users", "/questions", "/categories", "/reviews", "/analytics"]
            .into_iter()
            .map(|prefix| GuardConfig {
                path_prefix: prefix.to_string(),
                access: Access::Authenticated,
            });

        Self {
            login_path: "/login".to_string(),
            home_path: "/".to_string(),
            assets_dir: None,
            guards: std::iter::once(GuardConfig {
                path_prefix: "/admins".to_string(),
                access: Access::SuperAdmin,
            })
            .chain(authenticated)
            .collect(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "console_gateway=info,tower_http=info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: GatewayConfig = toml::from_str("").unwrap();
        assert_eq!(config.backend.base_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.proxy.mount_path, "/proxy");
        assert_eq!(config.session.cookie_name, "console_session");
        assert!(config.session.secret.is_empty());
        assert!(config.accounts.is_empty());
        assert_eq!(config.console.guards.len(), 6);
    }

    #[test]
    fn test_parse_accounts_and_guards() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [backend]
            base_url = "http://backend/api"

            [[accounts]]
            id = "1"
            email = "root@example.com"
            role = "super_admin"
            password_hash = "$2b$04$abc"
            access_token = "abc123"

            [console]
            guards = [{ path_prefix = "/admins", access = "super_admin" }]
            "#,
        )
        .unwrap();

        assert_eq!(config.backend.base_url, "http://backend/api");
        assert_eq!(config.accounts[0].role, Role::SuperAdmin);
        assert_eq!(config.accounts[0].access_token.as_deref(), Some("abc123"));
        assert_eq!(config.console.guards.len(), 1);
        assert_eq!(config.console.guards[0].access, Access::SuperAdmin);
        assert_eq!(config.console.login_path, "/login");
    }
}
