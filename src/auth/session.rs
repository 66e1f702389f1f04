//! Session model and signed-token codec.
//!
//! A session travels in a cookie as an HS256 JWT. The codec is the only
//! place that knows the signing secret; everything else handles the decoded
//! [`Session`].

use std::fmt;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::credentials::Account;
use crate::auth::error::AuthError;
use crate::observability::logging::Redacted;

/// Issuer stamped into every session token.
pub const SESSION_ISSUER: &str = "console-gateway";

/// Console roles. Anything unrecognised decodes to [`Role::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    SuperAdmin,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::SuperAdmin => write!(f, "super_admin"),
            Role::Unknown => write!(f, "unknown"),
        }
    }
}

/// Identity carried by a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Option<Role>,
}

/// The authenticated state of one browser.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub user: SessionUser,
    /// Backend API credential; absent when the account has none.
    pub access_token: Option<String>,
    /// Expiry as unix seconds.
    pub expires_at: i64,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("access_token", &self.access_token.as_deref().map(Redacted))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Claims encoded in the session JWT.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct SessionClaims {
    pub sub: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl From<SessionClaims> for Session {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user: SessionUser {
                id: claims.sub,
                email: claims.email,
                full_name: claims.name,
                role: claims.role,
            },
            access_token: claims.access_token,
            expires_at: claims.exp,
        }
    }
}

/// Signs and verifies session tokens.
pub struct SessionCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: u64,
}

impl SessionCodec {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[SESSION_ISSUER]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs,
        }
    }

    /// Session lifetime in seconds.
    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Create a signed session for an authenticated account.
    pub fn issue(&self, account: &Account) -> Result<(String, Session), AuthError> {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: account.id.clone(),
            iss: SESSION_ISSUER.to_string(),
            iat: now,
            exp: now + self.ttl_secs as i64,
            email: account.email.clone(),
            name: account.full_name.clone(),
            role: Some(account.role),
            access_token: account.access_token.clone(),
        };
        let token = self.sign(&claims)?;
        Ok((token, Session::from(claims)))
    }

    pub(crate) fn sign(&self, claims: &SessionClaims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verify a token's signature, issuer and expiry.
    pub fn decode(&self, token: &str) -> Result<Session, AuthError> {
        let data = decode::<SessionClaims>(token, &self.decoding, &self.validation)?;
        Ok(Session::from(data.claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(token: Option<&str>) -> Account {
        Account {
            id: "1".into(),
            email: "root@example.com".into(),
            full_name: "Root".into(),
            role: Role::SuperAdmin,
            password_hash: String::new(),
            access_token: token.map(String::from),
        }
    }

    #[test]
    fn test_issue_then_decode() {
        let codec = SessionCodec::new("secret", 3600);
        let (token, issued) = codec.issue(&account(Some("abc123"))).unwrap();

        let decoded = codec.decode(&token).unwrap();
        assert_eq!(decoded, issued);
        assert_eq!(decoded.user.role, Some(Role::SuperAdmin));
        assert_eq!(decoded.access_token.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_rejects_foreign_signature() {
        let (token, _) = SessionCodec::new("one", 3600).issue(&account(None)).unwrap();
        assert!(SessionCodec::new("two", 3600).decode(&token).is_err());
    }

    #[test]
    fn test_rejects_expired_token() {
        let codec = SessionCodec::new("secret", 3600);
        let now = Utc::now().timestamp();
        let token = codec
            .sign(&SessionClaims {
                sub: "1".into(),
                iss: SESSION_ISSUER.into(),
                iat: now - 7200,
                exp: now - 3600,
                email: "root@example.com".into(),
                name: String::new(),
                role: Some(Role::Admin),
                access_token: None,
            })
            .unwrap();

        assert!(codec.decode(&token).is_err());
    }

    #[test]
    fn test_unknown_role_decodes() {
        let role: Role = serde_json::from_str("\"editor\"").unwrap();
        assert_eq!(role, Role::Unknown);
    }

    #[test]
    fn test_debug_hides_token() {
        let codec = SessionCodec::new("secret", 60);
        let (_, session) = codec.issue(&account(Some("abc123"))).unwrap();
        assert!(!format!("{:?}", session).contains("abc123"));
    }
}
