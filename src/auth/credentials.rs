//! Credential exchange against the configured administrator accounts.

use std::collections::HashMap;

use crate::auth::error::AuthError;
use crate::auth::session::Role;
use crate::config::AccountConfig;

/// An administrator who may sign in.
#[derive(Clone)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub(crate) password_hash: String,
    pub access_token: Option<String>,
}

impl From<&AccountConfig> for Account {
    fn from(config: &AccountConfig) -> Self {
        Self {
            id: config.id.clone(),
            email: config.email.clone(),
            full_name: config.full_name.clone(),
            role: config.role,
            password_hash: config.password_hash.clone(),
            access_token: config.access_token.clone(),
        }
    }
}

/// Accounts indexed by email.
#[derive(Default)]
pub struct AccountStore {
    accounts: HashMap<String, Account>,
}

impl AccountStore {
    pub fn from_config(accounts: &[AccountConfig]) -> Self {
        Self {
            accounts: accounts
                .iter()
                .map(|a| (a.email.clone(), Account::from(a)))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Check an email/password pair.
    ///
    /// Unknown emails and wrong passwords yield the same error. Bcrypt is
    /// CPU-bound; call this from a blocking task.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<&Account, AuthError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let account = self.accounts.get(email).ok_or(AuthError::InvalidCredentials)?;

        match bcrypt::verify(password, &account.password_hash) {
            Ok(true) => Ok(account),
            Ok(false) => Err(AuthError::InvalidCredentials),
            Err(e) => {
                tracing::warn!(email = %email, error = %e, "Stored password hash is unusable");
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}
