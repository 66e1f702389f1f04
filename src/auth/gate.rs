//! Authorization gate.
//!
//! Pure predicates over the (possibly absent) session. Page guards use them
//! to decide whether to render or redirect; handlers use the `require_*`
//! forms to turn a failed check into an [`AuthError`].

use crate::auth::error::AuthError;
use crate::auth::session::{Role, Session};

/// The role that unlocks super-administrator pages.
pub const PRIVILEGED_ROLE: Role = Role::SuperAdmin;

/// True only when the session exists and carries the privileged role.
pub fn is_super_admin(session: Option<&Session>) -> bool {
    session.and_then(|s| s.user.role) == Some(PRIVILEGED_ROLE)
}

pub fn require_session(session: Option<&Session>) -> Result<&Session, AuthError> {
    session.ok_or(AuthError::Unauthenticated)
}

pub fn require_super_admin(session: Option<&Session>) -> Result<&Session, AuthError> {
    let session = require_session(session)?;
    if is_super_admin(Some(session)) {
        Ok(session)
    } else {
        Err(AuthError::Forbidden)
    }
}
