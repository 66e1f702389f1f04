//! Console authentication subsystem.
//!
//! # Data Flow
//! ```text
//! POST /auth/login
//!     → credentials.rs (bcrypt check against configured accounts)
//!     → session.rs (sign JWT, Set-Cookie)
//!
//! Every later request:
//!     → resolver.rs (cookie → verified Session)
//!     → gate.rs (is this caller privileged?)
//! ```
//!
//! # Design Decisions
//! - The session is resolved per request and passed explicitly
//! - A bad cookie is treated as no session, never as an error
//! - Authorization of backend calls stays with the backend

pub mod credentials;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod resolver;
pub mod session;

pub use credentials::{Account, AccountStore};
pub use error::AuthError;
pub use gate::{is_super_admin, require_session, require_super_admin};
pub use resolver::{CookieSessionResolver, SessionResolver, StaticSessionResolver};
pub use session::{Role, Session, SessionCodec, SessionUser};
