//! Page access routing.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → matcher.rs (segment-aware prefix match)
//!     → guard.rs (longest matching rule decides required access)
//!     → allow, or redirect to login / home
//! ```
//!
//! # Design Decisions
//! - Unmatched paths are allowed; guards are opt-in per prefix
//! - The proxy mount is never guarded, the backend authorizes those calls
//! - Longest prefix wins so nested pages can tighten access

pub mod guard;
pub mod matcher;

pub use guard::{guard_middleware, GuardDecision, GuardTable};
pub use matcher::{Matcher, PathPrefixMatcher};
