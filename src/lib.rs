//! Quiz console gateway library.
//!
//! Serves the admin console's server side: an authenticated proxy to the
//! backend API, console sessions, and page guards.

pub mod auth;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
