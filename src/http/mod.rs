//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace, body limit, page guards)
//!     → proxy.rs (resolve session, forward to backend)
//!         → request.rs (segments, target URL, header filter)
//!         → response.rs (locally produced errors)
//!     → Send to client
//! ```

pub mod proxy;
pub mod request;
pub mod response;
pub mod server;

pub use response::ProxyError;
pub use server::{AppState, HttpServer, X_REQUEST_ID};
