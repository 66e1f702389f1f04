//! Client for the quiz console gateway.
//!
//! Every resource call goes through the gateway's `/proxy` mount, so the
//! session cookie obtained by [`ConsoleClient::login`] is what authorizes it.

pub mod client;
pub mod resources;

pub use client::{ConsoleClient, SdkError, SessionInfo, SessionUser};
pub use resources::{BootstrapAdmin, PageQuery, QuestionQuery, Resource, ReviewQuery};
