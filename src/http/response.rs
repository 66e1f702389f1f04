//! Locally produced proxy errors.
//!
//! Backend responses, including backend errors, are relayed untouched; only
//! the failures below are manufactured by the gateway itself.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Invalid API path")]
    InvalidPath,

    #[error("failed to read body: {0}")]
    Body(#[from] axum::Error),

    #[error("invalid outbound request: {0}")]
    Request(#[from] axum::http::Error),

    #[error("invalid outbound header: {0}")]
    Header(#[from] axum::http::header::InvalidHeaderValue),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::InvalidPath => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = match &self {
            ProxyError::InvalidPath => json!({ "error": self.to_string() }),
            other => json!({
                "error": "Proxy request failed",
                "details": other.to_string(),
            }),
        };
        (self.status(), Json(body)).into_response()
    }
}
