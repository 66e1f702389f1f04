use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::resources::{BootstrapAdmin, Resource};

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("gateway returned status {status}: {body}")]
    Status { status: StatusCode, body: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub user: SessionUser,
    pub expires_at: i64,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Cookie-preserving client for the console gateway.
pub struct ConsoleClient {
    client: Client,
    gateway_url: String,
    proxy_path: String,
}

impl ConsoleClient {
    pub fn new(gateway_url: &str) -> Result<Self, SdkError> {
        Ok(Self {
            client: Client::builder().cookie_store(true).build()?,
            gateway_url: gateway_url.trim_end_matches('/').to_string(),
            proxy_path: "/proxy".to_string(),
        })
    }

    /// Use a proxy mount other than `/proxy`.
    pub fn with_proxy_path(mut self, path: &str) -> Self {
        self.proxy_path = path.trim_end_matches('/').to_string();
        self
    }

    /// Sign in; the session cookie is kept for later calls.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionInfo, SdkError> {
        let resp = self
            .client
            .post(format!("{}/auth/login", self.gateway_url))
            .json(&Credentials { email, password })
            .send()
            .await?;
        let text = check(resp).await?;
        serde_json::from_str(&text).map_err(|e| SdkError::Status {
            status: StatusCode::OK,
            body: format!("unexpected login response ({}): {}", e, text),
        })
    }

    pub async fn logout(&self) -> Result<(), SdkError> {
        let resp = self
            .client
            .post(format!("{}/auth/logout", self.gateway_url))
            .send()
            .await?;
        check(resp).await.map(|_| ())
    }

    /// The current session, or `None` when signed out.
    pub async fn session(&self) -> Result<Option<SessionInfo>, SdkError> {
        let resp = self
            .client
            .get(format!("{}/auth/session", self.gateway_url))
            .send()
            .await?;
        let text = check(resp).await?;
        Ok(serde_json::from_str(&text).ok())
    }

    pub fn users(&self) -> Resource<'_> {
        Resource::new(self, "users")
    }

    pub fn questions(&self) -> Resource<'_> {
        Resource::new(self, "questions")
    }

    pub fn categories(&self) -> Resource<'_> {
        Resource::new(self, "categories")
    }

    pub fn admins(&self) -> Resource<'_> {
        Resource::new(self, "admins")
    }

    pub fn reviews(&self) -> Resource<'_> {
        Resource::new(self, "reviews")
    }

    /// `POST /admin/bootstrap` with the backend's `x-admin-setup-key`.
    pub async fn bootstrap_admin(
        &self,
        setup_key: &str,
        admin: &BootstrapAdmin,
    ) -> Result<Value, SdkError> {
        self.send(
            self.proxied(Method::POST, "admin/bootstrap")
                .header("x-admin-setup-key", setup_key)
                .json(admin),
        )
        .await
    }

    pub async fn analytics_dashboard(&self) -> Result<Value, SdkError> {
        self.send(self.proxied(Method::GET, "analytics/dashboard")).await
    }

    /// Global search across resources.
    pub async fn search(&self, query: &str) -> Result<Value, SdkError> {
        self.send(
            self.proxied(Method::POST, "search")
                .json(&serde_json::json!({ "query": query })),
        )
        .await
    }

    pub(crate) fn proxied(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(
            method,
            format!("{}{}/{}", self.gateway_url, self.proxy_path, path),
        )
    }

    pub(crate) async fn send(&self, req: RequestBuilder) -> Result<Value, SdkError> {
        let text = check(req.send().await?).await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }
}

async fn check(resp: reqwest::Response) -> Result<String, SdkError> {
    let status = resp.status();
    let body = resp.text().await?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(SdkError::Status { status, body })
    }
}
