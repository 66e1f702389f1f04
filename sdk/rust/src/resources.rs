//! Resource groups exposed by the backend API.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::client::{ConsoleClient, SdkError};

/// Pagination plus free-text search, used by users and admins listings.
#[derive(Debug, Clone, Serialize)]
pub struct PageQuery<'a> {
    pub search: &'a str,
    pub page: u32,
    pub limit: u32,
}

impl<'a> PageQuery<'a> {
    pub fn new(search: &'a str) -> Self {
        Self {
            search,
            page: 1,
            limit: 10,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct QuestionQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_filter: Option<String>,
}

/// First super-admin account, created with the backend's setup key.
#[derive(Debug, Clone, Serialize)]
pub struct BootstrapAdmin {
    pub fullname: String,
    pub email: String,
    pub password: String,
}

/// CRUD calls against one backend collection.
pub struct Resource<'a> {
    client: &'a ConsoleClient,
    path: &'static str,
}

impl<'a> Resource<'a> {
    pub(crate) fn new(client: &'a ConsoleClient, path: &'static str) -> Self {
        Self { client, path }
    }

    pub async fn all(&self) -> Result<Value, SdkError> {
        self.client
            .send(self.client.proxied(Method::GET, self.path))
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Value, SdkError> {
        self.client
            .send(self.client.proxied(Method::GET, &self.item(id)))
            .await
    }

    pub async fn create(&self, data: &Value) -> Result<Value, SdkError> {
        self.client
            .send(self.client.proxied(Method::POST, self.path).json(data))
            .await
    }

    pub async fn update(&self, id: &str, data: &Value) -> Result<Value, SdkError> {
        self.client
            .send(self.client.proxied(Method::PUT, &self.item(id)).json(data))
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<Value, SdkError> {
        self.client
            .send(self.client.proxied(Method::DELETE, &self.item(id)))
            .await
    }

    /// List with query parameters (`PageQuery`, `QuestionQuery`, `ReviewQuery`).
    pub async fn list<Q: Serialize + ?Sized>(&self, query: &Q) -> Result<Value, SdkError> {
        self.client
            .send(self.client.proxied(Method::GET, self.path).query(query))
            .await
    }

    fn item(&self, id: &str) -> String {
        format!("{}/{}", self.path, id)
    }
}
