//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::Response,
    Router,
};
use tokio::net::TcpListener;

use console_gateway::auth::{Role, Session, SessionUser, SessionResolver};
use console_gateway::config::{AccountConfig, GatewayConfig};
use console_gateway::{HttpServer, Shutdown};

/// A request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    /// Path and query, e.g. `/api/users?search=ann`.
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Canned reply for the mock backend.
#[derive(Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub content_type: Option<&'static str>,
    pub body: &'static str,
}

impl Reply {
    pub fn json(status: u16, body: &'static str) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            content_type: Some("application/json"),
            body,
        }
    }
}

struct BackendState {
    reply: Reply,
    requests: Mutex<Vec<Recorded>>,
}

/// A backend that records every request and answers with a fixed reply.
#[derive(Clone)]
pub struct MockBackend {
    pub addr: SocketAddr,
    state: Arc<BackendState>,
}

impl MockBackend {
    /// Base URL the gateway should be pointed at.
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> Recorded {
        self.requests().pop().expect("backend received no request")
    }
}

async fn record(State(state): State<Arc<BackendState>>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    state.requests.lock().unwrap().push(Recorded {
        method: parts.method,
        uri: parts
            .uri
            .path_and_query()
            .map(|pq| pq.to_string())
            .unwrap_or_default(),
        headers: parts.headers,
        body,
    });

    let reply = &state.reply;
    let mut builder = Response::builder().status(reply.status);
    if let Some(content_type) = reply.content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder.body(Body::from(reply.body)).unwrap()
}

pub async fn start_mock_backend(reply: Reply) -> MockBackend {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = Arc::new(BackendState {
        reply,
        requests: Mutex::new(Vec::new()),
    });

    let app = Router::new().fallback(record).with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockBackend { addr, state }
}

/// A URL nothing is listening on.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api", addr)
}

pub fn config_for(backend_url: &str) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.backend.base_url = backend_url.to_string();
    config.session.secret = "integration-secret".into();
    config
}

pub fn account(email: &str, password: &str, role: Role, token: Option<&str>) -> AccountConfig {
    AccountConfig {
        id: format!("id-{}", email),
        email: email.into(),
        full_name: "Test Admin".into(),
        role,
        password_hash: bcrypt::hash(password, 4).unwrap(),
        access_token: token.map(String::from),
    }
}

pub fn session(role: Role, token: Option<&str>) -> Session {
    Session {
        user: SessionUser {
            id: "42".into(),
            email: "ann@example.com".into(),
            full_name: "Ann".into(),
            role: Some(role),
        },
        access_token: token.map(String::from),
        expires_at: i64::MAX,
    }
}

/// A running gateway plus the handle that stops it.
pub struct Gateway {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl Gateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for Gateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

async fn spawn(server: HttpServer) -> Gateway {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    Gateway { addr, shutdown }
}

/// Start a gateway reading sessions from the signed cookie.
pub async fn start_gateway(config: GatewayConfig) -> Gateway {
    spawn(HttpServer::new(config)).await
}

/// Start a gateway whose every request sees `resolver`'s session.
pub async fn start_gateway_with(
    config: GatewayConfig,
    resolver: Arc<dyn SessionResolver>,
) -> Gateway {
    spawn(HttpServer::with_resolver(config, resolver)).await
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}
