//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, body limit, page guards)
//! - Bind server to listener
//! - Serve console assets when configured

use std::sync::Arc;

use axum::{
    body::Body,
    http::{HeaderName, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post, MethodRouter},
    Json, Router,
};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::auth::handlers::{current_session, login, logout};
use crate::auth::{AccountStore, CookieSessionResolver, SessionCodec, SessionResolver};
use crate::config::GatewayConfig;
use crate::http::proxy::proxy_handler;
use crate::routing::{guard_middleware, GuardTable};

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Outbound client reaching both `http` and `https` backends.
pub type BackendClient = Client<HttpsConnector<HttpConnector>, Body>;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub client: BackendClient,
    pub sessions: Arc<dyn SessionResolver>,
    pub codec: Arc<SessionCodec>,
    pub accounts: Arc<AccountStore>,
    pub guards: Arc<GuardTable>,
}

/// HTTP server for the console gateway.
pub struct HttpServer {
    router: Router,
    config: Arc<GatewayConfig>,
}

impl HttpServer {
    /// Create a server that reads sessions from the signed session cookie.
    pub fn new(config: GatewayConfig) -> Self {
        let codec = Arc::new(SessionCodec::new(
            &config.session.secret,
            config.session.ttl_secs,
        ));
        let resolver = CookieSessionResolver::new(codec.clone(), config.session.cookie_name.clone());
        Self::build(config, codec, Arc::new(resolver))
    }

    /// Create a server with an explicit session resolver.
    pub fn with_resolver(config: GatewayConfig, sessions: Arc<dyn SessionResolver>) -> Self {
        let codec = Arc::new(SessionCodec::new(
            &config.session.secret,
            config.session.ttl_secs,
        ));
        Self::build(config, codec, sessions)
    }

    fn build(
        config: GatewayConfig,
        codec: Arc<SessionCodec>,
        sessions: Arc<dyn SessionResolver>,
    ) -> Self {
        let config = Arc::new(config);

        let client = backend_client();
        let accounts = Arc::new(AccountStore::from_config(&config.accounts));
        let guards = Arc::new(GuardTable::from_config(&config.console, &config.proxy.mount_path));

        tracing::info!(
            backend = %config.backend.base_url,
            tls = config.backend.base_url.starts_with("https://"),
            mount = %config.proxy.mount_path,
            accounts = accounts.len(),
            "Gateway state initialised"
        );

        let state = AppState {
            config: config.clone(),
            client,
            sessions,
            codec,
            accounts,
            guards,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let mount = config.proxy.mount_path.as_str();
        let proxy = || -> MethodRouter<AppState> {
            get(proxy_handler)
                .post(proxy_handler)
                .put(proxy_handler)
                .delete(proxy_handler)
        };

        let router = Router::new()
            .route(mount, proxy())
            .route(&format!("{}/", mount), proxy())
            .route(&format!("{}/{{*path}}", mount), proxy())
            .route("/auth/login", post(login))
            .route("/auth/logout", post(logout))
            .route("/auth/session", get(current_session))
            .route("/healthz", get(healthz));

        let router = match &config.console.assets_dir {
            Some(dir) => router.fallback_service(ServeDir::new(dir)),
            None => router.fallback(not_found),
        };

        let request_id = HeaderName::from_static(X_REQUEST_ID);
        router
            .layer(middleware::from_fn_with_state(state.clone(), guard_middleware))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::new(request_id))
                    .layer(RequestBodyLimitLayer::new(config.security.max_body_size)),
            )
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The router, for driving the server without a socket.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

fn backend_client() -> BackendClient {
    let connector = HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .build();
    Client::builder(TokioExecutor::new()).build(connector)
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}
