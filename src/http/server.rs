//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the health endpoint and the proxy catch-all
//! - Wire up middleware (request ID, tracing)
//! - Bind server to listener, plain or TLS
//! - Drain in-flight requests on shutdown

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::proxy::proxy_handler;
use crate::lifecycle::{wait_for, Shutdown};
use crate::net::load_tls_config;
use crate::routing::{RouteError, RouteTable};

/// Time allowed for in-flight requests once TLS shutdown starts.
const TLS_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub client: Client<HttpConnector, Body>,
    pub proxy_timeout: Duration,
    pub max_body_size: usize,
    /// Whether the listener terminates TLS (used for `Location` rewriting).
    pub tls: bool,
}

impl AppState {
    pub fn from_config(config: &GatewayConfig) -> Result<Self, RouteError> {
        let routes = RouteTable::from_config(&config.upstreams)?;
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Ok(Self {
            routes: Arc::new(routes),
            client,
            proxy_timeout: Duration::from_secs(config.timeouts.proxy_secs),
            max_body_size: config.security.max_body_size,
            tls: config.listener.tls.is_some(),
        })
    }
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, RouteError> {
        let state = AppState::from_config(&config)?;
        for target in state.routes.targets() {
            tracing::info!(
                upstream = target.name(),
                prefix = target.prefix(),
                base = %target.base(),
                "Route registered"
            );
        }

        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/api/health", get(health_check).fallback(proxy_handler))
            .route("/", any(proxy_handler))
            .route("/{*path}", any(proxy_handler))
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Run the server on an already bound plain-TCP listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Bind the configured address and serve until `shutdown` fires.
    pub async fn serve(self, shutdown: &Shutdown) -> Result<(), io::Error> {
        let Some(tls) = self.config.listener.tls.clone() else {
            let listener = TcpListener::bind(&self.config.listener.bind_address).await?;
            return self.run(listener, shutdown.subscribe()).await;
        };

        let addr: SocketAddr = self
            .config
            .listener
            .bind_address
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let rustls = load_tls_config(&tls).await?;

        let handle = axum_server::Handle::new();
        let drain = handle.clone();
        let signal = shutdown.subscribe();
        tokio::spawn(async move {
            wait_for(signal).await;
            drain.graceful_shutdown(Some(TLS_DRAIN_TIMEOUT));
        });

        tracing::info!(address = %addr, "HTTPS server starting");
        axum_server::bind_rustls(addr, rustls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

/// Liveness check answered by the gateway itself.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "healthy", "service": "gateway" }))
}
