//! Shared utilities for the gateway integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::HeaderMap,
    response::Response,
    Router,
};
use tokio::net::TcpListener;

use todo_gateway::config::{GatewayConfig, Profile};
use todo_gateway::{HttpServer, Shutdown};

/// A request as seen by a mock upstream.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    /// Origin-form target: path plus query.
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// What a mock upstream answers with.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
    pub delay: Option<Duration>,
}

impl MockReply {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: vec![("content-type", "application/json".to_string())],
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn with_header(mut self, name: &'static str, value: &str) -> Self {
        self.headers.push((name, value.to_string()));
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Clone)]
struct MockState {
    reply: Arc<MockReply>,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

/// A running mock upstream.
pub struct MockUpstream {
    pub addr: SocketAddr,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl MockUpstream {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.captured.lock().unwrap().clone()
    }

    pub fn last(&self) -> CapturedRequest {
        self.requests().pop().expect("upstream received no request")
    }
}

async fn record_and_reply(State(state): State<MockState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
    let uri = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_default();

    state.captured.lock().unwrap().push(CapturedRequest {
        method: parts.method.to_string(),
        uri,
        headers: parts.headers,
        body,
    });

    if let Some(delay) = state.reply.delay {
        tokio::time::sleep(delay).await;
    }

    let mut builder = Response::builder().status(state.reply.status);
    for (name, value) in &state.reply.headers {
        builder = builder.header(*name, value.as_str());
    }
    builder.body(Body::from(state.reply.body.clone())).unwrap()
}

/// Start a mock upstream on an ephemeral port that records every request.
pub async fn start_upstream(reply: MockReply) -> MockUpstream {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        reply: Arc::new(reply),
        captured: captured.clone(),
    };
    let app = Router::new().fallback(record_and_reply).with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, captured }
}

/// Testing-profile configuration pointed at the given upstreams.
pub fn gateway_config(auth_url: &str, task_url: &str) -> GatewayConfig {
    let mut config = GatewayConfig::for_profile(Profile::Testing);
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.upstreams.auth_url = auth_url.to_string();
    config.upstreams.task_url = task_url.to_string();
    config
}

/// Start the gateway on an ephemeral port.
///
/// Keep the returned `Shutdown` alive for the duration of the test.
pub async fn start_gateway(config: GatewayConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// HTTP client that neither uses system proxies nor follows redirects.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

/// An address nothing is listening on.
pub async fn refused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}
