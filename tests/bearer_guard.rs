//! Bearer guard and `/verify` contract, driven in-process.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware,
    response::Response,
    routing::get,
    Json, Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use todo_gateway::auth::{
    require_auth, verify_handler, AuthenticatedUser, KeySet, TokenIssuer, TokenVerifier,
};

const SECRET: &str = "guard-test-secret";

async fn whoami(user: AuthenticatedUser) -> Json<AuthenticatedUser> {
    Json(user)
}

fn app() -> Router {
    let verifier = Arc::new(TokenVerifier::new(KeySet::hs256(SECRET)));
    Router::new()
        .route("/api/tasks", get(whoami))
        .route_layer(middleware::from_fn_with_state(verifier.clone(), require_auth))
        .route("/api/auth/verify", get(verify_handler))
        .route("/unguarded", get(whoami))
        .with_state(verifier)
}

fn token_for(user_id: i64, username: &str) -> String {
    TokenIssuer::new(KeySet::hs256(SECRET), 1)
        .issue(user_id, username)
        .unwrap()
}

async fn call(path: &str, authorization: Option<&str>) -> Response {
    let mut request = Request::get(path);
    if let Some(value) = authorization {
        request = request.header("Authorization", value);
    }
    app()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn missing_or_malformed_header_is_401_missing() {
    let alice = token_for(7, "alice");
    let basic = format!("Basic {alice}");
    let lowercase = format!("bearer {alice}");

    for header in [None, Some("Bearer "), Some(basic.as_str()), Some(lowercase.as_str())] {
        let response = call("/api/tasks", header).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{header:?}");
        assert_eq!(
            json_body(response).await,
            json!({"error": "Missing or invalid Authorization header"})
        );
    }
}

#[tokio::test]
async fn bad_token_is_401_invalid() {
    let foreign = TokenIssuer::new(KeySet::hs256("someone-else"), 1)
        .issue(7, "alice")
        .unwrap();

    for token in ["not-a-jwt".to_string(), foreign] {
        let response = call("/api/tasks", Some(&format!("Bearer {token}"))).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            json_body(response).await,
            json!({"error": "Invalid or expired token"})
        );
    }
}

#[tokio::test]
async fn valid_token_exposes_identity_to_handler() {
    let header = format!("Bearer {}", token_for(7, "alice"));
    let response = call("/api/tasks", Some(&header)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({"user_id": 7, "username": "alice"})
    );
}

#[tokio::test]
async fn verify_endpoint_echoes_identity() {
    let header = format!("Bearer {}", token_for(12, "bob"));
    let response = call("/api/auth/verify", Some(&header)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"user_id": 12, "username": "bob"}));

    let response = call("/api/auth/verify", Some("Bearer garbage")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        json_body(response).await,
        json!({"error": "Invalid or expired token"})
    );
}

#[tokio::test]
async fn extractor_without_guard_rejects() {
    let header = format!("Bearer {}", token_for(7, "alice"));
    let response = call("/unguarded", Some(&header)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
