//! Failure injection tests for the gateway.

use std::time::{Duration, Instant};

use serde_json::{json, Value};

mod common;

use common::{client, gateway_config, refused_addr, start_gateway, start_upstream, MockReply};

#[tokio::test]
async fn slow_upstream_yields_timed_out_502() {
    let auth = start_upstream(MockReply::json(200, "{}")).await;
    // The testing profile allows one second per exchange.
    let tasks = start_upstream(MockReply::json(200, "{}").delayed(Duration::from_secs(3))).await;
    let (gateway, _shutdown) = start_gateway(gateway_config(&auth.url(), &tasks.url())).await;

    let started = Instant::now();
    let res = client()
        .get(format!("http://{gateway}/api/tasks"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 502);
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({"error": "Downstream request timed out"})
    );
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn refused_connection_yields_unavailable_502() {
    let tasks = start_upstream(MockReply::json(200, "{}")).await;
    let dead = refused_addr().await;
    let (gateway, _shutdown) =
        start_gateway(gateway_config(&format!("http://{dead}"), &tasks.url())).await;

    let res = client()
        .post(format!("http://{gateway}/api/auth/login"))
        .body(r#"{"username":"alice"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 502);
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({"error": "Downstream service unavailable"})
    );
    // The other upstream is unaffected.
    assert!(tasks.requests().is_empty());
}

#[tokio::test]
async fn failures_are_never_retried() {
    let auth = start_upstream(MockReply::json(200, "{}")).await;
    let tasks = start_upstream(MockReply::json(200, "{}").delayed(Duration::from_secs(2))).await;
    let (gateway, _shutdown) = start_gateway(gateway_config(&auth.url(), &tasks.url())).await;

    let res = client()
        .post(format!("http://{gateway}/api/tasks"))
        .body(r#"{"title":"buy milk"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 502);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(tasks.requests().len(), 1);
}

#[tokio::test]
async fn upstream_server_error_is_not_masked() {
    let auth = start_upstream(MockReply::json(200, "{}")).await;
    let tasks = start_upstream(MockReply::json(500, r#"{"error": "Internal error"}"#)).await;
    let (gateway, _shutdown) = start_gateway(gateway_config(&auth.url(), &tasks.url())).await;

    let res = client()
        .get(format!("http://{gateway}/api/tasks"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    assert_eq!(res.text().await.unwrap(), r#"{"error": "Internal error"}"#);
}

#[tokio::test]
async fn gateway_stops_on_shutdown() {
    let auth = start_upstream(MockReply::json(200, "{}")).await;
    let tasks = start_upstream(MockReply::json(200, "{}")).await;
    let (gateway, shutdown) = start_gateway(gateway_config(&auth.url(), &tasks.url())).await;
    let client = client();

    let res = client
        .get(format!("http://{gateway}/api/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    shutdown.trigger();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let fresh = common::client();
    assert!(fresh
        .get(format!("http://{gateway}/api/health"))
        .send()
        .await
        .is_err());
}
