//! HttpStore 与进程内 axum 后端之间的端到端测试

mod common;

use std::time::Duration;

use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use serde_json::json;

use hidr::{Config, HidrError, HttpStore, SecretStore, ShareOptions, share_secret, view_secret};

use common::{Backend, serve};

async fn spawn_backend() -> (HttpStore, Backend) {
    let (url, backend) = common::spawn_backend().await;
    let config = Config::new(format!("{url}/"), Duration::from_secs(5)).expect("config");

    (HttpStore::new(&config).expect("http store"), backend)
}

#[tokio::test]
async fn share_and_view_over_http() {
    let (store, backend) = spawn_backend().await;
    let options = ShareOptions {
        reads: Some(3),
        ttl: Some(Duration::from_secs(2 * 60 * 60)),
    };

    let token = share_secret(&store, b"hunter2", &options)
        .await
        .expect("share secret");

    {
        let requests = backend.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);

        let body = &requests[0];
        assert_eq!(body["id"], token.id().to_hex());
        assert_eq!(body["reads"], 3);
        assert_eq!(body["ttl"], 7200);
        assert_eq!(body["iv"].as_str().map(str::len), Some(24));
        assert_eq!(body["tag"].as_str().map(str::len), Some(32));
        assert!(body.get("key").is_none());
    }

    let revealed = view_secret(&store, &token).await.expect("view secret");
    assert_eq!(revealed.plaintext, b"hunter2");
    assert_eq!(revealed.remaining_reads, Some(2));
}

#[tokio::test]
async fn optional_fields_are_omitted() {
    // 未指定 reads / ttl 时不发送这两个字段，由后端使用默认策略。
    let (store, backend) = spawn_backend().await;

    let token = share_secret(&store, b"defaults", &ShareOptions::default())
        .await
        .expect("share secret");

    {
        let requests = backend.requests.lock().unwrap();
        let body = requests[0].as_object().expect("json object");
        assert!(!body.contains_key("reads"));
        assert!(!body.contains_key("ttl"));
    }

    let revealed = view_secret(&store, &token).await.expect("view secret");
    assert_eq!(revealed.remaining_reads, None);
}

#[tokio::test]
async fn backend_error_message_is_surfaced() {
    let (store, _backend) = spawn_backend().await;

    let token = share_secret(
        &store,
        b"read once",
        &ShareOptions {
            reads: Some(1),
            ttl: None,
        },
    )
    .await
    .expect("share secret");

    view_secret(&store, &token).await.expect("first read");

    let err = view_secret(&store, &token).await.expect_err("exhausted");
    match err {
        HidrError::Backend(msg) => assert_eq!(msg, "Secret not found or expired"),
        other => panic!("expected backend error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_error_falls_back_to_status() {
    let app = Router::new().route(
        "/store",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let url = serve(app).await;
    let store = HttpStore::new(&Config::new(url, Duration::from_secs(5)).expect("config"))
        .expect("http store");

    let err = share_secret(&store, b"hunter2", &ShareOptions::default())
        .await
        .expect_err("store must fail");
    match err {
        HidrError::Backend(msg) => assert!(msg.contains("500"), "unexpected message: {msg}"),
        other => panic!("expected backend error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_stored_payload_is_format_error() {
    // 后端返回的字段不是合法 hex：在解密前就拒绝。
    let app = Router::new().route(
        "/retrieve/:id",
        get(|| async {
            Json(json!({
                "content": "not-hex",
                "iv": "00",
                "tag": "00",
                "remainingReads": null,
            }))
        }),
    );
    let url = serve(app).await;
    let store = HttpStore::new(&Config::new(url, Duration::from_secs(5)).expect("config"))
        .expect("http store");

    let token = hidr::ShareToken::decode("AQIDBAUGBwgJCgsMDQ4PEKq7zN3u_wAR").expect("token");
    let err = view_secret(&store, &token).await.expect_err("bad payload");
    assert!(matches!(err, HidrError::Format(_)), "unexpected error: {err:?}");
}

#[tokio::test]
async fn unreachable_backend_is_backend_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let config = Config::new(format!("http://{addr}"), Duration::from_secs(2)).expect("config");
    let store = HttpStore::new(&config).expect("http store");

    let id = hidr::OpaqueId::from_bytes([7; 8]);
    let err = store.retrieve(&id).await.expect_err("connection refused");
    assert!(matches!(err, HidrError::Backend(_)), "unexpected error: {err:?}");
}

#[test]
fn base_url_is_normalized() {
    let config = Config::new("http://127.0.0.1:8787///", Duration::from_secs(1)).expect("config");
    let store = HttpStore::new(&config).expect("http store");

    assert_eq!(store.base_url(), "http://127.0.0.1:8787");
}
