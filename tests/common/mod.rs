//! 测试共用的进程内 axum 后端，协议与线上存储后端一致

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};

#[derive(Clone, Default)]
pub struct Backend {
    records: Arc<Mutex<HashMap<String, (Value, Option<u64>)>>>,
    pub requests: Arc<Mutex<Vec<Value>>>,
}

async fn store_handler(State(backend): State<Backend>, Json(body): Json<Value>) -> Response {
    backend.requests.lock().unwrap().push(body.clone());

    let (Some(id), Some(_), Some(_), Some(_)) = (
        body["id"].as_str(),
        body["content"].as_str(),
        body["iv"].as_str(),
        body["tag"].as_str(),
    ) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing required fields" })),
        )
            .into_response();
    };

    let reads = body["reads"].as_u64();
    backend
        .records
        .lock()
        .unwrap()
        .insert(id.to_string(), (body.clone(), reads));

    (StatusCode::CREATED, Json(json!({ "success": true }))).into_response()
}

async fn retrieve_handler(State(backend): State<Backend>, Path(id): Path<String>) -> Response {
    let mut records = backend.records.lock().unwrap();

    let Some((body, reads)) = records.get_mut(&id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Secret not found or expired" })),
        )
            .into_response();
    };

    let remaining = reads.map(|n| n - 1);
    *reads = remaining;

    let response = json!({
        "content": body["content"],
        "iv": body["iv"],
        "tag": body["tag"],
        "remainingReads": remaining,
    });

    if remaining == Some(0) {
        records.remove(&id);
    }

    Json(response).into_response()
}

pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve backend");
    });

    format!("http://{addr}")
}

/// 启动实现 `/store` 与 `/retrieve/:id` 的后端，返回其 URL
pub async fn spawn_backend() -> (String, Backend) {
    let backend = Backend::default();
    let app = Router::new()
        .route("/store", post(store_handler))
        .route("/retrieve/:id", get(retrieve_handler))
        .with_state(backend.clone());

    (serve(app).await, backend)
}
