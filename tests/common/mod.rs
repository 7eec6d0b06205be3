//! In-process HTTP fakes for the external services.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A request the fake server received.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub headers: HeaderMap,
    pub body: Value,
}

#[derive(Clone, Default)]
pub struct FakeState {
    pub requests: Arc<Mutex<Vec<Recorded>>>,
    /// Status and body returned by every route when set.
    pub failure: Arc<Mutex<Option<(StatusCode, String)>>>,
    /// Rows returned by the turbopuffer query route.
    pub rows: Arc<Mutex<Vec<Value>>>,
    pub embedding_dim: usize,
}

impl FakeState {
    fn record(&self, path: String, headers: HeaderMap, body: Value) {
        self.requests.lock().unwrap().push(Recorded {
            path,
            headers,
            body,
        });
    }

    fn failure(&self) -> Option<Response> {
        self.failure
            .lock()
            .unwrap()
            .clone()
            .map(|(status, body)| (status, body).into_response())
    }
}

pub struct FakeServer {
    pub addr: SocketAddr,
    pub state: FakeState,
    shutdown_tx: Option<oneshot::Sender<()>>,
    _handle: JoinHandle<()>,
}

impl FakeServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn fail_with(&self, status: StatusCode, body: &str) {
        *self.state.failure.lock().unwrap() = Some((status, body.to_string()));
    }

    pub fn set_rows(&self, rows: Vec<Value>) {
        *self.state.rows.lock().unwrap() = rows;
    }
}

impl Drop for FakeServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Embeds text `i` as a one-hot vector at `i % dim`.
async fn embeddings(
    State(state): State<FakeState>,
    headers: HeaderMap,
    axum::Json(body): axum::Json<Value>,
) -> Response {
    state.record("/embeddings".into(), headers, body.clone());
    if let Some(resp) = state.failure() {
        return resp;
    }

    let inputs = body["input"].as_array().cloned().unwrap_or_default();
    // Reverse the order to check that clients sort by index.
    let data: Vec<Value> = inputs
        .iter()
        .enumerate()
        .rev()
        .map(|(i, _)| {
            let mut v = vec![0.0f32; state.embedding_dim];
            v[i % state.embedding_dim] = 1.0;
            json!({ "object": "embedding", "embedding": v, "index": i })
        })
        .collect();

    axum::Json(json!({ "object": "list", "data": data, "model": body["model"] })).into_response()
}

async fn namespace_query(
    State(state): State<FakeState>,
    Path(namespace): Path<String>,
    headers: HeaderMap,
    axum::Json(body): axum::Json<Value>,
) -> Response {
    state.record(format!("/v2/namespaces/{namespace}/query"), headers, body.clone());
    if let Some(resp) = state.failure() {
        return resp;
    }

    let top_k = body["top_k"].as_u64().unwrap_or(10) as usize;
    let rows: Vec<Value> = state.rows.lock().unwrap().iter().take(top_k).cloned().collect();
    axum::Json(json!({ "rows": rows })).into_response()
}

async fn evaluate(
    State(state): State<FakeState>,
    headers: HeaderMap,
    axum::Json(body): axum::Json<Value>,
) -> Response {
    state.record("/evaluate".into(), headers, body.clone());
    if let Some(resp) = state.failure() {
        return resp;
    }

    let submitted = body["object_ids"].as_array().map(Vec::len).unwrap_or(0);
    axum::Json(json!({
        "average_final_score": 0.61,
        "num_candidates": submitted,
        "average_hard_scores": [{ "criteria_name": "JD degree", "pass_rate": 0.8 }],
        "average_soft_scores": [{ "criteria_name": "Tax advice", "average_score": 0.42 }],
        "config_path": body["config_path"]
    }))
    .into_response()
}

/// Starts a server answering the embedding, turbopuffer and evaluation routes.
pub async fn spawn_fake_services(embedding_dim: usize) -> FakeServer {
    let state = FakeState {
        embedding_dim,
        ..Default::default()
    };

    let app = Router::new()
        .route("/embeddings", post(embeddings))
        .route("/v2/namespaces/{namespace}/query", post(namespace_query))
        .route("/evaluate", post(evaluate))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake server");
    let addr = listener.local_addr().expect("fake server addr");
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await;
    });

    FakeServer {
        addr,
        state,
        shutdown_tx: Some(shutdown_tx),
        _handle: handle,
    }
}
