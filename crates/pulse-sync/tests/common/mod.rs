//! Fake remote collection: a real axum server on an ephemeral loopback port
//! that records what it was sent.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct Captured {
    pub headers: HeaderMap,
    pub query: HashMap<String, String>,
    pub body: Option<Value>,
}

#[derive(Default)]
pub struct MockState {
    /// Rows returned by a successful list.
    pub rows: Vec<Value>,
    /// Raw body returned by list instead of `rows`.
    pub raw_list_body: Option<String>,
    pub list_status: Option<StatusCode>,
    pub create_status: Option<StatusCode>,
    pub list_calls: Vec<Captured>,
    pub created: Vec<Captured>,
}

type Shared = Arc<Mutex<MockState>>;

pub struct MockRemote {
    pub base_url: String,
    pub state: Shared,
}

impl MockRemote {
    pub fn list_calls(&self) -> Vec<Captured> {
        self.state.lock().unwrap().list_calls.clone()
    }

    pub fn created(&self) -> Vec<Captured> {
        self.state.lock().unwrap().created.clone()
    }
}

pub async fn spawn(state: MockState) -> MockRemote {
    let state: Shared = Arc::new(Mutex::new(state));

    let app = Router::new()
        .route("/message", get(list).post(create))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockRemote {
        base_url: format!("http://{}", addr),
        state,
    }
}

/// A loopback address nothing is listening on.
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn row(id: &str, content: &str, author: &str, enhanced: bool, timestamp: i64) -> Value {
    serde_json::json!({
        "id": id,
        "content": content,
        "author": author,
        "ai_enhanced": enhanced,
        "timestamp": timestamp,
    })
}

async fn list(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut s = state.lock().unwrap();
    s.list_calls.push(Captured {
        headers,
        query,
        body: None,
    });

    if let Some(status) = s.list_status {
        return status.into_response();
    }
    if let Some(raw) = &s.raw_list_body {
        return raw.clone().into_response();
    }
    Json(s.rows.clone()).into_response()
}

async fn create(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    let mut s = state.lock().unwrap();
    s.created.push(Captured {
        headers,
        query: HashMap::new(),
        body: Some(body.clone()),
    });

    match s.create_status {
        Some(status) => status,
        None => {
            s.rows.insert(0, body);
            StatusCode::CREATED
        }
    }
}

pub mod fixtures {
    use std::sync::Arc;

    use pulse_remote::{RemoteConfig, RemoteRecordService};
    use pulse_store::LocalCacheStore;
    use pulse_sync::SyncCoordinator;
    use pulse_types::models::Record;

    pub const KEY: &str = "anon-test-key";

    pub fn record(id: &str, ts: i64) -> Record {
        Record {
            id: id.into(),
            content: format!("note {}", id),
            author: "Ann".into(),
            enhanced: false,
            created_at_millis: ts,
        }
    }

    pub fn coordinator(config: RemoteConfig) -> SyncCoordinator {
        SyncCoordinator::new(
            Arc::new(LocalCacheStore::open_in_memory().unwrap()),
            Arc::new(RemoteRecordService::new(config)),
        )
    }

    pub fn local_ids(coordinator: &SyncCoordinator) -> Vec<String> {
        coordinator.local().load().into_iter().map(|r| r.id).collect()
    }
}
