//! A stand-in marketplace instance listening on a local port.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{post, put},
    Router,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// One request as the fake instance saw it.
#[derive(Debug, Clone)]
pub struct Captured {
    pub path: String,
    pub headers: HeaderMap,
    pub raw: Bytes,
    pub json: Option<Value>,
    pub fields: Vec<(String, Option<String>, Vec<u8>)>,
}

/// Canned failure: status, content type and body.
#[derive(Clone)]
struct Failure {
    status: u16,
    content_type: &'static str,
    body: String,
}

#[derive(Clone, Default)]
struct FakeState {
    captured: Arc<Mutex<Vec<Captured>>>,
    /// When set, every endpoint answers with this instead of succeeding.
    fail_with: Option<Failure>,
}

pub struct FakeRemote {
    pub url: String,
    captured: Arc<Mutex<Vec<Captured>>>,
}

impl FakeRemote {
    /// Succeeds everywhere; GraphQL and clean calls echo the request bytes.
    pub async fn start() -> Self {
        Self::start_with(None).await
    }

    /// Fails everywhere with a JSON `{"error": ...}` body.
    pub async fn failing(status: u16) -> Self {
        Self::start_with(Some(Failure {
            status,
            content_type: "application/json",
            body: format!(r#"{{"error":"failed with {status}"}}"#),
        }))
        .await
    }

    /// Fails everywhere with a plain-text body, like a proxy error page.
    pub async fn failing_with_text(status: u16, body: &str) -> Self {
        Self::start_with(Some(Failure {
            status,
            content_type: "text/plain",
            body: body.to_string(),
        }))
        .await
    }

    async fn start_with(fail_with: Option<Failure>) -> Self {
        let state = FakeState {
            captured: Arc::default(),
            fail_with,
        };
        let captured = state.captured.clone();
        let app = Router::new()
            .route("/api/app_builder/instance_clean", post(echo_endpoint))
            .route("/api/graph", post(echo_endpoint))
            .route(
                "/api/marketplace_builder/marketplace_releases/sync",
                put(sync_endpoint),
            )
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        FakeRemote {
            url: format!("http://{addr}/"),
            captured,
        }
    }

    pub fn captured(&self) -> Vec<Captured> {
        self.captured.lock().unwrap().clone()
    }
}

fn reply(state: &FakeState, ok: Bytes) -> Response {
    match &state.fail_with {
        None => ([(CONTENT_TYPE, "application/json")], ok).into_response(),
        Some(f) => (
            StatusCode::from_u16(f.status).unwrap(),
            [(CONTENT_TYPE, f.content_type)],
            f.body.clone(),
        )
            .into_response(),
    }
}

async fn echo_endpoint(
    State(state): State<FakeState>,
    uri: axum::http::Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.captured.lock().unwrap().push(Captured {
        path: uri.path().to_string(),
        headers,
        raw: body.clone(),
        json: serde_json::from_slice(&body).ok(),
        fields: Vec::new(),
    });
    reply(&state, body)
}

async fn sync_endpoint(
    State(state): State<FakeState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let data = field.bytes().await.unwrap().to_vec();
        fields.push((name, file_name, data));
    }
    state.captured.lock().unwrap().push(Captured {
        path: "/api/marketplace_builder/marketplace_releases/sync".to_string(),
        headers,
        raw: Bytes::new(),
        json: None,
        fields,
    });
    reply(&state, Bytes::from_static(br#"{"status":"synced"}"#))
}
