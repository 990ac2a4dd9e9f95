//! Axum route handlers for the local proxy server.
//!
//! Every handler is a pass-through: request bodies go to the gateway as
//! received and results come back through [`relay`].

use std::{path::Path, sync::Arc};

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header::CONTENT_TYPE, HeaderMap},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};

use super::error::{relay, ErrorStatusPolicy, ServerError};
use crate::constants::{MAX_UPLOAD_BYTES, SYNC_FILE_FIELD, SYNC_PATH_FIELD};
use crate::gateway::{Gateway, Payload, SyncForm};

// ── Shared state ─────────────────────────────────────────────────────────────

/// Read-only state shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn Gateway>,
    /// URL reported by `/info`; `None` when no instance is configured.
    pub marketplace_url: Option<String>,
    pub error_status: ErrorStatusPolicy,
}

// ── Router ────────────────────────────────────────────────────────────────────

/// Build the proxy router. Static GUI assets are read from
/// `<gui_dir>/editor/public` and `<gui_dir>/graphql/public`.
pub fn create_router(state: AppState, gui_dir: &Path) -> Router {
    Router::new()
        .route("/info", get(info))
        .route("/graphql", post(graphql))
        .route("/api/graph", post(graphql))
        .route(
            "/api/marketplace_builder/marketplace_releases/sync",
            put(sync),
        )
        .nest_service(
            "/gui/editor",
            ServeDir::new(gui_dir.join("editor").join("public")),
        )
        .nest_service(
            "/gui/graphql",
            ServeDir::new(gui_dir.join("graphql").join("public")),
        )
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// `GET /info` — the instance this server forwards to.
pub async fn info(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "MARKETPLACE_URL": state.marketplace_url }))
}

/// `POST /graphql`, `POST /api/graph` — forward a GraphQL request body.
///
/// The body is not parsed: whatever arrives, with its `Content-Type`, is
/// what the instance receives.
pub async fn graphql(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let query = Payload::new(content_type, body);
    relay(state.error_status, state.gateway.graph(query).await)
}

/// `PUT /api/marketplace_builder/marketplace_releases/sync` — forward one file.
///
/// # Errors
/// Returns [`ServerError::BadRequest`] when the `path` or
/// `marketplace_builder_file_body` field is missing, and
/// [`ServerError::Multipart`] when the body is not valid multipart data.
pub async fn sync(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, ServerError> {
    let mut path = None;
    let mut file = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            SYNC_PATH_FIELD => path = Some(field.text().await?),
            SYNC_FILE_FIELD => {
                let file_name = field.file_name().map(str::to_owned);
                file = Some((file_name, field.bytes().await?));
            }
            _ => {}
        }
    }

    let path = path
        .ok_or_else(|| ServerError::BadRequest(format!("missing '{SYNC_PATH_FIELD}' field")))?;
    let (file_name, file_body) = file
        .ok_or_else(|| ServerError::BadRequest(format!("missing '{SYNC_FILE_FIELD}' field")))?;

    let form = SyncForm {
        path,
        file_name,
        file_body,
    };
    Ok(relay(state.error_status, state.gateway.sync(form).await))
}
