//! Error types for the local server.

use std::{io, net::SocketAddr};

use axum::{
    body::Body,
    extract::multipart::MultipartError,
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::gateway::{GatewayError, Payload};

/// Errors raised by the server itself, before a request reaches the gateway.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ServerError {
    /// The request is missing something the gateway call needs.
    #[error("invalid request: {0}")]
    BadRequest(String),

    /// The multipart body could not be read.
    #[error("invalid multipart body: {0}")]
    Multipart(#[from] MultipartError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Multipart(e) => e.status(),
        };
        (status, Json(json!({"error": self.to_string()}))).into_response()
    }
}

/// Failure to open the listening socket.
#[derive(Debug, thiserror::Error)]
pub enum BindError {
    #[error("Port {port} is already in use.")]
    AddrInUse { port: u16 },

    #[error("Something wrong happened when trying to run the server on {addr}: {source}")]
    Other {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
}

impl BindError {
    pub fn from_io(addr: SocketAddr, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::AddrInUse {
            BindError::AddrInUse { port: addr.port() }
        } else {
            BindError::Other { addr, source }
        }
    }
}

/// HTTP status used when relaying a failed gateway call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorStatusPolicy {
    /// Always answer 200 and let the body carry the error.
    #[default]
    Ok,
    /// Reuse the instance's status; 502 when the request never got a response.
    Upstream,
}

impl ErrorStatusPolicy {
    pub fn status_for(self, err: &GatewayError) -> StatusCode {
        match self {
            ErrorStatusPolicy::Ok => StatusCode::OK,
            ErrorStatusPolicy::Upstream => err
                .status()
                .and_then(|s| StatusCode::from_u16(s).ok())
                .unwrap_or(StatusCode::BAD_GATEWAY),
        }
    }
}

/// Turn a gateway result into the response sent back to the caller.
///
/// Bodies are written byte for byte with the instance's `Content-Type`.
pub fn relay(policy: ErrorStatusPolicy, result: Result<Payload, GatewayError>) -> Response {
    match result {
        Ok(body) => payload_response(StatusCode::OK, body),
        Err(err) => {
            tracing::warn!(error = %err, "relaying gateway failure");
            payload_response(policy.status_for(&err), err.body())
        }
    }
}

fn payload_response(status: StatusCode, payload: Payload) -> Response {
    let mut resp = (status, Body::from(payload.bytes)).into_response();
    if let Some(ct) = payload
        .content_type
        .and_then(|ct| HeaderValue::from_str(&ct).ok())
    {
        resp.headers_mut().insert(CONTENT_TYPE, ct);
    }
    resp
}
