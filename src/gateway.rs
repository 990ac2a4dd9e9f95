//! Client side of the marketplace management API
//!
//! [`Gateway`] is the narrow capability interface the rest of the crate
//! talks to. [`GatewayClient`] implements it over HTTP; tests substitute
//! their own implementations.

use crate::config::Environment;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, FROM, USER_AGENT},
    multipart::{Form, Part},
    Client, RequestBuilder,
};
use serde_json::json;

use crate::constants::{SYNC_FILE_FIELD, SYNC_PATH_FIELD};

const INSTANCE_CLEAN_PATH: &str = "api/app_builder/instance_clean";
const GRAPH_PATH: &str = "api/graph";
const SYNC_PATH: &str = "api/marketplace_builder/marketplace_releases/sync";
const JSON_CONTENT_TYPE: &str = "application/json";

/// A request or response body carried byte for byte, with its media type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl Payload {
    pub fn new(content_type: Option<String>, bytes: impl Into<Bytes>) -> Self {
        Payload {
            content_type,
            bytes: bytes.into(),
        }
    }

    pub fn json(bytes: impl Into<Bytes>) -> Self {
        Payload::new(Some(JSON_CONTENT_TYPE.to_string()), bytes)
    }
}

/// Failure of a single gateway call
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The instance answered with a non-success status.
    #[error("{url} responded with status {status}")]
    Status {
        url: String,
        status: u16,
        body: Payload,
    },

    /// The request never produced a response.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl GatewayError {
    /// HTTP status reported by the instance, if there was a response at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Status { status, .. } => Some(*status),
            GatewayError::Transport { .. } => None,
        }
    }

    /// Body describing the failure, as it should be relayed to a caller.
    ///
    /// The instance's own body when it answered; otherwise a JSON
    /// `{"error": ...}` object.
    pub fn body(&self) -> Payload {
        match self {
            GatewayError::Status { body, .. } => body.clone(),
            GatewayError::Transport { .. } => {
                Payload::json(json!({ "error": self.to_string() }).to_string())
            }
        }
    }
}

/// Fields of a `marketplace_releases/sync` upload
#[derive(Debug, Clone)]
pub struct SyncForm {
    /// Path of the file inside the application, e.g. `views/pages/index.liquid`
    pub path: String,
    pub file_name: Option<String>,
    pub file_body: Bytes,
}

/// Capabilities of a remote marketplace instance
///
/// Every call resolves exactly once, with either the response body or a
/// [`GatewayError`]. Bodies are never decoded on the way through.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Base URL of the instance this gateway is bound to.
    fn url(&self) -> &str;

    /// Remove all instance data. `confirmation` is checked by the server.
    async fn data_clean(&self, confirmation: &str) -> Result<Payload, GatewayError>;

    /// Run a GraphQL request body against the instance.
    async fn graph(&self, query: Payload) -> Result<Payload, GatewayError>;

    /// Upload a single file to the instance.
    async fn sync(&self, form: SyncForm) -> Result<Payload, GatewayError>;
}

pub struct GatewayClient {
    environment: Environment,
    client: Client,
}

impl GatewayClient {
    pub fn new(environment: Environment) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        if !environment.token.is_empty() {
            let hv = HeaderValue::from_str(&format!("Token {}", environment.token))?;
            headers.insert(AUTHORIZATION, hv);
        }
        if !environment.email.is_empty() {
            headers.insert(FROM, HeaderValue::from_str(&environment.email)?);
        }
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("pos-cli/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder().default_headers(headers).build()?;
        Ok(GatewayClient {
            environment,
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.environment.url, path)
    }

    async fn send(&self, url: String, req: RequestBuilder) -> Result<Payload, GatewayError> {
        tracing::debug!(%url, "gateway request");
        let resp = match req.send().await {
            Ok(resp) => resp,
            Err(source) => return Err(GatewayError::Transport { url, source }),
        };
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = match resp.bytes().await {
            Ok(bytes) => bytes,
            Err(source) => return Err(GatewayError::Transport { url, source }),
        };
        let body = Payload::new(content_type, bytes);
        if status.is_success() {
            Ok(body)
        } else {
            tracing::debug!(%url, status = status.as_u16(), "gateway request failed");
            Err(GatewayError::Status {
                url,
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[async_trait]
impl Gateway for GatewayClient {
    fn url(&self) -> &str {
        &self.environment.url
    }

    async fn data_clean(&self, confirmation: &str) -> Result<Payload, GatewayError> {
        let url = self.endpoint(INSTANCE_CLEAN_PATH);
        let req = self
            .client
            .post(&url)
            .json(&json!({ "confirmation_text": confirmation }));
        self.send(url, req).await
    }

    async fn graph(&self, query: Payload) -> Result<Payload, GatewayError> {
        let url = self.endpoint(GRAPH_PATH);
        let content_type = query
            .content_type
            .unwrap_or_else(|| JSON_CONTENT_TYPE.to_string());
        let req = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, content_type)
            .body(query.bytes);
        self.send(url, req).await
    }

    async fn sync(&self, form: SyncForm) -> Result<Payload, GatewayError> {
        let url = self.endpoint(SYNC_PATH);
        let file_name = form.file_name.unwrap_or_else(|| file_name_of(&form.path));
        let part = Part::bytes(form.file_body.to_vec()).file_name(file_name);
        let multipart = Form::new()
            .text(SYNC_PATH_FIELD, form.path)
            .part(SYNC_FILE_FIELD, part);
        let req = self.client.put(&url).multipart(multipart);
        self.send(url, req).await
    }
}

fn file_name_of(path: &str) -> String {
    path.rsplit('/').next().unwrap_or(path).to_string()
}
