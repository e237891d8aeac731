// HTTP client for the polla backend.
//
// Every call is a JSON POST. The client attaches the session's bearer token,
// normalizes transport failures into user-facing messages, and tears the
// session down when the backend answers 401.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::BackendConfig;
use crate::session::{EndReason, SessionStore};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("La conexión tardó demasiado tiempo. Por favor, intenta de nuevo.")]
    Timeout,

    #[error("No se pudo conectar al servidor ({base_url}). Verifica que el servidor esté funcionando.")]
    Unreachable { base_url: String },

    /// 401. The session has already been torn down when this is returned.
    #[error("{}", status_message(&401, .message))]
    Unauthorized { message: Option<String>, body: Value },

    /// Any other non-2xx status. `message` is the body's `message` field.
    #[error("{}", status_message(.status, .message))]
    Status {
        status: u16,
        message: Option<String>,
        body: Value,
    },

    #[error("{0}")]
    Transport(String),

    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

impl HttpError {
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Unauthorized { .. } => Some(401),
            HttpError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The `message` the backend put in its error body, if any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            HttpError::Unauthorized { message, .. } | HttpError::Status { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&Value> {
        match self {
            HttpError::Unauthorized { body, .. } | HttpError::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}

fn status_message(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(m) => m.to_string(),
        None => format!("Request failed with status code {status}"),
    }
}

/// Extract a non-empty string `message` field from a JSON body.
pub(crate) fn body_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// A successful (2xx) response, passed through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        session: Arc<SessionStore>,
    ) -> Result<Self, HttpError> {
        let base_url: String = base_url.into();
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(HttpError::Build)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn from_config(config: &BackendConfig, session: Arc<SessionStore>) -> Result<Self, HttpError> {
        Self::new(
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
            session,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// POST `body` as JSON to `path` (relative to the base address).
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse, HttpError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));

        let mut request = self.http.post(&url).json(body);
        if let Some(token) = self.session.current_token() {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        debug!(path, "POST");
        let response = request.send().await.map_err(|e| self.classify(e))?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| self.classify(e))?;
        let body = parse_body(&text);
        debug!(path, status, "response");

        if (200..300).contains(&status) {
            return Ok(ApiResponse { status, body });
        }

        let message = body_message(&body);
        if status == 401 {
            warn!(path, "backend answered 401; clearing session");
            self.session.teardown(EndReason::Unauthorized);
            return Err(HttpError::Unauthorized { message, body });
        }

        warn!(path, status, "backend error");
        Err(HttpError::Status {
            status,
            message,
            body,
        })
    }

    fn classify(&self, err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            warn!("request timed out: {err}");
            HttpError::Timeout
        } else if err.is_connect() {
            warn!("backend unreachable: {err}");
            HttpError::Unreachable {
                base_url: self.base_url.clone(),
            }
        } else {
            warn!("transport error: {err}");
            HttpError::Transport(err.to_string())
        }
    }
}

fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
