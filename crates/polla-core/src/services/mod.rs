// Domain services: one per backend entity, each a thin layer over `ApiClient`
// that unwraps the backend envelope and maps failures to display messages.

pub mod teams;
pub mod tournaments;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::http::{body_message, ApiClient, HttpError};
use crate::models::Envelope;

pub use teams::TeamService;
pub use tournaments::TournamentService;

/// Fallback when a save fails without a backend message.
pub const SAVE_FALLBACK: &str = "Error al procesar la solicitud";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ServiceError {
    /// A mutation was attempted without a session. No request was sent.
    #[error("No autenticado")]
    NotAuthenticated,

    /// The request failed. `message` is the backend's message or the
    /// operation's fallback.
    #[error("{message}")]
    Request {
        message: String,
        #[source]
        source: HttpError,
    },

    /// A 2xx answer that is not a success for this operation.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("{message}")]
    Decode { message: String, detail: String },
}

impl ServiceError {
    /// True when the backend rejected the session token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ServiceError::Request {
                source: HttpError::Unauthorized { .. },
                ..
            }
        )
    }

    pub(crate) fn from_http(err: HttpError, fallback: &str) -> Self {
        if let Some(body) = err.body() {
            debug!(status = ?err.status(), %body, "backend error body");
        }
        let message = err.backend_message().unwrap_or(fallback).to_string();
        ServiceError::Request {
            message,
            source: err,
        }
    }
}

// ---------------------------------------------------------------------------
// Shared service contract
// ---------------------------------------------------------------------------

/// Result of a successful create-or-update.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome {
    pub success: bool,
    pub message: Option<String>,
    pub data: Value,
}

/// A backend collection that can be listed and saved. Drives the list
/// screens generically.
#[async_trait]
pub trait Catalog: Send + Sync {
    type Item: Send + Sync;

    async fn list(&self) -> Result<Vec<Self::Item>, ServiceError>;

    async fn save(&self, item: &Self::Item) -> Result<SaveOutcome, ServiceError>;
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn require_session(api: &ApiClient) -> Result<(), ServiceError> {
    if api.session().is_authenticated() {
        Ok(())
    } else {
        warn!("mutation attempted without a session");
        Err(ServiceError::NotAuthenticated)
    }
}

/// POST an empty body to a list endpoint and unwrap `data`.
async fn fetch_all<T: DeserializeOwned>(
    api: &ApiClient,
    path: &str,
    fallback: &str,
) -> Result<Vec<T>, ServiceError> {
    let resp = api
        .post(path, &serde_json::json!({}))
        .await
        .map_err(|e| ServiceError::from_http(e, fallback))?;

    let envelope: Envelope<Vec<T>> =
        serde_json::from_value(resp.body).map_err(|e| ServiceError::Decode {
            message: fallback.to_string(),
            detail: e.to_string(),
        })?;
    let items = envelope.data.unwrap_or_default();
    debug!(path, count = items.len(), "fetched collection");
    Ok(items)
}

/// Create-or-update through a register endpoint. Only 200 and 201 count as
/// success.
async fn save_entity<B: Serialize + Sync>(
    api: &ApiClient,
    path: &str,
    body: &B,
) -> Result<SaveOutcome, ServiceError> {
    require_session(api)?;

    let resp = api
        .post(path, body)
        .await
        .map_err(|e| ServiceError::from_http(e, SAVE_FALLBACK))?;

    match resp.status {
        200 | 201 => Ok(SaveOutcome {
            success: true,
            message: body_message(&resp.body),
            data: resp.body.get("data").cloned().unwrap_or(Value::Null),
        }),
        status => Err(ServiceError::Rejected {
            status,
            message: body_message(&resp.body).unwrap_or_else(|| SAVE_FALLBACK.to_string()),
        }),
    }
}
