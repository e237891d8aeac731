// Team (equipo) service: list, create-or-update, delete.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

use super::{fetch_all, require_session, save_entity, Catalog, SaveOutcome, ServiceError};
use crate::http::ApiClient;
use crate::models::Team;

pub const LIST_PATH: &str = "/lst-equipos";
pub const SAVE_PATH: &str = "/register";
pub const DELETE_PATH: &str = "/abm-equipo";

const LIST_FALLBACK: &str = "Error al obtener equipos";
const DELETE_FALLBACK: &str = "Error al eliminar el equipo";

pub struct TeamService {
    api: Arc<ApiClient>,
}

impl TeamService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Team>, ServiceError> {
        fetch_all(&self.api, LIST_PATH, LIST_FALLBACK).await
    }

    /// Same endpoint for create and update; the id travels as `0` for new
    /// teams.
    pub async fn save(&self, team: &Team) -> Result<SaveOutcome, ServiceError> {
        let outcome = save_entity(&self.api, SAVE_PATH, team).await?;
        info!(id = %team.id, name = %team.name, "team saved");
        Ok(outcome)
    }

    /// Delete by id. Returns the backend payload as-is.
    pub async fn delete(&self, id: i64) -> Result<Value, ServiceError> {
        require_session(&self.api)?;

        let resp = self
            .api
            .post(DELETE_PATH, &json!({ "codEquipo": id, "ACCION": "D" }))
            .await
            .map_err(|e| ServiceError::from_http(e, DELETE_FALLBACK))?;
        info!(id, "team deleted");
        Ok(resp.body)
    }
}

#[async_trait]
impl Catalog for TeamService {
    type Item = Team;

    async fn list(&self) -> Result<Vec<Team>, ServiceError> {
        TeamService::list(self).await
    }

    async fn save(&self, item: &Team) -> Result<SaveOutcome, ServiceError> {
        TeamService::save(self, item).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
