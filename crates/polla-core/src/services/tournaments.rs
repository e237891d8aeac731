// Tournament (torneo) service: list and create-or-update.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::{fetch_all, save_entity, Catalog, SaveOutcome, ServiceError};
use crate::http::ApiClient;
use crate::models::Tournament;

pub const LIST_PATH: &str = "/lst-torneos";
pub const SAVE_PATH: &str = "/register-torneo";

const LIST_FALLBACK: &str = "Error al obtener torneos";

pub struct TournamentService {
    api: Arc<ApiClient>,
}

impl TournamentService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Tournament>, ServiceError> {
        fetch_all(&self.api, LIST_PATH, LIST_FALLBACK).await
    }

    pub async fn save(&self, tournament: &Tournament) -> Result<SaveOutcome, ServiceError> {
        let outcome = save_entity(&self.api, SAVE_PATH, tournament).await?;
        info!(id = %tournament.id, name = %tournament.name, "tournament saved");
        Ok(outcome)
    }
}

#[async_trait]
impl Catalog for TournamentService {
    type Item = Tournament;

    async fn list(&self) -> Result<Vec<Tournament>, ServiceError> {
        TournamentService::list(self).await
    }

    async fn save(&self, item: &Tournament) -> Result<SaveOutcome, ServiceError> {
        TournamentService::save(self, item).await
    }
}
