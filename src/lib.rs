pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use crate::services::assignment_service::{AssignmentStore, PgAssignmentStore};
use crate::services::metadata_service::{HttpMetadataApi, MetadataApi};
use crate::services::roster_service::RosterSession;
use reqwest::Client;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub metadata_api: Arc<dyn MetadataApi>,
    pub assignment_store: Arc<dyn AssignmentStore>,
    pub sessions: Arc<Mutex<HashMap<Uuid, Arc<RosterSession>>>>,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let config = crate::config::get_config();
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .unwrap();

        let metadata_api: Arc<dyn MetadataApi> = Arc::new(HttpMetadataApi::new(
            http_client,
            config.metadata_api_url.clone(),
        ));
        let assignment_store: Arc<dyn AssignmentStore> =
            Arc::new(PgAssignmentStore::new(pool.clone()));

        Self {
            pool,
            metadata_api,
            assignment_store,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}
