//! Estado compartido del cliente
//!
//! Este módulo arma las piezas de una sesión: gateway HTTP, store de motos,
//! sesión persistida y geometría del pátio. El store se inyecta de forma
//! explícita; no hay singletons.

use std::sync::Arc;

use tracing::info;

use crate::clients::{ApiClient, MotoGateway};
use crate::config::ClientConfig;
use crate::services::{MotoStore, Patio, SessionManager};
use crate::storage::{FileStore, StorageOperations};
use crate::utils::errors::AppResult;

pub type SharedStore = MotoStore<dyn MotoGateway>;

#[derive(Clone)]
pub struct AppState {
    pub config: ClientConfig,
    pub store: SharedStore,
    pub session: Arc<SessionManager<dyn MotoGateway>>,
    pub patio: Patio,
}

impl AppState {
    /// Cliente HTTP real y sesión guardada en `config.session_file`
    pub fn new(config: ClientConfig) -> AppResult<Self> {
        let gateway: Arc<dyn MotoGateway> = Arc::new(ApiClient::new(&config)?);
        let storage: Arc<dyn StorageOperations> = Arc::new(FileStore::new(config.session_file.clone()));
        Ok(Self::with_parts(config, gateway, storage))
    }

    pub fn with_parts(
        config: ClientConfig,
        gateway: Arc<dyn MotoGateway>,
        storage: Arc<dyn StorageOperations>,
    ) -> Self {
        let store = MotoStore::new(gateway, config.history_limit);
        let session = Arc::new(SessionManager::new(store.clone(), storage));

        info!("🧩 Estado inicializado (entorno: {})", config.environment);
        Self {
            config,
            store,
            session,
            patio: Patio::default(),
        }
    }
}
