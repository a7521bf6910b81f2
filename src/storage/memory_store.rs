//! Storage en memoria, usado en tests y como fallback sin disco

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use super::{StorageOperations, StoredData};
use crate::utils::errors::AppResult;

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, StoredData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insertar una entrada ya construida (permite fijar la expiración)
    pub async fn insert_raw(&self, key: &str, data: StoredData) {
        self.entries.write().await.insert(key.to_string(), data);
    }
}

#[async_trait]
impl StorageOperations for MemoryStore {
    async fn get(&self, key: &str) -> AppResult<Option<Value>> {
        let mut entries = self.entries.write().await;
        let expired = match entries.get(key) {
            Some(stored) if !stored.is_expired() => return Ok(Some(stored.data.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            debug!("⏰ Entrada expirada: {}", key);
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: Value, ttl: Option<Duration>) -> AppResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), StoredData::new(value, ttl));
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.get(key).await?.is_some())
    }

    async fn clear(&self) -> AppResult<()> {
        self.entries.write().await.clear();
        Ok(())
    }
}
