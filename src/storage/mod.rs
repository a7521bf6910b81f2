//! Almacenamiento clave-valor local
//!
//! Guarda la sesión (`@user`, `@token`) entre ejecuciones. Cada valor se
//! envuelve en `StoredData` con su marca de tiempo y expiración opcional;
//! las entradas expiradas se leen como ausentes y se eliminan.

pub mod file_store;
pub mod memory_store;

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::utils::errors::AppResult;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;

/// Valor almacenado con sus metadatos (milisegundos desde epoch)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredData {
    pub data: Value,
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<i64>,
}

impl StoredData {
    pub fn new(data: Value, ttl: Option<Duration>) -> Self {
        let now = Utc::now().timestamp_millis();
        Self {
            data,
            timestamp: now,
            expiration: ttl.map(|ttl| now + ttl.as_millis() as i64),
        }
    }

    pub fn is_expired_at(&self, now_millis: i64) -> bool {
        matches!(self.expiration, Some(expiration) if now_millis > expiration)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp_millis())
    }
}

/// Operaciones del almacenamiento local
#[async_trait]
pub trait StorageOperations: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<Value>>;
    async fn set(&self, key: &str, value: Value, ttl: Option<Duration>) -> AppResult<()>;
    async fn remove(&self, key: &str) -> AppResult<()>;
    async fn exists(&self, key: &str) -> AppResult<bool>;
    async fn clear(&self) -> AppResult<()>;
}

/// Leer y deserializar un valor tipado
pub async fn get_as<T: DeserializeOwned>(storage: &dyn StorageOperations, key: &str) -> AppResult<Option<T>> {
    match storage.get(key).await? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Serializar y guardar un valor tipado sin expiración
pub async fn set_as<T: Serialize + Sync>(storage: &dyn StorageOperations, key: &str, value: &T) -> AppResult<()> {
    storage.set(key, serde_json::to_value(value)?, None).await
}
