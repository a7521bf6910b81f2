//! Storage en un archivo JSON
//!
//! Todo el contenido vive en un único objeto `{clave: StoredData}`. Cada
//! escritura reescribe el archivo completo a través de un temporal y un
//! `rename`, así un corte a mitad de escritura no deja el archivo truncado.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{StorageOperations, StoredData};
use crate::utils::errors::{AppError, AppResult};

type Entries = HashMap<String, StoredData>;

pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> AppResult<Entries> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Entries::new());
        }
        serde_json::from_str(&raw).map_err(|e| {
            warn!("⚠️ Archivo de storage corrupto {}: {}", self.path.display(), e);
            AppError::Storage(format!("arquivo corrompido: {}", e))
        })
    }

    async fn write_entries(&self, entries: &Entries) -> AppResult<()> {
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl StorageOperations for FileStore {
    async fn get(&self, key: &str) -> AppResult<Option<Value>> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;

        let expired = match entries.get(key) {
            Some(stored) if !stored.is_expired() => return Ok(Some(stored.data.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            debug!("⏰ Entrada expirada: {}", key);
            entries.remove(key);
            self.write_entries(&entries).await?;
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: Value, ttl: Option<Duration>) -> AppResult<()> {
        let _guard = self.lock.lock().await;
        // Un archivo corrupto no debe impedir guardar una sesión nueva
        let mut entries = self.read_entries().await.unwrap_or_default();
        entries.insert(key.to_string(), StoredData::new(value, ttl));
        self.write_entries(&entries).await?;
        debug!("💾 Storage SET {}", key);
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await.unwrap_or_default();
        if entries.remove(key).is_some() {
            self.write_entries(&entries).await?;
        }
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.get(key).await?.is_some())
    }

    async fn clear(&self) -> AppResult<()> {
        let _guard = self.lock.lock().await;
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
