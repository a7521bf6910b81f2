//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del cliente: URL del backend,
//! timeouts, límite del historial y ubicación de la sesión persistida.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::utils::errors::{AppError, AppResult};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HISTORY_LIMIT: usize = 50;
pub const DEFAULT_SESSION_FILE: &str = ".patio_session.json";

/// Configuración del cliente
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub environment: String,
    pub api_base_url: String,
    pub timeout_secs: u64,
    /// Máximo de entradas de `historico` por moto (las más antiguas se descartan)
    pub history_limit: usize,
    pub session_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            history_limit: DEFAULT_HISTORY_LIMIT,
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
        }
    }
}

impl ClientConfig {
    /// Leer la configuración desde el entorno; las variables ausentes usan el valor por defecto
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();

        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            api_base_url: env::var("API_BASE_URL")
                .map(|url| normalize_base_url(&url))
                .unwrap_or(defaults.api_base_url),
            timeout_secs: parse_var("API_TIMEOUT_SECS", defaults.timeout_secs)?,
            history_limit: parse_var("HISTORY_LIMIT", defaults.history_limit)?,
            session_file: env::var("SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.session_file),
        })
    }

    /// Configuración apuntando a otra URL base (tests y herramientas)
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            api_base_url: normalize_base_url(base_url),
            ..Self::default()
        }
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Quitar las barras finales de la URL base
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_var<T: FromStr>(name: &str, default: T) -> AppResult<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a valid number", name))),
        Err(_) => Ok(default),
    }
}
