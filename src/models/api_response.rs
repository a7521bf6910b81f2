//! Sobre de respuesta uniforme del gateway
//!
//! Todas las operaciones del gateway devuelven este sobre, sin importar si el
//! backend respondió con `{success, data, message}`, con el payload directo o
//! si la llamada ni siquiera llegó al servidor.

use serde::{Deserialize, Serialize};

use crate::utils::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub message: Option<String>,
    /// Código HTTP recibido; `None` si falló el transporte
    #[serde(skip)]
    pub status: Option<u16>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: Option<T>) -> Self {
        Self {
            success: true,
            data,
            error: None,
            message: None,
            status: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
            status: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Transformar el payload conservando el resto del sobre
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            success: self.success,
            data: self.data.map(f),
            error: self.error,
            message: self.message,
            status: self.status,
        }
    }

    /// Mensaje de error para la interfaz, con un texto por defecto
    pub fn error_or(&self, fallback: &str) -> String {
        self.error
            .clone()
            .or_else(|| if self.success { None } else { self.message.clone() })
            .unwrap_or_else(|| fallback.to_string())
    }
}

impl<T> From<AppError> for ApiResponse<T> {
    fn from(e: AppError) -> Self {
        let status = e.status();
        Self {
            success: false,
            data: None,
            error: Some(e.user_message()),
            message: None,
            status,
        }
    }
}
