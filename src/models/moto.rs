//! Modelo de Moto
//!
//! Este módulo contiene el struct Moto canónico del cliente y los payloads
//! de alta y actualización que el store envía al gateway.

use serde::{Deserialize, Serialize};

use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{message_of, normalize_placa, validate_placa, validate_required};

/// Estado de la moto; minúsculas en el cliente, mayúsculas en el backend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum MotoStatus {
    #[default]
    Ativa,
    Manutencao,
    Inativa,
}

impl MotoStatus {
    pub const ALL: [MotoStatus; 3] = [MotoStatus::Ativa, MotoStatus::Manutencao, MotoStatus::Inativa];

    /// Normalizar cualquier representación (`ATIVA`, `Manutencao`, ...).
    /// Valores desconocidos se convierten en `Ativa`.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "manutencao" => MotoStatus::Manutencao,
            "inativa" => MotoStatus::Inativa,
            _ => MotoStatus::Ativa,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MotoStatus::Ativa => "ativa",
            MotoStatus::Manutencao => "manutencao",
            MotoStatus::Inativa => "inativa",
        }
    }

    /// Código que espera el backend
    pub fn backend_code(&self) -> &'static str {
        match self {
            MotoStatus::Ativa => "ATIVA",
            MotoStatus::Manutencao => "MANUTENCAO",
            MotoStatus::Inativa => "INATIVA",
        }
    }
}

/// Ubicación de la moto dentro del pátio
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Localizacao {
    pub setor: String,
    pub posicao: String,
    pub ultima_atualizacao: String,
}

/// Moto canónica tal como la mantiene el store.
///
/// `pos_x`/`pos_y` e `historico` son sólo del cliente: el backend no los
/// conoce y `load()` los reemplaza.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Moto {
    pub id: String,
    pub placa: String,
    pub modelo: String,
    pub cor: String,
    pub proprietario: String,
    pub status: MotoStatus,
    pub localizacao: Option<Localizacao>,
    pub pos_x: f64,
    pub pos_y: f64,
    pub historico: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Moto {
    pub fn setor(&self) -> Option<&str> {
        self.localizacao.as_ref().map(|l| l.setor.as_str())
    }
}

/// Request para registrar una moto nueva
#[derive(Debug, Clone, Default)]
pub struct NewMoto {
    pub placa: String,
    pub modelo: String,
    pub cor: String,
    pub proprietario: String,
    pub status: MotoStatus,
    pub localizacao: Option<Localizacao>,
}

impl NewMoto {
    /// Validación previa a la llamada de red; devuelve la placa normalizada
    pub fn validate_fields(&self) -> AppResult<String> {
        let placa = normalize_placa(&self.placa);
        validate_required(&placa, "Placa").map_err(|e| AppError::Validation(message_of(&e)))?;
        validate_placa(&placa).map_err(|e| AppError::Validation(message_of(&e)))?;
        validate_required(&self.modelo, "Modelo").map_err(|e| AppError::Validation(message_of(&e)))?;
        Ok(placa)
    }
}

/// Request para actualizar parcialmente una moto; los campos `None` no se envían
#[derive(Debug, Clone, Default)]
pub struct MotoPatch {
    pub placa: Option<String>,
    pub modelo: Option<String>,
    pub cor: Option<String>,
    pub proprietario: Option<String>,
    pub status: Option<MotoStatus>,
    pub localizacao: Option<Localizacao>,
}

impl MotoPatch {
    pub fn is_empty(&self) -> bool {
        self.placa.is_none()
            && self.modelo.is_none()
            && self.cor.is_none()
            && self.proprietario.is_none()
            && self.status.is_none()
            && self.localizacao.is_none()
    }

    /// Sólo valida la placa si viene en el patch
    pub fn validate_fields(&self) -> AppResult<Option<String>> {
        match &self.placa {
            Some(raw) => {
                let placa = normalize_placa(raw);
                validate_placa(&placa).map_err(|e| AppError::Validation(message_of(&e)))?;
                Ok(Some(placa))
            }
            None => Ok(None),
        }
    }
}
