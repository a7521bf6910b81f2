//! Modelo de User y requests de autenticación
//!
//! El usuario de la sesión se persiste completo en el storage local; los
//! requests se validan antes de llegar al gateway.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::validation::{validate_email, validate_name, validate_password};

/// Usuario de la sesión actual
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Request de login; el backend espera `senha`
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(custom = "validate_email")]
    pub email: String,

    #[serde(rename = "senha")]
    #[validate(length(min = 1))]
    pub password: String,
}

impl LoginRequest {
    /// Email en minúsculas y sin espacios, contraseña sin espacios en los extremos
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.trim().to_lowercase(),
            password: password.trim().to_string(),
        }
    }
}

/// Request de registro; el backend espera `nome` y `senha`
#[derive(Debug, Clone, Serialize, Validate)]
pub struct RegisterRequest {
    #[serde(rename = "nome")]
    #[validate(custom = "validate_name")]
    pub name: String,

    #[validate(custom = "validate_email")]
    pub email: String,

    #[serde(rename = "senha")]
    #[validate(custom = "validate_password")]
    pub password: String,
}

impl RegisterRequest {
    pub fn new(name: &str, email: &str, password: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_lowercase(),
            password: password.to_string(),
        }
    }
}
