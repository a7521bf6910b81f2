//! Utilidades de validación
//!
//! Validaciones sintácticas que se ejecutan antes de cualquier llamada de red:
//! placas (formato antiguo y Mercosul), email, contraseña y nombre.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;
use validator::{ValidationError, ValidationErrors};

lazy_static! {
    static ref PLACA_ANTIGA: Regex = Regex::new(r"^[A-Z]{3}[0-9]{4}$").unwrap();
    static ref PLACA_MERCOSUL: Regex = Regex::new(r"^[A-Z]{3}[0-9][A-Z][0-9]{2}$").unwrap();
    static ref EMAIL: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

fn error_with_message(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Forma canónica de una placa: sin espacios ni guiones y en mayúsculas
pub fn normalize_placa(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect::<String>()
        .to_uppercase()
}

/// Validar placa brasileña (formato antiguo `ABC1234` o Mercosul `ABC1D23`).
///
/// La validación es sólo de formato; placas duplicadas no se rechazan.
pub fn validate_placa(value: &str) -> Result<(), ValidationError> {
    if PLACA_ANTIGA.is_match(value) || PLACA_MERCOSUL.is_match(value) {
        return Ok(());
    }
    let mut error = error_with_message("placa", "Placa inválida (use ABC1234 ou ABC1D23)");
    error.add_param("value".into(), &value.to_string());
    Err(error)
}

/// `true` si la placa está en el formato antiguo
pub fn is_placa_antiga(value: &str) -> bool {
    PLACA_ANTIGA.is_match(value)
}

/// Validar formato de email
pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    if !EMAIL.is_match(value) {
        let mut error = error_with_message("email", "Formato de email inválido");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Contraseña: mínimo 6 caracteres, al menos una minúscula y un número
pub fn validate_password(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() < 6 {
        return Err(error_with_message(
            "password",
            "A senha deve ter pelo menos 6 caracteres",
        ));
    }
    if !value.chars().any(|c| c.is_lowercase()) {
        return Err(error_with_message(
            "password",
            "A senha deve conter pelo menos uma letra minúscula",
        ));
    }
    if !value.chars().any(|c| c.is_ascii_digit()) {
        return Err(error_with_message(
            "password",
            "A senha deve conter pelo menos um número",
        ));
    }
    Ok(())
}

/// Nombre entre 2 y 50 caracteres, ignorando espacios en los extremos
pub fn validate_name(value: &str) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if len < 2 {
        return Err(error_with_message("name", "O nome deve ter pelo menos 2 caracteres"));
    }
    if len > 50 {
        return Err(error_with_message("name", "O nome deve ter no máximo 50 caracteres"));
    }
    Ok(())
}

/// Validar que un campo obligatorio no esté vacío
pub fn validate_required(value: &str, field: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = error_with_message("required", format!("{} é obrigatório", field));
        error.add_param("field".into(), &field.to_string());
        return Err(error);
    }
    Ok(())
}

/// Mensaje legible de un `ValidationError`
pub fn message_of(error: &ValidationError) -> String {
    error
        .message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| format!("Campo inválido ({})", error.code))
}

/// Primer mensaje de error siguiendo el orden de campos del formulario
pub fn first_message(errors: &ValidationErrors, fields: &[&str]) -> Option<String> {
    let field_errors = errors.field_errors();
    fields
        .iter()
        .filter_map(|field| field_errors.get(field))
        .find_map(|errors| errors.first())
        .map(message_of)
}
