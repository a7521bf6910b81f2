//! Formateo de valores para mostrar en pantalla

use chrono::{DateTime, Local, NaiveDateTime};

use super::validation::is_placa_antiga;

/// Placa para mostrar: formato antiguo con guión (`ABC-1234`), Mercosul sin cambios
pub fn format_placa(placa: &str) -> String {
    let clean: String = placa
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    if is_placa_antiga(&clean) {
        return format!("{}-{}", &clean[..3], &clean[3..]);
    }
    clean
}

/// Capitaliza cada palabra del nombre
pub fn format_name(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fecha ISO como `dd/mm/yyyy`; si no se puede parsear se devuelve tal cual.
///
/// Acepta RFC3339 y también fechas sin zona (`2024-03-05T10:00:00`), que es
/// como el backend serializa sus timestamps.
pub fn format_date(value: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return dt.format("%d/%m/%Y").to_string();
    }
    match NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(dt) => dt.format("%d/%m/%Y").to_string(),
        Err(_) => value.to_string(),
    }
}

/// Marca de tiempo local usada en las entradas del historial
pub fn history_timestamp(now: DateTime<Local>) -> String {
    now.format("%d/%m/%Y %H:%M:%S").to_string()
}
