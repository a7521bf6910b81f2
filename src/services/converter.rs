//! Conversor de entidades
//!
//! Traduce registros arbitrarios del backend a los modelos canónicos del
//! cliente y los modelos del cliente a los payloads que espera el backend.
//!
//! Las funciones de entrada nunca fallan: cada campo se coerciona a texto y,
//! si falta, toma su valor por defecto. Aplicar la conversión a su propia
//! salida serializada produce el mismo resultado.

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};

use crate::models::{
    Alerta, Coordenadas, Filial, Localizacao, Moto, MotoPatch, MotoStatus, NewMoto, TipoAlerta, User,
};
use crate::utils::formatting::format_date;

pub const DEFAULT_SETOR: &str = "A1";
pub const DEFAULT_POSICAO: &str = "1";
pub const DEFAULT_COR: &str = "Verde Mottu";
pub const DEFAULT_PROPRIETARIO: &str = "—";
pub const UNKNOWN_MOTO_ID: &str = "unknown";

/// Texto de un campo escalar; `null`, vacío, arrays y objetos cuentan como ausentes
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Primer campo presente entre varios nombres posibles
fn text_of(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| text(record.get(*key)))
}

fn number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn boolean(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
        Some(Value::String(s)) => matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "sim"),
        _ => false,
    }
}

/// Normalizar el estado de cualquier variante del backend
pub fn normalize_status(value: Option<&Value>) -> MotoStatus {
    text(value)
        .map(|raw| MotoStatus::normalize(&raw))
        .unwrap_or_default()
}

/// Convertir un registro del backend en una `Moto` canónica
pub fn moto_from_value(record: &Value) -> Moto {
    moto_from_value_at(record, Utc::now())
}

/// Igual que [`moto_from_value`] con un "ahora" explícito para los defaults
pub fn moto_from_value_at(record: &Value, now: DateTime<Utc>) -> Moto {
    let created_at = text_of(record, &["createdAt", "created_at"]).unwrap_or_else(|| now.to_rfc3339());
    let updated_at = text_of(record, &["updatedAt", "updated_at"]).unwrap_or_else(|| created_at.clone());

    let localizacao = match record.get("localizacao") {
        Some(loc @ Value::Object(_)) => Localizacao {
            setor: text(loc.get("setor")).unwrap_or_else(|| DEFAULT_SETOR.to_string()),
            posicao: text(loc.get("posicao")).unwrap_or_else(|| DEFAULT_POSICAO.to_string()),
            ultima_atualizacao: text(loc.get("ultimaAtualizacao")).unwrap_or_else(|| updated_at.clone()),
        },
        _ => Localizacao {
            setor: text(record.get("setor")).unwrap_or_else(|| DEFAULT_SETOR.to_string()),
            posicao: text(record.get("posicao")).unwrap_or_else(|| DEFAULT_POSICAO.to_string()),
            ultima_atualizacao: updated_at.clone(),
        },
    };

    let historico: Vec<String> = match record.get("historico") {
        Some(Value::Array(items)) => items.iter().filter_map(|item| text(Some(item))).collect(),
        _ => Vec::new(),
    };
    let historico = if historico.is_empty() {
        vec![format!("Cadastrada em {}", format_date(&created_at))]
    } else {
        historico
    };

    Moto {
        id: text(record.get("id")).unwrap_or_default(),
        placa: text(record.get("placa"))
            .map(|p| p.trim().to_uppercase())
            .unwrap_or_default(),
        modelo: text(record.get("modelo")).unwrap_or_default(),
        cor: text(record.get("cor")).unwrap_or_else(|| DEFAULT_COR.to_string()),
        proprietario: text(record.get("proprietario")).unwrap_or_else(|| DEFAULT_PROPRIETARIO.to_string()),
        status: normalize_status(record.get("status")),
        localizacao: Some(localizacao),
        pos_x: number(record.get("posX")).unwrap_or(0.0),
        pos_y: number(record.get("posY")).unwrap_or(0.0),
        historico,
        created_at,
        updated_at,
    }
}

/// Convertir un registro del backend en un `Alerta`
pub fn alerta_from_value(record: &Value) -> Alerta {
    let moto_id = record
        .get("moto")
        .and_then(|moto| text(moto.get("id")))
        .or_else(|| text(record.get("motoId")))
        .unwrap_or_else(|| UNKNOWN_MOTO_ID.to_string());

    Alerta {
        id: text(record.get("id")).unwrap_or_default(),
        moto_id,
        tipo: text(record.get("tipo"))
            .map(|t| TipoAlerta::from_code(&t))
            .unwrap_or(TipoAlerta::MovimentoNaoAutorizado),
        descricao: text_of(record, &["descricao", "mensagem"]).unwrap_or_default(),
        timestamp: text_of(record, &["timestamp", "createdAt"]).unwrap_or_default(),
        resolvido: boolean(record.get("resolvido")),
    }
}

/// Convertir un registro de `/filiais`; un campo nulo sólo afecta a ese campo
pub fn filial_from_value(record: &Value) -> Filial {
    let count = |key: &str| number(record.get(key)).map(|n| n.max(0.0) as u32).unwrap_or(0);
    let coordenadas = record.get("coordenadas").and_then(|c| {
        Some(Coordenadas {
            latitude: number(c.get("latitude"))?,
            longitude: number(c.get("longitude"))?,
        })
    });

    Filial {
        id: text(record.get("id")).unwrap_or_default(),
        nome: text(record.get("nome")).unwrap_or_default(),
        endereco: text(record.get("endereco")).unwrap_or_default(),
        cidade: text(record.get("cidade")).unwrap_or_default(),
        estado: text(record.get("estado")).unwrap_or_default(),
        pais: text(record.get("pais")).unwrap_or_default(),
        total_motos: count("totalMotos"),
        disponivel: count("disponivel"),
        manutencao: count("manutencao"),
        alugada: count("alugada"),
        coordenadas,
    }
}

/// Listas: el backend puede devolver un array o un objeto suelto
pub fn list_from_value<T>(value: &Value, convert: impl Fn(&Value) -> T) -> Vec<T> {
    match value {
        Value::Array(items) => items.iter().map(convert).collect(),
        Value::Object(_) => vec![convert(value)],
        _ => Vec::new(),
    }
}

/// Usuario de la sesión a partir de la respuesta de login/registro
pub fn user_from_value(record: &Value, email: &str, fallback_id: &str) -> User {
    User {
        id: text(record.get("id")).unwrap_or_else(|| fallback_id.to_string()),
        name: text_of(record, &["name", "nome"]).unwrap_or_else(|| "Usuário".to_string()),
        email: text(record.get("email")).unwrap_or_else(|| email.to_string()),
        token: text(record.get("token")),
    }
}

/// Payload de alta en el formato del backend.
///
/// `millis` alimenta los identificadores de serie y RFID que el backend exige.
pub fn new_moto_payload(moto: &NewMoto, placa: &str, millis: i64) -> Value {
    let (setor, posicao) = match &moto.localizacao {
        Some(loc) => (loc.setor.clone(), loc.posicao.clone()),
        None => (DEFAULT_SETOR.to_string(), DEFAULT_POSICAO.to_string()),
    };

    json!({
        "placa": placa,
        "modelo": moto.modelo,
        "cor": moto.cor,
        "proprietario": moto.proprietario,
        "numeroSerie": format!("SN{}", millis),
        "tagRFID": format!("RF{}", millis),
        "status": moto.status.backend_code(),
        "setor": setor,
        "posicao": posicao,
    })
}

/// Payload de actualización: sólo los campos presentes en el patch
pub fn patch_payload(patch: &MotoPatch, placa: Option<&str>) -> Value {
    let mut body = Map::new();
    if let Some(placa) = placa {
        body.insert("placa".into(), json!(placa));
    }
    if let Some(modelo) = &patch.modelo {
        body.insert("modelo".into(), json!(modelo));
    }
    if let Some(cor) = &patch.cor {
        body.insert("cor".into(), json!(cor));
    }
    if let Some(proprietario) = &patch.proprietario {
        body.insert("proprietario".into(), json!(proprietario));
    }
    if let Some(status) = patch.status {
        body.insert("status".into(), json!(status.backend_code()));
    }
    if let Some(loc) = &patch.localizacao {
        body.insert("setor".into(), json!(loc.setor));
        body.insert("posicao".into(), json!(loc.posicao));
    }
    Value::Object(body)
}
