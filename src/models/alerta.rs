//! Modelo de Alerta

use serde::{Deserialize, Serialize};

/// Categoría del alerta
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TipoAlerta {
    MovimentoNaoAutorizado,
    ManutencaoNecessaria,
    BateriaBaixa,
    ForaDaArea,
}

impl TipoAlerta {
    /// Mapear el código del backend (`BATERIA_BAIXA`) o la forma del cliente
    /// (`bateria_baixa`). `SEM_LEITURA` y códigos desconocidos se tratan como
    /// movimiento no autorizado.
    pub fn from_code(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "MANUTENCAO_NECESSARIA" => TipoAlerta::ManutencaoNecessaria,
            "BATERIA_BAIXA" => TipoAlerta::BateriaBaixa,
            "FORA_DA_AREA" => TipoAlerta::ForaDaArea,
            _ => TipoAlerta::MovimentoNaoAutorizado,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TipoAlerta::MovimentoNaoAutorizado => "Movimento não autorizado",
            TipoAlerta::ManutencaoNecessaria => "Manutenção necessária",
            TipoAlerta::BateriaBaixa => "Bateria baixa",
            TipoAlerta::ForaDaArea => "Fora da área",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Alerta {
    pub id: String,
    pub moto_id: String,
    pub tipo: TipoAlerta,
    pub descricao: String,
    pub timestamp: String,
    pub resolvido: bool,
}
