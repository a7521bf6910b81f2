//! Estadísticas del dashboard

use serde::{Deserialize, Serialize};

use super::moto::{Moto, MotoStatus};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct MotoStats {
    pub total: u64,
    pub ativas: u64,
    pub manutencao: u64,
    pub inativas: u64,
}

impl MotoStats {
    /// Calcular las estadísticas a partir de la lista en memoria
    pub fn from_motos(motos: &[Moto]) -> Self {
        motos.iter().fold(Self::default(), |mut stats, moto| {
            stats.total += 1;
            match moto.status {
                MotoStatus::Ativa => stats.ativas += 1,
                MotoStatus::Manutencao => stats.manutencao += 1,
                MotoStatus::Inativa => stats.inativas += 1,
            }
            stats
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertaStats {
    pub total: u64,
    pub nao_resolvidos: u64,
    pub resolvidos: u64,
}

/// Datos del dashboard; cada mitad cae a ceros si su endpoint falla
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DashboardData {
    pub motos: MotoStats,
    pub alertas: AlertaStats,
}

/// Respuesta de `/health`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct HealthInfo {
    pub status: String,
    pub service: Option<String>,
    pub version: Option<String>,
    pub database: Option<String>,
}

impl HealthInfo {
    pub fn is_up(&self) -> bool {
        self.status.eq_ignore_ascii_case("UP")
    }
}
