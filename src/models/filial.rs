//! Modelo de Filial (sólo lectura)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coordenadas {
    pub latitude: f64,
    pub longitude: f64,
}

/// Filial de `/filiais`, ya convertida; campos ausentes toman su valor por defecto
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Filial {
    pub id: String,
    pub nome: String,
    pub endereco: String,
    pub cidade: String,
    pub estado: String,
    pub pais: String,
    pub total_motos: u32,
    pub disponivel: u32,
    pub manutencao: u32,
    pub alugada: u32,
    pub coordenadas: Option<Coordenadas>,
}

impl Filial {
    /// Porcentaje de motos disponibles sobre el total
    pub fn disponibilidade(&self) -> f64 {
        if self.total_motos == 0 {
            return 0.0;
        }
        f64::from(self.disponivel) / f64::from(self.total_motos) * 100.0
    }
}
