//! Geometría del pátio y agregación por setor
//!
//! El mapa del pátio se divide en cuatro cuadrantes iguales. La zona de una
//! moto se calcula a partir de su posición local (`pos_x`, `pos_y`), no del
//! setor que informa el backend.

use serde::{Deserialize, Serialize};

use crate::models::Moto;

/// Tamaño del marcador de una moto en el mapa
pub const MARKER_SIZE: f64 = 60.0;

const DEFAULT_WIDTH: f64 = 360.0 * 0.9;
const HEIGHT_RATIO: f64 = 0.6;

/// Cuadrante del pátio
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Setor {
    #[serde(rename = "Setor A")]
    A,
    #[serde(rename = "Setor B")]
    B,
    #[serde(rename = "Setor C")]
    C,
    #[serde(rename = "Setor D")]
    D,
}

impl Setor {
    pub const ALL: [Setor; 4] = [Setor::A, Setor::B, Setor::C, Setor::D];

    pub fn label(&self) -> &'static str {
        match self {
            Setor::A => "Setor A",
            Setor::B => "Setor B",
            Setor::C => "Setor C",
            Setor::D => "Setor D",
        }
    }

    fn index(&self) -> usize {
        match self {
            Setor::A => 0,
            Setor::B => 1,
            Setor::C => 2,
            Setor::D => 3,
        }
    }
}

impl std::fmt::Display for Setor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Dimensiones del mapa del pátio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Patio {
    pub width: f64,
    pub height: f64,
}

impl Default for Patio {
    fn default() -> Self {
        Self::with_width(DEFAULT_WIDTH)
    }
}

impl Patio {
    /// Pátio con la proporción estándar (alto = 60% del ancho)
    pub fn with_width(width: f64) -> Self {
        Self {
            width,
            height: width * HEIGHT_RATIO,
        }
    }

    /// Cuadrante que contiene el punto; los bordes centrales pertenecen a B/C/D
    pub fn zone_for(&self, x: f64, y: f64) -> Setor {
        let left = x < self.width / 2.0;
        let top = y < self.height / 2.0;
        match (top, left) {
            (true, true) => Setor::A,
            (true, false) => Setor::B,
            (false, true) => Setor::C,
            (false, false) => Setor::D,
        }
    }

    /// Limitar la posición para que el marcador quede dentro del mapa
    pub fn clamp(&self, x: f64, y: f64) -> (f64, f64) {
        let max_x = (self.width - MARKER_SIZE).max(0.0);
        let max_y = (self.height - MARKER_SIZE).max(0.0);
        (x.clamp(0.0, max_x), y.clamp(0.0, max_y))
    }

    pub fn summarize(&self, motos: &[Moto]) -> YardSummary {
        let mut summary = YardSummary::default();
        for moto in motos {
            summary.total += 1;
            summary.por_setor[self.zone_for(moto.pos_x, moto.pos_y).index()] += 1;
        }
        summary
    }

    pub fn motos_in(&self, setor: Setor, motos: &[Moto]) -> Vec<Moto> {
        motos
            .iter()
            .filter(|m| self.zone_for(m.pos_x, m.pos_y) == setor)
            .cloned()
            .collect()
    }
}

/// Conteo de motos por setor para la vista del supervisor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct YardSummary {
    pub total: usize,
    por_setor: [usize; 4],
}

impl YardSummary {
    pub fn count(&self, setor: Setor) -> usize {
        self.por_setor[setor.index()]
    }

    /// Porcentaje de ocupación del setor sobre el total (0 si no hay motos)
    pub fn share(&self, setor: Setor) -> f64 {
        self.count(setor) as f64 / self.total.max(1) as f64 * 100.0
    }
}
