//! Búsqueda, filtros y orden de la lista de motos
//!
//! La búsqueda ignora mayúsculas y acentos ("manutenção" encuentra
//! "MANUTENCAO"). Los filtros por lista vacía no filtran nada.

use std::cmp::Ordering;
use std::collections::VecDeque;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::{Moto, MotoStatus};

/// Entradas máximas del historial de búsqueda
pub const SEARCH_HISTORY_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    Placa,
    Modelo,
    Proprietario,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Criterios de búsqueda sobre la lista del store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct MotoFilter {
    pub query: String,
    pub status: Vec<MotoStatus>,
    pub setor: Vec<String>,
    pub modelo: Vec<String>,
    pub sort_by: SortBy,
    pub order: SortOrder,
}

impl MotoFilter {
    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// `true` si algún filtro u orden difiere del estado inicial (la query no cuenta)
    pub fn has_active_filters(&self) -> bool {
        !self.status.is_empty()
            || !self.setor.is_empty()
            || !self.modelo.is_empty()
            || self.sort_by != SortBy::default()
            || self.order != SortOrder::default()
    }

    pub fn clear_filters(&mut self) {
        *self = Self {
            query: std::mem::take(&mut self.query),
            ..Default::default()
        };
    }

    pub fn matches(&self, moto: &Moto) -> bool {
        self.matches_query(moto) && self.matches_filters(moto)
    }

    fn matches_query(&self, moto: &Moto) -> bool {
        let query = fold(self.query.trim());
        if query.is_empty() {
            return true;
        }

        let localizacao = moto.localizacao.as_ref();
        [
            Some(moto.placa.as_str()),
            Some(moto.modelo.as_str()),
            Some(moto.proprietario.as_str()),
            Some(moto.cor.as_str()),
            Some(moto.status.as_str()),
            localizacao.map(|l| l.setor.as_str()),
            localizacao.map(|l| l.posicao.as_str()),
        ]
        .into_iter()
        .flatten()
        .any(|field| fold(field).contains(&query))
    }

    fn matches_filters(&self, moto: &Moto) -> bool {
        if !self.status.is_empty() && !self.status.contains(&moto.status) {
            return false;
        }
        if !self.setor.is_empty() {
            let setor = moto.setor().unwrap_or_default();
            if !self.setor.iter().any(|s| s == setor) {
                return false;
            }
        }
        if !self.modelo.is_empty() && !self.modelo.contains(&moto.modelo) {
            return false;
        }
        true
    }

    fn compare(&self, a: &Moto, b: &Moto) -> Ordering {
        let ordering = match self.sort_by {
            SortBy::Placa => fold(&a.placa).cmp(&fold(&b.placa)),
            SortBy::Modelo => fold(&a.modelo).cmp(&fold(&b.modelo)),
            SortBy::Proprietario => fold(&a.proprietario).cmp(&fold(&b.proprietario)),
            SortBy::CreatedAt => created_millis(a).cmp(&created_millis(b)),
        };
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    /// Búsqueda + filtros + orden; el orden es estable
    pub fn apply(&self, motos: &[Moto]) -> Vec<Moto> {
        let mut result: Vec<Moto> = motos.iter().filter(|m| self.matches(m)).cloned().collect();
        result.sort_by(|a, b| self.compare(a, b));
        result
    }
}

/// Fecha de alta en milisegundos; fechas ilegibles cuentan como 0
fn created_millis(moto: &Moto) -> i64 {
    let raw = moto.created_at.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.timestamp_millis())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|d| d.and_utc().timestamp_millis()))
        .unwrap_or(0)
}

/// Minúsculas sin diacríticos
pub fn fold(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

/// Historial de búsquedas recientes, la más nueva primero y sin duplicados
#[derive(Debug, Clone, Default)]
pub struct SearchHistory {
    entries: VecDeque<String>,
}

impl SearchHistory {
    pub fn add(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }
        self.entries.retain(|q| q != query);
        self.entries.push_front(query.to_string());
        self.entries.truncate(SEARCH_HISTORY_LIMIT);
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Localizacao;

    fn moto(id: &str, placa: &str, modelo: &str, proprietario: &str, status: MotoStatus, setor: &str, created_at: &str) -> Moto {
        Moto {
            id: id.to_string(),
            placa: placa.to_string(),
            modelo: modelo.to_string(),
            cor: "Verde Mottu".to_string(),
            proprietario: proprietario.to_string(),
            status,
            localizacao: Some(Localizacao {
                setor: setor.to_string(),
                posicao: "1".to_string(),
                ultima_atualizacao: String::new(),
            }),
            pos_x: 0.0,
            pos_y: 0.0,
            historico: Vec::new(),
            created_at: created_at.to_string(),
            updated_at: String::new(),
        }
    }

    fn frota() -> Vec<Moto> {
        vec![
            moto("1", "XYZ9A87", "Sport 110i", "João Araújo", MotoStatus::Ativa, "A1", "2024-03-01T10:00:00Z"),
            moto("2", "ABC1234", "CG 160", "Ana", MotoStatus::Manutencao, "B2", "2024-01-01T10:00:00"),
            moto("3", "DEF5G67", "Pop 110i", "Bruno", MotoStatus::Inativa, "A1", "invalida"),
        ]
    }

    fn ids(motos: &[Moto]) -> Vec<&str> {
        motos.iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn test_fold_removes_accents() {
        assert_eq!(fold("Manutenção"), "manutencao");
        assert_eq!(fold("JOÃO Araújo"), "joao araujo");
    }

    #[test]
    fn test_query_is_accent_and_case_insensitive() {
        let motos = frota();
        assert_eq!(ids(&MotoFilter::with_query("joao").apply(&motos)), vec!["1"]);
        assert_eq!(ids(&MotoFilter::with_query("MANUTENÇÃO").apply(&motos)), vec!["2"]);
        assert_eq!(ids(&MotoFilter::with_query("110i").apply(&motos)), vec!["3", "1"]);
        assert_eq!(ids(&MotoFilter::with_query("b2").apply(&motos)), vec!["2"]);
        assert_eq!(MotoFilter::with_query("   ").apply(&motos).len(), 3);
        assert!(MotoFilter::with_query("honda").apply(&motos).is_empty());
    }

    #[test]
    fn test_list_filters() {
        let motos = frota();
        let filter = MotoFilter {
            setor: vec!["A1".to_string()],
            status: vec![MotoStatus::Ativa, MotoStatus::Inativa],
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&motos)), vec!["3", "1"]);

        let filter = MotoFilter {
            modelo: vec!["CG 160".to_string()],
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&motos)), vec!["2"]);
    }

    #[test]
    fn test_sorting() {
        let motos = frota();
        let by_date = MotoFilter {
            sort_by: SortBy::CreatedAt,
            order: SortOrder::Desc,
            ..Default::default()
        };
        assert_eq!(ids(&by_date.apply(&motos)), vec!["1", "2", "3"]);

        let by_owner = MotoFilter {
            sort_by: SortBy::Proprietario,
            ..Default::default()
        };
        assert_eq!(ids(&by_owner.apply(&motos)), vec!["2", "3", "1"]);
    }

    #[test]
    fn test_active_filters_and_clear() {
        let mut filter = MotoFilter::with_query("abc");
        assert!(!filter.has_active_filters());

        filter.order = SortOrder::Desc;
        filter.modelo.push("CG 160".to_string());
        assert!(filter.has_active_filters());

        filter.clear_filters();
        assert!(!filter.has_active_filters());
        assert_eq!(filter.query, "abc");
    }

    #[test]
    fn test_search_history() {
        let mut history = SearchHistory::default();
        history.add("abc");
        history.add("  ");
        history.add("def");
        history.add("abc");
        assert_eq!(history.entries().collect::<Vec<_>>(), vec!["abc", "def"]);

        for i in 0..20 {
            history.add(&format!("q{}", i));
        }
        assert_eq!(history.entries().count(), SEARCH_HISTORY_LIMIT);
        assert_eq!(history.entries().next(), Some("q19"));

        history.clear();
        assert_eq!(history.entries().count(), 0);
    }
}
