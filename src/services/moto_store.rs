//! Store de motos y alertas
//!
//! Único dueño de las colecciones en memoria de la sesión. Toda mutación
//! pasa por el gateway y después se reconcilia la lista local; la única
//! excepción es `move_to`, que es local y efímera.
//!
//! El estado vive detrás de un `RwLock` síncrono: nunca se mantiene tomado
//! a través de un `.await`, así que las lecturas (`get_by_id`, `motos()`)
//! son síncronas.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Local;
use tracing::{debug, info, warn};

use crate::clients::MotoGateway;
use crate::models::{Alerta, Moto, MotoPatch, MotoStats, NewMoto};
use crate::utils::formatting::history_timestamp;

/// Estado del feed de alertas
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AlertFeed {
    #[default]
    NotLoaded,
    Loaded,
    /// El endpoint de alertas no respondió; la lista queda vacía
    Unavailable(String),
}

#[derive(Debug, Default)]
struct StoreState {
    motos: Vec<Moto>,
    alertas: Vec<Alerta>,
    alert_feed: AlertFeed,
    error: Option<String>,
    motos_in_flight: usize,
    alertas_in_flight: usize,
    epoch: u64,
}

#[derive(Debug, Clone, Copy)]
enum BusyKind {
    Motos,
    Alertas,
}

/// Mantiene el indicador de carga encendido mientras vive
struct BusyGuard<'a> {
    state: &'a RwLock<StoreState>,
    kind: BusyKind,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        match self.kind {
            BusyKind::Motos => state.motos_in_flight = state.motos_in_flight.saturating_sub(1),
            BusyKind::Alertas => state.alertas_in_flight = state.alertas_in_flight.saturating_sub(1),
        }
    }
}

/// Store compartido; clonar el store comparte el mismo estado
pub struct MotoStore<G: MotoGateway + ?Sized> {
    gateway: Arc<G>,
    state: Arc<RwLock<StoreState>>,
    history_limit: usize,
}

impl<G: MotoGateway + ?Sized> Clone for MotoStore<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            state: Arc::clone(&self.state),
            history_limit: self.history_limit,
        }
    }
}

impl<G: MotoGateway + ?Sized> MotoStore<G> {
    pub fn new(gateway: Arc<G>, history_limit: usize) -> Self {
        Self {
            gateway,
            state: Arc::new(RwLock::new(StoreState::default())),
            history_limit: history_limit.max(1),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Marca el inicio de una operación: enciende el indicador y devuelve la época actual
    fn begin(&self, kind: BusyKind, clear_error: bool) -> (BusyGuard<'_>, u64) {
        let mut state = self.write();
        match kind {
            BusyKind::Motos => state.motos_in_flight += 1,
            BusyKind::Alertas => state.alertas_in_flight += 1,
        }
        if clear_error {
            state.error = None;
        }
        let epoch = state.epoch;
        drop(state);

        (BusyGuard { state: &self.state, kind }, epoch)
    }

    /// Lock de escritura sólo si la sesión no cambió desde `epoch`
    fn write_current(&self, epoch: u64, op: &str) -> Option<RwLockWriteGuard<'_, StoreState>> {
        let state = self.write();
        if state.epoch != epoch {
            debug!("🕰️ Respuesta descartada de {} (sesión reiniciada)", op);
            return None;
        }
        Some(state)
    }

    fn fail(&self, epoch: u64, op: &str, message: String) -> bool {
        warn!("❌ {} falló: {}", op, message);
        if let Some(mut state) = self.write_current(epoch, op) {
            state.error = Some(message);
        }
        false
    }

    // ===== Motos =====

    /// Reemplazar la lista completa con la del backend.
    ///
    /// Si falla, la lista anterior queda intacta y se registra el error.
    pub async fn load(&self) -> bool {
        let (_busy, epoch) = self.begin(BusyKind::Motos, true);
        let response = self.gateway.list_motos().await;

        match (response.success, response.data) {
            (true, Some(motos)) => {
                let Some(mut state) = self.write_current(epoch, "load") else {
                    return false;
                };
                info!("📥 {} motos cargadas", motos.len());
                state.motos = motos;
                true
            }
            _ => self.fail(epoch, "load", response.error.unwrap_or_else(|| "Erro ao carregar motos".to_string())),
        }
    }

    /// Registrar una moto; sólo se agrega a la lista lo que devuelve el backend
    pub async fn create(&self, moto: NewMoto) -> bool {
        let (_busy, epoch) = self.begin(BusyKind::Motos, true);

        let placa = match moto.validate_fields() {
            Ok(placa) => placa,
            Err(e) => return self.fail(epoch, "create", e.user_message()),
        };
        let moto = NewMoto { placa, ..moto };

        let response = self.gateway.create_moto(&moto).await;
        match (response.success, response.data) {
            (true, Some(created)) => {
                let Some(mut state) = self.write_current(epoch, "create") else {
                    return false;
                };
                info!("🏍️ Moto {} registrada (id {})", created.placa, created.id);
                state.motos.push(created);
                true
            }
            _ => self.fail(epoch, "create", response.error.unwrap_or_else(|| "Erro ao cadastrar moto".to_string())),
        }
    }

    /// Actualizar una moto; la entrada local se reemplaza con la respuesta.
    ///
    /// La posición en el mapa y el historial son sólo del cliente y se conservan.
    pub async fn update(&self, id: &str, patch: MotoPatch) -> bool {
        let (_busy, epoch) = self.begin(BusyKind::Motos, true);

        if let Err(e) = patch.validate_fields() {
            return self.fail(epoch, "update", e.user_message());
        }

        let response = self.gateway.update_moto(id, &patch).await;
        match (response.success, response.data) {
            (true, Some(mut updated)) => {
                let Some(mut state) = self.write_current(epoch, "update") else {
                    return false;
                };
                if let Some(current) = state.motos.iter_mut().find(|m| m.id == id) {
                    updated.pos_x = current.pos_x;
                    updated.pos_y = current.pos_y;
                    updated.historico = std::mem::take(&mut current.historico);
                    *current = updated;
                }
                debug!("✏️ Moto {} actualizada", id);
                true
            }
            _ => self.fail(epoch, "update", response.error.unwrap_or_else(|| "Erro ao atualizar moto".to_string())),
        }
    }

    /// Eliminar una moto en el backend y luego en la lista local
    pub async fn remove(&self, id: &str) -> bool {
        let (_busy, epoch) = self.begin(BusyKind::Motos, true);

        let response = self.gateway.delete_moto(id).await;
        if !response.success {
            return self.fail(epoch, "remove", response.error.unwrap_or_else(|| "Erro ao remover moto".to_string()));
        }

        let Some(mut state) = self.write_current(epoch, "remove") else {
            return false;
        };
        state.motos.retain(|m| m.id != id);
        debug!("🗑️ Moto {} eliminada", id);
        true
    }

    /// Mover una moto en el mapa del pátio. Operación local: no llama al gateway.
    ///
    /// Devuelve `false` si el id no existe.
    pub fn move_to(&self, id: &str, x: f64, y: f64) -> bool {
        let entry = format!("Movida para: {}, {} em {}", x, y, history_timestamp(Local::now()));
        let limit = self.history_limit;

        let mut state = self.write();
        let Some(moto) = state.motos.iter_mut().find(|m| m.id == id) else {
            return false;
        };
        moto.pos_x = x;
        moto.pos_y = y;
        moto.historico.push(entry);
        if moto.historico.len() > limit {
            let excess = moto.historico.len() - limit;
            moto.historico.drain(..excess);
        }
        true
    }

    pub fn get_by_id(&self, id: &str) -> Option<Moto> {
        self.read().motos.iter().find(|m| m.id == id).cloned()
    }

    pub fn motos(&self) -> Vec<Moto> {
        self.read().motos.clone()
    }

    pub fn stats(&self) -> MotoStats {
        MotoStats::from_motos(&self.read().motos)
    }

    // ===== Alertas =====

    /// Cargar alertas. Si el endpoint falla la lista queda vacía y el feed
    /// pasa a `Unavailable`; el error compartido no se toca.
    pub async fn load_alerts(&self) -> bool {
        let (_busy, epoch) = self.begin(BusyKind::Alertas, false);
        let response = self.gateway.list_alertas().await;

        let Some(mut state) = self.write_current(epoch, "load_alerts") else {
            return false;
        };
        match (response.success, response.data) {
            (true, Some(alertas)) => {
                debug!("🔔 {} alertas cargadas", alertas.len());
                state.alertas = alertas;
                state.alert_feed = AlertFeed::Loaded;
                true
            }
            _ => {
                let reason = response.error.unwrap_or_else(|| "sem detalhes".to_string());
                warn!("⚠️ Alertas no disponibles: {}", reason);
                state.alertas.clear();
                state.alert_feed = AlertFeed::Unavailable(reason);
                false
            }
        }
    }

    /// Resolver un alerta: se reemplaza si el backend lo devuelve, si no se quita
    pub async fn resolve_alert(&self, id: &str) -> bool {
        let epoch = self.read().epoch;
        let response = self.gateway.resolve_alerta(id).await;

        if !response.success {
            return self.fail(epoch, "resolve_alert", response.error.unwrap_or_else(|| "Erro ao resolver alerta".to_string()));
        }

        let Some(mut state) = self.write_current(epoch, "resolve_alert") else {
            return false;
        };
        match response.data {
            Some(resolved) => {
                if let Some(current) = state.alertas.iter_mut().find(|a| a.id == id) {
                    *current = resolved;
                }
            }
            None => state.alertas.retain(|a| a.id != id),
        }
        true
    }

    pub fn alertas(&self) -> Vec<Alerta> {
        self.read().alertas.clone()
    }

    /// Alertas todavía no resueltos
    pub fn active_alertas(&self) -> Vec<Alerta> {
        self.read().alertas.iter().filter(|a| !a.resolvido).cloned().collect()
    }

    pub fn alert_feed(&self) -> AlertFeed {
        self.read().alert_feed.clone()
    }

    // ===== Estado =====

    pub fn is_loading(&self) -> bool {
        self.read().motos_in_flight > 0
    }

    pub fn is_loading_alertas(&self) -> bool {
        self.read().alertas_in_flight > 0
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    pub fn clear_error(&self) {
        self.write().error = None;
    }

    /// Vaciar el store (logout). Las respuestas de operaciones iniciadas antes
    /// del reinicio se descartan.
    pub fn reset(&self) {
        let mut state = self.write();
        state.epoch += 1;
        state.motos.clear();
        state.alertas.clear();
        state.alert_feed = AlertFeed::NotLoaded;
        state.error = None;
        info!("🧹 Store reiniciado");
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }
}
