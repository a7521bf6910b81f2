//! Services module
//!
//! Este módulo contiene la lógica del cliente: conversión de registros del
//! backend, el store de motos y alertas, la sesión y las vistas derivadas
//! (búsqueda y mapa del pátio).

pub mod converter;
pub mod moto_store;
pub mod search;
pub mod session;
pub mod yard;

pub use moto_store::{AlertFeed, MotoStore};
pub use search::{MotoFilter, SearchHistory, SortBy, SortOrder};
pub use session::SessionManager;
pub use yard::{Patio, Setor, YardSummary};
