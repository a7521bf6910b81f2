//! Cliente de sincronización del pátio de motos
//!
//! Mantiene en memoria la lista de motos y alertas de un pátio, sincronizada
//! con el backend REST, y expone las vistas derivadas que usa la interfaz.

pub mod clients;
pub mod config;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

pub use clients::{ApiClient, MotoGateway};
pub use config::ClientConfig;
pub use models::*;
pub use services::{AlertFeed, MotoStore, SessionManager};
pub use state::AppState;
pub use utils::{AppError, AppResult};
