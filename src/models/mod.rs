//! Modelos del sistema
//!
//! Este módulo contiene los modelos canónicos del cliente y el sobre de
//! respuesta uniforme del gateway.

pub mod alerta;
pub mod api_response;
pub mod filial;
pub mod moto;
pub mod stats;
pub mod user;

pub use alerta::{Alerta, TipoAlerta};
pub use api_response::ApiResponse;
pub use filial::{Coordenadas, Filial};
pub use moto::{Localizacao, Moto, MotoPatch, MotoStatus, NewMoto};
pub use stats::{AlertaStats, DashboardData, HealthInfo, MotoStats};
pub use user::{LoginRequest, RegisterRequest, User};
