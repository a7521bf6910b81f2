//! Contrato del gateway remoto
//!
//! El store sólo conoce este trait; la implementación HTTP vive en
//! `api_client` y los tests usan gateways falsos.

use async_trait::async_trait;
use serde_json::Value;

use crate::models::{
    Alerta, ApiResponse, DashboardData, Filial, HealthInfo, LoginRequest, Moto, MotoPatch, NewMoto,
    RegisterRequest,
};

/// Operaciones remotas disponibles para el cliente.
///
/// Ninguna operación falla con `Err`: los errores HTTP, de transporte o de
/// parseo se devuelven como `ApiResponse { success: false, error, .. }`.
#[async_trait]
pub trait MotoGateway: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> ApiResponse<Value>;
    async fn register(&self, request: &RegisterRequest) -> ApiResponse<Value>;
    async fn logout(&self) -> ApiResponse<()>;

    /// Token enviado como `Authorization: Bearer` en las llamadas siguientes
    fn set_token(&self, token: Option<String>);

    async fn list_motos(&self) -> ApiResponse<Vec<Moto>>;
    async fn get_moto(&self, id: &str) -> ApiResponse<Moto>;
    async fn create_moto(&self, moto: &NewMoto) -> ApiResponse<Moto>;
    async fn update_moto(&self, id: &str, patch: &MotoPatch) -> ApiResponse<Moto>;
    async fn delete_moto(&self, id: &str) -> ApiResponse<()>;

    async fn list_alertas(&self) -> ApiResponse<Vec<Alerta>>;
    /// `data` es `None` cuando el backend confirma sin devolver el alerta
    async fn resolve_alerta(&self, id: &str) -> ApiResponse<Alerta>;

    async fn list_filiais(&self) -> ApiResponse<Vec<Filial>>;
    async fn health_check(&self) -> ApiResponse<HealthInfo>;
    async fn dashboard(&self) -> ApiResponse<DashboardData>;
}
