//! Gateway falso para los tests unitarios del store y de la sesión

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Notify;

use super::gateway::MotoGateway;
use crate::models::{
    Alerta, ApiResponse, DashboardData, Filial, HealthInfo, LoginRequest, Moto, MotoPatch, NewMoto,
    RegisterRequest,
};

type Queue<T> = Mutex<VecDeque<ApiResponse<T>>>;

fn pop<T>(queue: &Queue<T>) -> ApiResponse<T> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| ApiResponse::failure("not configured"))
}

/// Respuestas encoladas por operación y registro de las llamadas recibidas
#[derive(Default)]
pub struct FakeGateway {
    pub calls: Mutex<Vec<String>>,
    pub token: Mutex<Option<String>>,
    pub list_motos: Queue<Vec<Moto>>,
    pub create: Queue<Moto>,
    pub update: Queue<Moto>,
    pub delete: Queue<()>,
    pub alertas: Queue<Vec<Alerta>>,
    pub resolve: Queue<Alerta>,
    pub auth: Queue<Value>,
    pub logout: Queue<()>,
    /// Si está presente, `list_motos` espera esta señal antes de responder
    pub gate: Option<Arc<Notify>>,
}

impl FakeGateway {
    pub fn push<T>(queue: &Queue<T>, response: ApiResponse<T>) {
        queue.lock().unwrap().push_back(response);
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MotoGateway for FakeGateway {
    async fn login(&self, request: &LoginRequest) -> ApiResponse<Value> {
        self.record(format!("login:{}", request.email));
        pop(&self.auth)
    }

    async fn register(&self, request: &RegisterRequest) -> ApiResponse<Value> {
        self.record(format!("register:{}", request.email));
        pop(&self.auth)
    }

    async fn logout(&self) -> ApiResponse<()> {
        self.record("logout".to_string());
        pop(&self.logout)
    }

    fn set_token(&self, token: Option<String>) {
        *self.token.lock().unwrap() = token;
    }

    async fn list_motos(&self) -> ApiResponse<Vec<Moto>> {
        self.record("list_motos".to_string());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        pop(&self.list_motos)
    }

    async fn get_moto(&self, id: &str) -> ApiResponse<Moto> {
        self.record(format!("get_moto:{}", id));
        ApiResponse::failure("not configured")
    }

    async fn create_moto(&self, moto: &NewMoto) -> ApiResponse<Moto> {
        self.record(format!("create_moto:{}", moto.placa));
        pop(&self.create)
    }

    async fn update_moto(&self, id: &str, _patch: &MotoPatch) -> ApiResponse<Moto> {
        self.record(format!("update_moto:{}", id));
        pop(&self.update)
    }

    async fn delete_moto(&self, id: &str) -> ApiResponse<()> {
        self.record(format!("delete_moto:{}", id));
        pop(&self.delete)
    }

    async fn list_alertas(&self) -> ApiResponse<Vec<Alerta>> {
        self.record("list_alertas".to_string());
        pop(&self.alertas)
    }

    async fn resolve_alerta(&self, id: &str) -> ApiResponse<Alerta> {
        self.record(format!("resolve_alerta:{}", id));
        pop(&self.resolve)
    }

    async fn list_filiais(&self) -> ApiResponse<Vec<Filial>> {
        self.record("list_filiais".to_string());
        ApiResponse::ok(Some(Vec::new()))
    }

    async fn health_check(&self) -> ApiResponse<HealthInfo> {
        self.record("health_check".to_string());
        ApiResponse::ok(Some(HealthInfo::default()))
    }

    async fn dashboard(&self) -> ApiResponse<DashboardData> {
        self.record("dashboard".to_string());
        ApiResponse::ok(Some(DashboardData::default()))
    }
}
