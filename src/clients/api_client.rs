//! Cliente HTTP para la API de motos
//!
//! Este módulo contiene el cliente HTTP del backend del pátio. Todas las
//! respuestas se normalizan al sobre `ApiResponse`, tanto si el backend
//! devuelve `{success, data, message}` como si devuelve el payload directo.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::gateway::MotoGateway;
use crate::config::ClientConfig;
use crate::models::{
    Alerta, AlertaStats, ApiResponse, DashboardData, Filial, HealthInfo, LoginRequest, Moto,
    MotoPatch, MotoStats, NewMoto, RegisterRequest,
};
use crate::services::converter::{
    alerta_from_value, filial_from_value, list_from_value, moto_from_value, new_moto_payload,
    patch_payload,
};
use crate::utils::errors::{not_found_error, request_failed_error, AppResult};
use crate::utils::validation::normalize_placa;

/// Cliente HTTP del backend (motos, alertas, filiales, auth)
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    /// Crear nuevo cliente HTTP con la URL y el timeout configurados
    pub fn new(config: &ClientConfig) -> AppResult<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        info!("🔗 Cliente API apuntando a {}", config.api_base_url);
        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            token: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Ejecutar una petición y normalizar la respuesta; nunca devuelve `Err`
    async fn make_request(&self, method: Method, endpoint: &str, body: Option<&Value>) -> ApiResponse<Value> {
        match self.send(method.clone(), endpoint, body).await {
            Ok(response) => response,
            Err(e) => {
                warn!("⚠️ Error de red en {} {}: {}", method, endpoint, e);
                e.into()
            }
        }
    }

    async fn send(&self, method: Method, endpoint: &str, body: Option<&Value>) -> AppResult<ApiResponse<Value>> {
        let url = format!("{}{}", self.base_url, endpoint);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header("Accept", "application/json");
        if let Some(token) = self.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        debug!("📡 {} {} -> {}", method, url, status);

        Ok(interpret_response(status, parse_body(&text)))
    }
}

fn id_path(resource: &str, id: &str) -> String {
    format!("/{}/{}", resource, urlencoding::encode(id))
}

/// Parseo tolerante: cuerpo vacío o inválido equivale a "sin payload"
pub fn parse_body(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    serde_json::from_str(text).ok()
}

fn string_field(body: &Value, key: &str) -> Option<String> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// Traducir código HTTP + cuerpo al sobre uniforme
pub fn interpret_response(status: u16, body: Option<Value>) -> ApiResponse<Value> {
    if !(200..300).contains(&status) {
        let message = body
            .as_ref()
            .and_then(|b| string_field(b, "error").or_else(|| string_field(b, "message")));
        return match message {
            Some(message) => ApiResponse::failure(message).with_status(status),
            None => ApiResponse::from(request_failed_error(status)),
        };
    }

    match body {
        Some(Value::Object(map)) if map.contains_key("success") => {
            let envelope = Value::Object(map);
            let success = envelope.get("success").and_then(Value::as_bool).unwrap_or(false);
            let message = string_field(&envelope, "message");
            let error = string_field(&envelope, "error");
            let data = envelope.get("data").filter(|d| !d.is_null()).cloned();

            let error = if success {
                error
            } else {
                Some(
                    error
                        .or_else(|| message.clone())
                        .unwrap_or_else(|| request_failed_error(status).user_message()),
                )
            };

            ApiResponse {
                success,
                data,
                error,
                message,
                status: Some(status),
            }
        }
        other => ApiResponse::ok(other).with_status(status),
    }
}

#[async_trait]
impl MotoGateway for ApiClient {
    async fn login(&self, request: &LoginRequest) -> ApiResponse<Value> {
        let body = serde_json::to_value(request).unwrap_or(Value::Null);
        self.make_request(Method::POST, "/auth/login", Some(&body)).await
    }

    async fn register(&self, request: &RegisterRequest) -> ApiResponse<Value> {
        let body = serde_json::to_value(request).unwrap_or(Value::Null);
        self.make_request(Method::POST, "/auth/register", Some(&body)).await
    }

    async fn logout(&self) -> ApiResponse<()> {
        self.make_request(Method::POST, "/auth/logout", None)
            .await
            .map(|_| ())
    }

    fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = token;
    }

    async fn list_motos(&self) -> ApiResponse<Vec<Moto>> {
        let response = self.make_request(Method::GET, "/motos", None).await;
        if response.success && response.data.is_none() {
            return ApiResponse::ok(Some(Vec::new())).with_status(response.status.unwrap_or(200));
        }
        let response = response.map(|data| list_from_value(&data, moto_from_value));
        if response.success {
            return response.with_message("Motos carregadas com sucesso");
        }
        response
    }

    async fn get_moto(&self, id: &str) -> ApiResponse<Moto> {
        let response = self.make_request(Method::GET, &id_path("motos", id), None).await;
        if response.success && response.data.is_none() {
            return not_found_error("Moto", id).into();
        }
        response.map(|data| moto_from_value(&data))
    }

    async fn create_moto(&self, moto: &NewMoto) -> ApiResponse<Moto> {
        let placa = normalize_placa(&moto.placa);
        let body = new_moto_payload(moto, &placa, Utc::now().timestamp_millis());
        self.make_request(Method::POST, "/motos", Some(&body))
            .await
            .map(|data| moto_from_value(&data))
    }

    async fn update_moto(&self, id: &str, patch: &MotoPatch) -> ApiResponse<Moto> {
        let placa = patch.placa.as_deref().map(normalize_placa);
        let body = patch_payload(patch, placa.as_deref());
        self.make_request(Method::PUT, &id_path("motos", id), Some(&body))
            .await
            .map(|data| moto_from_value(&data))
    }

    async fn delete_moto(&self, id: &str) -> ApiResponse<()> {
        self.make_request(Method::DELETE, &id_path("motos", id), None)
            .await
            .map(|_| ())
    }

    async fn list_alertas(&self) -> ApiResponse<Vec<Alerta>> {
        let response = self.make_request(Method::GET, "/alertas", None).await;
        if response.success && response.data.is_none() {
            return ApiResponse::ok(Some(Vec::new())).with_status(response.status.unwrap_or(200));
        }
        response.map(|data| list_from_value(&data, alerta_from_value))
    }

    async fn resolve_alerta(&self, id: &str) -> ApiResponse<Alerta> {
        let endpoint = format!("{}/resolve", id_path("alertas", id));
        self.make_request(Method::PATCH, &endpoint, None)
            .await
            .map(|data| alerta_from_value(&data))
    }

    async fn list_filiais(&self) -> ApiResponse<Vec<Filial>> {
        self.make_request(Method::GET, "/filiais", None)
            .await
            .map(|data| list_from_value(&data, filial_from_value))
    }

    async fn health_check(&self) -> ApiResponse<HealthInfo> {
        self.make_request(Method::GET, "/health", None)
            .await
            .map(|data| serde_json::from_value(data).unwrap_or_default())
    }

    async fn dashboard(&self) -> ApiResponse<DashboardData> {
        let (motos, alertas) = futures::join!(
            self.make_request(Method::GET, "/motos/stats", None),
            self.make_request(Method::GET, "/alertas/stats", None),
        );

        let motos: MotoStats = match (motos.success, motos.data) {
            (true, Some(data)) => serde_json::from_value(data).unwrap_or_default(),
            _ => MotoStats::default(),
        };
        let alertas: AlertaStats = match (alertas.success, alertas.data) {
            (true, Some(data)) => serde_json::from_value(data).unwrap_or_default(),
            _ => AlertaStats::default(),
        };

        ApiResponse::ok(Some(DashboardData { motos, alertas }))
            .with_message("Dashboard carregado com sucesso")
    }
}
