//! Sesión del usuario
//!
//! Mantiene el usuario autenticado, lo persiste en el storage local bajo
//! `@user`/`@token` y propaga el token al gateway. El logout vacía el store
//! de motos para que nada de la sesión anterior quede visible.

use std::sync::{Arc, RwLock};

use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};
use validator::Validate;

use crate::clients::MotoGateway;
use crate::models::{ApiResponse, LoginRequest, RegisterRequest, User};
use crate::services::converter::user_from_value;
use crate::services::moto_store::MotoStore;
use crate::storage::{get_as, set_as, StorageOperations};
use crate::utils::errors::{validation_error, AppError, AppResult};
use crate::utils::validation::first_message;

pub const USER_KEY: &str = "@user";
pub const TOKEN_KEY: &str = "@token";

pub struct SessionManager<G: MotoGateway + ?Sized> {
    store: MotoStore<G>,
    storage: Arc<dyn StorageOperations>,
    user: RwLock<Option<User>>,
}

impl<G: MotoGateway + ?Sized> SessionManager<G> {
    pub fn new(store: MotoStore<G>, storage: Arc<dyn StorageOperations>) -> Self {
        Self {
            store,
            storage,
            user: RwLock::new(None),
        }
    }

    pub fn current_user(&self) -> Option<User> {
        self.user.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.read().unwrap_or_else(|e| e.into_inner()).is_some()
    }

    fn set_user(&self, user: Option<User>) {
        self.store.gateway().set_token(user.as_ref().and_then(|u| u.token.clone()));
        *self.user.write().unwrap_or_else(|e| e.into_inner()) = user;
    }

    /// Recuperar la sesión guardada. Datos corruptos borran ambas claves.
    pub async fn restore(&self) -> Option<User> {
        match self.read_stored().await {
            Ok(user) => {
                if let Some(user) = &user {
                    info!("🔑 Sesión restaurada para {}", user.email);
                }
                self.set_user(user.clone());
                user
            }
            Err(e) => {
                warn!("⚠️ Sesión guardada inválida, se descarta: {}", e);
                if matches!(e, AppError::Storage(_)) {
                    // El archivo entero es ilegible: no hay claves que borrar una a una
                    if let Err(e) = self.storage.clear().await {
                        warn!("⚠️ No se pudo limpiar el storage: {}", e);
                    }
                }
                self.clear_stored().await;
                self.set_user(None);
                None
            }
        }
    }

    async fn read_stored(&self) -> AppResult<Option<User>> {
        let Some(mut user) = get_as::<User>(self.storage.as_ref(), USER_KEY).await? else {
            return Ok(None);
        };
        if let Some(token) = get_as::<String>(self.storage.as_ref(), TOKEN_KEY).await? {
            user.token = Some(token);
        }
        Ok(Some(user))
    }

    async fn persist(&self, user: &User) -> AppResult<()> {
        set_as(self.storage.as_ref(), USER_KEY, user).await?;
        match &user.token {
            Some(token) => set_as(self.storage.as_ref(), TOKEN_KEY, token).await,
            None => self.storage.remove(TOKEN_KEY).await,
        }
    }

    async fn clear_stored(&self) {
        for key in [USER_KEY, TOKEN_KEY] {
            if let Err(e) = self.storage.remove(key).await {
                warn!("⚠️ No se pudo borrar {}: {}", key, e);
            }
        }
    }

    /// Iniciar sesión. El email se normaliza y se valida antes de llamar al backend.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<User> {
        let request = LoginRequest::new(email, password);
        if request.email.is_empty() {
            return Err(validation_error("Email é obrigatório"));
        }
        if let Err(errors) = request.validate() {
            let message = match first_message(&errors, &["email"]) {
                Some(message) => message,
                None => "Senha é obrigatória".to_string(),
            };
            return Err(AppError::Validation(message));
        }

        let response = self.store.gateway().login(&request).await;
        let user = self.accept(response, &request.email, None, "Email ou senha incorretos")?;
        self.save(&user).await;
        info!("✅ Login de {}", user.email);
        Ok(user)
    }

    /// Registrar un usuario nuevo y dejarlo con la sesión iniciada
    pub async fn register(&self, name: &str, email: &str, password: &str) -> AppResult<User> {
        let request = RegisterRequest::new(name, email, password);
        if request.name.is_empty() {
            return Err(validation_error("Nome é obrigatório"));
        }
        if request.email.is_empty() {
            return Err(validation_error("Email é obrigatório"));
        }
        request.validate().map_err(|errors| {
            first_message(&errors, &["nome", "email", "senha"])
                .map(AppError::Validation)
                .unwrap_or_else(|| AppError::from(errors))
        })?;

        let response = self.store.gateway().register(&request).await;
        let user = self.accept(response, &request.email, Some(&request.name), "Erro ao cadastrar usuário")?;
        self.save(&user).await;
        info!("✅ Usuario {} registrado", user.email);
        Ok(user)
    }

    fn accept(
        &self,
        response: ApiResponse<Value>,
        email: &str,
        name: Option<&str>,
        fallback: &str,
    ) -> AppResult<User> {
        let data = match (response.success, response.data) {
            (true, Some(data)) => data,
            _ => {
                return Err(AppError::Backend {
                    status: response.status.unwrap_or(0),
                    message: response.error.unwrap_or_else(|| fallback.to_string()),
                })
            }
        };

        let fallback_id = Utc::now().timestamp_millis().to_string();
        let mut user = user_from_value(&data, email, &fallback_id);
        user.email = email.to_string();
        if let Some(name) = name {
            let backend_name = ["name", "nome"]
                .iter()
                .filter_map(|key| data.get(*key).and_then(Value::as_str))
                .any(|n| !n.trim().is_empty());
            if !backend_name {
                user.name = name.to_string();
            }
        }

        self.set_user(Some(user.clone()));
        Ok(user)
    }

    /// Un fallo del storage no invalida la sesión en memoria
    async fn save(&self, user: &User) {
        if let Err(e) = self.persist(user).await {
            warn!("⚠️ No se pudo guardar la sesión: {}", e);
        }
    }

    /// Cerrar sesión: logout remoto best-effort, storage limpio y store vacío
    pub async fn logout(&self) {
        let response = self.store.gateway().logout().await;
        if !response.success {
            warn!("⚠️ Logout remoto falló: {}", response.error_or("sem detalhes"));
        }

        self.clear_stored().await;
        self.set_user(None);
        self.store.reset();
        info!("👋 Sesión cerrada");
    }
}
