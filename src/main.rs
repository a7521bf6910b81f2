use std::str::FromStr;

use anyhow::Result;
use dotenvy::dotenv;
use tracing::{debug, error, info, warn, Level};

use patio_sync::services::Setor;
use patio_sync::{AlertFeed, AppState, ClientConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    let level = std::env::var("LOG_LEVEL")
        .ok()
        .and_then(|raw| Level::from_str(&raw).ok())
        .unwrap_or(Level::DEBUG);
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🏍️ Patio Sync - sincronización de motos y alertas");
    info!("================================================");

    let config = ClientConfig::from_env()?;
    if config.is_development() {
        debug!("⚙️ Configuración: {:?}", config);
    }
    let state = AppState::new(config)?;

    match state.session.restore().await {
        Some(user) => info!("👤 Usuario: {} <{}>", user.name, user.email),
        None => warn!("🔒 Sin sesión guardada; se continúa sin token"),
    }

    let health = state.store.gateway().health_check().await;
    match &health.data {
        Some(info) if health.success && info.is_up() => {
            info!("✅ Backend disponible ({})", info.version.as_deref().unwrap_or("?"))
        }
        _ => warn!("⚠️ Backend no respondió al health check: {}", health.error_or("estado desconocido")),
    }

    let (motos_ok, _) = futures::join!(state.store.load(), state.store.load_alerts());
    if !motos_ok {
        error!(
            "❌ No se pudieron cargar las motos: {}",
            state.store.error().unwrap_or_default()
        );
    }

    let stats = state.store.stats();
    info!(
        "📊 Motos: {} (ativas {}, manutenção {}, inativas {})",
        stats.total, stats.ativas, stats.manutencao, stats.inativas
    );

    match state.store.alert_feed() {
        AlertFeed::Unavailable(reason) => warn!("🔕 Alertas no disponibles: {}", reason),
        _ => info!("🔔 Alertas activas: {}", state.store.active_alertas().len()),
    }

    let summary = state.patio.summarize(&state.store.motos());
    for setor in Setor::ALL {
        info!("   {}: {} motos ({:.0}%)", setor, summary.count(setor), summary.share(setor));
    }

    Ok(())
}
