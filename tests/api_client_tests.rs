//! Tests del gateway HTTP contra un backend falso en proceso (axum)

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::sync::oneshot;

use patio_sync::storage::MemoryStore;
use patio_sync::{AlertFeed, ApiClient, AppState, ClientConfig, MotoGateway, MotoPatch, MotoStatus, NewMoto};

struct Backend {
    state: AppState,
    shutdown: Option<oneshot::Sender<()>>,
    server: tokio::task::JoinHandle<()>,
}

impl Backend {
    async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.server.await.expect("server task");
    }
}

async fn spawn_backend(app: Router) -> Backend {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    let (tx, rx) = oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                rx.await.ok();
            })
            .await
            .expect("serve");
    });

    let config = ClientConfig::with_base_url(&format!("http://{}/api/", addr));
    let gateway: Arc<dyn MotoGateway> = Arc::new(ApiClient::new(&config).expect("client"));
    let state = AppState::with_parts(config, gateway, Arc::new(MemoryStore::new()));

    Backend {
        state,
        shutdown: Some(tx),
        server,
    }
}

fn backend_moto(id: u64, placa: &str) -> Value {
    json!({
        "id": id,
        "placa": placa,
        "modelo": "CG 160",
        "cor": "Vermelha",
        "proprietario": "Carlos",
        "status": "MANUTENCAO",
        "setor": "B2",
        "posicao": "4",
        "createdAt": "2024-05-10T12:00:00",
        "updatedAt": "2024-05-11T08:30:00"
    })
}

#[tokio::test]
async fn test_load_unwraps_envelope_and_normalizes() {
    let app = Router::new().route(
        "/api/motos",
        get(|| async {
            Json(json!({
                "success": true,
                "message": "ok",
                "data": [backend_moto(1, " abc1234 "), backend_moto(2, "abc1d23")]
            }))
        }),
    );
    let backend = spawn_backend(app).await;
    let store = &backend.state.store;

    assert!(store.load().await);
    let motos = store.motos();
    assert_eq!(motos.len(), 2);

    let first = store.get_by_id("1").expect("moto 1");
    assert_eq!(first.placa, "ABC1234");
    assert_eq!(first.status, MotoStatus::Manutencao);
    assert_eq!(first.setor(), Some("B2"));
    assert_eq!(first.historico, vec!["Cadastrada em 10/05/2024"]);

    backend.stop().await;
}

#[tokio::test]
async fn test_load_accepts_bare_array() {
    let app = Router::new().route("/api/motos", get(|| async { Json(json!([backend_moto(7, "XYZ9A87")])) }));
    let backend = spawn_backend(app).await;

    assert!(backend.state.store.load().await);
    assert_eq!(backend.state.store.motos()[0].id, "7");

    backend.stop().await;
}

#[tokio::test]
async fn test_load_network_failure_keeps_previous_list() {
    let app = Router::new().route("/api/motos", get(|| async { Json(json!([backend_moto(1, "ABC1234")])) }));
    let backend = spawn_backend(app).await;
    let store = backend.state.store.clone();

    assert!(store.load().await);
    backend.stop().await;

    assert!(!store.load().await);
    assert!(!store.error().unwrap_or_default().is_empty());
    assert_eq!(store.motos().len(), 1);
    assert!(!store.is_loading());
}

#[tokio::test]
async fn test_create_sends_backend_payload() {
    let received: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
    let app = Router::new()
        .route(
            "/api/motos",
            post(|State(received): State<Arc<Mutex<Option<Value>>>>, Json(body): Json<Value>| async move {
                *received.lock().unwrap() = Some(body.clone());
                let mut created = backend_moto(10, body["placa"].as_str().unwrap_or_default());
                created["status"] = body["status"].clone();
                (StatusCode::CREATED, Json(json!({ "success": true, "data": created })))
            }),
        )
        .with_state(received.clone());
    let backend = spawn_backend(app).await;
    let store = &backend.state.store;

    let created = store
        .create(NewMoto {
            placa: "abc-1d23".to_string(),
            modelo: "CG 160".to_string(),
            ..Default::default()
        })
        .await;
    assert!(created);

    let body = received.lock().unwrap().clone().expect("request body");
    assert_eq!(body["placa"], "ABC1D23");
    assert_eq!(body["status"], "ATIVA");
    assert_eq!(body["setor"], "A1");
    assert!(body["numeroSerie"].as_str().unwrap().starts_with("SN"));
    assert!(body["tagRFID"].as_str().unwrap().starts_with("RF"));

    let moto = store.get_by_id("10").expect("created moto");
    assert_eq!(moto.status, MotoStatus::Ativa);
    assert_eq!(store.motos().len(), 1);

    backend.stop().await;
}

#[tokio::test]
async fn test_error_body_message_is_surfaced() {
    let app = Router::new()
        .route("/api/motos", get(|| async { Json(json!([backend_moto(1, "ABC1234")])) }))
        .route(
            "/api/motos/:id",
            put(|| async { (StatusCode::BAD_REQUEST, Json(json!({ "success": false, "error": "Dados inválidos" }))) })
                .delete(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "") }),
        );
    let backend = spawn_backend(app).await;
    let store = &backend.state.store;
    store.load().await;

    let patch = MotoPatch {
        cor: Some("Azul".to_string()),
        ..Default::default()
    };
    assert!(!store.update("1", patch).await);
    assert_eq!(store.error().as_deref(), Some("Dados inválidos"));
    assert_eq!(store.get_by_id("1").unwrap().cor, "Vermelha");

    assert!(!store.remove("1").await);
    assert_eq!(store.error().as_deref(), Some("request failed (500)"));
    assert_eq!(store.motos().len(), 1);

    backend.stop().await;
}

#[tokio::test]
async fn test_sequential_updates_keep_last_response() {
    let counter = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/api/motos", get(|| async { Json(json!([backend_moto(1, "ABC1234")])) }))
        .route(
            "/api/motos/:id",
            put(|State(counter): State<Arc<AtomicUsize>>, Path(id): Path<String>| async move {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                let mut moto = backend_moto(id.parse().unwrap_or(0), "ABC1234");
                moto["proprietario"] = json!(format!("Dono {}", n));
                Json(moto)
            }),
        )
        .with_state(counter);
    let backend = spawn_backend(app).await;
    let store = &backend.state.store;
    store.load().await;
    store.move_to("1", 12.0, 8.0);

    assert!(store.update("1", MotoPatch::default()).await);
    assert!(store.update("1", MotoPatch::default()).await);

    let moto = store.get_by_id("1").unwrap();
    assert_eq!(moto.proprietario, "Dono 2");
    assert_eq!((moto.pos_x, moto.pos_y), (12.0, 8.0));

    backend.stop().await;
}

#[tokio::test]
async fn test_resolve_with_empty_body_removes_alert() {
    let app = Router::new()
        .route(
            "/api/alertas",
            get(|| async {
                Json(json!([
                    { "id": 1, "moto": { "id": 3 }, "tipo": "BATERIA_BAIXA", "mensagem": "Bateria em 5%", "createdAt": "2024-05-10T12:00:00", "resolvido": false },
                    { "id": 2, "motoId": "4", "tipo": "SEM_LEITURA", "descricao": "Sem leitura RFID", "timestamp": "2024-05-10T13:00:00" }
                ]))
            }),
        )
        .route("/api/alertas/:id/resolve", patch(|| async { StatusCode::OK }));
    let backend = spawn_backend(app).await;
    let store = &backend.state.store;

    assert!(store.load_alerts().await);
    assert_eq!(store.alert_feed(), AlertFeed::Loaded);
    let alertas = store.alertas();
    assert_eq!(alertas[0].moto_id, "3");
    assert_eq!(alertas[0].descricao, "Bateria em 5%");
    assert_eq!(alertas[1].moto_id, "4");

    assert!(store.resolve_alert("1").await);
    let ids: Vec<String> = store.alertas().into_iter().map(|a| a.id).collect();
    assert_eq!(ids, vec!["2"]);

    backend.stop().await;
}

#[tokio::test]
async fn test_alerts_endpoint_missing_degrades() {
    let app = Router::new().route("/api/motos", get(|| async { Json(json!([])) }));
    let backend = spawn_backend(app).await;
    let store = &backend.state.store;

    assert!(!store.load_alerts().await);
    assert!(store.alertas().is_empty());
    assert_eq!(store.alert_feed(), AlertFeed::Unavailable("request failed (404)".to_string()));
    assert!(store.error().is_none());

    backend.stop().await;
}

#[tokio::test]
async fn test_login_token_is_sent_as_bearer() {
    let app = Router::new()
        .route(
            "/api/auth/login",
            post(|Json(body): Json<Value>| async move {
                if body["senha"] == "senha1" {
                    Json(json!({ "success": true, "data": { "id": 5, "nome": "Ana", "token": "abc" } })).into_response()
                } else {
                    (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Credenciais inválidas" }))).into_response()
                }
            }),
        )
        .route(
            "/api/motos",
            get(|headers: HeaderMap| async move {
                match headers.get("authorization").and_then(|h| h.to_str().ok()) {
                    Some("Bearer abc") => Json(json!([backend_moto(1, "ABC1234")])).into_response(),
                    _ => (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Token inválido" }))).into_response(),
                }
            }),
        );
    let backend = spawn_backend(app).await;
    let state = &backend.state;

    let err = state.session.login("ana@mottu.com", "errada1").await.unwrap_err();
    assert_eq!(err.user_message(), "Credenciais inválidas");

    assert!(!state.store.load().await);
    assert_eq!(state.store.error().as_deref(), Some("Token inválido"));

    let user = state.session.login("ana@mottu.com", "senha1").await.expect("login");
    assert_eq!(user.name, "Ana");
    assert!(state.store.load().await);
    assert_eq!(state.store.motos().len(), 1);

    backend.stop().await;
}

#[tokio::test]
async fn test_dashboard_filiais_and_health() {
    let app = Router::new()
        .route(
            "/api/motos/stats",
            get(|| async { Json(json!({ "success": true, "data": { "total": 4, "ativas": 3, "manutencao": 1, "inativas": 0 } })) }),
        )
        .route("/api/alertas/stats", get(|| async { StatusCode::SERVICE_UNAVAILABLE }))
        .route(
            "/api/filiais",
            get(|| async { Json(json!({ "id": 2, "nome": "Mottu Butantã", "endereco": null, "totalMotos": 40, "disponivel": 30 })) }),
        )
        .route(
            "/api/health",
            get(|| async { Json(json!({ "status": "UP", "service": "visiontracker", "version": "1.0.0" })) }),
        );
    let backend = spawn_backend(app).await;
    let gateway = backend.state.store.gateway();

    let dashboard = gateway.dashboard().await;
    assert!(dashboard.success);
    let data = dashboard.data.expect("dashboard data");
    assert_eq!(data.motos.total, 4);
    assert_eq!(data.alertas.total, 0);

    let filiais = gateway.list_filiais().await.data.expect("filiais");
    assert_eq!(filiais.len(), 1);
    assert_eq!(filiais[0].id, "2");
    assert_eq!(filiais[0].disponibilidade(), 75.0);

    let health = gateway.health_check().await;
    assert!(health.data.expect("health").is_up());

    backend.stop().await;
}

#[tokio::test]
async fn test_get_moto_found_and_missing() {
    let app = Router::new().route(
        "/api/motos/:id",
        get(|Path(id): Path<String>| async move {
            if id == "1" {
                Json(backend_moto(1, "ABC1234")).into_response()
            } else {
                StatusCode::OK.into_response()
            }
        }),
    );
    let backend = spawn_backend(app).await;
    let gateway = backend.state.store.gateway();

    let found = gateway.get_moto("1").await;
    assert!(found.success);
    assert_eq!(found.data.expect("moto").placa, "ABC1234");

    let missing = gateway.get_moto("9").await;
    assert!(!missing.success);
    assert_eq!(missing.error.as_deref(), Some("Not found: Moto with id '9' not found"));

    backend.stop().await;
}
