//! Shared helpers for client integration tests.
//!
//! [`FakeService`] runs an in-process axum app on an ephemeral port that
//! mimics the remote service and records every request it receives.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use gengtu_client::navigator::Navigator;
use gengtu_client::{ClientConfig, GeneratorPage};
use gengtu_core::generation::GenerationKind;
use serde_json::{json, Value};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Body returned by the fake on a successful generation.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDRfake-image-body";

// ---------------------------------------------------------------------------
// Behaviour
// ---------------------------------------------------------------------------

/// How the fake service answers. Mutable while the service runs.
#[derive(Debug, Clone)]
pub struct Behaviour {
    pub credits: i64,
    pub user_status: StatusCode,
    pub generate_status: StatusCode,
    /// Raw body sent with a non-2xx generation status.
    pub generate_error_body: String,
    pub generate_delay: Duration,
    pub history: Value,
    pub history_status: StatusCode,
    pub login_status: StatusCode,
    pub logout_status: StatusCode,
}

impl Default for Behaviour {
    fn default() -> Self {
        Self {
            credits: 5,
            user_status: StatusCode::OK,
            generate_status: StatusCode::OK,
            generate_error_body: json!({"success": false, "message": "error"}).to_string(),
            generate_delay: Duration::ZERO,
            history: json!([]),
            history_status: StatusCode::OK,
            login_status: StatusCode::OK,
            logout_status: StatusCode::OK,
        }
    }
}

/// One multipart part received by the figurine endpoint.
#[derive(Debug, Clone)]
pub struct ReceivedPart {
    pub name: String,
    pub content_type: String,
    pub len: usize,
}

#[derive(Default)]
struct Shared {
    behaviour: Mutex<Behaviour>,
    hits: Mutex<Vec<String>>,
    bodies: Mutex<Vec<Value>>,
    parts: Mutex<Vec<ReceivedPart>>,
}

impl Shared {
    fn record(&self, hit: &str) {
        self.hits.lock().unwrap().push(hit.to_string());
    }

    fn behaviour(&self) -> Behaviour {
        self.behaviour.lock().unwrap().clone()
    }
}

// ---------------------------------------------------------------------------
// FakeService
// ---------------------------------------------------------------------------

pub struct FakeService {
    pub base_url: String,
    shared: Arc<Shared>,
    shutdown: Mutex<Option<(oneshot::Sender<()>, JoinHandle<()>)>>,
}

impl FakeService {
    pub async fn start(behaviour: Behaviour) -> Self {
        let shared = Arc::new(Shared {
            behaviour: Mutex::new(behaviour),
            ..Shared::default()
        });

        let app = Router::new()
            .route("/api/user", get(current_user))
            .route("/api/generate_meme", post(generate_meme))
            .route("/api/generate_figurine", post(generate_figurine))
            .route("/api/history", get(history))
            .route("/api/login", post(login))
            .route("/api/register", post(register))
            .route("/api/logout", get(logout))
            .with_state(Arc::clone(&shared));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = stop_rx.await;
                })
                .await
                .unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            shared,
            shutdown: Mutex::new(Some((stop_tx, server))),
        }
    }

    /// Shut the service down and wait until its port is closed. Later
    /// requests fail at the transport level.
    pub async fn stop(&self) {
        let handle = self.shutdown.lock().unwrap().take();
        if let Some((stop_tx, server)) = handle {
            let _ = stop_tx.send(());
            server.await.unwrap();
        }
    }

    /// Every request received so far, e.g. `"GET /api/user"`.
    pub fn hits(&self) -> Vec<String> {
        self.shared.hits.lock().unwrap().clone()
    }

    pub fn count(&self, hit: &str) -> usize {
        self.hits().iter().filter(|h| h.as_str() == hit).count()
    }

    /// Number of POSTs to either generation endpoint.
    pub fn generation_calls(&self) -> usize {
        self.count("POST /api/generate_meme") + self.count("POST /api/generate_figurine")
    }

    /// JSON bodies received by JSON endpoints, in arrival order.
    pub fn bodies(&self) -> Vec<Value> {
        self.shared.bodies.lock().unwrap().clone()
    }

    pub fn parts(&self) -> Vec<ReceivedPart> {
        self.shared.parts.lock().unwrap().clone()
    }

    pub fn update(&self, f: impl FnOnce(&mut Behaviour)) {
        f(&mut self.shared.behaviour.lock().unwrap());
    }

    pub fn credits(&self) -> i64 {
        self.shared.behaviour().credits
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn current_user(State(shared): State<Arc<Shared>>) -> Response {
    shared.record("GET /api/user");
    let b = shared.behaviour();
    if b.user_status != StatusCode::OK {
        return (
            b.user_status,
            Json(json!({"success": false, "message": "Unauthorized"})),
        )
            .into_response();
    }
    Json(json!({"id": 1, "email": "user@example.com", "credits": b.credits})).into_response()
}

async fn generate_meme(State(shared): State<Arc<Shared>>, Json(body): Json<Value>) -> Response {
    shared.record("POST /api/generate_meme");
    shared.bodies.lock().unwrap().push(body);
    generation_response(&shared).await
}

async fn generate_figurine(State(shared): State<Arc<Shared>>, mut multipart: Multipart) -> Response {
    shared.record("POST /api/generate_figurine");
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let len = field.bytes().await.map(|b| b.len()).unwrap_or_default();
        shared.parts.lock().unwrap().push(ReceivedPart {
            name,
            content_type,
            len,
        });
    }
    generation_response(&shared).await
}

async fn generation_response(shared: &Shared) -> Response {
    let b = shared.behaviour();
    if !b.generate_delay.is_zero() {
        tokio::time::sleep(b.generate_delay).await;
    }
    if b.generate_status != StatusCode::OK {
        return (b.generate_status, b.generate_error_body).into_response();
    }
    shared.behaviour.lock().unwrap().credits -= 1;
    ([(header::CONTENT_TYPE, "image/png")], PNG_BYTES).into_response()
}

async fn history(State(shared): State<Arc<Shared>>) -> Response {
    shared.record("GET /api/history");
    let b = shared.behaviour();
    (b.history_status, Json(b.history)).into_response()
}

async fn login(State(shared): State<Arc<Shared>>, Json(body): Json<Value>) -> Response {
    shared.record("POST /api/login");
    shared.bodies.lock().unwrap().push(body);
    let b = shared.behaviour();
    if b.login_status != StatusCode::OK {
        return (
            b.login_status,
            Json(json!({"success": false, "message": "Invalid email or password"})),
        )
            .into_response();
    }
    (
        [(header::SET_COOKIE, "session=test-session; Path=/; HttpOnly")],
        Json(json!({"success": true})),
    )
        .into_response()
}

async fn register(State(shared): State<Arc<Shared>>, Json(body): Json<Value>) -> Response {
    shared.record("POST /api/register");
    shared.bodies.lock().unwrap().push(body);
    Json(json!({"success": true, "message": "Registration successful"})).into_response()
}

async fn logout(State(shared): State<Arc<Shared>>) -> Response {
    shared.record("GET /api/logout");
    shared.behaviour().logout_status.into_response()
}

// ---------------------------------------------------------------------------
// Navigator + page builders
// ---------------------------------------------------------------------------

/// Navigator that remembers every location it was asked to visit.
#[derive(Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, location: &str) {
        self.visits.lock().unwrap().push(location.to_string());
    }
}

/// Test configuration pointing at `base_url`.
pub fn test_config(base_url: &str) -> ClientConfig {
    ClientConfig {
        api_base_url: base_url.to_string(),
        login_url: "/login".to_string(),
        request_timeout_secs: 5,
        generation_timeout_secs: 5,
        download_dir: PathBuf::from("."),
    }
}

pub fn build_page(
    config: &ClientConfig,
    kind: GenerationKind,
) -> (GeneratorPage, Arc<RecordingNavigator>) {
    let navigator = Arc::new(RecordingNavigator::default());
    let page = GeneratorPage::new(config, kind, navigator.clone()).unwrap();
    (page, navigator)
}

/// Start a fake service and a page of `kind` talking to it.
pub async fn setup(
    behaviour: Behaviour,
    kind: GenerationKind,
) -> (FakeService, GeneratorPage, Arc<RecordingNavigator>) {
    let service = FakeService::start(behaviour).await;
    let (page, navigator) = build_page(&test_config(&service.base_url), kind);
    (service, page, navigator)
}

/// Base URL of a port nothing listens on.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

/// History rows in the service's wire format.
pub fn history_rows(rows: &[(i64, &str)]) -> Value {
    Value::Array(
        rows.iter()
            .map(|(id, caption)| {
                json!({
                    "id": id,
                    "riddle_answer": caption,
                    "image_url": format!("/static/generated/{id}.png"),
                })
            })
            .collect(),
    )
}
