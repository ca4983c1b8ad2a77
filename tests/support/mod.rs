#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::net::TcpListener;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::time::sleep;

pub const EMAIL: &str = "ada@example.com";
pub const PASSWORD: &str = "secret";
pub const ID_TOKEN: &str = "id-1";
pub const REFRESH_TOKEN: &str = "refresh-1";
pub const ROTATED_ID_TOKEN: &str = "id-2";
pub const ROTATED_REFRESH_TOKEN: &str = "refresh-2";

/// In-process stand-in for the energy journal backend.
#[derive(Default)]
pub struct Backend {
    pub range_calls: AtomicUsize,
    pub spending_calls: AtomicUsize,
    pub revoked: AtomicBool,
    levels: Mutex<BTreeMap<String, Value>>,
}

pub struct FakeBackend {
    pub base_url: String,
    pub state: Arc<Backend>,
}

fn authorized(backend: &Backend, headers: &HeaderMap) -> bool {
    if backend.revoked.load(Ordering::SeqCst) {
        return false;
    }
    let bearer = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));
    matches!(bearer, Some(ID_TOKEN | ROTATED_ID_TOKEN))
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["email"] == EMAIL && body["password"] == PASSWORD {
        Json(json!({
            "idToken": ID_TOKEN,
            "refreshToken": REFRESH_TOKEN,
            "expiresIn": "3600",
        }))
        .into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "error": "bad credentials" }))).into_response()
    }
}

async fn refresh(Json(body): Json<Value>) -> Response {
    if body["refreshToken"] == REFRESH_TOKEN {
        Json(json!({
            "idToken": ROTATED_ID_TOKEN,
            "refreshToken": ROTATED_REFRESH_TOKEN,
            "expiresIn": "3600",
        }))
        .into_response()
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

async fn create_user(Json(body): Json<Value>) -> Response {
    if body["email"] == "taken@example.com" {
        return (StatusCode::CONFLICT, Json(json!({ "error": "exists" }))).into_response();
    }
    (
        StatusCode::CREATED,
        Json(json!({ "message": "activation email sent", "status": "pending" })),
    )
        .into_response()
}

#[derive(Deserialize)]
struct TokenQuery {
    token: String,
}

async fn activate(Query(query): Query<TokenQuery>) -> Response {
    if query.token == "good" {
        Json(json!({ "message": "activated" })).into_response()
    } else {
        StatusCode::BAD_REQUEST.into_response()
    }
}

async fn me(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    if !authorized(&backend, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({ "email": EMAIL })).into_response()
}

#[derive(Deserialize)]
struct DateQuery {
    date: String,
}

async fn levels_for_day(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Query(query): Query<DateQuery>,
) -> Response {
    if !authorized(&backend, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let levels = backend.levels.lock().unwrap();
    match levels.get(&query.date) {
        Some(entry) => Json(entry.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn save_levels(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&backend, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let Some(date) = body["date"].as_str().map(str::to_owned) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    backend.levels.lock().unwrap().insert(date, body.clone());
    Json(body).into_response()
}

#[derive(Deserialize)]
struct RangeQuery {
    from: String,
    to: String,
}

async fn levels_range(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Query(query): Query<RangeQuery>,
) -> Response {
    if !authorized(&backend, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    backend.range_calls.fetch_add(1, Ordering::SeqCst);
    let levels = backend.levels.lock().unwrap();
    let entries: Vec<Value> = levels
        .range(query.from..=query.to)
        .map(|(_, entry)| entry.clone())
        .collect();
    Json(entries).into_response()
}

async fn spending(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    if !authorized(&backend, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    backend.spending_calls.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "Work": 31.5, "Sport": 4, "Sleep": 52.0 })).into_response()
}

pub async fn spawn_backend() -> FakeBackend {
    let state = Arc::new(Backend::default());
    let app = Router::new()
        .route("/api/users", post(create_user))
        .route("/api/users/login", post(login))
        .route("/api/users/refresh", post(refresh))
        .route("/api/users/activate", post(activate))
        .route("/api/users/me", get(me))
        .route("/api/energy/levels", get(levels_for_day).put(save_levels))
        .route("/api/energy/levels/range", get(levels_range))
        .route("/api/calendar/spending", get(spending))
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake backend");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake backend");
    });

    FakeBackend {
        base_url: format!("http://{addr}/api"),
        state,
    }
}

pub struct TestServer {
    pub base_url: String,
    pub data_path: PathBuf,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static CHILDREN: Lazy<Mutex<Vec<u32>>> = Lazy::new(|| Mutex::new(Vec::new()));

#[cfg(unix)]
mod cleanup {
    use std::sync::Once;

    static REGISTER: Once = Once::new();

    pub fn register() {
        REGISTER.call_once(|| unsafe {
            libc::atexit(on_exit);
        });
    }

    extern "C" fn on_exit() {
        let Ok(children) = super::CHILDREN.lock() else {
            return;
        };
        for pid in children.iter() {
            unsafe {
                libc::kill(*pid as i32, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

pub fn unique_data_path(name: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("energy_journal_{name}_{}_{nanos}", std::process::id()));
    path.push("session.json");
    path
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

/// Runs the compiled binary against `backend_url`, keeping its session
/// tokens at `data_path`.
pub async fn spawn_server(backend_url: &str, data_path: PathBuf) -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_energy_journal"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", &data_path)
        .env("ENERGY_API_BASE_URL", backend_url)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    CHILDREN.lock().unwrap().push(child.id());
    #[cfg(unix)]
    cleanup::register();

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer {
        base_url,
        data_path,
        child,
    }
}

/// A client that reports redirects instead of following them.
pub fn client() -> Client {
    Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub async fn sign_in(client: &Client, server: &TestServer) {
    let response = client
        .post(format!("{}/auth/login", server.base_url))
        .form(&[("email", EMAIL), ("password", PASSWORD)])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/timespending");
}
