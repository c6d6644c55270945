//! In-process mock of the banking backend, bound to an ephemeral port.
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};

use bank_session::pipeline::Navigator;
use bank_session::session::{MemoryTokenStorage, TokenStorage};
use bank_session::{build_client, AuthController, ClientConfig};

pub const CSRF_TOKEN: &str = "csrf-8c1f";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seen {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub csrf: Option<String>,
    pub request_id: Option<String>,
}

struct MockUser {
    password: String,
    profile: Value,
    must_change_credentials: bool,
}

#[derive(Default)]
pub struct MockState {
    seen: Mutex<Vec<Seen>>,
    users: Mutex<HashMap<String, MockUser>>,
    tokens: Mutex<HashMap<String, String>>,
    issued: AtomicUsize,
    pub csrf_unavailable: AtomicBool,
    pub logout_broken: AtomicBool,
    pub profile_unavailable: AtomicBool,
    /// Milliseconds the login handler waits before answering.
    pub login_delay_ms: AtomicU64,
}

impl MockState {
    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().clone()
    }

    pub fn seen_path(&self, path: &str) -> Vec<Seen> {
        self.seen().into_iter().filter(|s| s.path == path).collect()
    }

    /// Forgets every issued token, as if they all expired server-side.
    pub fn expire_all_tokens(&self) {
        self.tokens.lock().clear();
    }

    pub fn issue_token_for(&self, username: &str) -> String {
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let token = format!("token-{username}-{n}");
        self.tokens.lock().insert(token.clone(), username.to_string());
        token
    }

    pub fn set_role(&self, username: &str, role: &str) {
        if let Some(user) = self.users.lock().get_mut(username) {
            user.profile["role"] = json!(role);
        }
    }

    fn add_user(&self, id: i64, username: &str, password: &str, role: &str, must_change: bool) {
        self.users.lock().insert(
            username.to_string(),
            MockUser {
                password: password.to_string(),
                profile: json!({
                    "id": id,
                    "user_id": id,
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "phone": "+15550100",
                    "full_name": format!("{} Example", username),
                    "role": role,
                    "is_active": true,
                    "created_at": "2024-05-01T09:00:00",
                    "last_login": null
                }),
                must_change_credentials: must_change,
            },
        );
    }

    fn user_for(&self, headers: &HeaderMap) -> Option<String> {
        let token = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))?;
        self.tokens.lock().get(token).cloned()
    }

    fn profile_of(&self, username: &str) -> Option<Value> {
        self.users.lock().get(username).map(|u| u.profile.clone())
    }
}

pub struct MockBackend {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
}

impl MockBackend {
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(&self.base_url())
            .unwrap()
            .with_timeout(Duration::from_secs(5))
    }
}

pub async fn spawn_backend() -> MockBackend {
    let state = Arc::new(MockState::default());
    state.add_user(1, "alice", "correct", "customer", false);
    state.add_user(2, "root", "admin-pass", "admin", false);
    state.add_user(3, "temp", "changeme", "support_agent", true);

    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/logout", post(logout))
        .route("/auth/profile", get(profile).put(update_profile))
        .route("/auth/change-password", post(change_password))
        .route("/auth/csrf", get(csrf))
        .route("/dashboard", get(dashboard))
        .route("/accounts", post(create_account))
        .route("/accounts/user/:id", get(user_accounts))
        .route("/admin/users/:id/role", put(assign_role));

    let app = Router::new()
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockBackend { addr, state }
}

/// A base URL nothing is listening on.
pub async fn unreachable_config() -> ClientConfig {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    ClientConfig::new(&format!("http://{addr}/api"))
        .unwrap()
        .with_timeout(Duration::from_secs(2))
}

#[derive(Default)]
pub struct RecordingNavigator {
    redirects: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, route: &str) {
        self.redirects.lock().push(route.to_string());
    }
}

pub struct Harness {
    pub controller: AuthController,
    pub navigator: Arc<RecordingNavigator>,
    pub storage: Arc<dyn TokenStorage>,
}

pub fn harness(config: &ClientConfig) -> Harness {
    harness_with_storage(config, Arc::new(MemoryTokenStorage::new()))
}

pub fn harness_with_storage(config: &ClientConfig, storage: Arc<dyn TokenStorage>) -> Harness {
    let navigator = Arc::new(RecordingNavigator::default());
    let controller = build_client(config, storage.clone(), navigator.clone()).unwrap();
    Harness {
        controller,
        navigator,
        storage,
    }
}

async fn record(State(state): State<Arc<MockState>>, req: Request, next: Next) -> Response {
    let seen = seen_from(req.method().as_str(), req.uri().path(), req.headers().clone());
    state.seen.lock().push(seen);
    next.run(req).await
}

fn seen_from(method: &str, path: &str, headers: HeaderMap) -> Seen {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);
    Seen {
        method: method.to_string(),
        path: path.trim_start_matches("/api").to_string(),
        authorization: header("authorization"),
        csrf: header("x-csrf-token"),
        request_id: header("x-request-id"),
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn unauthorized() -> Response {
    error(StatusCode::UNAUTHORIZED, "Token has expired")
}

async fn login(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    let delay = state.login_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    let username = body["username"].as_str().unwrap_or_default().to_lowercase();
    let password = body["password"].as_str().unwrap_or_default();

    let (ok, must_change, profile) = {
        let users = state.users.lock();
        match users.get(&username) {
            Some(user) if user.password == password => (true, user.must_change_credentials, user.profile.clone()),
            _ => (false, false, Value::Null),
        }
    };

    if !ok {
        return error(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }

    let token = state.issue_token_for(&username);
    Json(json!({
        "success": true,
        "access_token": token,
        "refresh_token": "unused",
        "user": profile,
        "must_change_credentials": must_change
    }))
    .into_response()
}

async fn register(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    let username = body["username"].as_str().unwrap_or_default().to_lowercase();
    if username.is_empty() {
        return error(StatusCode::BAD_REQUEST, "Username is required");
    }
    if state.users.lock().contains_key(&username) {
        return error(StatusCode::BAD_REQUEST, "Username or email already exists");
    }
    let id = 100 + state.users.lock().len() as i64;
    let password = body["password"].as_str().unwrap_or_default();
    state.add_user(id, &username, password, "customer", false);

    (
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "user_id": id,
            "username": username,
            "email": body["email"],
            "role": "customer"
        })),
    )
        .into_response()
}

async fn logout(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if state.logout_broken.load(Ordering::SeqCst) {
        return error(StatusCode::SERVICE_UNAVAILABLE, "maintenance");
    }
    if state.user_for(&headers).is_none() {
        return unauthorized();
    }
    Json(json!({ "success": true, "message": "Logged out successfully" })).into_response()
}

async fn profile(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if state.profile_unavailable.load(Ordering::SeqCst) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "Profile service unavailable");
    }
    match state.user_for(&headers).and_then(|u| state.profile_of(&u)) {
        Some(profile) => Json(profile).into_response(),
        None => unauthorized(),
    }
}

async fn update_profile(State(state): State<Arc<MockState>>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let Some(username) = state.user_for(&headers) else {
        return unauthorized();
    };
    if headers.get("x-csrf-token").and_then(|v| v.to_str().ok()) != Some(CSRF_TOKEN) {
        return error(StatusCode::FORBIDDEN, "CSRF token missing or invalid");
    }
    if let Some(phone) = body["phone"].as_str() {
        if phone.len() < 7 {
            return error(StatusCode::BAD_REQUEST, "Invalid phone format");
        }
        if let Some(user) = state.users.lock().get_mut(&username) {
            user.profile["phone"] = json!(phone);
        }
    }
    Json(json!({ "success": true, "message": "Profile updated" })).into_response()
}

async fn change_password(State(state): State<Arc<MockState>>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let Some(username) = state.user_for(&headers) else {
        return unauthorized();
    };
    let matches = state
        .users
        .lock()
        .get(&username)
        .map(|u| Some(u.password.as_str()) == body["old_password"].as_str())
        .unwrap_or(false);
    if !matches {
        return error(StatusCode::BAD_REQUEST, "Current password is incorrect");
    }
    Json(json!({ "success": true, "message": "Password changed successfully" })).into_response()
}

async fn csrf(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if state.csrf_unavailable.load(Ordering::SeqCst) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
    }
    if state.user_for(&headers).is_none() {
        return unauthorized();
    }
    Json(json!({ "csrf_token": CSRF_TOKEN })).into_response()
}

async fn dashboard(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if state.user_for(&headers).is_none() {
        return unauthorized();
    }
    Json(json!({ "accounts": [], "quick_links": [{ "label": "Transfer", "path": "/transfer" }] })).into_response()
}

async fn create_account(State(state): State<Arc<MockState>>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if state.user_for(&headers).is_none() {
        return unauthorized();
    }
    if headers.get("x-csrf-token").is_none() {
        return error(StatusCode::FORBIDDEN, "CSRF token missing");
    }
    (
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "account_id": 11,
            "account_number": "ACC-0000000011",
            "account_type": body["account_type"],
            "balance": body["opening_balance"],
            "status": "active",
            "created_at": "2024-05-01T09:00:00"
        })),
    )
        .into_response()
}

async fn user_accounts(State(state): State<Arc<MockState>>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if state.user_for(&headers).is_none() {
        return unauthorized();
    }
    Json(json!({
        "accounts": [{
            "id": 11,
            "account_number": "ACC-0000000011",
            "user_id": id,
            "account_type": "checking",
            "balance": 250.5,
            "opening_balance": 100.0,
            "status": "active"
        }]
    }))
    .into_response()
}

async fn assign_role(State(state): State<Arc<MockState>>, headers: HeaderMap, Path(id): Path<i64>, Json(body): Json<Value>) -> Response {
    let Some(caller) = state.user_for(&headers) else {
        return unauthorized();
    };
    let is_admin = state
        .profile_of(&caller)
        .map(|p| p["role"] == "admin")
        .unwrap_or(false);
    if !is_admin {
        return error(StatusCode::FORBIDDEN, "Admin access required");
    }
    Json(json!({
        "success": true,
        "user_id": id,
        "username": "alice",
        "old_role": "customer",
        "new_role": body["role"]
    }))
    .into_response()
}
