//! In-process stand-in for the delivery API, served by axum on a random port.

use crate::core::settings::ApiSettings;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const LOGIN_TOKEN: &str = "login-token";
pub const LOGIN_REFRESH_TOKEN: &str = "login-refresh";
pub const REFRESHED_TOKEN: &str = "refreshed-token";
const PASSWORD: &str = "secret";

pub struct MockState {
    pub login_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub order_calls: AtomicUsize,
    pub track_calls: AtomicUsize,
    accepted_token: Mutex<String>,
    track_token: Mutex<Option<String>>,
    refresh_rejected: Mutex<bool>,
    orders: Mutex<Value>,
    orders_failure: Mutex<Option<(StatusCode, String)>>,
    tracks: Mutex<HashMap<String, Value>>,
    last_orders_query: Mutex<Option<String>>,
}

pub struct MockApi {
    pub state: Arc<MockState>,
    base_url: String,
}

impl MockApi {
    pub async fn start() -> Self {
        let state = Arc::new(MockState {
            login_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
            order_calls: AtomicUsize::new(0),
            track_calls: AtomicUsize::new(0),
            accepted_token: Mutex::new(LOGIN_TOKEN.to_string()),
            track_token: Mutex::new(None),
            refresh_rejected: Mutex::new(false),
            orders: Mutex::new(json!({ "hydra:member": [] })),
            orders_failure: Mutex::new(None),
            tracks: Mutex::new(HashMap::new()),
            last_orders_query: Mutex::new(None),
        });

        let app = Router::new()
            .route("/be/api/login", post(login))
            .route("/be/api/token/refresh", post(refresh))
            .route("/be/api/user/orders", get(orders))
            .route("/be/api/order/:uuid/track", get(track))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            state,
            base_url: format!("http://{addr}"),
        }
    }

    pub fn settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.base_url.clone(),
            ..ApiSettings::default()
        }
    }

    pub fn accept_token(&self, token: &str) {
        *self.state.accepted_token.lock().unwrap() = token.to_string();
    }

    /// Makes the track endpoint accept only `token`, independently of the
    /// orders endpoint.
    pub fn accept_track_token(&self, token: &str) {
        *self.state.track_token.lock().unwrap() = Some(token.to_string());
    }

    pub fn reject_refresh(&self) {
        *self.state.refresh_rejected.lock().unwrap() = true;
    }

    pub fn set_orders(&self, orders: Value) {
        *self.state.orders.lock().unwrap() = orders;
    }

    pub fn fail_orders(&self, status: StatusCode, body: &str) {
        *self.state.orders_failure.lock().unwrap() = Some((status, body.to_string()));
    }

    pub fn set_track(&self, uuid: &str, positions: Value) {
        self.state
            .tracks
            .lock()
            .unwrap()
            .insert(uuid.to_string(), positions);
    }

    pub fn last_orders_query(&self) -> Option<String> {
        self.state.last_orders_query.lock().unwrap().clone()
    }
}

#[derive(Deserialize)]
struct LoginBody {
    phone: String,
    password: String,
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "code": 401, "message": message })),
    )
        .into_response()
}

fn is_authorized(state: &MockState, headers: &HeaderMap) -> bool {
    let token = state.accepted_token.lock().unwrap().clone();
    bearer_matches(headers, &token)
}

fn bearer_matches(headers: &HeaderMap, token: &str) -> bool {
    let expected = format!("Bearer {token}");
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected)
}

async fn login(State(state): State<Arc<MockState>>, Json(body): Json<LoginBody>) -> Response {
    state.login_calls.fetch_add(1, Ordering::SeqCst);
    if body.phone.is_empty() || body.password != PASSWORD {
        return unauthorized("Invalid credentials.");
    }
    Json(json!({ "token": LOGIN_TOKEN, "refresh_token": LOGIN_REFRESH_TOKEN })).into_response()
}

async fn refresh(
    State(state): State<Arc<MockState>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);
    let rejected = *state.refresh_rejected.lock().unwrap();
    if rejected || form.get("refresh_token").map(String::as_str) != Some(LOGIN_REFRESH_TOKEN) {
        return unauthorized("Invalid JWT Refresh Token");
    }
    Json(json!({ "token": REFRESHED_TOKEN, "refresh_token": "refreshed-refresh" })).into_response()
}

async fn orders(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    uri: axum::http::Uri,
) -> Response {
    state.order_calls.fetch_add(1, Ordering::SeqCst);
    *state.last_orders_query.lock().unwrap() = uri.query().map(str::to_string);

    if !is_authorized(&state, &headers) {
        return unauthorized("Expired JWT Token");
    }
    if let Some((status, body)) = state.orders_failure.lock().unwrap().clone() {
        return (status, body).into_response();
    }
    Json(state.orders.lock().unwrap().clone()).into_response()
}

async fn track(
    State(state): State<Arc<MockState>>,
    Path(uuid): Path<String>,
    headers: HeaderMap,
) -> Response {
    state.track_calls.fetch_add(1, Ordering::SeqCst);
    let track_token = state.track_token.lock().unwrap().clone();
    let authorized = match track_token {
        Some(token) => bearer_matches(&headers, &token),
        None => is_authorized(&state, &headers),
    };
    if !authorized {
        return unauthorized("Expired JWT Token");
    }
    let positions = state
        .tracks
        .lock()
        .unwrap()
        .get(&uuid)
        .cloned()
        .unwrap_or_else(|| json!([]));
    Json(positions).into_response()
}
