// In-process stand-in for the token backend, bound to an ephemeral port.
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::to_bytes;
use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::api::create_router;
use crate::api::session::SESSION_COOKIE;
use crate::auth::TokenClient;
use crate::config::test_config;
use crate::state::AppState;

type RequestLog = Arc<Mutex<Vec<(String, Value)>>>;

pub(crate) struct MockBackend {
    pub url: String,
    requests: RequestLog,
}

impl MockBackend {
    pub(crate) fn last_request(&self) -> Option<(String, Value)> {
        self.requests.lock().expect("request log poisoned").last().cloned()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().expect("request log poisoned").len()
    }
}

pub(crate) async fn spawn_backend() -> MockBackend {
    let requests: RequestLog = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/token", post(token))
        .route("/recordingrules", post(recording_rules))
        .with_state(requests.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock backend failed");
    });

    MockBackend {
        url: format!("http://{}", addr),
        requests,
    }
}

fn record(log: &RequestLog, uri: &Uri, body: &Value) {
    log.lock()
        .expect("request log poisoned")
        .push((uri.path().to_string(), body.clone()));
}

fn error(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

// Behavior is keyed on the passcode so each test can pick its scenario.
async fn token(State(log): State<RequestLog>, uri: Uri, Json(body): Json<Value>) -> Response {
    record(&log, &uri, &body);

    match body["passcode"].as_str().unwrap_or_default() {
        "validcode" => Json(json!({ "token": "t", "room_type": "group" })).into_response(),
        "slowcode" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "token": "t" })).into_response()
        }
        "notoken" => Json(json!({})).into_response(),
        "expiredcode" => error(
            StatusCode::UNAUTHORIZED,
            json!({ "error": { "message": "passcode expired" } }),
        ),
        "brokencode" => error(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": { "message": "internal failure" } }),
        ),
        "statusonly" => StatusCode::FORBIDDEN.into_response(),
        "bare401" => StatusCode::UNAUTHORIZED.into_response(),
        _ => error(
            StatusCode::UNAUTHORIZED,
            json!({ "error": { "message": "passcode incorrect" } }),
        ),
    }
}

async fn recording_rules(
    State(log): State<RequestLog>,
    uri: Uri,
    Json(body): Json<Value>,
) -> Response {
    record(&log, &uri, &body);

    if body["passcode"] != "validcode" {
        return error(
            StatusCode::UNAUTHORIZED,
            json!({ "error": { "message": "passcode incorrect", "code": 401 } }),
        );
    }

    match body["room_sid"].as_str().unwrap_or_default() {
        "RM404" => error(
            StatusCode::NOT_FOUND,
            json!({ "error": { "message": "Room not found", "code": 53404 } }),
        ),
        "RMbroken" => error(StatusCode::INTERNAL_SERVER_ERROR, json!({})),
        room_sid => Json(json!({ "room_sid": room_sid, "rules": body["rules"] })).into_response(),
    }
}

// Front-end router wired to the mock backend.
pub(crate) fn build_test_app(backend: &MockBackend) -> Router {
    let config = test_config(&backend.url);
    let tokens = TokenClient::new(&config).expect("expected token client");
    create_router(AppState::new(config, tokens))
}

// `name=value` pair of the session cookie set by a response, ready for a Cookie header.
pub(crate) fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .find(|pair| pair.starts_with(SESSION_COOKIE))
        .map(str::to_string)
}

pub(crate) async fn body_string(response: Response) -> String {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("expected response body");
    String::from_utf8(body.to_vec()).expect("expected utf-8 body")
}
