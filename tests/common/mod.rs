// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use sms_dashboard::config::Config;
use sms_dashboard::notify::Notifier;
use sms_dashboard::routes::create_router;
use sms_dashboard::services::BackendClient;
use sms_dashboard::session::UserMirror;
use sms_dashboard::AppState;
use std::sync::{Arc, Mutex};

/// Bearer token the fake gateway treats as expired.
#[allow(dead_code)]
pub const EXPIRED_TOKEN: &str = "expired-session-token";
/// Password the fake gateway accepts at login.
#[allow(dead_code)]
pub const GOOD_PASSWORD: &str = "correct-horse";
/// Account id for which the fake gateway answers every call with a 500.
#[allow(dead_code)]
pub const FAILING_CLIENT: &str = "500500";

/// Create a test app whose backend is unreachable.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    create_test_app_with_backend(&Config::test_default().backend_url)
}

/// Create a test app talking to the gateway at `backend_url`.
#[allow(dead_code)]
pub fn create_test_app_with_backend(backend_url: &str) -> (Router, Arc<AppState>) {
    let config = Config {
        backend_url: backend_url.to_string(),
        ..Config::test_default()
    };
    let backend = BackendClient::new(&config.backend_url, config.backend_timeout)
        .expect("Failed to build backend client");

    let state = Arc::new(AppState {
        config,
        backend,
        mirror: UserMirror::default(),
        notifier: Notifier::default(),
    });

    (create_router(state.clone()), state)
}

/// A request as seen by the fake gateway.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct SeenRequest {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Value,
}

/// In-process stand-in for the SMS gateway.
#[allow(dead_code)]
pub struct FakeGateway {
    pub url: String,
    pub seen: Arc<Mutex<Vec<SeenRequest>>>,
}

#[allow(dead_code)]
impl FakeGateway {
    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

/// Start the fake gateway on an ephemeral port.
#[allow(dead_code)]
pub async fn spawn_fake_gateway() -> FakeGateway {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .fallback(fake_gateway)
        .with_state(seen.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake gateway");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeGateway {
        url: format!("http://{addr}"),
        seen,
    }
}

async fn fake_gateway(
    State(seen): State<Arc<Mutex<Vec<SeenRequest>>>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path = uri.path().to_string();
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body: Value = serde_json::from_str(&body).unwrap_or(Value::Null);

    seen.lock().unwrap().push(SeenRequest {
        method: method.clone(),
        path: path.clone(),
        authorization: authorization.clone(),
        body: body.clone(),
    });

    if authorization.as_deref() == Some(format!("Bearer {EXPIRED_TOKEN}").as_str()) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "jwt expired"})))
            .into_response();
    }
    if path.contains(FAILING_CLIENT) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "Gateway overloaded"})),
        )
            .into_response();
    }

    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    match (method, segments.as_slice()) {
        (Method::POST, ["auth", "login"]) => {
            if body["password"] == GOOD_PASSWORD {
                Json(json!({
                    "token": mint_token(&json!({"id": "700002", "role": "client"})),
                    "user": {"id": 700002, "role": "client", "name": "Awa Diop"}
                }))
                .into_response()
            } else {
                (StatusCode::UNAUTHORIZED, Json(json!({"message": "bad credentials"})))
                    .into_response()
            }
        }
        (Method::POST, ["auth", "forgot-password"]) => StatusCode::NO_CONTENT.into_response(),
        (Method::GET, ["client", id]) => Json(json!({
            "id": id.parse::<u64>().unwrap_or_default(),
            "name": "Awa Diop",
            "solde": 125.5
        }))
        .into_response(),
        (Method::GET, ["clients", _, "credits", "history"]) => {
            let entries: Vec<Value> = (1..=25)
                .map(|i| json!({"id": i, "amount": -1.0, "type": "sms", "date": "2026-01-01"}))
                .collect();
            Json(json!({ "data": entries })).into_response()
        }
        (Method::GET, ["clients", _, "contacts"]) => Json(json!([
            {"id": "c-1", "name": "Moussa", "telephone": "+221770000001"},
            {"id": "c-2", "name": "Fatou", "telephone": "+221770000002"}
        ]))
        .into_response(),
        (Method::POST, ["clients", _, "contacts"]) => {
            let mut contact = body.clone();
            contact["id"] = json!("c-3");
            (StatusCode::CREATED, Json(contact)).into_response()
        }
        (Method::DELETE, ["clients", _, "contacts", _]) => StatusCode::NO_CONTENT.into_response(),
        (Method::POST, ["clients", _, "sms"]) => Json(json!({
            "accepted": body["recipients"].as_array().map_or(0, Vec::len),
            "messageIds": ["m-1"]
        }))
        .into_response(),
        (Method::GET, ["clients", _, "api-key"]) => {
            Json(json!({"apiKey": "key-live-123", "createdAt": "2026-01-01"})).into_response()
        }
        (Method::POST, ["clients", _, "api-key", "regenerate"]) => {
            Json(json!({"api_key": "key-live-456", "createdAt": "2026-02-01"})).into_response()
        }
        (Method::GET, ["clients", _, "groups"]) => Json(json!({
            "data": [{"id": 1, "name": "VIP", "contactCount": 12}]
        }))
        .into_response(),
        (Method::POST, ["clients", _, "groups"]) => (
            StatusCode::CREATED,
            Json(json!({"id": "g-2", "name": body["name"], "contactCount": 0})),
        )
            .into_response(),
        (Method::GET, ["documents"]) => Json(json!([
            {"title": "API guide", "url": "https://docs.example.com/api.pdf"},
            {"title": "Sender names", "url": "https://docs.example.com/sender.pdf", "description": "Rules"}
        ]))
        .into_response(),
        _ => (StatusCode::NOT_FOUND, Body::empty()).into_response(),
    }
}

/// JWT-shaped bearer token carrying `claims`.
#[allow(dead_code)]
pub fn mint_token(claims: &Value) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(b"gateway-test-secret"),
    )
    .expect("Failed to mint token")
}

/// `Cookie` header for a session made of `token` and a JSON descriptor.
#[allow(dead_code)]
pub fn session_cookie(token: &str, user_json: &str) -> String {
    format!(
        "authToken={token}; user={}",
        urlencoding::encode(user_json)
    )
}

/// Collect all `Set-Cookie` headers of a response.
#[allow(dead_code)]
pub fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

/// Find the `Set-Cookie` header for `name`.
#[allow(dead_code)]
pub fn find_cookie(headers: &[String], name: &str) -> String {
    headers
        .iter()
        .find(|value| value.starts_with(&format!("{name}=")))
        .cloned()
        .unwrap_or_else(|| panic!("missing Set-Cookie header for {name}: {headers:?}"))
}

/// Read a JSON response body.
#[allow(dead_code)]
pub async fn body_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Read a text response body.
#[allow(dead_code)]
pub async fn body_text(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}
