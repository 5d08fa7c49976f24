//! In-process mock of the admin backend.
//!
//! A hyper http1 server on an ephemeral port. Every request is recorded;
//! responses come from canned routes keyed by method and path (without the
//! `/api` prefix). Unknown routes answer 404 `{"detail":"Not Found"}`.
#![allow(dead_code)]

use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use client::credentials::{CredentialStore, MemoryCredentialStore};
use client::http::RequestExecutor;
use client::session::SessionHandle;
use client::AdminApi;

pub const PREFIX: &str = "/api";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Bytes,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

#[derive(Debug, Clone)]
struct Reply {
    status: u16,
    body: String,
    delay: Option<Duration>,
}

#[derive(Default)]
struct State {
    routes: Mutex<HashMap<(String, String), Reply>>,
    requests: Mutex<Vec<Recorded>>,
}

pub struct MockBackend {
    addr: SocketAddr,
    state: Arc<State>,
}

async fn handle(state: Arc<State>, req: Request<Incoming>) -> Result<Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();
    let body: Bytes = body
        .collect()
        .await
        .map(|c| c.to_bytes())
        .unwrap_or_default();

    let full_path: &str = parts.uri.path();
    let path: String = full_path
        .strip_prefix(PREFIX)
        .unwrap_or(full_path)
        .to_string();

    state.requests.lock().unwrap().push(Recorded {
        method: parts.method.to_string(),
        path: path.clone(),
        query: parts.uri.query().map(str::to_owned),
        authorization: parts
            .headers
            .get(hyper::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        body,
    });

    let reply: Option<Reply> = state
        .routes
        .lock()
        .unwrap()
        .get(&(parts.method.to_string(), path))
        .cloned();

    let reply = reply.unwrap_or(Reply {
        status: 404,
        body: r#"{"detail":"Not Found"}"#.to_string(),
        delay: None,
    });

    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }

    let response = Response::builder()
        .status(StatusCode::from_u16(reply.status).unwrap())
        .header(hyper::header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(reply.body)))
        .unwrap();
    Ok(response)
}

impl MockBackend {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(State::default());

        let server_state = state.clone();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let io = TokioIo::new(stream);
                let conn_state = server_state.clone();
                tokio::spawn(async move {
                    let service = service_fn(move |req| handle(conn_state.clone(), req));
                    let _ = http1::Builder::new().serve_connection(io, service).await;
                });
            }
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}{}", self.addr, PREFIX)
    }

    fn insert(&self, method: &str, path: &str, reply: Reply) {
        self.state
            .routes
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), reply);
    }

    pub fn route(&self, method: &str, path: &str, status: u16, body: Value) {
        self.insert(
            method,
            path,
            Reply {
                status,
                body: body.to_string(),
                delay: None,
            },
        );
    }

    pub fn route_raw(&self, method: &str, path: &str, status: u16, body: &str) {
        self.insert(
            method,
            path,
            Reply {
                status,
                body: body.to_string(),
                delay: None,
            },
        );
    }

    pub fn route_delayed(&self, method: &str, path: &str, delay: Duration, body: Value) {
        self.insert(
            method,
            path,
            Reply {
                status: 200,
                body: body.to_string(),
                delay: Some(delay),
            },
        );
    }

    /// `{"success": true, "message": "ok", "data": data}` with status 200.
    pub fn ok(&self, method: &str, path: &str, data: Value) {
        self.route(
            method,
            path,
            200,
            json!({"success": true, "message": "ok", "data": data}),
        );
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    pub fn api(&self, store: Arc<dyn CredentialStore>) -> AdminApi {
        self.api_with_timeout(store, Duration::from_secs(5))
    }

    pub fn api_with_timeout(&self, store: Arc<dyn CredentialStore>, timeout: Duration) -> AdminApi {
        let session = SessionHandle::new(store);
        AdminApi::from_executor(RequestExecutor::new(&self.base_url(), timeout, session))
    }
}

pub fn memory_store() -> Arc<MemoryCredentialStore> {
    Arc::new(MemoryCredentialStore::new())
}

pub fn token_store(token: &str) -> Arc<MemoryCredentialStore> {
    Arc::new(MemoryCredentialStore::with_token(token))
}

/// Login body from the documented happy path.
pub fn login_payload() -> Value {
    json!({
        "success": true,
        "message": "Login exitoso",
        "data": {
            "access_token": "T",
            "token_type": "bearer",
            "usuario_id": 1,
            "usuario": "u",
            "nombres": "U",
            "rol": "Admin",
            "permisos": ["x"]
        }
    })
}

/// A mock that accepts `u` and exposes a working permission listing.
pub async fn signed_in_backend() -> (MockBackend, AdminApi, Arc<MemoryCredentialStore>) {
    let mock = MockBackend::start().await;
    mock.route("POST", "/auth/login", 200, login_payload());
    mock.ok(
        "GET",
        "/auth/mis-permisos",
        json!({
            "permisos": [],
            "permisos_por_modulo": {"usuarios": ["usuarios.leer"]},
            "modulos_accesibles": ["usuarios"],
            "acciones_disponibles": ["leer"],
            "es_administrador": false
        }),
    );

    let store = memory_store();
    let api = mock.api(store.clone());
    api.controller.login("u", "good-password").await.unwrap();
    (mock, api, store)
}
