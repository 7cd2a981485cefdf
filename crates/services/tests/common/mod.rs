//! An axum stub for the backend that answers from a script and records
//! every request it sees.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// One field of a multipart request.
#[derive(Debug, Clone)]
pub struct CapturedPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: Method,
    pub target: String,
    pub headers: HeaderMap,
    /// Raw body for everything except multipart, which lands in `parts`.
    pub body: Vec<u8>,
    pub parts: Vec<CapturedPart>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is json")
    }

    pub fn part(&self, name: &str) -> Option<&CapturedPart> {
        self.parts.iter().find(|part| part.name == name)
    }

    /// Text value of a multipart field.
    pub fn field(&self, name: &str) -> Option<String> {
        self.part(name)
            .map(|part| String::from_utf8_lossy(&part.data).into_owned())
    }
}

#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl StubResponse {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.to_string().into_bytes(),
        }
    }

    pub fn bytes(content_type: &'static str, body: &[u8]) -> Self {
        Self {
            status: 200,
            content_type,
            body: body.to_vec(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: b"stub error".to_vec(),
        }
    }
}

impl IntoResponse for StubResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

#[derive(Clone)]
struct Script {
    responses: Arc<Mutex<VecDeque<StubResponse>>>,
    seen: mpsc::UnboundedSender<CapturedRequest>,
}

pub struct StubServer {
    pub base_url: String,
    requests: mpsc::UnboundedReceiver<CapturedRequest>,
}

impl StubServer {
    /// Answer requests with `responses` in order; once they run out every
    /// request gets a 500.
    pub async fn start(responses: Vec<StubResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
        let addr = listener.local_addr().expect("stub address");
        let (seen, requests) = mpsc::unbounded_channel();
        let script = Script {
            responses: Arc::new(Mutex::new(responses.into())),
            seen,
        };

        let app = Router::new().fallback(answer).with_state(script);
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    pub async fn next_request(&mut self) -> CapturedRequest {
        self.requests.recv().await.expect("stub captured a request")
    }

    pub fn try_next_request(&mut self) -> Option<CapturedRequest> {
        self.requests.try_recv().ok()
    }
}

async fn answer(State(script): State<Script>, request: Request) -> Response {
    let method = request.method().clone();
    let target = request
        .uri()
        .path_and_query()
        .map_or_else(|| request.uri().path().to_string(), |pq| pq.as_str().to_string());
    let headers = request.headers().clone();
    let is_multipart = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"));

    let (body, parts) = if is_multipart {
        (Vec::new(), read_parts(request, &script).await)
    } else {
        let bytes = Bytes::from_request(request, &script).await.unwrap_or_default();
        (bytes.to_vec(), Vec::new())
    };

    let _ = script.seen.send(CapturedRequest {
        method,
        target,
        headers,
        body,
        parts,
    });

    let next = script
        .responses
        .lock()
        .expect("stub script lock")
        .pop_front();
    match next {
        Some(response) => response.into_response(),
        None => StubResponse::status(500).into_response(),
    }
}

async fn read_parts(request: Request, script: &Script) -> Vec<CapturedPart> {
    let Ok(mut multipart) = Multipart::from_request(request, script).await else {
        return Vec::new();
    };
    let mut parts = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.unwrap_or_default().to_vec();
        parts.push(CapturedPart {
            name,
            file_name,
            content_type,
            data,
        });
    }
    parts
}

/// A URL where nothing is listening.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind unused port");
    let addr = listener.local_addr().expect("unused port address");
    drop(listener);
    format!("http://{addr}")
}
