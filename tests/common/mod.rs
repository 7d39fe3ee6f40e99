//! Shared test doubles: recording notifiers and a scripted HTTP server
#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use futures::stream;
use job_notify::{DeliveryError, JobKey, JobSnapshot, NotificationEvent, Notifier};
use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

pub fn job(name: &str) -> JobSnapshot {
    JobSnapshot::new(JobKey::new("default", name))
}

/// Records every delivery; optionally fails or stalls each call
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<NotificationEvent>>,
    attempts: AtomicUsize,
    fail: bool,
    delay: Option<Duration>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<NotificationEvent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn sent_for(&self, name: &str) -> usize {
        self.sent().iter().filter(|e| e.key.name == name).count()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &str {
        "recording"
    }

    async fn deliver(
        &self,
        event: &NotificationEvent,
        _summary: &str,
    ) -> Result<(), DeliveryError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(DeliveryError::Status {
                channel: "recording".to_string(),
                status: 503,
            });
        }
        self.sent.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// What the fake server answers
#[derive(Debug, Clone)]
pub enum Reply {
    /// Complete response with a body
    Full { status: u16, body: String },
    /// 200 followed by newline-delimited lines, then end of body
    Stream(Vec<String>),
    /// 200 with a body that never produces data
    Hang,
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let json = [(header::CONTENT_TYPE, "application/json")];
        match self {
            Reply::Full { status, body } => {
                let status = StatusCode::from_u16(status).unwrap();
                (status, json, body).into_response()
            }
            Reply::Stream(lines) => {
                let chunks = lines
                    .into_iter()
                    .map(|line| Ok::<_, Infallible>(format!("{line}\n")));
                (json, Body::from_stream(stream::iter(chunks))).into_response()
            }
            Reply::Hang => {
                let body = Body::from_stream(stream::pending::<Result<String, Infallible>>());
                (json, body).into_response()
            }
        }
    }
}

/// A request as seen by the fake server
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub query: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl Request {
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    }
}

type Route = Box<dyn Fn(&Request) -> Reply + Send + Sync>;

struct ServerState {
    route: Route,
    requests: Mutex<Vec<Request>>,
}

/// HTTP server answering every request through `route`
pub struct FakeServer {
    pub url: String,
    state: Arc<ServerState>,
}

impl FakeServer {
    pub async fn start<F>(route: F) -> Self
    where
        F: Fn(&Request) -> Reply + Send + Sync + 'static,
    {
        let state = Arc::new(ServerState {
            route: Box::new(route),
            requests: Mutex::new(Vec::new()),
        });
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { url, state }
    }

    pub fn requests(&self) -> Vec<Request> {
        self.state.requests.lock().unwrap().clone()
    }
}

async fn handle(
    State(state): State<Arc<ServerState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Reply {
    let request = Request {
        method,
        path: uri.path().to_string(),
        query: uri.query().unwrap_or_default().to_string(),
        headers,
        body,
    };
    let reply = (state.route)(&request);
    state.requests.lock().unwrap().push(request);
    reply
}
