//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server};
use schoa::gateway::{GenerateContentRequest, GenerateContentResponse, ModelTransport};
use schoa::{Result, SchoaError};
use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{oneshot, Notify};

/// A request as the stub server saw it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub api_key: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// HTTP server answering every request with one canned status and body
pub struct StubServer {
    pub url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    _shutdown: oneshot::Sender<()>,
}

impl StubServer {
    pub async fn start(status: u16, body: impl Into<String>) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let body = body.into();

        let recorded = requests.clone();
        let make_svc = make_service_fn(move |_conn| {
            let recorded = recorded.clone();
            let body = body.clone();
            async move {
                Ok::<_, Infallible>(service_fn(move |req: Request<Body>| {
                    let recorded = recorded.clone();
                    let body = body.clone();
                    async move {
                        let method = req.method().to_string();
                        let path = req.uri().path().to_string();
                        let api_key = req
                            .headers()
                            .get("x-goog-api-key")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                        let bytes = hyper::body::to_bytes(req.into_body()).await.unwrap_or_default();
                        recorded.lock().unwrap().push(RecordedRequest {
                            method,
                            path,
                            api_key,
                            body: String::from_utf8_lossy(&bytes).into_owned(),
                        });

                        Ok::<_, Infallible>(
                            Response::builder()
                                .status(status)
                                .header("content-type", "application/json")
                                .body(Body::from(body))
                                .unwrap(),
                        )
                    }
                }))
            }
        });

        let server = Server::bind(&([127, 0, 0, 1], 0).into()).serve(make_svc);
        let url = format!("http://{}", server.local_addr());
        let (shutdown, signal) = oneshot::channel::<()>();
        tokio::spawn(server.with_graceful_shutdown(async {
            let _ = signal.await;
        }));

        Self {
            url,
            requests,
            _shutdown: shutdown,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn single_request(&self) -> RecordedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests[0].clone()
    }
}

/// Body of a successful response carrying `text`
pub fn text_response(text: &str) -> String {
    serde_json::to_string(&GenerateContentResponse::from_text(text)).unwrap()
}

/// What a [`RecordingTransport`] answers with
#[derive(Clone)]
pub enum Reply {
    Text(String),
    Empty,
    Fail(fn() -> SchoaError),
}

/// Records every request and answers with a fixed reply
pub struct RecordingTransport {
    requests: Mutex<Vec<GenerateContentRequest>>,
    reply: Reply,
}

impl RecordingTransport {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            reply,
        })
    }

    pub fn replying(text: &str) -> Arc<Self> {
        Self::new(Reply::Text(text.to_string()))
    }

    pub fn last_request(&self) -> GenerateContentRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelTransport for RecordingTransport {
    async fn generate_content(&self, request: &GenerateContentRequest) -> Result<GenerateContentResponse> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.reply {
            Reply::Text(text) => Ok(GenerateContentResponse::from_text(text.clone())),
            Reply::Empty => Ok(GenerateContentResponse::default()),
            Reply::Fail(make_error) => Err(make_error()),
        }
    }

    fn model(&self) -> &str {
        "recording"
    }
}

/// The first call blocks until released; later calls answer at once
pub struct GatedTransport {
    calls: AtomicUsize,
    started: Notify,
    release: Notify,
}

impl GatedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            started: Notify::new(),
            release: Notify::new(),
        })
    }

    /// Wait until the first call is in flight
    pub async fn first_call_started(&self) {
        self.started.notified().await;
    }

    pub fn release_first_call(&self) {
        self.release.notify_one();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelTransport for GatedTransport {
    async fn generate_content(&self, _request: &GenerateContentRequest) -> Result<GenerateContentResponse> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if n == 1 {
            self.started.notify_one();
            self.release.notified().await;
        }
        Ok(GenerateContentResponse::from_text(format!("response {}", n)))
    }

    fn model(&self) -> &str {
        "gated"
    }
}
