#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use wikidraft_api::config::{GeneratorConfig, ServerConfig};
use wikidraft_api::router::build_app_router;
use wikidraft_api::state::AppState;
use wikidraft_core::content::DraftContent;
use wikidraft_core::generator::{
    ContentGenerator, GenerationRequest, GeneratorError, UnconfiguredGenerator,
};
use wikidraft_core::memory::{InMemoryDraftStore, InMemoryVersionLog};

/// Build a test `ServerConfig` with safe defaults.
///
/// The generator timeout is kept short so timeout tests finish quickly.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        database_url: None,
        generator: GeneratorConfig {
            url: None,
            timeout_secs: 1,
        },
    }
}

/// Generator that answers with a fixed outcome after an optional delay.
pub struct ScriptedGenerator {
    outcome: Result<DraftContent, GeneratorError>,
    delay: Duration,
}

impl ScriptedGenerator {
    pub fn returning(content: DraftContent) -> Self {
        Self {
            outcome: Ok(content),
            delay: Duration::ZERO,
        }
    }

    pub fn failing(err: GeneratorError) -> Self {
        Self {
            outcome: Err(err),
            delay: Duration::ZERO,
        }
    }

    /// Never answers within the test generator timeout.
    pub fn stalled() -> Self {
        Self {
            outcome: Ok(DraftContent::default()),
            delay: Duration::from_secs(60),
        }
    }
}

#[async_trait]
impl ContentGenerator for ScriptedGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<DraftContent, GeneratorError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.outcome.clone()
    }
}

/// Application state over fresh in-memory stores.
pub fn test_state(generator: Arc<dyn ContentGenerator>) -> AppState {
    AppState {
        drafts: Arc::new(InMemoryDraftStore::new()),
        versions: Arc::new(InMemoryVersionLog::new()),
        generator,
        pool: None,
        config: Arc::new(test_config()),
        shutdown: CancellationToken::new(),
    }
}

/// Build the full application router with all middleware layers over
/// in-memory storage and no configured generator.
pub fn build_test_app() -> Router {
    build_test_app_with(Arc::new(UnconfiguredGenerator))
}

pub fn build_test_app_with(generator: Arc<dyn ContentGenerator>) -> Router {
    build_app_router(test_state(generator), &test_config())
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, method: Method, uri: &str, body: Option<&Value>) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(json).unwrap())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: &Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: &Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
