//! Shared-secret API key middleware.
//!
//! When a key is configured, every route except the public ones requires
//! the `x-api-key` header to match it exactly. Without a configured key
//! the gate is disabled entirely (local-dev mode). The pipeline never sees
//! a rejected request.

use axum::{
    body::Body,
    extract::Request,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};
use tower::{Layer, Service};

use crate::error::ErrorResponse;

/// Paths that stay reachable without a key.
const PUBLIC_PATHS: &[&str] = &["/health"];

/// Layer for the API key gate.
#[derive(Debug, Clone)]
pub struct ApiKeyLayer {
    key: Option<Arc<str>>,
}

impl ApiKeyLayer {
    /// Create the layer; `None` disables the gate.
    pub fn new(key: Option<String>) -> Self {
        Self {
            key: key.filter(|k| !k.is_empty()).map(Arc::from),
        }
    }
}

impl<S> Layer<S> for ApiKeyLayer {
    type Service = ApiKeyService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ApiKeyService {
            inner,
            key: self.key.clone(),
        }
    }
}

/// API key gate service wrapper.
#[derive(Debug, Clone)]
pub struct ApiKeyService<S> {
    inner: S,
    key: Option<Arc<str>>,
}

impl<S> Service<Request<Body>> for ApiKeyService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let key = self.key.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let Some(key) = key else {
                return inner.call(request).await;
            };

            if PUBLIC_PATHS.contains(&request.uri().path()) {
                return inner.call(request).await;
            }

            let provided = request
                .headers()
                .get("x-api-key")
                .and_then(|v| v.to_str().ok());

            match provided {
                Some(provided) if provided == key.as_ref() => inner.call(request).await,
                _ => Ok(unauthorized_response("Invalid API key")),
            }
        })
    }
}

/// Create an unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    let body = ErrorResponse {
        error: "UNAUTHORIZED".to_string(),
        message: message.to_string(),
        request_id: None,
    };

    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
