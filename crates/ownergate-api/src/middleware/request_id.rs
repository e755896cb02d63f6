//! Request id middleware for log correlation.
//!
//! An incoming `x-request-id` is kept when it is non-empty visible text of
//! at most [`MAX_REQUEST_ID_LEN`] bytes; otherwise a fresh UUID v4 replaces
//! it. The handler and the response both see the chosen id.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use axum::http::{HeaderMap, HeaderValue, Request, Response};
use tower::{Layer, Service};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest client-supplied request id that is propagated.
pub const MAX_REQUEST_ID_LEN: usize = 128;

/// Picks the id for a request with these headers.
fn resolve_request_id(headers: &HeaderMap) -> HeaderValue {
    headers
        .get(REQUEST_ID_HEADER)
        .filter(|value| {
            !value.is_empty() && value.len() <= MAX_REQUEST_ID_LEN && value.to_str().is_ok()
        })
        .cloned()
        .unwrap_or_else(fresh_request_id)
}

fn fresh_request_id() -> HeaderValue {
    // A hyphenated UUID is always a valid header value.
    HeaderValue::from_str(&Uuid::new_v4().hyphenated().to_string())
        .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
}

/// Layer stamping every request and response with a request id.
#[derive(Clone, Default)]
pub struct RequestIdLayer;

impl RequestIdLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

#[derive(Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RequestIdService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<ReqBody>) -> Self::Future {
        let id = resolve_request_id(request.headers());
        request.headers_mut().insert(REQUEST_ID_HEADER, id.clone());

        let mut inner = self.inner.clone();
        Box::pin(async move {
            let mut response = inner.call(request).await?;
            response.headers_mut().insert(REQUEST_ID_HEADER, id);
            Ok(response)
        })
    }
}
