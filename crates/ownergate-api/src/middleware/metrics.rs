//! Request metrics middleware.
//!
//! Every response is counted by status class and timed. Counts go to the
//! `metrics` facade (rendered at `/metrics`) and to an in-process
//! [`RequestMetrics`] that tests and health tooling can read directly.
//!
//! Labels are `method`, `route` and `status_class`. The route is the matched
//! pattern (`/notes/note/:slug/`), never the raw path.

use std::{
    future::Future,
    pin::Pin,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    task::{Context, Poll},
    time::{Duration, Instant},
};

use axum::{
    extract::MatchedPath,
    http::{Request, Response, StatusCode},
};
use tower::{Layer, Service};

use crate::observability::{HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION_SECONDS};

/// Route label for requests that matched no route.
const UNMATCHED_ROUTE: &str = "unmatched";

/// Response status grouped the way dashboards read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    Redirect,
    ClientError,
    ServerError,
}

impl StatusClass {
    const ALL: [StatusClass; 4] = [
        StatusClass::Success,
        StatusClass::Redirect,
        StatusClass::ClientError,
        StatusClass::ServerError,
    ];

    /// Classifies a status; informational codes have no class.
    pub fn of(status: StatusCode) -> Option<Self> {
        if status.is_success() {
            Some(StatusClass::Success)
        } else if status.is_redirection() {
            Some(StatusClass::Redirect)
        } else if status.is_client_error() {
            Some(StatusClass::ClientError)
        } else if status.is_server_error() {
            Some(StatusClass::ServerError)
        } else {
            None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusClass::Success => "2xx",
            StatusClass::Redirect => "3xx",
            StatusClass::ClientError => "4xx",
            StatusClass::ServerError => "5xx",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// In-process request counters.
#[derive(Debug, Default)]
pub struct RequestMetrics {
    requests: AtomicU64,
    by_class: [AtomicU64; StatusClass::ALL.len()],
}

impl RequestMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one finished request and emits the facade metrics.
    pub fn record(&self, method: &str, route: &str, status: StatusCode, elapsed: Duration) {
        let class = StatusClass::of(status);

        self.requests.fetch_add(1, Ordering::Relaxed);
        if let Some(class) = class {
            self.by_class[class.index()].fetch_add(1, Ordering::Relaxed);
        }

        let labels = [
            ("method", method.to_string()),
            ("route", route.to_string()),
            ("status_class", class.map_or("other", StatusClass::label).to_string()),
        ];
        metrics::counter!(HTTP_REQUESTS_TOTAL, &labels).increment(1);
        metrics::histogram!(HTTP_REQUEST_DURATION_SECONDS, &labels).record(elapsed.as_secs_f64());
    }

    /// Requests recorded so far, whatever their status.
    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    /// Requests recorded with a status in `class`.
    pub fn count(&self, class: StatusClass) -> u64 {
        self.by_class[class.index()].load(Ordering::Relaxed)
    }
}

/// Layer recording every response into a shared [`RequestMetrics`].
#[derive(Clone)]
pub struct MetricsLayer {
    metrics: Arc<RequestMetrics>,
}

impl MetricsLayer {
    pub fn new(metrics: Arc<RequestMetrics>) -> Self {
        Self { metrics }
    }
}

impl<S> Layer<S> for MetricsLayer {
    type Service = MetricsService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MetricsService {
            inner,
            metrics: Arc::clone(&self.metrics),
        }
    }
}

#[derive(Clone)]
pub struct MetricsService<S> {
    inner: S,
    metrics: Arc<RequestMetrics>,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for MetricsService<S>
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

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        let started = Instant::now();
        let method = request.method().as_str().to_owned();
        let route = request
            .extensions()
            .get::<MatchedPath>()
            .map_or(UNMATCHED_ROUTE, MatchedPath::as_str)
            .to_owned();
        let metrics = Arc::clone(&self.metrics);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let response = inner.call(request).await?;
            metrics.record(&method, &route, response.status(), started.elapsed());
            Ok(response)
        })
    }
}
