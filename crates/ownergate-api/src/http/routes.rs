//! HTTP route definitions and handlers.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequest, Path, Request, State},
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, warn};

use ownergate_domain::validation::{CommentForm, FormErrors, NoteForm, SignupForm};
use ownergate_domain::{DomainError, LoginRedirect};
use ownergate_storage::{DataStore, StorageError};

use super::identity::Requester;
use super::state::AppState;
use crate::middleware::{cors_layer, trace_requests, MetricsLayer, RequestIdLayer, RequestMetrics};
use crate::observability::{metrics_handler, MetricsState};

/// Page shown after a note is added, edited or deleted.
pub const NOTES_DONE_PATH: &str = "/notes/done/";

/// Custom JSON extractor that returns 400 Bad Request instead of 422 Unprocessable Entity
/// for deserialization errors.
///
/// Preserves 413 Payload Too Large for body limit errors.
pub struct JsonBadRequest<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBadRequest<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBadRequest(value)),
            Err(rejection) => {
                let message = rejection.body_text();
                if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    Err(ApiError::payload_too_large(message))
                } else {
                    Err(ApiError::validation_error(message))
                }
            }
        }
    }
}

/// A submitted JSON form whose decoding failure is held until the requester
/// has been checked.
type Submitted<T> = Result<JsonBadRequest<T>, ApiError>;

/// Unwraps a submitted form for `requester`.
///
/// Anonymous requesters are sent to login before the body is looked at: a
/// missing, empty or non-JSON body never turns a login redirect into a 400.
fn submitted_form<T>(requester: &Requester, submitted: Submitted<T>) -> Result<T, PageError> {
    if !requester.identity.is_authenticated() {
        return Err(PageError::Login(requester.login_redirect().clone()));
    }
    submitted.map(|JsonBadRequest(form)| form).map_err(PageError::Api)
}

/// Page, news, notes and account routes.
fn page_routes<S: DataStore>() -> Router<Arc<AppState<S>>> {
    Router::new()
        // News
        .route("/news/", get(news_home::<S>))
        .route("/news/:id/", get(news_detail::<S>).post(add_comment::<S>))
        .route(
            "/news/edit_comment/:id/",
            get(edit_comment_page::<S>).post(edit_comment::<S>),
        )
        .route(
            "/news/delete_comment/:id/",
            get(delete_comment_page::<S>)
                .post(delete_comment::<S>)
                .delete(delete_comment::<S>),
        )
        // Notes
        .route("/notes/", get(notes_home::<S>))
        .route("/notes/list/", get(notes_list::<S>))
        .route("/notes/add/", get(note_add_page::<S>).post(add_note::<S>))
        .route(NOTES_DONE_PATH, get(notes_done::<S>))
        .route("/notes/note/:slug/", get(note_detail::<S>))
        .route(
            "/notes/edit/:slug/",
            get(note_edit_page::<S>).post(edit_note::<S>),
        )
        .route(
            "/notes/delete/:slug/",
            get(note_delete_page::<S>).post(delete_note::<S>),
        )
        // Accounts
        .route("/auth/login/", get(login_page::<S>))
        .route("/auth/logout/", get(logout_page::<S>))
        .route("/auth/signup/", get(signup_page::<S>).post(signup::<S>))
}

fn app_routes<S: DataStore>(state: AppState<S>) -> Router {
    let body_limit = state.body_limit;
    let shared_state = Arc::new(state);

    page_routes::<S>()
        // Health and readiness checks
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check::<S>))
        .fallback(route_not_found)
        .with_state(shared_state)
        .layer(RequestBodyLimitLayer::new(body_limit))
}

/// Creates the HTTP router with all page endpoints plus `/health` and `/ready`.
///
/// Applies the body size limit from the state's configuration.
pub fn create_router<S: DataStore>(state: AppState<S>) -> Router {
    app_routes(state)
}

/// Creates the HTTP router with the middleware stack and, when a metrics
/// state is given, the `/metrics` endpoint.
///
/// Layer order, outermost first: request id, CORS, metrics, span and
/// access log.
pub fn create_router_with_observability<S: DataStore>(
    state: AppState<S>,
    metrics_state: Option<MetricsState>,
) -> Router {
    let mut router = app_routes(state);

    if let Some(metrics_state) = metrics_state {
        let metrics_router = Router::new()
            .route("/metrics", get(metrics_handler))
            .with_state(metrics_state);
        router = metrics_router.merge(router);
    }

    router
        .layer(axum::middleware::from_fn(trace_requests))
        .layer(MetricsLayer::new(Arc::new(RequestMetrics::new())))
        .layer(cors_layer())
        .layer(RequestIdLayer::new())
}

// ============================================================
// Error Handling
// ============================================================

/// Error codes carried in the `code` field of error bodies.
pub mod error_codes {
    // 404 Not Found
    /// The resource does not exist or belongs to someone else.
    pub const NOT_FOUND: &str = "not_found";

    // 400 Bad Request
    /// Malformed identifier, identity header or JSON body.
    pub const VALIDATION_ERROR: &str = "validation_error";
    /// Submitted form has field errors.
    pub const FORM_INVALID: &str = "form_invalid";

    // 409 Conflict
    /// The request conflicts with stored data.
    pub const CONFLICT: &str = "conflict";

    // 413 Payload Too Large
    pub const PAYLOAD_TOO_LARGE: &str = "payload_too_large";

    // 5xx
    /// Unexpected internal server error.
    pub const INTERNAL_ERROR: &str = "internal_error";
    /// Storage operation timed out.
    pub const TIMEOUT: &str = "timeout";
    /// Storage backend unavailable.
    pub const SERVICE_UNAVAILABLE: &str = "service_unavailable";
}

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    /// Field errors, for `form_invalid` only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FormErrors>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            errors: None,
        }
    }

    /// Creates a not found error (404). The message never says why.
    pub fn not_found() -> Self {
        Self::new(error_codes::NOT_FOUND, "not found")
    }

    /// Creates a validation error (400).
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new(error_codes::VALIDATION_ERROR, message)
    }

    /// Creates a form error (400) listing the failing fields.
    pub fn form_invalid(errors: FormErrors) -> Self {
        Self {
            errors: Some(errors),
            ..Self::new(error_codes::FORM_INVALID, "form contains errors")
        }
    }

    /// Creates a conflict error (409).
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(error_codes::CONFLICT, message)
    }

    /// Creates a payload too large error (413).
    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(error_codes::PAYLOAD_TOO_LARGE, message)
    }

    /// Creates an internal error (500).
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(error_codes::INTERNAL_ERROR, message)
    }

    /// Creates a timeout error (504 Gateway Timeout).
    pub fn gateway_timeout(message: impl Into<String>) -> Self {
        Self::new(error_codes::TIMEOUT, message)
    }

    /// Creates a service unavailable error (503).
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(error_codes::SERVICE_UNAVAILABLE, message)
    }

    /// HTTP status for this error's code.
    pub fn status(&self) -> StatusCode {
        use error_codes::*;

        match self.code.as_str() {
            NOT_FOUND => StatusCode::NOT_FOUND,
            VALIDATION_ERROR | FORM_INVALID => StatusCode::BAD_REQUEST,
            CONFLICT => StatusCode::CONFLICT,
            PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            TIMEOUT => StatusCode::GATEWAY_TIMEOUT,
            SERVICE_UNAVAILABLE => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        // Backend details stay in the logs, never in the response.
        if err.is_backend_failure() {
            error!(error = %err, "storage backend failure");
        }

        match &err {
            StorageError::NewsNotFound { .. }
            | StorageError::CommentNotFound { .. }
            | StorageError::NoteNotFound { .. } => ApiError::not_found(),
            StorageError::UserAlreadyExists { .. } | StorageError::SlugAlreadyExists { .. } => {
                ApiError::conflict(err.to_string())
            }
            StorageError::InvalidInput { message } => ApiError::validation_error(message),
            StorageError::ConnectionError { .. } => {
                ApiError::service_unavailable("storage backend unavailable")
            }
            StorageError::QueryTimeout { .. } => {
                ApiError::gateway_timeout("storage operation timed out")
            }
            StorageError::InternalError { .. } => ApiError::internal_error("internal storage error"),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::validation_error(err.to_string())
    }
}

/// Failure of a page request: either a login redirect or an error body.
#[derive(Debug)]
pub enum PageError {
    Login(LoginRedirect),
    Api(ApiError),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::Login(redirect) => found(redirect.location()),
            PageError::Api(err) => err.into_response(),
        }
    }
}

impl From<ApiError> for PageError {
    fn from(err: ApiError) -> Self {
        PageError::Api(err)
    }
}

type PageResult = Result<Response, PageError>;

/// `302 Found` to `location`.
fn found(location: String) -> Response {
    (StatusCode::FOUND, [(LOCATION, location)]).into_response()
}

fn comments_anchor(news_id: u64) -> String {
    format!("/news/{news_id}/#comments")
}

fn page<T: Serialize>(view: T) -> PageResult {
    Ok(Json(view).into_response())
}

async fn route_not_found() -> ApiError {
    ApiError::not_found()
}

// ============================================================
// Health and Readiness Checks
// ============================================================

/// Basic health check - returns 200 if the server is running.
///
/// This is a liveness probe. It does NOT check dependencies.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Readiness check - returns 200 if storage reports healthy, 503 otherwise.
///
/// Error details are logged but not exposed in the response.
async fn readiness_check<S: DataStore>(State(state): State<Arc<AppState<S>>>) -> impl IntoResponse {
    let storage_ok = match state.storage.health_check().await {
        Ok(status) if status.healthy => true,
        Ok(status) => {
            warn!(backend = status.backend, message = ?status.message, "Readiness check failed: storage unhealthy");
            false
        }
        Err(e) => {
            error!("Readiness check failed: storage unavailable: {}", e);
            false
        }
    };

    if storage_ok {
        (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "ready",
                "checks": { "storage": "ok" }
            })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "status": "not_ready",
                "checks": { "storage": "unavailable" }
            })),
        )
    }
}

// ============================================================
// News
// ============================================================

async fn news_home<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: Requester,
) -> PageResult {
    let list = state
        .news
        .home(&requester.identity)
        .await
        .map_err(|e| requester.reject(e))?;
    page(list)
}

async fn news_detail<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: Requester,
    Path(news_id): Path<String>,
) -> PageResult {
    let detail = state
        .news
        .detail(&requester.identity, &news_id)
        .await
        .map_err(|e| requester.reject(e))?;
    page(detail)
}

async fn add_comment<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: Requester,
    Path(news_id): Path<String>,
    submitted: Submitted<CommentForm>,
) -> PageResult {
    let form = submitted_form(&requester, submitted)?;
    let comment = state
        .news
        .add_comment(&requester.identity, &news_id, &form)
        .await
        .map_err(|e| requester.reject(e))?;
    Ok(found(comments_anchor(comment.news_id)))
}

async fn edit_comment_page<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: Requester,
    Path(comment_id): Path<String>,
) -> PageResult {
    let edit = state
        .news
        .edit_page(&requester.identity, &comment_id)
        .await
        .map_err(|e| requester.reject(e))?;
    page(edit)
}

async fn edit_comment<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: Requester,
    Path(comment_id): Path<String>,
    submitted: Submitted<CommentForm>,
) -> PageResult {
    let form = submitted_form(&requester, submitted)?;
    let comment = state
        .news
        .edit_comment(&requester.identity, &comment_id, &form)
        .await
        .map_err(|e| requester.reject(e))?;
    Ok(found(comments_anchor(comment.news_id)))
}

async fn delete_comment_page<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: Requester,
    Path(comment_id): Path<String>,
) -> PageResult {
    let comment = state
        .news
        .delete_page(&requester.identity, &comment_id)
        .await
        .map_err(|e| requester.reject(e))?;
    page(comment)
}

async fn delete_comment<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: Requester,
    Path(comment_id): Path<String>,
) -> PageResult {
    let comment = state
        .news
        .delete_comment(&requester.identity, &comment_id)
        .await
        .map_err(|e| requester.reject(e))?;
    Ok(found(comments_anchor(comment.news_id)))
}

// ============================================================
// Notes
// ============================================================

async fn notes_home<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: Requester,
) -> PageResult {
    let view = state
        .notes
        .home(&requester.identity)
        .map_err(|e| requester.reject(e))?;
    page(view)
}

async fn notes_list<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: Requester,
) -> PageResult {
    let list = state
        .notes
        .list(&requester.identity)
        .await
        .map_err(|e| requester.reject(e))?;
    page(list)
}

async fn note_add_page<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: Requester,
) -> PageResult {
    let form = state
        .notes
        .add_page(&requester.identity)
        .map_err(|e| requester.reject(e))?;
    page(form)
}

async fn add_note<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: Requester,
    submitted: Submitted<NoteForm>,
) -> PageResult {
    let form = submitted_form(&requester, submitted)?;
    state
        .notes
        .create(&requester.identity, &form)
        .await
        .map_err(|e| requester.reject(e))?;
    Ok(found(NOTES_DONE_PATH.to_string()))
}

async fn notes_done<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: Requester,
) -> PageResult {
    let view = state
        .notes
        .done(&requester.identity)
        .map_err(|e| requester.reject(e))?;
    page(view)
}

async fn note_detail<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: Requester,
    Path(slug): Path<String>,
) -> PageResult {
    let note = state
        .notes
        .detail(&requester.identity, &slug)
        .await
        .map_err(|e| requester.reject(e))?;
    page(note)
}

async fn note_edit_page<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: Requester,
    Path(slug): Path<String>,
) -> PageResult {
    let form = state
        .notes
        .edit_page(&requester.identity, &slug)
        .await
        .map_err(|e| requester.reject(e))?;
    page(form)
}

async fn edit_note<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: Requester,
    Path(slug): Path<String>,
    submitted: Submitted<NoteForm>,
) -> PageResult {
    let form = submitted_form(&requester, submitted)?;
    state
        .notes
        .update(&requester.identity, &slug, &form)
        .await
        .map_err(|e| requester.reject(e))?;
    Ok(found(NOTES_DONE_PATH.to_string()))
}

async fn note_delete_page<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: Requester,
    Path(slug): Path<String>,
) -> PageResult {
    let note = state
        .notes
        .delete_page(&requester.identity, &slug)
        .await
        .map_err(|e| requester.reject(e))?;
    page(note)
}

async fn delete_note<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: Requester,
    Path(slug): Path<String>,
) -> PageResult {
    state
        .notes
        .delete(&requester.identity, &slug)
        .await
        .map_err(|e| requester.reject(e))?;
    Ok(found(NOTES_DONE_PATH.to_string()))
}

// ============================================================
// Accounts
// ============================================================

async fn login_page<S: DataStore>(State(state): State<Arc<AppState<S>>>) -> impl IntoResponse {
    Json(state.accounts.login_page())
}

async fn logout_page<S: DataStore>(State(state): State<Arc<AppState<S>>>) -> impl IntoResponse {
    Json(state.accounts.logout_page())
}

async fn signup_page<S: DataStore>(State(state): State<Arc<AppState<S>>>) -> impl IntoResponse {
    Json(state.accounts.signup_page())
}

async fn signup<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    requester: Requester,
    JsonBadRequest(form): JsonBadRequest<SignupForm>,
) -> PageResult {
    let user = state
        .accounts
        .signup(&form)
        .await
        .map_err(|e| requester.reject(e))?;
    Ok((StatusCode::CREATED, Json(user)).into_response())
}
