use crate::error::Result;
use crate::memory::MemoryService;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use wormhole_core::{validate_url, UrlRecord, UrlStatsRecord};

type AppState = Arc<MemoryService>;

#[derive(Deserialize)]
struct UrlRequest {
    url: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

enum MockError {
    NotFound,
    InvalidUrl(String),
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            MockError::NotFound => (StatusCode::NOT_FOUND, "short code not found".to_string()),
            MockError::InvalidUrl(message) => (StatusCode::BAD_REQUEST, message),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

type HandlerResult<T> = std::result::Result<T, MockError>;

fn check_url(url: &str) -> HandlerResult<()> {
    validate_url(url).map_err(|e| MockError::InvalidUrl(e.to_string()))
}

async fn create_url_handler(
    State(service): State<AppState>,
    Json(request): Json<UrlRequest>,
) -> HandlerResult<(StatusCode, Json<UrlRecord>)> {
    check_url(&request.url)?;
    Ok((StatusCode::CREATED, Json(service.create(&request.url))))
}

async fn get_url_handler(
    Path(short_code): Path<String>,
    State(service): State<AppState>,
) -> HandlerResult<Json<UrlRecord>> {
    service.get(&short_code).map(Json).ok_or(MockError::NotFound)
}

async fn update_url_handler(
    Path(short_code): Path<String>,
    State(service): State<AppState>,
    Json(request): Json<UrlRequest>,
) -> HandlerResult<Json<UrlRecord>> {
    check_url(&request.url)?;
    service
        .update(&short_code, &request.url)
        .map(Json)
        .ok_or(MockError::NotFound)
}

async fn delete_url_handler(
    Path(short_code): Path<String>,
    State(service): State<AppState>,
) -> HandlerResult<StatusCode> {
    if service.delete(&short_code) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(MockError::NotFound)
    }
}

async fn stats_handler(
    Path(short_code): Path<String>,
    State(service): State<AppState>,
) -> HandlerResult<Json<UrlStatsRecord>> {
    service.stats(&short_code).map(Json).ok_or(MockError::NotFound)
}

async fn redirect_handler(
    Path(short_code): Path<String>,
    State(service): State<AppState>,
) -> HandlerResult<Response> {
    let target = service.visit(&short_code).ok_or(MockError::NotFound)?;
    Ok((StatusCode::FOUND, [(header::LOCATION, target)]).into_response())
}

fn router(service: AppState) -> Router {
    Router::new()
        .route("/shorten/", post(create_url_handler))
        .route(
            "/shorten/{short_code}",
            get(get_url_handler)
                .put(update_url_handler)
                .delete(delete_url_handler),
        )
        .route("/shorten/{short_code}/stats", get(stats_handler))
        .route("/redirect/{short_code}", get(redirect_handler))
        .with_state(service)
}

/// The redirection service's HTTP contract served from a [`MemoryService`].
///
/// Listens on an ephemeral loopback port; the server task stops when the
/// `MockServer` is dropped.
pub struct MockServer {
    addr: SocketAddr,
    service: AppState,
    handle: JoinHandle<()>,
}

impl MockServer {
    /// Starts a server over an empty service.
    pub async fn start() -> Result<Self> {
        Self::start_with(MemoryService::new()).await
    }

    /// Starts a server over the given service.
    pub async fn start_with(service: MemoryService) -> Result<Self> {
        let service = Arc::new(service);
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = router(Arc::clone(&service));

        let handle = tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                warn!(error = %err, "mock redirection server stopped");
            }
        });
        info!(listen_addr = %addr, "started mock redirection server");

        Ok(Self {
            addr,
            service,
            handle,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL of the CRUD API, with trailing slash.
    pub fn api_base_url(&self) -> String {
        format!("http://{}/shorten/", self.addr)
    }

    /// Base URL short links redirect through.
    pub fn redirect_base_url(&self) -> String {
        format!("http://{}/redirect/", self.addr)
    }

    pub fn service(&self) -> &MemoryService {
        &self.service
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
