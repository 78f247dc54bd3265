//! HTTP service: axum router and request handlers.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use super::convert::{
    DecodeRequest, DecodeResponse, ErrorBody, TokenizeRequest, TokenizeResponse,
};
use crate::reconstruct::Reconstructor;
use crate::tokenizer::TokenizerCache;
use crate::{Result, TokenLensError, annotate, telemetry};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    cache: Arc<TokenizerCache>,
    reconstructor: Arc<Reconstructor>,
}

impl AppState {
    pub fn new(cache: Arc<TokenizerCache>, reconstructor: Reconstructor) -> Self {
        Self {
            cache,
            reconstructor: Arc::new(reconstructor),
        }
    }
}

/// Build the router with all routes.
///
/// CORS is fully permissive so browser clients on any origin can call the API.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/tokenize", post(tokenize_handler))
        .route("/api/decode", post(decode_handler))
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Serve `state` on `listener` until Ctrl-C.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let addr = listener
        .local_addr()
        .map_err(|e| TokenLensError::Internal(format!("Failed to read local address: {e}")))?;
    info!(%addr, "server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| TokenLensError::Internal(format!("Server error: {e}")))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}

/// Error response: 400 for client-correctable failures, 500 otherwise.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl From<TokenLensError> for ApiError {
    fn from(err: TokenLensError) -> Self {
        let status = if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            detail: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}

async fn tokenize_handler(
    State(state): State<AppState>,
    Json(request): Json<TokenizeRequest>,
) -> std::result::Result<Json<TokenizeResponse>, ApiError> {
    debug!(model_id = %request.model_id, chars = request.text.len(), "tokenize request");

    let tokens = observe("tokenize", move || {
        let tokenizer = state.cache.resolve(&request.model_id)?;
        annotate(&request.text, tokenizer.as_ref())
    })
    .await?;

    metrics::counter!(telemetry::TOKENS_TOTAL, "operation" => "tokenize")
        .increment(tokens.len() as u64);
    Ok(Json(tokens.into()))
}

async fn decode_handler(
    State(state): State<AppState>,
    Json(request): Json<DecodeRequest>,
) -> std::result::Result<Json<DecodeResponse>, ApiError> {
    debug!(model_id = %request.model_id, ids = request.ids.len(), "decode request");

    let reconstruction = observe("decode", move || {
        let tokenizer = state.cache.resolve(&request.model_id)?;
        state
            .reconstructor
            .reconstruct(&request.ids, tokenizer.as_ref())
    })
    .await?;

    metrics::counter!(telemetry::TOKENS_TOTAL, "operation" => "decode")
        .increment(reconstruction.tokens.len() as u64);
    Ok(Json(reconstruction.into()))
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "loaded_models": state.cache.len(),
    }))
}

async fn version_handler() -> impl IntoResponse {
    Json(json!({ "version": crate::version_string() }))
}

/// Run tokenizer work off the async runtime and record request metrics.
async fn observe<T, F>(operation: &'static str, work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let started = Instant::now();
    let result = tokio::task::spawn_blocking(work)
        .await
        .unwrap_or_else(|e| Err(TokenLensError::Internal(format!("tokenizer task failed: {e}"))));

    let status = if result.is_ok() { "ok" } else { "error" };
    metrics::counter!(telemetry::REQUESTS_TOTAL, "operation" => operation, "status" => status)
        .increment(1);
    metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS, "operation" => operation)
        .record(started.elapsed().as_secs_f64());
    result
}
