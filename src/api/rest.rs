// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
//   GET  /            welcome banner
//   GET  /health      liveness + ingestion counters
//   POST /indicators  ingest one OHLC observation, respond with the snapshot
//   GET  /indicators  latest snapshot
//
// CORS follows `RuntimeConfig::allowed_origins`.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use serde_json::json;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

use crate::app_state::AppState;
use crate::ingest::IngestError;
use crate::runtime_config::RuntimeConfig;
use crate::types::RawSample;

const WELCOME: &str = "Welcome to the indicators API!";

// =============================================================================
// Router construction
// =============================================================================

pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
        .route("/indicators", get(current_indicators).post(ingest_indicators))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &RuntimeConfig) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    if config.allows_any_origin() {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
}

// =============================================================================
// Errors
// =============================================================================

/// Errors surfaced by the handlers.
#[derive(Debug)]
pub enum ApiError {
    BadRequest { field: &'static str, detail: String },
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::MalformedSample { field, reason } => ApiError::BadRequest {
                field,
                detail: reason,
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest {
            field: "body",
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest { field, detail } => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Missing OHLC data",
                    "field": field,
                    "detail": detail,
                })),
            )
                .into_response(),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

async fn welcome() -> &'static str {
    WELCOME
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    ingested: u64,
    window_len: usize,
    server_time: i64,
    uptime_secs: u64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        ingested: state.store.version(),
        window_len: state.gate.series_len(),
        server_time: chrono::Utc::now().timestamp_millis(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

async fn current_indicators(State(state): State<Arc<AppState>>) -> Response {
    match state.store.current() {
        Some(snapshot) => Json(snapshot.as_ref()).into_response(),
        None => Json(json!({ "latestOHLC": null, "indicatorValues": {} })).into_response(),
    }
}

async fn ingest_indicators(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RawSample>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(raw) = body.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "unreadable OHLC body");
        ApiError::from(rejection)
    })?;

    match state.gate.ingest(raw) {
        Ok(snapshot) => Ok(Json(snapshot.as_ref()).into_response()),
        Err(err) => {
            warn!(error = %err, "rejected OHLC sample");
            Err(err.into())
        }
    }
}
