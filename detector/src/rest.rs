use crate::errors::Error;
use crate::metrics::{
    MONITORED_MINERS, READINGS_TOTAL, READING_LOG_SIZE, REGISTRATIONS_TOTAL, REJECTED_TOTAL,
    SUSPECTED_GHOSTS,
};
use crate::model::{IngestResponse, MinerStatus, RegisterResponse, StateResponse};
use crate::registry::Registry;
use crate::validate;
use axum::{
    body::Bytes,
    extract::{ConnectInfo, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

#[derive(Clone)]
struct AppState {
    registry: Arc<Mutex<Registry>>,
}

pub fn create_router(registry: Arc<Mutex<Registry>>) -> Router {
    let state = AppState { registry };

    Router::new()
        .route("/api/v1/miners", post(register_miner))
        .route("/api/v1/readings", post(ingest_reading))
        .route("/api/v1/state", get(observe_state))
        .with_state(state)
}

async fn register_miner(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let value = parse_json(&body)?;
    let req = validate::parse_register(&value)?;
    let mac = req.mac.clone();

    let mut registry = state.registry.lock().await;
    registry.register(req, Utc::now());
    REGISTRATIONS_TOTAL.inc();
    MONITORED_MINERS.set(registry.miner_count() as f64);

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            status: "monitoring",
            mac,
        }),
    ))
}

async fn ingest_reading(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let value = parse_json(&body)?;
    let payload = validate::parse_reading(&value)?;

    let mut registry = state.registry.lock().await;
    let stored = registry.ingest(payload, addr.to_string(), Utc::now());
    READINGS_TOTAL.inc();
    READING_LOG_SIZE.set(registry.reading_count() as f64);

    Ok((
        StatusCode::CREATED,
        Json(IngestResponse {
            status: "success",
            received: stored,
        }),
    ))
}

async fn observe_state(State(state): State<AppState>) -> Json<StateResponse> {
    let registry = state.registry.lock().await;
    let miners = registry.miners(Utc::now());
    let readings = registry.readings();

    let ghosts = miners
        .iter()
        .filter(|m| m.status == MinerStatus::SuspectedGhost)
        .count();
    SUSPECTED_GHOSTS.set(ghosts as f64);

    Json(StateResponse { miners, readings })
}

fn parse_json(body: &Bytes) -> Result<Value, Error> {
    serde_json::from_slice(body).map_err(|e| Error::Malformed(format!("not valid JSON: {}", e)))
}

struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Both variants are client faults; the registry itself has no
        // failure modes once validation passes.
        REJECTED_TOTAL.inc();
        warn!("Rejected request: {}", self.0);

        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}
