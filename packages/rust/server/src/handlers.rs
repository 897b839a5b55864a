//! Route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use kitguide_core::{ChatReply, SessionStart};
use kitguide_shared::Kit;

use crate::error::ApiError;
use crate::{AppState, SERVICE_NAME};

/// Body of `POST /api/session/start`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStartRequest {
    /// Order ID or kit ID.
    pub identifier: String,
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub identifier: String,
    pub message: String,
}

pub(crate) async fn root() -> Json<Value> {
    Json(json!({
        "name": SERVICE_NAME,
        "status": "running",
        "endpoints": {
            "health": "/health",
            "start_session": "/api/session/start",
            "chat": "/api/chat",
            "get_kit_by_id": "/api/kits/{kit_id}",
        },
        "policy": "Responses are restricted to the learner's identified robotics kit context.",
    }))
}

pub(crate) async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub(crate) async fn read_kit(
    State(state): State<AppState>,
    Path(kit_id): Path<String>,
) -> Result<Json<Kit>, ApiError> {
    state
        .guide
        .kit(&kit_id)
        .map(|kit| Json(kit.clone()))
        .map_err(|e| ApiError::from_core(e, "Kit not found"))
}

pub(crate) async fn start_session(
    State(state): State<AppState>,
    Json(req): Json<SessionStartRequest>,
) -> Result<Json<SessionStart>, ApiError> {
    debug!(identifier = %req.identifier, "session start requested");
    state
        .guide
        .start_session(&req.identifier)
        .map(Json)
        .map_err(|e| ApiError::from_core(e, "Kit not found for provided order/kit ID"))
}

pub(crate) async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    state
        .guide
        .chat(&req.identifier, &req.message)
        .map(Json)
        .map_err(|e| ApiError::from_core(e, "Unknown identifier"))
}
