//! API Handlers
//!
//! HTTP request handlers for each session endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::config::Config;
use crate::error::SessionResult;
use crate::models::{
    CloseResponse, HealthResponse, KeepAliveRequest, OpenSessionRequest, SessionResponse,
    StatsResponse,
};
use crate::sessions::SessionRegistry;

/// Application state shared across all handlers.
///
/// The registry is constructed once by the composition root and shared by
/// reference; it needs no outer lock since the cache shards internally.
#[derive(Clone, Debug)]
pub struct AppState {
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(sessions: SessionRegistry) -> Self {
        Self {
            sessions: Arc::new(sessions),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Must be called inside a tokio runtime, which hosts the eviction task.
    pub fn from_config(config: &Config) -> Self {
        Self::new(SessionRegistry::from_config(config))
    }
}

/// Handler for POST /sessions
pub async fn open_session_handler(
    State(state): State<AppState>,
    Json(req): Json<OpenSessionRequest>,
) -> SessionResult<(StatusCode, Json<SessionResponse>)> {
    let session = state.sessions.open(&req.id, req.ttl())?;
    Ok((StatusCode::CREATED, Json(SessionResponse::from(&*session))))
}

/// Handler for GET /sessions/:id
pub async fn get_session_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> SessionResult<Json<SessionResponse>> {
    let session = state.sessions.get(&id)?;
    Ok(Json(SessionResponse::from(&*session)))
}

/// Handler for POST /sessions/:id/join
pub async fn join_session_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> SessionResult<Json<SessionResponse>> {
    let session = state.sessions.join(&id)?;
    Ok(Json(SessionResponse::from(&*session)))
}

/// Handler for POST /sessions/:id/leave
pub async fn leave_session_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> SessionResult<Json<SessionResponse>> {
    let session = state.sessions.leave(&id)?;
    Ok(Json(SessionResponse::from(&*session)))
}

/// Handler for PUT /sessions/:id/keepalive
pub async fn keep_alive_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<KeepAliveRequest>>,
) -> SessionResult<Json<SessionResponse>> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let session = state.sessions.keep_alive(&id, req.ttl())?;
    Ok(Json(SessionResponse::from(&*session)))
}

/// Handler for DELETE /sessions/:id
pub async fn close_session_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> SessionResult<Json<CloseResponse>> {
    state.sessions.close(&id)?;
    Ok(Json(CloseResponse::new(id)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.sessions.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
