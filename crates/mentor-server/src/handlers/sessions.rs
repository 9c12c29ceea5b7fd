//! Session lifecycle handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use mentor_core::gamification::GamificationEvent;
use mentor_core::progress::UserProgress;

use crate::{AppError, AppState};

/// Request to create a session
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub name: String,
}

/// Response after creating a session
#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub name: String,
    /// Consultation count carried over from a legacy progress file, if any
    pub previous_consultations: u32,
    pub events: Vec<GamificationEvent>,
}

/// Session summary
#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub name: String,
    pub points: u32,
    pub level: u32,
    pub badge: &'static str,
    pub achievements: Vec<String>,
    pub diagnostic_started: bool,
    pub diagnostic_done: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub last_activity_secs_ago: u64,
}

/// POST /api/sessions - Start a user journey
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<Json<CreateSessionResponse>, AppError> {
    let (session_id, events) = state.sessions.create_session(&payload.name).await?;

    // An existing progress file means a returning user
    let previous_consultations = match &state.config.progress_dir {
        Some(dir) => UserProgress::load(dir, payload.name.trim())?
            .map(|p| p.contador_consultas)
            .unwrap_or(0),
        None => 0,
    };

    debug!(session_id = %session_id, "Created session");

    Ok(Json(CreateSessionResponse {
        session_id,
        name: payload.name.trim().to_string(),
        previous_consultations,
        events,
    }))
}

/// GET /api/sessions/:id - Session summary
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionSummary>, AppError> {
    let session = state.sessions.get_session(&session_id).await?;

    Ok(Json(SessionSummary {
        session_id,
        name: session.name.clone(),
        points: session.gamification.points,
        level: session.gamification.level(),
        badge: session.gamification.badge(),
        achievements: session.gamification.achievements.clone(),
        diagnostic_started: session.diagnostic_started,
        diagnostic_done: session.diagnostic_done,
        created_at: session.created_at,
        last_activity_secs_ago: session.last_activity_secs_ago(),
    }))
}

/// DELETE /api/sessions/:id - End a session
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = state.sessions.delete_session(&session_id).await;

    debug!(session_id = %session_id, deleted, "Deleted session");

    Ok(Json(serde_json::json!({ "deleted": deleted })))
}
