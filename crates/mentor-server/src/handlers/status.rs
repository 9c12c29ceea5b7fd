//! Service status handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use mentor_core::advisor::AdvisorBackend;

use crate::{AppError, AppState};

/// Response for the status endpoint
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Whether an advisor backend is configured
    pub advisor_configured: bool,
    /// Advisor model name, when configured
    pub advisor_model: Option<String>,
    /// Active (non-expired) sessions
    pub active_sessions: usize,
}

/// GET /api/status - Service health and configuration
pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, AppError> {
    Ok(Json(StatusResponse {
        advisor_configured: state.advisor.is_some(),
        advisor_model: state.advisor.as_ref().map(|a| a.model().to_string()),
        active_sessions: state.sessions.session_count().await,
    }))
}
