//! Challenge handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;

use mentor_core::gamification::{draw_challenge, Challenge, GamificationEvent};

use crate::{AppError, AppState};

/// Active and completed challenges of a session
#[derive(Debug, Serialize)]
pub struct ChallengesResponse {
    pub active: Vec<Challenge>,
    pub completed: Vec<Challenge>,
}

/// Result of a challenge mutation
#[derive(Debug, Serialize)]
pub struct ChallengeMutationResponse {
    pub events: Vec<GamificationEvent>,
}

/// GET /api/sessions/:id/challenges
pub async fn list_challenges(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<ChallengesResponse>, AppError> {
    let session = state.sessions.get_session(&session_id).await?;

    Ok(Json(ChallengesResponse {
        active: session.gamification.active_challenges.clone(),
        completed: session.gamification.completed_challenges.clone(),
    }))
}

/// POST /api/sessions/:id/challenges/propose
///
/// Draws a random challenge from the catalog. Nothing is awarded until the
/// user accepts it.
pub async fn propose_challenge(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<Challenge>, AppError> {
    // Proposal requires a live session
    state.sessions.get_session(&session_id).await?;

    let challenge = draw_challenge(&mut rand::thread_rng(), Utc::now());
    Ok(Json(challenge))
}

/// POST /api/sessions/:id/challenges/accept
///
/// Accepts a previously proposed challenge (the client echoes it back).
/// Accepting a challenge already active yields a warning event instead of
/// points.
pub async fn accept_challenge(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(challenge): Json<Challenge>,
) -> Result<Json<ChallengeMutationResponse>, AppError> {
    let events = state
        .sessions
        .with_session_mut(&session_id, |session| {
            Ok(session.gamification.accept_challenge(challenge))
        })
        .await?;

    Ok(Json(ChallengeMutationResponse { events }))
}

/// POST /api/sessions/:id/challenges/:index/complete
pub async fn complete_challenge(
    State(state): State<Arc<AppState>>,
    Path((session_id, index)): Path<(String, usize)>,
) -> Result<Json<ChallengeMutationResponse>, AppError> {
    let events = state
        .sessions
        .with_session_mut(&session_id, |session| {
            session.gamification.complete_challenge(index)
        })
        .await?;

    Ok(Json(ChallengeMutationResponse { events }))
}

/// DELETE /api/sessions/:id/challenges/:index
pub async fn abandon_challenge(
    State(state): State<Arc<AppState>>,
    Path((session_id, index)): Path<(String, usize)>,
) -> Result<Json<Challenge>, AppError> {
    let abandoned = state
        .sessions
        .with_session_mut(&session_id, |session| {
            session.gamification.abandon_challenge(index)
        })
        .await?;

    Ok(Json(abandoned))
}
