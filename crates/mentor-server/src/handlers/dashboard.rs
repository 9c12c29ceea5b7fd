//! Analysis handlers: dashboard, health snapshot, payoff, strategy, charts

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use mentor_core::charts::{expense_breakdown, ExpenseSlice};
use mentor_core::gamification::Challenge;
use mentor_core::health::health_snapshot;
use mentor_core::models::{HealthClass, HealthSnapshot, PortfolioPayoff};
use mentor_core::payoff::simulate_portfolio;
use mentor_core::strategy::{select_strategy, StrategyAdvice};

use crate::{AppError, AppState};

/// Everything the main dashboard needs in one call
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub name: String,
    pub health: HealthSnapshot,
    /// Health classification label in Portuguese
    pub health_label: &'static str,
    pub strategy: StrategyAdvice,
    pub payoff: PortfolioPayoff,
    pub expense_chart: Vec<ExpenseSlice>,
    pub points: u32,
    pub level: u32,
    pub badge: &'static str,
    pub active_challenges: Vec<Challenge>,
    /// Present when the diagnostic is still pending
    pub guidance: Option<&'static str>,
}

/// GET /api/sessions/:id/dashboard
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<DashboardResponse>, AppError> {
    let session = state.sessions.get_session(&session_id).await?;

    let health = health_snapshot(&session.profile);
    let guidance = if health.class == HealthClass::Unavailable {
        Some("Complete o diagnóstico informando sua renda para ver sua saúde financeira.")
    } else {
        None
    };

    Ok(Json(DashboardResponse {
        name: session.name.clone(),
        health_label: health.class.label(),
        health,
        strategy: select_strategy(&session.profile),
        payoff: simulate_portfolio(&session.profile),
        expense_chart: expense_breakdown(&session.profile),
        points: session.gamification.points,
        level: session.gamification.level(),
        badge: session.gamification.badge(),
        active_challenges: session.gamification.active_challenges.clone(),
        guidance,
    }))
}

/// GET /api/sessions/:id/health-snapshot
pub async fn get_health_snapshot(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<HealthSnapshot>, AppError> {
    let session = state.sessions.get_session(&session_id).await?;
    Ok(Json(health_snapshot(&session.profile)))
}

/// GET /api/sessions/:id/payoff
pub async fn get_payoff(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<PortfolioPayoff>, AppError> {
    let session = state.sessions.get_session(&session_id).await?;
    Ok(Json(simulate_portfolio(&session.profile)))
}

/// GET /api/sessions/:id/strategy
pub async fn get_strategy(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<StrategyAdvice>, AppError> {
    let session = state.sessions.get_session(&session_id).await?;
    Ok(Json(select_strategy(&session.profile)))
}

/// GET /api/sessions/:id/expenses/chart
pub async fn get_expense_chart(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<ExpenseSlice>>, AppError> {
    let session = state.sessions.get_session(&session_id).await?;
    Ok(Json(expense_breakdown(&session.profile)))
}

/// Gamification progress summary
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub points: u32,
    pub level: u32,
    pub points_to_next_level: u32,
    pub badge: &'static str,
    pub achievements: Vec<String>,
    pub completed_challenges: usize,
}

/// GET /api/sessions/:id/progress
pub async fn get_progress(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<ProgressResponse>, AppError> {
    let session = state.sessions.get_session(&session_id).await?;

    Ok(Json(ProgressResponse {
        points: session.gamification.points,
        level: session.gamification.level(),
        points_to_next_level: session.gamification.points_to_next_level(),
        badge: session.gamification.badge(),
        achievements: session.gamification.achievements.clone(),
        completed_challenges: session.gamification.completed_challenges.len(),
    }))
}
