//! Profile intake and guided diagnostic handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use mentor_core::gamification::{points, GamificationEvent};
use mentor_core::models::{Debt, ExpenseKind, Goal, GoalPriority};

use crate::{AppError, AppState, SuccessResponse};

/// Response carrying the gamification side effects of a mutation
#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub success: bool,
    pub events: Vec<GamificationEvent>,
}

impl MutationResponse {
    fn ok(events: Vec<GamificationEvent>) -> Json<Self> {
        Json(Self {
            success: true,
            events,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SetIncomeRequest {
    pub monthly_income: f64,
    #[serde(default)]
    pub emergency_reserve: f64,
}

/// POST /api/sessions/:id/profile/income
pub async fn set_income(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(payload): Json<SetIncomeRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    state
        .sessions
        .with_session_mut(&session_id, |session| {
            session
                .profile
                .set_income(payload.monthly_income, payload.emergency_reserve)
        })
        .await?;

    Ok(Json(SuccessResponse { success: true }))
}

#[derive(Debug, Deserialize)]
pub struct ExtraIncomeRequest {
    pub source: String,
    pub amount: f64,
}

/// POST /api/sessions/:id/profile/extra-income
pub async fn add_extra_income(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(payload): Json<ExtraIncomeRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    state
        .sessions
        .with_session_mut(&session_id, |session| {
            session
                .profile
                .add_extra_income(&payload.source, payload.amount)
        })
        .await?;

    Ok(Json(SuccessResponse { success: true }))
}

#[derive(Debug, Deserialize)]
pub struct ExpenseRequest {
    pub kind: ExpenseKind,
    pub label: String,
    pub amount: f64,
}

/// POST /api/sessions/:id/profile/expenses
pub async fn add_expense(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(payload): Json<ExpenseRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    state
        .sessions
        .with_session_mut(&session_id, |session| {
            session
                .profile
                .add_expense(payload.kind, &payload.label, payload.amount)
        })
        .await?;

    Ok(Json(SuccessResponse { success: true }))
}

#[derive(Debug, Deserialize)]
pub struct RemoveExpenseQuery {
    pub kind: ExpenseKind,
    pub label: String,
}

/// DELETE /api/sessions/:id/profile/expenses
///
/// With `?kind=..&label=..` removes one entry; without query parameters
/// clears every fixed and variable expense.
pub async fn remove_expense(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    query: Option<Query<RemoveExpenseQuery>>,
) -> Result<Json<SuccessResponse>, AppError> {
    state
        .sessions
        .with_session_mut(&session_id, |session| match query {
            Some(Query(query)) => session.profile.remove_expense(query.kind, &query.label),
            None => {
                session.profile.clear_expenses();
                Ok(())
            }
        })
        .await?;

    Ok(Json(SuccessResponse { success: true }))
}

#[derive(Debug, Deserialize)]
pub struct DebtRequest {
    pub name: String,
    pub principal: f64,
    pub monthly_payment: f64,
    pub monthly_rate_pct: f64,
    #[serde(default)]
    pub installments: Option<u32>,
    #[serde(default)]
    pub due_day: Option<u32>,
}

/// POST /api/sessions/:id/profile/debts
pub async fn add_debt(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(payload): Json<DebtRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let debt = Debt::new(
        payload.principal,
        payload.monthly_payment,
        payload.monthly_rate_pct,
        payload.installments,
        payload.due_day,
    )?;

    state
        .sessions
        .with_session_mut(&session_id, |session| {
            session.profile.add_debt(&payload.name, debt)
        })
        .await?;

    Ok(Json(SuccessResponse { success: true }))
}

/// DELETE /api/sessions/:id/profile/debts/:name
pub async fn remove_debt(
    State(state): State<Arc<AppState>>,
    Path((session_id, name)): Path<(String, String)>,
) -> Result<Json<SuccessResponse>, AppError> {
    state
        .sessions
        .with_session_mut(&session_id, |session| session.profile.remove_debt(&name))
        .await?;

    Ok(Json(SuccessResponse { success: true }))
}

#[derive(Debug, Deserialize)]
pub struct GoalRequest {
    pub name: String,
    pub target_amount: f64,
    pub term_months: u32,
    pub priority: GoalPriority,
}

/// POST /api/sessions/:id/profile/goals
///
/// The first goal of the journey unlocks its achievement and bonus points.
pub async fn add_goal(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(payload): Json<GoalRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    let goal = Goal::new(payload.target_amount, payload.term_months, payload.priority)?;

    let events = state
        .sessions
        .with_session_mut(&session_id, |session| {
            let first_goal = session.profile.goals.is_empty();
            session.profile.add_goal(&payload.name, goal)?;

            let mut events = Vec::new();
            if first_goal {
                events = session
                    .gamification
                    .award_points(points::FIRST_GOAL, "Definiu sua primeira meta");
                events.extend(
                    session
                        .gamification
                        .unlock_achievement("Primeira Meta Definida! 🎯"),
                );
            }
            Ok(events)
        })
        .await?;

    Ok(MutationResponse::ok(events))
}

/// DELETE /api/sessions/:id/profile/goals/:name
pub async fn remove_goal(
    State(state): State<Arc<AppState>>,
    Path((session_id, name)): Path<(String, String)>,
) -> Result<Json<SuccessResponse>, AppError> {
    state
        .sessions
        .with_session_mut(&session_id, |session| session.profile.remove_goal(&name))
        .await?;

    Ok(Json(SuccessResponse { success: true }))
}

/// POST /api/sessions/:id/diagnostic/start
///
/// Awards points only the first time.
pub async fn start_diagnostic(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<MutationResponse>, AppError> {
    let events = state
        .sessions
        .with_session_mut(&session_id, |session| {
            if session.diagnostic_started {
                return Ok(Vec::new());
            }
            session.diagnostic_started = true;
            Ok(session
                .gamification
                .award_points(points::DIAGNOSTIC_START, "Iniciou o diagnóstico financeiro"))
        })
        .await?;

    Ok(MutationResponse::ok(events))
}

/// POST /api/sessions/:id/diagnostic/complete
///
/// Requires income to be informed; awards points and the achievement only
/// the first time.
pub async fn complete_diagnostic(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<MutationResponse>, AppError> {
    let events = state
        .sessions
        .with_session_mut(&session_id, |session| {
            if !session.profile.has_income() {
                return Err(mentor_core::Error::InvalidData(
                    "informe sua renda mensal antes de concluir o diagnóstico".to_string(),
                ));
            }
            if session.diagnostic_done {
                return Ok(Vec::new());
            }
            session.diagnostic_started = true;
            session.diagnostic_done = true;

            let mut events = session.gamification.award_points(
                points::DIAGNOSTIC_COMPLETE,
                "Concluiu o diagnóstico financeiro",
            );
            events.extend(
                session
                    .gamification
                    .unlock_achievement("Diagnóstico Completo! 📊"),
            );
            Ok(events)
        })
        .await?;

    Ok(MutationResponse::ok(events))
}
