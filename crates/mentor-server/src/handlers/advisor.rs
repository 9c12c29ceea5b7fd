//! Advisor handlers: advice, tips, negotiation roleplay, glossary
//!
//! Advisor failures never bubble up as 5xx. When the backend is missing or
//! errors out, the handler answers with a fixed fallback text and
//! `degraded: true`, so the app keeps working in metric-only mode.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;

use mentor_core::advisor::{AdvisorBackend, DiagnosticFacts};
use mentor_core::gamification::{points, GamificationEvent};
use mentor_core::health::health_snapshot;
use mentor_core::models::{AdviceRecord, FinancialProfile};
use mentor_core::progress::UserProgress;
use mentor_core::session::Session;

use crate::{AppError, AppState};

const ADVICE_UNAVAILABLE: &str =
    "Não foi possível gerar um conselho. Verifique a configuração da API Key.";
const TIP_UNAVAILABLE: &str =
    "Não foi possível gerar uma dica personalizada. Verifique a configuração da API Key.";
const NEGOTIATION_UNAVAILABLE: &str =
    "Não foi possível gerar o roteiro de negociação. Verifique a configuração da API Key.";
const GLOSSARY_UNAVAILABLE: &str =
    "Não foi possível gerar a explicação. Verifique a configuração da API Key.";

/// Response for every advisor-backed endpoint
#[derive(Debug, Serialize)]
pub struct AdvisorResponse {
    pub text: String,
    /// True when the fallback text was used instead of the backend
    pub degraded: bool,
    pub events: Vec<GamificationEvent>,
}

/// One-line summary of the profile for prompt grounding
fn financial_facts(profile: &FinancialProfile) -> String {
    let mut lines = Vec::new();

    match profile.monthly_income {
        Some(income) => lines.push(format!("Renda mensal: R$ {:.2}", income)),
        None => lines.push("Renda mensal: não informada".to_string()),
    }
    lines.push(format!(
        "Despesas fixas: R$ {:.2}",
        profile.total_fixed_expenses()
    ));
    lines.push(format!(
        "Despesas variáveis: R$ {:.2}",
        profile.total_variable_expenses()
    ));
    lines.push(format!(
        "Reserva de emergência: R$ {:.2}",
        profile.emergency_reserve
    ));

    if profile.debts.is_empty() {
        lines.push("Dívidas: nenhuma cadastrada".to_string());
    } else {
        for (name, debt) in &profile.debts {
            lines.push(format!(
                "Dívida {}: R$ {:.2} (parcela R$ {:.2}, juros {:.2}% a.m.)",
                name, debt.principal, debt.monthly_payment, debt.monthly_rate_pct
            ));
        }
    }

    lines.join("\n")
}

/// Facts block for the tip prompt, built from the diagnostic numbers
fn diagnostic_facts(session: &Session) -> DiagnosticFacts {
    let snapshot = health_snapshot(&session.profile);
    let profile = &session.profile;

    let debts_line = if profile.debts.is_empty() {
        "nenhuma dívida cadastrada".to_string()
    } else {
        format!(
            "{} dívida(s) somando R$ {:.2}",
            profile.debts.len(),
            profile.total_debt_principal()
        )
    };

    DiagnosticFacts {
        commitment: format!("{:.1}%", snapshot.income_commitment_pct),
        debt_ratio: format!("{:.1}%", snapshot.annual_debt_ratio_pct),
        classification: snapshot.class.label().to_string(),
        debts_line,
        reserve_line: format!("{:.1} meses de despesas", snapshot.reserve_months),
    }
}

/// Bump the legacy consultation counter on disk, if persistence is enabled
fn bump_consultations(state: &AppState, name: &str) {
    if let Some(dir) = &state.config.progress_dir {
        let mut progress = match UserProgress::load(dir, name) {
            Ok(Some(p)) => p,
            Ok(None) => UserProgress::new(name),
            Err(e) => {
                warn!(error = %e, "Failed to load progress file, starting fresh");
                UserProgress::new(name)
            }
        };
        progress.contador_consultas += 1;
        if let Err(e) = progress.save(dir) {
            warn!(error = %e, "Failed to save progress file");
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AdviceRequest {
    pub concern: String,
}

/// POST /api/sessions/:id/advice
pub async fn request_advice(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(payload): Json<AdviceRequest>,
) -> Result<Json<AdvisorResponse>, AppError> {
    let concern = payload.concern.trim().to_string();
    if concern.is_empty() {
        return Err(AppError::bad_request("descreva sua preocupação financeira"));
    }

    let session = state.sessions.get_session(&session_id).await?;
    let facts = financial_facts(&session.profile);

    let generated = match &state.advisor {
        Some(advisor) => advisor
            .financial_advice(&session.name, &concern, &facts)
            .await
            .map_err(|e| warn!(error = %e, "Advice generation failed"))
            .ok(),
        None => None,
    };

    let (text, degraded) = match generated {
        Some(text) => (text, false),
        None => (ADVICE_UNAVAILABLE.to_string(), true),
    };

    let mut events = Vec::new();
    if !degraded {
        let record = AdviceRecord {
            at: Utc::now(),
            concern,
            advice: text.clone(),
        };
        events = state
            .sessions
            .with_session_mut(&session_id, |session| {
                session.record_advice(record);
                Ok(session
                    .gamification
                    .award_points(points::ADVICE_REQUEST, "Pediu um conselho ao mentor"))
            })
            .await?;
        bump_consultations(&state, &session.name);
    }

    Ok(Json(AdvisorResponse {
        text,
        degraded,
        events,
    }))
}

/// GET /api/sessions/:id/advice/history
///
/// Most recent advice first.
pub async fn get_advice_history(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<AdviceRecord>>, AppError> {
    let session = state.sessions.get_session(&session_id).await?;
    let history: Vec<AdviceRecord> = session.advice_history.iter().rev().cloned().collect();
    Ok(Json(history))
}

/// POST /api/sessions/:id/tip
pub async fn request_tip(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<AdvisorResponse>, AppError> {
    let session = state.sessions.get_session(&session_id).await?;
    let facts = diagnostic_facts(&session);

    let generated = match &state.advisor {
        Some(advisor) => advisor
            .personalized_tip(&facts)
            .await
            .map_err(|e| warn!(error = %e, "Tip generation failed"))
            .ok(),
        None => None,
    };

    let (text, degraded) = match generated {
        Some(text) => (text, false),
        None => (TIP_UNAVAILABLE.to_string(), true),
    };

    Ok(Json(AdvisorResponse {
        text,
        degraded,
        events: Vec::new(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct NegotiationRequest {
    pub creditor: String,
    pub amount: f64,
    pub days_late: u32,
}

/// POST /api/sessions/:id/negotiation
pub async fn request_negotiation(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(payload): Json<NegotiationRequest>,
) -> Result<Json<AdvisorResponse>, AppError> {
    if payload.creditor.trim().is_empty() {
        return Err(AppError::bad_request("informe o nome do credor"));
    }
    if payload.amount <= 0.0 {
        return Err(AppError::bad_request(
            "valor da dívida deve ser maior que zero",
        ));
    }

    let session = state.sessions.get_session(&session_id).await?;

    let generated = match &state.advisor {
        Some(advisor) => advisor
            .negotiation_script(
                &session.name,
                payload.creditor.trim(),
                payload.amount,
                payload.days_late,
            )
            .await
            .map_err(|e| warn!(error = %e, "Negotiation script generation failed"))
            .ok(),
        None => None,
    };

    let (text, degraded) = match generated {
        Some(text) => (text, false),
        None => (NEGOTIATION_UNAVAILABLE.to_string(), true),
    };

    let mut events = Vec::new();
    if !degraded {
        events = state
            .sessions
            .with_session_mut(&session_id, |session| {
                Ok(session.gamification.award_points(
                    points::NEGOTIATION_SIMULATION,
                    "Simulou uma negociação de dívida",
                ))
            })
            .await?;
    }

    Ok(Json(AdvisorResponse {
        text,
        degraded,
        events,
    }))
}

#[derive(Debug, Deserialize)]
pub struct GlossaryRequest {
    pub term: String,
}

/// POST /api/sessions/:id/glossary
pub async fn explain_term(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(payload): Json<GlossaryRequest>,
) -> Result<Json<AdvisorResponse>, AppError> {
    let term = payload.term.trim().to_string();
    if term.is_empty() {
        return Err(AppError::bad_request("informe o termo a explicar"));
    }

    // Session must exist even though the glossary does not read the profile
    state.sessions.get_session(&session_id).await?;

    let generated = match &state.advisor {
        Some(advisor) => advisor
            .explain_term(&term)
            .await
            .map_err(|e| warn!(error = %e, "Term explanation failed"))
            .ok(),
        None => None,
    };

    let (text, degraded) = match generated {
        Some(text) => (text, false),
        None => (GLOSSARY_UNAVAILABLE.to_string(), true),
    };

    let mut events = Vec::new();
    if !degraded {
        events = state
            .sessions
            .with_session_mut(&session_id, |session| {
                Ok(session
                    .gamification
                    .award_points(points::GLOSSARY_TERM, &format!("Consultou o termo: {}", term)))
            })
            .await?;
    }

    Ok(Json(AdvisorResponse {
        text,
        degraded,
        events,
    }))
}
