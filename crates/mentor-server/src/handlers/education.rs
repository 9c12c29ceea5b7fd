//! Educational content handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use mentor_core::education::{self, EducationModule, QuickTip};
use mentor_core::gamification::{points, GamificationEvent};

use crate::{AppError, AppState};

/// Result of opening or completing a module
#[derive(Debug, Serialize)]
pub struct ModuleMutationResponse {
    pub title: &'static str,
    pub events: Vec<GamificationEvent>,
}

/// GET /api/education/modules
pub async fn list_modules() -> Json<&'static [EducationModule]> {
    Json(education::modules())
}

/// GET /api/education/tips
pub async fn list_tips() -> Json<&'static [QuickTip]> {
    Json(education::quick_tips())
}

/// POST /api/sessions/:id/education/:index/open
///
/// First open of each module awards points.
pub async fn open_module(
    State(state): State<Arc<AppState>>,
    Path((session_id, index)): Path<(String, usize)>,
) -> Result<Json<ModuleMutationResponse>, AppError> {
    let module = education::module(index)
        .ok_or_else(|| AppError::not_found("módulo educacional não encontrado"))?;

    let events = state
        .sessions
        .with_session_mut(&session_id, |session| {
            if session.opened_modules.iter().any(|t| t == module.title) {
                return Ok(Vec::new());
            }
            session.opened_modules.push(module.title.to_string());
            Ok(session.gamification.award_points(
                points::MODULE_OPEN,
                &format!("Acessou o módulo {}", module.title),
            ))
        })
        .await?;

    Ok(Json(ModuleMutationResponse {
        title: module.title,
        events,
    }))
}

/// POST /api/sessions/:id/education/:index/complete
///
/// First completion of each module awards points and its achievement.
pub async fn complete_module(
    State(state): State<Arc<AppState>>,
    Path((session_id, index)): Path<(String, usize)>,
) -> Result<Json<ModuleMutationResponse>, AppError> {
    let module = education::module(index)
        .ok_or_else(|| AppError::not_found("módulo educacional não encontrado"))?;

    let events = state
        .sessions
        .with_session_mut(&session_id, |session| {
            if session.completed_modules.iter().any(|t| t == module.title) {
                return Ok(Vec::new());
            }
            session.completed_modules.push(module.title.to_string());

            let mut events = session.gamification.award_points(
                points::MODULE_COMPLETE,
                &format!("Concluiu o módulo {}", module.title),
            );
            events.extend(
                session
                    .gamification
                    .unlock_achievement(&format!("Módulo Concluído: {}! 📚", module.title)),
            );
            Ok(events)
        })
        .await?;

    Ok(Json(ModuleMutationResponse {
        title: module.title,
        events,
    }))
}
