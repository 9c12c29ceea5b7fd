//! In-memory session store
//!
//! A session holds everything the app knows about one user journey: the
//! financial profile, the gamification ledger and the advice history.
//! Sessions live in memory only and expire after 30 minutes of inactivity.

use std::collections::HashMap;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::gamification::{points, GamificationEvent, GamificationState};
use crate::models::{AdviceRecord, FinancialProfile};

/// Session timeout (30 minutes of inactivity)
const SESSION_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Maximum advice records kept per session (most recent win)
const MAX_ADVICE_HISTORY: usize = 50;

/// One user journey
#[derive(Debug, Clone)]
pub struct Session {
    /// Name the user introduced themselves with
    pub name: String,
    pub profile: FinancialProfile,
    pub gamification: GamificationState,
    pub advice_history: Vec<AdviceRecord>,
    /// The guided diagnostic was started
    pub diagnostic_started: bool,
    /// The guided diagnostic ran to completion
    pub diagnostic_done: bool,
    /// Education module titles already opened
    pub opened_modules: Vec<String>,
    /// Education module titles already completed
    pub completed_modules: Vec<String>,
    pub created_at: DateTime<Utc>,
    last_activity: Instant,
}

impl Session {
    fn new(name: String) -> Self {
        Self {
            name,
            profile: FinancialProfile::new(),
            gamification: GamificationState::new(),
            advice_history: Vec::new(),
            diagnostic_started: false,
            diagnostic_done: false,
            opened_modules: Vec::new(),
            completed_modules: Vec::new(),
            created_at: Utc::now(),
            last_activity: Instant::now(),
        }
    }

    fn is_expired(&self) -> bool {
        self.last_activity.elapsed() > SESSION_TIMEOUT
    }

    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// Append an advice record, trimming the oldest beyond the cap
    pub fn record_advice(&mut self, record: AdviceRecord) {
        self.advice_history.push(record);
        if self.advice_history.len() > MAX_ADVICE_HISTORY {
            let start = self.advice_history.len() - MAX_ADVICE_HISTORY;
            self.advice_history = self.advice_history[start..].to_vec();
        }
    }

    pub fn last_activity_secs_ago(&self) -> u64 {
        self.last_activity.elapsed().as_secs()
    }
}

/// Thread-safe in-memory session manager
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Create a new session and return its ID plus the welcome events
    ///
    /// Expired sessions are pruned on the way in.
    pub async fn create_session(&self, name: &str) -> Result<(String, Vec<GamificationEvent>)> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidData("nome é obrigatório".to_string()));
        }

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let mut hasher = Sha256::new();
        hasher.update(timestamp.to_le_bytes());
        let hash = hasher.finalize();
        let session_id = format!("ses_{:x}", hash)[..20].to_string();

        let mut session = Session::new(name.to_string());
        let mut events = session.gamification.award_points(
            points::JOURNEY_START,
            "Começou sua jornada financeira",
        );
        events.extend(
            session
                .gamification
                .unlock_achievement("Início da Jornada Financeira! 🚀"),
        );

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| !s.is_expired());
        sessions.insert(session_id.clone(), session);

        tracing::debug!(session_id = %session_id, "created session");
        Ok((session_id, events))
    }

    /// Read a snapshot of a session
    pub async fn get_session(&self, session_id: &str) -> Result<Session> {
        let sessions = self.sessions.read().await;
        sessions
            .get(session_id)
            .filter(|s| !s.is_expired())
            .cloned()
            .ok_or_else(|| Error::Session("sessão não encontrada ou expirada".to_string()))
    }

    /// Run a closure against a session under the write lock
    ///
    /// Touches the session's activity clock on success.
    pub async fn with_session_mut<F, T>(&self, session_id: &str, f: F) -> Result<T>
    where
        F: FnOnce(&mut Session) -> Result<T>,
    {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(session_id)
            .filter(|s| !s.is_expired())
            .ok_or_else(|| Error::Session("sessão não encontrada ou expirada".to_string()))?;
        let result = f(session)?;
        session.touch();
        Ok(result)
    }

    /// Delete a session; returns whether it existed
    pub async fn delete_session(&self, session_id: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        sessions.remove(session_id).is_some()
    }

    pub async fn session_count(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.values().filter(|s| !s.is_expired()).count()
    }
}
