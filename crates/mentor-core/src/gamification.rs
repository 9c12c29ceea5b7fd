//! Gamification ledger
//!
//! Points, levels, achievements and challenges. Every mutation returns the
//! list of `GamificationEvent`s it produced so the view layer can surface
//! toasts/celebrations; the ledger itself never talks to the UI.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Points needed to advance one level
pub const POINTS_PER_LEVEL: u32 = 100;

/// Fixed point values for user interactions (from the product rules)
pub mod points {
    pub const JOURNEY_START: u32 = 10;
    pub const ADVICE_REQUEST: u32 = 10;
    pub const NEGOTIATION_SIMULATION: u32 = 15;
    pub const GLOSSARY_TERM: u32 = 5;
    pub const CHALLENGE_ACCEPT: u32 = 5;
    pub const DIAGNOSTIC_START: u32 = 20;
    pub const DIAGNOSTIC_COMPLETE: u32 = 30;
    pub const FIRST_GOAL: u32 = 15;
    pub const MODULE_OPEN: u32 = 5;
    pub const MODULE_COMPLETE: u32 = 15;
}

/// Challenge difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeDifficulty {
    Easy,
    Medium,
    Hard,
}

impl ChallengeDifficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Display label in Brazilian Portuguese
    pub fn label(&self) -> &'static str {
        match self {
            Self::Easy => "Fácil",
            Self::Medium => "Médio",
            Self::Hard => "Difícil",
        }
    }
}

/// A financial habit challenge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    pub title: String,
    pub description: String,
    pub difficulty: ChallengeDifficulty,
    pub points: u32,
    pub duration_days: i64,
    pub started_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub completed: bool,
}

impl Challenge {
    /// Whole days until the challenge window closes (clamped at 0)
    pub fn remaining_days(&self, now: DateTime<Utc>) -> i64 {
        (self.ends_at - now).num_days().max(0)
    }
}

/// Catalog entry for a challenge before it is drawn
struct ChallengeSpec {
    title: &'static str,
    description: &'static str,
    difficulty: ChallengeDifficulty,
    points: u32,
    duration_days: i64,
}

/// Fixed challenge catalog
const CHALLENGE_CATALOG: &[ChallengeSpec] = &[
    ChallengeSpec {
        title: "Semana Sem Delivery",
        description: "Evite pedir comida por delivery por uma semana inteira.",
        difficulty: ChallengeDifficulty::Medium,
        points: 30,
        duration_days: 7,
    },
    ChallengeSpec {
        title: "Dia de Registro Total",
        description: "Registre absolutamente todos os seus gastos por um dia inteiro, até os centavos.",
        difficulty: ChallengeDifficulty::Easy,
        points: 15,
        duration_days: 1,
    },
    ChallengeSpec {
        title: "Economia de R$50",
        description: "Encontre formas de economizar R$50 esta semana em gastos que você normalmente faria.",
        difficulty: ChallengeDifficulty::Medium,
        points: 25,
        duration_days: 7,
    },
    ChallengeSpec {
        title: "Pesquisa de Preços",
        description: "Compare preços de 5 produtos que você compra regularmente em pelo menos 3 estabelecimentos diferentes.",
        difficulty: ChallengeDifficulty::Medium,
        points: 20,
        duration_days: 3,
    },
    ChallengeSpec {
        title: "Dia Sem Gastos",
        description: "Passe um dia inteiro sem gastar absolutamente nada.",
        difficulty: ChallengeDifficulty::Hard,
        points: 40,
        duration_days: 1,
    },
];

/// Draw a challenge uniformly at random from the fixed catalog
///
/// Takes the RNG as a dependency so tests can seed it.
pub fn draw_challenge<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> Challenge {
    let spec = &CHALLENGE_CATALOG[rng.gen_range(0..CHALLENGE_CATALOG.len())];
    Challenge {
        title: spec.title.to_string(),
        description: spec.description.to_string(),
        difficulty: spec.difficulty,
        points: spec.points,
        duration_days: spec.duration_days,
        started_at: now,
        ends_at: now + Duration::days(spec.duration_days),
        completed: false,
    }
}

/// Something the ledger did that the user should hear about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GamificationEvent {
    PointsAwarded { amount: u32, reason: String },
    LevelUp { level: u32 },
    AchievementUnlocked { label: String },
    DuplicateChallenge { title: String },
}

/// Cumulative gamification state of one session; points never decrease
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GamificationState {
    pub points: u32,
    /// Ordered, unique achievement labels
    pub achievements: Vec<String>,
    pub active_challenges: Vec<Challenge>,
    pub completed_challenges: Vec<Challenge>,
}

impl GamificationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current level: 1 + one level per 100 points
    pub fn level(&self) -> u32 {
        1 + self.points / POINTS_PER_LEVEL
    }

    pub fn points_to_next_level(&self) -> u32 {
        POINTS_PER_LEVEL - self.points % POINTS_PER_LEVEL
    }

    /// Badge title for the current level tier
    pub fn badge(&self) -> &'static str {
        match self.level() {
            0..=2 => "Aprendiz Financeiro",
            3..=4 => "Estrategista Financeiro",
            _ => "Especialista Financeiro",
        }
    }

    /// Add points and recompute the level; a level-up unlocks its achievement
    pub fn award_points(&mut self, amount: u32, reason: &str) -> Vec<GamificationEvent> {
        let mut events = Vec::new();

        let previous_level = self.level();
        self.points += amount;
        events.push(GamificationEvent::PointsAwarded {
            amount,
            reason: reason.to_string(),
        });

        let level = self.level();
        if level > previous_level {
            events.push(GamificationEvent::LevelUp { level });
            if self.unlock(&format!("Nível {} Alcançado! 🏆", level)) {
                events.push(GamificationEvent::AchievementUnlocked {
                    label: format!("Nível {} Alcançado! 🏆", level),
                });
            }
        }

        tracing::debug!(amount, reason, points = self.points, "points awarded");
        events
    }

    /// Unlock an achievement; returns false when it was already present
    pub fn unlock_achievement(&mut self, label: &str) -> Option<GamificationEvent> {
        if self.unlock(label) {
            Some(GamificationEvent::AchievementUnlocked {
                label: label.to_string(),
            })
        } else {
            None
        }
    }

    fn unlock(&mut self, label: &str) -> bool {
        if self.achievements.iter().any(|a| a == label) {
            return false;
        }
        self.achievements.push(label.to_string());
        true
    }

    /// Accept a drawn challenge
    ///
    /// A challenge with the same title already active is rejected with a
    /// warning event and no points.
    pub fn accept_challenge(&mut self, challenge: Challenge) -> Vec<GamificationEvent> {
        if self
            .active_challenges
            .iter()
            .any(|c| c.title == challenge.title)
        {
            return vec![GamificationEvent::DuplicateChallenge {
                title: challenge.title,
            }];
        }

        let title = challenge.title.clone();
        self.active_challenges.push(challenge);
        self.award_points(
            points::CHALLENGE_ACCEPT,
            &format!("Aceitou o desafio: {}", title),
        )
    }

    /// Complete the active challenge at `index`, moving it to the completed
    /// list and awarding its points; milestone completions unlock
    /// achievements.
    pub fn complete_challenge(&mut self, index: usize) -> Result<Vec<GamificationEvent>> {
        if index >= self.active_challenges.len() {
            return Err(Error::NotFound(format!("desafio ativo #{}", index)));
        }

        let mut challenge = self.active_challenges.remove(index);
        challenge.completed = true;
        let title = challenge.title.clone();
        let challenge_points = challenge.points;
        self.completed_challenges.push(challenge);

        let mut events =
            self.award_points(challenge_points, &format!("Concluiu o desafio: {}", title));

        let milestone = match self.completed_challenges.len() {
            1 => Some("Primeiro Desafio Concluído! 🌟"),
            5 => Some("Desafiador Experiente: 5 Desafios Concluídos! 🔥"),
            10 => Some("Mestre dos Desafios: 10 Desafios Concluídos! 🏅"),
            _ => None,
        };
        if let Some(label) = milestone {
            events.extend(self.unlock_achievement(label));
        }

        Ok(events)
    }

    /// Abandon the active challenge at `index`: removed, no points
    pub fn abandon_challenge(&mut self, index: usize) -> Result<Challenge> {
        if index >= self.active_challenges.len() {
            return Err(Error::NotFound(format!("desafio ativo #{}", index)));
        }
        Ok(self.active_challenges.remove(index))
    }
}
