//! Mentor Core Library
//!
//! Shared functionality for the Mentor financial guidance app:
//! - Financial profile, debt and goal models with validation
//! - Health diagnostic scoring and classification
//! - Debt payoff simulation and strategy selection
//! - Gamification ledger (points, levels, achievements, challenges)
//! - In-memory session store
//! - Pluggable advisor backends (Gemini, mock)
//! - Prompt library for customizable advisor prompts
//! - Educational content catalog
//! - Legacy progress file persistence

pub mod advisor;
pub mod charts;
pub mod education;
pub mod error;
pub mod gamification;
pub mod health;
pub mod models;
pub mod payoff;
pub mod progress;
pub mod prompts;
pub mod session;
pub mod strategy;

pub use advisor::{AdvisorBackend, AdvisorClient, DiagnosticFacts, GeminiBackend, MockBackend};
pub use charts::{expense_breakdown, ExpenseSlice};
pub use education::{EducationModule, QuickTip};
pub use error::{Error, Result};
pub use gamification::{
    draw_challenge, Challenge, ChallengeDifficulty, GamificationEvent, GamificationState,
};
pub use health::health_snapshot;
pub use models::{
    AdviceRecord, Debt, ExpenseKind, FinancialProfile, Goal, GoalPriority, HealthClass,
    HealthSnapshot, PayoffHorizon, PayoffResult, PortfolioPayoff,
};
pub use payoff::{simulate_payoff, simulate_portfolio, PAYOFF_CAP_MONTHS};
pub use progress::{UserProgress, PROGRESS_SUFFIX};
pub use prompts::{Prompt, PromptId, PromptLibrary};
pub use session::{Session, SessionManager};
pub use strategy::{select_strategy, PayoffMethod, StrategyAdvice};
