//! Pluggable advisor backend abstraction
//!
//! The advisor turns a user's financial situation into conversational
//! guidance in Portuguese. Backends implement `AdvisorBackend`; the
//! `AdvisorClient` enum wraps them with Clone and compile-time dispatch.
//!
//! # Configuration
//!
//! Environment variables:
//! - `ADVISOR_BACKEND`: Backend to use (gemini, mock). Default: gemini
//! - `GOOGLE_API_KEY`: API key (required for gemini backend)
//! - `GEMINI_MODEL`: Model name (default: gemini-2.0-flash)
//!
//! Without a key the app keeps working in metric-only mode; callers treat
//! a missing client as "advice unavailable", never as a hard failure.

mod gemini;
mod mock;

pub use gemini::GeminiBackend;
pub use mock::MockBackend;

use async_trait::async_trait;

use crate::error::Result;

/// Diagnostic numbers rendered into the tip prompt
///
/// Every field is pre-formatted text so the prompt reads naturally
/// ("56,7%", "nenhuma dívida cadastrada", ...).
#[derive(Debug, Clone, Default)]
pub struct DiagnosticFacts {
    /// Income commitment, e.g. "56.7%"
    pub commitment: String,
    /// Debt-to-annual-income ratio, e.g. "12.4%"
    pub debt_ratio: String,
    /// Health classification label in Portuguese
    pub classification: String,
    /// One line summarizing registered debts
    pub debts_line: String,
    /// One line summarizing the emergency reserve
    pub reserve_line: String,
}

/// Trait defining the interface for all advisor backends
#[async_trait]
pub trait AdvisorBackend: Send + Sync {
    /// Advise on a user's stated concern, grounded in their numbers
    async fn financial_advice(&self, name: &str, concern: &str, facts: &str) -> Result<String>;

    /// One short practical tip from the diagnostic
    async fn personalized_tip(&self, facts: &DiagnosticFacts) -> Result<String>;

    /// Roleplay script for negotiating a late debt with a creditor
    async fn negotiation_script(
        &self,
        name: &str,
        creditor: &str,
        amount: f64,
        days_late: u32,
    ) -> Result<String>;

    /// Plain-language explanation of a financial term
    async fn explain_term(&self, term: &str) -> Result<String>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;
}

/// Concrete advisor client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AdvisorClient {
    /// Google Gemini backend (HTTP API)
    Gemini(GeminiBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AdvisorClient {
    /// Create an advisor client from environment variables
    ///
    /// Checks `ADVISOR_BACKEND` to determine which backend to use:
    /// - `gemini` (default): requires GOOGLE_API_KEY, honors GEMINI_MODEL
    /// - `mock`: canned responses for testing
    ///
    /// Returns None if the required environment variables are not set.
    pub fn from_env() -> Option<Self> {
        let backend = std::env::var("ADVISOR_BACKEND").unwrap_or_else(|_| "gemini".to_string());

        match backend.to_lowercase().as_str() {
            "gemini" => GeminiBackend::from_env().map(AdvisorClient::Gemini),
            "mock" => Some(AdvisorClient::Mock(MockBackend::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown ADVISOR_BACKEND, falling back to gemini");
                GeminiBackend::from_env().map(AdvisorClient::Gemini)
            }
        }
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AdvisorClient::Mock(MockBackend::new())
    }
}

#[async_trait]
impl AdvisorBackend for AdvisorClient {
    async fn financial_advice(&self, name: &str, concern: &str, facts: &str) -> Result<String> {
        match self {
            AdvisorClient::Gemini(b) => b.financial_advice(name, concern, facts).await,
            AdvisorClient::Mock(b) => b.financial_advice(name, concern, facts).await,
        }
    }

    async fn personalized_tip(&self, facts: &DiagnosticFacts) -> Result<String> {
        match self {
            AdvisorClient::Gemini(b) => b.personalized_tip(facts).await,
            AdvisorClient::Mock(b) => b.personalized_tip(facts).await,
        }
    }

    async fn negotiation_script(
        &self,
        name: &str,
        creditor: &str,
        amount: f64,
        days_late: u32,
    ) -> Result<String> {
        match self {
            AdvisorClient::Gemini(b) => b.negotiation_script(name, creditor, amount, days_late).await,
            AdvisorClient::Mock(b) => b.negotiation_script(name, creditor, amount, days_late).await,
        }
    }

    async fn explain_term(&self, term: &str) -> Result<String> {
        match self {
            AdvisorClient::Gemini(b) => b.explain_term(term).await,
            AdvisorClient::Mock(b) => b.explain_term(term).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AdvisorClient::Gemini(b) => b.health_check().await,
            AdvisorClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AdvisorClient::Gemini(b) => b.model(),
            AdvisorClient::Mock(b) => b.model(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_client_model() {
        let client = AdvisorClient::mock();
        assert_eq!(client.model(), "mock");
    }

    #[tokio::test]
    async fn mock_health_check() {
        let client = AdvisorClient::mock();
        assert!(client.health_check().await);
    }

    #[tokio::test]
    async fn mock_advice_mentions_user() {
        let client = AdvisorClient::mock();
        let advice = client
            .financial_advice("Maria", "Cartão de crédito", "renda: R$ 3000")
            .await
            .unwrap();
        assert!(advice.contains("Maria"));
    }
}
