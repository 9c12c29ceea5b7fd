//! Mock advisor backend for testing
//!
//! Returns deterministic Portuguese responses that echo enough of the
//! input to assert on.

use async_trait::async_trait;

use crate::error::Result;

use super::{AdvisorBackend, DiagnosticFacts};

/// Mock backend with canned responses
#[derive(Debug, Clone)]
pub struct MockBackend {
    healthy: bool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self { healthy: true }
    }

    /// A mock that reports itself as unreachable
    pub fn unhealthy() -> Self {
        Self { healthy: false }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AdvisorBackend for MockBackend {
    async fn financial_advice(&self, name: &str, concern: &str, _facts: &str) -> Result<String> {
        Ok(format!(
            "{}, sobre \"{}\": comece registrando todos os seus gastos por 30 dias e \
             priorize quitar a dívida com a maior taxa de juros.",
            name, concern
        ))
    }

    async fn personalized_tip(&self, facts: &DiagnosticFacts) -> Result<String> {
        Ok(format!(
            "Sua saúde financeira está classificada como {}. Separe um valor fixo todo \
             mês para a reserva de emergência antes de qualquer outro gasto.",
            facts.classification
        ))
    }

    async fn negotiation_script(
        &self,
        name: &str,
        creditor: &str,
        amount: f64,
        days_late: u32,
    ) -> Result<String> {
        Ok(format!(
            "Roteiro para {}: ligue para {} e proponha quitar R$ {:.2} ({} dias de atraso) \
             com desconto à vista ou parcelamento sem juros.",
            name, creditor, amount, days_late
        ))
    }

    async fn explain_term(&self, term: &str) -> Result<String> {
        Ok(format!(
            "\"{}\" é um termo financeiro. Em resumo: entenda sempre o custo total antes \
             de assinar qualquer contrato.",
            term
        ))
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn responses_echo_inputs() {
        let backend = MockBackend::new();
        let advice = backend
            .financial_advice("Ana", "juros do cartão", "")
            .await
            .unwrap();
        assert!(advice.contains("Ana"));
        assert!(advice.contains("juros do cartão"));

        let script = backend
            .negotiation_script("Ana", "Banco X", 1500.0, 45)
            .await
            .unwrap();
        assert!(script.contains("Banco X"));
        assert!(script.contains("1500.00"));
    }

    #[tokio::test]
    async fn unhealthy_mock_fails_health_check() {
        assert!(!MockBackend::unhealthy().health_check().await);
    }
}
