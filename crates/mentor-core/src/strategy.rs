//! Payoff strategy selector
//!
//! Rule-based choice between repayment orderings. A heuristic classifier, not
//! an optimizer: it never computes the actual interest saved by each method.

use serde::{Deserialize, Serialize};

use crate::models::FinancialProfile;

/// A debt whose monthly rate exceeds this is considered high-interest
pub const HIGH_RATE_THRESHOLD_PCT: f64 = 3.0;

/// Total principal above this pushes the portfolio toward avalanche
pub const LARGE_DEBT_THRESHOLD: f64 = 5000.0;

/// Repayment ordering method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayoffMethod {
    /// No debts registered
    None,
    /// Highest interest rate first
    Avalanche,
    /// Smallest balance first
    Snowball,
    /// One small debt first, then avalanche ordering
    Hybrid,
}

impl PayoffMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Avalanche => "avalanche",
            Self::Snowball => "snowball",
            Self::Hybrid => "hybrid",
        }
    }

    /// Display name in Brazilian Portuguese
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "Nenhum",
            Self::Avalanche => "Avalanche",
            Self::Snowball => "Bola de Neve",
            Self::Hybrid => "Híbrido",
        }
    }
}

impl std::fmt::Display for PayoffMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recommended repayment method with rationale and suggested ordering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyAdvice {
    pub method: PayoffMethod,
    /// User-facing explanation (pt-BR)
    pub rationale: String,
    /// Debt names in suggested repayment order
    pub order: Vec<String>,
}

/// Select a repayment strategy for the profile's debts
///
/// Pure and deterministic given profile contents. Rules are evaluated in
/// order: no debts, high-rate majority or large total principal, multiple
/// debts, single debt.
pub fn select_strategy(profile: &FinancialProfile) -> StrategyAdvice {
    let debt_count = profile.debts.len();

    if debt_count == 0 {
        return StrategyAdvice {
            method: PayoffMethod::None,
            rationale: "Não há dívidas cadastradas para análise.".to_string(),
            order: Vec::new(),
        };
    }

    let total_principal = profile.total_debt_principal();
    let high_rate_count = profile
        .debts
        .values()
        .filter(|d| d.monthly_rate_pct > HIGH_RATE_THRESHOLD_PCT)
        .count();

    if high_rate_count * 2 > debt_count || total_principal > LARGE_DEBT_THRESHOLD {
        return StrategyAdvice {
            method: PayoffMethod::Avalanche,
            rationale: "O método Avalanche consiste em pagar o mínimo em todas as dívidas e \
                        direcionar o valor extra para a dívida com a maior taxa de juros. Com \
                        juros altos ou um saldo devedor elevado, este método economiza mais \
                        dinheiro a longo prazo."
                .to_string(),
            order: order_by_rate_desc(profile),
        };
    }

    if debt_count > 1 {
        return StrategyAdvice {
            method: PayoffMethod::Snowball,
            rationale: "O método Bola de Neve consiste em pagar o mínimo em todas as dívidas e \
                        direcionar o valor extra para a dívida com o menor saldo devedor. As \
                        vitórias rápidas aumentam sua motivação para continuar."
                .to_string(),
            order: order_by_balance_asc(profile),
        };
    }

    StrategyAdvice {
        method: PayoffMethod::Hybrid,
        rationale: "Um método híbrido é recomendado: comece quitando uma dívida pequena para \
                    ganhar motivação, depois foque nas dívidas com juros mais altos para \
                    economizar dinheiro a longo prazo."
            .to_string(),
        order: order_hybrid(profile),
    }
}

/// Avalanche ordering: descending interest rate
fn order_by_rate_desc(profile: &FinancialProfile) -> Vec<String> {
    let mut debts: Vec<_> = profile.debts.iter().collect();
    debts.sort_by(|(_, a), (_, b)| {
        b.monthly_rate_pct
            .partial_cmp(&a.monthly_rate_pct)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    debts.into_iter().map(|(name, _)| name.clone()).collect()
}

/// Snowball ordering: ascending balance
fn order_by_balance_asc(profile: &FinancialProfile) -> Vec<String> {
    let mut debts: Vec<_> = profile.debts.iter().collect();
    debts.sort_by(|(_, a), (_, b)| {
        a.principal
            .partial_cmp(&b.principal)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    debts.into_iter().map(|(name, _)| name.clone()).collect()
}

/// Hybrid ordering: smallest balance first, remainder by descending rate
fn order_hybrid(profile: &FinancialProfile) -> Vec<String> {
    let mut order = order_by_balance_asc(profile);
    if order.len() > 1 {
        let first = order.remove(0);
        let mut rest: Vec<_> = profile
            .debts
            .iter()
            .filter(|(name, _)| **name != first)
            .collect();
        rest.sort_by(|(_, a), (_, b)| {
            b.monthly_rate_pct
                .partial_cmp(&a.monthly_rate_pct)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        order = std::iter::once(first)
            .chain(rest.into_iter().map(|(name, _)| name.clone()))
            .collect();
    }
    order
}
