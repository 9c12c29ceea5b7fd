//! Debt payoff simulator
//!
//! Monthly time-stepping amortization: interest accrues on the outstanding
//! balance before the payment is applied. A payment that does not exceed the
//! month's interest makes payoff structurally impossible and yields
//! `PayoffHorizon::Unbounded`, a first-class outcome.

use crate::models::{Debt, FinancialProfile, PayoffHorizon, PayoffResult, PortfolioPayoff};

/// Safety bound against runaway simulation: 600 months / 50 years
pub const PAYOFF_CAP_MONTHS: u32 = 600;

/// Balance below this is considered paid off
const CONVERGENCE_EPSILON: f64 = 0.01;

/// Simulate one debt to payoff
pub fn simulate_payoff(debt: &Debt) -> PayoffResult {
    // A zero payment can never amortize anything; don't iterate at all
    if debt.monthly_payment <= 0.0 && debt.principal > CONVERGENCE_EPSILON {
        return PayoffResult {
            horizon: PayoffHorizon::Unbounded,
            total_paid: 0.0,
            total_interest: 0.0,
        };
    }

    let rate = debt.monthly_rate();
    let mut balance = debt.principal;
    let mut month = 0u32;
    let mut total_paid = 0.0;
    let mut total_interest = 0.0;

    while balance > CONVERGENCE_EPSILON && month < PAYOFF_CAP_MONTHS {
        month += 1;

        let interest = balance * rate;
        total_interest += interest;

        if debt.monthly_payment - interest <= 0.0 {
            // Payment swallowed by interest: divergence, not an error
            return PayoffResult {
                horizon: PayoffHorizon::Unbounded,
                total_paid,
                total_interest,
            };
        }

        let payment = debt.monthly_payment.min(balance + interest);
        total_paid += payment;
        balance += interest - payment;
    }

    if balance > CONVERGENCE_EPSILON {
        // Hit the cap without converging
        return PayoffResult {
            horizon: PayoffHorizon::Unbounded,
            total_paid,
            total_interest,
        };
    }

    PayoffResult {
        horizon: PayoffHorizon::Months(month),
        total_paid,
        total_interest,
    }
}

/// Simulate every debt in the profile and aggregate
pub fn simulate_portfolio(profile: &FinancialProfile) -> PortfolioPayoff {
    let mut portfolio = PortfolioPayoff::empty();

    for (name, debt) in &profile.debts {
        let result = simulate_payoff(debt);

        portfolio.total_principal += debt.principal;
        portfolio.total_interest += result.total_interest;
        portfolio.horizon = portfolio.horizon.max(result.horizon);
        portfolio.debts.insert(name.clone(), result);
    }

    portfolio
}
