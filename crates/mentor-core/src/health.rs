//! Financial-health scorer
//!
//! Pure derivation of a `HealthSnapshot` from a `FinancialProfile`. Fails
//! soft: a profile without usable income yields a zeroed snapshot classified
//! `Unavailable`, never an error.

use crate::models::{FinancialProfile, HealthClass, HealthSnapshot};

/// Score penalty/bonus thresholds (percentages and months)
const COMMITMENT_SEVERE: f64 = 80.0;
const COMMITMENT_HIGH: f64 = 60.0;
const COMMITMENT_MODERATE: f64 = 40.0;
const DEBT_RATIO_SEVERE: f64 = 50.0;
const DEBT_RATIO_HIGH: f64 = 30.0;
const DEBT_RATIO_MODERATE: f64 = 15.0;
const RESERVE_COMFORTABLE_MONTHS: f64 = 6.0;
const RESERVE_ADEQUATE_MONTHS: f64 = 3.0;
const RESERVE_THIN_MONTHS: f64 = 1.0;

/// Compute the financial-health snapshot for a profile
pub fn health_snapshot(profile: &FinancialProfile) -> HealthSnapshot {
    if !profile.has_income() {
        return HealthSnapshot::unavailable();
    }
    // has_income guarantees a positive value
    let income = profile.monthly_income.unwrap_or_default();

    let total_expenses = profile.total_expenses();
    let income_commitment_pct = total_expenses / income * 100.0;
    let annual_debt_ratio_pct = profile.total_debt_principal() / (income * 12.0) * 100.0;
    let reserve_months = if total_expenses > 0.0 {
        profile.emergency_reserve / total_expenses
    } else {
        0.0
    };

    let mut score: i32 = 100;

    // Highest threshold wins within each tier
    if income_commitment_pct > COMMITMENT_SEVERE {
        score -= 40;
    } else if income_commitment_pct > COMMITMENT_HIGH {
        score -= 25;
    } else if income_commitment_pct > COMMITMENT_MODERATE {
        score -= 10;
    }

    if annual_debt_ratio_pct > DEBT_RATIO_SEVERE {
        score -= 30;
    } else if annual_debt_ratio_pct > DEBT_RATIO_HIGH {
        score -= 20;
    } else if annual_debt_ratio_pct > DEBT_RATIO_MODERATE {
        score -= 10;
    }

    if reserve_months >= RESERVE_COMFORTABLE_MONTHS {
        score += 20;
    } else if reserve_months >= RESERVE_ADEQUATE_MONTHS {
        score += 10;
    } else if reserve_months < RESERVE_THIN_MONTHS {
        score -= 20;
    }

    let score = score.clamp(0, 100) as u8;

    let class = match score {
        80..=100 => HealthClass::Excellent,
        60..=79 => HealthClass::Good,
        40..=59 => HealthClass::Regular,
        20..=39 => HealthClass::Concerning,
        _ => HealthClass::Critical,
    };

    HealthSnapshot {
        income_commitment_pct,
        annual_debt_ratio_pct,
        reserve_months,
        score,
        class,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Debt, ExpenseKind};

    fn profile_with(
        income: Option<f64>,
        reserve: f64,
        fixed: f64,
        variable: f64,
        debts: &[(f64, f64, f64)],
    ) -> FinancialProfile {
        let mut profile = FinancialProfile::new();
        if let Some(income) = income {
            profile.set_income(income, reserve).unwrap();
        }
        if fixed > 0.0 {
            profile
                .add_expense(ExpenseKind::Fixed, "Fixas", fixed)
                .unwrap();
        }
        if variable > 0.0 {
            profile
                .add_expense(ExpenseKind::Variable, "Variáveis", variable)
                .unwrap();
        }
        for (i, (principal, payment, rate)) in debts.iter().enumerate() {
            profile
                .add_debt(
                    &format!("Dívida {}", i),
                    Debt::new(*principal, *payment, *rate, None, None).unwrap(),
                )
                .unwrap();
        }
        profile
    }

    #[test]
    fn no_income_is_unavailable() {
        let profile = profile_with(None, 0.0, 1000.0, 500.0, &[(2000.0, 200.0, 2.0)]);
        let snapshot = health_snapshot(&profile);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.class, HealthClass::Unavailable);
        assert_eq!(snapshot.income_commitment_pct, 0.0);
    }

    #[test]
    fn zero_income_is_unavailable() {
        let profile = profile_with(Some(0.0), 500.0, 1000.0, 0.0, &[]);
        assert_eq!(health_snapshot(&profile).class, HealthClass::Unavailable);
    }

    #[test]
    fn reference_scenario() {
        // income=3000, fixed=1000, variable=500, one debt 2000 @ 2% pay 200
        let profile = profile_with(Some(3000.0), 0.0, 1000.0, 500.0, &[(2000.0, 200.0, 2.0)]);
        let snapshot = health_snapshot(&profile);

        assert!((snapshot.income_commitment_pct - 1700.0 / 3000.0 * 100.0).abs() < 1e-9);
        // debt ratio 2000 / 36000 = 5.6% -> no penalty; commitment 56.7% -> -10;
        // no reserve -> -20
        assert_eq!(snapshot.score, 70);
        assert_eq!(snapshot.class, HealthClass::Good);
    }

    #[test]
    fn all_penalty_tiers_stack_to_the_floor() {
        let profile = profile_with(
            Some(1000.0),
            0.0,
            2000.0,
            0.0,
            &[(100_000.0, 100.0, 10.0)],
        );
        let snapshot = health_snapshot(&profile);
        // 100 - 40 (commitment) - 30 (debt) - 20 (reserve)
        assert_eq!(snapshot.score, 10);
        assert_eq!(snapshot.class, HealthClass::Critical);
    }

    #[test]
    fn zero_expenses_mean_zero_reserve_months() {
        // reserve_months is defined as 0 when there are no expenses, so the
        // below-one-month penalty applies even with a large reserve
        let profile = profile_with(Some(5000.0), 30_000.0, 0.0, 0.0, &[]);
        let snapshot = health_snapshot(&profile);
        assert_eq!(snapshot.reserve_months, 0.0);
        assert_eq!(snapshot.score, 80);
    }

    #[test]
    fn score_non_increasing_in_commitment() {
        let mut last = 101;
        for fixed in [100.0, 1300.0, 1900.0, 2500.0] {
            let profile = profile_with(Some(3000.0), 10_000.0, fixed, 0.0, &[]);
            let score = health_snapshot(&profile).score as i32;
            assert!(score <= last, "commitment {} raised the score", fixed);
            last = score;
        }
    }

    #[test]
    fn score_non_increasing_in_debt_ratio() {
        let mut last = 101;
        for principal in [1000.0, 8000.0, 15000.0, 25000.0] {
            let profile = profile_with(Some(3000.0), 10_000.0, 500.0, 0.0, &[(principal, 0.0, 0.0)]);
            let score = health_snapshot(&profile).score as i32;
            assert!(score <= last, "principal {} raised the score", principal);
            last = score;
        }
    }

    #[test]
    fn score_non_decreasing_in_reserve() {
        let mut last = -1;
        for reserve in [0.0, 1500.0, 4000.0, 9000.0] {
            let profile = profile_with(Some(3000.0), reserve, 1000.0, 0.0, &[]);
            let score = health_snapshot(&profile).score as i32;
            assert!(score >= last, "reserve {} lowered the score", reserve);
            last = score;
        }
    }

    #[test]
    fn classification_bands() {
        // Commitment between 60 and 80 with modest debt lands in Regular
        let profile = profile_with(Some(3000.0), 0.0, 2000.0, 100.0, &[(15_000.0, 0.0, 0.0)]);
        let snapshot = health_snapshot(&profile);
        // -25 (commitment 70%) -20 (debt 41.7%) -20 (no reserve) = 35
        assert_eq!(snapshot.score, 35);
        assert_eq!(snapshot.class, HealthClass::Concerning);
    }
}
