//! Expense breakdown for chart rendering
//!
//! Produces labeled slices the frontend can feed straight into a pie or
//! donut chart. Labels are prefixed with the expense category so that a
//! fixed and a variable expense with the same name stay distinct.

use serde::{Deserialize, Serialize};

use crate::models::FinancialProfile;

/// One slice of the expense breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSlice {
    pub label: String,
    pub amount: f64,
    /// Share of the total, in percent
    pub percent: f64,
}

/// Flatten a profile's outflows into chart slices, largest first
///
/// Includes fixed expenses, variable expenses and debt payments. Returns an
/// empty vector when there is nothing to plot.
pub fn expense_breakdown(profile: &FinancialProfile) -> Vec<ExpenseSlice> {
    let mut entries: Vec<(String, f64)> = Vec::new();

    for (name, amount) in &profile.fixed_expenses {
        entries.push((format!("Fixo: {}", name), *amount));
    }
    for (name, amount) in &profile.variable_expenses {
        entries.push((format!("Variável: {}", name), *amount));
    }
    for (name, debt) in &profile.debts {
        if debt.monthly_payment > 0.0 {
            entries.push((format!("Dívida: {}", name), debt.monthly_payment));
        }
    }

    let total: f64 = entries.iter().map(|(_, amount)| amount).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut slices: Vec<ExpenseSlice> = entries
        .into_iter()
        .map(|(label, amount)| ExpenseSlice {
            label,
            amount,
            percent: amount / total * 100.0,
        })
        .collect();

    slices.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    slices
}
