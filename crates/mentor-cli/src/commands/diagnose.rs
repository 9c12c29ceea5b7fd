//! Offline diagnostic command
//!
//! Reads a saved profile JSON (the same shape the server keeps in a
//! session) and prints the full diagnostic: health indicators, repayment
//! strategy, payoff projection and expense breakdown.

use std::path::Path;

use anyhow::{Context, Result};
use mentor_core::{
    expense_breakdown, health_snapshot, select_strategy, simulate_portfolio, FinancialProfile,
    HealthClass,
};

pub fn cmd_diagnose(file: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read profile file {}", file.display()))?;
    let profile: FinancialProfile =
        serde_json::from_str(&raw).context("Invalid profile JSON")?;

    print_diagnosis(&profile);
    Ok(())
}

pub fn print_diagnosis(profile: &FinancialProfile) {
    let health = health_snapshot(profile);

    println!("📊 Diagnóstico Financeiro\n");

    if health.class == HealthClass::Unavailable {
        println!("Renda mensal não informada; o diagnóstico não pode ser calculado.");
        println!("Adicione \"monthly_income\" ao arquivo de perfil e tente novamente.");
        return;
    }

    println!("Saúde financeira: {} (score {})", health.class.label(), health.score);
    println!(
        "  Comprometimento da renda: {:.1}%",
        health.income_commitment_pct
    );
    println!(
        "  Endividamento (dívida/renda anual): {:.1}%",
        health.annual_debt_ratio_pct
    );
    println!(
        "  Reserva de emergência: {:.1} meses de despesas",
        health.reserve_months
    );

    if profile.debts.is_empty() {
        println!("\nDívidas: nenhuma cadastrada 🎉");
    } else {
        let strategy = select_strategy(profile);
        let payoff = simulate_portfolio(profile);

        println!("\nEstratégia recomendada: {}", strategy.method.label());
        println!("  {}", strategy.rationale);
        if !strategy.order.is_empty() {
            println!("  Ordem sugerida de quitação:");
            for (i, name) in strategy.order.iter().enumerate() {
                println!("    {}. {}", i + 1, name);
            }
        }

        println!("\nProjeção de quitação: {}", payoff.horizon);
        println!("  Saldo devedor total: R$ {:.2}", payoff.total_principal);
        println!("  Juros projetados: R$ {:.2}", payoff.total_interest);
        println!(
            "\n{:<30} {:>12} {:>12}  {}",
            "DÍVIDA", "PAGO (R$)", "JUROS (R$)", "PRAZO"
        );
        println!("{}", "-".repeat(72));
        for (name, result) in &payoff.debts {
            println!(
                "{:<30} {:>12.2} {:>12.2}  {}",
                name, result.total_paid, result.total_interest, result.horizon
            );
        }
    }

    let slices = expense_breakdown(profile);
    if !slices.is_empty() {
        println!("\nDistribuição das despesas:");
        for slice in &slices {
            println!(
                "  {:<30} R$ {:>10.2}  ({:.1}%)",
                slice.label, slice.amount, slice.percent
            );
        }
    }
}
