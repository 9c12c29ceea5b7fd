//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use mentor_core::{Debt, ExpenseKind, FinancialProfile, UserProgress, PROGRESS_SUFFIX};

use crate::commands;

fn reference_profile() -> FinancialProfile {
    let mut profile = FinancialProfile::new();
    profile.set_income(3000.0, 1500.0).unwrap();
    profile
        .add_expense(ExpenseKind::Fixed, "Aluguel", 1000.0)
        .unwrap();
    profile
        .add_expense(ExpenseKind::Variable, "Mercado", 500.0)
        .unwrap();
    profile
        .add_debt(
            "Cartão",
            Debt::new(2000.0, 200.0, 2.0, None, None).unwrap(),
        )
        .unwrap();
    profile
}

// ========== Diagnose Command Tests ==========

#[test]
fn test_cmd_diagnose_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("perfil.json");
    let profile = reference_profile();
    std::fs::write(&path, serde_json::to_string_pretty(&profile).unwrap()).unwrap();

    let result = commands::cmd_diagnose(&path);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_diagnose_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = commands::cmd_diagnose(&dir.path().join("nope.json"));
    assert!(result.is_err());
}

#[test]
fn test_cmd_diagnose_invalid_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("perfil.json");
    std::fs::write(&path, "{ not json").unwrap();

    let result = commands::cmd_diagnose(&path);
    assert!(result.is_err());
}

#[test]
fn test_print_diagnosis_without_income() {
    // No income means no score; must not panic
    commands::print_diagnosis(&FinancialProfile::new());
}

#[test]
fn test_print_diagnosis_without_debts() {
    let mut profile = FinancialProfile::new();
    profile.set_income(3000.0, 0.0).unwrap();
    commands::print_diagnosis(&profile);
}

// ========== Progress Command Tests ==========

#[test]
fn test_cmd_progress_lists_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut progress = UserProgress::new("Marina");
    progress.contador_consultas = 3;
    progress.save(dir.path()).unwrap();
    assert!(dir
        .path()
        .join(format!("Marina{}", PROGRESS_SUFFIX))
        .exists());

    assert!(commands::cmd_progress(dir.path(), None).is_ok());
    assert!(commands::cmd_progress(dir.path(), Some("Marina")).is_ok());
    assert!(commands::cmd_progress(dir.path(), Some("Otávio")).is_ok());
}

#[test]
fn test_cmd_progress_missing_dir() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nao_existe");
    assert!(commands::cmd_progress(&missing, None).is_ok());
}

// ========== Prompts Command Tests ==========

#[test]
fn test_cmd_prompts_list() {
    assert!(commands::cmd_prompts_list().is_ok());
}

#[test]
fn test_cmd_prompts_show_known() {
    assert!(commands::cmd_prompts_show("financial_advice").is_ok());
}

#[test]
fn test_cmd_prompts_show_unknown() {
    // Unknown IDs print the available list instead of failing
    assert!(commands::cmd_prompts_show("does_not_exist").is_ok());
}

#[test]
fn test_cmd_prompts_path() {
    assert!(commands::cmd_prompts_path().is_ok());
}
