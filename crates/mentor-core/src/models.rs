//! Domain models for Mentor
//!
//! Financial records are typed structs validated at construction. Money and
//! percentage fields reject NaN/infinite/negative values with an
//! `Error::InvalidData` that the view layer surfaces inline.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Validate a money or percentage field: finite and non-negative
fn validate_non_negative(field: &str, value: f64) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidData(format!(
            "{} deve ser um número não-negativo",
            field
        )));
    }
    Ok(value)
}

/// A debt registered by the user
///
/// Monthly payment and interest rate are independent inputs and may be
/// economically inconsistent (payment below interest accrual). That condition
/// is detected by the payoff simulator, never rejected here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debt {
    /// Outstanding principal (R$)
    pub principal: f64,
    /// Fixed monthly payment (R$)
    pub monthly_payment: f64,
    /// Monthly interest rate as a percentage (e.g. 3.5 for 3.5% a.m.)
    pub monthly_rate_pct: f64,
    /// Remaining installment count, when known
    pub installments: Option<u32>,
    /// Day of month the payment is due (1-31)
    pub due_day: Option<u32>,
}

impl Debt {
    pub fn new(
        principal: f64,
        monthly_payment: f64,
        monthly_rate_pct: f64,
        installments: Option<u32>,
        due_day: Option<u32>,
    ) -> Result<Self> {
        let principal = validate_non_negative("valor total", principal)?;
        let monthly_payment = validate_non_negative("parcela mensal", monthly_payment)?;
        let monthly_rate_pct = validate_non_negative("taxa de juros", monthly_rate_pct)?;
        if let Some(day) = due_day {
            if !(1..=31).contains(&day) {
                return Err(Error::InvalidData(
                    "dia de vencimento deve estar entre 1 e 31".to_string(),
                ));
            }
        }
        Ok(Self {
            principal,
            monthly_payment,
            monthly_rate_pct,
            installments,
            due_day,
        })
    }

    /// Monthly rate as a fraction (3.5% -> 0.035)
    pub fn monthly_rate(&self) -> f64 {
        self.monthly_rate_pct / 100.0
    }
}

/// Priority of a financial goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalPriority {
    High,
    Medium,
    Low,
}

impl GoalPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Display label in Brazilian Portuguese
    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "Alta",
            Self::Medium => "Média",
            Self::Low => "Baixa",
        }
    }
}

impl std::str::FromStr for GoalPriority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" | "alta" => Ok(Self::High),
            "medium" | "média" | "media" => Ok(Self::Medium),
            "low" | "baixa" => Ok(Self::Low),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

impl std::fmt::Display for GoalPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A savings goal, immutable once created except for deletion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    /// Amount needed (R$)
    pub target_amount: f64,
    /// Term in months (>= 1)
    pub term_months: u32,
    pub priority: GoalPriority,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    pub fn new(target_amount: f64, term_months: u32, priority: GoalPriority) -> Result<Self> {
        let target_amount = validate_non_negative("valor da meta", target_amount)?;
        if target_amount <= 0.0 {
            return Err(Error::InvalidData(
                "valor da meta deve ser maior que zero".to_string(),
            ));
        }
        if term_months < 1 {
            return Err(Error::InvalidData(
                "prazo deve ser de pelo menos 1 mês".to_string(),
            ));
        }
        Ok(Self {
            target_amount,
            term_months,
            priority,
            created_at: Utc::now(),
        })
    }

    /// Required monthly saving to hit the goal within its term
    pub fn monthly_saving(&self) -> f64 {
        self.target_amount / self.term_months as f64
    }
}

/// Whether an expense is fixed or variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseKind {
    Fixed,
    Variable,
}

impl ExpenseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Variable => "variable",
        }
    }
}

impl std::str::FromStr for ExpenseKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fixed" | "fixa" => Ok(Self::Fixed),
            "variable" | "variável" | "variavel" => Ok(Self::Variable),
            _ => Err(format!("Unknown expense kind: {}", s)),
        }
    }
}

impl std::fmt::Display for ExpenseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// In-memory financial record of one user session
///
/// Mutated only through explicit add/remove operations; destroyed with the
/// session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinancialProfile {
    /// Monthly income (R$); `None` until the diagnostic intake sets it
    pub monthly_income: Option<f64>,
    /// Emergency reserve balance (R$)
    pub emergency_reserve: f64,
    /// Extra income sources (freelance, rent, ...)
    pub extra_income: BTreeMap<String, f64>,
    pub fixed_expenses: BTreeMap<String, f64>,
    pub variable_expenses: BTreeMap<String, f64>,
    pub debts: BTreeMap<String, Debt>,
    pub goals: BTreeMap<String, Goal>,
}

impl FinancialProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_income(&mut self, monthly_income: f64, emergency_reserve: f64) -> Result<()> {
        self.monthly_income = Some(validate_non_negative("renda mensal", monthly_income)?);
        self.emergency_reserve = validate_non_negative("reserva de emergência", emergency_reserve)?;
        Ok(())
    }

    pub fn add_extra_income(&mut self, source: &str, amount: f64) -> Result<()> {
        let amount = validate_non_negative("valor da renda extra", amount)?;
        if source.trim().is_empty() {
            return Err(Error::InvalidData(
                "descrição da fonte de renda é obrigatória".to_string(),
            ));
        }
        self.extra_income.insert(source.trim().to_string(), amount);
        Ok(())
    }

    pub fn add_expense(&mut self, kind: ExpenseKind, label: &str, amount: f64) -> Result<()> {
        let amount = validate_non_negative("valor da despesa", amount)?;
        if label.trim().is_empty() {
            return Err(Error::InvalidData(
                "categoria da despesa é obrigatória".to_string(),
            ));
        }
        let target = match kind {
            ExpenseKind::Fixed => &mut self.fixed_expenses,
            ExpenseKind::Variable => &mut self.variable_expenses,
        };
        target.insert(label.trim().to_string(), amount);
        Ok(())
    }

    pub fn remove_expense(&mut self, kind: ExpenseKind, label: &str) -> Result<()> {
        let target = match kind {
            ExpenseKind::Fixed => &mut self.fixed_expenses,
            ExpenseKind::Variable => &mut self.variable_expenses,
        };
        target
            .remove(label)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound(format!("despesa '{}'", label)))
    }

    pub fn clear_expenses(&mut self) {
        self.fixed_expenses.clear();
        self.variable_expenses.clear();
    }

    pub fn add_debt(&mut self, name: &str, debt: Debt) -> Result<()> {
        if name.trim().is_empty() {
            return Err(Error::InvalidData(
                "nome da dívida é obrigatório".to_string(),
            ));
        }
        self.debts.insert(name.trim().to_string(), debt);
        Ok(())
    }

    pub fn remove_debt(&mut self, name: &str) -> Result<()> {
        self.debts
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound(format!("dívida '{}'", name)))
    }

    pub fn add_goal(&mut self, name: &str, goal: Goal) -> Result<()> {
        if name.trim().is_empty() {
            return Err(Error::InvalidData("nome da meta é obrigatório".to_string()));
        }
        self.goals.insert(name.trim().to_string(), goal);
        Ok(())
    }

    pub fn remove_goal(&mut self, name: &str) -> Result<()> {
        self.goals
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound(format!("meta '{}'", name)))
    }

    pub fn total_fixed_expenses(&self) -> f64 {
        self.fixed_expenses.values().sum()
    }

    pub fn total_variable_expenses(&self) -> f64 {
        self.variable_expenses.values().sum()
    }

    /// Sum of monthly debt payments across all debts
    pub fn total_debt_service(&self) -> f64 {
        self.debts.values().map(|d| d.monthly_payment).sum()
    }

    /// Fixed + variable + debt service
    pub fn total_expenses(&self) -> f64 {
        self.total_fixed_expenses() + self.total_variable_expenses() + self.total_debt_service()
    }

    pub fn total_debt_principal(&self) -> f64 {
        self.debts.values().map(|d| d.principal).sum()
    }

    /// Income is considered informed when set and positive
    pub fn has_income(&self) -> bool {
        matches!(self.monthly_income, Some(income) if income > 0.0)
    }
}

/// Categorical financial-health classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthClass {
    /// Income unset or non-positive; no score can be computed
    Unavailable,
    Critical,
    Concerning,
    Regular,
    Good,
    Excellent,
}

impl HealthClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unavailable => "unavailable",
            Self::Critical => "critical",
            Self::Concerning => "concerning",
            Self::Regular => "regular",
            Self::Good => "good",
            Self::Excellent => "excellent",
        }
    }

    /// Display label in Brazilian Portuguese
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unavailable => "Não disponível",
            Self::Critical => "Crítica",
            Self::Concerning => "Preocupante",
            Self::Regular => "Regular",
            Self::Good => "Boa",
            Self::Excellent => "Excelente",
        }
    }
}

impl std::fmt::Display for HealthClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Derived financial-health indicators, recomputed on demand
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthSnapshot {
    /// Share of monthly income consumed by all expenses (%)
    pub income_commitment_pct: f64,
    /// Total debt principal over annual income (%)
    pub annual_debt_ratio_pct: f64,
    /// Emergency reserve expressed in months of total expenses
    pub reserve_months: f64,
    /// Bounded score in [0, 100]
    pub score: u8,
    pub class: HealthClass,
}

impl HealthSnapshot {
    /// Snapshot for a profile without usable income
    pub fn unavailable() -> Self {
        Self {
            income_commitment_pct: 0.0,
            annual_debt_ratio_pct: 0.0,
            reserve_months: 0.0,
            score: 0,
            class: HealthClass::Unavailable,
        }
    }
}

/// Months-to-payoff of a debt, or structurally impossible
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "months", rename_all = "lowercase")]
pub enum PayoffHorizon {
    Months(u32),
    /// The fixed payment does not exceed monthly interest accrual; payoff
    /// never happens. A first-class outcome, not an error.
    Unbounded,
}

impl PayoffHorizon {
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Self::Unbounded)
    }

    pub fn months(&self) -> Option<u32> {
        match self {
            Self::Months(m) => Some(*m),
            Self::Unbounded => None,
        }
    }

    /// Merge two horizons: the later one wins, unbounded dominates
    pub fn max(self, other: Self) -> Self {
        match (self, other) {
            (Self::Unbounded, _) | (_, Self::Unbounded) => Self::Unbounded,
            (Self::Months(a), Self::Months(b)) => Self::Months(a.max(b)),
        }
    }
}

impl std::fmt::Display for PayoffHorizon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unbounded => write!(f, "Nunca (parcela menor que os juros)"),
            Self::Months(m) if *m >= 12 => {
                write!(f, "{} anos e {} meses", m / 12, m % 12)
            }
            Self::Months(m) => write!(f, "{} meses", m),
        }
    }
}

/// Outcome of simulating one debt to payoff
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoffResult {
    pub horizon: PayoffHorizon,
    /// Total amount paid until payoff (or until divergence was detected)
    pub total_paid: f64,
    /// Total interest accrued over the simulation
    pub total_interest: f64,
}

/// Aggregate payoff picture across an entire debt portfolio
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioPayoff {
    /// Per-debt results keyed by debt name
    pub debts: BTreeMap<String, PayoffResult>,
    pub total_principal: f64,
    pub total_interest: f64,
    /// Max of per-debt horizons; unbounded if any debt is unbounded
    pub horizon: PayoffHorizon,
}

impl PortfolioPayoff {
    pub fn empty() -> Self {
        Self {
            debts: BTreeMap::new(),
            total_principal: 0.0,
            total_interest: 0.0,
            horizon: PayoffHorizon::Months(0),
        }
    }
}

/// One advice exchange kept in the session history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdviceRecord {
    pub at: DateTime<Utc>,
    pub concern: String,
    pub advice: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debt_rejects_negative_principal() {
        assert!(Debt::new(-100.0, 50.0, 2.0, None, None).is_err());
    }

    #[test]
    fn debt_rejects_nan_payment() {
        assert!(Debt::new(100.0, f64::NAN, 2.0, None, None).is_err());
    }

    #[test]
    fn debt_rejects_bad_due_day() {
        assert!(Debt::new(100.0, 50.0, 2.0, None, Some(32)).is_err());
        assert!(Debt::new(100.0, 50.0, 2.0, None, Some(0)).is_err());
        assert!(Debt::new(100.0, 50.0, 2.0, None, Some(15)).is_ok());
    }

    #[test]
    fn debt_allows_payment_below_interest() {
        // Economically inconsistent input is accepted; the simulator flags it
        let debt = Debt::new(1000.0, 10.0, 5.0, None, None).unwrap();
        assert!(debt.monthly_payment < debt.principal * debt.monthly_rate());
    }

    #[test]
    fn goal_monthly_saving() {
        let goal = Goal::new(1200.0, 12, GoalPriority::High).unwrap();
        assert!((goal.monthly_saving() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn goal_rejects_zero_target() {
        assert!(Goal::new(0.0, 12, GoalPriority::Low).is_err());
    }

    #[test]
    fn goal_rejects_zero_term() {
        assert!(Goal::new(100.0, 0, GoalPriority::Low).is_err());
    }

    #[test]
    fn profile_totals() {
        let mut profile = FinancialProfile::new();
        profile.set_income(3000.0, 0.0).unwrap();
        profile
            .add_expense(ExpenseKind::Fixed, "Aluguel", 1000.0)
            .unwrap();
        profile
            .add_expense(ExpenseKind::Variable, "Lazer", 500.0)
            .unwrap();
        profile
            .add_debt(
                "Cartão",
                Debt::new(2000.0, 200.0, 2.0, None, None).unwrap(),
            )
            .unwrap();

        assert!((profile.total_expenses() - 1700.0).abs() < 1e-9);
        assert!((profile.total_debt_principal() - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn remove_missing_debt_is_not_found() {
        let mut profile = FinancialProfile::new();
        assert!(matches!(
            profile.remove_debt("inexistente"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn expense_kind_parses_portuguese() {
        assert_eq!("fixa".parse::<ExpenseKind>().unwrap(), ExpenseKind::Fixed);
        assert_eq!(
            "variável".parse::<ExpenseKind>().unwrap(),
            ExpenseKind::Variable
        );
    }

    #[test]
    fn horizon_display() {
        assert_eq!(PayoffHorizon::Months(5).to_string(), "5 meses");
        assert_eq!(PayoffHorizon::Months(26).to_string(), "2 anos e 2 meses");
        assert_eq!(
            PayoffHorizon::Unbounded.to_string(),
            "Nunca (parcela menor que os juros)"
        );
    }

    #[test]
    fn horizon_max_unbounded_dominates() {
        assert!(PayoffHorizon::Months(600)
            .max(PayoffHorizon::Unbounded)
            .is_unbounded());
        assert_eq!(
            PayoffHorizon::Months(3).max(PayoffHorizon::Months(7)),
            PayoffHorizon::Months(7)
        );
    }
}
