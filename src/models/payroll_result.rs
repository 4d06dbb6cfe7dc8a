//! Payroll result models for the Payroll Deduction Engine.
//!
//! This module contains the [`PayrollResult`] type and its associated
//! structures that capture all outputs of a payroll computation, including
//! the contribution breakdown, totals, and the audit trace.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::MonthlyIncome;

/// The three statutory contributions deducted from a monthly income.
///
/// # Example
///
/// ```
/// use payroll_engine::models::Contributions;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let contributions = Contributions {
///     social_security: Decimal::from_str("900.00").unwrap(),
///     health_insurance: Decimal::from_str("400.00").unwrap(),
///     housing_fund: Decimal::from_str("100").unwrap(),
/// };
/// assert_eq!(contributions.total(), Decimal::from_str("1400").unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributions {
    /// Social-security (SSS) employee share.
    pub social_security: Decimal,
    /// Health-insurance (PhilHealth) employee share.
    pub health_insurance: Decimal,
    /// Housing-fund (Pag-IBIG) employee share.
    pub housing_fund: Decimal,
}

impl Contributions {
    /// Returns the sum of the three contributions.
    pub fn total(&self) -> Decimal {
        self.social_security + self.health_insurance + self.housing_fund
    }
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The statute the rule comes from.
    pub legal_basis: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag conditions that don't prevent calculation but may require
/// attention, such as contributions exceeding the income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a computation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// The complete result of a payroll computation.
///
/// A `PayrollResult` holds no timestamps or generated identifiers: computing
/// the same income under the same schedule always yields an equal value.
///
/// The totals always satisfy:
/// - `total_deductions == total_contributions + tax`
/// - `net_pay == monthly_income - total_deductions`
/// - `net_pay_after_tax == monthly_income - tax`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollResult {
    /// The version key of the schedule the result was computed under.
    pub schedule_version: String,
    /// The version of the engine that performed the computation.
    pub engine_version: String,
    /// The gross monthly income.
    pub monthly_income: MonthlyIncome,
    /// The individual contributions.
    pub contributions: Contributions,
    /// Sum of the contributions.
    pub total_contributions: Decimal,
    /// Monthly income less total contributions; negative when contributions
    /// exceed the income.
    pub taxable_income: Decimal,
    /// Withholding tax on the taxable income.
    pub tax: Decimal,
    /// Total contributions plus tax.
    pub total_deductions: Decimal,
    /// Monthly income less tax only.
    pub net_pay_after_tax: Decimal,
    /// Monthly income less all deductions.
    pub net_pay: Decimal,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

impl PayrollResult {
    /// Returns true if the contributions exceeded the monthly income.
    pub fn is_degenerate(&self) -> bool {
        self.taxable_income < Decimal::ZERO
    }
}
