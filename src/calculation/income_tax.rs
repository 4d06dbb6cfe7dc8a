//! Progressive income tax calculation.
//!
//! The tax on a taxable income `x` is `base_i + (x - b_i) * r_i`, where
//! bracket `i` is the one with the greatest lower bound `b_i <= x`. Each
//! bracket's base already includes the tax owed on every bracket below it,
//! so evaluation never sums lower brackets at call time.

use rust_decimal::Decimal;

use crate::config::TaxSchedule;
use crate::models::AuditStep;

use super::rounding::round_centavos;

/// The result of a tax calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct IncomeTaxResult {
    /// The tax owed, rounded to centavos. Never negative.
    pub tax: Decimal,
    /// The lower bound of the bracket that applied, or `None` when the
    /// taxable income was zero or negative.
    pub bracket_lower_bound: Option<Decimal>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the tax on a taxable income under `schedule`.
///
/// A taxable income of zero or less owes no tax.
///
/// # Arguments
///
/// * `taxable_income` - Monthly income less contributions; may be negative
/// * `schedule` - The bracket schedule to evaluate
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_income_tax;
/// use payroll_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let loader = ConfigLoader::builtin().unwrap();
/// let schedule = &loader.get_schedule("2023").unwrap().income_tax;
///
/// let result = calculate_income_tax(Decimal::from(96950), schedule, 4);
/// assert_eq!(result.tax, Decimal::from_str("16112.55").unwrap());
/// ```
pub fn calculate_income_tax(
    taxable_income: Decimal,
    schedule: &TaxSchedule,
    step_number: u32,
) -> IncomeTaxResult {
    if taxable_income <= Decimal::ZERO {
        let audit_step = AuditStep {
            step_number,
            rule_id: "income_tax".to_string(),
            rule_name: "Income Tax Withholding".to_string(),
            legal_basis: schedule.legal_basis().to_string(),
            input: serde_json::json!({
                "taxable_income": taxable_income.to_string()
            }),
            output: serde_json::json!({
                "tax": "0.00",
                "bracket_lower_bound": null
            }),
            reasoning: format!(
                "Taxable income ₱{} is not positive; no tax is due",
                taxable_income.normalize()
            ),
        };

        return IncomeTaxResult {
            tax: Decimal::new(0, 2),
            bracket_lower_bound: None,
            audit_step,
        };
    }

    let bracket = schedule.bracket_for(taxable_income);
    let excess = taxable_income - bracket.lower_bound;
    let tax = round_centavos(bracket.base_tax + excess * bracket.rate);

    let audit_step = AuditStep {
        step_number,
        rule_id: "income_tax".to_string(),
        rule_name: "Income Tax Withholding".to_string(),
        legal_basis: schedule.legal_basis().to_string(),
        input: serde_json::json!({
            "taxable_income": taxable_income.to_string()
        }),
        output: serde_json::json!({
            "tax": tax.to_string(),
            "bracket_lower_bound": bracket.lower_bound.normalize().to_string(),
            "base_tax": bracket.base_tax.normalize().to_string(),
            "marginal_rate": bracket.rate.normalize().to_string()
        }),
        reasoning: format!(
            "₱{} + (₱{} - ₱{}) × {} = ₱{}",
            bracket.base_tax.normalize(),
            taxable_income.normalize(),
            bracket.lower_bound.normalize(),
            bracket.rate.normalize(),
            tax
        ),
    };

    IncomeTaxResult {
        tax,
        bracket_lower_bound: Some(bracket.lower_bound),
        audit_step,
    }
}
