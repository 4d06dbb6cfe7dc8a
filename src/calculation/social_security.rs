//! Social-security (SSS) contribution calculation.
//!
//! The employee share is a fixed percentage of a monthly salary credit. The
//! credit is the income snapped to the nearest multiple of the schedule's
//! step (midpoints go up), clamped to the schedule's minimum and maximum.

use rust_decimal::Decimal;

use crate::config::SocialSecurityRule;
use crate::models::{AuditStep, MonthlyIncome};

use super::rounding::{round_centavos, snap_to_multiple};

/// How the monthly salary credit was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalaryCreditBasis {
    /// Income below the low threshold; the minimum credit applies.
    Minimum,
    /// Income at or above the high threshold; the maximum credit applies.
    Maximum,
    /// Income snapped to the nearest multiple of the step.
    Snapped,
}

impl SalaryCreditBasis {
    fn as_str(self) -> &'static str {
        match self {
            SalaryCreditBasis::Minimum => "minimum",
            SalaryCreditBasis::Maximum => "maximum",
            SalaryCreditBasis::Snapped => "snapped",
        }
    }
}

/// The result of a social-security calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct SocialSecurityResult {
    /// The employee contribution, rounded to centavos.
    pub amount: Decimal,
    /// The monthly salary credit the rate was applied to.
    pub salary_credit: Decimal,
    /// How the salary credit was chosen.
    pub basis: SalaryCreditBasis,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Returns the monthly salary credit for an income under `rule`.
pub fn salary_credit(income: Decimal, rule: &SocialSecurityRule) -> (Decimal, SalaryCreditBasis) {
    if income < rule.low_threshold {
        (rule.min_base, SalaryCreditBasis::Minimum)
    } else if income >= rule.high_threshold {
        (rule.max_base, SalaryCreditBasis::Maximum)
    } else {
        (
            snap_to_multiple(income, rule.base_step),
            SalaryCreditBasis::Snapped,
        )
    }
}

/// Calculates the employee social-security contribution.
///
/// # Arguments
///
/// * `income` - The gross monthly income
/// * `rule` - The social-security rule of the selected schedule
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_social_security;
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::models::MonthlyIncome;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::builtin().unwrap();
/// let rule = &loader.get_schedule("2023").unwrap().social_security;
///
/// let income: MonthlyIncome = "20000".parse().unwrap();
/// let result = calculate_social_security(income, rule, 1);
/// assert_eq!(result.amount, Decimal::new(90000, 2));
/// ```
pub fn calculate_social_security(
    income: MonthlyIncome,
    rule: &SocialSecurityRule,
    step_number: u32,
) -> SocialSecurityResult {
    let (credit, basis) = salary_credit(income.amount(), rule);
    let amount = round_centavos(credit * rule.employee_rate);

    let reasoning = match basis {
        SalaryCreditBasis::Minimum => format!(
            "Income ₱{} is below ₱{}; minimum salary credit ₱{} × {} = ₱{}",
            income.amount().normalize(),
            rule.low_threshold.normalize(),
            credit.normalize(),
            rule.employee_rate.normalize(),
            amount
        ),
        SalaryCreditBasis::Maximum => format!(
            "Income ₱{} is at or above ₱{}; maximum salary credit ₱{} × {} = ₱{}",
            income.amount().normalize(),
            rule.high_threshold.normalize(),
            credit.normalize(),
            rule.employee_rate.normalize(),
            amount
        ),
        SalaryCreditBasis::Snapped => format!(
            "Income ₱{} snapped to salary credit ₱{} × {} = ₱{}",
            income.amount().normalize(),
            credit.normalize(),
            rule.employee_rate.normalize(),
            amount
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "social_security".to_string(),
        rule_name: "Social Security Contribution".to_string(),
        legal_basis: rule.legal_basis.clone(),
        input: serde_json::json!({
            "monthly_income": income.amount().to_string(),
            "employee_rate": rule.employee_rate.normalize().to_string(),
            "base_step": rule.base_step.normalize().to_string()
        }),
        output: serde_json::json!({
            "salary_credit": credit.normalize().to_string(),
            "basis": basis.as_str(),
            "amount": amount.to_string()
        }),
        reasoning,
    };

    SocialSecurityResult {
        amount,
        salary_credit: credit,
        basis,
        audit_step,
    }
}
