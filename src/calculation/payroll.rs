//! Payroll aggregation.
//!
//! Composes the three contribution calculators and the tax calculator into
//! a single [`PayrollResult`].

use rust_decimal::Decimal;

use crate::config::PayrollSchedule;
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, Contributions, MonthlyIncome, PayrollResult,
};

use super::health_insurance::calculate_health_insurance;
use super::housing_fund::calculate_housing_fund;
use super::income_tax::calculate_income_tax;
use super::social_security::calculate_social_security;

/// Warning code recorded when contributions exceed the monthly income.
pub const NEGATIVE_TAXABLE_INCOME: &str = "NEGATIVE_TAXABLE_INCOME";

/// Computes contributions, tax and net pay for one monthly income.
///
/// The income is already validated by construction, so the computation
/// cannot fail. When the contributions exceed the income the taxable income
/// is negative, the tax is zero and a [`NEGATIVE_TAXABLE_INCOME`] warning is
/// added to the audit trace.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::compute_payroll;
/// use payroll_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::builtin().unwrap();
/// let schedule = loader.get_schedule("2023").unwrap();
///
/// let result = compute_payroll("20000".parse().unwrap(), schedule);
/// assert_eq!(result.total_contributions, Decimal::from(1400));
/// assert_eq!(result.tax, Decimal::ZERO);
/// assert_eq!(result.net_pay, Decimal::from(18600));
/// ```
pub fn compute_payroll(income: MonthlyIncome, schedule: &PayrollSchedule) -> PayrollResult {
    let mut steps: Vec<AuditStep> = Vec::with_capacity(5);
    let mut warnings: Vec<AuditWarning> = Vec::new();

    let social_security = calculate_social_security(income, &schedule.social_security, 1);
    let health_insurance = calculate_health_insurance(income, &schedule.health_insurance, 2);
    let housing_fund = calculate_housing_fund(income, &schedule.housing_fund, 3);

    let contributions = Contributions {
        social_security: social_security.amount,
        health_insurance: health_insurance.amount,
        housing_fund: housing_fund.amount,
    };
    steps.push(social_security.audit_step);
    steps.push(health_insurance.audit_step);
    steps.push(housing_fund.audit_step);

    let monthly_income = income.amount();
    let total_contributions = contributions.total();
    let taxable_income = monthly_income - total_contributions;

    if taxable_income < Decimal::ZERO {
        warnings.push(AuditWarning {
            code: NEGATIVE_TAXABLE_INCOME.to_string(),
            message: format!(
                "Contributions of ₱{} exceed the monthly income of ₱{}; tax set to zero",
                total_contributions.normalize(),
                monthly_income.normalize()
            ),
            severity: "medium".to_string(),
        });
    }

    let income_tax = calculate_income_tax(taxable_income, &schedule.income_tax, 4);
    let tax = income_tax.tax;
    steps.push(income_tax.audit_step);

    let total_deductions = total_contributions + tax;
    let net_pay = monthly_income - total_deductions;
    let net_pay_after_tax = monthly_income - tax;

    steps.push(AuditStep {
        step_number: 5,
        rule_id: "net_pay".to_string(),
        rule_name: "Net Pay".to_string(),
        legal_basis: String::new(),
        input: serde_json::json!({
            "monthly_income": monthly_income.to_string(),
            "total_contributions": total_contributions.to_string(),
            "tax": tax.to_string()
        }),
        output: serde_json::json!({
            "total_deductions": total_deductions.to_string(),
            "net_pay": net_pay.to_string()
        }),
        reasoning: format!(
            "₱{} - (₱{} + ₱{}) = ₱{}",
            monthly_income.normalize(),
            total_contributions.normalize(),
            tax.normalize(),
            net_pay.normalize()
        ),
    });

    PayrollResult {
        schedule_version: schedule.version.clone(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        monthly_income: income,
        contributions,
        total_contributions,
        taxable_income,
        tax,
        total_deductions,
        net_pay_after_tax,
        net_pay,
        audit_trace: AuditTrace { steps, warnings },
    }
}
