//! Housing-fund (Pag-IBIG) contribution calculation.
//!
//! A low rate applies up to and including the cutoff income, a high rate
//! above it, and the result never exceeds the schedule's cap.

use rust_decimal::Decimal;

use crate::config::HousingFundRule;
use crate::models::{AuditStep, MonthlyIncome};

/// The result of a housing-fund calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct HousingFundResult {
    /// The employee contribution.
    pub amount: Decimal,
    /// The rate that was applied.
    pub rate: Decimal,
    /// Whether the cap replaced the rate-based amount.
    pub cap_applied: bool,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the employee housing-fund contribution.
///
/// The amount is `min(cap, income × rate)` and is not rounded further.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_housing_fund;
/// use payroll_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::builtin().unwrap();
/// let rule = &loader.get_schedule("2023").unwrap().housing_fund;
///
/// let result = calculate_housing_fund("1501".parse().unwrap(), rule, 1);
/// assert_eq!(result.amount, Decimal::new(3002, 2));
/// ```
pub fn calculate_housing_fund(
    income: MonthlyIncome,
    rule: &HousingFundRule,
    step_number: u32,
) -> HousingFundResult {
    let rate = if income.amount() <= rule.low_cutoff {
        rule.low_rate
    } else {
        rule.high_rate
    };

    let uncapped_amount = income.amount() * rate;
    let (amount, cap_applied) = if uncapped_amount > rule.cap {
        (rule.cap, true)
    } else {
        (uncapped_amount, false)
    };

    let reasoning = if cap_applied {
        format!(
            "₱{} × {} = ₱{} (capped at ₱{})",
            income.amount().normalize(),
            rate.normalize(),
            uncapped_amount.normalize(),
            rule.cap.normalize()
        )
    } else {
        format!(
            "₱{} × {} = ₱{}",
            income.amount().normalize(),
            rate.normalize(),
            amount.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "housing_fund".to_string(),
        rule_name: "Housing Fund Contribution".to_string(),
        legal_basis: rule.legal_basis.clone(),
        input: serde_json::json!({
            "monthly_income": income.amount().to_string(),
            "low_cutoff": rule.low_cutoff.normalize().to_string(),
            "cap": rule.cap.normalize().to_string()
        }),
        output: serde_json::json!({
            "rate": rate.normalize().to_string(),
            "uncapped_amount": uncapped_amount.normalize().to_string(),
            "amount": amount.normalize().to_string(),
            "cap_applied": cap_applied
        }),
        reasoning,
    };

    HousingFundResult {
        amount,
        rate,
        cap_applied,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn income(s: &str) -> MonthlyIncome {
        s.parse().unwrap()
    }

    fn rule_2023() -> HousingFundRule {
        HousingFundRule {
            legal_basis: "RA 9679".to_string(),
            low_cutoff: dec("1500"),
            low_rate: dec("0.01"),
            high_rate: dec("0.02"),
            cap: dec("100"),
        }
    }

    /// HF-001: the cutoff itself uses the low rate
    #[test]
    fn test_cutoff_is_inclusive_of_low_rate() {
        let result = calculate_housing_fund(income("1500"), &rule_2023(), 1);

        assert_eq!(result.rate, dec("0.01"));
        assert_eq!(result.amount, dec("15.00"));
        assert!(!result.cap_applied);
        assert_eq!(result.audit_step.rule_id, "housing_fund");
        assert_eq!(result.audit_step.legal_basis, "RA 9679");
    }

    /// HF-002: one peso above the cutoff switches to the high rate
    #[test]
    fn test_above_cutoff_uses_high_rate() {
        let result = calculate_housing_fund(income("1501"), &rule_2023(), 1);

        assert_eq!(result.rate, dec("0.02"));
        assert_eq!(result.amount, dec("30.02"));
        assert!(!result.cap_applied);
    }

    /// HF-003: high incomes hit the cap
    #[test]
    fn test_high_income_is_capped() {
        let result = calculate_housing_fund(income("20000"), &rule_2023(), 1);

        assert_eq!(result.amount, dec("100"));
        assert!(result.cap_applied);
        assert_eq!(
            result.audit_step.output["uncapped_amount"].as_str().unwrap(),
            "400"
        );
        assert!(result.audit_step.reasoning.contains("capped"));
    }

    /// HF-004: exactly reaching the cap is not capping
    #[test]
    fn test_income_reaching_cap_exactly() {
        let result = calculate_housing_fund(income("5000"), &rule_2023(), 1);

        assert_eq!(result.amount, dec("100"));
        assert!(!result.cap_applied);
    }

    #[test]
    fn test_zero_income_contributes_nothing() {
        let result = calculate_housing_fund(income("0"), &rule_2023(), 1);
        assert_eq!(result.amount, Decimal::ZERO);
    }

    #[test]
    fn test_amount_is_not_rounded() {
        let result = calculate_housing_fund(income("1234.567"), &rule_2023(), 1);
        assert_eq!(result.amount, dec("12.34567"));
    }

    #[test]
    fn test_higher_cap_schedule() {
        let mut rule = rule_2023();
        rule.cap = dec("200");
        let result = calculate_housing_fund(income("20000"), &rule, 1);
        assert_eq!(result.amount, dec("200"));
    }

    #[test]
    fn test_audit_step_has_correct_step_number() {
        let result = calculate_housing_fund(income("1500"), &rule_2023(), 4);
        assert_eq!(result.audit_step.step_number, 4);
    }
}
