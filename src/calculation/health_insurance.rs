//! Health-insurance (PhilHealth) contribution calculation.
//!
//! A fixed minimum applies at or below the income floor, a fixed maximum at
//! or above the ceiling, and a flat rate in between.

use rust_decimal::Decimal;

use crate::config::HealthInsuranceRule;
use crate::models::{AuditStep, MonthlyIncome};

/// Which segment of the health-insurance rule applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PremiumSegment {
    /// Income at or below the floor.
    Floor,
    /// Income strictly between floor and ceiling.
    Rate,
    /// Income at or above the ceiling.
    Ceiling,
}

impl PremiumSegment {
    fn as_str(self) -> &'static str {
        match self {
            PremiumSegment::Floor => "floor",
            PremiumSegment::Rate => "rate",
            PremiumSegment::Ceiling => "ceiling",
        }
    }
}

/// The result of a health-insurance calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct HealthInsuranceResult {
    /// The employee contribution.
    pub amount: Decimal,
    /// Which segment of the rule applied.
    pub segment: PremiumSegment,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the employee health-insurance contribution.
///
/// The rate-based amount is kept at full decimal precision; the fixed minimum
/// and maximum are used as written in the schedule.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_health_insurance;
/// use payroll_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::builtin().unwrap();
/// let rule = &loader.get_schedule("2023").unwrap().health_insurance;
///
/// let result = calculate_health_insurance("100000".parse().unwrap(), rule, 1);
/// assert_eq!(result.amount, Decimal::from(1600));
/// ```
pub fn calculate_health_insurance(
    income: MonthlyIncome,
    rule: &HealthInsuranceRule,
    step_number: u32,
) -> HealthInsuranceResult {
    let monthly = income.amount();

    let (amount, segment) = if monthly <= rule.lower_floor {
        (rule.minimum, PremiumSegment::Floor)
    } else if monthly >= rule.upper_ceiling {
        (rule.maximum, PremiumSegment::Ceiling)
    } else {
        (monthly * rule.rate, PremiumSegment::Rate)
    };

    let reasoning = match segment {
        PremiumSegment::Floor => format!(
            "Income ₱{} is at or below the ₱{} floor; fixed minimum ₱{}",
            monthly.normalize(),
            rule.lower_floor.normalize(),
            amount.normalize()
        ),
        PremiumSegment::Ceiling => format!(
            "Income ₱{} is at or above the ₱{} ceiling; fixed maximum ₱{}",
            monthly.normalize(),
            rule.upper_ceiling.normalize(),
            amount.normalize()
        ),
        PremiumSegment::Rate => format!(
            "₱{} × {} = ₱{}",
            monthly.normalize(),
            rule.rate.normalize(),
            amount
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "health_insurance".to_string(),
        rule_name: "Health Insurance Contribution".to_string(),
        legal_basis: rule.legal_basis.clone(),
        input: serde_json::json!({
            "monthly_income": monthly.to_string(),
            "rate": rule.rate.normalize().to_string(),
            "lower_floor": rule.lower_floor.normalize().to_string(),
            "upper_ceiling": rule.upper_ceiling.normalize().to_string()
        }),
        output: serde_json::json!({
            "segment": segment.as_str(),
            "amount": amount.to_string()
        }),
        reasoning,
    };

    HealthInsuranceResult {
        amount,
        segment,
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

    fn rule_2023() -> HealthInsuranceRule {
        HealthInsuranceRule {
            legal_basis: "RA 11223".to_string(),
            rate: dec("0.02"),
            lower_floor: dec("10000"),
            minimum: dec("200"),
            upper_ceiling: dec("80000"),
            maximum: dec("1600"),
        }
    }

    /// HI-001: zero income pays the fixed minimum
    #[test]
    fn test_zero_income_pays_minimum() {
        let result = calculate_health_insurance(income("0"), &rule_2023(), 1);

        assert_eq!(result.amount, dec("200"));
        assert_eq!(result.segment, PremiumSegment::Floor);
        assert_eq!(result.audit_step.rule_id, "health_insurance");
        assert_eq!(result.audit_step.legal_basis, "RA 11223");
    }

    /// HI-002: the floor itself pays the fixed minimum
    #[test]
    fn test_floor_is_inclusive() {
        let result = calculate_health_insurance(income("10000"), &rule_2023(), 1);
        assert_eq!(result.segment, PremiumSegment::Floor);
        assert_eq!(result.amount, dec("200"));
    }

    /// HI-003: between floor and ceiling the rate applies
    #[test]
    fn test_middle_segment_uses_rate() {
        let result = calculate_health_insurance(income("20000"), &rule_2023(), 1);

        assert_eq!(result.segment, PremiumSegment::Rate);
        assert_eq!(result.amount, dec("400.00"));
        assert_eq!(result.audit_step.output["segment"].as_str().unwrap(), "rate");
    }

    /// HI-004: the ceiling itself pays the fixed maximum
    #[test]
    fn test_ceiling_is_inclusive() {
        let result = calculate_health_insurance(income("80000"), &rule_2023(), 1);
        assert_eq!(result.segment, PremiumSegment::Ceiling);
        assert_eq!(result.amount, dec("1600"));
    }

    /// HI-005: incomes far above the ceiling pay the maximum
    #[test]
    fn test_high_income_pays_maximum() {
        let result = calculate_health_insurance(income("100000"), &rule_2023(), 1);
        assert_eq!(result.amount, dec("1600"));
        assert!(result.audit_step.reasoning.contains("ceiling"));
    }

    #[test]
    fn test_rate_amount_is_not_rounded() {
        // 10000.25 × 0.02 = 200.005
        let result = calculate_health_insurance(income("10000.25"), &rule_2023(), 1);
        assert_eq!(result.amount, dec("200.005"));
        assert_eq!(result.audit_step.output["amount"], "200.0050");
    }

    #[test]
    fn test_discontinuous_rule_is_applied_as_written() {
        let mut rule = rule_2023();
        rule.maximum = dec("1800");

        let below = calculate_health_insurance(income("79999"), &rule, 1);
        let at = calculate_health_insurance(income("80000"), &rule, 1);

        assert_eq!(below.amount, dec("1599.98"));
        assert_eq!(at.amount, dec("1800"));
    }

    #[test]
    fn test_audit_step_has_correct_step_number() {
        let result = calculate_health_insurance(income("20000"), &rule_2023(), 2);
        assert_eq!(result.audit_step.step_number, 2);
    }
}
