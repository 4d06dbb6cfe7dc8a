//! Schedule types for payroll deductions.
//!
//! This module contains the strongly-typed schedule structures that are
//! deserialized from YAML schedule documents. Every rule carries the numbers
//! for one scheme in one schedule version; the calculators never hard-code
//! a rate or threshold.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Social-security (SSS) contribution rule.
///
/// The contribution is computed on a monthly salary credit: the income
/// snapped to the nearest multiple of `base_step`, clamped to
/// `[min_base, max_base]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialSecurityRule {
    /// The statute the rule comes from (e.g., "RA 11199").
    pub legal_basis: String,
    /// The employee share of the contribution rate (e.g., 0.045).
    pub employee_rate: Decimal,
    /// The multiple the salary credit is snapped to (e.g., 500).
    pub base_step: Decimal,
    /// Incomes strictly below this use `min_base`.
    pub low_threshold: Decimal,
    /// The minimum salary credit.
    pub min_base: Decimal,
    /// Incomes at or above this use `max_base`.
    pub high_threshold: Decimal,
    /// The maximum salary credit.
    pub max_base: Decimal,
}

impl SocialSecurityRule {
    /// Checks the structural invariants of the rule.
    pub fn validate(&self, schedule: &str) -> EngineResult<()> {
        let part = format!("{}/social_security", schedule);
        check_rate(&part, "employee_rate", self.employee_rate)?;
        if self.base_step <= Decimal::ZERO {
            return Err(EngineError::invalid_schedule(part, "base_step must be positive"));
        }
        if self.low_threshold > self.high_threshold {
            return Err(EngineError::invalid_schedule(
                part,
                "low_threshold must not exceed high_threshold",
            ));
        }
        if self.min_base < Decimal::ZERO || self.min_base > self.max_base {
            return Err(EngineError::invalid_schedule(
                part,
                "min_base must be non-negative and not exceed max_base",
            ));
        }
        Ok(())
    }

    /// The smallest contribution the rule can produce.
    pub fn minimum_contribution(&self) -> Decimal {
        self.min_base * self.employee_rate
    }

    /// The largest contribution the rule can produce.
    pub fn maximum_contribution(&self) -> Decimal {
        self.max_base * self.employee_rate
    }
}

/// Health-insurance (PhilHealth) contribution rule.
///
/// The floor, ceiling and rate belong together: `minimum` should equal
/// `lower_floor * rate` and `maximum` should equal `upper_ceiling * rate`.
/// See [`HealthInsuranceRule::continuity_gaps`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthInsuranceRule {
    /// The statute the rule comes from (e.g., "RA 11223").
    pub legal_basis: String,
    /// The employee share of the premium rate (e.g., 0.02).
    pub rate: Decimal,
    /// Incomes at or below this pay `minimum`.
    pub lower_floor: Decimal,
    /// The fixed contribution at or below the floor.
    pub minimum: Decimal,
    /// Incomes at or above this pay `maximum`.
    pub upper_ceiling: Decimal,
    /// The fixed contribution at or above the ceiling.
    pub maximum: Decimal,
}

impl HealthInsuranceRule {
    /// Checks the structural invariants of the rule.
    pub fn validate(&self, schedule: &str) -> EngineResult<()> {
        let part = format!("{}/health_insurance", schedule);
        check_rate(&part, "rate", self.rate)?;
        if self.lower_floor > self.upper_ceiling {
            return Err(EngineError::invalid_schedule(
                part,
                "lower_floor must not exceed upper_ceiling",
            ));
        }
        if self.minimum < Decimal::ZERO || self.minimum > self.maximum {
            return Err(EngineError::invalid_schedule(
                part,
                "minimum must be non-negative and not exceed maximum",
            ));
        }
        Ok(())
    }

    /// Returns the boundaries where the fixed amounts disagree with the rate.
    pub fn continuity_gaps(&self) -> Vec<ContinuityGap> {
        let mut gaps = Vec::new();
        let implied_minimum = self.lower_floor * self.rate;
        if implied_minimum != self.minimum {
            gaps.push(ContinuityGap {
                boundary: self.lower_floor,
                field: "minimum".to_string(),
                stated: self.minimum,
                implied: implied_minimum,
            });
        }
        let implied_maximum = self.upper_ceiling * self.rate;
        if implied_maximum != self.maximum {
            gaps.push(ContinuityGap {
                boundary: self.upper_ceiling,
                field: "maximum".to_string(),
                stated: self.maximum,
                implied: implied_maximum,
            });
        }
        gaps
    }
}

/// Housing-fund (Pag-IBIG) contribution rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HousingFundRule {
    /// The statute the rule comes from (e.g., "RA 9679").
    pub legal_basis: String,
    /// Incomes at or below this use `low_rate`.
    pub low_cutoff: Decimal,
    /// Rate for incomes at or below the cutoff.
    pub low_rate: Decimal,
    /// Rate for incomes above the cutoff.
    pub high_rate: Decimal,
    /// The maximum monthly contribution.
    pub cap: Decimal,
}

impl HousingFundRule {
    /// Checks the structural invariants of the rule.
    pub fn validate(&self, schedule: &str) -> EngineResult<()> {
        let part = format!("{}/housing_fund", schedule);
        check_rate(&part, "low_rate", self.low_rate)?;
        check_rate(&part, "high_rate", self.high_rate)?;
        if self.cap < Decimal::ZERO {
            return Err(EngineError::invalid_schedule(part, "cap must be non-negative"));
        }
        Ok(())
    }
}

/// One bracket of a progressive tax schedule.
///
/// Income at or above `lower_bound` (and below the next bracket's bound) is
/// taxed as `base_tax + (income - lower_bound) * rate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// The income at which this bracket starts.
    pub lower_bound: Decimal,
    /// The tax already owed at `lower_bound`.
    pub base_tax: Decimal,
    /// The marginal rate within this bracket.
    pub rate: Decimal,
}

/// A progressive marginal-bracket income tax schedule.
///
/// Brackets are ordered by `lower_bound`, the first bracket starts at zero
/// with no tax, and the last bracket is open-ended. Income up to and
/// including the second bracket's bound owes nothing.
///
/// # Example
///
/// ```
/// use payroll_engine::config::TaxSchedule;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// let schedule = TaxSchedule::from_marginal_rates(
///     "RA 10963",
///     &[dec("0"), dec("20833"), dec("33333")],
///     &[dec("0"), dec("0.15"), dec("0.20")],
/// )
/// .unwrap();
///
/// assert_eq!(schedule.brackets()[2].base_tax, dec("1875"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaxScheduleDocument")]
pub struct TaxSchedule {
    legal_basis: String,
    brackets: Vec<TaxBracket>,
}

#[derive(Deserialize)]
struct TaxScheduleDocument {
    legal_basis: String,
    brackets: Vec<TaxBracket>,
}

impl TryFrom<TaxScheduleDocument> for TaxSchedule {
    type Error = EngineError;

    fn try_from(document: TaxScheduleDocument) -> Result<Self, Self::Error> {
        Self::new(document.legal_basis, document.brackets)
    }
}

impl TaxSchedule {
    /// Creates a tax schedule from explicit brackets.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSchedule` if the brackets are empty, do not start at
    /// zero, tax income at or below the first positive breakpoint, are not
    /// strictly increasing, or carry a rate outside `[0, 1]` or a negative
    /// base.
    pub fn new(legal_basis: impl Into<String>, brackets: Vec<TaxBracket>) -> EngineResult<Self> {
        let schedule = Self {
            legal_basis: legal_basis.into(),
            brackets,
        };
        schedule.validate("tax_schedule")?;
        Ok(schedule)
    }

    /// Creates a tax schedule from breakpoints and marginal rates, computing
    /// each bracket's base as the accumulated tax of the brackets below it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSchedule` if the slices differ in length or the
    /// resulting brackets are invalid.
    pub fn from_marginal_rates(
        legal_basis: impl Into<String>,
        breakpoints: &[Decimal],
        rates: &[Decimal],
    ) -> EngineResult<Self> {
        if breakpoints.len() != rates.len() {
            return Err(EngineError::invalid_schedule(
                "tax_schedule",
                format!(
                    "{} breakpoints but {} rates",
                    breakpoints.len(),
                    rates.len()
                ),
            ));
        }

        let mut brackets = Vec::with_capacity(breakpoints.len());
        let mut base_tax = Decimal::ZERO;
        for (i, (&lower_bound, &rate)) in breakpoints.iter().zip(rates).enumerate() {
            if i > 0 {
                base_tax += (lower_bound - breakpoints[i - 1]) * rates[i - 1];
            }
            brackets.push(TaxBracket {
                lower_bound,
                base_tax,
                rate,
            });
        }

        Self::new(legal_basis, brackets)
    }

    /// Returns the statute the schedule comes from.
    pub fn legal_basis(&self) -> &str {
        &self.legal_basis
    }

    /// Returns the brackets, ordered by lower bound.
    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Returns the bracket that applies to a non-negative taxable income.
    pub fn bracket_for(&self, taxable_income: Decimal) -> &TaxBracket {
        let index = self
            .brackets
            .partition_point(|b| b.lower_bound <= taxable_income);
        &self.brackets[index.saturating_sub(1)]
    }

    /// Checks the structural invariants of the schedule.
    pub fn validate(&self, schedule: &str) -> EngineResult<()> {
        let part = format!("{}/income_tax", schedule);
        let first = self
            .brackets
            .first()
            .ok_or_else(|| EngineError::invalid_schedule(&part, "brackets must not be empty"))?;
        if first.lower_bound != Decimal::ZERO {
            return Err(EngineError::invalid_schedule(
                part,
                "the first bracket must start at zero",
            ));
        }
        if first.rate != Decimal::ZERO || first.base_tax != Decimal::ZERO {
            return Err(EngineError::invalid_schedule(
                part,
                "the first bracket must be tax-free (base_tax and rate of zero)",
            ));
        }
        if let Some(second) = self
            .brackets
            .get(1)
            .filter(|b| b.base_tax != Decimal::ZERO)
        {
            return Err(EngineError::invalid_schedule(
                part,
                format!(
                    "income up to {} must be tax-free, but base_tax is {}",
                    second.lower_bound, second.base_tax
                ),
            ));
        }
        for pair in self.brackets.windows(2) {
            if pair[1].lower_bound <= pair[0].lower_bound {
                return Err(EngineError::invalid_schedule(
                    part,
                    format!(
                        "bracket bounds must be strictly increasing ({} after {})",
                        pair[1].lower_bound, pair[0].lower_bound
                    ),
                ));
            }
        }
        for bracket in &self.brackets {
            check_rate(&part, "rate", bracket.rate)?;
            if bracket.base_tax < Decimal::ZERO {
                return Err(EngineError::invalid_schedule(
                    part,
                    format!("negative base_tax at {}", bracket.lower_bound),
                ));
            }
        }
        Ok(())
    }

    /// Returns the brackets whose stated base differs from the base implied
    /// by the bracket below.
    pub fn continuity_gaps(&self) -> Vec<ContinuityGap> {
        self.brackets
            .windows(2)
            .filter_map(|pair| {
                let implied =
                    pair[0].base_tax + (pair[1].lower_bound - pair[0].lower_bound) * pair[0].rate;
                (implied != pair[1].base_tax).then(|| ContinuityGap {
                    boundary: pair[1].lower_bound,
                    field: "base_tax".to_string(),
                    stated: pair[1].base_tax,
                    implied,
                })
            })
            .collect()
    }
}

/// A boundary where a schedule's stated amount disagrees with the amount its
/// own rates imply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContinuityGap {
    /// The income at which the disagreement occurs.
    pub boundary: Decimal,
    /// The schedule field holding the stated amount.
    pub field: String,
    /// The amount written in the schedule.
    pub stated: Decimal,
    /// The amount the neighbouring rate implies.
    pub implied: Decimal,
}

/// A complete, versioned set of deduction rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollSchedule {
    /// The version key (e.g., "2023").
    pub version: String,
    /// A human-readable name for the schedule.
    pub name: String,
    /// The first date on which the schedule applies.
    pub effective_date: NaiveDate,
    /// Where the figures were taken from.
    #[serde(default)]
    pub source_url: Option<String>,
    /// Social-security rule.
    pub social_security: SocialSecurityRule,
    /// Health-insurance rule.
    pub health_insurance: HealthInsuranceRule,
    /// Housing-fund rule.
    pub housing_fund: HousingFundRule,
    /// Income tax schedule.
    pub income_tax: TaxSchedule,
}

impl PayrollSchedule {
    /// Checks every rule in the schedule.
    pub fn validate(&self) -> EngineResult<()> {
        if self.version.trim().is_empty() {
            return Err(EngineError::invalid_schedule(
                &self.name,
                "version must not be empty",
            ));
        }
        self.social_security.validate(&self.version)?;
        self.health_insurance.validate(&self.version)?;
        self.housing_fund.validate(&self.version)?;
        self.income_tax.validate(&self.version)
    }
}

/// The set of loaded schedules.
///
/// Schedules are kept sorted by effective date, oldest first.
#[derive(Debug, Clone)]
pub struct ScheduleRegistry {
    schedules: Vec<PayrollSchedule>,
}

impl ScheduleRegistry {
    /// Creates a new registry from its schedules.
    pub fn new(schedules: Vec<PayrollSchedule>) -> Self {
        let mut sorted = schedules;
        sorted.sort_by(|a, b| a.effective_date.cmp(&b.effective_date));
        Self { schedules: sorted }
    }

    /// Returns all schedules, oldest first.
    pub fn schedules(&self) -> &[PayrollSchedule] {
        &self.schedules
    }

    /// Returns the schedule with the given version key.
    pub fn get(&self, version: &str) -> Option<&PayrollSchedule> {
        self.schedules.iter().find(|s| s.version == version)
    }

    /// Returns the most recent schedule effective on or before `date`.
    pub fn effective_on(&self, date: NaiveDate) -> Option<&PayrollSchedule> {
        self.schedules.iter().rfind(|s| s.effective_date <= date)
    }

    /// Returns the most recent schedule.
    pub fn latest(&self) -> Option<&PayrollSchedule> {
        self.schedules.last()
    }

    /// Returns the version keys, oldest first.
    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.schedules.iter().map(|s| s.version.as_str())
    }
}

fn check_rate(part: &str, field: &str, rate: Decimal) -> EngineResult<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(EngineError::invalid_schedule(
            part,
            format!("{} must be between 0 and 1, got {}", field, rate),
        ));
    }
    Ok(())
}
