//! Monthly income model.
//!
//! This module defines [`MonthlyIncome`], the single input of a payroll
//! computation. A `MonthlyIncome` can only be built through validation, so
//! every value that reaches a calculator is a non-negative decimal.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A validated, non-negative gross monthly income in pesos.
///
/// # Examples
///
/// ```
/// use payroll_engine::models::MonthlyIncome;
/// use rust_decimal::Decimal;
///
/// let income: MonthlyIncome = " 20000.50 ".parse().unwrap();
/// assert_eq!(income.amount(), Decimal::new(2000050, 2));
///
/// assert!("-5".parse::<MonthlyIncome>().is_err());
/// assert!("abc".parse::<MonthlyIncome>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct MonthlyIncome(Decimal);

impl MonthlyIncome {
    /// Creates a monthly income from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the amount is negative.
    pub fn new(amount: Decimal) -> EngineResult<Self> {
        if amount < Decimal::ZERO {
            return Err(EngineError::invalid_input(
                amount.to_string(),
                "monthly income cannot be negative",
            ));
        }
        Ok(Self(amount))
    }

    /// A zero monthly income.
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Returns the amount in pesos.
    pub fn amount(&self) -> Decimal {
        self.0
    }
}

impl FromStr for MonthlyIncome {
    type Err = EngineError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(EngineError::invalid_input(input, "monthly income is required"));
        }

        let amount = Decimal::from_str(trimmed).map_err(|e| {
            EngineError::invalid_input(input, format!("not a decimal number ({})", e))
        })?;

        if amount < Decimal::ZERO {
            return Err(EngineError::invalid_input(
                input,
                "monthly income cannot be negative",
            ));
        }

        Ok(Self(amount))
    }
}

impl TryFrom<Decimal> for MonthlyIncome {
    type Error = EngineError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<MonthlyIncome> for Decimal {
    fn from(income: MonthlyIncome) -> Self {
        income.0
    }
}

impl fmt::Display for MonthlyIncome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
