//! Caller-facing entry point for the Payroll Deduction Engine.
//!
//! [`PayrollEngine`] owns the loaded schedules, turns the caller's decimal
//! string into a validated [`MonthlyIncome`], selects a schedule and runs the
//! aggregator.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::calculation::compute_payroll;
use crate::config::{ConfigLoader, PayrollSchedule};
use crate::error::EngineResult;
use crate::models::{MonthlyIncome, PayrollResult};

/// Shared payroll engine.
///
/// Cloning is cheap: every clone shares the same read-only schedules, so an
/// engine can be handed to as many threads as needed.
///
/// # Example
///
/// ```
/// use payroll_engine::PayrollEngine;
/// use rust_decimal::Decimal;
///
/// let engine = PayrollEngine::builtin().unwrap();
/// let result = engine.compute_payroll_for_version("2023", "20000").unwrap();
///
/// assert_eq!(result.net_pay, Decimal::from(18600));
/// assert!(engine.compute_payroll("-5").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct PayrollEngine {
    config: Arc<ConfigLoader>,
}

impl PayrollEngine {
    /// Creates an engine over the given schedules.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Creates an engine over the schedules compiled into the crate.
    pub fn builtin() -> EngineResult<Self> {
        Ok(Self::new(ConfigLoader::builtin()?))
    }

    /// Returns the loaded schedules.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Computes a payroll under the most recent schedule.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `monthly_income` is empty, not a decimal
    /// number, or negative. No partial result is produced.
    pub fn compute_payroll(&self, monthly_income: &str) -> EngineResult<PayrollResult> {
        let schedule = self.config.latest_schedule()?;
        self.compute_with_schedule(schedule, monthly_income)
    }

    /// Computes a payroll under the schedule with the given version key.
    pub fn compute_payroll_for_version(
        &self,
        version: &str,
        monthly_income: &str,
    ) -> EngineResult<PayrollResult> {
        let schedule = self.config.get_schedule(version)?;
        self.compute_with_schedule(schedule, monthly_income)
    }

    /// Computes a payroll under the schedule in force on `date`.
    pub fn compute_payroll_on(
        &self,
        date: NaiveDate,
        monthly_income: &str,
    ) -> EngineResult<PayrollResult> {
        let schedule = self.config.schedule_on(date)?;
        self.compute_with_schedule(schedule, monthly_income)
    }

    /// Computes a payroll for an already validated income.
    pub fn compute_payroll_with_income(
        &self,
        income: MonthlyIncome,
        version: &str,
    ) -> EngineResult<PayrollResult> {
        let schedule = self.config.get_schedule(version)?;
        Ok(Self::run(schedule, income))
    }

    fn compute_with_schedule(
        &self,
        schedule: &PayrollSchedule,
        monthly_income: &str,
    ) -> EngineResult<PayrollResult> {
        let income = monthly_income.parse::<MonthlyIncome>().inspect_err(|err| {
            warn!(
                schedule = %schedule.version,
                error = %err,
                "Rejected monthly income"
            );
        })?;

        Ok(Self::run(schedule, income))
    }

    fn run(schedule: &PayrollSchedule, income: MonthlyIncome) -> PayrollResult {
        let result = compute_payroll(income, schedule);

        if result.is_degenerate() {
            warn!(
                schedule = %schedule.version,
                monthly_income = %income,
                total_contributions = %result.total_contributions,
                "Contributions exceed monthly income"
            );
        }

        info!(
            schedule = %schedule.version,
            monthly_income = %income,
            tax = %result.tax,
            net_pay = %result.net_pay,
            "Payroll computed"
        );

        result
    }
}
