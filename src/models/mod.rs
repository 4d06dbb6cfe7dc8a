//! Core data models for the Payroll Deduction Engine.
//!
//! This module contains the input and result types used throughout the engine.

mod income;
mod payroll_result;

pub use income::MonthlyIncome;
pub use payroll_result::{AuditStep, AuditTrace, AuditWarning, Contributions, PayrollResult};
