//! Payroll Deduction Engine for Philippine payroll
//!
//! This crate computes withholding income tax, the social-security (SSS),
//! health-insurance (PhilHealth) and housing-fund (Pag-IBIG) contributions,
//! and net pay from a single monthly income, under versioned deduction
//! schedules.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;

pub use engine::PayrollEngine;
