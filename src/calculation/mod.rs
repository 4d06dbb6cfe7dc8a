//! Calculation logic for the Payroll Deduction Engine.
//!
//! This module contains the calculators for the social-security,
//! health-insurance and housing-fund contributions, the progressive income
//! tax, the shared rounding rules, and the aggregator that composes them
//! into a payroll result.

mod health_insurance;
mod housing_fund;
mod income_tax;
mod payroll;
mod rounding;
mod social_security;

pub use health_insurance::{HealthInsuranceResult, PremiumSegment, calculate_health_insurance};
pub use housing_fund::{HousingFundResult, calculate_housing_fund};
pub use income_tax::{IncomeTaxResult, calculate_income_tax};
pub use payroll::{NEGATIVE_TAXABLE_INCOME, compute_payroll};
pub use rounding::{CENTAVO_PLACES, round_centavos, snap_to_multiple};
pub use social_security::{
    SalaryCreditBasis, SocialSecurityResult, calculate_social_security, salary_credit,
};
