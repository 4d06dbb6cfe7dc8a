//! Schedule configuration for the Payroll Deduction Engine.
//!
//! Every rate, threshold and bracket the engine uses lives in a versioned
//! [`PayrollSchedule`]. Schedules are YAML documents compiled into the crate
//! and selected by version key or effective date.
//!
//! # Example
//!
//! ```
//! use payroll_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::builtin().unwrap();
//! println!("Latest schedule: {}", loader.latest_schedule().unwrap().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    ContinuityGap, HealthInsuranceRule, HousingFundRule, PayrollSchedule, ScheduleRegistry,
    SocialSecurityRule, TaxBracket, TaxSchedule,
};
