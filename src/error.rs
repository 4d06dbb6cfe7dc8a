//! Error types for the Payroll Deduction Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while loading schedules or
//! computing a payroll.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the Payroll Deduction Engine.
///
/// All fallible operations in the engine return this error type, making it
/// easy to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::ScheduleNotFound {
///     version: "1999".to_string(),
/// };
/// assert_eq!(error.to_string(), "Schedule not found: 1999");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// The monthly income could not be accepted.
    #[error("Invalid monthly income '{input}': {message}")]
    InvalidInput {
        /// The raw input as supplied by the caller.
        input: String,
        /// Why the input was rejected.
        message: String,
    },

    /// No schedule exists for the requested version key.
    #[error("Schedule not found: {version}")]
    ScheduleNotFound {
        /// The version key that was requested.
        version: String,
    },

    /// No schedule is effective on the requested date.
    #[error("No schedule effective on {date}")]
    ScheduleNotEffective {
        /// The date for which a schedule was requested.
        date: NaiveDate,
    },

    /// A schedule violates one of its structural invariants.
    #[error("Invalid schedule '{schedule}': {message}")]
    InvalidSchedule {
        /// The schedule (or schedule part) that was rejected.
        schedule: String,
        /// A description of the violated invariant.
        message: String,
    },

    /// A schedule document could not be parsed.
    #[error("Failed to parse schedule document '{source_name}': {message}")]
    ConfigParseError {
        /// The name of the document that failed to parse.
        source_name: String,
        /// A description of the parse error.
        message: String,
    },
}

impl EngineError {
    /// Creates an [`EngineError::InvalidInput`] for the given raw input.
    pub fn invalid_input(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            input: input.into(),
            message: message.into(),
        }
    }

    /// Creates an [`EngineError::InvalidSchedule`] for the given schedule part.
    pub fn invalid_schedule(schedule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSchedule {
            schedule: schedule.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_displays_input_and_message() {
        let error = EngineError::invalid_input("-5", "monthly income cannot be negative");
        assert_eq!(
            error.to_string(),
            "Invalid monthly income '-5': monthly income cannot be negative"
        );
    }

    #[test]
    fn test_schedule_not_found_displays_version() {
        let error = EngineError::ScheduleNotFound {
            version: "2019".to_string(),
        };
        assert_eq!(error.to_string(), "Schedule not found: 2019");
    }

    #[test]
    fn test_schedule_not_effective_displays_date() {
        let error = EngineError::ScheduleNotEffective {
            date: NaiveDate::from_ymd_opt(2010, 6, 30).unwrap(),
        };
        assert_eq!(error.to_string(), "No schedule effective on 2010-06-30");
    }

    #[test]
    fn test_invalid_schedule_displays_schedule_and_message() {
        let error = EngineError::invalid_schedule("2023/income_tax", "brackets must not be empty");
        assert_eq!(
            error.to_string(),
            "Invalid schedule '2023/income_tax': brackets must not be empty"
        );
    }

    #[test]
    fn test_config_parse_error_displays_source_and_message() {
        let error = EngineError::ConfigParseError {
            source_name: "2023.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse schedule document '2023.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_not_found() -> EngineResult<()> {
            Err(EngineError::ScheduleNotFound {
                version: "none".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
