//! Schedule loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading payroll
//! schedules from YAML documents.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};

use super::types::{PayrollSchedule, ScheduleRegistry};

/// The schedule documents compiled into the crate.
///
/// ```text
/// config/schedules/
/// ├── 2022.yaml   # TRAIN 2018-2022 tax table
/// ├── 2023.yaml   # TRAIN 2023 tax table
/// ├── 2024.yaml   # PhilHealth 5%, Pag-IBIG 10,000 fund salary
/// └── 2025.yaml   # SSS 15%, MSC 5,000-35,000
/// ```
const BUILTIN_SCHEDULES: [(&str, &str); 4] = [
    (
        "2022.yaml",
        include_str!("../../config/schedules/2022.yaml"),
    ),
    (
        "2023.yaml",
        include_str!("../../config/schedules/2023.yaml"),
    ),
    (
        "2024.yaml",
        include_str!("../../config/schedules/2024.yaml"),
    ),
    (
        "2025.yaml",
        include_str!("../../config/schedules/2025.yaml"),
    ),
];

/// Loads and provides access to payroll schedules.
///
/// Every schedule is validated when it is loaded. Structural problems (an
/// unordered bracket table, a rate above 100%) fail the load; boundary
/// discontinuities are logged as warnings and the schedule is kept as written.
///
/// # Example
///
/// ```
/// use payroll_engine::config::ConfigLoader;
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::builtin().unwrap();
///
/// let schedule = loader.get_schedule("2023").unwrap();
/// println!("Schedule: {}", schedule.name);
///
/// let date = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
/// let effective = loader.schedule_on(date).unwrap();
/// assert_eq!(effective.version, "2024");
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    registry: ScheduleRegistry,
}

impl ConfigLoader {
    /// Loads the schedules compiled into the crate.
    pub fn builtin() -> EngineResult<Self> {
        Self::from_documents(&BUILTIN_SCHEDULES)
    }

    /// Loads schedules from named YAML documents.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - No documents are given
    /// - Any document contains invalid YAML or is missing a field
    /// - Any schedule violates a structural invariant
    /// - Two documents declare the same version
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::config::ConfigLoader;
    ///
    /// let yaml = include_str!(concat!(
    ///     env!("CARGO_MANIFEST_DIR"),
    ///     "/config/schedules/2023.yaml"
    /// ));
    /// let loader = ConfigLoader::from_documents(&[("2023.yaml", yaml)])?;
    /// assert_eq!(loader.latest_schedule()?.version, "2023");
    /// # Ok::<(), payroll_engine::error::EngineError>(())
    /// ```
    pub fn from_documents(documents: &[(&str, &str)]) -> EngineResult<Self> {
        if documents.is_empty() {
            return Err(EngineError::invalid_schedule(
                "registry",
                "no schedule documents given",
            ));
        }

        let mut schedules: Vec<PayrollSchedule> = Vec::with_capacity(documents.len());
        for (source_name, content) in documents {
            let schedule = Self::parse_schedule(source_name, content)?;
            if schedules.iter().any(|s| s.version == schedule.version) {
                return Err(EngineError::invalid_schedule(
                    &schedule.version,
                    format!("duplicate version in '{}'", source_name),
                ));
            }
            schedules.push(schedule);
        }

        Ok(Self {
            registry: ScheduleRegistry::new(schedules),
        })
    }

    /// Parses and validates a single YAML schedule document.
    pub fn parse_schedule(source_name: &str, content: &str) -> EngineResult<PayrollSchedule> {
        let schedule: PayrollSchedule =
            serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
                source_name: source_name.to_string(),
                message: e.to_string(),
            })?;

        schedule.validate()?;
        Self::report_discontinuities(&schedule);

        debug!(
            version = %schedule.version,
            effective_date = %schedule.effective_date,
            brackets = schedule.income_tax.brackets().len(),
            "Loaded payroll schedule"
        );

        Ok(schedule)
    }

    fn report_discontinuities(schedule: &PayrollSchedule) {
        for gap in schedule.income_tax.continuity_gaps() {
            warn!(
                version = %schedule.version,
                boundary = %gap.boundary,
                stated = %gap.stated,
                implied = %gap.implied,
                "Tax bracket base disagrees with the rate below it"
            );
        }
        for gap in schedule.health_insurance.continuity_gaps() {
            warn!(
                version = %schedule.version,
                field = %gap.field,
                boundary = %gap.boundary,
                stated = %gap.stated,
                implied = %gap.implied,
                "Health-insurance fixed amount disagrees with its rate"
            );
        }
    }

    /// Returns the underlying schedule registry.
    pub fn registry(&self) -> &ScheduleRegistry {
        &self.registry
    }

    /// Gets a schedule by its version key.
    ///
    /// # Returns
    ///
    /// Returns the schedule if found, or `ScheduleNotFound` error.
    pub fn get_schedule(&self, version: &str) -> EngineResult<&PayrollSchedule> {
        self.registry
            .get(version)
            .ok_or_else(|| EngineError::ScheduleNotFound {
                version: version.to_string(),
            })
    }

    /// Gets the schedule in force on a given date.
    ///
    /// The method finds the most recent schedule that is effective on or
    /// before the given date.
    pub fn schedule_on(&self, date: NaiveDate) -> EngineResult<&PayrollSchedule> {
        self.registry
            .effective_on(date)
            .ok_or(EngineError::ScheduleNotEffective { date })
    }

    /// Gets the most recent schedule.
    pub fn latest_schedule(&self) -> EngineResult<&PayrollSchedule> {
        self.registry
            .latest()
            .ok_or_else(|| EngineError::ScheduleNotFound {
                version: "latest".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const MINIMAL_SCHEDULE: &str = r#"
version: "test"
name: "Test schedule"
effective_date: "2030-01-01"
social_security:
  legal_basis: "RA 11199"
  employee_rate: "0.05"
  base_step: "500"
  low_threshold: "5250"
  min_base: "5000"
  high_threshold: "34750"
  max_base: "35000"
health_insurance:
  legal_basis: "RA 11223"
  rate: "0.025"
  lower_floor: "10000"
  minimum: "250"
  upper_ceiling: "100000"
  maximum: "2500"
housing_fund:
  legal_basis: "RA 9679"
  low_cutoff: "1500"
  low_rate: "0.01"
  high_rate: "0.02"
  cap: "200"
income_tax:
  legal_basis: "RA 10963"
  brackets:
    - { lower_bound: "0", base_tax: "0", rate: "0" }
    - { lower_bound: "20833", base_tax: "0", rate: "0.15" }
"#;

    #[test]
    fn test_load_builtin_schedules() {
        let result = ConfigLoader::builtin();
        assert!(result.is_ok(), "Failed to load schedules: {:?}", result.err());

        let loader = result.unwrap();
        let versions: Vec<&str> = loader.registry().versions().collect();
        assert_eq!(versions, vec!["2022", "2023", "2024", "2025"]);
    }

    #[test]
    fn test_get_schedule_2023_values() {
        let loader = ConfigLoader::builtin().unwrap();
        let schedule = loader.get_schedule("2023").unwrap();

        assert_eq!(schedule.effective_date, date(2023, 1, 1));
        assert_eq!(schedule.social_security.employee_rate, dec("0.045"));
        assert_eq!(schedule.social_security.min_base, dec("4000"));
        assert_eq!(schedule.social_security.max_base, dec("30000"));
        assert_eq!(schedule.health_insurance.maximum, dec("1600"));
        assert_eq!(schedule.housing_fund.cap, dec("100"));
        assert_eq!(schedule.income_tax.brackets().len(), 6);
        assert_eq!(
            schedule.income_tax.brackets()[5].base_tax,
            dec("183541.80")
        );
    }

    #[test]
    fn test_get_schedule_unknown_returns_error() {
        let loader = ConfigLoader::builtin().unwrap();

        match loader.get_schedule("1999") {
            Err(EngineError::ScheduleNotFound { version }) => assert_eq!(version, "1999"),
            other => panic!("Expected ScheduleNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_schedule_on_picks_most_recent_effective() {
        let loader = ConfigLoader::builtin().unwrap();

        assert_eq!(loader.schedule_on(date(2022, 12, 31)).unwrap().version, "2022");
        assert_eq!(loader.schedule_on(date(2023, 1, 1)).unwrap().version, "2023");
        assert_eq!(loader.schedule_on(date(2024, 6, 15)).unwrap().version, "2024");
        assert_eq!(loader.schedule_on(date(2031, 1, 1)).unwrap().version, "2025");
    }

    #[test]
    fn test_schedule_on_before_any_effective_date_returns_error() {
        let loader = ConfigLoader::builtin().unwrap();

        match loader.schedule_on(date(2020, 1, 1)) {
            Err(EngineError::ScheduleNotEffective { date: d }) => {
                assert_eq!(d, date(2020, 1, 1));
            }
            other => panic!("Expected ScheduleNotEffective error, got {:?}", other),
        }
    }

    #[test]
    fn test_latest_schedule_is_2025() {
        let loader = ConfigLoader::builtin().unwrap();
        assert_eq!(loader.latest_schedule().unwrap().version, "2025");
    }

    #[test]
    fn test_builtin_2023_onward_tax_tables_are_continuous() {
        let loader = ConfigLoader::builtin().unwrap();
        for version in ["2023", "2024", "2025"] {
            let schedule = loader.get_schedule(version).unwrap();
            assert!(
                schedule.income_tax.continuity_gaps().is_empty(),
                "{} tax table has gaps",
                version
            );
            assert!(schedule.health_insurance.continuity_gaps().is_empty());
        }
    }

    #[test]
    fn test_builtin_2022_tax_table_keeps_published_base() {
        let loader = ConfigLoader::builtin().unwrap();
        let schedule = loader.get_schedule("2022").unwrap();

        let gaps = schedule.income_tax.continuity_gaps();
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].boundary, dec("66667"));
        assert_eq!(gaps[0].stated, dec("10833.33"));
    }

    #[test]
    fn test_parse_minimal_schedule() {
        let schedule = ConfigLoader::parse_schedule("test.yaml", MINIMAL_SCHEDULE).unwrap();

        assert_eq!(schedule.version, "test");
        assert_eq!(schedule.source_url, None);
        assert_eq!(schedule.housing_fund.cap, dec("200"));
    }

    #[test]
    fn test_parse_invalid_yaml_returns_parse_error() {
        match ConfigLoader::parse_schedule("broken.yaml", "version: [unclosed") {
            Err(EngineError::ConfigParseError { source_name, .. }) => {
                assert_eq!(source_name, "broken.yaml");
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_missing_field_returns_parse_error() {
        let yaml = "version: \"x\"\nname: \"x\"\neffective_date: \"2030-01-01\"\n";
        let result = ConfigLoader::parse_schedule("partial.yaml", yaml);
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
    }

    #[test]
    fn test_parse_unordered_brackets_is_rejected() {
        let yaml = MINIMAL_SCHEDULE.replace("\"20833\"", "\"0\"");
        match ConfigLoader::parse_schedule("bad.yaml", &yaml) {
            Err(EngineError::ConfigParseError {
                source_name,
                message,
            }) => {
                assert_eq!(source_name, "bad.yaml");
                assert!(message.contains("strictly increasing"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_taxed_first_bracket_is_rejected() {
        let yaml = MINIMAL_SCHEDULE.replace(
            "{ lower_bound: \"0\", base_tax: \"0\", rate: \"0\" }",
            "{ lower_bound: \"0\", base_tax: \"5\", rate: \"0.10\" }",
        );
        match ConfigLoader::parse_schedule("taxed.yaml", &yaml) {
            Err(EngineError::ConfigParseError { message, .. }) => {
                assert!(message.contains("tax-free"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rate_above_one_returns_invalid_schedule() {
        let yaml = MINIMAL_SCHEDULE.replace("high_rate: \"0.02\"", "high_rate: \"2\"");
        match ConfigLoader::parse_schedule("bad.yaml", &yaml) {
            Err(EngineError::InvalidSchedule { schedule, message }) => {
                assert_eq!(schedule, "test/housing_fund");
                assert!(message.contains("high_rate"));
            }
            other => panic!("Expected InvalidSchedule, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_versions_rejected() {
        let result = ConfigLoader::from_documents(&[
            ("a.yaml", MINIMAL_SCHEDULE),
            ("b.yaml", MINIMAL_SCHEDULE),
        ]);
        match result {
            Err(EngineError::InvalidSchedule { message, .. }) => {
                assert!(message.contains("b.yaml"));
            }
            other => panic!("Expected InvalidSchedule, got {:?}", other),
        }
    }

    #[test]
    fn test_no_documents_rejected() {
        assert!(ConfigLoader::from_documents(&[]).is_err());
    }
}
