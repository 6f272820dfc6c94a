use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "LabSight";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "labsight=debug"
    } else {
        "labsight=info"
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file {0}: {1}")]
    Read(String, String),

    #[error("Invalid config file {0}: {1}")]
    Parse(String, String),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Tunable thresholds for one analysis run.
///
/// Every field has a default, so a JSON file only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Patients at or above this age get the plain-language lead-in.
    pub senior_age: u32,
    /// Normalized deviation below this is `Mild`.
    pub mild_deviation: f64,
    /// Normalized deviation below this (and not mild) is `Moderate`.
    pub moderate_deviation: f64,
    /// Category scores at or above this are `medium`.
    pub risk_medium_from: u32,
    /// Category scores at or above this are `high`.
    pub risk_high_from: u32,
    /// Prior visits included in the assistant context.
    pub history_visits: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            senior_age: 60,
            mild_deviation: 0.2,
            moderate_deviation: 0.5,
            risk_medium_from: 30,
            risk_high_from: 65,
            history_visits: 3,
        }
    }
}

impl AnalysisConfig {
    /// Load a config from a JSON file, filling missing keys with defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.display().to_string(), e.to_string()))?;
        let config: Self = serde_json::from_str(&json)
            .map_err(|e| ConfigError::Parse(path.display().to_string(), e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject threshold orderings that would make buckets unreachable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.mild_deviation > 0.0 && self.mild_deviation < self.moderate_deviation) {
            return Err(ConfigError::Invalid(format!(
                "mild_deviation ({}) must be positive and below moderate_deviation ({})",
                self.mild_deviation, self.moderate_deviation
            )));
        }
        if self.risk_medium_from >= self.risk_high_from || self.risk_high_from > 100 {
            return Err(ConfigError::Invalid(format!(
                "risk_medium_from ({}) must be below risk_high_from ({}) and both within 0-100",
                self.risk_medium_from, self.risk_high_from
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn app_name_is_labsight() {
        assert_eq!(APP_NAME, "LabSight");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn log_filter_targets_crate() {
        assert!(default_log_filter().starts_with("labsight="));
    }

    #[test]
    fn defaults_are_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.senior_age, 60);
        assert_eq!(config.history_visits, 3);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"senior_age": 65}}"#).unwrap();

        let config = AnalysisConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.senior_age, 65);
        assert_eq!(config.mild_deviation, 0.2);
        assert_eq!(config.risk_high_from, 65);
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = AnalysisConfig::from_json_file(Path::new("/nonexistent/labsight.json"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read(..)));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = AnalysisConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(..)));
    }

    #[test]
    fn inverted_thresholds_rejected() {
        let config = AnalysisConfig {
            mild_deviation: 0.6,
            ..AnalysisConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = AnalysisConfig {
            risk_medium_from: 70,
            ..AnalysisConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
