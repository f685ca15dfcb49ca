//! Configuration management and validation.
//!
//! A [`PipelineConfig`] names the raw sources and carries the correction
//! tables for both remediation pipelines. It is passed explicitly to each
//! processor; nothing here is global.

use crate::constants::{
    DEFAULT_COLUMN_SWAP, DEFAULT_DB_PATH, DEFAULT_POLLUTION_PATTERN, DEFAULT_RAINFALL_PATTERN,
    DEFAULT_SQL_QUERY, DEFAULT_TEMPERATURE_PATTERN, DEFAULT_VALUE_FIXES, DEFAULT_WEATHER_CSV,
    DEFAULT_WEATHER_MAPPING_CSV,
};
use crate::error::{MajiError, Result};
use crate::models::{MeasurementKind, RowPolicy};
use crate::processor::weather::PatternSet;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

const SQLITE_URL_PREFIX: &str = "sqlite:///";

/// Configuration for one remediation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Query joining the survey feature tables on Field_ID
    pub sql_query: String,

    /// SQLite database locator, plain path or `sqlite:///` URL
    pub db_path: String,

    /// Header corrections, old header -> new header, applied simultaneously
    pub columns_to_rename: HashMap<String, String>,

    /// Crop value corrections, malformed -> canonical
    pub values_to_rename: HashMap<String, String>,

    /// URL or path of the raw weather messages
    pub weather_csv_path: String,

    /// URL or path of the station-to-field mapping
    pub weather_mapping_csv: String,

    /// Measurement kind name -> pattern with a numeric capture group
    pub regex_patterns: HashMap<String, String>,

    #[serde(default)]
    pub field_row_policy: RowPolicy,

    #[serde(default)]
    pub weather_row_policy: RowPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let to_map = |pairs: &[(&str, &str)]| {
            pairs
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect::<HashMap<_, _>>()
        };

        let regex_patterns = [
            (MeasurementKind::Rainfall, DEFAULT_RAINFALL_PATTERN),
            (MeasurementKind::Temperature, DEFAULT_TEMPERATURE_PATTERN),
            (MeasurementKind::PollutionLevel, DEFAULT_POLLUTION_PATTERN),
        ]
        .into_iter()
        .map(|(kind, pattern)| (kind.as_str().to_string(), pattern.to_string()))
        .collect();

        Self {
            sql_query: DEFAULT_SQL_QUERY.to_string(),
            db_path: DEFAULT_DB_PATH.to_string(),
            columns_to_rename: to_map(DEFAULT_COLUMN_SWAP),
            values_to_rename: to_map(DEFAULT_VALUE_FIXES),
            weather_csv_path: DEFAULT_WEATHER_CSV.to_string(),
            weather_mapping_csv: DEFAULT_WEATHER_MAPPING_CSV.to_string(),
            regex_patterns,
            field_row_policy: RowPolicy::Drop,
            weather_row_policy: RowPolicy::Drop,
        }
    }
}

impl PipelineConfig {
    /// Load and validate a TOML configuration file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            MajiError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&text)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate TOML configuration text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| MajiError::config(e.message().to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every key the pipelines rely on
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("sql_query", &self.sql_query),
            ("db_path", &self.db_path),
            ("weather_csv_path", &self.weather_csv_path),
            ("weather_mapping_csv", &self.weather_mapping_csv),
        ] {
            if value.trim().is_empty() {
                return Err(MajiError::config(format!("'{}' must not be empty", key)));
            }
        }

        let mut targets = HashSet::new();
        for (from, to) in &self.columns_to_rename {
            if from.is_empty() || to.is_empty() {
                return Err(MajiError::config(
                    "'columns_to_rename' contains an empty header",
                ));
            }
            if !targets.insert(to.as_str()) {
                return Err(MajiError::config(format!(
                    "'columns_to_rename' maps more than one header to '{}'",
                    to
                )));
            }
        }

        if self.values_to_rename.keys().any(String::is_empty) {
            return Err(MajiError::config(
                "'values_to_rename' contains an empty source value",
            ));
        }

        // Compiling checks presence, syntax and capture groups of every pattern
        PatternSet::from_config(self)?;
        Ok(())
    }

    /// Filesystem path of the SQLite database
    pub fn database_path(&self) -> PathBuf {
        let locator = self.db_path.trim();
        PathBuf::from(locator.strip_prefix(SQLITE_URL_PREFIX).unwrap_or(locator))
    }

    pub fn with_db_path(mut self, db_path: impl Into<String>) -> Self {
        self.db_path = db_path.into();
        self
    }

    pub fn with_sql_query(mut self, sql_query: impl Into<String>) -> Self {
        self.sql_query = sql_query.into();
        self
    }

    pub fn with_weather_csv_path(mut self, location: impl Into<String>) -> Self {
        self.weather_csv_path = location.into();
        self
    }

    pub fn with_weather_mapping_csv(mut self, location: impl Into<String>) -> Self {
        self.weather_mapping_csv = location.into();
        self
    }

    pub fn with_field_row_policy(mut self, policy: RowPolicy) -> Self {
        self.field_row_policy = policy;
        self
    }

    pub fn with_weather_row_policy(mut self, policy: RowPolicy) -> Self {
        self.weather_row_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const MINIMAL_TOML: &str = r#"
sql_query = "SELECT * FROM geographic_features"
db_path = "sqlite:///survey.db"
weather_csv_path = "weather.csv"
weather_mapping_csv = "mapping.csv"

[columns_to_rename]
Annual_yield = "Crop_type"
Crop_type = "Annual_yield"

[values_to_rename]
cassaval = "cassava"

[regex_patterns]
Rainfall = '(\d+(\.\d+)?)\s?mm'
Temperature = '(\d+(\.\d+)?)\s?C'
Pollution_level = '=\s*(-?\d+(\.\d+)?)|Pollution at \s*(-?\d+(\.\d+)?)'
"#;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        config.validate().unwrap();
        assert_eq!(config.columns_to_rename["Crop_type"], "Annual_yield");
        assert_eq!(config.values_to_rename["teaa"], "tea");
    }

    #[test]
    fn test_toml_config_parsing() {
        let config = PipelineConfig::from_toml_str(MINIMAL_TOML).unwrap();
        assert_eq!(config.database_path(), PathBuf::from("survey.db"));
        assert_eq!(config.field_row_policy, RowPolicy::Drop);
        assert_eq!(config.regex_patterns.len(), 3);
    }

    #[test]
    fn test_row_policy_from_toml() {
        let text = format!("field_row_policy = \"reject\"\n{}", MINIMAL_TOML);
        let config = PipelineConfig::from_toml_str(&text).unwrap();
        assert_eq!(config.field_row_policy, RowPolicy::Reject);
        assert_eq!(config.weather_row_policy, RowPolicy::Drop);
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let text = MINIMAL_TOML.replace("db_path = \"sqlite:///survey.db\"\n", "");
        let err = PipelineConfig::from_toml_str(&text).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_unknown_measurement_is_config_error() {
        let text = format!("{}Humidity = '(\\d+)%'\n", MINIMAL_TOML);
        let err = PipelineConfig::from_toml_str(&text).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_duplicate_rename_target_rejected() {
        let mut config = PipelineConfig::default();
        config
            .columns_to_rename
            .insert("Yield".to_string(), "Crop_type".to_string());
        assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::Config);
    }

    #[test]
    fn test_database_path_accepts_plain_paths() {
        let config = PipelineConfig::default().with_db_path("/tmp/survey.db");
        assert_eq!(config.database_path(), PathBuf::from("/tmp/survey.db"));

        let config = PipelineConfig::default().with_db_path("sqlite:////tmp/survey.db");
        assert_eq!(config.database_path(), PathBuf::from("/tmp/survey.db"));
    }
}
