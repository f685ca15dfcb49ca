//! Weather remediation pipeline.
//!
//! Free-text sensor messages are classified by testing an ordered list of
//! `(MeasurementKind, Regex)` pairs and the first numeric capture becomes the
//! reading. Each wide message row becomes one narrow typed measurement.

use crate::config::PipelineConfig;
use crate::constants::weather_columns;
use crate::error::{MajiError, Result};
use crate::models::{MeasurementKind, RejectedRow, RowPolicy, WeatherMeasurement};
use crate::schema::{require_columns, string_values};
use polars::prelude::*;
use regex::Regex;
use tracing::{debug, info, warn};

/// Compiled classification patterns in priority order
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<(MeasurementKind, Regex)>,
}

impl PatternSet {
    /// Compile `regex_patterns`, ordering them by [`MeasurementKind::PRIORITY`]
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        for name in config.regex_patterns.keys() {
            name.parse::<MeasurementKind>()
                .map_err(|e| MajiError::config(format!("regex_patterns: {}", e)))?;
        }

        let mut patterns = Vec::with_capacity(MeasurementKind::PRIORITY.len());
        for kind in MeasurementKind::PRIORITY {
            let source = config.regex_patterns.get(kind.as_str()).ok_or_else(|| {
                MajiError::config(format!("regex_patterns: no pattern for '{}'", kind))
            })?;
            patterns.push((kind, compile_pattern(kind, source)?));
        }

        Ok(Self { patterns })
    }

    /// Kinds in the order they are tested
    pub fn kinds(&self) -> Vec<MeasurementKind> {
        self.patterns.iter().map(|(kind, _)| *kind).collect()
    }

    /// Classify one message and extract its reading.
    ///
    /// The first pattern that matches decides the kind, even if its capture
    /// turns out not to be a number.
    pub fn classify(&self, message: &str) -> std::result::Result<(MeasurementKind, f64), String> {
        for (kind, regex) in &self.patterns {
            let Some(captures) = regex.captures(message) else {
                continue;
            };

            // The first group that took part in the match holds the number
            let text = captures
                .iter()
                .skip(1)
                .flatten()
                .next()
                .map(|m| m.as_str())
                .ok_or_else(|| format!("{} pattern matched without a capture", kind))?;

            let value = text
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("{} reading '{}' is not a number", kind, text))?;
            return Ok((*kind, value));
        }

        Err("no measurement pattern matches".to_string())
    }
}

fn compile_pattern(kind: MeasurementKind, source: &str) -> Result<Regex> {
    let regex = Regex::new(source)
        .map_err(|e| MajiError::config(format!("regex_patterns.{}: {}", kind, e)))?;

    if regex.captures_len() < 2 {
        return Err(MajiError::config(format!(
            "regex_patterns.{}: pattern has no capture group",
            kind
        )));
    }
    Ok(regex)
}

/// Cleaned, narrow weather measurements
#[derive(Debug, Clone)]
pub struct WeatherDataset {
    measurements: Vec<WeatherMeasurement>,
    rejected: Vec<RejectedRow>,
}

impl WeatherDataset {
    pub fn measurements(&self) -> &[WeatherMeasurement] {
        &self.measurements
    }

    /// Raw rows left out of the output
    pub fn rejected(&self) -> &[RejectedRow] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// Measurements as a `[Weather_station_ID, Message, Measurement, Value]` frame
    pub fn to_frame(&self) -> Result<DataFrame> {
        let stations: Vec<&str> = self
            .measurements
            .iter()
            .map(|m| m.weather_station_id.as_str())
            .collect();
        let messages: Vec<&str> = self.measurements.iter().map(|m| m.message.as_str()).collect();
        let kinds: Vec<&str> = self
            .measurements
            .iter()
            .map(|m| m.measurement.as_str())
            .collect();
        let values: Vec<f64> = self.measurements.iter().map(|m| m.value).collect();

        let frame = DataFrame::new(vec![
            Series::new(weather_columns::STATION_ID.into(), stations).into(),
            Series::new(weather_columns::MESSAGE.into(), messages).into(),
            Series::new(weather_columns::MEASUREMENT.into(), kinds).into(),
            Series::new(weather_columns::VALUE.into(), values).into(),
        ])?;
        Ok(frame)
    }
}

/// Turns raw weather messages into typed measurements
#[derive(Debug, Clone)]
pub struct WeatherProcessor {
    raw: DataFrame,
    patterns: PatternSet,
    policy: RowPolicy,
}

impl WeatherProcessor {
    pub fn new(raw: DataFrame, config: &PipelineConfig) -> Result<Self> {
        require_columns("weather messages", &raw, weather_columns::RAW)?;
        let patterns = PatternSet::from_config(config)?;
        Ok(Self {
            raw,
            patterns,
            policy: config.weather_row_policy,
        })
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    /// Classify every message; the raw table is left untouched
    pub fn process(&self) -> Result<WeatherDataset> {
        let stations = string_values(&self.raw, weather_columns::STATION_ID)?;
        let messages = string_values(&self.raw, weather_columns::MESSAGE)?;

        let mut measurements = Vec::with_capacity(messages.len());
        let mut rejected = Vec::new();

        for (row, (station, message)) in stations.into_iter().zip(messages).enumerate() {
            let message = message.unwrap_or_default();

            let Some(station) = station else {
                self.reject(
                    row,
                    MajiError::data_quality(row, "missing Weather_station_ID"),
                    &mut rejected,
                )?;
                continue;
            };

            let (kind, value) = match self.patterns.classify(&message) {
                Ok(reading) => reading,
                Err(reason) => {
                    let error = MajiError::Parse {
                        row,
                        message: message.clone(),
                        reason,
                    };
                    self.reject(row, error, &mut rejected)?;
                    continue;
                }
            };

            if value < 0.0 && !kind.allows_negative() {
                let error =
                    MajiError::data_quality(row, format!("negative {} value {}", kind, value));
                self.reject(row, error, &mut rejected)?;
                continue;
            }

            measurements.push(WeatherMeasurement {
                weather_station_id: station,
                message,
                measurement: kind,
                value,
            });
        }

        info!(
            "Weather remediation complete: {} messages -> {} measurements ({} rejected)",
            self.raw.height(),
            measurements.len(),
            rejected.len()
        );

        Ok(WeatherDataset {
            measurements,
            rejected,
        })
    }

    /// Apply the row policy to a failing row
    fn reject(&self, row: usize, error: MajiError, rejected: &mut Vec<RejectedRow>) -> Result<()> {
        match self.policy {
            RowPolicy::Reject => Err(error),
            RowPolicy::Drop => {
                warn!("Dropping weather row {}: {}", row, error);
                let kind = error.kind();
                let reason = match error {
                    MajiError::Parse { reason, .. } | MajiError::DataQuality { reason, .. } => {
                        reason
                    }
                    other => other.to_string(),
                };
                debug!("Recorded rejected row {} as {:?}", row, kind);
                rejected.push(RejectedRow { row, kind, reason });
                Ok(())
            }
        }
    }
}

