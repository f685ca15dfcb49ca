//! Core data structures for field and weather remediation.
//!
//! Defines measurement kinds, typed output records, row policies and the
//! record of rows a pipeline refused to pass through.

use crate::error::ErrorKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of reading embedded in a weather message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasurementKind {
    Rainfall,
    Temperature,
    #[serde(rename = "Pollution_level")]
    PollutionLevel,
}

impl MeasurementKind {
    /// Classification priority, highest first
    pub const PRIORITY: [MeasurementKind; 3] = [
        MeasurementKind::Rainfall,
        MeasurementKind::Temperature,
        MeasurementKind::PollutionLevel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementKind::Rainfall => "Rainfall",
            MeasurementKind::Temperature => "Temperature",
            MeasurementKind::PollutionLevel => "Pollution_level",
        }
    }

    /// Whether readings of this kind can legitimately be below zero
    pub fn allows_negative(&self) -> bool {
        matches!(self, MeasurementKind::PollutionLevel)
    }
}

impl fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeasurementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MeasurementKind::PRIORITY
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown measurement kind '{}'", s))
    }
}

/// One parsed weather reading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherMeasurement {
    pub weather_station_id: String,
    pub message: String,
    pub measurement: MeasurementKind,
    pub value: f64,
}

/// One cleaned field survey row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldRecord {
    pub field_id: Option<i64>,
    pub elevation: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location: Option<String>,
    pub slope: Option<f64>,
    pub rainfall: Option<f64>,
    pub min_temperature_c: Option<f64>,
    pub max_temperature_c: Option<f64>,
    pub ave_temps: Option<f64>,
    pub soil_fertility: Option<f64>,
    pub soil_type: Option<String>,
    pub ph: Option<f64>,
    pub pollution_level: Option<f64>,
    pub plot_size: Option<f64>,
    pub annual_yield: Option<f64>,
    pub crop_type: Option<String>,
    pub standard_yield: Option<f64>,
    pub row_origin: Option<i64>,
    pub weather_station: Option<i64>,
}

/// What a pipeline does with a row that fails parsing or validation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowPolicy {
    /// Remove the row and record it as rejected
    #[default]
    Drop,
    /// Abort the whole batch on the first offending row
    Reject,
}

/// A row removed from the output under [`RowPolicy::Drop`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRow {
    /// Zero-based position in the raw input
    pub row: usize,
    pub kind: ErrorKind,
    pub reason: String,
}

/// Number of rejected rows of one kind
pub fn rejected_count(rows: &[RejectedRow], kind: ErrorKind) -> usize {
    rows.iter().filter(|row| row.kind == kind).count()
}
