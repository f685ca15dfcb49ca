//! Property checks over the cleaned tables.
//!
//! These checks look only at the output frames, the way a downstream
//! consumer would, and collect every violation instead of stopping at the
//! first one.

use crate::constants::{field_columns, is_known_crop, weather_columns};
use crate::error::Result;
use crate::models::MeasurementKind;
use crate::schema::{column_names, f64_values, string_values};
use polars::prelude::DataFrame;
use serde::Serialize;

/// A single failed property
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub check: &'static str,
    pub detail: String,
}

/// Outcome of checking one table
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub table: String,
    pub rows: usize,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    fn new(table: &str, rows: usize) -> Self {
        Self {
            table: table.to_string(),
            rows,
            violations: Vec::new(),
        }
    }

    fn fail(&mut self, check: &'static str, detail: impl Into<String>) {
        self.violations.push(Violation {
            check,
            detail: detail.into(),
        });
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

fn check_shape(report: &mut ValidationReport, frame: &DataFrame, expected: &[&str]) -> bool {
    if frame.height() == 0 {
        report.fail("non_empty", "table has no rows");
    }

    let names = column_names(frame);
    if names != expected {
        report.fail(
            "columns",
            format!("expected {:?}, found {:?}", expected, names),
        );
        return false;
    }
    true
}

/// Check the cleaned field table
pub fn check_field_frame(frame: &DataFrame) -> Result<ValidationReport> {
    let mut report = ValidationReport::new("field", frame.height());
    if !check_shape(&mut report, frame, field_columns::ALL) {
        return Ok(report);
    }

    for (row, elevation) in f64_values(frame, field_columns::ELEVATION)?
        .into_iter()
        .enumerate()
    {
        match elevation {
            Some(value) if value >= 0.0 => {}
            other => report.fail(
                "non_negative_elevation",
                format!("row {}: Elevation {:?}", row, other),
            ),
        }
    }

    for (row, crop) in string_values(frame, field_columns::CROP_TYPE)?
        .into_iter()
        .enumerate()
    {
        if !crop.as_deref().is_some_and(is_known_crop) {
            report.fail(
                "crop_vocabulary",
                format!("row {}: Crop_type {:?}", row, crop),
            );
        }
    }

    Ok(report)
}

/// Check the narrow weather measurement table
pub fn check_weather_frame(frame: &DataFrame) -> Result<ValidationReport> {
    let mut report = ValidationReport::new("weather", frame.height());
    if !check_shape(&mut report, frame, weather_columns::ALL) {
        return Ok(report);
    }

    let kinds = string_values(frame, weather_columns::MEASUREMENT)?;
    let values = f64_values(frame, weather_columns::VALUE)?;

    for (row, (kind, value)) in kinds.into_iter().zip(values).enumerate() {
        let parsed = kind.as_deref().map(str::parse::<MeasurementKind>);
        match parsed {
            Some(Ok(MeasurementKind::Rainfall)) => {
                if !value.is_some_and(|v| v >= 0.0) {
                    report.fail(
                        "non_negative_rainfall",
                        format!("row {}: Rainfall {:?}", row, value),
                    );
                }
            }
            Some(Ok(_)) => {}
            _ => report.fail(
                "measurement_kind",
                format!("row {}: Measurement {:?}", row, kind),
            ),
        }
    }

    Ok(report)
}
