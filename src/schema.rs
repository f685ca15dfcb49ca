//! Schema checks and typed column access.
//!
//! Raw tables arrive with whatever columns the source produced. These helpers
//! check a frame against an expected column list, put columns in output
//! order, and pull typed values out of a column regardless of how the
//! source encoded it.

use crate::error::{MajiError, Result};
use polars::prelude::*;
use std::collections::HashSet;
use tracing::debug;

/// Column names of a frame, in order
pub fn column_names(frame: &DataFrame) -> Vec<String> {
    frame
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

/// Fail if any of `required` is absent from the frame
pub fn require_columns(table: &str, frame: &DataFrame, required: &[&str]) -> Result<()> {
    let present: HashSet<String> = column_names(frame).into_iter().collect();
    let missing: Vec<String> = required
        .iter()
        .filter(|name| !present.contains(**name))
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(MajiError::SchemaMismatch {
            table: table.to_string(),
            missing,
            unexpected: vec![],
        })
    }
}

/// Fail unless the frame holds exactly the `expected` columns, in any order
pub fn check_columns(table: &str, frame: &DataFrame, expected: &[&str]) -> Result<()> {
    let names = column_names(frame);
    let expected_set: HashSet<&str> = expected.iter().copied().collect();

    let mut seen = HashSet::new();
    let mut unexpected = Vec::new();
    for name in &names {
        if !expected_set.contains(name.as_str()) || !seen.insert(name.as_str()) {
            unexpected.push(name.clone());
        }
    }
    let missing: Vec<String> = expected
        .iter()
        .filter(|name| !seen.contains(**name))
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() && unexpected.is_empty() {
        Ok(())
    } else {
        Err(MajiError::SchemaMismatch {
            table: table.to_string(),
            missing,
            unexpected,
        })
    }
}

/// Check the column set and reorder to the expected output order
pub fn conform(table: &str, frame: &DataFrame, expected: &[&str]) -> Result<DataFrame> {
    check_columns(table, frame, expected)?;
    let ordered = frame.select(expected.iter().copied())?;
    debug!("Conformed {} table to {} columns", table, expected.len());
    Ok(ordered)
}

/// Values of a column as floats; entries that cannot be read as numbers become `None`
pub fn f64_values(frame: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = frame
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(series.f64()?.into_iter().collect())
}

/// Values of a column as integers
pub fn i64_values(frame: &DataFrame, name: &str) -> Result<Vec<Option<i64>>> {
    let series = frame
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Int64)?;
    Ok(series.i64()?.into_iter().collect())
}

/// Values of a column rendered as strings
pub fn string_values(frame: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = frame
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    Ok(series
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}
