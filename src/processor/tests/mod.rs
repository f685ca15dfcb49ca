//! Tests for the remediation processors
//!
//! Shared fixtures build raw tables shaped like the survey export, with the
//! yield and crop headers swapped.

pub mod field_tests;

use crate::config::PipelineConfig;
use polars::prelude::*;

/// One raw survey row; `crop` and `annual_yield` are the true values
pub struct RawFieldRow {
    pub field_id: i64,
    pub elevation: f64,
    pub crop: &'static str,
    pub annual_yield: f64,
}

pub fn field_row(
    field_id: i64,
    elevation: f64,
    crop: &'static str,
    annual_yield: f64,
) -> RawFieldRow {
    RawFieldRow {
        field_id,
        elevation,
        crop,
        annual_yield,
    }
}

/// Build a raw joined table as the survey database returns it.
///
/// Crop names are written under `Annual_yield` and yields under
/// `Crop_type`, and the columns come out in join order rather than output
/// order.
pub fn create_raw_field_frame(rows: &[RawFieldRow]) -> DataFrame {
    let n = rows.len();
    let ids: Vec<i64> = rows.iter().map(|r| r.field_id).collect();
    let elevations: Vec<f64> = rows.iter().map(|r| r.elevation).collect();
    let crops: Vec<&str> = rows.iter().map(|r| r.crop).collect();
    let yields: Vec<f64> = rows.iter().map(|r| r.annual_yield).collect();
    let origin: Vec<i64> = (0..n as i64).collect();

    DataFrame::new(vec![
        Series::new("Field_ID".into(), ids).into(),
        Series::new("Elevation".into(), elevations).into(),
        Series::new("Latitude".into(), vec![-7.1; n]).into(),
        Series::new("Longitude".into(), vec![-0.2; n]).into(),
        Series::new("Location".into(), vec!["Rural_Akatsi"; n]).into(),
        Series::new("Slope".into(), vec![14.2; n]).into(),
        Series::new("Rainfall".into(), vec![1125.0; n]).into(),
        Series::new("Min_temperature_C".into(), vec![-3.1; n]).into(),
        Series::new("Max_temperature_C".into(), vec![33.1; n]).into(),
        Series::new("Ave_temps".into(), vec![15.0; n]).into(),
        Series::new("Soil_fertility".into(), vec![0.62; n]).into(),
        Series::new("Soil_type".into(), vec!["Sandy"; n]).into(),
        Series::new("pH".into(), vec![6.2; n]).into(),
        Series::new("Pollution_level".into(), vec![0.08; n]).into(),
        Series::new("Plot_size".into(), vec![0.7; n]).into(),
        Series::new("Crop_type".into(), yields).into(),
        Series::new("Annual_yield".into(), crops).into(),
        Series::new("Standard_yield".into(), vec![0.75; n]).into(),
        Series::new("Unnamed: 0".into(), origin).into(),
        Series::new("Weather_station".into(), vec![4i64; n]).into(),
    ])
    .unwrap()
}

/// Build a raw weather message table
pub fn create_raw_weather_frame(rows: &[(i64, &str)]) -> DataFrame {
    let stations: Vec<i64> = rows.iter().map(|(id, _)| *id).collect();
    let messages: Vec<&str> = rows.iter().map(|(_, msg)| *msg).collect();
    DataFrame::new(vec![
        Series::new("Weather_station_ID".into(), stations).into(),
        Series::new("Message".into(), messages).into(),
    ])
    .unwrap()
}

pub fn test_config() -> PipelineConfig {
    PipelineConfig::default()
}
