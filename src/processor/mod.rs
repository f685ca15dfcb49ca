//! Remediation processors and the end-to-end run.
//!
//! Loads both raw sources, runs the field and weather pipelines, and
//! reports what came out.

pub mod field;
pub mod weather;

#[cfg(test)]
pub mod tests;

pub use field::{FieldDataset, FieldProcessor, RemediationRule};
pub use weather::{PatternSet, WeatherDataset, WeatherProcessor};

use crate::config::PipelineConfig;
use crate::error::{ErrorKind, Result};
use crate::models::rejected_count;
use crate::sources;
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info};

/// Outputs of one complete run
#[derive(Debug, Clone)]
pub struct RemediationRun {
    pub field: FieldDataset,
    pub weather: WeatherDataset,
    pub station_mapping_rows: usize,
    pub processing_time_ms: u128,
}

/// Counts reported after a run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProcessingSummary {
    pub field_rows_in: usize,
    pub field_rows_out: usize,
    pub field_rows_rejected: usize,
    pub weather_messages_in: usize,
    pub weather_measurements_out: usize,
    pub weather_unparsed: usize,
    pub weather_invalid: usize,
    pub station_mapping_rows: usize,
    pub processing_time_ms: u128,
}

impl RemediationRun {
    pub fn summary(&self) -> ProcessingSummary {
        let field_rejected = self.field.rejected().len();
        let weather_rejected = self.weather.rejected();
        let weather_unparsed = rejected_count(weather_rejected, ErrorKind::Parse);

        ProcessingSummary {
            field_rows_in: self.field.len() + field_rejected,
            field_rows_out: self.field.len(),
            field_rows_rejected: field_rejected,
            weather_messages_in: self.weather.len() + weather_rejected.len(),
            weather_measurements_out: self.weather.len(),
            weather_unparsed,
            weather_invalid: weather_rejected.len() - weather_unparsed,
            station_mapping_rows: self.station_mapping_rows,
            processing_time_ms: self.processing_time_ms,
        }
    }
}

/// Load every source and run both pipelines once
pub fn run(config: &PipelineConfig) -> Result<RemediationRun> {
    let start_time = Instant::now();
    config.validate()?;

    debug!("Reading field survey from {}", config.db_path);
    let raw_fields = sources::read_field_table(config)?;
    let field = FieldProcessor::new(raw_fields, config).process()?;

    debug!("Reading weather messages from {}", config.weather_csv_path);
    let raw_weather = sources::read_weather_messages(config)?;
    let weather = WeatherProcessor::new(raw_weather, config)?.process()?;

    let station_mapping_rows = sources::read_station_mapping(config)?.height();

    let processing_time_ms = start_time.elapsed().as_millis();
    info!("Remediation run finished in {}ms", processing_time_ms);

    Ok(RemediationRun {
        field,
        weather,
        station_mapping_rows,
        processing_time_ms,
    })
}
