//! CSV readers for the weather message and station mapping files.
//!
//! Locations beginning with `http://` or `https://` are downloaded with a
//! short-lived blocking client; anything else is read from disk.

use crate::config::PipelineConfig;
use crate::constants::{HTTP_TIMEOUT_SECS, weather_columns};
use crate::error::{MajiError, Result};
use crate::schema::require_columns;
use polars::prelude::*;
use reqwest::blocking::Client;
use std::io::Cursor;
use std::time::Duration;
use tracing::{debug, info};

/// Whether a location must be fetched over HTTP
pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Read the raw weather messages, requiring the station and message columns
pub fn read_weather_messages(config: &PipelineConfig) -> Result<DataFrame> {
    let frame = read_csv(&config.weather_csv_path)?;
    require_columns("weather messages", &frame, weather_columns::RAW)?;
    info!(
        "Loaded {} weather messages from {}",
        frame.height(),
        config.weather_csv_path
    );
    Ok(frame)
}

/// Read the station-to-field mapping as-is
pub fn read_station_mapping(config: &PipelineConfig) -> Result<DataFrame> {
    let frame = read_csv(&config.weather_mapping_csv)?;
    info!(
        "Loaded {} station mapping rows from {}",
        frame.height(),
        config.weather_mapping_csv
    );
    Ok(frame)
}

/// Fetch a CSV resource and parse it with a header row
pub fn read_csv(location: &str) -> Result<DataFrame> {
    let bytes = fetch_bytes(location)?;
    debug!("Parsing {} bytes of CSV from {}", bytes.len(), location);

    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()?;
    Ok(frame)
}

fn fetch_bytes(location: &str) -> Result<Vec<u8>> {
    if is_remote(location) {
        fetch_http(location)
    } else {
        std::fs::read(location).map_err(|e| MajiError::connection(location, e))
    }
}

fn fetch_http(url: &str) -> Result<Vec<u8>> {
    let client = Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()
        .map_err(|e| MajiError::connection(url, e))?;

    let response = client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .map_err(|e| MajiError::connection(url, e))?;

    let body = response.bytes().map_err(|e| MajiError::connection(url, e))?;
    debug!("Fetched {} bytes from {}", body.len(), url);
    Ok(body.to_vec())
}
