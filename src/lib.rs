//! Maji Ndogo Processor Library
//!
//! Repairs the Maji Ndogo agricultural survey before analysis. Two
//! pipelines run over the raw sources:
//!
//! - Field: loads the joined survey table from SQLite, restores the swapped
//!   `Annual_yield`/`Crop_type` headers, corrects crop name typos and checks
//!   elevation and crop vocabulary.
//! - Weather: loads free-text station messages from CSV and classifies each
//!   one into a typed rainfall, temperature or pollution measurement.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod processor;
pub mod schema;
pub mod sources;
pub mod validation;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use config::PipelineConfig;
pub use error::{ErrorKind, MajiError, Result};
pub use models::{FieldRecord, MeasurementKind, RejectedRow, RowPolicy, WeatherMeasurement};
pub use processor::{
    FieldDataset, FieldProcessor, ProcessingSummary, RemediationRun, WeatherDataset,
    WeatherProcessor,
};
