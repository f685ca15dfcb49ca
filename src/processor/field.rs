//! Field remediation pipeline.
//!
//! The survey export has two defects: the `Annual_yield` and `Crop_type`
//! headers are swapped, and some crop names carry stray characters. Both
//! are fixed by an ordered list of [`RemediationRule`]s (rename first, then
//! replace values on the corrected column) before the rows are validated.

use crate::config::PipelineConfig;
use crate::constants::{field_columns, is_known_crop};
use crate::error::{ErrorKind, MajiError, Result};
use crate::models::{FieldRecord, RejectedRow, RowPolicy};
use crate::schema::{conform, f64_values, i64_values, string_values};
use polars::prelude::*;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// One configured correction step
#[derive(Debug, Clone, PartialEq)]
pub enum RemediationRule {
    /// Rename headers, old -> new, all at once
    RenameColumns(HashMap<String, String>),
    /// Replace exact values in one column
    ReplaceValues {
        column: String,
        mapping: HashMap<String, String>,
    },
}

impl RemediationRule {
    /// Ordered rules for the survey: the header swap, then crop value fixes
    pub fn from_config(config: &PipelineConfig) -> Vec<RemediationRule> {
        vec![
            RemediationRule::RenameColumns(config.columns_to_rename.clone()),
            RemediationRule::ReplaceValues {
                column: field_columns::CROP_TYPE.to_string(),
                mapping: config.values_to_rename.clone(),
            },
        ]
    }

    /// Apply this rule, producing a new frame
    pub fn apply(&self, frame: &DataFrame) -> Result<DataFrame> {
        match self {
            RemediationRule::RenameColumns(mapping) => rename_columns(frame, mapping),
            RemediationRule::ReplaceValues { column, mapping } => {
                replace_values(frame, column, mapping)
            }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            RemediationRule::RenameColumns(mapping) => {
                let mut pairs: Vec<String> = mapping
                    .iter()
                    .map(|(from, to)| format!("{} -> {}", from, to))
                    .collect();
                pairs.sort();
                format!("rename columns [{}]", pairs.join(", "))
            }
            RemediationRule::ReplaceValues { column, mapping } => {
                format!("replace {} value(s) in {}", mapping.len(), column)
            }
        }
    }
}

fn rename_columns(frame: &DataFrame, mapping: &HashMap<String, String>) -> Result<DataFrame> {
    let renamed: Vec<String> = frame
        .get_column_names()
        .iter()
        .map(|name| {
            mapping
                .get(name.as_str())
                .cloned()
                .unwrap_or_else(|| name.to_string())
        })
        .collect();

    let mut seen = HashSet::new();
    let collisions: Vec<String> = renamed
        .iter()
        .filter(|name| !seen.insert(name.as_str()))
        .cloned()
        .collect();
    if !collisions.is_empty() {
        return Err(MajiError::SchemaMismatch {
            table: "field".to_string(),
            missing: vec![],
            unexpected: collisions,
        });
    }

    let columns: Vec<Column> = frame
        .get_columns()
        .iter()
        .zip(renamed)
        .map(|(column, name)| {
            let mut column = column.clone();
            column.rename(name.into());
            column
        })
        .collect();

    Ok(DataFrame::new(columns)?)
}

fn replace_values(
    frame: &DataFrame,
    column: &str,
    mapping: &HashMap<String, String>,
) -> Result<DataFrame> {
    let series = frame
        .column(column)
        .map_err(|_| MajiError::SchemaMismatch {
            table: "field".to_string(),
            missing: vec![column.to_string()],
            unexpected: vec![],
        })?
        .as_materialized_series();

    // A non-text column holds no typo strings to fix
    if series.dtype() != &DataType::String {
        debug!(
            "Column {} has type {}, skipping value replacement",
            column,
            series.dtype()
        );
        return Ok(frame.clone());
    }

    let mut replaced_count = 0usize;
    let replaced: StringChunked = series
        .str()?
        .into_iter()
        .map(|value| {
            value.map(|text| match mapping.get(text) {
                Some(canonical) => {
                    replaced_count += 1;
                    canonical.as_str()
                }
                None => text,
            })
        })
        .collect();

    debug!("Replaced {} value(s) in {}", replaced_count, column);

    let mut out = frame.clone();
    out.with_column(replaced.with_name(column.into()).into_series())?;
    Ok(out)
}

/// Cleaned field survey rows in output column order
#[derive(Debug, Clone)]
pub struct FieldDataset {
    frame: DataFrame,
    rejected: Vec<RejectedRow>,
}

impl FieldDataset {
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Raw rows left out of the output
    pub fn rejected(&self) -> &[RejectedRow] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Typed view of every row
    pub fn records(&self) -> Result<Vec<FieldRecord>> {
        use field_columns::*;

        let frame = &self.frame;
        let field_id = i64_values(frame, FIELD_ID)?;
        let elevation = f64_values(frame, ELEVATION)?;
        let latitude = f64_values(frame, LATITUDE)?;
        let longitude = f64_values(frame, LONGITUDE)?;
        let location = string_values(frame, LOCATION)?;
        let slope = f64_values(frame, SLOPE)?;
        let rainfall = f64_values(frame, RAINFALL)?;
        let min_temperature = f64_values(frame, MIN_TEMPERATURE)?;
        let max_temperature = f64_values(frame, MAX_TEMPERATURE)?;
        let ave_temps = f64_values(frame, AVE_TEMPS)?;
        let soil_fertility = f64_values(frame, SOIL_FERTILITY)?;
        let soil_type = string_values(frame, SOIL_TYPE)?;
        let ph = f64_values(frame, PH)?;
        let pollution_level = f64_values(frame, POLLUTION_LEVEL)?;
        let plot_size = f64_values(frame, PLOT_SIZE)?;
        let annual_yield = f64_values(frame, ANNUAL_YIELD)?;
        let crop_type = string_values(frame, CROP_TYPE)?;
        let standard_yield = f64_values(frame, STANDARD_YIELD)?;
        let row_origin = i64_values(frame, ROW_ORIGIN)?;
        let weather_station = i64_values(frame, WEATHER_STATION)?;

        Ok((0..frame.height())
            .map(|i| FieldRecord {
                field_id: field_id[i],
                elevation: elevation[i],
                latitude: latitude[i],
                longitude: longitude[i],
                location: location[i].clone(),
                slope: slope[i],
                rainfall: rainfall[i],
                min_temperature_c: min_temperature[i],
                max_temperature_c: max_temperature[i],
                ave_temps: ave_temps[i],
                soil_fertility: soil_fertility[i],
                soil_type: soil_type[i].clone(),
                ph: ph[i],
                pollution_level: pollution_level[i],
                plot_size: plot_size[i],
                annual_yield: annual_yield[i],
                crop_type: crop_type[i].clone(),
                standard_yield: standard_yield[i],
                row_origin: row_origin[i],
                weather_station: weather_station[i],
            })
            .collect())
    }
}

/// Repairs and validates the raw joined survey table
#[derive(Debug, Clone)]
pub struct FieldProcessor {
    raw: DataFrame,
    rules: Vec<RemediationRule>,
    policy: RowPolicy,
}

impl FieldProcessor {
    pub fn new(raw: DataFrame, config: &PipelineConfig) -> Self {
        Self {
            raw,
            rules: RemediationRule::from_config(config),
            policy: config.field_row_policy,
        }
    }

    /// Correction steps in the order they run
    pub fn rules(&self) -> &[RemediationRule] {
        &self.rules
    }

    /// The table as loaded, never modified
    pub fn raw(&self) -> &DataFrame {
        &self.raw
    }

    /// Run every rule against the raw table, then conform and validate.
    ///
    /// Each call starts over from the raw table, so repeated calls give the
    /// same result.
    pub fn process(&self) -> Result<FieldDataset> {
        let mut frame = self.raw.clone();
        for rule in &self.rules {
            debug!("Applying {}", rule.describe());
            frame = rule.apply(&frame)?;
        }

        let frame = conform("field", &frame, field_columns::ALL)?;
        let (frame, rejected) = self.validate(frame)?;

        info!(
            "Field remediation complete: {} rows -> {} rows ({} rejected)",
            self.raw.height(),
            frame.height(),
            rejected.len()
        );

        Ok(FieldDataset { frame, rejected })
    }

    fn validate(&self, frame: DataFrame) -> Result<(DataFrame, Vec<RejectedRow>)> {
        let elevations = f64_values(&frame, field_columns::ELEVATION)?;
        let crops = string_values(&frame, field_columns::CROP_TYPE)?;

        let mut keep = Vec::with_capacity(frame.height());
        let mut rejected = Vec::new();

        for (row, (elevation, crop)) in elevations.into_iter().zip(crops).enumerate() {
            match check_field_row(elevation, crop.as_deref()) {
                Ok(()) => keep.push(true),
                Err(reason) => {
                    if self.policy == RowPolicy::Reject {
                        return Err(MajiError::data_quality(row, reason));
                    }
                    warn!("Dropping field row {}: {}", row, reason);
                    rejected.push(RejectedRow {
                        row,
                        kind: ErrorKind::DataQuality,
                        reason,
                    });
                    keep.push(false);
                }
            }
        }

        if rejected.is_empty() {
            return Ok((frame, rejected));
        }

        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        Ok((frame.filter(&mask)?, rejected))
    }
}

/// Elevation must be present and non-negative; crop must be in the vocabulary
fn check_field_row(elevation: Option<f64>, crop: Option<&str>) -> std::result::Result<(), String> {
    match elevation {
        Some(value) if value >= 0.0 => {}
        Some(value) => return Err(format!("negative Elevation {}", value)),
        None => return Err("missing Elevation".to_string()),
    }

    match crop {
        Some(name) if is_known_crop(name) => Ok(()),
        Some(name) => Err(format!("unknown Crop_type '{}'", name)),
        None => Err("missing Crop_type".to_string()),
    }
}
