//! Tests for the field remediation pipeline

use super::*;
use crate::constants::field_columns;
use crate::error::ErrorKind;
use crate::models::RowPolicy;
use crate::processor::field::{FieldProcessor, RemediationRule};
use crate::schema::{column_names, f64_values, string_values};
use std::collections::HashMap;

#[test]
fn test_swapped_columns_are_restored() {
    let raw = create_raw_field_frame(&[field_row(1, 512.0, "maize", 0.75)]);
    let dataset = FieldProcessor::new(raw, &test_config()).process().unwrap();

    let frame = dataset.frame();
    assert_eq!(
        string_values(frame, field_columns::CROP_TYPE).unwrap(),
        vec![Some("maize".to_string())]
    );
    assert_eq!(
        f64_values(frame, field_columns::ANNUAL_YIELD).unwrap(),
        vec![Some(0.75)]
    );
}

#[test]
fn test_cassaval_typo_is_corrected_after_swap() {
    let raw = create_raw_field_frame(&[
        field_row(1, 512.0, "cassaval", 0.75),
        field_row(2, 300.0, "wheatn", 1.1),
        field_row(3, 120.0, "teaa", 0.4),
    ]);
    let dataset = FieldProcessor::new(raw, &test_config()).process().unwrap();

    assert_eq!(
        string_values(dataset.frame(), field_columns::CROP_TYPE).unwrap(),
        vec![
            Some("cassava".to_string()),
            Some("wheat".to_string()),
            Some("tea".to_string())
        ]
    );
    assert!(dataset.rejected().is_empty());
}

#[test]
fn test_output_column_order() {
    let raw = create_raw_field_frame(&[field_row(1, 512.0, "rice", 0.75)]);
    let dataset = FieldProcessor::new(raw, &test_config()).process().unwrap();
    assert_eq!(column_names(dataset.frame()), field_columns::ALL);
}

#[test]
fn test_process_is_idempotent() {
    let raw = create_raw_field_frame(&[
        field_row(1, 512.0, "cassaval", 0.75),
        field_row(2, 80.0, "Banana", 2.0),
    ]);
    let processor = FieldProcessor::new(raw.clone(), &test_config());

    let first = processor.process().unwrap();
    let second = processor.process().unwrap();

    assert!(first.frame().equals_missing(second.frame()));
    assert!(processor.raw().equals_missing(&raw));
}

#[test]
fn test_negative_elevation_is_dropped_and_recorded() {
    let raw = create_raw_field_frame(&[
        field_row(1, 512.0, "maize", 0.75),
        field_row(2, -10.0, "maize", 0.5),
    ]);
    let dataset = FieldProcessor::new(raw, &test_config()).process().unwrap();

    assert_eq!(dataset.len(), 1);
    assert_eq!(dataset.rejected().len(), 1);
    assert_eq!(dataset.rejected()[0].row, 1);
    assert_eq!(dataset.rejected()[0].kind, ErrorKind::DataQuality);
    assert!(
        f64_values(dataset.frame(), field_columns::ELEVATION)
            .unwrap()
            .iter()
            .all(|e| e.is_some_and(|v| v >= 0.0))
    );
}

#[test]
fn test_negative_elevation_rejects_batch() {
    let raw = create_raw_field_frame(&[field_row(7, -10.0, "maize", 0.75)]);
    let config = test_config().with_field_row_policy(RowPolicy::Reject);

    let err = FieldProcessor::new(raw, &config).process().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataQuality);
}

#[test]
fn test_unknown_crop_is_dropped() {
    let raw = create_raw_field_frame(&[
        field_row(1, 10.0, "sorghum", 0.75),
        field_row(2, 10.0, "COFFEE", 0.9),
    ]);
    let dataset = FieldProcessor::new(raw, &test_config()).process().unwrap();

    let records = dataset.records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].field_id, Some(2));
    assert_eq!(records[0].crop_type.as_deref(), Some("COFFEE"));
    assert!(dataset.rejected()[0].reason.contains("sorghum"));
}

#[test]
fn test_typed_records() {
    let raw = create_raw_field_frame(&[field_row(42, 512.5, "potato", 1.25)]);
    let dataset = FieldProcessor::new(raw, &test_config()).process().unwrap();
    let records = dataset.records().unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.field_id, Some(42));
    assert_eq!(record.elevation, Some(512.5));
    assert_eq!(record.annual_yield, Some(1.25));
    assert_eq!(record.crop_type.as_deref(), Some("potato"));
    assert_eq!(record.location.as_deref(), Some("Rural_Akatsi"));
    assert_eq!(record.row_origin, Some(0));
    assert_eq!(record.weather_station, Some(4));
}

#[test]
fn test_missing_column_is_schema_mismatch() {
    let raw = create_raw_field_frame(&[field_row(1, 10.0, "maize", 0.75)])
        .drop("Slope")
        .unwrap();
    let err = FieldProcessor::new(raw, &test_config())
        .process()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SchemaMismatch);
}

#[test]
fn test_replace_rule_alone_targets_named_column() {
    // Without the swap, the crop strings still sit under Annual_yield
    let raw = create_raw_field_frame(&[field_row(1, 10.0, "cassaval", 0.75)]);
    let rule = RemediationRule::ReplaceValues {
        column: "Annual_yield".to_string(),
        mapping: HashMap::from([("cassaval".to_string(), "cassava".to_string())]),
    };

    let fixed = rule.apply(&raw).unwrap();
    assert_eq!(
        string_values(&fixed, "Annual_yield").unwrap(),
        vec![Some("cassava".to_string())]
    );
    // Numeric column is left alone
    let untouched = RemediationRule::ReplaceValues {
        column: "Crop_type".to_string(),
        mapping: HashMap::new(),
    }
    .apply(&raw)
    .unwrap();
    assert!(untouched.equals_missing(&raw));
}

#[test]
fn test_rename_collision_is_schema_mismatch() {
    let raw = create_raw_field_frame(&[field_row(1, 10.0, "maize", 0.75)]);
    let rule = RemediationRule::RenameColumns(HashMap::from([(
        "Slope".to_string(),
        "Elevation".to_string(),
    )]));
    let err = rule.apply(&raw).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SchemaMismatch);
}
