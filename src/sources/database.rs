//! SQLite reader for the joined field survey table.

use crate::config::PipelineConfig;
use crate::error::{MajiError, Result};
use polars::prelude::*;
use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags};
use std::collections::HashSet;
use tracing::{debug, info};

/// Run the configured join query and return the raw wide table
pub fn read_field_table(config: &PipelineConfig) -> Result<DataFrame> {
    let db_path = config.database_path();
    if !db_path.is_file() {
        return Err(MajiError::connection(
            db_path.display().to_string(),
            "database file not found",
        ));
    }

    let conn = Connection::open_with_flags(&db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .map_err(|e| MajiError::connection(db_path.display().to_string(), e))?;

    let frame = query_frame(&conn, &config.sql_query)?;
    info!(
        "Loaded {} field rows with {} columns from {}",
        frame.height(),
        frame.width(),
        db_path.display()
    );
    Ok(frame)
}

/// Execute `sql` and materialize the full result set as a frame
pub fn query_frame(conn: &Connection, sql: &str) -> Result<DataFrame> {
    let mut stmt = conn.prepare(sql)?;
    let names: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(String::from)
        .collect();

    let mut seen = HashSet::new();
    let duplicates: Vec<String> = names
        .iter()
        .filter(|name| !seen.insert(name.as_str()))
        .cloned()
        .collect();
    if !duplicates.is_empty() {
        return Err(MajiError::SchemaMismatch {
            table: "field query result".to_string(),
            missing: vec![],
            unexpected: duplicates,
        });
    }

    let mut values: Vec<Vec<Value>> = vec![Vec::new(); names.len()];
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        for (idx, column) in values.iter_mut().enumerate() {
            column.push(row.get::<_, Value>(idx)?);
        }
    }

    let columns: Vec<Column> = names
        .iter()
        .zip(values)
        .map(|(name, column)| sqlite_column(name, &column))
        .collect();

    debug!("Query returned {} columns", columns.len());
    Ok(DataFrame::new(columns)?)
}

/// Build a typed column from dynamically typed SQLite values.
///
/// Integer-only columns become Int64, numeric columns Float64 and anything
/// holding text or blobs becomes String. NULL is missing in every case.
fn sqlite_column(name: &str, values: &[Value]) -> Column {
    let integral = values
        .iter()
        .all(|v| matches!(v, Value::Null | Value::Integer(_)));
    let numeric = values
        .iter()
        .all(|v| matches!(v, Value::Null | Value::Integer(_) | Value::Real(_)));

    let series = if integral {
        let data: Vec<Option<i64>> = values
            .iter()
            .map(|v| match v {
                Value::Integer(i) => Some(*i),
                _ => None,
            })
            .collect();
        Series::new(name.into(), data)
    } else if numeric {
        let data: Vec<Option<f64>> = values
            .iter()
            .map(|v| match v {
                Value::Integer(i) => Some(*i as f64),
                Value::Real(f) => Some(*f),
                _ => None,
            })
            .collect();
        Series::new(name.into(), data)
    } else {
        let data: Vec<Option<String>> = values
            .iter()
            .map(|v| match v {
                Value::Null => None,
                Value::Integer(i) => Some(i.to_string()),
                Value::Real(f) => Some(f.to_string()),
                Value::Text(s) => Some(s.clone()),
                Value::Blob(b) => Some(String::from_utf8_lossy(b).into_owned()),
            })
            .collect();
        Series::new(name.into(), data)
    };

    series.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE geographic_features (Field_ID INTEGER, Elevation REAL, Location TEXT);
            CREATE TABLE soil_and_crop_features (Field_ID INTEGER, Crop_type REAL, Annual_yield TEXT);
            INSERT INTO geographic_features VALUES (1, 512.5, 'Rural_Akatsi'), (2, 300, NULL);
            INSERT INTO soil_and_crop_features VALUES (1, 0.75, 'cassaval'), (2, 1.2, 'tea');
            "#,
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_query_frame_infers_types() {
        let conn = memory_db();
        let frame = query_frame(
            &conn,
            "SELECT * FROM geographic_features LEFT JOIN soil_and_crop_features USING (Field_ID)",
        )
        .unwrap();

        assert_eq!(frame.height(), 2);
        assert_eq!(
            crate::schema::column_names(&frame),
            vec![
                "Field_ID",
                "Elevation",
                "Location",
                "Crop_type",
                "Annual_yield"
            ]
        );
        assert_eq!(frame.column("Field_ID").unwrap().dtype(), &DataType::Int64);
        assert_eq!(frame.column("Elevation").unwrap().dtype(), &DataType::Float64);
        assert_eq!(frame.column("Location").unwrap().dtype(), &DataType::String);
        assert_eq!(frame.column("Location").unwrap().null_count(), 1);
    }

    #[test]
    fn test_malformed_query_is_query_error() {
        let conn = memory_db();
        let err = query_frame(&conn, "SELECT * FROM no_such_table").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Query);
    }

    #[test]
    fn test_duplicate_columns_are_schema_mismatch() {
        let conn = memory_db();
        let err = query_frame(
            &conn,
            "SELECT g.Field_ID, s.Field_ID FROM geographic_features g JOIN soil_and_crop_features s ON g.Field_ID = s.Field_ID",
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaMismatch);
    }

    #[test]
    fn test_missing_database_is_connection_error() {
        let config = PipelineConfig::default().with_db_path("/nonexistent/survey.db");
        let err = read_field_table(&config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Connection);
    }
}
