//! Adapter from a JSON scores table to region records.
//!
//! The table is an array of objects, one per department, as exported from the
//! warehouse `scores` table. Rows are passed through in file order; cleaning
//! bad values is left to the scoring engine, which reports what it excludes.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::config::ColumnMap;
use crate::scoring::{Criterion, MetricValue, RegionRecord};

/// Read a JSON scores table from disk
pub fn load_dataset(
    path: &Path,
    columns: &ColumnMap,
    criteria: &[Criterion],
) -> Result<Vec<RegionRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset at {}", path.display()))?;
    let records = parse_dataset(&content, columns, criteria)
        .with_context(|| format!("Invalid dataset in {}", path.display()))?;
    tracing::debug!(rows = records.len(), "loaded dataset from {}", path.display());
    Ok(records)
}

/// Parse a JSON array of row objects into region records
pub fn parse_dataset(
    json: &str,
    columns: &ColumnMap,
    criteria: &[Criterion],
) -> Result<Vec<RegionRecord>> {
    let document: Value = serde_json::from_str(json).context("Failed to parse JSON")?;
    let Value::Array(rows) = document else {
        anyhow::bail!("expected a JSON array of rows");
    };

    rows.iter()
        .enumerate()
        .map(|(i, row)| match row {
            Value::Object(fields) => Ok(record_from_row(fields, columns, criteria)),
            _ => anyhow::bail!("row {} is not a JSON object", i),
        })
        .collect()
}

fn record_from_row(
    fields: &Map<String, Value>,
    columns: &ColumnMap,
    criteria: &[Criterion],
) -> RegionRecord {
    // Anything but a string key becomes a blank name, which the engine reports
    let name = match fields.get(&columns.key) {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    };

    criteria.iter().fold(RegionRecord::new(name), |record, criterion| {
        let value = fields
            .get(columns.column_for(*criterion))
            .map(metric_from_json)
            .unwrap_or(MetricValue::Missing);
        record.with_metric(*criterion, value)
    })
}

fn metric_from_json(value: &Value) -> MetricValue {
    match value {
        Value::Null => MetricValue::Missing,
        Value::Number(n) => n
            .as_f64()
            .map(MetricValue::Number)
            .unwrap_or_else(|| MetricValue::Text(n.to_string())),
        Value::String(s) => MetricValue::Text(s.clone()),
        other => MetricValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Vec<RegionRecord>> {
        parse_dataset(json, &ColumnMap::default(), &Criterion::ALL)
    }

    #[test]
    fn test_parse_numeric_and_text_metrics() {
        let json = r#"[
            {"department_name": "Gironde", "immo_score": 3.5, "climate_score": "4,2",
             "tourism_score": "3", "dev_score": 2, "region": "Nouvelle-Aquitaine"}
        ]"#;
        let records = parse(json).unwrap();
        assert_eq!(records.len(), 1);

        let gironde = &records[0];
        assert_eq!(gironde.name, "Gironde");
        assert_eq!(gironde.metrics[&Criterion::Housing], MetricValue::Number(3.5));
        assert_eq!(gironde.metrics[&Criterion::Climate], MetricValue::Text("4,2".to_string()));
        assert_eq!(gironde.metrics[&Criterion::Development], MetricValue::Number(2.0));
    }

    #[test]
    fn test_missing_and_null_values() {
        let json = r#"[{"immo_score": null, "climate_score": true}]"#;
        let records = parse(json).unwrap();

        let row = &records[0];
        assert_eq!(row.name, "");
        assert_eq!(row.metrics[&Criterion::Housing], MetricValue::Missing);
        assert_eq!(row.metrics[&Criterion::Climate], MetricValue::Text("true".to_string()));
        assert_eq!(row.metrics[&Criterion::Tourism], MetricValue::Missing);
    }

    #[test]
    fn test_non_string_key_is_blank() {
        let json = r#"[
            {"department_name": 75, "immo_score": 1},
            {"department_name": true},
            {"department_name": {"code": "33"}}
        ]"#;
        let records = parse(json).unwrap();

        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["", "", ""]);
        assert_eq!(records[0].metrics[&Criterion::Housing], MetricValue::Number(1.0));
    }

    #[test]
    fn test_custom_columns_and_subset() {
        let columns = ColumnMap {
            key: "nom".to_string(),
            climate: Some("meteo".to_string()),
            ..ColumnMap::default()
        };
        let json = r#"[{"nom": "Var", "meteo": 4.5, "immo_score": 1}]"#;
        let records = parse_dataset(json, &columns, &[Criterion::Climate]).unwrap();

        assert_eq!(records[0].name, "Var");
        assert_eq!(records[0].metrics.len(), 1);
        assert_eq!(records[0].metrics[&Criterion::Climate], MetricValue::Number(4.5));
    }

    #[test]
    fn test_keeps_row_order() {
        let json = r#"[{"department_name": "B"}, {"department_name": "A"}]"#;
        let names: Vec<_> = parse(json).unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn test_rejects_non_array() {
        let err = parse(r#"{"department_name": "Ain"}"#).unwrap_err();
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn test_rejects_non_object_row() {
        let err = parse(r#"[{"department_name": "Ain"}, 3]"#).unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("home_rank_test_missing_dataset.json");
        let _ = fs::remove_file(&path);
        let err = load_dataset(&path, &ColumnMap::default(), &Criterion::ALL).unwrap_err();
        assert!(err.to_string().contains("Failed to read dataset"));
    }
}
