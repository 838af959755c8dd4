//! CSV and JSONL dataset conversion.
//!
//! Column names are renamed through a field mapping (csv name -> jsonl
//! name) on the way to JSONL, and through its inverse on the way back.

use crate::error::{CliError, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{BufRead, Read, Write};
use std::path::Path;

/// Field renames, csv column name -> jsonl key
pub type FieldMappings = BTreeMap<String, String>;

#[derive(Debug, Deserialize)]
struct MappingFile {
    #[serde(default)]
    field_mappings: FieldMappings,
}

/// Read the `[field_mappings]` table from a TOML file.
pub fn load_mappings(path: &Path) -> Result<FieldMappings> {
    let contents = fs::read_to_string(path)?;
    let file: MappingFile = toml::from_str(&contents)?;
    Ok(file.field_mappings)
}

/// Convert CSV rows to JSON lines, returning the number of rows.
pub fn csv_to_jsonl<R: Read, W: Write>(
    input: R,
    mut output: W,
    mappings: &FieldMappings,
) -> Result<usize> {
    let mut reader = csv::Reader::from_reader(input);
    let keys: Vec<String> = reader
        .headers()?
        .iter()
        .map(|column| mappings.get(column).cloned().unwrap_or_else(|| column.to_string()))
        .collect();

    let mut count = 0;
    for row in reader.records() {
        let row = row?;
        let object: Map<String, Value> = keys
            .iter()
            .zip(row.iter())
            .map(|(key, value)| (key.clone(), Value::String(value.to_string())))
            .collect();
        serde_json::to_writer(&mut output, &object)?;
        output.write_all(b"\n")?;
        count += 1;
    }

    output.flush()?;
    Ok(count)
}

/// Convert JSON lines to CSV, returning the number of rows.
///
/// The header is the union of all keys in first-seen order. Missing keys
/// become empty cells; non-string values are written as JSON text.
pub fn jsonl_to_csv<R: BufRead, W: Write>(
    input: R,
    output: W,
    mappings: &FieldMappings,
) -> Result<usize> {
    let inverse: HashMap<&str, &str> = mappings
        .iter()
        .map(|(csv_name, jsonl_name)| (jsonl_name.as_str(), csv_name.as_str()))
        .collect();

    let mut header: Vec<String> = Vec::new();
    let mut rows: Vec<HashMap<String, String>> = Vec::new();

    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let object = match serde_json::from_str::<Value>(&line)? {
            Value::Object(object) => object,
            _ => {
                return Err(CliError::InvalidInput(format!(
                    "Line {} is not a JSON object",
                    idx + 1
                )))
            }
        };

        let mut row = HashMap::with_capacity(object.len());
        for (key, value) in object {
            let column = inverse.get(key.as_str()).map_or(key.clone(), |c| c.to_string());
            if !header.contains(&column) {
                header.push(column.clone());
            }
            row.insert(column, cell_text(value));
        }
        rows.push(row);
    }

    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(&header)?;
    for row in &rows {
        writer.write_record(
            header
                .iter()
                .map(|column| row.get(column).map(String::as_str).unwrap_or_default()),
        )?;
    }
    writer.flush()?;

    Ok(rows.len())
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
