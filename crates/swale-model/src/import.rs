//! Build a [`FeatureClass`] attribute table from CSV input.
//!
//! Field types are inferred per column from a sample of rows: integer, then
//! double, then date, falling back to text sized to the widest value seen.

use std::io::Read;

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::{sanitize_name, DatasetError, Field, FieldType, FeatureClass, Schema, SchemaError, Value};

#[derive(Clone, Debug)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub has_header: bool,
    /// How many rows to examine when inferring a column's type. A value that
    /// fails to parse as the inferred type in a later row is an error, not a
    /// silent fallback; raise the sample if that happens.
    pub sample_rows: usize,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
            sample_rows: 100,
        }
    }
}

#[derive(Debug, Error)]
pub enum CsvImportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("input has no columns")]
    NoColumns,
    #[error("row {row}, column {column:?}: {cell:?} is not {expected}")]
    CellParse {
        row: usize,
        column: String,
        cell: String,
        expected: &'static str,
    },
}

#[derive(Clone, Copy, PartialEq)]
enum Inferred {
    Integer,
    Double,
    Date,
    Text,
}

/// Reads `input` as CSV and materializes it as an attribute table (no
/// geometry). Header names are sanitized for store compatibility; without a
/// header row, columns are named `field_1`, `field_2`, ….
pub fn feature_class_from_csv<R: Read>(
    name: impl Into<String>,
    input: R,
    options: &CsvOptions,
) -> Result<FeatureClass, CsvImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(options.has_header)
        .from_reader(input);

    let header: Vec<String> = if options.has_header {
        reader
            .headers()?
            .iter()
            .map(sanitize_name)
            .collect()
    } else {
        Vec::new()
    };

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    let column_count = if options.has_header {
        header.len()
    } else {
        rows.first().map(Vec::len).unwrap_or(0)
    };
    if column_count == 0 {
        return Err(CsvImportError::NoColumns);
    }

    let names: Vec<String> = if options.has_header {
        header
    } else {
        (1..=column_count).map(|i| format!("field_{i}")).collect()
    };

    let mut fields = Vec::with_capacity(column_count);
    let mut kinds = Vec::with_capacity(column_count);
    for (col, name) in names.iter().enumerate() {
        let kind = infer_column(&rows, col, options.sample_rows);
        let field_type = match kind {
            Inferred::Integer => FieldType::Integer,
            Inferred::Double => FieldType::Double,
            Inferred::Date => FieldType::Date,
            Inferred::Text => FieldType::Text {
                length: text_width(&rows, col),
            },
        };
        kinds.push(kind);
        fields.push(Field::new(name.clone(), field_type));
    }

    let mut fc = FeatureClass::table(name, Schema::new(fields)?)?;
    for (row_number, row) in rows.iter().enumerate() {
        let mut values = Vec::with_capacity(column_count);
        for col in 0..column_count {
            let cell = row.get(col).map(String::as_str).unwrap_or("");
            values.push(parse_cell(cell, kinds[col]).ok_or_else(|| {
                CsvImportError::CellParse {
                    row: row_number + 1,
                    column: names[col].clone(),
                    cell: cell.to_string(),
                    expected: match kinds[col] {
                        Inferred::Integer => "an integer",
                        Inferred::Double => "a number",
                        Inferred::Date => "a date",
                        Inferred::Text => "text",
                    },
                }
            })?);
        }
        fc.insert(None, values)?;
    }
    Ok(fc)
}

fn infer_column(rows: &[Vec<String>], col: usize, sample_rows: usize) -> Inferred {
    let sample = rows
        .iter()
        .take(sample_rows.max(1))
        .filter_map(|row| row.get(col))
        .map(String::as_str)
        .filter(|cell| !cell.is_empty());

    let mut kind = None;
    for cell in sample {
        let cell_kind = if cell.parse::<i64>().is_ok() {
            Inferred::Integer
        } else if cell.parse::<f64>().is_ok() {
            Inferred::Double
        } else if parse_date(cell).is_some() {
            Inferred::Date
        } else {
            Inferred::Text
        };
        kind = Some(match (kind, cell_kind) {
            (None, k) => k,
            (Some(k), c) if k == c => k,
            // Integers widen to double; anything else mixed becomes text.
            (Some(Inferred::Integer), Inferred::Double)
            | (Some(Inferred::Double), Inferred::Integer) => Inferred::Double,
            _ => Inferred::Text,
        });
    }
    kind.unwrap_or(Inferred::Text)
}

fn text_width(rows: &[Vec<String>], col: usize) -> u32 {
    let widest = rows
        .iter()
        .filter_map(|row| row.get(col))
        .map(|cell| cell.chars().count())
        .max()
        .unwrap_or(0) as u32;
    widest.max(FieldType::DEFAULT_TEXT_LENGTH)
}

fn parse_cell(cell: &str, kind: Inferred) -> Option<Value> {
    if cell.is_empty() {
        return Some(Value::Null);
    }
    match kind {
        Inferred::Integer => cell.parse::<i64>().ok().map(Value::Integer),
        Inferred::Double => cell.parse::<f64>().ok().map(Value::Double),
        Inferred::Date => parse_date(cell).map(Value::Date),
        Inferred::Text => Some(Value::Text(cell.to_string())),
    }
}

fn parse_date(cell: &str) -> Option<NaiveDateTime> {
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(cell, format) {
            return Some(dt);
        }
    }
    for format in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(cell, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}
