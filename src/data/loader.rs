use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Date32Type, Float64Type, Int64Type};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::error::DataLoadError;
use super::model::{
    Dataset, Record, COL_DATE, COL_PRODUCT, COL_QUANTITY, COL_REGION, COL_TOTAL, REQUIRED_COLUMNS,
};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a sales dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`           – comma-delimited text with a header row
/// * `.tsv` / `.tab`  – tab-delimited text with a header row
/// * `.json`          – `[{ "Date": ..., "Product": ..., ... }, ...]`
/// * `.parquet`       – columns `Date, Product, Region, Quantity, Total`
///
/// Loading is deterministic: the same file always yields an equal [`Dataset`].
pub fn load(path: &Path) -> Result<Dataset, DataLoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_delimited(path, b',')?,
        "tsv" | "tab" => load_delimited(path, b'\t')?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataLoadError::UnsupportedFormat(other.to_string())),
    };

    log::info!("Loaded {} sales records from {}", records.len(), path.display());
    Ok(Dataset::from_records(records, Some(path.to_path_buf())))
}

fn open(path: &Path) -> Result<File, DataLoadError> {
    File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Row validation shared by the text formats
// ---------------------------------------------------------------------------

/// One row exactly as it appears in the source, before validation.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Product")]
    product: String,
    #[serde(rename = "Region")]
    region: String,
    #[serde(rename = "Quantity")]
    quantity: String,
    #[serde(rename = "Total")]
    total: String,
}

impl RawRow {
    fn into_record(self, row: usize) -> Result<Record, DataLoadError> {
        let date = parse_date(&self.date).ok_or_else(|| {
            invalid(row, COL_DATE, format!("'{}' is not a recognised date", self.date))
        })?;
        Ok(Record {
            date,
            product: category(self.product, row, COL_PRODUCT)?,
            region: category(self.region, row, COL_REGION)?,
            quantity: parse_quantity(&self.quantity, row)?,
            total: parse_total(&self.total, row)?,
        })
    }
}

fn invalid(row: usize, column: &'static str, reason: impl Into<String>) -> DataLoadError {
    DataLoadError::InvalidValue {
        row,
        column,
        reason: reason.into(),
    }
}

fn category(value: String, row: usize, column: &'static str) -> Result<String, DataLoadError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid(row, column, "empty value"));
    }
    if trimmed.len() == value.len() {
        Ok(value)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Accepts whole numbers, including float spellings such as `3.0`.
fn parse_quantity(s: &str, row: usize) -> Result<u32, DataLoadError> {
    let s = s.trim();
    if let Ok(q) = s.parse::<u32>() {
        return Ok(q);
    }
    match s.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&f) => Ok(f as u32),
        _ => Err(invalid(
            row,
            COL_QUANTITY,
            format!("'{s}' is not a non-negative whole number"),
        )),
    }
}

fn parse_total(s: &str, row: usize) -> Result<f64, DataLoadError> {
    let s = s.trim();
    let value = s
        .parse::<f64>()
        .map_err(|_| invalid(row, COL_TOTAL, format!("'{s}' is not a number")))?;
    check_total(value, row)
}

fn check_total(value: f64, row: usize) -> Result<f64, DataLoadError> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(
            row,
            COL_TOTAL,
            format!("{value} is not a finite non-negative amount"),
        ));
    }
    Ok(value)
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a calendar date, truncating timestamps to their day.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

fn load_delimited(path: &Path, delimiter: u8) -> Result<Vec<Record>, DataLoadError> {
    parse_delimited(open(path)?, delimiter)
}

/// Parse delimited text with a header row.  Extra columns are ignored;
/// header names and cells are trimmed of surrounding whitespace.
pub fn parse_delimited<R: Read>(input: R, delimiter: u8) -> Result<Vec<Record>, DataLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            return Err(DataLoadError::MissingColumn(col));
        }
    }

    let mut records = Vec::new();
    for (i, result) in reader.deserialize::<RawRow>().enumerate() {
        records.push(result?.into_record(i + 1)?);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Date": "2024-01-05", "Product": "Widget", "Region": "West",
///     "Quantity": 2, "Total": 20.0 },
///   ...
/// ]
/// ```
///
/// A numeric `Date` is read as milliseconds since the Unix epoch, the
/// pandas default for datetime columns.
fn load_json(path: &Path) -> Result<Vec<Record>, DataLoadError> {
    parse_json(BufReader::new(open(path)?))
}

pub fn parse_json<R: Read>(input: R) -> Result<Vec<Record>, DataLoadError> {
    let rows: Vec<serde_json::Map<String, JsonValue>> = serde_json::from_reader(input)?;

    rows.into_iter()
        .enumerate()
        .map(|(i, obj)| {
            let row = i + 1;
            let cell = |col: &'static str| -> Result<String, DataLoadError> {
                match obj.get(col) {
                    None => Err(DataLoadError::MissingColumn(col)),
                    Some(JsonValue::String(s)) => Ok(s.clone()),
                    Some(JsonValue::Number(n)) => Ok(n.to_string()),
                    Some(JsonValue::Null) => Err(invalid(row, col, "missing value")),
                    Some(other) => Err(invalid(row, col, format!("unexpected value {other}"))),
                }
            };
            let date = match obj.get(COL_DATE) {
                Some(JsonValue::Number(n)) => epoch_millis_date(n, row)?,
                _ => cell(COL_DATE)?,
            };
            RawRow {
                date,
                product: cell(COL_PRODUCT)?,
                region: cell(COL_REGION)?,
                quantity: cell(COL_QUANTITY)?,
                total: cell(COL_TOTAL)?,
            }
            .into_record(row)
        })
        .collect()
}

fn epoch_millis_date(n: &serde_json::Number, row: usize) -> Result<String, DataLoadError> {
    n.as_i64()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|dt| dt.date_naive().format("%Y-%m-%d").to_string())
        .ok_or_else(|| invalid(row, COL_DATE, format!("{n} is not an epoch timestamp")))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by **Pandas** (`df.to_parquet()`) or
/// **Polars** (`df.write_parquet()`).
///
/// Columns are cast with Arrow before reading, so `Date` may be a string,
/// date, or timestamp column and `Quantity`/`Total` any numeric type.
/// Values that fail the cast surface as nulls and are rejected per row.
fn load_parquet(path: &Path) -> Result<Vec<Record>, DataLoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    for col in REQUIRED_COLUMNS {
        if builder.schema().index_of(col).is_err() {
            return Err(DataLoadError::MissingColumn(col));
        }
    }
    let reader = builder.build()?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;

        let dates = column_as(&batch, COL_DATE, &DataType::Date32)?;
        let products = column_as(&batch, COL_PRODUCT, &DataType::Utf8)?;
        let regions = column_as(&batch, COL_REGION, &DataType::Utf8)?;
        let quantities = column_as(&batch, COL_QUANTITY, &DataType::Int64)?;
        let totals = column_as(&batch, COL_TOTAL, &DataType::Float64)?;

        let dates = dates.as_primitive::<Date32Type>();
        let products = products.as_string::<i32>();
        let regions = regions.as_string::<i32>();
        let quantities = quantities.as_primitive::<Int64Type>();
        let totals = totals.as_primitive::<Float64Type>();

        for i in 0..batch.num_rows() {
            let row = records.len() + 1;

            let date = (!dates.is_null(i))
                .then(|| dates.value_as_date(i))
                .flatten()
                .ok_or_else(|| invalid(row, COL_DATE, "missing or unparseable date"))?;

            let product = non_null_str(products.is_null(i), || products.value(i), row, COL_PRODUCT)?;
            let region = non_null_str(regions.is_null(i), || regions.value(i), row, COL_REGION)?;

            if quantities.is_null(i) {
                return Err(invalid(row, COL_QUANTITY, "missing value"));
            }
            let quantity = u32::try_from(quantities.value(i)).map_err(|_| {
                invalid(
                    row,
                    COL_QUANTITY,
                    format!("{} is not a non-negative whole number", quantities.value(i)),
                )
            })?;

            if totals.is_null(i) {
                return Err(invalid(row, COL_TOTAL, "missing value"));
            }
            let total = check_total(totals.value(i), row)?;

            records.push(Record {
                date,
                product,
                region,
                quantity,
                total,
            });
        }
    }

    Ok(records)
}

// -- Parquet / Arrow helpers --

fn column_as(
    batch: &RecordBatch,
    name: &'static str,
    to: &DataType,
) -> Result<ArrayRef, DataLoadError> {
    let col = batch
        .column_by_name(name)
        .ok_or(DataLoadError::MissingColumn(name))?;
    Ok(cast(col, to)?)
}

fn non_null_str<'a>(
    is_null: bool,
    value: impl FnOnce() -> &'a str,
    row: usize,
    column: &'static str,
) -> Result<String, DataLoadError> {
    if is_null {
        return Err(invalid(row, column, "missing value"));
    }
    category(value().to_string(), row, column)
}
