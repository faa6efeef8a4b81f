use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, Date32Array, Date64Array, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray, TimestampMicrosecondArray, TimestampMillisecondArray, TimestampNanosecondArray,
    TimestampSecondArray,
};
use arrow::datatypes::{DataType, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Duration, NaiveDate};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Dataset, SalesRecord};

// ---------------------------------------------------------------------------
// Column schema
// ---------------------------------------------------------------------------

pub const COL_PRODUCT: &str = "Product";
pub const COL_REGION: &str = "Region";
pub const COL_METHOD: &str = "Sales Method";
pub const COL_YEAR: &str = "Year";
pub const COL_DATE: &str = "Invoice Date";
pub const COL_UNITS: &str = "Units Sold";
pub const COL_SALES: &str = "Total Sales";
pub const COL_PROFIT: &str = "Operating Profit";

/// Every extract must provide these columns, matched by exact name.
/// The order here is also the display order for previews.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    COL_PRODUCT,
    COL_REGION,
    COL_METHOD,
    COL_YEAR,
    COL_DATE,
    COL_UNITS,
    COL_SALES,
    COL_PROFIT,
];

/// Fatal load failures. Rows that merely fail value coercion are dropped
/// with a warning instead (the load still succeeds).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Resolved positions of the required columns in a given file.
struct ColumnIndices {
    product: usize,
    region: usize,
    method: usize,
    year: usize,
    date: usize,
    units: usize,
    sales: usize,
    profit: usize,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a sales extract from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` – canonical format: header row naming the eight required columns
/// * `.parquet` / `.pq` – flat columns of the same names
/// * `.json` – records orientation: `[{ "Product": ..., "Region": ..., ... }, ...]`
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV file")?;
            load_csv(file)
        }
        "parquet" | "pq" => load_parquet(path),
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            load_json(&text)
        }
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with the required column names, one sale per row.
/// Currency cells may carry a `$` prefix and thousands separators.
pub fn load_csv<R: std::io::Read>(reader: R) -> Result<Dataset, LoadError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers: Vec<String> = csv_reader
        .headers()
        .context("reading CSV header")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let idx = resolve_columns(&headers)?;

    let mut records = Vec::new();
    let mut dropped = 0usize;

    for (row_no, result) in csv_reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        match parse_row(&record, &idx) {
            Ok(rec) => records.push(rec),
            Err(reason) => {
                log::warn!("Dropping CSV row {row_no}: {reason}");
                dropped += 1;
            }
        }
    }
    if dropped > 0 {
        log::warn!("Dropped {dropped} rows that failed value coercion");
    }
    Ok(Dataset::from_records(records))
}

fn resolve_columns(headers: &[String]) -> Result<ColumnIndices, LoadError> {
    let find = |name: &'static str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(LoadError::MissingColumn(name))
    };
    Ok(ColumnIndices {
        product: find(COL_PRODUCT)?,
        region: find(COL_REGION)?,
        method: find(COL_METHOD)?,
        year: find(COL_YEAR)?,
        date: find(COL_DATE)?,
        units: find(COL_UNITS)?,
        sales: find(COL_SALES)?,
        profit: find(COL_PROFIT)?,
    })
}

/// Coerce one CSV row.  An `Err` names the offending cell and drops the row.
fn parse_row(record: &csv::StringRecord, idx: &ColumnIndices) -> Result<SalesRecord, String> {
    let text = |i: usize, col: &str| -> Result<String, String> {
        let v = record.get(i).unwrap_or("").trim();
        if v.is_empty() {
            Err(format!("empty '{col}' cell"))
        } else {
            Ok(v.to_string())
        }
    };
    let product = text(idx.product, COL_PRODUCT)?;
    let region = text(idx.region, COL_REGION)?;
    let sales_method = text(idx.method, COL_METHOD)?;

    let year_raw = record.get(idx.year).unwrap_or("").trim();
    let year =
        parse_year(year_raw).ok_or_else(|| format!("bad '{COL_YEAR}' value '{year_raw}'"))?;

    let date_raw = record.get(idx.date).unwrap_or("").trim();
    let invoice_date =
        parse_date(date_raw).ok_or_else(|| format!("bad '{COL_DATE}' value '{date_raw}'"))?;

    let units_raw = record.get(idx.units).unwrap_or("").trim();
    let units_sold =
        parse_units(units_raw).ok_or_else(|| format!("bad '{COL_UNITS}' value '{units_raw}'"))?;

    let sales_raw = record.get(idx.sales).unwrap_or("");
    let total_sales =
        parse_money(sales_raw).ok_or_else(|| format!("bad '{COL_SALES}' value '{sales_raw}'"))?;

    let profit_raw = record.get(idx.profit).unwrap_or("");
    let operating_profit = parse_money(profit_raw)
        .ok_or_else(|| format!("bad '{COL_PROFIT}' value '{profit_raw}'"))?;

    Ok(SalesRecord {
        product,
        region,
        sales_method,
        year,
        invoice_date,
        units_sold,
        total_sales,
        operating_profit,
    })
}

/// Invoice dates appear in a few formats depending on the export tool.
/// `%Y` accepts 1-4 digits when parsing, so the two-digit form is tried
/// first to keep `1/15/20` from coming back as year 20.
fn parse_date(s: &str) -> Option<NaiveDate> {
    const FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y"];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

fn parse_year(s: &str) -> Option<i32> {
    if let Ok(y) = s.parse::<i32>() {
        return Some(y);
    }
    // Spreadsheet exports sometimes write integer columns as "2021.0".
    let f = s.parse::<f64>().ok()?;
    (f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64).then(|| f as i32)
}

fn parse_units(s: &str) -> Option<u64> {
    if let Ok(u) = s.parse::<u64>() {
        return Some(u);
    }
    let f = s.parse::<f64>().ok()?;
    (f.is_finite() && f.fract() == 0.0 && f >= 0.0 && f <= u64::MAX as f64).then(|| f as u64)
}

/// Parse a currency cell: optional sign, optional `$`, thousands separators.
fn parse_money(s: &str) -> Option<f64> {
    let t = s.trim();
    let (sign, t) = match t.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, t),
    };
    let t = t.strip_prefix('$').unwrap_or(t);
    t.replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| sign * v)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Product": "Men's Apparel",
///     "Region": "West",
///     "Sales Method": "Online",
///     "Year": 2021,
///     "Invoice Date": "2021-06-15",
///     "Units Sold": 120,
///     "Total Sales": 5400.0,
///     "Operating Profit": 1370.5
///   },
///   ...
/// ]
/// ```
///
/// `Invoice Date` may also be epoch milliseconds, which is what
/// `to_json` emits for datetime columns unless told otherwise.
pub fn load_json(text: &str) -> Result<Dataset, LoadError> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let rows = root.as_array().context("expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());
    let mut dropped = 0usize;

    for (row_no, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("JSON row {row_no} is not an object"))?;
        for col in REQUIRED_COLUMNS {
            if !obj.contains_key(col) {
                return Err(LoadError::MissingColumn(col));
            }
        }
        match json_record(obj) {
            Ok(rec) => records.push(rec),
            Err(reason) => {
                log::warn!("Dropping JSON row {row_no}: {reason}");
                dropped += 1;
            }
        }
    }
    if dropped > 0 {
        log::warn!("Dropped {dropped} rows that failed value coercion");
    }
    Ok(Dataset::from_records(records))
}

fn json_record(obj: &serde_json::Map<String, JsonValue>) -> Result<SalesRecord, String> {
    let text = |col: &str| -> Result<String, String> {
        match obj.get(col).and_then(JsonValue::as_str).map(str::trim) {
            Some(v) if !v.is_empty() => Ok(v.to_string()),
            _ => Err(format!("empty or non-string '{col}' value")),
        }
    };
    let product = text(COL_PRODUCT)?;
    let region = text(COL_REGION)?;
    let sales_method = text(COL_METHOD)?;

    let year = json_i64(obj.get(COL_YEAR))
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| format!("bad '{COL_YEAR}' value"))?;

    let invoice_date =
        json_date(obj.get(COL_DATE)).ok_or_else(|| format!("bad '{COL_DATE}' value"))?;

    let units_sold = json_i64(obj.get(COL_UNITS))
        .and_then(|v| u64::try_from(v).ok())
        .ok_or_else(|| format!("bad '{COL_UNITS}' value"))?;

    let total_sales =
        json_f64(obj.get(COL_SALES)).ok_or_else(|| format!("bad '{COL_SALES}' value"))?;
    let operating_profit =
        json_f64(obj.get(COL_PROFIT)).ok_or_else(|| format!("bad '{COL_PROFIT}' value"))?;

    Ok(SalesRecord {
        product,
        region,
        sales_method,
        year,
        invoice_date,
        units_sold,
        total_sales,
        operating_profit,
    })
}

fn json_i64(val: Option<&JsonValue>) -> Option<i64> {
    let v = val?;
    if let Some(i) = v.as_i64() {
        return Some(i);
    }
    let f = v.as_f64()?;
    (f.is_finite() && f.fract() == 0.0).then(|| f as i64)
}

fn json_f64(val: Option<&JsonValue>) -> Option<f64> {
    let v = val?;
    if let Some(f) = v.as_f64() {
        return Some(f).filter(|f| f.is_finite());
    }
    // Currency columns survive as strings when the frame held formatted text.
    v.as_str().and_then(parse_money)
}

fn json_date(val: Option<&JsonValue>) -> Option<NaiveDate> {
    let v = val?;
    if let Some(s) = v.as_str() {
        return parse_date(s.trim());
    }
    let ms = v.as_i64()?;
    DateTime::from_timestamp_millis(ms).map(|dt| dt.date_naive())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet extract.
///
/// Expected schema: the eight required columns as flat fields.
/// Utf8/LargeUtf8 for the category columns; Int32/Int64 (or integral
/// floats) for `Year` and `Units Sold`; Float32/Float64 for the currency
/// columns; Date32/Date64/Timestamp or Utf8 for `Invoice Date`.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
pub fn load_parquet(path: &Path) -> Result<Dataset, LoadError> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    let mut dropped = 0usize;
    let mut row_base = 0usize;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let idx = resolve_parquet_columns(batch.schema().as_ref())?;

        for row in 0..batch.num_rows() {
            match parquet_record(&batch, &idx, row, row_base + row)? {
                Some(rec) => records.push(rec),
                None => dropped += 1,
            }
        }
        row_base += batch.num_rows();
    }
    if dropped > 0 {
        log::warn!("Dropped {dropped} rows that failed value coercion");
    }
    Ok(Dataset::from_records(records))
}

fn resolve_parquet_columns(schema: &Schema) -> Result<ColumnIndices, LoadError> {
    let find = |name: &'static str| {
        schema
            .index_of(name)
            .map_err(|_| LoadError::MissingColumn(name))
    };
    Ok(ColumnIndices {
        product: find(COL_PRODUCT)?,
        region: find(COL_REGION)?,
        method: find(COL_METHOD)?,
        year: find(COL_YEAR)?,
        date: find(COL_DATE)?,
        units: find(COL_UNITS)?,
        sales: find(COL_SALES)?,
        profit: find(COL_PROFIT)?,
    })
}

/// Coerce one parquet row.  `Ok(None)` means the row was dropped (and the
/// warning already logged); `Err` means the batch has a schema-level
/// problem such as a column of the wrong Arrow type.
fn parquet_record(
    batch: &RecordBatch,
    idx: &ColumnIndices,
    row: usize,
    row_no: usize,
) -> Result<Option<SalesRecord>> {
    let Some(product) = string_cell(batch.column(idx.product), row)
        .with_context(|| format!("column '{COL_PRODUCT}'"))?
    else {
        log::warn!("Dropping parquet row {row_no}: empty '{COL_PRODUCT}' cell");
        return Ok(None);
    };
    let Some(region) = string_cell(batch.column(idx.region), row)
        .with_context(|| format!("column '{COL_REGION}'"))?
    else {
        log::warn!("Dropping parquet row {row_no}: empty '{COL_REGION}' cell");
        return Ok(None);
    };
    let Some(sales_method) = string_cell(batch.column(idx.method), row)
        .with_context(|| format!("column '{COL_METHOD}'"))?
    else {
        log::warn!("Dropping parquet row {row_no}: empty '{COL_METHOD}' cell");
        return Ok(None);
    };

    let Some(year_raw) =
        i64_cell(batch.column(idx.year), row).with_context(|| format!("column '{COL_YEAR}'"))?
    else {
        log::warn!("Dropping parquet row {row_no}: bad '{COL_YEAR}' cell");
        return Ok(None);
    };
    let Ok(year) = i32::try_from(year_raw) else {
        log::warn!("Dropping parquet row {row_no}: '{COL_YEAR}' value {year_raw} out of range");
        return Ok(None);
    };

    let Some(invoice_date) =
        date_cell(batch.column(idx.date), row).with_context(|| format!("column '{COL_DATE}'"))?
    else {
        log::warn!("Dropping parquet row {row_no}: bad '{COL_DATE}' cell");
        return Ok(None);
    };

    let Some(units_raw) =
        i64_cell(batch.column(idx.units), row).with_context(|| format!("column '{COL_UNITS}'"))?
    else {
        log::warn!("Dropping parquet row {row_no}: bad '{COL_UNITS}' cell");
        return Ok(None);
    };
    let Ok(units_sold) = u64::try_from(units_raw) else {
        log::warn!("Dropping parquet row {row_no}: negative '{COL_UNITS}' value {units_raw}");
        return Ok(None);
    };

    let Some(total_sales) =
        f64_cell(batch.column(idx.sales), row).with_context(|| format!("column '{COL_SALES}'"))?
    else {
        log::warn!("Dropping parquet row {row_no}: bad '{COL_SALES}' cell");
        return Ok(None);
    };
    let Some(operating_profit) = f64_cell(batch.column(idx.profit), row)
        .with_context(|| format!("column '{COL_PROFIT}'"))?
    else {
        log::warn!("Dropping parquet row {row_no}: bad '{COL_PROFIT}' cell");
        return Ok(None);
    };

    Ok(Some(SalesRecord {
        product,
        region,
        sales_method,
        year,
        invoice_date,
        units_sold,
        total_sales,
        operating_profit,
    }))
}

// -- Arrow cell helpers --
//
// `Ok(None)` marks a null or empty value (row drop); `Err` marks a column
// of the wrong Arrow type (fatal for the load).

fn string_cell(col: &Arc<dyn Array>, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let text = match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap()
            .value(row),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row),
        other => bail!("expected a string column, got {other:?}"),
    };
    let text = text.trim();
    Ok((!text.is_empty()).then(|| text.to_string()))
}

fn i64_cell(col: &Arc<dyn Array>, row: usize) -> Result<Option<i64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Int64 => Some(
            col.as_any()
                .downcast_ref::<Int64Array>()
                .unwrap()
                .value(row),
        ),
        DataType::Int32 => Some(
            col.as_any()
                .downcast_ref::<Int32Array>()
                .unwrap()
                .value(row) as i64,
        ),
        DataType::Float64 => integral(
            col.as_any()
                .downcast_ref::<Float64Array>()
                .unwrap()
                .value(row),
        ),
        DataType::Float32 => integral(
            col.as_any()
                .downcast_ref::<Float32Array>()
                .unwrap()
                .value(row) as f64,
        ),
        other => bail!("expected an integer column, got {other:?}"),
    };
    Ok(value)
}

fn integral(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64)
        .then(|| f as i64)
}

fn f64_cell(col: &Arc<dyn Array>, row: usize) -> Result<Option<f64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap()
            .value(row),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .unwrap()
            .value(row) as f64,
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .unwrap()
            .value(row) as f64,
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .unwrap()
            .value(row) as f64,
        other => bail!("expected a numeric column, got {other:?}"),
    };
    Ok(Some(value).filter(|v| v.is_finite()))
}

fn date_cell(col: &Arc<dyn Array>, row: usize) -> Result<Option<NaiveDate>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let date = match col.data_type() {
        DataType::Date32 => {
            let days = col
                .as_any()
                .downcast_ref::<Date32Array>()
                .unwrap()
                .value(row);
            NaiveDate::from_ymd_opt(1970, 1, 1)
                .and_then(|epoch| epoch.checked_add_signed(Duration::days(days as i64)))
        }
        DataType::Date64 => {
            let ms = col
                .as_any()
                .downcast_ref::<Date64Array>()
                .unwrap()
                .value(row);
            DateTime::from_timestamp_millis(ms).map(|dt| dt.date_naive())
        }
        DataType::Timestamp(unit, _) => {
            let dt = match unit {
                TimeUnit::Second => DateTime::from_timestamp(
                    col.as_any()
                        .downcast_ref::<TimestampSecondArray>()
                        .unwrap()
                        .value(row),
                    0,
                ),
                TimeUnit::Millisecond => DateTime::from_timestamp_millis(
                    col.as_any()
                        .downcast_ref::<TimestampMillisecondArray>()
                        .unwrap()
                        .value(row),
                ),
                TimeUnit::Microsecond => DateTime::from_timestamp_micros(
                    col.as_any()
                        .downcast_ref::<TimestampMicrosecondArray>()
                        .unwrap()
                        .value(row),
                ),
                TimeUnit::Nanosecond => Some(DateTime::from_timestamp_nanos(
                    col.as_any()
                        .downcast_ref::<TimestampNanosecondArray>()
                        .unwrap()
                        .value(row),
                )),
            };
            dt.map(|dt| dt.date_naive())
        }
        DataType::Utf8 => parse_date(
            col.as_any()
                .downcast_ref::<StringArray>()
                .unwrap()
                .value(row)
                .trim(),
        ),
        DataType::LargeUtf8 => parse_date(col.as_string::<i64>().value(row).trim()),
        other => bail!("expected a date column, got {other:?}"),
    };
    Ok(date)
}
