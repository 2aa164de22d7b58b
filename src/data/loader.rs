use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use crate::config::{LoadOptions, MalformedPolicy};
use crate::error::ChartError;

use super::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an energy dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row; category, year and value columns by name
/// * `.json`    – `[{ "country": "...", "year": 1965, "fossil_fuel_consumption": 12.3 }, ...]`
/// * `.parquet` – same columns; any numeric or string physical type
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path, options),
        "json" => load_json(path, options),
        "parquet" | "pq" => load_parquet(path, options),
        other => Err(ChartError::UnsupportedFormat(other.to_string()).into()),
    }?;

    log::info!(
        "Loaded {} records in {} categories from {}",
        dataset.len(),
        dataset.categories().len(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Row collection shared by every format
// ---------------------------------------------------------------------------

/// A cell that failed to parse, kept as text for the error message.
type Cell<T> = std::result::Result<T, String>;

struct Collector<'a> {
    options: &'a LoadOptions,
    records: Vec<Record>,
    skipped: usize,
}

impl<'a> Collector<'a> {
    fn new(options: &'a LoadOptions) -> Self {
        Self {
            options,
            records: Vec::new(),
            skipped: 0,
        }
    }

    fn push(&mut self, row: usize, category: Cell<String>, year: Cell<i32>, value: Cell<f64>) -> Result<()> {
        let columns = &self.options.columns;
        let bad = match (category, year, value) {
            (Ok(category), Ok(year), Ok(value)) => {
                self.records.push(Record::new(category, year, value));
                return Ok(());
            }
            (Err(raw), _, _) => (columns.category.as_str(), raw),
            (_, Err(raw), _) => (columns.year.as_str(), raw),
            (_, _, Err(raw)) => (columns.value.as_str(), raw),
        };

        let err = ChartError::MalformedField {
            row,
            field: bad.0.to_string(),
            value: bad.1,
        };
        match self.options.malformed {
            MalformedPolicy::Reject => Err(err.into()),
            MalformedPolicy::Skip => {
                log::debug!("Skipping {err}");
                self.skipped += 1;
                Ok(())
            }
        }
    }

    fn finish(self) -> Dataset {
        if self.skipped > 0 {
            log::warn!("Skipped {} rows with unparseable fields", self.skipped);
        }
        Dataset::from_records(self.records)
    }
}

fn parse_category(s: &str) -> Cell<String> {
    let s = s.trim();
    if s.is_empty() {
        Err(s.to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Integer years; `"1965.0"` is accepted and truncated.
fn parse_year(s: &str) -> Cell<i32> {
    let t = s.trim();
    if let Ok(y) = t.parse::<i32>() {
        return Ok(y);
    }
    t.parse::<f64>()
        .ok()
        .and_then(year_from_f64)
        .ok_or_else(|| s.to_string())
}

fn year_from_f64(v: f64) -> Option<i32> {
    let v = v.trunc();
    (v.is_finite() && v >= i32::MIN as f64 && v <= i32::MAX as f64).then_some(v as i32)
}

fn parse_value(s: &str) -> Cell<f64> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| s.to_string())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names. Columns other than the three
/// configured ones are ignored.
fn load_csv(path: &Path, options: &LoadOptions) -> Result<Dataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();

    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| ChartError::MissingColumn(name.to_string()))
    };
    let category_idx = position(&options.columns.category)?;
    let year_idx = position(&options.columns.year)?;
    let value_idx = position(&options.columns.value)?;

    let mut rows = Collector::new(options);

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(
            row_no,
            parse_category(record.get(category_idx).unwrap_or("")),
            parse_year(record.get(year_idx).unwrap_or("")),
            parse_value(record.get(value_idx).unwrap_or("")),
        )?;
    }

    Ok(rows.finish())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented array, as written by `df.to_json(orient='records')`.
/// Numbers may also be given as strings.
fn load_json(path: &Path, options: &LoadOptions) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let items = root.as_array().context("Expected top-level JSON array")?;

    let mut rows = Collector::new(options);
    let columns = &options.columns;

    for (i, item) in items.iter().enumerate() {
        let obj = item
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let category = match obj.get(&columns.category) {
            Some(JsonValue::String(s)) => parse_category(s),
            other => Err(json_text(other)),
        };
        let year = match obj.get(&columns.year) {
            Some(JsonValue::Number(n)) => n
                .as_i64()
                .and_then(|y| i32::try_from(y).ok())
                .or_else(|| n.as_f64().and_then(year_from_f64))
                .ok_or_else(|| n.to_string()),
            Some(JsonValue::String(s)) => parse_year(s),
            other => Err(json_text(other)),
        };
        let value = match obj.get(&columns.value) {
            Some(JsonValue::Number(n)) => n.as_f64().ok_or_else(|| n.to_string()),
            Some(JsonValue::String(s)) => parse_value(s),
            other => Err(json_text(other)),
        };

        rows.push(i, category, year, value)?;
    }

    Ok(rows.finish())
}

fn json_text(val: Option<&JsonValue>) -> String {
    val.map_or_else(|| "<missing>".to_string(), |v| v.to_string())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the configured columns. Numeric columns may be
/// any integer or float type (or strings holding numbers); they are cast to
/// `Float64` before reading. Works with files written by Pandas and Polars.
fn load_parquet(path: &Path, options: &LoadOptions) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let columns = &options.columns;
    let mut rows = Collector::new(options);
    let mut row_offset = 0;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let column = |name: &str, to: &DataType| -> Result<ArrayRef> {
            let idx = schema
                .index_of(name)
                .map_err(|_| ChartError::MissingColumn(name.to_string()))?;
            cast(batch.column(idx), to).with_context(|| format!("column '{name}' as {to}"))
        };

        let category_col = column(&columns.category, &DataType::Utf8)?;
        let year_col = column(&columns.year, &DataType::Float64)?;
        let value_col = column(&columns.value, &DataType::Float64)?;

        let categories = category_col.as_string::<i32>();
        let years = year_col.as_primitive::<Float64Type>();
        let values = value_col.as_primitive::<Float64Type>();

        for row in 0..batch.num_rows() {
            let category = if categories.is_null(row) {
                Err("<null>".to_string())
            } else {
                parse_category(categories.value(row))
            };
            let year = if years.is_null(row) {
                Err("<null>".to_string())
            } else {
                let y = years.value(row);
                year_from_f64(y).ok_or_else(|| y.to_string())
            };
            let value = if values.is_null(row) {
                Err("<null>".to_string())
            } else {
                let v = values.value(row);
                Some(v).filter(|v| v.is_finite()).ok_or_else(|| v.to_string())
            };

            rows.push(row_offset + row, category, year, value)?;
        }
        row_offset += batch.num_rows();
    }

    Ok(rows.finish())
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float32Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::config::ColumnNames;

    fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn reject() -> LoadOptions {
        LoadOptions {
            malformed: MalformedPolicy::Reject,
            ..LoadOptions::default()
        }
    }

    #[test]
    fn csv_reads_configured_columns_and_ignores_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "energy.csv",
            "country,iso_code,year,population,fossil_fuel_consumption\n\
             Africa,,1965,300000000,734.6\n\
             Africa,,1966,310000000,751.2\n\
             Algeria,DZA,1965,12000000,15\n",
        );

        let ds = load_file(&path, &LoadOptions::default()).unwrap();

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records()[0], Record::new("Africa", 1965, 734.6));
        assert_eq!(ds.records()[2], Record::new("Algeria", 1965, 15.0));
        assert_eq!(ds.categories().len(), 2);
    }

    #[test]
    fn csv_skips_malformed_rows_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "energy.csv",
            "country,year,fossil_fuel_consumption\n\
             Africa,1965,10\n\
             Africa,1966,\n\
             Africa,n/a,12\n\
             Africa,1968.0,13.5\n",
        );

        let ds = load_file(&path, &LoadOptions::default()).unwrap();
        let years: Vec<i32> = ds.records().iter().map(|r| r.year).collect();
        assert_eq!(years, vec![1965, 1968]);
    }

    #[test]
    fn csv_reject_policy_names_the_bad_cell() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "energy.csv",
            "country,year,fossil_fuel_consumption\nAfrica,1965,10\nAfrica,1966,lots\n",
        );

        let err = load_file(&path, &reject()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ChartError>(),
            Some(&ChartError::MalformedField {
                row: 1,
                field: "fossil_fuel_consumption".into(),
                value: "lots".into(),
            })
        );
    }

    #[test]
    fn csv_missing_column_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "energy.csv", "country,year\nAfrica,1965\n");

        let err = load_file(&path, &LoadOptions::default()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ChartError>(),
            Some(&ChartError::MissingColumn("fossil_fuel_consumption".into()))
        );
    }

    #[test]
    fn custom_column_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "coal.csv", "region,yr,coal\nEurope,1990,42.5\n");
        let options = LoadOptions {
            columns: ColumnNames {
                category: "region".into(),
                year: "yr".into(),
                value: "coal".into(),
            },
            ..LoadOptions::default()
        };

        let ds = load_file(&path, &options).unwrap();
        assert_eq!(ds.records(), &[Record::new("Europe", 1990, 42.5)]);
    }

    #[test]
    fn json_accepts_numbers_and_numeric_strings() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "energy.json",
            r#"[
                {"country": "Africa", "year": 1965, "fossil_fuel_consumption": 734.6},
                {"country": "Africa", "year": "1966", "fossil_fuel_consumption": "751.2"},
                {"country": "Africa", "year": 1967, "fossil_fuel_consumption": null}
            ]"#,
        );

        let ds = load_file(&path, &LoadOptions::default()).unwrap();
        assert_eq!(
            ds.records(),
            &[
                Record::new("Africa", 1965, 734.6),
                Record::new("Africa", 1966, 751.2)
            ]
        );

        let err = load_file(&path, &reject()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ChartError>(),
            Some(ChartError::MalformedField { row: 2, .. })
        ));
    }

    #[test]
    fn json_must_be_an_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "energy.json", r#"{"country": "Africa"}"#);
        assert!(load_file(&path, &LoadOptions::default()).is_err());
    }

    #[test]
    fn parquet_casts_numeric_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("energy.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("country", DataType::Utf8, false),
            Field::new("year", DataType::Int64, false),
            Field::new("fossil_fuel_consumption", DataType::Float32, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Africa", "Africa", "Asia"])),
                Arc::new(Int64Array::from(vec![1965, 1966, 1965])),
                Arc::new(Float32Array::from(vec![Some(10.5), None, Some(99.0)])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path, &LoadOptions::default()).unwrap();
        assert_eq!(
            ds.records(),
            &[Record::new("Africa", 1965, 10.5), Record::new("Asia", 1965, 99.0)]
        );
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "energy.xlsx", "");
        let err = load_file(&path, &LoadOptions::default()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ChartError>(),
            Some(&ChartError::UnsupportedFormat("xlsx".into()))
        );
    }

    #[test]
    fn year_parsing() {
        assert_eq!(parse_year(" 1965 "), Ok(1965));
        assert_eq!(parse_year("1965.7"), Ok(1965));
        assert!(parse_year("").is_err());
        assert!(parse_year("1e40").is_err());
        assert!(parse_value("NaN").is_err());
        assert_eq!(parse_value("12.25"), Ok(12.25));
    }
}
