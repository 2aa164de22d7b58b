use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// One row in the layout of the cleaned OWID energy table.
#[derive(Serialize)]
struct Row {
    country: String,
    iso_code: String,
    year: i32,
    population: f64,
    fossil_fuel_consumption: f64,
}

/// Small deterministic PRNG (splitmix64) so repeated runs write the same file.
struct SplitMix(u64);

impl SplitMix {
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^= z >> 31;
        (z >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform noise in `[-amplitude, amplitude]`.
    fn jitter(&mut self, amplitude: f64) -> f64 {
        (self.next_f64() * 2.0 - 1.0) * amplitude
    }
}

/// `(country, iso code, TWh in 1965, yearly growth, population in 1965)`
const COUNTRIES: [(&str, &str, f64, f64, f64); 6] = [
    ("Africa", "", 734.0, 0.038, 3.2e8),
    ("Algeria", "DZA", 15.0, 0.061, 1.2e7),
    ("Brazil", "BRA", 180.0, 0.045, 8.5e7),
    ("Germany", "DEU", 3100.0, 0.002, 7.5e7),
    ("Japan", "JPN", 1300.0, 0.015, 9.8e7),
    ("Tuvalu", "TUV", 0.0, 0.0, 6.0e3),
];

const FIRST_YEAR: i32 = 1965;
const LAST_YEAR: i32 = 2022;

fn generate(rng: &mut SplitMix) -> Vec<Row> {
    let mut rows = Vec::new();
    for (country, iso, base, growth, population) in COUNTRIES {
        for year in FIRST_YEAR..=LAST_YEAR {
            let t = (year - FIRST_YEAR) as f64;
            let trend = base * (1.0 + growth).powf(t);
            let twh = (trend * (1.0 + rng.jitter(0.03))).max(0.0);
            rows.push(Row {
                country: country.to_string(),
                iso_code: iso.to_string(),
                year,
                population: (population * 1.018f64.powf(t)).round(),
                fossil_fuel_consumption: (twh * 1000.0).round() / 1000.0,
            });
        }
    }
    rows
}

fn to_batch(rows: &[Row]) -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("country", DataType::Utf8, false),
        Field::new("iso_code", DataType::Utf8, false),
        Field::new("year", DataType::Int32, false),
        Field::new("population", DataType::Float64, false),
        Field::new("fossil_fuel_consumption", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.country.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.iso_code.as_str()))),
            Arc::new(Int32Array::from_iter_values(rows.iter().map(|r| r.year))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.population))),
            Arc::new(Float64Array::from_iter_values(
                rows.iter().map(|r| r.fossil_fuel_consumption),
            )),
        ],
    )
    .context("building record batch")?;
    Ok(batch)
}

fn main() -> Result<()> {
    let mut rng = SplitMix(42);
    let rows = generate(&mut rng);

    let csv_path = "sample_energy.csv";
    let mut writer = csv::Writer::from_path(csv_path).context("creating CSV")?;
    for row in &rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;

    let batch = to_batch(&rows)?;
    let parquet_path = "sample_energy.parquet";
    let file = std::fs::File::create(parquet_path).context("creating parquet file")?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;

    println!("{}", pretty_format_batches(&[batch.slice(0, 5)])?);
    println!(
        "Wrote {} rows for {} countries to {csv_path} and {parquet_path}",
        rows.len(),
        COUNTRIES.len()
    );
    Ok(())
}
