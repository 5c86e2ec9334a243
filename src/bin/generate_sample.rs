use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use clap::Parser;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// Write a deterministic demo sales table as CSV and Parquet.
#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct Args {
    /// Directory to write sales_data.csv and sales_data.parquet into
    #[arg(short, long, default_value = "data")]
    out_dir: PathBuf,

    /// Number of sales to generate
    #[arg(short, long, default_value = "1000")]
    rows: usize,

    /// PRNG seed
    #[arg(long, default_value = "42")]
    seed: u64,
}

/// SplitMix64: enough randomness for demo data, stable across platforms.
struct SplitMix64(u64);

impl SplitMix64 {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform index in `0..n`.
    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

/// Product name and list price.
const PRODUCTS: [(&str, f64); 5] = [
    ("Laptop", 1200.0),
    ("Phone", 800.0),
    ("Tablet", 450.0),
    ("Monitor", 300.0),
    ("Headphones", 150.0),
];

const REGIONS: [&str; 4] = ["North", "South", "East", "West"];

#[derive(Debug, PartialEq, Serialize)]
struct Row {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Product")]
    product: &'static str,
    #[serde(rename = "Region")]
    region: &'static str,
    #[serde(rename = "Quantity")]
    quantity: u32,
    #[serde(rename = "Total")]
    total: f64,
}

fn generate(rows: usize, seed: u64) -> Vec<Row> {
    let mut rng = SplitMix64(seed);
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();

    let mut out: Vec<Row> = (0..rows)
        .map(|_| {
            let (product, price) = PRODUCTS[rng.below(PRODUCTS.len())];
            let region = REGIONS[rng.below(REGIONS.len())];
            let quantity = 1 + rng.below(10) as u32;
            // Up to 15% discount, rounded to cents.
            let discount = 1.0 - 0.15 * rng.unit();
            let total = (price * quantity as f64 * discount * 100.0).round() / 100.0;
            let date = start + Duration::days(rng.below(366) as i64);
            Row {
                date,
                product,
                region,
                quantity,
                total,
            }
        })
        .collect();
    out.sort_by_key(|r| r.date);
    out
}

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> Result<()> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();

    let schema = Arc::new(Schema::new(vec![
        Field::new("Date", DataType::Date32, false),
        Field::new("Product", DataType::Utf8, false),
        Field::new("Region", DataType::Utf8, false),
        Field::new("Quantity", DataType::Int64, false),
        Field::new("Total", DataType::Float64, false),
    ]));

    let dates = Date32Array::from(
        rows.iter()
            .map(|r| (r.date - epoch).num_days() as i32)
            .collect::<Vec<_>>(),
    );
    let products = StringArray::from(rows.iter().map(|r| r.product).collect::<Vec<_>>());
    let regions = StringArray::from(rows.iter().map(|r| r.region).collect::<Vec<_>>());
    let quantities = Int64Array::from(rows.iter().map(|r| r.quantity as i64).collect::<Vec<_>>());
    let totals = Float64Array::from(rows.iter().map(|r| r.total).collect::<Vec<_>>());

    let columns: Vec<ArrayRef> = vec![
        Arc::new(dates),
        Arc::new(products),
        Arc::new(regions),
        Arc::new(quantities),
        Arc::new(totals),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let rows = generate(args.rows, args.seed);

    let csv_path = args.out_dir.join("sales_data.csv");
    write_csv(&csv_path, &rows)?;
    let parquet_path = args.out_dir.join("sales_data.parquet");
    write_parquet(&parquet_path, &rows)?;

    let revenue: f64 = rows.iter().map(|r| r.total).sum();
    println!(
        "Wrote {} sales (${revenue:.2} revenue) to {} and {}",
        rows.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
