use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};

// ---------------------------------------------------------------------------
// Column names of the input contract
// ---------------------------------------------------------------------------

pub const COL_DATE: &str = "Date";
pub const COL_PRODUCT: &str = "Product";
pub const COL_REGION: &str = "Region";
pub const COL_QUANTITY: &str = "Quantity";
pub const COL_TOTAL: &str = "Total";

/// Every column a source file must provide, in display order.
pub const REQUIRED_COLUMNS: [&str; 5] = [COL_DATE, COL_PRODUCT, COL_REGION, COL_QUANTITY, COL_TOTAL];

// ---------------------------------------------------------------------------
// Record – one sale
// ---------------------------------------------------------------------------

/// A single sales transaction (one row of the source table).
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub date: NaiveDate,
    pub product: String,
    pub region: String,
    pub quantity: u32,
    /// Monetary amount of the sale, finite and non-negative.
    pub total: f64,
}

impl Record {
    /// Calendar month this sale falls into.
    pub fn month(&self) -> MonthKey {
        MonthKey::from_date(self.date)
    }
}

// ---------------------------------------------------------------------------
// MonthKey – a date truncated to its calendar month
// ---------------------------------------------------------------------------

/// Year/month bucket. Field order makes the derived `Ord` chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn from_date(date: NaiveDate) -> Self {
        MonthKey {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset. Immutable once built; views refer to it by index.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// All records, in file order.
    pub records: Vec<Record>,
    /// Distinct products in order of first appearance.
    pub products: Vec<String>,
    /// Distinct regions in order of first appearance.
    pub regions: Vec<String>,
    /// File the records were read from, if any.
    pub source: Option<PathBuf>,
}

impl Dataset {
    /// Build the option lists from the loaded records.
    pub fn from_records(records: Vec<Record>, source: Option<PathBuf>) -> Self {
        let mut products = Vec::new();
        let mut regions = Vec::new();
        let mut seen_products = BTreeSet::new();
        let mut seen_regions = BTreeSet::new();

        for rec in &records {
            if seen_products.insert(rec.product.as_str()) {
                products.push(rec.product.clone());
            }
            if seen_regions.insert(rec.region.as_str()) {
                regions.push(rec.region.clone());
            }
        }

        Dataset {
            records,
            products,
            regions,
            source,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
