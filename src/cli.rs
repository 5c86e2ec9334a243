//! Command-line interface argument parsing.

use std::path::PathBuf;

use clap::Parser;

use sales_dashboard::config::Config;

/// Sales Performance Dashboard
///
/// Load a table of sales (Date, Product, Region, Quantity, Total) and
/// explore it by product and region.
///
/// Examples:
///   sales-dashboard
///   sales-dashboard exports/2024.csv
///   sales-dashboard --config team.toml
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Sales file to open (.csv, .tsv, .json, .parquet)
    ///
    /// Defaults to `[data] path` from the config, or data/sales_data.csv.
    #[arg(value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Configuration file (TOML)
    ///
    /// When omitted, ./dashboard.toml is used if it exists.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// The data file to open: the positional argument wins over the config.
    pub fn data_path(&self, config: &Config) -> PathBuf {
        self.data
            .clone()
            .unwrap_or_else(|| config.data.path.clone())
    }
}
