/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset   (memoized by cache)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Record>, product/region options
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSelection → FilteredView (row indices)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  metrics, group sums, scatter pairs → Snapshot
///   └───────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod filter;
pub mod format;
pub mod loader;
pub mod model;

pub use aggregate::{group_sum, summarize, Metrics, Snapshot};
pub use cache::DatasetCache;
pub use error::DataLoadError;
pub use filter::{filter, FilterSelection, FilteredView};
pub use loader::load;
pub use model::{Dataset, MonthKey, Record};
