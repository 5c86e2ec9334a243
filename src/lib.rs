pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;

// Re-exports for library users
pub use app::SalesDashboardApp;
pub use data::{
    filter, group_sum, load, summarize, DataLoadError, Dataset, DatasetCache, FilterSelection,
    FilteredView, Metrics, Record, Snapshot,
};
pub use state::Dashboard;
