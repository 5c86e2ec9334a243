use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::color::ColorMap;
use crate::data::{DataLoadError, Dataset, DatasetCache, FilterSelection, FilteredView, Snapshot};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full dashboard state, independent of rendering.
///
/// Every mutation of the filter selection runs [`Dashboard::recompute`]
/// before returning, so `snapshot` always matches `selection`.
pub struct Dashboard {
    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<Arc<Dataset>>,

    /// Memoized loader backing File → Open and File → Reload.
    cache: DatasetCache,

    /// Path of the dataset on screen; Reload re-reads this file.
    pub data_path: Option<PathBuf>,

    /// Ticked products and regions.
    pub selection: FilterSelection,

    /// Filtered rows and aggregates for the current selection.
    pub snapshot: Snapshot,

    /// Colours for product bars (keyed by product).
    pub product_colors: ColorMap,

    /// Colours for region slices (keyed by region).
    pub region_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self {
            dataset: None,
            cache: DatasetCache::new(),
            data_path: None,
            selection: FilterSelection::default(),
            snapshot: Snapshot::empty(),
            product_colors: ColorMap::default(),
            region_colors: ColorMap::default(),
            status_message: None,
        }
    }
}

impl Dashboard {
    /// Load (or fetch from cache) the dataset at `path` and install it.
    ///
    /// On failure the previous dataset stays on screen and the error is
    /// kept in `status_message`.
    pub fn open(&mut self, path: &Path) -> Result<(), DataLoadError> {
        match self.cache.get(path) {
            Ok(dataset) => {
                self.data_path = Some(path.to_path_buf());
                let unchanged = self
                    .dataset
                    .as_ref()
                    .is_some_and(|current| Arc::ptr_eq(current, &dataset));
                if !unchanged {
                    self.set_dataset(dataset);
                }
                self.status_message = None;
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
                Err(e)
            }
        }
    }

    /// Re-read the current file if it changed on disk.
    ///
    /// The filter selection survives a reload unchanged when the file did
    /// not change.
    pub fn reload(&mut self) -> Result<(), DataLoadError> {
        match self.data_path.clone() {
            Some(path) => self.open(&path),
            None => Ok(()),
        }
    }

    /// Drop the cache entry and load the current file again.
    pub fn force_reload(&mut self) -> Result<(), DataLoadError> {
        self.cache.invalidate();
        self.reload()
    }

    /// Ingest a newly loaded dataset: select everything and rebuild colours.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.selection = FilterSelection::all(&dataset);
        self.region_colors = ColorMap::pastel(&dataset.regions);
        self.dataset = Some(dataset);
        self.recompute();
    }

    /// Re-run the filter and every aggregate from scratch.
    pub fn recompute(&mut self) {
        self.snapshot = match &self.dataset {
            Some(ds) => Snapshot::compute(ds, &self.selection),
            None => Snapshot::empty(),
        };
        // Bars run dark to light in ascending revenue order.
        let ranked: Vec<String> = self
            .snapshot
            .by_product
            .iter()
            .map(|(product, _)| product.clone())
            .collect();
        self.product_colors = ColorMap::viridis(&ranked);
    }

    /// Rows of the current snapshot.
    pub fn view(&self) -> Option<FilteredView<'_>> {
        self.dataset
            .as_deref()
            .map(|ds| FilteredView::from_indices(ds, &self.snapshot.indices))
    }

    pub fn toggle_product(&mut self, product: &str) {
        self.selection.toggle_product(product);
        self.recompute();
    }

    pub fn toggle_region(&mut self, region: &str) {
        self.selection.toggle_region(region);
        self.recompute();
    }

    pub fn select_all_products(&mut self) {
        if let Some(ds) = &self.dataset {
            self.selection.select_all_products(ds);
            self.recompute();
        }
    }

    pub fn select_all_regions(&mut self) {
        if let Some(ds) = &self.dataset {
            self.selection.select_all_regions(ds);
            self.recompute();
        }
    }

    pub fn select_no_products(&mut self) {
        self.selection.select_no_products();
        self.recompute();
    }

    pub fn select_no_regions(&mut self) {
        self.selection.select_no_regions();
        self.recompute();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::viridis_palette;
    use std::io::Write;

    fn sales_file(dir: &Path) -> PathBuf {
        let path = dir.join("sales_data.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "Date,Product,Region,Quantity,Total").unwrap();
        writeln!(f, "2024-01-05,P1,R1,2,20").unwrap();
        writeln!(f, "2024-01-20,P2,R1,1,15").unwrap();
        writeln!(f, "2024-02-01,P1,R2,3,45").unwrap();
        path
    }

    #[test]
    fn open_selects_everything() {
        let dir = tempfile::tempdir().unwrap();
        let mut dash = Dashboard::default();
        dash.open(&sales_file(dir.path())).unwrap();

        assert_eq!(dash.snapshot.indices, vec![0, 1, 2]);
        assert_eq!(dash.snapshot.metrics.count, 3);
        assert_eq!(dash.view().map(|v| v.len()), Some(3));
        assert!(dash.status_message.is_none());
    }

    #[test]
    fn every_mutation_recomputes() {
        let dir = tempfile::tempdir().unwrap();
        let mut dash = Dashboard::default();
        dash.open(&sales_file(dir.path())).unwrap();

        dash.toggle_product("P2");
        assert_eq!(dash.snapshot.indices, vec![0, 2]);
        assert_eq!(dash.snapshot.metrics.total_revenue, 65.0);

        dash.toggle_region("R2");
        assert_eq!(dash.snapshot.indices, vec![0]);

        dash.select_no_products();
        assert!(dash.snapshot.is_empty());
        assert_eq!(dash.snapshot.metrics.average_sale, None);

        dash.select_all_products();
        dash.select_all_regions();
        assert_eq!(dash.snapshot.metrics.count, 3);

        dash.select_no_regions();
        assert!(dash.snapshot.is_empty());
    }

    #[test]
    fn unchanged_reload_keeps_selection() {
        let dir = tempfile::tempdir().unwrap();
        let mut dash = Dashboard::default();
        dash.open(&sales_file(dir.path())).unwrap();
        dash.toggle_product("P1");

        dash.reload().unwrap();
        assert_eq!(dash.snapshot.indices, vec![1]);

        dash.force_reload().unwrap();
        assert_eq!(dash.snapshot.indices, vec![0, 1, 2]);
    }

    #[test]
    fn failed_open_keeps_previous_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let mut dash = Dashboard::default();
        dash.open(&sales_file(dir.path())).unwrap();

        let missing = dir.path().join("nope.csv");
        assert!(dash.open(&missing).is_err());
        assert!(dash.status_message.as_deref().unwrap_or("").starts_with("Error:"));
        assert_eq!(dash.snapshot.metrics.count, 3);
        assert_eq!(dash.data_path.as_deref(), Some(dir.path().join("sales_data.csv").as_path()));

        let mut f = std::fs::OpenOptions::new()
            .append(true)
            .open(dir.path().join("sales_data.csv"))
            .unwrap();
        writeln!(f, "2024-02-10,P2,R2,4,60").unwrap();
        drop(f);

        dash.reload().unwrap();
        assert_eq!(dash.snapshot.metrics.count, 4);
        assert!(dash.status_message.is_none());
    }

    #[test]
    fn product_colours_follow_revenue_rank() {
        let dir = tempfile::tempdir().unwrap();
        let mut dash = Dashboard::default();
        dash.open(&sales_file(dir.path())).unwrap();

        // P2 (15) ranks below P1 (65).
        let palette = viridis_palette(2);
        assert_eq!(dash.product_colors.color_for("P2"), palette[0]);
        assert_eq!(dash.product_colors.color_for("P1"), palette[1]);

        dash.toggle_region("R2");
        dash.toggle_product("P2");
        assert_eq!(dash.product_colors.color_for("P1"), viridis_palette(1)[0]);
    }
}
