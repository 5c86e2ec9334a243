use std::collections::BTreeSet;

use super::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Filter selection: which products and regions are ticked
// ---------------------------------------------------------------------------

/// Selected values of the two categorical filters.
///
/// An empty set selects nothing; there is no "empty means all" shortcut.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub products: BTreeSet<String>,
    pub regions: BTreeSet<String>,
}

impl FilterSelection {
    /// Every product and region present in the dataset (show everything).
    pub fn all(dataset: &Dataset) -> Self {
        FilterSelection {
            products: dataset.products.iter().cloned().collect(),
            regions: dataset.regions.iter().cloned().collect(),
        }
    }

    pub fn toggle_product(&mut self, product: &str) {
        toggle(&mut self.products, product);
    }

    pub fn toggle_region(&mut self, region: &str) {
        toggle(&mut self.regions, region);
    }

    pub fn select_all_products(&mut self, dataset: &Dataset) {
        self.products = dataset.products.iter().cloned().collect();
    }

    pub fn select_all_regions(&mut self, dataset: &Dataset) {
        self.regions = dataset.regions.iter().cloned().collect();
    }

    pub fn select_no_products(&mut self) {
        self.products.clear();
    }

    pub fn select_no_regions(&mut self) {
        self.regions.clear();
    }

    /// Whether a record passes both filters.
    pub fn matches(&self, record: &Record) -> bool {
        self.products.contains(&record.product) && self.regions.contains(&record.region)
    }
}

fn toggle(set: &mut BTreeSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}

// ---------------------------------------------------------------------------
// FilteredView: the rows passing the current selection
// ---------------------------------------------------------------------------

/// Rows of a [`Dataset`] passing a filter, as indices in dataset order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// The whole dataset, unfiltered.
    pub fn full(dataset: &'a Dataset) -> Self {
        FilteredView {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    /// Rebuild a view from indices computed earlier against the same dataset.
    /// Indices out of range are dropped.
    pub fn from_indices(dataset: &'a Dataset, indices: &[usize]) -> Self {
        FilteredView {
            dataset,
            indices: indices
                .iter()
                .copied()
                .filter(|&i| i < dataset.len())
                .collect(),
        }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Records of the view, in dataset order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let records = &self.dataset.records;
        self.indices.iter().map(move |&i| &records[i])
    }
}

/// Return the rows whose product is in `products` AND region is in `regions`.
///
/// If either set is empty the result is empty.
pub fn filter<'a>(
    dataset: &'a Dataset,
    products: &BTreeSet<String>,
    regions: &BTreeSet<String>,
) -> FilteredView<'a> {
    let indices = dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| products.contains(&rec.product) && regions.contains(&rec.region))
        .map(|(i, _)| i)
        .collect();
    FilteredView { dataset, indices }
}

/// Apply a [`FilterSelection`] to a dataset.
pub fn apply<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> FilteredView<'a> {
    filter(dataset, &selection.products, &selection.regions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> Dataset {
        let rows = [
            ("P1", "R1", 2, 20.0),
            ("P2", "R1", 1, 15.0),
            ("P1", "R2", 3, 45.0),
        ];
        let records = rows
            .iter()
            .map(|&(p, r, q, t)| Record {
                date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
                product: p.to_string(),
                region: r.to_string(),
                quantity: q,
                total: t,
            })
            .collect();
        Dataset::from_records(records, None)
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn full_selection_returns_dataset_in_order() {
        let ds = sample();
        let view = apply(&ds, &FilterSelection::all(&ds));
        assert_eq!(view.indices(), &[0, 1, 2]);
        let rows: Vec<&Record> = view.iter().collect();
        assert_eq!(rows, ds.records.iter().collect::<Vec<_>>());
    }

    #[test]
    fn empty_sets_select_nothing() {
        let ds = sample();
        assert!(filter(&ds, &BTreeSet::new(), &BTreeSet::new()).is_empty());
        assert!(filter(&ds, &set(&["P1", "P2"]), &BTreeSet::new()).is_empty());
        assert!(filter(&ds, &BTreeSet::new(), &set(&["R1", "R2"])).is_empty());
    }

    #[test]
    fn both_memberships_must_hold() {
        let ds = sample();
        let view = filter(&ds, &set(&["P1"]), &set(&["R1", "R2"]));
        assert_eq!(view.indices(), &[0, 2]);

        let view = filter(&ds, &set(&["P1"]), &set(&["R1"]));
        assert_eq!(view.indices(), &[0]);

        let view = filter(&ds, &set(&["Unknown"]), &set(&["R1"]));
        assert!(view.is_empty());
    }

    #[test]
    fn toggles_and_bulk_selection() {
        let ds = sample();
        let mut sel = FilterSelection::all(&ds);
        sel.toggle_product("P2");
        assert_eq!(sel.products, set(&["P1"]));
        sel.toggle_product("P2");
        assert_eq!(sel.products, set(&["P1", "P2"]));

        sel.select_no_regions();
        assert!(apply(&ds, &sel).is_empty());
        sel.toggle_region("R2");
        assert_eq!(apply(&ds, &sel).indices(), &[2]);
        sel.select_all_regions(&ds);
        assert_eq!(sel, FilterSelection::all(&ds));
        assert!(sel.matches(&ds.records[1]));
    }

    #[test]
    fn from_indices_drops_stale_rows() {
        let ds = sample();
        let view = FilteredView::from_indices(&ds, &[0, 2, 7]);
        assert_eq!(view.indices(), &[0, 2]);
        assert_eq!(FilteredView::full(&ds).len(), 3);
    }
}
