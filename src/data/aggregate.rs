use std::collections::BTreeMap;

use super::filter::{self, FilterSelection, FilteredView};
use super::model::{Dataset, MonthKey, Record};

// ---------------------------------------------------------------------------
// Scalar metrics
// ---------------------------------------------------------------------------

/// Headline numbers for a view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub total_revenue: f64,
    pub count: usize,
    /// Mean sale amount; `None` when the view has no rows.
    pub average_sale: Option<f64>,
}

pub fn summarize(view: &FilteredView<'_>) -> Metrics {
    let count = view.len();
    let total_revenue: f64 = view.iter().map(|r| r.total).sum();
    let average_sale = (count > 0).then(|| total_revenue / count as f64);
    Metrics {
        total_revenue,
        count,
        average_sale,
    }
}

/// Sum of `Quantity` over the view.
pub fn total_quantity(view: &FilteredView<'_>) -> u64 {
    view.iter().map(|r| u64::from(r.quantity)).sum()
}

// ---------------------------------------------------------------------------
// Group reductions
// ---------------------------------------------------------------------------

/// Sum `Total` per key.  The map iterates in key order.
pub fn group_sum<K, F>(view: &FilteredView<'_>, key_fn: F) -> BTreeMap<K, f64>
where
    K: Ord,
    F: Fn(&Record) -> K,
{
    let mut groups = BTreeMap::new();
    for rec in view.iter() {
        *groups.entry(key_fn(rec)).or_insert(0.0) += rec.total;
    }
    groups
}

/// Order groups by ascending value.  Equal values fall back to key order.
pub fn ascending_by_value<K: Ord>(groups: BTreeMap<K, f64>) -> Vec<(K, f64)> {
    let mut entries: Vec<(K, f64)> = groups.into_iter().collect();
    entries.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    entries
}

/// Revenue per product, smallest first (bar chart order).
pub fn revenue_by_product(view: &FilteredView<'_>) -> Vec<(String, f64)> {
    ascending_by_value(group_sum(view, |r| r.product.clone()))
}

/// Revenue per region, in region name order.
pub fn revenue_by_region(view: &FilteredView<'_>) -> Vec<(String, f64)> {
    group_sum(view, |r| r.region.clone()).into_iter().collect()
}

/// Revenue per calendar month, in chronological order.
pub fn revenue_by_month(view: &FilteredView<'_>) -> Vec<(MonthKey, f64)> {
    group_sum(view, Record::month).into_iter().collect()
}

/// One `[quantity, total]` point per row, in view order.
pub fn quantity_vs_total(view: &FilteredView<'_>) -> Vec<[f64; 2]> {
    view.iter()
        .map(|r| [f64::from(r.quantity), r.total])
        .collect()
}

/// Percentage of `total` that `value` represents, `None` for a zero total.
pub fn share(value: f64, total: f64) -> Option<f64> {
    (total > 0.0).then(|| value / total * 100.0)
}

// ---------------------------------------------------------------------------
// Snapshot: one full recompute of the pipeline
// ---------------------------------------------------------------------------

/// A filtered view plus every aggregate the dashboard displays.
///
/// Owns its data so it can outlive the borrow of the dataset it was built
/// from; rows are kept as indices into that dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub indices: Vec<usize>,
    pub metrics: Metrics,
    pub quantity_sold: u64,
    pub by_product: Vec<(String, f64)>,
    pub by_region: Vec<(String, f64)>,
    pub by_month: Vec<(MonthKey, f64)>,
    pub quantity_vs_total: Vec<[f64; 2]>,
}

impl Snapshot {
    /// Filter the dataset and compute all aggregates from scratch.
    pub fn compute(dataset: &Dataset, selection: &FilterSelection) -> Self {
        let view = filter::apply(dataset, selection);
        let snapshot = Snapshot {
            metrics: summarize(&view),
            quantity_sold: total_quantity(&view),
            by_product: revenue_by_product(&view),
            by_region: revenue_by_region(&view),
            by_month: revenue_by_month(&view),
            quantity_vs_total: quantity_vs_total(&view),
            indices: view.into_indices(),
        };
        log::trace!(
            "Recomputed snapshot: {} of {} rows selected",
            snapshot.indices.len(),
            dataset.len()
        );
        snapshot
    }

    /// Snapshot of an empty selection.
    pub fn empty() -> Self {
        Snapshot {
            indices: Vec::new(),
            metrics: Metrics {
                total_revenue: 0.0,
                count: 0,
                average_sale: None,
            },
            quantity_sold: 0,
            by_product: Vec::new(),
            by_region: Vec::new(),
            by_month: Vec::new(),
            quantity_vs_total: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Region revenue with its percentage of the total (pie chart labels).
    pub fn region_shares(&self) -> Vec<(&str, f64, f64)> {
        self.by_region
            .iter()
            .filter_map(|(region, value)| {
                share(*value, self.metrics.total_revenue).map(|pct| (region.as_str(), *value, pct))
            })
            .collect()
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Snapshot::empty()
    }
}
