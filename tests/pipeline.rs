use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use sales_dashboard::data::aggregate::{revenue_by_month, revenue_by_product, revenue_by_region};
use sales_dashboard::data::filter::apply;
use sales_dashboard::{
    filter, group_sum, load, summarize, DataLoadError, Dashboard, FilterSelection, FilteredView,
    Snapshot,
};

const SALES_CSV: &str = "\
Date,Product,Region,Quantity,Total
2024-01-05,P1,R1,2,20
2024-01-20,P2,R1,1,15
2024-02-01,P1,R2,3,45
";

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn three_sales_walkthrough() {
    let dir = tempfile::tempdir().unwrap();
    let ds = load(&write(dir.path(), "sales.csv", SALES_CSV)).unwrap();

    let p1 = filter(&ds, &set(&["P1"]), &set(&["R1", "R2"]));
    assert_eq!(p1.len(), 2);
    assert!(approx(summarize(&p1).total_revenue, 65.0));

    let all = filter(&ds, &set(&["P1", "P2"]), &set(&["R1", "R2"]));
    let by_product = group_sum(&all, |r| r.product.clone());
    assert!(approx(by_product["P1"], 65.0));
    assert!(approx(by_product["P2"], 15.0));

    let metrics = summarize(&all);
    assert!(approx(metrics.total_revenue, 80.0));
    assert_eq!(metrics.count, 3);
    assert_eq!(format!("{:.2}", metrics.average_sale.unwrap()), "26.67");
}

#[test]
fn full_selection_is_identity_and_empty_selection_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let ds = load(&write(dir.path(), "sales.csv", SALES_CSV)).unwrap();

    let everything = apply(&ds, &FilterSelection::all(&ds));
    let rows: Vec<_> = everything.iter().cloned().collect();
    assert_eq!(rows, ds.records);

    let nothing = filter(&ds, &BTreeSet::new(), &BTreeSet::new());
    assert!(nothing.is_empty());
    let metrics = summarize(&nothing);
    assert_eq!(metrics.count, 0);
    assert!(metrics.average_sale.is_none());
}

#[test]
fn months_bucket_by_calendar_month() {
    let dir = tempfile::tempdir().unwrap();
    let ds = load(&write(dir.path(), "sales.csv", SALES_CSV)).unwrap();
    let months: Vec<(String, f64)> = revenue_by_month(&FilteredView::full(&ds))
        .into_iter()
        .map(|(m, v)| (m.to_string(), v))
        .collect();
    assert_eq!(
        months,
        vec![("2024-01".to_string(), 35.0), ("2024-02".to_string(), 45.0)]
    );
}

#[test]
fn group_sums_match_total_for_every_selection() {
    let dir = tempfile::tempdir().unwrap();
    let ds = load(&write(dir.path(), "sales.csv", SALES_CSV)).unwrap();

    let product_sets = [vec![], vec!["P1"], vec!["P2"], vec!["P1", "P2"]];
    let region_sets = [vec![], vec!["R1"], vec!["R2"], vec!["R1", "R2"]];
    for products in &product_sets {
        for regions in &region_sets {
            let view = filter(&ds, &set(products), &set(regions));
            let total = summarize(&view).total_revenue;
            let sum = |groups: Vec<f64>| groups.iter().sum::<f64>();
            assert!(approx(sum(revenue_by_product(&view).into_iter().map(|g| g.1).collect()), total));
            assert!(approx(sum(revenue_by_region(&view).into_iter().map(|g| g.1).collect()), total));
            assert!(approx(sum(revenue_by_month(&view).into_iter().map(|g| g.1).collect()), total));
        }
    }
}

#[test]
fn reloading_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "sales.csv", SALES_CSV);
    assert_eq!(load(&path).unwrap(), load(&path).unwrap());
}

#[test]
fn tsv_json_and_csv_agree() {
    let dir = tempfile::tempdir().unwrap();
    let csv = load(&write(dir.path(), "sales.csv", SALES_CSV)).unwrap();

    let tsv = load(&write(dir.path(), "sales.tsv", &SALES_CSV.replace(',', "\t"))).unwrap();
    assert_eq!(tsv.records, csv.records);

    let json = r#"[
        {"Date": "2024-01-05", "Product": "P1", "Region": "R1", "Quantity": 2, "Total": 20},
        {"Date": "2024-01-20", "Product": "P2", "Region": "R1", "Quantity": 1, "Total": 15.0},
        {"Date": "2024-02-01T00:00:00", "Product": "P1", "Region": "R2", "Quantity": 3, "Total": 45}
    ]"#;
    let json = load(&write(dir.path(), "sales.json", json)).unwrap();
    assert_eq!(json.records, csv.records);
}

#[test]
fn parquet_with_string_dates_and_narrow_ints() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sales.parquet");

    let schema = Arc::new(Schema::new(vec![
        Field::new("Date", DataType::Utf8, false),
        Field::new("Product", DataType::Utf8, false),
        Field::new("Region", DataType::Utf8, false),
        Field::new("Quantity", DataType::Int32, false),
        Field::new("Total", DataType::Float64, false),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(vec!["2024-01-05", "2024-01-20", "2024-02-01"])),
        Arc::new(StringArray::from(vec!["P1", "P2", "P1"])),
        Arc::new(StringArray::from(vec!["R1", "R1", "R2"])),
        Arc::new(Int32Array::from(vec![2, 1, 3])),
        Arc::new(Float64Array::from(vec![20.0, 15.0, 45.0])),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();
    let mut writer = ArrowWriter::try_new(std::fs::File::create(&path).unwrap(), schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let parquet = load(&path).unwrap();
    let csv = load(&write(dir.path(), "sales.csv", SALES_CSV)).unwrap();
    assert_eq!(parquet.records, csv.records);
    assert_eq!(parquet.products, vec!["P1", "P2"]);
}

#[test]
fn parquet_missing_column() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.parquet");

    let schema = Arc::new(Schema::new(vec![
        Field::new("Date", DataType::Utf8, false),
        Field::new("Product", DataType::Utf8, false),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(vec!["2024-01-05"])),
        Arc::new(StringArray::from(vec!["P1"])),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();
    let mut writer = ArrowWriter::try_new(std::fs::File::create(&path).unwrap(), schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    assert!(matches!(
        load(&path).unwrap_err(),
        DataLoadError::MissingColumn("Region")
    ));
}

#[test]
fn load_errors() {
    let dir = tempfile::tempdir().unwrap();

    assert!(matches!(
        load(&dir.path().join("absent.csv")).unwrap_err(),
        DataLoadError::Io { .. }
    ));

    let no_total = write(dir.path(), "no_total.csv", "Date,Product,Region,Quantity\n2024-01-01,P,R,1\n");
    assert!(matches!(
        load(&no_total).unwrap_err(),
        DataLoadError::MissingColumn("Total")
    ));

    let bad_date = write(dir.path(), "bad.csv", "Date,Product,Region,Quantity,Total\nsoon,P,R,1,2\n");
    let err = load(&bad_date).unwrap_err();
    assert!(err.to_string().contains("row 1, column 'Date'"), "{err}");
}

#[test]
fn dashboard_recomputes_on_every_interaction() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "sales.csv", SALES_CSV);

    let mut dash = Dashboard::default();
    dash.open(&path).unwrap();
    let dataset = dash.dataset.clone().unwrap();

    let interactions: [fn(&mut Dashboard); 5] = [
        |d| d.toggle_product("P1"),
        |d| d.toggle_region("R1"),
        |d| d.select_all_regions(),
        |d| d.select_no_products(),
        |d| d.select_all_products(),
    ];
    for interact in interactions {
        interact(&mut dash);
        assert_eq!(dash.snapshot, Snapshot::compute(&dataset, &dash.selection));
    }
    assert_eq!(dash.snapshot.metrics.count, 3);
}
