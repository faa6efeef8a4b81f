//! End-to-end flow tests: load → filter → aggregate, crossing module
//! boundaries the same way the UI does.

use crate::data::filter::{self, FilterSelection};
use crate::data::loader;
use crate::data::model::Dataset;
use crate::data::model::testutil::record;
use crate::data::report::Reports;
use crate::state::AppState;

fn two_row_dataset() -> Dataset {
    Dataset::from_records(vec![
        record("A", "West", "Online", 2020, "2020-06-15", 10, 100.0, 20.0),
        record("B", "East", "Outlet", 2021, "2021-06-15", 5, 50.0, 5.0),
    ])
}

#[test]
fn unfiltered_dataset_aggregates_both_rows() {
    let ds = two_row_dataset();
    let view = filter::apply(&ds, &FilterSelection::default());
    let reports = Reports::compute(&ds, &view);

    assert!((reports.kpis.total_sales - 150.0).abs() < 1e-9);
    assert!((reports.kpis.total_profit - 25.0).abs() < 1e-9);
    assert_eq!(reports.kpis.total_units, 15);
    assert_eq!(reports.kpis.top_product.as_deref(), Some("A"));
}

#[test]
fn region_filter_narrows_every_report() {
    let ds = two_row_dataset();
    let selection = FilterSelection {
        region: Some("West".to_string()),
        ..Default::default()
    };
    let view = filter::apply(&ds, &selection);
    assert_eq!(view.len(), 1);

    let reports = Reports::compute(&ds, &view);
    assert!((reports.kpis.total_sales - 100.0).abs() < 1e-9);
    assert_eq!(reports.kpis.top_product.as_deref(), Some("A"));
    assert_eq!(reports.profit_by_region.len(), 1);
    assert_eq!(reports.profit_by_region[0].region, "West");
    assert_eq!(reports.preview.len(), 1);
}

#[test]
fn unmatched_region_yields_empty_but_valid_reports() {
    let ds = two_row_dataset();
    let selection = FilterSelection {
        region: Some("North".to_string()),
        ..Default::default()
    };
    let view = filter::apply(&ds, &selection);
    assert!(view.is_empty());

    let reports = Reports::compute(&ds, &view);
    assert_eq!(reports.kpis.total_sales, 0.0);
    assert_eq!(reports.kpis.total_units, 0);
    assert_eq!(reports.kpis.top_product, None);
    assert!(reports.monthly_sales.is_empty());
    assert!(reports.profit_by_method.is_empty());
}

const EXTRACT_CSV: &str = "\
Product,Region,Sales Method,Year,Invoice Date,Units Sold,Total Sales,Operating Profit
Men's Apparel,West,Online,2020,2020-11-20,120,5400.00,1500.00
Men's Apparel,West,Online,2020,2020-12-05,80,3600.00,1000.00
Women's Apparel,West,In-store,2021,2021-01-15,200,9000.00,2600.00
Men's Apparel,Northeast,Online,2021,2021-01-20,60,2700.00,700.00
Women's Apparel,Northeast,Outlet,2021,2021-02-10,90,4050.00,1100.00
";

#[test]
fn csv_extract_flows_to_reports() {
    let ds = loader::load_csv(EXTRACT_CSV.as_bytes()).unwrap();
    assert_eq!(ds.len(), 5);
    assert_eq!(ds.regions, vec!["Northeast", "West"]);
    assert_eq!(ds.years, vec![2020, 2021]);

    let view = filter::apply(&ds, &FilterSelection::default());
    let reports = Reports::compute(&ds, &view);

    // Chronological trend across the year boundary.
    let labels: Vec<&str> = reports
        .monthly_sales
        .iter()
        .map(|m| m.label.as_str())
        .collect();
    assert_eq!(labels, vec!["Nov 2020", "Dec 2020", "Jan 2021", "Feb 2021"]);

    // Shares cover the whole profit total.
    let share_sum: f64 = reports.profit_by_method.iter().map(|m| m.share).sum();
    assert!((share_sum - 100.0).abs() < 0.1);

    assert!(reports.summary.iter().all(|c| c.count == 5));
    assert_eq!(reports.preview.len(), 5);
}

#[test]
fn year_filter_flows_through_app_state() {
    let mut state = AppState::default();
    state.set_dataset(loader::load_csv(EXTRACT_CSV.as_bytes()).unwrap());
    assert_eq!(state.visible.len(), 5);

    state.set_year(Some(2021));
    assert_eq!(state.visible.len(), 3);
    assert!((state.reports.kpis.total_sales - 15750.0).abs() < 1e-9);
    assert_eq!(
        state.reports.kpis.top_product.as_deref(),
        Some("Women's Apparel")
    );

    state.set_method(Some("Online".to_string()));
    assert_eq!(state.visible.len(), 1);
    assert_eq!(state.reports.preview.len(), 1);
    assert_eq!(state.reports.preview[0].product, "Men's Apparel");

    state.set_year(None);
    state.set_method(None);
    assert_eq!(state.visible.len(), 5);
    assert!((state.reports.kpis.total_sales - 24750.0).abs() < 1e-9);
}
