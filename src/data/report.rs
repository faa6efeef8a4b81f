use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use super::loader;
use super::model::{Dataset, SalesRecord};

/// Maximum length of the product ranking.
pub const TOP_PRODUCT_LIMIT: usize = 10;
/// Number of rows shown in the data preview.
pub const PREVIEW_ROWS: usize = 10;

// ---------------------------------------------------------------------------
// Report values
// ---------------------------------------------------------------------------

/// Headline metrics for the KPI row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Kpis {
    pub total_sales: f64,
    pub total_profit: f64,
    pub total_units: u64,
    /// Product with the most units sold; `None` for an empty view.
    pub top_product: Option<String>,
}

/// One point of the monthly trend, in chronological order.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySales {
    pub year: i32,
    pub month: u32,
    /// Axis label, e.g. `"Jun 2021"`.
    pub label: String,
    pub total_sales: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionProfit {
    pub region: String,
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductUnits {
    pub product: String,
    pub units: u64,
}

/// One pie slice: profit of a sales method and its share of the total.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodShare {
    pub method: String,
    pub profit: f64,
    /// Percentage of the method total, 0.0 when the total is zero.
    pub share: f64,
}

/// Descriptive statistics of one numeric column over the current view.
/// Statistics are `None` when the view has too few rows to define them.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub column: &'static str,
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1 denominator); `None` when n < 2.
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

// ---------------------------------------------------------------------------
// Reports bundle
// ---------------------------------------------------------------------------

/// Every aggregate the dashboard draws from, recomputed wholesale on each
/// dataset load or selection change.
#[derive(Debug, Clone, Default)]
pub struct Reports {
    pub kpis: Kpis,
    pub monthly_sales: Vec<MonthlySales>,
    pub profit_by_region: Vec<RegionProfit>,
    pub top_products: Vec<ProductUnits>,
    pub profit_by_method: Vec<MethodShare>,
    pub summary: Vec<ColumnSummary>,
    pub preview: Vec<SalesRecord>,
}

impl Reports {
    /// Evaluate every report for the given view.
    pub fn compute(dataset: &Dataset, view: &[usize]) -> Self {
        Reports {
            kpis: Kpis {
                total_sales: total_sales(dataset, view),
                total_profit: total_profit(dataset, view),
                total_units: total_units(dataset, view),
                top_product: top_product(dataset, view),
            },
            monthly_sales: monthly_sales(dataset, view),
            profit_by_region: profit_by_region(dataset, view),
            top_products: top_products(dataset, view),
            profit_by_method: profit_by_method(dataset, view),
            summary: summary_stats(dataset, view),
            preview: preview(dataset, view),
        }
    }
}

fn view_records<'a>(
    dataset: &'a Dataset,
    view: &'a [usize],
) -> impl Iterator<Item = &'a SalesRecord> + 'a {
    view.iter().map(|&i| &dataset.records[i])
}

// ---------------------------------------------------------------------------
// KPI aggregations
// ---------------------------------------------------------------------------

pub fn total_sales(dataset: &Dataset, view: &[usize]) -> f64 {
    view_records(dataset, view).map(|r| r.total_sales).sum()
}

pub fn total_profit(dataset: &Dataset, view: &[usize]) -> f64 {
    view_records(dataset, view).map(|r| r.operating_profit).sum()
}

pub fn total_units(dataset: &Dataset, view: &[usize]) -> u64 {
    view_records(dataset, view).map(|r| r.units_sold).sum()
}

/// Product with the highest unit count.  Ties resolve to the lexically
/// first product because groups are visited in sorted order and only a
/// strictly greater count displaces the current best.
pub fn top_product(dataset: &Dataset, view: &[usize]) -> Option<String> {
    let mut units_by_product: BTreeMap<&str, u64> = BTreeMap::new();
    for rec in view_records(dataset, view) {
        *units_by_product.entry(rec.product.as_str()).or_insert(0) += rec.units_sold;
    }
    let mut best: Option<(&str, u64)> = None;
    for (product, units) in units_by_product {
        match best {
            Some((_, top)) if units <= top => {}
            _ => best = Some((product, units)),
        }
    }
    best.map(|(product, _)| product.to_string())
}

// ---------------------------------------------------------------------------
// Chart aggregations
// ---------------------------------------------------------------------------

/// Total sales per (year, month) of the invoice date, chronologically
/// ascending.  December 2020 sorts before January 2021 regardless of how
/// the labels would compare as text.
pub fn monthly_sales(dataset: &Dataset, view: &[usize]) -> Vec<MonthlySales> {
    let mut by_month: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for rec in view_records(dataset, view) {
        let key = (rec.invoice_date.year(), rec.invoice_date.month());
        *by_month.entry(key).or_insert(0.0) += rec.total_sales;
    }
    by_month
        .into_iter()
        .map(|((year, month), total_sales)| MonthlySales {
            year,
            month,
            label: month_label(year, month),
            total_sales,
        })
        .collect()
}

fn month_label(year: i32, month: u32) -> String {
    match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(d) => d.format("%b %Y").to_string(),
        None => format!("{month:02} {year}"),
    }
}

/// Operating profit per region, in sorted region order (the same order as
/// the dataset's region dimension).
pub fn profit_by_region(dataset: &Dataset, view: &[usize]) -> Vec<RegionProfit> {
    let mut by_region: BTreeMap<&str, f64> = BTreeMap::new();
    for rec in view_records(dataset, view) {
        *by_region.entry(rec.region.as_str()).or_insert(0.0) += rec.operating_profit;
    }
    by_region
        .into_iter()
        .map(|(region, profit)| RegionProfit {
            region: region.to_string(),
            profit,
        })
        .collect()
}

/// Units sold per product, descending, capped at [`TOP_PRODUCT_LIMIT`].
/// The stable sort runs over lexically ordered groups, so equal counts
/// rank alphabetically.
pub fn top_products(dataset: &Dataset, view: &[usize]) -> Vec<ProductUnits> {
    let mut units_by_product: BTreeMap<&str, u64> = BTreeMap::new();
    for rec in view_records(dataset, view) {
        *units_by_product.entry(rec.product.as_str()).or_insert(0) += rec.units_sold;
    }
    let mut ranked: Vec<ProductUnits> = units_by_product
        .into_iter()
        .map(|(product, units)| ProductUnits {
            product: product.to_string(),
            units,
        })
        .collect();
    ranked.sort_by(|a, b| b.units.cmp(&a.units));
    ranked.truncate(TOP_PRODUCT_LIMIT);
    ranked
}

/// Operating profit per sales method with each method's share of the
/// total.  A zero total (all profits cancel) yields 0.0 shares rather
/// than dividing by zero.
pub fn profit_by_method(dataset: &Dataset, view: &[usize]) -> Vec<MethodShare> {
    let mut by_method: BTreeMap<&str, f64> = BTreeMap::new();
    for rec in view_records(dataset, view) {
        *by_method.entry(rec.sales_method.as_str()).or_insert(0.0) += rec.operating_profit;
    }
    let total: f64 = by_method.values().sum();
    by_method
        .into_iter()
        .map(|(method, profit)| MethodShare {
            method: method.to_string(),
            profit,
            share: if total == 0.0 {
                0.0
            } else {
                profit / total * 100.0
            },
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Summary statistics & preview
// ---------------------------------------------------------------------------

/// Descriptive statistics for each numeric column of the view.
pub fn summary_stats(dataset: &Dataset, view: &[usize]) -> Vec<ColumnSummary> {
    let collect = |column: &'static str, value: fn(&SalesRecord) -> f64| {
        let values: Vec<f64> = view_records(dataset, view).map(value).collect();
        describe(column, values)
    };
    vec![
        collect(loader::COL_YEAR, |r| r.year as f64),
        collect(loader::COL_UNITS, |r| r.units_sold as f64),
        collect(loader::COL_SALES, |r| r.total_sales),
        collect(loader::COL_PROFIT, |r| r.operating_profit),
    ]
}

fn describe(column: &'static str, mut values: Vec<f64>) -> ColumnSummary {
    values.sort_by(f64::total_cmp);
    let count = values.len();
    if count == 0 {
        return ColumnSummary {
            column,
            count,
            mean: None,
            std: None,
            min: None,
            q25: None,
            median: None,
            q75: None,
            max: None,
        };
    }
    let n = count as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std = if count < 2 {
        None
    } else {
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        Some(var.sqrt())
    };
    ColumnSummary {
        column,
        count,
        mean: Some(mean),
        std,
        min: values.first().copied(),
        q25: Some(quantile(&values, 0.25)),
        median: Some(quantile(&values, 0.5)),
        q75: Some(quantile(&values, 0.75)),
        max: values.last().copied(),
    }
}

/// Linear-interpolation quantile over an already sorted, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let t = pos - lo as f64;
        sorted[lo] * (1.0 - t) + sorted[hi] * t
    }
}

/// First [`PREVIEW_ROWS`] rows of the view, in dataset order.
pub fn preview(dataset: &Dataset, view: &[usize]) -> Vec<SalesRecord> {
    view_records(dataset, view)
        .take(PREVIEW_ROWS)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::testutil::record;

    fn full_view(dataset: &Dataset) -> Vec<usize> {
        (0..dataset.len()).collect()
    }

    #[test]
    fn empty_view_yields_zeroed_reports() {
        let ds = Dataset::from_records(vec![record(
            "A",
            "West",
            "Online",
            2020,
            "2020-01-15",
            10,
            100.0,
            20.0,
        )]);
        let reports = Reports::compute(&ds, &[]);

        assert_eq!(reports.kpis.total_sales, 0.0);
        assert_eq!(reports.kpis.total_profit, 0.0);
        assert_eq!(reports.kpis.total_units, 0);
        assert_eq!(reports.kpis.top_product, None);
        assert!(reports.monthly_sales.is_empty());
        assert!(reports.profit_by_region.is_empty());
        assert!(reports.top_products.is_empty());
        assert!(reports.profit_by_method.is_empty());
        assert!(reports.preview.is_empty());
        for col in &reports.summary {
            assert_eq!(col.count, 0);
            assert_eq!(col.mean, None);
            assert_eq!(col.std, None);
            assert_eq!(col.min, None);
            assert_eq!(col.max, None);
        }
    }

    #[test]
    fn kpi_sums_cover_exactly_the_view() {
        let ds = Dataset::from_records(vec![
            record("A", "West", "Online", 2020, "2020-01-15", 10, 100.0, 20.0),
            record("B", "East", "Outlet", 2020, "2020-02-15", 5, 50.0, 5.0),
            record("C", "West", "Online", 2020, "2020-03-15", 2, 20.0, 2.0),
        ]);
        let view = vec![0, 2];
        assert!((total_sales(&ds, &view) - 120.0).abs() < 1e-9);
        assert!((total_profit(&ds, &view) - 22.0).abs() < 1e-9);
        assert_eq!(total_units(&ds, &view), 12);
    }

    #[test]
    fn top_product_tie_prefers_lexical_order() {
        let ds = Dataset::from_records(vec![
            record("Beta", "West", "Online", 2020, "2020-01-15", 10, 1.0, 1.0),
            record("Alpha", "West", "Online", 2020, "2020-01-16", 10, 1.0, 1.0),
        ]);
        assert_eq!(
            top_product(&ds, &full_view(&ds)),
            Some("Alpha".to_string())
        );
    }

    #[test]
    fn top_product_prefers_strictly_greater_counts() {
        let ds = Dataset::from_records(vec![
            record("Alpha", "West", "Online", 2020, "2020-01-15", 10, 1.0, 1.0),
            record("Zeta", "West", "Online", 2020, "2020-01-16", 11, 1.0, 1.0),
        ]);
        assert_eq!(top_product(&ds, &full_view(&ds)), Some("Zeta".to_string()));
    }

    #[test]
    fn monthly_sales_is_chronological_across_years() {
        let ds = Dataset::from_records(vec![
            record("A", "West", "Online", 2021, "2021-01-10", 1, 30.0, 1.0),
            record("A", "West", "Online", 2020, "2020-12-05", 1, 10.0, 1.0),
            record("A", "West", "Online", 2021, "2021-02-20", 1, 50.0, 1.0),
            record("A", "West", "Online", 2020, "2020-12-25", 1, 15.0, 1.0),
        ]);
        let trend = monthly_sales(&ds, &full_view(&ds));

        let keys: Vec<(i32, u32)> = trend.iter().map(|m| (m.year, m.month)).collect();
        assert_eq!(keys, vec![(2020, 12), (2021, 1), (2021, 2)]);

        let labels: Vec<&str> = trend.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["Dec 2020", "Jan 2021", "Feb 2021"]);

        // Same-month rows merge into one point.
        assert!((trend[0].total_sales - 25.0).abs() < 1e-9);
    }

    #[test]
    fn profit_by_region_follows_sorted_region_order() {
        let ds = Dataset::from_records(vec![
            record("A", "West", "Online", 2020, "2020-01-15", 1, 1.0, 30.0),
            record("A", "East", "Online", 2020, "2020-01-16", 1, 1.0, 10.0),
            record("A", "Midwest", "Online", 2020, "2020-01-17", 1, 1.0, 20.0),
            record("A", "West", "Online", 2020, "2020-01-18", 1, 1.0, 5.0),
        ]);
        let by_region = profit_by_region(&ds, &full_view(&ds));
        let names: Vec<&str> = by_region.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(names, vec!["East", "Midwest", "West"]);
        assert!((by_region[2].profit - 35.0).abs() < 1e-9);
    }

    #[test]
    fn top_products_caps_at_ten_descending() {
        let records: Vec<_> = (1..=12)
            .map(|i| {
                record(
                    &format!("P{i:02}"),
                    "West",
                    "Online",
                    2020,
                    "2020-01-15",
                    i * 10,
                    1.0,
                    1.0,
                )
            })
            .collect();
        let ds = Dataset::from_records(records);
        let ranked = top_products(&ds, &full_view(&ds));

        assert_eq!(ranked.len(), TOP_PRODUCT_LIMIT);
        assert_eq!(ranked[0].product, "P12");
        assert_eq!(ranked[0].units, 120);
        // P01 (10 units) and P02 (20 units) fall outside the top ten.
        assert!(ranked.iter().all(|p| p.product != "P01"));
        assert!(ranked.iter().all(|p| p.product != "P02"));
        for pair in ranked.windows(2) {
            assert!(pair[0].units >= pair[1].units);
        }
    }

    #[test]
    fn top_products_returns_all_when_fewer_than_limit() {
        let ds = Dataset::from_records(vec![
            record("A", "West", "Online", 2020, "2020-01-15", 5, 1.0, 1.0),
            record("B", "West", "Online", 2020, "2020-01-16", 9, 1.0, 1.0),
        ]);
        let ranked = top_products(&ds, &full_view(&ds));
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].product, "B");
    }

    #[test]
    fn top_products_ties_rank_alphabetically() {
        let ds = Dataset::from_records(vec![
            record("Gamma", "West", "Online", 2020, "2020-01-15", 7, 1.0, 1.0),
            record("Alpha", "West", "Online", 2020, "2020-01-16", 7, 1.0, 1.0),
            record("Beta", "West", "Online", 2020, "2020-01-17", 9, 1.0, 1.0),
        ]);
        let ranked = top_products(&ds, &full_view(&ds));
        let names: Vec<&str> = ranked.iter().map(|p| p.product.as_str()).collect();
        assert_eq!(names, vec!["Beta", "Alpha", "Gamma"]);
    }

    #[test]
    fn method_shares_sum_to_one_hundred() {
        let ds = Dataset::from_records(vec![
            record("A", "West", "Online", 2020, "2020-01-15", 1, 1.0, 50.0),
            record("A", "West", "In-store", 2020, "2020-01-16", 1, 1.0, 30.0),
            record("A", "West", "Outlet", 2020, "2020-01-17", 1, 1.0, 20.0),
        ]);
        let shares = profit_by_method(&ds, &full_view(&ds));
        let sum: f64 = shares.iter().map(|m| m.share).sum();
        assert!((sum - 100.0).abs() < 0.1);
        let online = shares.iter().find(|m| m.method == "Online").unwrap();
        assert!((online.share - 50.0).abs() < 1e-9);
    }

    #[test]
    fn zero_profit_total_yields_zero_shares() {
        let ds = Dataset::from_records(vec![
            record("A", "West", "Online", 2020, "2020-01-15", 1, 1.0, 10.0),
            record("A", "West", "Outlet", 2020, "2020-01-16", 1, 1.0, -10.0),
        ]);
        let shares = profit_by_method(&ds, &full_view(&ds));
        assert!(shares.iter().all(|m| m.share == 0.0));
    }

    #[test]
    fn describe_matches_known_quartiles() {
        let summary = describe("x", vec![4.0, 1.0, 3.0, 2.0]);
        assert_eq!(summary.count, 4);
        assert!((summary.mean.unwrap() - 2.5).abs() < 1e-9);
        assert!((summary.std.unwrap() - 1.2909944487358056).abs() < 1e-9);
        assert_eq!(summary.min, Some(1.0));
        assert!((summary.q25.unwrap() - 1.75).abs() < 1e-9);
        assert!((summary.median.unwrap() - 2.5).abs() < 1e-9);
        assert!((summary.q75.unwrap() - 3.25).abs() < 1e-9);
        assert_eq!(summary.max, Some(4.0));
    }

    #[test]
    fn describe_single_value_has_no_std() {
        let summary = describe("x", vec![7.0]);
        assert_eq!(summary.count, 1);
        assert_eq!(summary.mean, Some(7.0));
        assert_eq!(summary.std, None);
        assert_eq!(summary.q25, Some(7.0));
        assert_eq!(summary.median, Some(7.0));
        assert_eq!(summary.q75, Some(7.0));
    }

    #[test]
    fn summary_covers_the_four_numeric_columns() {
        let ds = Dataset::from_records(vec![record(
            "A",
            "West",
            "Online",
            2020,
            "2020-01-15",
            10,
            100.0,
            20.0,
        )]);
        let summary = summary_stats(&ds, &full_view(&ds));
        let columns: Vec<&str> = summary.iter().map(|c| c.column).collect();
        assert_eq!(
            columns,
            vec!["Year", "Units Sold", "Total Sales", "Operating Profit"]
        );
        assert_eq!(summary[1].mean, Some(10.0));
    }

    #[test]
    fn preview_caps_at_ten_rows_in_view_order() {
        let records: Vec<_> = (0..15)
            .map(|i| {
                record(
                    &format!("P{i:02}"),
                    "West",
                    "Online",
                    2020,
                    "2020-01-15",
                    1,
                    1.0,
                    1.0,
                )
            })
            .collect();
        let ds = Dataset::from_records(records);
        let view: Vec<usize> = (0..ds.len()).rev().collect();
        let rows = preview(&ds, &view);
        assert_eq!(rows.len(), PREVIEW_ROWS);
        assert_eq!(rows[0].product, "P14");
        assert_eq!(rows[9].product, "P05");
    }
}
