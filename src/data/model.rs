use std::collections::BTreeSet;

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// SalesRecord – one row of the sales extract
// ---------------------------------------------------------------------------

/// A single sale line item (one row of the source extract).
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub product: String,
    pub region: String,
    pub sales_method: String,
    /// Reporting year as recorded in the extract (the `Year` column, not
    /// derived from the invoice date).
    pub year: i32,
    pub invoice_date: NaiveDate,
    pub units_sold: u64,
    pub total_sales: f64,
    pub operating_profit: f64,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded extract
// ---------------------------------------------------------------------------

/// The full parsed extract with pre-computed filter dimensions.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// All sale records (rows), in file order.
    pub records: Vec<SalesRecord>,
    /// Sorted distinct regions.
    pub regions: Vec<String>,
    /// Sorted distinct sales methods.
    pub methods: Vec<String>,
    /// Sorted distinct years.
    pub years: Vec<i32>,
}

impl Dataset {
    /// Build the filter dimensions from the loaded records.
    pub fn from_records(records: Vec<SalesRecord>) -> Self {
        let mut regions: BTreeSet<String> = BTreeSet::new();
        let mut methods: BTreeSet<String> = BTreeSet::new();
        let mut years: BTreeSet<i32> = BTreeSet::new();

        for rec in &records {
            regions.insert(rec.region.clone());
            methods.insert(rec.sales_method.clone());
            years.insert(rec.year);
        }
        Dataset {
            records,
            regions: regions.into_iter().collect(),
            methods: methods.into_iter().collect(),
            years: years.into_iter().collect(),
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


#[cfg(test)]
mod tests {
    use super::testutil::record;
    use super::*;

    #[test]
    fn filter_dimensions_are_sorted_and_distinct() {
        let dataset = Dataset::from_records(vec![
            record("A", "West", "Online", 2021, "2021-03-01", 1, 10.0, 1.0),
            record("B", "East", "Outlet", 2020, "2020-07-15", 2, 20.0, 2.0),
            record("C", "West", "Online", 2020, "2020-01-05", 3, 30.0, 3.0),
        ]);

        assert_eq!(dataset.regions, vec!["East", "West"]);
        assert_eq!(dataset.methods, vec!["Online", "Outlet"]);
        assert_eq!(dataset.years, vec![2020, 2021]);
        assert_eq!(dataset.len(), 3);
        assert!(!dataset.is_empty());
    }

    #[test]
    fn empty_dataset_has_empty_dimensions() {
        let dataset = Dataset::from_records(Vec::new());
        assert!(dataset.is_empty());
        assert!(dataset.regions.is_empty());
        assert!(dataset.methods.is_empty());
        assert!(dataset.years.is_empty());
    }
}
