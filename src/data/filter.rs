use super::model::Dataset;

// ---------------------------------------------------------------------------
// Filter selection: one optional value per dimension
// ---------------------------------------------------------------------------

/// The current selector state.  `None` is the "All" sentinel for a
/// dimension; `Some(v)` keeps only rows whose value equals `v` exactly
/// (case-sensitive, no trimming or folding).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub region: Option<String>,
    pub method: Option<String>,
    pub year: Option<i32>,
}

impl FilterSelection {
    /// Whether every dimension is set to "All".
    pub fn is_all(&self) -> bool {
        self.region.is_none() && self.method.is_none() && self.year.is_none()
    }
}

/// Return indices of records that pass every active dimension.
///
/// The dataset is never mutated; an all-"All" selection yields every
/// index in order, and an empty result is legal (the aggregation layer
/// handles it).
pub fn apply(dataset: &Dataset, selection: &FilterSelection) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            selection
                .region
                .as_deref()
                .map_or(true, |v| rec.region == v)
                && selection
                    .method
                    .as_deref()
                    .map_or(true, |v| rec.sales_method == v)
                && selection.year.map_or(true, |v| rec.year == v)
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::testutil::record;

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            record("A", "West", "Online", 2020, "2020-01-15", 10, 100.0, 20.0),
            record("B", "East", "Outlet", 2021, "2021-06-15", 5, 50.0, 5.0),
            record("C", "West", "Outlet", 2021, "2021-07-01", 2, 20.0, 2.0),
            record("D", "West", "Online", 2021, "2021-08-10", 8, 80.0, 8.0),
        ])
    }

    #[test]
    fn all_sentinel_selection_is_identity() {
        let ds = dataset();
        let selection = FilterSelection::default();
        assert!(selection.is_all());
        assert_eq!(apply(&ds, &selection), vec![0, 1, 2, 3]);
    }

    #[test]
    fn view_is_a_subset_in_dataset_order() {
        let ds = dataset();
        let selection = FilterSelection {
            region: Some("West".to_string()),
            ..Default::default()
        };
        let view = apply(&ds, &selection);
        assert_eq!(view, vec![0, 2, 3]);
        for &i in &view {
            assert!(i < ds.len());
        }
    }

    #[test]
    fn dimensions_combine_with_and() {
        let ds = dataset();
        let selection = FilterSelection {
            region: Some("West".to_string()),
            method: Some("Online".to_string()),
            year: Some(2021),
        };
        assert_eq!(apply(&ds, &selection), vec![3]);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let ds = dataset();
        let selection = FilterSelection {
            region: Some("west".to_string()),
            ..Default::default()
        };
        assert!(apply(&ds, &selection).is_empty());
    }

    #[test]
    fn unmatched_value_yields_empty_view() {
        let ds = dataset();
        let selection = FilterSelection {
            region: Some("North".to_string()),
            ..Default::default()
        };
        assert!(apply(&ds, &selection).is_empty());
    }
}
