use std::path::Path;

use crate::data::filter::{self, FilterSelection};
use crate::data::loader;
use crate::data::model::Dataset;
use crate::data::report::Reports;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file is opened).
    pub dataset: Option<Dataset>,

    /// Current selector state; `None` per dimension means "All".
    pub selection: FilterSelection,

    /// Indices of records passing the current selection.
    pub visible: Vec<usize>,

    /// Aggregates for the visible records, replaced wholesale on every
    /// selection change or load.
    pub reports: Reports,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            selection: FilterSelection::default(),
            visible: Vec::new(),
            reports: Reports::default(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset: reset selectors, show everything.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.selection = FilterSelection::default();
        self.visible = (0..dataset.len()).collect();
        self.reports = Reports::compute(&dataset, &self.visible);
        self.dataset = Some(dataset);
        self.status_message = None;
    }

    /// Load an extract from disk, keeping the previous dataset on failure.
    pub fn load_path(&mut self, path: &Path) {
        match loader::load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} records ({} regions, {} methods, {} years) from {}",
                    dataset.len(),
                    dataset.regions.len(),
                    dataset.methods.len(),
                    dataset.years.len(),
                    path.display()
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    pub fn set_region(&mut self, region: Option<String>) {
        if self.selection.region != region {
            self.selection.region = region;
            self.refresh();
        }
    }

    pub fn set_method(&mut self, method: Option<String>) {
        if self.selection.method != method {
            self.selection.method = method;
            self.refresh();
        }
    }

    pub fn set_year(&mut self, year: Option<i32>) {
        if self.selection.year != year {
            self.selection.year = year;
            self.refresh();
        }
    }

    /// Recompute the visible view and every report from the selection.
    pub fn refresh(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible = filter::apply(ds, &self.selection);
            self.reports = Reports::compute(ds, &self.visible);
        }
    }
}
