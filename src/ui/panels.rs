use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – dataset info and filter selectors
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters & Dataset Info");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    ui.label(format!("{} sale records", dataset.len()));
    ui.label(
        RichText::new(format!(
            "{} regions, {} sales methods, {} years",
            dataset.regions.len(),
            dataset.methods.len(),
            dataset.years.len()
        ))
        .small(),
    );
    ui.add_space(8.0);

    // Clone the option lists so the selectors can mutate state.
    let regions = dataset.regions.clone();
    let methods = dataset.methods.clone();
    let years = dataset.years.clone();

    ui.strong("Region");
    let mut region = state.selection.region.clone();
    if option_combo(ui, "region_filter", &mut region, &regions) {
        state.set_region(region);
    }
    ui.add_space(6.0);

    ui.strong("Sales Method");
    let mut method = state.selection.method.clone();
    if option_combo(ui, "method_filter", &mut method, &methods) {
        state.set_method(method);
    }
    ui.add_space(6.0);

    ui.strong("Year");
    let mut year = state.selection.year;
    if option_combo(ui, "year_filter", &mut year, &years) {
        state.set_year(year);
    }
}

/// Selector for one dimension: "All" plus each distinct value.
/// Returns true when the user picked a different entry.
fn option_combo<T: Clone + PartialEq + ToString>(
    ui: &mut Ui,
    id: &str,
    current: &mut Option<T>,
    values: &[T],
) -> bool {
    let mut changed = false;
    let selected_text = current
        .as_ref()
        .map_or_else(|| "All".to_string(), |v| v.to_string());

    egui::ComboBox::from_id_salt(id)
        .selected_text(selected_text)
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(current.is_none(), "All").clicked() && current.is_some() {
                *current = None;
                changed = true;
            }
            for value in values {
                let is_selected = current.as_ref() == Some(value);
                if ui.selectable_label(is_selected, value.to_string()).clicked() && !is_selected {
                    *current = Some(value.clone());
                    changed = true;
                }
            }
        });
    changed
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} matching",
                ds.len(),
                state.visible.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sales extract")
        .add_filter("Supported files", &["csv", "parquet", "pq", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
