use eframe::egui::{RichText, ScrollArea, Ui};

use crate::data::report::Kpis;
use crate::state::AppState;
use crate::ui::{plot, table};
use crate::util;

// ---------------------------------------------------------------------------
// Central panel – KPI row, chart grid, tables
// ---------------------------------------------------------------------------

/// Render the dashboard in the central panel.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a sales extract to begin  (File → Open…)");
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Sales Dashboard");
            ui.add_space(4.0);
            kpi_row(ui, &state.reports.kpis);
            ui.add_space(8.0);
            ui.separator();

            if state.visible.is_empty() {
                ui.add_space(24.0);
                ui.vertical_centered(|ui: &mut Ui| {
                    ui.heading("No rows match the current filters.");
                    ui.label("Relax a selector to see the charts again.");
                });
                return;
            }

            ui.columns(2, |cols: &mut [Ui]| {
                chart_heading(&mut cols[0], "Monthly Sales (by Year & Month)");
                plot::monthly_sales_line(&mut cols[0], &state.reports.monthly_sales);
                chart_heading(&mut cols[1], "Profit by Region");
                plot::profit_by_region_bars(&mut cols[1], &state.reports.profit_by_region);
            });
            ui.add_space(12.0);
            ui.columns(2, |cols: &mut [Ui]| {
                chart_heading(&mut cols[0], "Top Products by Units Sold");
                plot::top_products_bars(&mut cols[0], &state.reports.top_products);
                chart_heading(&mut cols[1], "Profit by Sales Method");
                plot::profit_by_method_pie(&mut cols[1], &state.reports.profit_by_method);
            });

            ui.add_space(12.0);
            ui.separator();
            chart_heading(ui, "Summary Statistics");
            ui.add_space(4.0);
            table::summary_table(ui, &state.reports.summary);

            ui.add_space(12.0);
            chart_heading(ui, "Data Preview");
            ui.add_space(4.0);
            table::preview_table(ui, &state.reports.preview);
            ui.add_space(16.0);
        });
}

fn kpi_row(ui: &mut Ui, kpis: &Kpis) {
    ui.columns(4, |cols: &mut [Ui]| {
        kpi_cell(
            &mut cols[0],
            "Total Sales",
            util::format_currency(kpis.total_sales),
        );
        kpi_cell(
            &mut cols[1],
            "Total Profit",
            util::format_currency(kpis.total_profit),
        );
        kpi_cell(
            &mut cols[2],
            "Total Units Sold",
            util::format_count(kpis.total_units),
        );
        kpi_cell(
            &mut cols[3],
            "Top Product",
            kpis.top_product.as_deref().unwrap_or("n/a").to_string(),
        );
    });
}

fn kpi_cell(ui: &mut Ui, label: &str, value: String) {
    ui.label(RichText::new(label).small());
    ui.label(RichText::new(value).size(20.0).strong());
}

fn chart_heading(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).size(17.0).strong());
}
