use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::loader::REQUIRED_COLUMNS;
use crate::data::model::SalesRecord;
use crate::data::report::ColumnSummary;
use crate::util;

// ---------------------------------------------------------------------------
// Summary statistics grid
// ---------------------------------------------------------------------------

/// Stat rows × numeric columns, mirroring a `describe()` table.
pub fn summary_table(ui: &mut Ui, summary: &[ColumnSummary]) {
    if summary.is_empty() {
        return;
    }
    egui::Grid::new("summary_stats")
        .striped(true)
        .min_col_width(90.0)
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            for col in summary {
                ui.label(RichText::new(col.column).strong());
            }
            ui.end_row();

            summary_row(ui, summary, "count", |c| Some(c.count as f64), 0);
            summary_row(ui, summary, "mean", |c| c.mean, 2);
            summary_row(ui, summary, "std", |c| c.std, 2);
            summary_row(ui, summary, "min", |c| c.min, 2);
            summary_row(ui, summary, "25%", |c| c.q25, 2);
            summary_row(ui, summary, "50%", |c| c.median, 2);
            summary_row(ui, summary, "75%", |c| c.q75, 2);
            summary_row(ui, summary, "max", |c| c.max, 2);
        });
}

fn summary_row(
    ui: &mut Ui,
    summary: &[ColumnSummary],
    stat: &str,
    value: fn(&ColumnSummary) -> Option<f64>,
    decimals: usize,
) {
    ui.label(RichText::new(stat).strong());
    for col in summary {
        match value(col) {
            Some(v) => ui.label(util::format_number(v, decimals)),
            None => ui.label("–"),
        };
    }
    ui.end_row();
}

// ---------------------------------------------------------------------------
// Data preview table
// ---------------------------------------------------------------------------

/// First rows of the current view, all eight columns.
pub fn preview_table(ui: &mut Ui, rows: &[SalesRecord]) {
    if rows.is_empty() {
        ui.label("No rows to preview.");
        return;
    }
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .columns(Column::auto().resizable(true), REQUIRED_COLUMNS.len())
        .header(20.0, |mut header| {
            for col in REQUIRED_COLUMNS {
                header.col(|ui: &mut Ui| {
                    ui.label(RichText::new(col).strong());
                });
            }
        })
        .body(|mut body| {
            for rec in rows {
                body.row(18.0, |mut row| {
                    row.col(|ui: &mut Ui| {
                        ui.label(&rec.product);
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(&rec.region);
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(&rec.sales_method);
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(rec.year.to_string());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(rec.invoice_date.format("%Y-%m-%d").to_string());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(util::format_count(rec.units_sold));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(util::format_currency(rec.total_sales));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(util::format_currency(rec.operating_profit));
                    });
                });
            }
        });
}
