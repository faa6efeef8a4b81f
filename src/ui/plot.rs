use std::f32::consts::{FRAC_PI_2, TAU};
use std::ops::RangeInclusive;

use eframe::egui::{
    Align2, Color32, CornerRadius, FontId, Painter, Pos2, Rect, Sense, Shape, Stroke, Ui, Vec2,
};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points};

use crate::color;
use crate::data::report::{MethodShare, MonthlySales, ProductUnits, RegionProfit};
use crate::util;

const CHART_HEIGHT: f32 = 260.0;

/// Map a tick position to its category label; empty between categories.
fn axis_label(labels: &[String], value: f64) -> String {
    if value < -0.5 {
        return String::new();
    }
    let rounded = value.round();
    if (value - rounded).abs() > 1e-4 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Monthly sales trend (line)
// ---------------------------------------------------------------------------

/// Line chart of total sales per month, with point markers.
pub fn monthly_sales_line(ui: &mut Ui, trend: &[MonthlySales]) {
    let coords: Vec<[f64; 2]> = trend
        .iter()
        .enumerate()
        .map(|(i, m)| [i as f64, m.total_sales])
        .collect();
    let x_labels: Vec<String> = trend.iter().map(|m| m.label.clone()).collect();

    let line = Line::new(PlotPoints::from(coords.clone()))
        .name("Total Sales")
        .color(color::ACCENT)
        .width(2.5);
    let markers = Points::new(PlotPoints::from(coords))
        .color(color::ACCENT)
        .radius(3.0);

    Plot::new("monthly_sales")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Month-Year")
        .y_axis_label("Total Sales ($)")
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            axis_label(&x_labels, mark.value)
        })
        .y_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| {
            util::format_number(mark.value, 0)
        })
        .include_y(0.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.line(line);
            plot_ui.points(markers);
        });
}

// ---------------------------------------------------------------------------
// Profit by region (vertical bars)
// ---------------------------------------------------------------------------

/// Vertical bars, one region per slot in report order.
pub fn profit_by_region_bars(ui: &mut Ui, by_region: &[RegionProfit]) {
    let palette = color::blue_ramp(by_region.len());
    let bars: Vec<Bar> = by_region
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Bar::new(i as f64, r.profit)
                .name(&r.region)
                .width(0.6)
                .fill(palette[i])
        })
        .collect();
    let x_labels: Vec<String> = by_region.iter().map(|r| r.region.clone()).collect();

    let chart = BarChart::new(bars).element_formatter(Box::new(|bar, _chart| {
        format!("{}\n{}", bar.name, util::format_currency(bar.value))
    }));

    Plot::new("profit_by_region")
        .height(CHART_HEIGHT)
        .x_axis_label("Region")
        .y_axis_label("Profit ($)")
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            axis_label(&x_labels, mark.value)
        })
        .y_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| {
            util::format_number(mark.value, 0)
        })
        .include_y(0.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
        });
}

// ---------------------------------------------------------------------------
// Top products (horizontal bars)
// ---------------------------------------------------------------------------

/// Horizontal bars with the largest product at the top.
pub fn top_products_bars(ui: &mut Ui, ranked: &[ProductUnits]) {
    let n = ranked.len();
    let palette = color::blue_ramp(n);

    // Rows render bottom-up, so reverse the ranking to put #1 on top and
    // keep the darkest ramp color on the largest bar.
    let bars: Vec<Bar> = ranked
        .iter()
        .rev()
        .enumerate()
        .map(|(i, p)| {
            Bar::new(i as f64, p.units as f64)
                .name(&p.product)
                .width(0.6)
                .fill(palette[n - 1 - i])
        })
        .collect();
    let y_labels: Vec<String> = ranked.iter().rev().map(|p| p.product.clone()).collect();

    let chart = BarChart::new(bars)
        .horizontal()
        .element_formatter(Box::new(|bar, _chart| {
            format!("{}\n{} units", bar.name, util::format_number(bar.value, 0))
        }));

    Plot::new("top_products")
        .height(CHART_HEIGHT)
        .x_axis_label("Units Sold")
        .y_axis_label("Product")
        .x_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| {
            util::format_number(mark.value, 0)
        })
        .y_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            axis_label(&y_labels, mark.value)
        })
        .include_x(0.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
        });
}

// ---------------------------------------------------------------------------
// Profit by sales method (pie)
// ---------------------------------------------------------------------------

/// Pie of each method's share of operating profit.  egui_plot has no pie
/// primitive, so the slices are painted directly.
pub fn profit_by_method_pie(ui: &mut Ui, shares: &[MethodShare]) {
    let desired = Vec2::new(ui.available_width(), CHART_HEIGHT);
    let (response, painter) = ui.allocate_painter(desired, Sense::hover());
    let rect = response.rect;

    let palette = color::blue_ramp(shares.len());
    let positive_total: f64 = shares.iter().map(|m| m.profit.max(0.0)).sum();

    if shares.is_empty() || positive_total <= 0.0 {
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            "No profit to chart",
            FontId::proportional(14.0),
            ui.visuals().weak_text_color(),
        );
        return;
    }

    let center = Pos2::new(rect.left() + rect.width() * 0.33, rect.center().y);
    let radius = (rect.height() * 0.5 - 8.0).min(rect.width() * 0.25);

    // Wedge geometry uses only positive profits; the labels still show
    // each method's share of the signed total.
    let mut start = -FRAC_PI_2;
    for (i, m) in shares.iter().enumerate() {
        let fraction = (m.profit.max(0.0) / positive_total) as f32;
        if fraction <= 0.0 {
            continue;
        }
        let end = start + fraction * TAU;
        paint_wedge(&painter, center, radius, start, end, palette[i]);

        if fraction >= 0.04 {
            let mid = (start + end) * 0.5;
            let pos = center + Vec2::angled(mid) * (radius * 0.6);
            painter.text(
                pos,
                Align2::CENTER_CENTER,
                format!("{:.1}%", m.share),
                FontId::proportional(12.0),
                Color32::WHITE,
            );
        }
        start = end;
    }

    let legend_x = rect.left() + rect.width() * 0.62;
    let mut y = rect.top() + 12.0;
    for (i, m) in shares.iter().enumerate() {
        let swatch = Rect::from_min_size(Pos2::new(legend_x, y), Vec2::splat(12.0));
        painter.rect_filled(swatch, CornerRadius::same(2), palette[i]);
        painter.text(
            Pos2::new(legend_x + 18.0, y + 6.0),
            Align2::LEFT_CENTER,
            format!("{}  {:.1}%", m.method, m.share),
            FontId::proportional(13.0),
            ui.visuals().text_color(),
        );
        y += 20.0;
    }
}

/// Approximate a circle sector with a fan of thin triangles.
fn paint_wedge(
    painter: &Painter,
    center: Pos2,
    radius: f32,
    start: f32,
    end: f32,
    fill: Color32,
) {
    const STEP: f32 = 0.05;
    let arc = |angle: f32| center + Vec2::angled(angle) * radius;

    let mut a0 = start;
    while a0 < end {
        let a1 = (a0 + STEP).min(end);
        painter.add(Shape::convex_polygon(
            vec![center, arc(a0), arc(a1)],
            fill,
            Stroke::NONE,
        ));
        a0 = a1;
    }
}
