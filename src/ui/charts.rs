use std::f64::consts::{FRAC_PI_2, TAU};
use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, RichText, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, GridMark, Legend, Line, MarkerShape, Plot, PlotPoint, Points, Polygon, Text,
};

use crate::data::format::{format_count, format_currency, format_optional_currency};
use crate::data::Snapshot;
use crate::state::Dashboard;

const CHART_HEIGHT: f32 = 300.0;
const LINE_COLOR: Color32 = Color32::from_rgb(31, 119, 180);
const SCATTER_COLOR: Color32 = Color32::from_rgb(214, 96, 77);

const NO_ROWS: &str = "No sales match the current filters.";
const NO_REVENUE: &str = "The selected sales have no revenue to chart.";

/// Shown in place of a chart that has nothing to draw.
fn empty_placeholder(ui: &mut Ui, text: &str) {
    ui.add_sized(
        [ui.available_width(), 60.0],
        egui::Label::new(RichText::new(text).italics().weak()),
    );
}

/// Why the pie cannot be drawn, if it cannot.
fn pie_placeholder(snapshot: &Snapshot) -> Option<&'static str> {
    if snapshot.is_empty() {
        Some(NO_ROWS)
    } else if snapshot.region_shares().is_empty() {
        Some(NO_REVENUE)
    } else {
        None
    }
}

/// Axis formatter that prints `labels[i]` at integer positions only.
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }
}

fn currency_axis(symbol: String) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| format_currency(mark.value, 0, &symbol)
}

// ---------------------------------------------------------------------------
// Key metrics
// ---------------------------------------------------------------------------

fn metric_card(ui: &mut Ui, label: &str, value: String) {
    ui.group(|ui: &mut Ui| {
        ui.set_min_width(ui.available_width());
        ui.label(RichText::new(label).weak());
        ui.label(RichText::new(value).size(26.0).strong());
    });
}

/// Total revenue, number of sales, and average sale side by side.
pub fn key_metrics(ui: &mut Ui, state: &Dashboard, symbol: &str) {
    let metrics = &state.snapshot.metrics;
    ui.columns(3, |cols: &mut [Ui]| {
        metric_card(
            &mut cols[0],
            "Total Revenue",
            format_currency(metrics.total_revenue, 0, symbol),
        );
        metric_card(&mut cols[1], "Total Sales", format_count(metrics.count as u64));
        metric_card(
            &mut cols[2],
            "Average Sale",
            format_optional_currency(metrics.average_sale, 0, symbol),
        );
    });
}

// ---------------------------------------------------------------------------
// Bar: revenue by product
// ---------------------------------------------------------------------------

/// Horizontal bars, smallest product at the bottom.
pub fn revenue_by_product(ui: &mut Ui, state: &Dashboard, symbol: &str) {
    let groups = &state.snapshot.by_product;
    if groups.is_empty() {
        empty_placeholder(ui, NO_ROWS);
        return;
    }

    let bars: Vec<Bar> = groups
        .iter()
        .enumerate()
        .map(|(i, (product, revenue))| {
            Bar::new(i as f64, *revenue)
                .name(product)
                .fill(state.product_colors.color_for(product))
                .width(0.7)
        })
        .collect();
    let labels = groups.iter().map(|(p, _)| p.clone()).collect();

    Plot::new("revenue_by_product")
        .height(CHART_HEIGHT)
        .x_axis_label(format!("Revenue ({symbol})"))
        .y_axis_label("Product")
        .y_axis_formatter(category_axis(labels))
        .x_axis_formatter(currency_axis(symbol.to_string()))
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().name("Revenue"));
        });
}

// ---------------------------------------------------------------------------
// Line: revenue per month
// ---------------------------------------------------------------------------

/// Monthly revenue with circle markers, months in chronological order.
pub fn monthly_trend(ui: &mut Ui, state: &Dashboard, symbol: &str) {
    let months = &state.snapshot.by_month;
    if months.is_empty() {
        empty_placeholder(ui, NO_ROWS);
        return;
    }

    let points: Vec<[f64; 2]> = months
        .iter()
        .enumerate()
        .map(|(i, (_, revenue))| [i as f64, *revenue])
        .collect();
    let labels = months.iter().map(|(m, _)| m.to_string()).collect();

    Plot::new("monthly_trend")
        .height(CHART_HEIGHT)
        .x_axis_label("Month")
        .y_axis_label(format!("Revenue ({symbol})"))
        .x_axis_formatter(category_axis(labels))
        .y_axis_formatter(currency_axis(symbol.to_string()))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points.clone())
                    .name("Monthly revenue")
                    .color(LINE_COLOR)
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(points)
                    .shape(MarkerShape::Circle)
                    .radius(4.0)
                    .filled(true)
                    .color(LINE_COLOR),
            );
        });
}

// ---------------------------------------------------------------------------
// Pie: revenue share per region
// ---------------------------------------------------------------------------

/// Points of a pie wedge from `start` to `end` (radians), centred on 0,0.
fn wedge(start: f64, end: f64) -> Vec<[f64; 2]> {
    let steps = ((end - start) / TAU * 128.0).ceil().max(2.0) as usize;
    let mut pts = Vec::with_capacity(steps + 2);
    pts.push([0.0, 0.0]);
    for s in 0..=steps {
        let a = start + (end - start) * s as f64 / steps as f64;
        pts.push([a.cos(), a.sin()]);
    }
    pts
}

/// Pie starting at 12 o'clock, running counter-clockwise, with percentage
/// labels on each slice.
pub fn region_distribution(ui: &mut Ui, state: &Dashboard, symbol: &str) {
    if let Some(text) = pie_placeholder(&state.snapshot) {
        empty_placeholder(ui, text);
        return;
    }
    let shares = state.snapshot.region_shares();

    Plot::new("region_distribution")
        .height(CHART_HEIGHT)
        .data_aspect(1.0)
        .legend(Legend::default())
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            let mut start = FRAC_PI_2;
            for (region, revenue, pct) in shares {
                let end = start + TAU * pct / 100.0;
                let name = format!("{region}  {}", format_currency(revenue, 0, symbol));
                plot_ui.polygon(
                    Polygon::new(wedge(start, end))
                        .fill_color(state.region_colors.color_for(region))
                        .stroke(Stroke::new(1.0, Color32::WHITE))
                        .name(name),
                );

                let mid = (start + end) / 2.0;
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(0.6 * mid.cos(), 0.6 * mid.sin()),
                        RichText::new(format!("{pct:.1}%")).color(Color32::BLACK),
                    ),
                );
                start = end;
            }
        });
}

// ---------------------------------------------------------------------------
// Scatter: quantity vs total
// ---------------------------------------------------------------------------

/// One point per sale.
pub fn quantity_vs_total(ui: &mut Ui, state: &Dashboard, symbol: &str) {
    let pairs = &state.snapshot.quantity_vs_total;
    if pairs.is_empty() {
        empty_placeholder(ui, NO_ROWS);
        return;
    }

    Plot::new("quantity_vs_total")
        .height(CHART_HEIGHT)
        .x_axis_label("Quantity")
        .y_axis_label(format!("Total ({symbol})"))
        .y_axis_formatter(currency_axis(symbol.to_string()))
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(pairs.clone())
                    .shape(MarkerShape::Circle)
                    .radius(3.0)
                    .filled(true)
                    .color(SCATTER_COLOR)
                    .name("Sales"),
            );
        });
}
