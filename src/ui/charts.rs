use std::ops::RangeInclusive;

use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, GridMark, Plot};

use cord_explorer::data::aggregate::{CategoryCount, YearCount};

use crate::color;

const CHART_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Shared plot setup
// ---------------------------------------------------------------------------

/// A static plot: counts are read off, not explored.
fn static_plot(id: &str) -> Plot {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show_grid([false, true])
}

/// Axis formatter showing `labels[i]` at integer position `i`.
fn category_formatter(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let pos = mark.value;
        if pos.fract() != 0.0 || pos < 0.0 {
            return String::new();
        }
        labels.get(pos as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

/// Vertical bars, one per year present in the selection.
pub fn publications_by_year(ui: &mut Ui, counts: &[YearCount]) {
    let bars: Vec<Bar> = counts
        .iter()
        .map(|c| {
            Bar::new(c.year as f64, c.count as f64)
                .width(0.6)
                .name(c.year)
        })
        .collect();
    let chart = BarChart::new(bars).color(color::year_bars()).name("Papers");

    static_plot("publications_by_year")
        .x_axis_label("Year")
        .y_axis_label("Number of Papers")
        .x_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| {
            if mark.value.fract() == 0.0 {
                format!("{}", mark.value as i64)
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

/// Horizontal bars, highest count on top, coloured by rank.
pub fn top_journals(ui: &mut Ui, counts: &[CategoryCount]) {
    let n = counts.len();
    let ramp = color::ranked_ramp(n);
    // Position 0 is the bottom row, so the top journal goes last.
    let labels: Vec<String> = counts.iter().rev().map(|c| c.label.clone()).collect();
    let bars: Vec<Bar> = counts
        .iter()
        .zip(ramp)
        .enumerate()
        .map(|(i, (c, fill))| {
            Bar::new((n - 1 - i) as f64, c.count as f64)
                .width(0.7)
                .name(&c.label)
                .fill(fill)
        })
        .collect();
    let chart = BarChart::new(bars).horizontal().name("Papers");

    static_plot("top_journals")
        .x_axis_label("Number of Papers")
        .y_axis_formatter(category_formatter(labels))
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

/// Vertical bars for every source, most papers first.
pub fn source_distribution(ui: &mut Ui, counts: &[CategoryCount]) {
    category_columns(
        ui,
        "source_distribution",
        counts,
        color::source_bars(),
        "Source",
    );
}

fn category_columns(ui: &mut Ui, id: &str, counts: &[CategoryCount], fill: Color32, x_label: &str) {
    let labels: Vec<String> = counts.iter().map(|c| c.label.clone()).collect();
    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(i, c)| {
            Bar::new(i as f64, c.count as f64)
                .width(0.6)
                .name(&c.label)
        })
        .collect();
    let chart = BarChart::new(bars).color(fill).name("Papers");

    static_plot(id)
        .x_axis_label(x_label)
        .y_axis_label("Number of Papers")
        .x_axis_formatter(category_formatter(labels))
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}
