use eframe::egui::{self, Color32, RichText, Slider, Ui};

use cord_explorer::data::filter::YearRange;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – year range
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    ui.strong("Publication year range");
    let bounds = state.config.year_bounds();
    let mut lo = state.range.lo();
    let mut hi = state.range.hi();

    let lo_changed = ui
        .add(Slider::new(&mut lo, bounds.lo()..=bounds.hi()).text("from"))
        .changed();
    let hi_changed = ui
        .add(Slider::new(&mut hi, bounds.lo()..=bounds.hi()).text("to"))
        .changed();

    // Dragging one handle past the other pushes it along.
    if lo_changed && lo > hi {
        hi = lo;
    }
    if hi_changed && hi < lo {
        lo = hi;
    }
    if lo_changed || hi_changed {
        state.set_range(YearRange::new(lo, hi));
    }

    ui.add_space(8.0);
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    ui.label(format!("{} papers loaded", dataset.len()));
    ui.label(format!("{} with a publication year", dataset.dated_len()));
    if let Some(summary) = &state.summary {
        ui.label(format!(
            "{} published {} to {}",
            summary.matched_rows, summary.range.0, summary.range.1
        ));
    }
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
            let can_reload = state.source.is_some();
            if ui.add_enabled(can_reload, egui::Button::new("Reload")).clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(path) = &state.source {
            ui.label(path.display().to_string());
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
        .set_title("Open CORD-19 metadata")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
