use eframe::egui::{ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use cord_explorer::data::summary::SampleRow;

use crate::state::AppState;
use crate::ui::{charts, wordcloud};

const REFLECTION: &str = "\
This view analyzes a sample of up to 5,000 COVID-19 research papers from the \
CORD-19 metadata: publication trends, journal contributions and title keywords.

Key insights:
  • A surge in publications during 2020 and 2021
  • The journals contributing most to COVID-19 research
  • Frequent keywords in paper titles

Challenges:
  • Missing and inconsistent metadata (unknown journals, malformed dates)
  • Keeping interaction fast on large datasets
  • Clear, informative charts";

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render every section of the dashboard for the current summary.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    ui.heading("CORD-19 Data Explorer");
    ui.label("Explore COVID-19 research metadata from the CORD-19 dataset");
    ui.separator();

    let Some(summary) = &state.summary else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a metadata file to begin  (File → Open…)");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Sample of Filtered Data");
            sample_table(ui, &summary.sample);
            ui.add_space(12.0);

            ui.heading("Publications Over Time");
            charts::publications_by_year(ui, &summary.by_year);
            ui.add_space(12.0);

            ui.heading("Top Journals");
            charts::top_journals(ui, &summary.top_journals);
            ui.add_space(12.0);

            ui.heading("Word Cloud of Paper Titles");
            wordcloud::word_cloud(ui, &state.cloud);
            ui.add_space(12.0);

            ui.heading("Source Distribution");
            charts::source_distribution(ui, &summary.sources);
            ui.add_space(12.0);

            ui.collapsing("Reflection", |ui: &mut Ui| {
                ui.label(REFLECTION);
            });
        });
}

// ---------------------------------------------------------------------------
// Sample table
// ---------------------------------------------------------------------------

fn sample_table(ui: &mut Ui, rows: &[SampleRow]) {
    if rows.is_empty() {
        ui.weak("No papers in the selected range.");
        return;
    }

    ui.push_id("sample_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .vscroll(false)
            .column(Column::initial(420.0).at_least(120.0).clip(true))
            .column(Column::initial(200.0).clip(true))
            .column(Column::auto().at_least(50.0))
            .column(Column::remainder())
            .header(20.0, |mut header| {
                for name in ["Title", "Journal", "Year", "Source"] {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|mut body| {
                for row in rows {
                    body.row(18.0, |mut cells| {
                        cells.col(|ui: &mut Ui| {
                            ui.label(&row.title);
                        });
                        cells.col(|ui: &mut Ui| {
                            ui.label(&row.journal);
                        });
                        cells.col(|ui: &mut Ui| {
                            ui.label(row.year.map_or_else(|| "-".to_string(), |y| y.to_string()));
                        });
                        cells.col(|ui: &mut Ui| {
                            ui.label(&row.source);
                        });
                    });
                }
            });
    });
}
