mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use app::ExplorerApp;
use cord_explorer::config::Config;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => {
            log::error!("Ignoring unusable configuration: {e:#}");
            (Config::default(), Some(format!("Config error: {e:#}")))
        }
    };

    // An explicit path on the command line wins over the configured one.
    let source = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| config.data.source.clone());

    let mut state = AppState::new(config);
    state.open(&source);
    if state.status_message.is_none() {
        state.status_message = config_error;
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "CORD-19 Data Explorer",
        options,
        Box::new(move |_cc| Ok(Box::new(ExplorerApp::new(state)))),
    )
}
