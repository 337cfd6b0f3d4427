use std::path::{Path, PathBuf};
use std::sync::Arc;

use cord_explorer::config::Config;
use cord_explorer::data::cache::DatasetCache;
use cord_explorer::data::filter::YearRange;
use cord_explorer::data::model::Dataset;
use cord_explorer::data::summary::DashboardSummary;

use crate::ui::wordcloud::{word_weights, WeightedWord};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: Config,

    /// Enriched datasets, reused while the source file is unchanged.
    cache: DatasetCache,

    /// File the current dataset came from.
    pub source: Option<PathBuf>,

    /// Loaded dataset (None until a load succeeds).
    pub dataset: Option<Arc<Dataset>>,

    /// Selected publication years.
    pub range: YearRange,

    /// Results for `range` over `dataset` (cached until either changes).
    pub summary: Option<DashboardSummary>,

    /// Word-cloud layout input derived from `summary.title_text`.
    pub cloud: Vec<WeightedWord>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            range: config.default_range(),
            config,
            cache: DatasetCache::new(),
            source: None,
            dataset: None,
            summary: None,
            cloud: Vec::new(),
            status_message: None,
        }
    }

    /// Load (or fetch from cache) the dataset at `path` and recompute.
    /// A failed load keeps whatever was shown before.
    pub fn open(&mut self, path: &Path) {
        match self.cache.get_or_load(path, self.config.data.max_rows) {
            Ok(dataset) => {
                self.source = Some(path.to_path_buf());
                self.dataset = Some(dataset);
                self.status_message = None;
                self.recompute();
            }
            Err(e) => {
                log::warn!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Re-read the current source even if it looks unchanged.
    pub fn reload(&mut self) {
        self.cache.invalidate();
        if let Some(path) = self.source.clone() {
            self.open(&path);
        }
    }

    /// Change the selected range; clamped to the configured bounds.
    pub fn set_range(&mut self, range: YearRange) {
        let range = range.clamp_to(self.config.year_bounds());
        if range != self.range {
            self.range = range;
            self.recompute();
        }
    }

    /// Rebuild the summary and word cloud for the current range.
    fn recompute(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        let summary =
            DashboardSummary::compute(dataset, self.range, &self.config.summary_options());
        self.cloud = word_weights(&summary.title_text, self.config.dashboard.title_cloud_words);
        log::debug!(
            "range {}..={}: {} of {} papers",
            self.range.lo(),
            self.range.hi(),
            summary.matched_rows,
            summary.total_rows
        );
        self.summary = Some(summary);
    }
}
