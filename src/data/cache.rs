use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::enrich::enrich_all;
use super::loader::{load_file, LoadError};
use super::model::Dataset;

/// Identifies one state of a source file. A change in any field means the
/// cached dataset is stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSignature {
    pub path: PathBuf,
    pub len: u64,
    pub modified: Option<SystemTime>,
    pub max_rows: usize,
}

impl SourceSignature {
    /// Stat `path` without reading it.
    pub fn of(path: &Path, max_rows: usize) -> Result<Self, LoadError> {
        let io_err = |source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        };
        let path = path.canonicalize().map_err(io_err)?;
        let meta = std::fs::metadata(&path).map_err(io_err)?;
        Ok(SourceSignature {
            len: meta.len(),
            modified: meta.modified().ok(),
            path,
            max_rows,
        })
    }
}

/// Holds at most one enriched dataset, reused while its source is unchanged.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entry: Option<(SourceSignature, Arc<Dataset>)>,
    generation: u64,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dataset for `path`, loading and enriching it first
    /// if nothing is cached or the file changed since the last load.
    ///
    /// On error the previous entry is left untouched.
    pub fn get_or_load(&mut self, path: &Path, max_rows: usize) -> Result<Arc<Dataset>, LoadError> {
        let signature = SourceSignature::of(path, max_rows)?;

        if let Some((cached, dataset)) = &self.entry {
            if *cached == signature {
                log::debug!("dataset cache hit for {}", signature.path.display());
                return Ok(Arc::clone(dataset));
            }
        }

        log::debug!("dataset cache miss for {}", signature.path.display());
        let rows = load_file(&signature.path, max_rows)?;
        let (dataset, _) = enrich_all(&rows);
        let dataset = Arc::new(dataset);

        log::info!(
            "Loaded {} papers ({} dated) from {}",
            dataset.len(),
            dataset.dated_len(),
            signature.path.display()
        );

        self.entry = Some((signature, Arc::clone(&dataset)));
        self.generation += 1;
        Ok(dataset)
    }

    /// The cached dataset, if any, regardless of whether it is stale.
    pub fn current(&self) -> Option<Arc<Dataset>> {
        self.entry.as_ref().map(|(_, ds)| Arc::clone(ds))
    }

    /// Signature of the cached source.
    pub fn signature(&self) -> Option<&SourceSignature> {
        self.entry.as_ref().map(|(sig, _)| sig)
    }

    /// Drop the cached dataset so the next call reloads.
    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            log::debug!("dataset cache invalidated");
        }
    }

    /// Number of times a source has actually been read.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
