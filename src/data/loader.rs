use std::collections::BTreeSet;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::de::{Deserializer as _, IgnoredAny, SeqAccess, Visitor};
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use super::model::{RawRecord, REQUIRED_COLUMNS};

/// Default row cap applied to every source.
pub const DEFAULT_MAX_ROWS: usize = 5000;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a source could not be turned into rows. Nothing is returned on error.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("source is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed Parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("reading Arrow batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

impl LoadError {
    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> LoadError + '_ {
        move |source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Read at most `max_rows` metadata rows from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row naming at least the required columns
/// * `.json`    – `[{ "title": "...", "journal": "...", ... }, ...]`
/// * `.parquet` – any column types; values are cast to UTF-8 through Arrow
///
/// Cell contents are passed through untouched apart from mapping empty or
/// null cells to `None`.
pub fn load_file(path: &Path, max_rows: usize) -> Result<Vec<RawRecord>, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "csv" => read_csv(File::open(path).map_err(LoadError::io(path))?, max_rows),
        "json" => {
            let text = std::fs::read_to_string(path).map_err(LoadError::io(path))?;
            read_json(&text, max_rows)
        }
        "parquet" | "pq" => load_parquet(path, max_rows),
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }?;

    log::debug!("read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Locate each required column in a header, in `REQUIRED_COLUMNS` order.
fn column_indices<'a>(
    headers: impl IntoIterator<Item = &'a str>,
) -> Result<[usize; 5], LoadError> {
    let headers: Vec<&str> = headers.into_iter().map(str::trim).collect();
    let mut indices = [0usize; 5];
    for (slot, name) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| *h == name)
            .ok_or(LoadError::MissingColumn(name))?;
    }
    Ok(indices)
}

fn cell(value: Option<&str>) -> Option<String> {
    match value {
        Some(s) if !s.is_empty() => Some(s.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names; extra columns are ignored.
fn read_csv<R: Read>(source: R, max_rows: usize) -> Result<Vec<RawRecord>, LoadError> {
    let mut reader = csv::Reader::from_reader(source);
    let indices = column_indices(reader.headers()?.iter())?;

    let mut rows = Vec::new();
    for result in reader.records().take(max_rows) {
        let record = result?;
        rows.push(RawRecord::from_cells(indices.map(|i| cell(record.get(i)))));
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "title": "...", "journal": "...", "source_x": "PMC",
///     "publish_time": "2020-03-15", "abstract": "..." },
///   ...
/// ]
/// ```
///
/// A key missing from one object is a missing cell; a key missing from
/// every loaded object is a missing column. Elements past `max_rows` must
/// be well-formed JSON but are never decoded.
fn read_json(text: &str, max_rows: usize) -> Result<Vec<RawRecord>, LoadError> {
    let mut de = serde_json::Deserializer::from_str(text);
    let objects = (&mut de).deserialize_seq(CappedObjects { max_rows })?;
    de.end()?;

    if !objects.is_empty() {
        let seen: BTreeSet<&str> = objects
            .iter()
            .flat_map(|obj| obj.keys().map(String::as_str))
            .collect();
        if let Some(missing) = REQUIRED_COLUMNS.iter().find(|c| !seen.contains(*c)) {
            return Err(LoadError::MissingColumn(*missing));
        }
    }

    Ok(objects
        .iter()
        .map(|obj| RawRecord::from_cells(REQUIRED_COLUMNS.map(|c| json_cell(obj.get(c)))))
        .collect())
}

/// Collects the first `max_rows` objects of a JSON array and skips the rest.
struct CappedObjects {
    max_rows: usize,
}

impl<'de> Visitor<'de> for CappedObjects {
    type Value = Vec<Map<String, JsonValue>>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an array of objects")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut objects = Vec::new();
        while objects.len() < self.max_rows {
            match seq.next_element::<Map<String, JsonValue>>()? {
                Some(obj) => objects.push(obj),
                None => return Ok(objects),
            }
        }
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(objects)
    }
}

fn json_cell(value: Option<&JsonValue>) -> Option<String> {
    match value? {
        JsonValue::Null => None,
        JsonValue::String(s) => cell(Some(s.as_str())),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load the required columns from a Parquet file.
///
/// Dates, timestamps and numbers are cast to text so the enricher sees the
/// same input it would from CSV.
fn load_parquet(path: &Path, max_rows: usize) -> Result<Vec<RawRecord>, LoadError> {
    let file = File::open(path).map_err(LoadError::io(path))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let indices = column_indices(builder.schema().fields().iter().map(|f| f.name().as_str()))?;
    let reader = builder.with_limit(max_rows).build()?;

    let mut rows = Vec::with_capacity(max_rows.min(DEFAULT_MAX_ROWS));
    for batch_result in reader {
        let batch = batch_result?;

        let columns: Vec<ArrayRef> = indices
            .iter()
            .map(|&i| cast(batch.column(i).as_ref(), &DataType::Utf8))
            .collect::<Result<_, _>>()?;
        let strings: Vec<_> = columns.iter().map(|c| c.as_string::<i32>()).collect();

        for row in 0..batch.num_rows() {
            let cells = std::array::from_fn(|c| {
                let col = strings[c];
                if col.is_null(row) {
                    None
                } else {
                    cell(Some(col.value(row)))
                }
            });
            rows.push(RawRecord::from_cells(cells));
        }
    }

    Ok(rows)
}
