use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Source column names
// ---------------------------------------------------------------------------

pub const COL_TITLE: &str = "title";
pub const COL_JOURNAL: &str = "journal";
pub const COL_SOURCE: &str = "source_x";
pub const COL_PUBLISH_TIME: &str = "publish_time";
pub const COL_ABSTRACT: &str = "abstract";

/// Columns every source must provide, in the order `RawRecord` stores them.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    COL_TITLE,
    COL_JOURNAL,
    COL_SOURCE,
    COL_PUBLISH_TIME,
    COL_ABSTRACT,
];

/// Substituted for a missing journal or source identifier.
pub const UNKNOWN: &str = "Unknown";

// ---------------------------------------------------------------------------
// RawRecord – one row exactly as the source had it
// ---------------------------------------------------------------------------

/// A metadata row before enrichment. `None` marks a missing cell
/// (empty CSV field, JSON null or absent key, Parquet null).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub title: Option<String>,
    pub journal: Option<String>,
    pub source: Option<String>,
    pub publish_time: Option<String>,
    pub abstract_text: Option<String>,
}

impl RawRecord {
    /// Build a row from cells given in [`REQUIRED_COLUMNS`] order.
    pub fn from_cells(cells: [Option<String>; 5]) -> Self {
        let [title, journal, source, publish_time, abstract_text] = cells;
        RawRecord {
            title,
            journal,
            source,
            publish_time,
            abstract_text,
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one enriched paper
// ---------------------------------------------------------------------------

/// A paper's metadata after cleaning. Text fields are never missing and
/// the derived fields are always consistent with their inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub title: String,
    pub journal: String,
    pub source: String,
    /// Publish time as it appeared in the source, kept for display.
    pub raw_publish_time: Option<String>,
    pub publish_date: Option<NaiveDate>,
    /// Derived from `publish_date`; `None` when the date did not parse.
    pub year: Option<i32>,
    pub abstract_text: String,
    pub abstract_word_count: usize,
}

// ---------------------------------------------------------------------------
// Dataset – the bounded, enriched collection
// ---------------------------------------------------------------------------

/// Enriched records in source order. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Dataset { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records whose year could be derived.
    pub fn dated_len(&self) -> usize {
        self.records.iter().filter(|r| r.year.is_some()).count()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
