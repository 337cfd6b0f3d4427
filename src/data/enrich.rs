use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use super::model::{Dataset, RawRecord, Record, UNKNOWN};

/// Years outside this range are treated as unparseable.
const PLAUSIBLE_YEARS: std::ops::RangeInclusive<i32> = 1000..=9999;

/// Full-date layouts tried in order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%Y %b %d",
    "%d %b %Y",
    "%b %d %Y",
    "%Y %B %d",
    "%d %B %Y",
    "%B %d %Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Layouts that only name a month; the day is taken as the 1st.
const MONTH_FORMATS: &[&str] = &["%Y-%m", "%Y %b", "%Y %B"];

// ---------------------------------------------------------------------------
// Field-level cleaning
// ---------------------------------------------------------------------------

/// Parse a publish time permissively. Unrecognised input yields `None`
/// rather than an error so one bad row never stops the rest.
pub fn parse_publish_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    let date = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            let padded = format!("{s} 01");
            MONTH_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(&padded, &format!("{fmt} %d")).ok())
        })
        .or_else(|| {
            if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
                s.parse().ok().and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1))
            } else {
                None
            }
        })?;

    PLAUSIBLE_YEARS.contains(&date.year()).then_some(date)
}

/// Number of whitespace-delimited tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

// ---------------------------------------------------------------------------
// Row / dataset enrichment
// ---------------------------------------------------------------------------

/// Counters for one enrichment pass, logged at debug level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichStats {
    pub rows: usize,
    pub dates_absent: usize,
    pub journals_defaulted: usize,
    pub sources_defaulted: usize,
    pub titles_defaulted: usize,
    pub abstracts_defaulted: usize,
}

impl EnrichStats {
    fn observe(&mut self, raw: &RawRecord, record: &Record) {
        self.rows += 1;
        self.dates_absent += usize::from(record.year.is_none());
        self.journals_defaulted += usize::from(raw.journal.is_none());
        self.sources_defaulted += usize::from(raw.source.is_none());
        self.titles_defaulted += usize::from(raw.title.is_none());
        self.abstracts_defaulted += usize::from(raw.abstract_text.is_none());
    }
}

/// Clean one row. Never fails: missing text gets its default and an
/// unparseable date leaves `publish_date` and `year` empty.
pub fn enrich(raw: &RawRecord) -> Record {
    let publish_date = raw.publish_time.as_deref().and_then(parse_publish_date);
    if publish_date.is_none() {
        log::trace!("unparseable publish_time {:?}", raw.publish_time);
    }

    let abstract_text = raw.abstract_text.clone().unwrap_or_default();
    let abstract_word_count = word_count(&abstract_text);

    Record {
        title: raw.title.clone().unwrap_or_default(),
        journal: raw.journal.clone().unwrap_or_else(|| UNKNOWN.to_string()),
        source: raw.source.clone().unwrap_or_else(|| UNKNOWN.to_string()),
        raw_publish_time: raw.publish_time.clone(),
        publish_date,
        year: publish_date.map(|d| d.year()),
        abstract_text,
        abstract_word_count,
    }
}

/// Enrich every row, preserving source order.
pub fn enrich_all(rows: &[RawRecord]) -> (Dataset, EnrichStats) {
    let mut stats = EnrichStats::default();
    let records = rows
        .iter()
        .map(|raw| {
            let record = enrich(raw);
            stats.observe(raw, &record);
            record
        })
        .collect();
    log::debug!("enrichment: {stats:?}");
    (Dataset::new(records), stats)
}
