use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use super::model::Record;

/// How many journals the dashboard ranks.
pub const TOP_JOURNALS: usize = 10;

// ---------------------------------------------------------------------------
// Result rows
// ---------------------------------------------------------------------------

/// Number of papers published in one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

/// Number of papers sharing one category value (journal, source, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

// ---------------------------------------------------------------------------
// Grouping helpers
// ---------------------------------------------------------------------------

/// Count occurrences of each key, listing groups in the order their key
/// was first seen.
pub fn count_by_first_seen<K, I>(keys: I) -> Vec<(K, usize)>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, usize)> = Vec::new();
    for key in keys {
        match slots.get(&key) {
            Some(&slot) => groups[slot].1 += 1,
            None => {
                slots.insert(key.clone(), groups.len());
                groups.push((key, 1));
            }
        }
    }
    groups
}

/// Group by a text key and sort descending by count. The sort is stable,
/// so equal counts keep first-seen order.
fn ranked_counts<'a, I, F>(records: I, key: F) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = &'a Record>,
    F: Fn(&'a Record) -> &'a str,
{
    let mut groups = count_by_first_seen(records.into_iter().map(key));
    groups.sort_by(|a, b| b.1.cmp(&a.1));
    groups
        .into_iter()
        .map(|(label, count)| CategoryCount {
            label: label.to_string(),
            count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Aggregators
// ---------------------------------------------------------------------------

/// Papers per year, ascending by year. Records without a year are skipped
/// and years with no papers are not listed.
pub fn publications_by_year<'a, I>(records: I) -> Vec<YearCount>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut by_year: BTreeMap<i32, usize> = BTreeMap::new();
    for year in records.into_iter().filter_map(|r| r.year) {
        *by_year.entry(year).or_default() += 1;
    }
    by_year
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

/// The `n` journals with the most papers, most first.
pub fn top_journals<'a, I>(records: I, n: usize) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut ranked = ranked_counts(records, |r| r.journal.as_str());
    ranked.truncate(n);
    ranked
}

/// Every source identifier with its paper count, most first.
pub fn source_distribution<'a, I>(records: I) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = &'a Record>,
{
    ranked_counts(records, |r| r.source.as_str())
}

/// All non-empty titles joined by single spaces, in record order. This is
/// the whole input a word-cloud renderer needs.
pub fn title_text<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a Record>,
{
    let titles: Vec<&str> = records
        .into_iter()
        .map(|r| r.title.as_str())
        .filter(|t| !t.is_empty())
        .collect();
    titles.join(" ")
}
