use super::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Year range predicate
// ---------------------------------------------------------------------------

/// Inclusive publication-year range. `lo <= hi` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YearRange {
    lo: i32,
    hi: i32,
}

impl YearRange {
    /// Build a range from two bounds given in either order.
    pub fn new(a: i32, b: i32) -> Self {
        YearRange {
            lo: a.min(b),
            hi: a.max(b),
        }
    }

    pub fn lo(&self) -> i32 {
        self.lo
    }

    pub fn hi(&self) -> i32 {
        self.hi
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.lo..=self.hi).contains(&year)
    }

    /// Restrict this range to lie within `bounds`.
    pub fn clamp_to(self, bounds: YearRange) -> Self {
        YearRange::new(
            self.lo.clamp(bounds.lo, bounds.hi),
            self.hi.clamp(bounds.lo, bounds.hi),
        )
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Records of a dataset that passed a year filter, in source order.
/// Borrows the dataset; rebuilt whenever the range changes.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    range: YearRange,
    records: Vec<&'a Record>,
}

impl<'a> FilteredView<'a> {
    pub fn range(&self) -> YearRange {
        self.range
    }

    pub fn records(&self) -> &[&'a Record] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.records.iter().copied()
    }

    /// Number of matching records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing matched.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The first `n` matching records, for the sample table.
    pub fn head(&self, n: usize) -> &[&'a Record] {
        &self.records[..n.min(self.records.len())]
    }
}

/// Select the records whose year is known and falls within `range`.
/// Records without a year never match.
pub fn filter_by_year(dataset: &Dataset, range: YearRange) -> FilteredView<'_> {
    let records = dataset
        .iter()
        .filter(|r| r.year.is_some_and(|y| range.contains(y)))
        .collect();
    FilteredView { range, records }
}
