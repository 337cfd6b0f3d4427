use super::aggregate::{
    publications_by_year, source_distribution, title_text, top_journals, CategoryCount,
    YearCount, TOP_JOURNALS,
};
use super::filter::{filter_by_year, YearRange};
use super::model::{Dataset, Record};

/// Knobs for one summary computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryOptions {
    /// Rows shown in the sample table.
    pub sample_rows: usize,
    /// Journals kept in the ranking.
    pub top_journals: usize,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            sample_rows: 5,
            top_journals: TOP_JOURNALS,
        }
    }
}

/// One line of the sample table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRow {
    pub title: String,
    pub journal: String,
    pub year: Option<i32>,
    pub source: String,
}

impl From<&Record> for SampleRow {
    fn from(r: &Record) -> Self {
        SampleRow {
            title: r.title.clone(),
            journal: r.journal.clone(),
            year: r.year,
            source: r.source.clone(),
        }
    }
}

/// Everything the dashboard renders for one year range. Owns its data so it
/// can outlive the filtered view it was computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub range: (i32, i32),
    pub total_rows: usize,
    pub matched_rows: usize,
    pub sample: Vec<SampleRow>,
    pub by_year: Vec<YearCount>,
    pub top_journals: Vec<CategoryCount>,
    pub title_text: String,
    pub sources: Vec<CategoryCount>,
}

impl DashboardSummary {
    /// Filter `dataset` to `range` and run every aggregator over the result.
    pub fn compute(dataset: &Dataset, range: YearRange, options: &SummaryOptions) -> Self {
        let view = filter_by_year(dataset, range);

        DashboardSummary {
            range: (range.lo(), range.hi()),
            total_rows: dataset.len(),
            matched_rows: view.len(),
            sample: view
                .head(options.sample_rows)
                .iter()
                .map(|r| SampleRow::from(*r))
                .collect(),
            by_year: publications_by_year(view.iter()),
            top_journals: top_journals(view.iter(), options.top_journals),
            title_text: title_text(view.iter()),
            sources: source_distribution(view.iter()),
        }
    }

    /// True when the range matched nothing; the charts render empty.
    pub fn is_empty(&self) -> bool {
        self.matched_rows == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::enrich::enrich_all;
    use crate::data::model::RawRecord;

    fn raw(title: &str, journal: Option<&str>, time: &str) -> RawRecord {
        RawRecord {
            title: Some(title.to_string()),
            journal: journal.map(str::to_string),
            source: Some("PMC".to_string()),
            publish_time: Some(time.to_string()),
            abstract_text: None,
        }
    }

    #[test]
    fn summary_reflects_only_the_range() {
        let (ds, _) = enrich_all(&[
            raw("Old", Some("Nature"), "2015-01-01"),
            raw("Early", Some("Lancet"), "2020-02-01"),
            raw("Undated", Some("Lancet"), "not-a-date"),
            raw("Later", None, "2021 Jun 3"),
        ]);
        let summary = DashboardSummary::compute(
            &ds,
            YearRange::new(2019, 2022),
            &SummaryOptions::default(),
        );

        assert_eq!(summary.total_rows, 4);
        assert_eq!(summary.matched_rows, 2);
        assert_eq!(summary.title_text, "Early Later");
        assert_eq!(
            summary.sample,
            vec![
                SampleRow {
                    title: "Early".into(),
                    journal: "Lancet".into(),
                    year: Some(2020),
                    source: "PMC".into(),
                },
                SampleRow {
                    title: "Later".into(),
                    journal: "Unknown".into(),
                    year: Some(2021),
                    source: "PMC".into(),
                },
            ]
        );
        assert_eq!(summary.sources.len(), 1);
        assert_eq!(summary.sources[0].count, 2);
        assert_eq!(summary.top_journals.len(), 2);
    }

    #[test]
    fn sample_is_capped() {
        let rows: Vec<RawRecord> = (0..9).map(|i| raw(&format!("p{i}"), None, "2020")).collect();
        let (ds, _) = enrich_all(&rows);
        let options = SummaryOptions {
            sample_rows: 3,
            ..Default::default()
        };
        let summary = DashboardSummary::compute(&ds, YearRange::new(2020, 2020), &options);
        assert_eq!(summary.sample.len(), 3);
        assert_eq!(summary.sample[2].title, "p2");
    }

    #[test]
    fn empty_range_is_not_an_error() {
        let (ds, _) = enrich_all(&[raw("A", None, "2020")]);
        let summary =
            DashboardSummary::compute(&ds, YearRange::new(2030, 2031), &SummaryOptions::default());
        assert!(summary.is_empty());
        assert!(summary.sample.is_empty());
        assert!(summary.by_year.is_empty());
        assert!(summary.top_journals.is_empty());
        assert!(summary.sources.is_empty());
        assert!(summary.title_text.is_empty());
    }
}
