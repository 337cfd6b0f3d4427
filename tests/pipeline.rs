use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::sync::Arc;

use arrow::array::{ArrayRef, Date32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

use cord_explorer::data::aggregate::{
    publications_by_year, source_distribution, title_text, top_journals, CategoryCount,
    YearCount, TOP_JOURNALS,
};
use cord_explorer::data::cache::DatasetCache;
use cord_explorer::data::enrich::enrich_all;
use cord_explorer::data::filter::{filter_by_year, YearRange};
use cord_explorer::data::loader::{load_file, LoadError, DEFAULT_MAX_ROWS};
use cord_explorer::data::model::Dataset;
use cord_explorer::data::summary::{DashboardSummary, SummaryOptions};

fn temp_with(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn load(file: &NamedTempFile) -> Dataset {
    let rows = load_file(file.path(), DEFAULT_MAX_ROWS).unwrap();
    enrich_all(&rows).0
}

/// A messy CSV in the shape of CORD-19's metadata.csv.
fn messy_csv() -> String {
    let mut csv = String::from("cord_uid,sha,source_x,title,doi,abstract,publish_time,journal\n");
    let sources = ["PMC", "Medline", "WHO", "", "Elsevier"];
    let journals = ["Lancet", "BMJ", "", "Nature", "Lancet", "Cell", "Viruses"];
    let times = [
        "2020-03-15",
        "2021",
        "not-a-date",
        "2019 Dec 30",
        "",
        "2022-01-01",
        "2018-06-01",
        "2020 Mar-Apr",
        "2021-11-20T10:00:00",
    ];
    for i in 0..120 {
        let abstract_text = if i % 4 == 0 {
            String::new()
        } else {
            format!("\"word {}\tsecond\n line\"", "x ".repeat(i % 9))
        };
        let title = if i % 11 == 0 { String::new() } else { format!("Paper {i} on covid") };
        csv.push_str(&format!(
            "u{i},sha{i},{},{title},10.1/{i},{abstract_text},{},{}\n",
            sources[i % sources.len()],
            times[i % times.len()],
            journals[i % journals.len()],
        ));
    }
    csv
}

#[test]
fn enriched_records_hold_their_invariants() {
    let file = temp_with(".csv", &messy_csv());
    let ds = load(&file);
    assert_eq!(ds.len(), 120);

    for r in ds.iter() {
        assert_eq!(r.abstract_word_count, r.abstract_text.split_whitespace().count());
        assert!(!r.journal.is_empty());
        assert!(!r.source.is_empty());
        if let Some(y) = r.year {
            assert!((1000..=9999).contains(&y));
        }
        match r.raw_publish_time.as_deref() {
            Some("not-a-date") | Some("2020 Mar-Apr") | None => assert_eq!(r.year, None),
            Some(_) => assert!(r.year.is_some()),
        }
    }
    assert!(ds.iter().any(|r| r.journal == "Unknown"));
    assert!(ds.iter().any(|r| r.source == "Unknown"));
}

#[test]
fn filter_is_an_ordered_subset_within_range() {
    let file = temp_with(".csv", &messy_csv());
    let ds = load(&file);
    let range = YearRange::new(2019, 2022);
    let view = filter_by_year(&ds, range);

    assert!(view.len() < ds.len());
    assert!(view.iter().all(|r| r.year.is_some_and(|y| range.contains(y))));

    // Same relative order as the source.
    let positions: Vec<usize> = view
        .iter()
        .map(|r| ds.iter().position(|d| std::ptr::eq(d, r)).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    let expected = ds
        .iter()
        .filter(|r| r.year.is_some_and(|y| (2019..=2022).contains(&y)))
        .count();
    assert_eq!(view.len(), expected);
}

#[test]
fn aggregates_are_consistent_with_their_input() {
    let file = temp_with(".csv", &messy_csv());
    let ds = load(&file);
    let view = filter_by_year(&ds, YearRange::new(2019, 2022));

    let by_year = publications_by_year(view.iter());
    let mut expected_years: BTreeMap<i32, usize> = BTreeMap::new();
    for y in view.iter().filter_map(|r| r.year) {
        *expected_years.entry(y).or_default() += 1;
    }
    let expected_years: Vec<YearCount> = expected_years
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect();
    assert_eq!(by_year, expected_years);
    assert_eq!(by_year.iter().map(|c| c.count).sum::<usize>(), view.len());

    let journals: BTreeSet<&str> = view.iter().map(|r| r.journal.as_str()).collect();
    let top = top_journals(view.iter(), TOP_JOURNALS);
    assert!(top.len() <= 10);
    assert!(top.windows(2).all(|w| w[0].count >= w[1].count));
    assert!(top.iter().all(|c| journals.contains(c.label.as_str())));

    let sources = source_distribution(view.iter());
    let distinct: BTreeSet<&str> = view.iter().map(|r| r.source.as_str()).collect();
    assert_eq!(sources.len(), distinct.len());
    assert_eq!(sources.iter().map(|c| c.count).sum::<usize>(), view.len());

    let text = title_text(view.iter());
    assert!(!text.starts_with(' ') && !text.ends_with(' '));
    assert!(!text.contains("  "));
}

#[test]
fn three_paper_scenario_end_to_end() {
    let file = temp_with(
        ".json",
        r#"[
            {"title": "one", "journal": "A", "source_x": "PMC", "publish_time": "2020-01-01", "abstract": null},
            {"title": "two", "journal": "B", "source_x": "PMC", "publish_time": "2020-05-05", "abstract": null},
            {"title": "three", "journal": "A", "source_x": "WHO", "publish_time": "2021-02-02", "abstract": null}
        ]"#,
    );
    let ds = load(&file);
    let summary =
        DashboardSummary::compute(&ds, YearRange::new(2019, 2022), &SummaryOptions::default());

    assert_eq!(
        summary.by_year,
        vec![
            YearCount { year: 2020, count: 2 },
            YearCount { year: 2021, count: 1 },
        ]
    );
    assert_eq!(
        summary.top_journals,
        vec![
            CategoryCount { label: "A".into(), count: 2 },
            CategoryCount { label: "B".into(), count: 1 },
        ]
    );
    assert_eq!(summary.title_text, "one two three");
}

#[test]
fn malformed_date_is_absent_and_filtered_out() {
    let file = temp_with(
        ".csv",
        "title,journal,source_x,publish_time,abstract\nOdd,J,S,not-a-date,\n",
    );
    let ds = load(&file);
    assert_eq!(ds.records()[0].year, None);
    assert!(filter_by_year(&ds, YearRange::new(2019, 2022)).is_empty());
}

#[test]
fn empty_dataset_gives_empty_results() {
    let file = temp_with(".csv", "title,journal,source_x,publish_time,abstract\n");
    let ds = load(&file);
    assert!(ds.is_empty());

    let summary =
        DashboardSummary::compute(&ds, YearRange::new(2019, 2022), &SummaryOptions::default());
    assert_eq!(summary.matched_rows, 0);
    assert!(summary.by_year.is_empty());
    assert!(summary.top_journals.is_empty());
    assert!(summary.sources.is_empty());
    assert_eq!(summary.title_text, "");
}

#[test]
fn row_cap_bounds_the_dataset() {
    let mut csv = String::from("title,journal,source_x,publish_time,abstract\n");
    for i in 0..(DEFAULT_MAX_ROWS + 250) {
        csv.push_str(&format!("t{i},J,S,2020,\n"));
    }
    let file = temp_with(".csv", &csv);
    let ds = load(&file);
    assert_eq!(ds.len(), DEFAULT_MAX_ROWS);
    assert_eq!(ds.records().last().unwrap().title, format!("t{}", DEFAULT_MAX_ROWS - 1));
}

#[test]
fn parquet_sources_are_read_through_arrow() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("title", DataType::Utf8, true),
        Field::new("journal", DataType::Utf8, true),
        Field::new("source_x", DataType::Utf8, true),
        Field::new("publish_time", DataType::Date32, true),
        Field::new("abstract", DataType::Utf8, true),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(vec![Some("Masks"), None])),
        Arc::new(StringArray::from(vec![Some("Lancet"), None])),
        Arc::new(StringArray::from(vec![Some("PMC"), Some("WHO")])),
        // 18_336 days after the epoch is 2020-03-15.
        Arc::new(Date32Array::from(vec![Some(18_336), None])),
        Arc::new(StringArray::from(vec![Some("a b c"), None])),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

    let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
    let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let ds = load(&file);
    assert_eq!(ds.len(), 2);
    let first = &ds.records()[0];
    assert_eq!(first.year, Some(2020));
    assert_eq!(first.raw_publish_time.as_deref(), Some("2020-03-15"));
    assert_eq!(first.abstract_word_count, 3);
    let second = &ds.records()[1];
    assert_eq!((second.title.as_str(), second.journal.as_str()), ("", "Unknown"));
    assert_eq!(second.year, None);
}

#[test]
fn parquet_row_cap_spans_row_groups() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("title", DataType::Utf8, true),
        Field::new("journal", DataType::Utf8, true),
        Field::new("source_x", DataType::Utf8, true),
        Field::new("publish_time", DataType::Utf8, true),
        Field::new("abstract", DataType::Utf8, true),
    ]));
    let props = WriterProperties::builder().set_max_row_group_size(4).build();
    let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
    let mut writer =
        ArrowWriter::try_new(file.reopen().unwrap(), schema.clone(), Some(props)).unwrap();
    for chunk in 0..3 {
        let titles: Vec<String> = (0..4).map(|i| format!("t{}", chunk * 4 + i)).collect();
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(titles)),
            Arc::new(StringArray::from(vec!["J"; 4])),
            Arc::new(StringArray::from(vec!["S"; 4])),
            Arc::new(StringArray::from(vec!["2020"; 4])),
            Arc::new(StringArray::from(vec![None::<&str>; 4])),
        ];
        writer.write(&RecordBatch::try_new(schema.clone(), columns).unwrap()).unwrap();
    }
    writer.close().unwrap();

    let rows = load_file(file.path(), 10).unwrap();
    let titles: Vec<&str> = rows.iter().filter_map(|r| r.title.as_deref()).collect();
    assert_eq!(titles, (0..10).map(|i| format!("t{i}")).collect::<Vec<_>>());
    assert_eq!(load_file(file.path(), DEFAULT_MAX_ROWS).unwrap().len(), 12);
}

#[test]
fn json_elements_past_the_row_cap_never_fail_the_load() {
    let obj = concat!(
        r#"{"title": "t", "journal": "J", "source_x": "S","#,
        r#" "publish_time": "2020", "abstract": ""}"#
    );
    let mut json = String::from("[");
    for _ in 0..DEFAULT_MAX_ROWS {
        json.push_str(obj);
        json.push(',');
    }
    json.push_str("42, null]");
    let file = temp_with(".json", &json);
    assert_eq!(load(&file).len(), DEFAULT_MAX_ROWS);
}

#[test]
fn parquet_without_required_column_is_rejected() {
    let schema = Arc::new(Schema::new(vec![Field::new("title", DataType::Utf8, true)]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![Arc::new(StringArray::from(vec!["only a title"])) as ArrayRef],
    )
    .unwrap();
    let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
    let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let err = load_file(file.path(), DEFAULT_MAX_ROWS).unwrap_err();
    assert!(matches!(err, LoadError::MissingColumn("journal")));
}

#[test]
fn cache_serves_the_same_dataset_until_invalidated() {
    let file = temp_with(".csv", &messy_csv());
    let mut cache = DatasetCache::new();

    let a = cache.get_or_load(file.path(), DEFAULT_MAX_ROWS).unwrap();
    let b = cache.get_or_load(file.path(), DEFAULT_MAX_ROWS).unwrap();
    assert!(Arc::ptr_eq(&a, &b));

    cache.invalidate();
    let c = cache.get_or_load(file.path(), DEFAULT_MAX_ROWS).unwrap();
    assert!(!Arc::ptr_eq(&a, &c));
    assert_eq!(cache.generation(), 2);
}
