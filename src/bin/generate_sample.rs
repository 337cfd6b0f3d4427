//! Writes `metadata.csv` and `metadata.parquet` with synthetic CORD-19-like
//! rows, so the explorer can be tried without the real download.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::StringArray;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const ROWS: usize = 6000;

const JOURNALS: &[(&str, u32)] = &[
    ("PLoS One", 14),
    ("BMJ", 10),
    ("Lancet", 9),
    ("Nature", 7),
    ("Science", 6),
    ("Journal of Virology", 6),
    ("Emerging Infectious Diseases", 5),
    ("Viruses", 5),
    ("Vaccine", 4),
    ("Clinical Infectious Diseases", 4),
    ("Journal of Medical Virology", 3),
    ("Scientific Reports", 3),
    ("Cell", 2),
];

const SOURCES: &[(&str, u32)] = &[
    ("PMC", 30),
    ("Medline", 20),
    ("Medline; PMC", 15),
    ("Elsevier", 12),
    ("WHO", 10),
    ("MedRxiv", 8),
    ("BioRxiv", 4),
    ("ArXiv", 1),
];

const YEARS: &[(i32, u32)] = &[(2017, 2), (2018, 3), (2019, 8), (2020, 45), (2021, 32), (2022, 10)];

const MONTHS: &[&str] = &[
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const MALFORMED_DATES: &[&str] = &["2020 Mar-Apr", "unknown", "20/20/2020", "Spring 2021"];

const TITLE_LEADS: &[&str] = &[
    "Clinical characteristics of",
    "Transmission dynamics of",
    "Genomic surveillance of",
    "Vaccine effectiveness against",
    "Mental health impact of",
    "Mortality risk factors in",
    "Rapid detection of",
    "Immune response to",
];

const TITLE_SUBJECTS: &[&str] = &[
    "SARS-CoV-2",
    "COVID-19",
    "coronavirus infection",
    "the Omicron variant",
    "the Delta variant",
    "MERS-CoV",
    "influenza co-infection",
];

const TITLE_CONTEXTS: &[&str] = &[
    "in hospitalized patients",
    "among healthcare workers",
    "in Wuhan, China",
    "during lockdown",
    "in children",
    "in nursing homes",
    "a systematic review",
    "a cohort study",
];

const ABSTRACT_WORDS: &[&str] = &[
    "patients", "infection", "respiratory", "viral", "clinical", "cases", "study", "results",
    "severe", "acute", "syndrome", "coronavirus", "transmission", "hospital", "treatment",
    "outcomes", "analysis", "data", "protein", "spike", "antibody", "risk", "pandemic",
    "public", "health", "model", "testing", "samples", "cohort", "mortality",
];

/// One CSV row with CORD-19 column names.
#[derive(Debug, Serialize)]
struct Row {
    cord_uid: String,
    title: Option<String>,
    journal: Option<String>,
    source_x: Option<String>,
    publish_time: Option<String>,
    #[serde(rename = "abstract")]
    abstract_text: Option<String>,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len())]
    }

    /// Pick from `(item, weight)` pairs proportionally to weight.
    fn weighted<T: Copy>(&mut self, items: &[(T, u32)]) -> T {
        let total: u32 = items.iter().map(|(_, w)| w).sum();
        let mut roll = self.below(total as usize) as u32;
        for &(item, w) in items {
            if roll < w {
                return item;
            }
            roll -= w;
        }
        items[items.len() - 1].0
    }
}

fn publish_time(rng: &mut SimpleRng) -> Option<String> {
    if rng.chance(0.02) {
        return None;
    }
    if rng.chance(0.04) {
        return Some(rng.pick(MALFORMED_DATES).to_string());
    }
    let year = rng.weighted(YEARS);
    let month = rng.below(12) + 1;
    let day = rng.below(28) + 1;
    Some(match rng.below(10) {
        0 => format!("{year}"),
        1 => format!("{year} {} {day}", MONTHS[month - 1]),
        _ => format!("{year}-{month:02}-{day:02}"),
    })
}

fn abstract_text(rng: &mut SimpleRng) -> Option<String> {
    if rng.chance(0.1) {
        return None;
    }
    let len = 20 + rng.below(140);
    let words: Vec<&str> = (0..len).map(|_| *rng.pick(ABSTRACT_WORDS)).collect();
    Some(words.join(" "))
}

fn generate(rng: &mut SimpleRng) -> Vec<Row> {
    (0..ROWS)
        .map(|i| Row {
            cord_uid: format!("syn{i:05}"),
            title: (!rng.chance(0.01)).then(|| {
                format!(
                    "{} {} {}",
                    rng.pick(TITLE_LEADS),
                    rng.pick(TITLE_SUBJECTS),
                    rng.pick(TITLE_CONTEXTS)
                )
            }),
            journal: (!rng.chance(0.08)).then(|| rng.weighted(JOURNALS).to_string()),
            source_x: (!rng.chance(0.03)).then(|| rng.weighted(SOURCES).to_string()),
            publish_time: publish_time(rng),
            abstract_text: abstract_text(rng),
        })
        .collect()
}

fn write_csv(rows: &[Row], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &str) -> Result<RecordBatch> {
    let column = |get: fn(&Row) -> Option<&str>| -> StringArray {
        rows.iter().map(get).collect()
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("cord_uid", DataType::Utf8, false),
        Field::new("title", DataType::Utf8, true),
        Field::new("journal", DataType::Utf8, true),
        Field::new("source_x", DataType::Utf8, true),
        Field::new("publish_time", DataType::Utf8, true),
        Field::new("abstract", DataType::Utf8, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(column(|r| Some(r.cord_uid.as_str()))),
            Arc::new(column(|r| r.title.as_deref())),
            Arc::new(column(|r| r.journal.as_deref())),
            Arc::new(column(|r| r.source_x.as_deref())),
            Arc::new(column(|r| r.publish_time.as_deref())),
            Arc::new(column(|r| r.abstract_text.as_deref())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating Parquet writer")?;
    writer.write(&batch).context("writing Parquet batch")?;
    writer.close().context("closing Parquet writer")?;
    Ok(batch)
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    write_csv(&rows, "metadata.csv")?;
    let batch = write_parquet(&rows, "metadata.parquet")?;

    println!("Wrote {} synthetic papers to metadata.csv and metadata.parquet", rows.len());
    // title, journal, publish_time of the first few rows
    let preview = batch.project(&[1, 2, 4])?.slice(0, 5);
    println!("{}", pretty_format_batches(&[preview])?);
    Ok(())
}
