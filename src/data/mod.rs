/// Data layer: record types, loading, enrichment, filtering, aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read ≤ max_rows rows → Vec<RawRecord>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  enrich   │  parse dates, fill defaults, count words → Dataset
///   └──────────┘
///        │            (cache: one enriched Dataset per source signature)
///        ▼
///   ┌──────────┐
///   │  filter   │  year range → FilteredView (borrowed, source order)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  by-year, top journals, title text, sources
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ summary   │  everything one render cycle needs
///   └──────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod enrich;
pub mod filter;
pub mod loader;
pub mod model;
pub mod summary;
