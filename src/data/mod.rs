/// Data layer: core types, loading, filtering and axis domains.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<Record>, category set
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  selected category → FilteredView (≤ 38 records)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  domain   │  FilteredView → AxisDomain [0, nice max]
///   └──────────┘
/// ```

pub mod domain;
pub mod filter;
pub mod loader;
pub mod model;
