/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → CampaignDataset
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ CampaignDataset │  Vec<CampaignRecord>, distinct values, date span
///   └────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSpec → filtered records
///   └──────────┘
///        │
///        ▼
///   ┌────────────────────┐
///   │ metrics / aggregate │  SummaryMetrics + grouped views → Report
///   └────────────────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod metrics;
pub mod model;
