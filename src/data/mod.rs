/// Data layer: core types, loading, filtering and the eight aggregate views.
///
/// Architecture:
/// ```text
///   four uploads (.csv / .parquet)
///        │
///        ▼
///   ┌──────────┐
///   │   gate    │  all four present? → Ready | Waiting
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year window + area allow-list
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  views    │  group / sum / join → DashboardViews
///   └──────────┘
/// ```

pub mod error;
pub mod filter;
pub mod gate;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod views;
