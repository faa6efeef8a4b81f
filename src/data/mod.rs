//! Data layer: core types, loading, filtering, and report aggregation.
//!
//! Architecture:
//! ```text
//!  .csv / .parquet / .json
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Dataset
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ Dataset   │  Vec<SalesRecord>, distinct filter dimensions
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  apply region/method/year selection → visible indices
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  report   │  aggregate visible rows → KPIs, charts, summaries
//!   └──────────┘
//! ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod report;
