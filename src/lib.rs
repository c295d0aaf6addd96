//! Sticky Note
//!
//! An internal dashboard for browsing a company's executive org structure,
//! reading basic company metrics and leaving star-rated feedback on
//! executives.
//!
//! # Components
//!
//! - `org`: executive records, the per-company store and the three-level
//!   org chart builder
//! - `review`: review records, file-backed storage, aggregate statistics
//!   and most-recent-first pagination
//! - `session`: per-session dashboard state driven by typed events
//! - `market`: company overview and stock metrics from a market data source
//! - `http`: JSON API and the embedded dashboard page
//!
//! ## Example Usage
//!
//! ```rust
//! use sticky_note::org::{build_chart, ExecutiveMap, ExecutiveRecord};
//!
//! let mut executives = ExecutiveMap::new();
//! executives.insert(
//!     "Ada Lovelace".to_string(),
//!     ExecutiveRecord::new("CEO").with_reports(["Grace Hopper"]),
//! );
//! executives.insert(
//!     "Grace Hopper".to_string(),
//!     ExecutiveRecord::new("CTO").with_manager("Ada Lovelace"),
//! );
//!
//! let chart = build_chart(&executives, "Ada Lovelace").unwrap();
//! assert_eq!(chart.nodes.len(), 2);
//! assert_eq!(chart.node("Grace Hopper").unwrap().label, "Grace");
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod http;
pub mod market;
pub mod org;
pub mod review;
pub mod session;

// Re-export main types for convenience
pub use config::{ConfigError, ConfigResult, DashboardConfig};

pub use org::{
    build_chart, resolve_click, ChartError, CompanyDirectory, ExecutiveMap, ExecutiveRecord,
    ExecutiveStore, OrgChart,
};

pub use review::{
    get_page, summarize, total_pages, InMemoryReviewStore, JsonFileReviewStore, Review,
    ReviewDraft, ReviewMap, ReviewPage, ReviewStore, ReviewStoreError, ReviewSummary,
};

pub use session::{DashboardEvent, Role, SessionContext, View};

pub use market::{CompanyOverview, FileMarketData, MarketDataSource, StockSummary};

pub use http::{build_router, AppState, HttpServer};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
