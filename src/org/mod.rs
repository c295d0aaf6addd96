//! Executive org structure
//!
//! - Executive records and the per-company store
//! - The company directory used by the picker
//! - The three-level org chart builder

pub mod chart;
pub mod store;
pub mod types;

pub use chart::{
    build_chart, report_positions, resolve_click, ChartBadge, ChartEdge, ChartError, ChartLevel,
    ChartNode, ChartResult, OrgChart,
};
pub use store::{CompanyDirectory, CompanyOption, ExecutiveStore};
pub use types::{ExecutiveMap, ExecutiveRecord, HistoryEntry, RoleTag};
