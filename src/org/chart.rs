//! Org chart construction
//!
//! Builds the three-level reporting diagram around a focal executive:
//! the manager above, the focal executive in the middle and the direct
//! reports below in centred rows. The output is plain data with fixed
//! coordinates so any front end can draw it.

use super::types::{ExecutiveMap, RoleTag};
use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;

/// Vertical distance between levels
pub const LEVEL_GAP: f64 = 1.5;
/// Horizontal distance between neighbouring reports
pub const COLUMN_GAP: f64 = 2.0;
/// Direct reports per row before wrapping
pub const MAX_PER_ROW: usize = 8;

pub const FOCAL_COLOR: &str = "rgb(31, 119, 180)";
pub const NODE_COLOR: &str = "rgb(158, 202, 225)";

#[derive(Error, Debug, PartialEq)]
pub enum ChartError {
    #[error("Executive {0} not found")]
    FocalNotFound(String),
}

pub type ChartResult<T> = Result<T, ChartError>;

/// Level of a node in the diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartLevel {
    Manager,
    Focal,
    Report,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartNode {
    /// Executive key, emitted back on click
    pub key: String,
    pub label: String,
    pub hover: String,
    pub level: ChartLevel,
    pub x: f64,
    pub y: f64,
    pub color: &'static str,
    pub role_tag: RoleTag,
}

impl ChartNode {
    pub fn is_focal(&self) -> bool {
        self.level == ChartLevel::Focal
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartEdge {
    pub source: String,
    pub target: String,
}

/// Role tag overlaid on a node at the node's own coordinate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBadge {
    pub key: String,
    pub text: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrgChart {
    pub focal: String,
    pub nodes: Vec<ChartNode>,
    pub edges: Vec<ChartEdge>,
    pub badges: Vec<ChartBadge>,
}

impl OrgChart {
    pub fn node(&self, key: &str) -> Option<&ChartNode> {
        self.nodes.iter().find(|n| n.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.node(key).is_some()
    }

    pub fn manager(&self) -> Option<&ChartNode> {
        self.nodes.iter().find(|n| n.level == ChartLevel::Manager)
    }

    pub fn reports(&self) -> impl Iterator<Item = &ChartNode> {
        self.nodes.iter().filter(|n| n.level == ChartLevel::Report)
    }
}

/// Build the diagram for `focal`.
///
/// The manager is shown only when `reports_to` resolves inside `executives`;
/// direct reports that do not resolve are dropped.
pub fn build_chart(executives: &ExecutiveMap, focal: &str) -> ChartResult<OrgChart> {
    let record = executives
        .get(focal)
        .ok_or_else(|| ChartError::FocalNotFound(focal.to_string()))?;

    let mut nodes = Vec::new();
    let mut edges = Vec::new();

    nodes.push(ChartNode {
        key: focal.to_string(),
        label: focal.to_string(),
        hover: hover_text(focal, &record.title),
        level: ChartLevel::Focal,
        x: 0.0,
        y: 0.0,
        color: FOCAL_COLOR,
        role_tag: record.role_tag.clone(),
    });

    let manager = record
        .reports_to
        .as_deref()
        .filter(|m| *m != focal)
        .and_then(|m| executives.get_key_value(m));

    if let Some((manager_key, manager_record)) = manager {
        nodes.push(ChartNode {
            key: manager_key.clone(),
            label: manager_key.clone(),
            hover: hover_text(manager_key, &manager_record.title),
            level: ChartLevel::Manager,
            x: 0.0,
            y: LEVEL_GAP,
            color: NODE_COLOR,
            role_tag: manager_record.role_tag.clone(),
        });
        edges.push(ChartEdge {
            source: manager_key.clone(),
            target: focal.to_string(),
        });
    }

    let mut seen: HashSet<&str> = HashSet::new();
    seen.insert(focal);
    if let Some((manager_key, _)) = manager {
        seen.insert(manager_key.as_str());
    }

    let reports: Vec<(&String, &RoleTag, &str)> = record
        .direct_reports
        .iter()
        .filter_map(|r| executives.get_key_value(r.as_str()))
        .filter(|&(key, _)| seen.insert(key.as_str()))
        .map(|(key, rec)| (key, &rec.role_tag, rec.title.as_str()))
        .collect();

    let positions = report_positions(reports.len());
    for ((key, tag, title), (x, y)) in reports.into_iter().zip(positions) {
        nodes.push(ChartNode {
            key: key.clone(),
            label: first_name(key).to_string(),
            hover: hover_text(key, title),
            level: ChartLevel::Report,
            x,
            y,
            color: NODE_COLOR,
            role_tag: tag.clone(),
        });
        edges.push(ChartEdge {
            source: focal.to_string(),
            target: key.clone(),
        });
    }

    let badges = nodes
        .iter()
        .map(|n| ChartBadge {
            key: n.key.clone(),
            text: n.role_tag.to_string(),
            x: n.x,
            y: n.y,
        })
        .collect();

    Ok(OrgChart {
        focal: focal.to_string(),
        nodes,
        edges,
        badges,
    })
}

/// Coordinates for `count` direct reports, in input order
pub fn report_positions(count: usize) -> Vec<(f64, f64)> {
    (0..count)
        .map(|i| {
            let row = i / MAX_PER_ROW;
            let col = i % MAX_PER_ROW;
            let in_row = MAX_PER_ROW.min(count - row * MAX_PER_ROW);
            let x = if in_row > 1 {
                (col as f64 - (in_row as f64 - 1.0) / 2.0) * COLUMN_GAP
            } else {
                0.0
            };
            let y = -LEVEL_GAP * (row as f64 + 1.0);
            (x, y)
        })
        .collect()
}

/// Focal change requested by a click on `clicked`, if any
pub fn resolve_click<'a>(chart: &OrgChart, clicked: &'a str) -> Option<&'a str> {
    if clicked != chart.focal && chart.contains(clicked) {
        Some(clicked)
    } else {
        None
    }
}

fn first_name(key: &str) -> &str {
    key.split_whitespace().next().unwrap_or(key)
}

fn hover_text(name: &str, title: &str) -> String {
    format!("{}<br>{}", name, title)
}
