//! Executive record types
//!
//! Executive files are loosely shaped JSON written by hand, so every field
//! except the key is optional on the wire and falls back to a default here.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Executives of one company keyed by full name, in file order
pub type ExecutiveMap = IndexMap<String, ExecutiveRecord>;

/// Short tier code shown as a badge on chart nodes ("E", "C", "M", ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleTag(String);

impl RoleTag {
    pub fn new(tag: impl Into<String>) -> Self {
        RoleTag(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RoleTag {
    fn default() -> Self {
        RoleTag("E".to_string())
    }
}

impl fmt::Display for RoleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RoleTag {
    fn from(s: &str) -> Self {
        RoleTag(s.to_string())
    }
}

/// A single executive as stored in `<ticker>_executives.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ExecutiveRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,

    /// Manager key. `null`, a missing field and `""` all mean top-level.
    #[serde(default, deserialize_with = "non_empty_string")]
    pub reports_to: Option<String>,

    #[serde(default, deserialize_with = "lenient_names")]
    pub direct_reports: Vec<String>,

    #[serde(default, deserialize_with = "lenient_role_tag")]
    pub role_tag: RoleTag,

    #[serde(default, deserialize_with = "lenient_text")]
    pub bio: String,

    /// `None` when absent or not a number (`"N/A"`, `""`, ...)
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub salary: Option<f64>,

    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub shares: Option<f64>,

    #[serde(default, deserialize_with = "lenient_history")]
    pub history: Vec<HistoryEntry>,
}

impl ExecutiveRecord {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_manager(mut self, manager: impl Into<String>) -> Self {
        self.reports_to = Some(manager.into());
        self
    }

    pub fn with_reports<I, S>(mut self, reports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.direct_reports = reports.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_role_tag(mut self, tag: impl Into<RoleTag>) -> Self {
        self.role_tag = tag.into();
        self
    }
}

/// One job-history entry. Two legacy shapes exist in the data files; the
/// variant is picked by which fields are present. Anything else is kept
/// verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HistoryEntry {
    /// `{title, company, start, duration}`
    Tenure {
        title: String,
        company: String,
        #[serde(deserialize_with = "string_or_number")]
        start: String,
        #[serde(deserialize_with = "string_or_number")]
        duration: String,
    },
    /// `{title, from, to}`
    Span {
        title: String,
        #[serde(deserialize_with = "string_or_number")]
        from: String,
        #[serde(deserialize_with = "string_or_number")]
        to: String,
    },
    /// Any other shape
    Other(Value),
}

impl HistoryEntry {
    pub fn title(&self) -> &str {
        match self {
            HistoryEntry::Tenure { title, .. } | HistoryEntry::Span { title, .. } => title,
            HistoryEntry::Other(value) => value.get("title").and_then(Value::as_str).unwrap_or(""),
        }
    }

    /// Human readable one-liner used by the CLI and the detail page
    pub fn describe(&self) -> String {
        match self {
            HistoryEntry::Tenure { title, company, start, duration } => {
                format!("{} at {} (since {}, {})", title, company, start, duration)
            }
            HistoryEntry::Span { title, from, to } => format!("{} ({} - {})", title, from, to),
            HistoryEntry::Other(value) => {
                match (self.title(), value.get("company").and_then(Value::as_str)) {
                    ("", _) => value.to_string(),
                    (title, Some(company)) => format!("{} at {}", title, company),
                    (title, None) => title.to_string(),
                }
            }
        }
    }
}

fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?).filter(|s| !s.trim().is_empty()))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_role_tag<'de, D>(deserializer: D) -> Result<RoleTag, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?)
        .filter(|s| !s.trim().is_empty())
        .map(RoleTag)
        .unwrap_or_default())
}

/// Names from a list; non-string items are dropped
fn lenient_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Numbers or numeric strings such as `"1,250,000"`; anything else is `None`
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let digits: String = s
                .trim()
                .trim_start_matches('$')
                .chars()
                .filter(|c| *c != ',')
                .collect();
            digits.parse::<f64>().ok().filter(|n| n.is_finite())
        }
        _ => None,
    })
}

fn lenient_history<'de, D>(deserializer: D) -> Result<Vec<HistoryEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter(|item| !item.is_null())
            .filter_map(|item| HistoryEntry::deserialize(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}
