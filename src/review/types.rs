//! Review records and submission validation

use chrono::{NaiveDateTime, Timelike};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

/// Reviews of every executive, keyed by executive full name
pub type ReviewMap = IndexMap<String, Vec<Review>>;

pub const ANONYMOUS: &str = "Anonymous";
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// How the reviewer relates to the executive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relationship {
    #[serde(rename = "Direct Report")]
    DirectReport,
    #[serde(rename = "Indirect Report")]
    IndirectReport,
    #[serde(rename = "Peer")]
    Peer,
    #[serde(rename = "Manager")]
    Manager,
    #[serde(rename = "No Direct Relationship")]
    NoDirectRelationship,
}

impl Relationship {
    pub const ALL: [Relationship; 5] = [
        Relationship::DirectReport,
        Relationship::IndirectReport,
        Relationship::Peer,
        Relationship::Manager,
        Relationship::NoDirectRelationship,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Relationship::DirectReport => "Direct Report",
            Relationship::IndirectReport => "Indirect Report",
            Relationship::Peer => "Peer",
            Relationship::Manager => "Manager",
            Relationship::NoDirectRelationship => "No Direct Relationship",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl Default for Relationship {
    fn default() -> Self {
        Relationship::NoDirectRelationship
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub rating: u8,
    pub review: String,
    #[serde(with = "minute_timestamp")]
    pub timestamp: NaiveDateTime,
    #[serde(default = "anonymous")]
    pub reviewer: String,
    #[serde(default)]
    pub is_current_employee: bool,
    /// Unknown or missing values read as "No Direct Relationship"
    #[serde(default, deserialize_with = "lenient_relationship")]
    pub relationship: Relationship,
}

fn anonymous() -> String {
    ANONYMOUS.to_string()
}

fn lenient_relationship<'de, D>(deserializer: D) -> Result<Relationship, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(Relationship::parse)
        .unwrap_or_default())
}

/// Errors that reject a submission before anything is persisted
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("Please select a rating")]
    MissingRating,

    #[error("Rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),

    #[error("Please write a review before submitting")]
    EmptyReview,
}

pub type SubmissionResult<T> = Result<T, SubmissionError>;

/// Review as entered in the submission form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewDraft {
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub review: String,
    #[serde(default)]
    pub reviewer: Option<String>,
    #[serde(default)]
    pub is_current_employee: bool,
    #[serde(default)]
    pub relationship: Relationship,
}

impl ReviewDraft {
    /// Validate the draft and stamp it with `now`, truncated to the minute
    pub fn into_review(self, now: NaiveDateTime) -> SubmissionResult<Review> {
        let rating = self.rating.ok_or(SubmissionError::MissingRating)?;
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(SubmissionError::RatingOutOfRange(rating));
        }

        let text = self.review.trim();
        if text.is_empty() {
            return Err(SubmissionError::EmptyReview);
        }

        let reviewer = self
            .reviewer
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(anonymous);

        Ok(Review {
            rating,
            review: text.to_string(),
            timestamp: truncate_to_minute(now),
            reviewer,
            is_current_employee: self.is_current_employee,
            relationship: self.relationship,
        })
    }
}

fn truncate_to_minute(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(ts)
}

/// `"YYYY-MM-DD HH:MM"` on the wire. Reading also accepts seconds, the ISO
/// `T` separator, RFC 3339 offsets and bare dates.
pub mod minute_timestamp {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M";

    const ACCEPTED: [&str; 5] = [
        FORMAT,
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    pub fn parse(s: &str) -> Option<NaiveDateTime> {
        let s = s.trim();
        ACCEPTED
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
            .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_local()))
            .or_else(|| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
    }

    pub fn serialize<S>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).ok_or_else(|| serde::de::Error::custom(format!("unrecognised timestamp {:?}", s)))
    }
}
