//! Aggregate statistics over an executive's reviews

use super::types::Review;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Overall tone of the reviews, from the bucket counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sentiment {
    #[serde(rename = "overwhelmingly positive")]
    OverwhelminglyPositive,
    #[serde(rename = "generally positive")]
    GenerallyPositive,
    #[serde(rename = "slightly positive")]
    SlightlyPositive,
    #[serde(rename = "overwhelmingly negative")]
    OverwhelminglyNegative,
    #[serde(rename = "generally negative")]
    GenerallyNegative,
    #[serde(rename = "slightly negative")]
    SlightlyNegative,
    #[serde(rename = "generally neutral")]
    GenerallyNeutral,
    #[serde(rename = "slightly neutral")]
    SlightlyNeutral,
}

impl Sentiment {
    /// First matching rule wins; the order is significant.
    pub fn from_counts(positive: usize, neutral: usize, negative: usize) -> Self {
        if positive > neutral + negative {
            Sentiment::OverwhelminglyPositive
        } else if positive > neutral {
            Sentiment::GenerallyPositive
        } else if positive > negative {
            Sentiment::SlightlyPositive
        } else if negative > neutral + positive {
            Sentiment::OverwhelminglyNegative
        } else if negative > neutral {
            Sentiment::GenerallyNegative
        } else if negative > positive {
            Sentiment::SlightlyNegative
        } else if neutral > positive + negative {
            Sentiment::GenerallyNeutral
        } else {
            Sentiment::SlightlyNeutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::OverwhelminglyPositive => "overwhelmingly positive",
            Sentiment::GenerallyPositive => "generally positive",
            Sentiment::SlightlyPositive => "slightly positive",
            Sentiment::OverwhelminglyNegative => "overwhelmingly negative",
            Sentiment::GenerallyNegative => "generally negative",
            Sentiment::SlightlyNegative => "slightly negative",
            Sentiment::GenerallyNeutral => "generally neutral",
            Sentiment::SlightlyNeutral => "slightly neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How concentrated authorship is among few reviewers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewerBias {
    High,
    Moderate,
    Low,
}

impl ReviewerBias {
    pub fn from_ratio(unique_ratio: f64) -> Self {
        if unique_ratio < 0.3 {
            ReviewerBias::High
        } else if unique_ratio < 0.5 {
            ReviewerBias::Moderate
        } else {
            ReviewerBias::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewerBias::High => "high",
            ReviewerBias::Moderate => "moderate",
            ReviewerBias::Low => "low",
        }
    }
}

impl fmt::Display for ReviewerBias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSummary {
    pub total_reviews: usize,
    /// `None` when there are no reviews
    pub average_rating: Option<f64>,
    pub unique_reviewer_count: usize,
    pub positive_count: usize,
    pub neutral_count: usize,
    pub negative_count: usize,
    pub sentiment: Sentiment,
    /// `None` when there are no reviews
    pub reviewer_bias: Option<ReviewerBias>,
}

pub fn summarize(reviews: &[Review]) -> ReviewSummary {
    let total = reviews.len();

    let average_rating = if total == 0 {
        None
    } else {
        let sum: u64 = reviews.iter().map(|r| r.rating as u64).sum();
        Some(sum as f64 / total as f64)
    };

    let unique_reviewer_count = reviews
        .iter()
        .map(|r| r.reviewer.as_str())
        .collect::<HashSet<_>>()
        .len();

    let positive_count = reviews.iter().filter(|r| r.rating >= 4).count();
    let neutral_count = reviews.iter().filter(|r| r.rating == 3).count();
    let negative_count = reviews.iter().filter(|r| r.rating <= 2).count();

    let reviewer_bias = if total == 0 {
        None
    } else {
        Some(ReviewerBias::from_ratio(
            unique_reviewer_count as f64 / total as f64,
        ))
    };

    ReviewSummary {
        total_reviews: total,
        average_rating,
        unique_reviewer_count,
        positive_count,
        neutral_count,
        negative_count,
        sentiment: Sentiment::from_counts(positive_count, neutral_count, negative_count),
        reviewer_bias,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::types::Relationship;
    use chrono::NaiveDate;

    fn reviews(ratings: &[u8], reviewers: &[&str]) -> Vec<Review> {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        ratings
            .iter()
            .zip(reviewers.iter().cycle())
            .map(|(rating, reviewer)| Review {
                rating: *rating,
                review: "text".to_string(),
                timestamp: ts,
                reviewer: reviewer.to_string(),
                is_current_employee: false,
                relationship: Relationship::Peer,
            })
            .collect()
    }

    #[test]
    fn test_empty() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_reviews, 0);
        assert_eq!(summary.average_rating, None);
        assert_eq!(summary.unique_reviewer_count, 0);
        assert_eq!(summary.positive_count, 0);
        assert_eq!(summary.neutral_count, 0);
        assert_eq!(summary.negative_count, 0);
        assert_eq!(summary.reviewer_bias, None);
        assert_eq!(summary.sentiment, Sentiment::SlightlyNeutral);
    }

    #[test]
    fn test_buckets_and_average() {
        let summary = summarize(&reviews(&[5, 5, 3, 3, 3, 1], &["a", "b", "c"]));
        assert_eq!(summary.positive_count, 2);
        assert_eq!(summary.neutral_count, 3);
        assert_eq!(summary.negative_count, 1);
        assert_eq!(summary.average_rating, Some(20.0 / 6.0));
        // Rule three: 2 positive beat 1 negative
        assert_eq!(summary.sentiment, Sentiment::SlightlyPositive);
    }

    #[test]
    fn test_sentiment_rule_order() {
        assert_eq!(Sentiment::from_counts(5, 1, 1), Sentiment::OverwhelminglyPositive);
        assert_eq!(Sentiment::from_counts(3, 2, 2), Sentiment::GenerallyPositive);
        assert_eq!(Sentiment::from_counts(2, 2, 1), Sentiment::SlightlyPositive);
        assert_eq!(Sentiment::from_counts(0, 1, 2), Sentiment::OverwhelminglyNegative);
        assert_eq!(Sentiment::from_counts(1, 1, 2), Sentiment::GenerallyNegative);
        assert_eq!(Sentiment::from_counts(1, 3, 2), Sentiment::SlightlyNegative);
        assert_eq!(Sentiment::from_counts(1, 3, 1), Sentiment::GenerallyNeutral);
        assert_eq!(Sentiment::from_counts(1, 2, 1), Sentiment::SlightlyNeutral);
        assert_eq!(Sentiment::from_counts(0, 0, 0), Sentiment::SlightlyNeutral);
        // Positive ties with negative but still beats neutral
        assert_eq!(Sentiment::from_counts(2, 0, 2), Sentiment::GenerallyPositive);
    }

    #[test]
    fn test_reviewer_uniqueness_is_exact() {
        let summary = summarize(&reviews(&[4, 4, 4], &["Sam", "sam", "Sam"]));
        assert_eq!(summary.unique_reviewer_count, 2);
    }

    #[test]
    fn test_reviewer_bias() {
        let one_author = summarize(&reviews(&[4; 10], &["Sam"]));
        assert_eq!(one_author.reviewer_bias, Some(ReviewerBias::High));

        let few_authors = summarize(&reviews(&[4; 10], &["a", "b", "c", "d"]));
        assert_eq!(few_authors.reviewer_bias, Some(ReviewerBias::Moderate));

        let many_authors = summarize(&reviews(&[4; 4], &["a", "b"]));
        assert_eq!(many_authors.reviewer_bias, Some(ReviewerBias::Low));
    }

    #[test]
    fn test_labels_serialize() {
        let json = serde_json::to_value(summarize(&reviews(&[5], &["a"]))).unwrap();
        assert_eq!(json["sentiment"], "overwhelmingly positive");
        assert_eq!(json["reviewer_bias"], "low");
    }
}
