//! Most-recent-first paging of an executive's reviews
//!
//! The controller never clamps: out-of-range requests return an empty
//! slice and callers disable navigation at the ends.

use super::types::Review;
use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Number of pages for `total` reviews, never less than one
pub fn total_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    total.div_ceil(page_size).max(1)
}

/// Reviews on 1-based `page_number`, newest first
pub fn get_page(reviews: &[Review], page_number: usize, page_size: usize) -> Vec<&Review> {
    let offset = match page_number
        .checked_sub(1)
        .and_then(|p| p.checked_mul(page_size))
    {
        Some(offset) if page_size > 0 => offset,
        _ => return Vec::new(),
    };
    reviews.iter().rev().skip(offset).take(page_size).collect()
}

/// One rendered page plus the navigation affordances
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewPage {
    pub page_number: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_reviews: usize,
    pub has_previous: bool,
    pub has_next: bool,
    pub reviews: Vec<Review>,
}

impl ReviewPage {
    pub fn new(reviews: &[Review], page_number: usize, page_size: usize) -> Self {
        let total_pages = total_pages(reviews.len(), page_size);
        Self {
            page_number,
            page_size,
            total_pages,
            total_reviews: reviews.len(),
            has_previous: page_number > 1,
            has_next: page_number < total_pages,
            reviews: get_page(reviews, page_number, page_size)
                .into_iter()
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::types::Relationship;
    use chrono::NaiveDate;

    fn numbered(n: usize) -> Vec<Review> {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        (0..n)
            .map(|i| Review {
                rating: 3,
                review: format!("review {}", i),
                timestamp: ts,
                reviewer: "x".to_string(),
                is_current_employee: false,
                relationship: Relationship::NoDirectRelationship,
            })
            .collect()
    }

    fn texts(page: &[&Review]) -> Vec<String> {
        page.iter().map(|r| r.review.clone()).collect()
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(12, 5), 3);
        assert_eq!(total_pages(10, 5), 2);
        assert_eq!(total_pages(0, 5), 1);
        assert_eq!(total_pages(3, 0), 1);
    }

    #[test]
    fn test_pages_are_newest_first() {
        let reviews = numbered(12);

        let first = get_page(&reviews, 1, 5);
        assert_eq!(
            texts(&first),
            vec!["review 11", "review 10", "review 9", "review 8", "review 7"]
        );

        let last = get_page(&reviews, 3, 5);
        assert_eq!(texts(&last), vec!["review 1", "review 0"]);
    }

    #[test]
    fn test_out_of_range_is_empty() {
        let reviews = numbered(3);
        assert!(get_page(&reviews, 0, 5).is_empty());
        assert!(get_page(&reviews, 2, 5).is_empty());
        assert!(get_page(&[], 1, 5).is_empty());
    }

    #[test]
    fn test_pages_at_integer_limit_are_empty() {
        let reviews = numbered(12);
        assert!(get_page(&reviews, usize::MAX, 5).is_empty());
        assert!(get_page(&reviews, usize::MAX / 2, 5).is_empty());
        assert!(get_page(&reviews, 2, usize::MAX).is_empty());
        assert_eq!(get_page(&reviews, 1, usize::MAX).len(), 12);

        let page = ReviewPage::new(&reviews, usize::MAX, 5);
        assert!(page.reviews.is_empty());
        assert!(page.has_previous);
        assert!(!page.has_next);
    }

    #[test]
    fn test_review_page_navigation() {
        let reviews = numbered(12);

        let first = ReviewPage::new(&reviews, 1, 5);
        assert!(!first.has_previous);
        assert!(first.has_next);
        assert_eq!(first.total_pages, 3);

        let last = ReviewPage::new(&reviews, 3, 5);
        assert!(last.has_previous);
        assert!(!last.has_next);
        assert_eq!(last.reviews.len(), 2);

        let empty = ReviewPage::new(&[], 1, 5);
        assert_eq!(empty.total_pages, 1);
        assert!(!empty.has_next);
    }
}
