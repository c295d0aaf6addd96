//! Review persistence
//!
//! All reviews live in one JSON document keyed by executive. Every write
//! rewrites the whole document; there is no locking, so concurrent writers
//! race and the last one wins.
//!
//! Reading is lenient: records that do not fit [`Review`] are skipped and
//! logged. Appending works on the raw document so those records survive,
//! and a document that cannot be parsed at all is never overwritten.

use super::types::{Review, ReviewMap};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Review storage errors
#[derive(Error, Debug)]
pub enum ReviewStoreError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Existing review file is not a JSON object; left untouched
    #[error("Review file {path:?} is unreadable, refusing to overwrite it: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The executive's entry exists but is not a list of reviews
    #[error("Reviews of {0:?} are not stored as a list")]
    NotAList(String),

    /// Lock poisoned by a panicking writer
    #[error("Review store lock poisoned")]
    Poisoned,
}

pub type ReviewStoreResult<T> = Result<T, ReviewStoreError>;

/// Raw on-disk document, executive to list of records
type Document = IndexMap<String, Value>;

/// Narrow storage seam used by the dashboard
pub trait ReviewStore: Send + Sync {
    /// Current reviews; unreadable storage yields an empty map
    fn load(&self) -> ReviewMap;

    /// Replace everything with `reviews`
    fn save(&self, reviews: &ReviewMap) -> ReviewStoreResult<()>;

    /// Read-modify-write append of one review
    fn append(&self, executive: &str, review: Review) -> ReviewStoreResult<()> {
        let mut reviews = self.load();
        reviews.entry(executive.to_string()).or_default().push(review);
        self.save(&reviews)
    }

    /// Reviews of one executive in insertion order
    fn reviews_for(&self, executive: &str) -> Vec<Review> {
        self.load().shift_remove(executive).unwrap_or_default()
    }
}

/// JSON document on disk
#[derive(Debug, Clone)]
pub struct JsonFileReviewStore {
    path: PathBuf,
}

impl JsonFileReviewStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing or blank file is an empty document
    fn read_document(&self) -> ReviewStoreResult<Document> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No reviews at {:?}", self.path);
                return Ok(Document::new());
            }
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Document::new());
        }

        serde_json::from_str(&content).map_err(|source| ReviewStoreError::Unreadable {
            path: self.path.clone(),
            source,
        })
    }

    fn write_document<T: Serialize>(&self, document: &T) -> ReviewStoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(document)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    fn into_reviews(&self, document: Document) -> ReviewMap {
        let mut reviews = ReviewMap::with_capacity(document.len());
        for (executive, records) in document {
            let records = match records {
                Value::Array(records) => records,
                Value::Null => Vec::new(),
                _ => {
                    warn!("Skipping reviews of {:?} in {:?}: not a list", executive, self.path);
                    continue;
                }
            };

            let mut list = Vec::with_capacity(records.len());
            for (index, record) in records.into_iter().enumerate() {
                match serde_json::from_value::<Review>(record) {
                    Ok(review) => list.push(review),
                    Err(e) => warn!(
                        "Skipping review {} of {:?} in {:?}: {}",
                        index, executive, self.path, e
                    ),
                }
            }
            reviews.insert(executive, list);
        }
        reviews
    }
}

impl ReviewStore for JsonFileReviewStore {
    fn load(&self) -> ReviewMap {
        match self.read_document() {
            Ok(document) => self.into_reviews(document),
            Err(e) => {
                warn!("Ignoring review file {:?}: {}", self.path, e);
                ReviewMap::new()
            }
        }
    }

    fn save(&self, reviews: &ReviewMap) -> ReviewStoreResult<()> {
        self.write_document(reviews)?;
        info!(
            "Saved reviews for {} executives to {:?}",
            reviews.len(),
            self.path
        );
        Ok(())
    }

    fn append(&self, executive: &str, review: Review) -> ReviewStoreResult<()> {
        let mut document = self.read_document()?;
        let record = serde_json::to_value(&review)?;

        let entry = document
            .entry(executive.to_string())
            .or_insert(Value::Null);
        if entry.is_null() {
            *entry = Value::Array(Vec::new());
        }
        match entry {
            Value::Array(records) => records.push(record),
            _ => return Err(ReviewStoreError::NotAList(executive.to_string())),
        }

        self.write_document(&document)?;
        info!("Appended review of {:?} to {:?}", executive, self.path);
        Ok(())
    }
}

/// Process-local store for tests and ephemeral runs
#[derive(Debug, Default)]
pub struct InMemoryReviewStore {
    reviews: RwLock<ReviewMap>,
}

impl InMemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reviews(reviews: ReviewMap) -> Self {
        Self {
            reviews: RwLock::new(reviews),
        }
    }
}

impl ReviewStore for InMemoryReviewStore {
    fn load(&self) -> ReviewMap {
        match self.reviews.read() {
            Ok(guard) => guard.clone(),
            Err(_) => ReviewMap::new(),
        }
    }

    fn save(&self, reviews: &ReviewMap) -> ReviewStoreResult<()> {
        let mut guard = self
            .reviews
            .write()
            .map_err(|_| ReviewStoreError::Poisoned)?;
        *guard = reviews.clone();
        Ok(())
    }
}
