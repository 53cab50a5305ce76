//! Generic document persistence shared by every collection (orders, employees, invoices).
//!
//! Entities describe how they are filtered and ordered through [`Document`]; storage backends
//! implement [`Repository`] once and get listing semantics from [`apply_query`].

mod memory;
mod query;

pub use memory::InMemoryCollection;
pub use query::{apply_query, ListQuery, Page, PageRequest, Sort, SortDirection};

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// Identifier wrapper for stored documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

static DOCUMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

impl DocumentId {
    /// Generates the next identifier for a collection, e.g. `ord-000042`.
    pub fn generate(prefix: &str) -> Self {
        let id = DOCUMENT_SEQUENCE.fetch_add(1, AtomicOrdering::Relaxed);
        Self(format!("{prefix}-{id:06}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A typed record stored in a named collection.
pub trait Document: Clone + Send + Sync + 'static {
    type Filter: Default + Send + Sync;
    type SortKey: Clone + Send + Sync;

    /// Collection name, also used in log events.
    const COLLECTION: &'static str;
    /// Prefix for generated identifiers.
    const ID_PREFIX: &'static str;

    fn id(&self) -> &DocumentId;

    fn matches(&self, filter: &Self::Filter) -> bool;

    fn compare(&self, other: &Self, key: &Self::SortKey) -> Ordering;

    /// Ordering applied when a query carries no explicit sort.
    fn default_order(&self, other: &Self) -> Ordering {
        self.id().cmp(other.id())
    }
}

/// Storage abstraction so services can be exercised in isolation.
pub trait Repository<D: Document>: Send + Sync {
    fn insert(&self, document: D) -> Result<D, RepositoryError>;
    /// Full overwrite of an existing document; last write wins.
    fn update(&self, document: D) -> Result<(), RepositoryError>;
    fn delete(&self, id: &DocumentId) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &DocumentId) -> Result<Option<D>, RepositoryError>;
    fn list(&self, query: &ListQuery<D>) -> Result<Page<D>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
