//! Document store.
//!
//! Records live as JSON documents in named collections. Each collection
//! offers the same small set of operations regardless of backend:
//!
//! - `insert_one(doc) -> id` - the store generates the id
//! - `find_one(filter)` / `find(filter)` - insertion-ordered reads
//! - `update_one(filter, set) -> matched` - shallow merge of top-level fields
//! - `delete_one(filter) -> deleted`
//! - `group_count(field)` - distinct values of a field with their counts
//!
//! # Backends
//!
//! - [`PgDocumentStore`] - `PostgreSQL`, one JSONB table per collection
//! - [`MemoryDocumentStore`] - process-local, used by tests and `PANTRY_STORE=memory`
//!
//! # Migrations
//!
//! The `PostgreSQL` tables are created by the migrations in
//! `crates/api/migrations/`, run via:
//! ```bash
//! cargo run -p pantry-cli -- migrate run
//! ```

pub mod filter;
pub mod memory;
pub mod postgres;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub use filter::{Comparison, Condition, Filter, Operand};
pub use memory::MemoryDocumentStore;
pub use postgres::{MIGRATOR, PgDocumentStore, create_pool};

/// A JSON document body.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Named document collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Items,
    ClockInRecords,
}

impl Collection {
    /// Collection (and table) name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Items => "items",
            Self::ClockInRecords => "clock_in_records",
        }
    }
}

/// A document together with its store-generated id.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: Uuid,
    pub body: Document,
}

/// One row of a `group_count` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    /// Distinct field value; `None` for documents missing the field.
    pub key: Option<String>,
    /// Number of documents with that value.
    pub count: u64,
}

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Document could not be converted to or from its typed form.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Handle to the configured document store.
///
/// Cheap to clone; every clone shares the same underlying pool or map.
#[derive(Debug, Clone)]
pub enum DocumentStore {
    Postgres(PgDocumentStore),
    Memory(MemoryDocumentStore),
}

impl DocumentStore {
    /// Insert a document and return the id the store assigned to it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend fails.
    pub async fn insert_one(
        &self,
        collection: Collection,
        doc: Document,
    ) -> Result<Uuid, StoreError> {
        match self {
            Self::Postgres(store) => store.insert_one(collection, doc).await,
            Self::Memory(store) => Ok(store.insert_one(collection, doc).await),
        }
    }

    /// Return the first document matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend fails.
    pub async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<StoredDocument>, StoreError> {
        match self {
            Self::Postgres(store) => store.find_one(collection, filter).await,
            Self::Memory(store) => Ok(store.find_one(collection, filter).await),
        }
    }

    /// Return every document matching `filter`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend fails.
    pub async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        match self {
            Self::Postgres(store) => store.find(collection, filter).await,
            Self::Memory(store) => Ok(store.find(collection, filter).await),
        }
    }

    /// Merge `set` into the first document matching `filter`.
    ///
    /// Returns the number of matched documents (0 or 1).
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend fails.
    pub async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Document,
    ) -> Result<u64, StoreError> {
        match self {
            Self::Postgres(store) => store.update_one(collection, filter, set).await,
            Self::Memory(store) => Ok(store.update_one(collection, filter, set).await),
        }
    }

    /// Delete the first document matching `filter`.
    ///
    /// Returns the number of deleted documents (0 or 1).
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend fails.
    pub async fn delete_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<u64, StoreError> {
        match self {
            Self::Postgres(store) => store.delete_one(collection, filter).await,
            Self::Memory(store) => Ok(store.delete_one(collection, filter).await),
        }
    }

    /// Group the collection by `field` and count each group.
    ///
    /// Groups are ordered by the first document carrying each value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend fails.
    pub async fn group_count(
        &self,
        collection: Collection,
        field: &'static str,
    ) -> Result<Vec<GroupCount>, StoreError> {
        match self {
            Self::Postgres(store) => store.group_count(collection, field).await,
            Self::Memory(store) => Ok(store.group_count(collection, field).await),
        }
    }

    /// Check that the backend is reachable.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend does not answer.
    pub async fn ping(&self) -> Result<(), StoreError> {
        match self {
            Self::Postgres(store) => store.ping().await,
            Self::Memory(_) => Ok(()),
        }
    }

    /// Short backend name for logs.
    #[must_use]
    pub const fn backend(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }
}

impl From<PgDocumentStore> for DocumentStore {
    fn from(store: PgDocumentStore) -> Self {
        Self::Postgres(store)
    }
}

impl From<MemoryDocumentStore> for DocumentStore {
    fn from(store: MemoryDocumentStore) -> Self {
        Self::Memory(store)
    }
}
