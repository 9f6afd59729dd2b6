//! Repository capability for content collections.
//!
//! Handlers and services only see `Arc<dyn Repository<T>>`; which store sits
//! behind it (memory or SQLite) is decided once at startup.

use std::sync::Arc;

use async_trait::async_trait;

use super::types::Document;
use crate::Result;

/// CRUD over one collection of documents, in insertion order.
#[async_trait]
pub trait Repository<T: Document>: Send + Sync {
    /// All records, oldest first.
    async fn find_all(&self) -> Result<Vec<T>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<T>>;

    /// Store a new record. Fails with `Conflict` if the id is taken.
    async fn insert(&self, record: T) -> Result<T>;

    /// Replace an existing record. Returns `None` if the id is unknown.
    async fn update(&self, record: T) -> Result<Option<T>>;

    /// Remove a record. Returns `false` if the id is unknown.
    async fn delete(&self, id: &str) -> Result<bool>;

    async fn count(&self) -> Result<usize> {
        Ok(self.find_all().await?.len())
    }
}

/// Shared handle to a repository.
pub type SharedRepository<T> = Arc<dyn Repository<T>>;
