//! In-memory repository.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::repository::Repository;
use super::types::Document;
use crate::{Result, SiteError};

/// Repository backed by a vector behind a `RwLock`.
#[derive(Debug)]
pub struct MemoryRepository<T> {
    records: RwLock<Vec<T>>,
}

impl<T> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Document> Repository<T> for MemoryRepository<T> {
    async fn find_all(&self) -> Result<Vec<T>> {
        Ok(self.records.read().await.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<T>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|r| r.id() == id)
            .cloned())
    }

    async fn insert(&self, record: T) -> Result<T> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.id() == record.id()) {
            return Err(SiteError::Conflict(format!(
                "{} id {} already exists",
                T::COLLECTION,
                record.id()
            )));
        }
        records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, record: T) -> Result<Option<T>> {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| r.id() == record.id()) {
            Some(slot) => {
                *slot = record.clone();
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id() != id);
        Ok(records.len() != before)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.records.read().await.len())
    }
}
