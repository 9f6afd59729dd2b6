//! SQLite-backed repository.
//!
//! Each record is stored as a JSON document in the shared `documents` table,
//! keyed by collection name and id.

use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::SecondsFormat;

use super::repository::Repository;
use super::types::Document;
use crate::db::DbPool;
use crate::{Result, SiteError};

/// Repository for one collection in the document table.
pub struct SqliteRepository<T> {
    pool: DbPool,
    _marker: PhantomData<fn() -> T>,
}

impl<T> SqliteRepository<T> {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }
}

fn decode<T: Document>(bodies: Vec<String>) -> Result<Vec<T>> {
    bodies
        .iter()
        .map(|body| serde_json::from_str(body).map_err(SiteError::from))
        .collect()
}

#[async_trait]
impl<T: Document> Repository<T> for SqliteRepository<T> {
    async fn find_all(&self) -> Result<Vec<T>> {
        let bodies: Vec<String> =
            sqlx::query_scalar("SELECT body FROM documents WHERE collection = ? ORDER BY rowid")
                .bind(T::COLLECTION)
                .fetch_all(&self.pool)
                .await?;
        decode(bodies)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<T>> {
        let body: Option<String> =
            sqlx::query_scalar("SELECT body FROM documents WHERE collection = ? AND id = ?")
                .bind(T::COLLECTION)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        body.map(|b| serde_json::from_str(&b).map_err(SiteError::from))
            .transpose()
    }

    async fn insert(&self, record: T) -> Result<T> {
        let body = serde_json::to_string(&record)?;
        let result = sqlx::query(
            "INSERT INTO documents (collection, id, body, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(T::COLLECTION)
        .bind(record.id())
        .bind(&body)
        .bind(record.created_at().to_rfc3339_opts(SecondsFormat::Millis, true))
        .bind(record.updated_at().to_rfc3339_opts(SecondsFormat::Millis, true))
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(record),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(SiteError::Conflict(
                format!("{} id {} already exists", T::COLLECTION, record.id()),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn update(&self, record: T) -> Result<Option<T>> {
        let body = serde_json::to_string(&record)?;
        let result = sqlx::query(
            "UPDATE documents SET body = ?, updated_at = ? WHERE collection = ? AND id = ?",
        )
        .bind(&body)
        .bind(record.updated_at().to_rfc3339_opts(SecondsFormat::Millis, true))
        .bind(T::COLLECTION)
        .bind(record.id())
        .execute(&self.pool)
        .await?;

        Ok((result.rows_affected() > 0).then_some(record))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
            .bind(T::COLLECTION)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE collection = ?")
            .bind(T::COLLECTION)
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }
}
