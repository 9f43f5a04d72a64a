//! # Storage Module
//!
//! Backend-agnostic persistence for the household finance tracker. Two
//! implementations of the [`EntityStore`] contract exist — a relational
//! SQLite store and a JSON document store — and must behave identically from
//! the caller's perspective. The [`Store`] handle wraps whichever backend was
//! selected at process start so that domain services stay backend-blind.

pub mod json;
pub mod sqlite;
pub mod traits;

#[cfg(test)]
pub mod test_utils;

pub use json::JsonStore;
pub use sqlite::SqliteStore;
pub use traits::{Entity, EntityStore, SqliteQuery};

use async_trait::async_trait;
use thiserror::Error;

use crate::config::StorageConfig;

/// A backend-level I/O failure. Propagated to the caller as-is; the core
/// never retries automatically. Absence of a record is never an error.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Handle to the storage backend selected at process start.
///
/// Services receive a clone of this handle at construction (explicit
/// dependency injection, no module-level connection state) and dispatch
/// through it without ever knowing which engine is underneath.
#[derive(Clone)]
pub enum Store {
    Sqlite(SqliteStore),
    Json(JsonStore),
}

impl Store {
    /// Open the backend described by the configuration.
    pub async fn open(config: &StorageConfig) -> Result<Self, StorageError> {
        match config {
            StorageConfig::Sqlite { path } => {
                Ok(Store::Sqlite(SqliteStore::connect(path).await?))
            }
            StorageConfig::Json { dir } => Ok(Store::Json(JsonStore::open(dir)?)),
        }
    }
}

#[async_trait]
impl EntityStore for Store {
    async fn get_all<E: Entity>(&self) -> Result<Vec<E>, StorageError> {
        match self {
            Store::Sqlite(store) => store.get_all().await,
            Store::Json(store) => store.get_all().await,
        }
    }

    async fn get<E: Entity>(&self, id: &str) -> Result<Option<E>, StorageError> {
        match self {
            Store::Sqlite(store) => store.get(id).await,
            Store::Json(store) => store.get(id).await,
        }
    }

    async fn put<E: Entity>(&self, record: &E) -> Result<(), StorageError> {
        match self {
            Store::Sqlite(store) => store.put(record).await,
            Store::Json(store) => store.put(record).await,
        }
    }

    async fn delete<E: Entity>(&self, id: &str) -> Result<(), StorageError> {
        match self {
            Store::Sqlite(store) => store.delete::<E>(id).await,
            Store::Json(store) => store.delete::<E>(id).await,
        }
    }
}
