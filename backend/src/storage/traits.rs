//! # Storage Traits
//!
//! This module defines the storage abstraction that allows different
//! storage backends to be used interchangeably in the domain layer.
//!
//! Every entity type lives in a named collection and is keyed by an opaque
//! string id. The capability set is deliberately small — get, get_all, put,
//! delete, filter — so that a relational engine and a document store can
//! implement it with observably identical behavior.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::sqlite::{SqliteArguments, SqliteRow};

use super::StorageError;

/// A `sqlx` query against the SQLite backend, mid-binding.
pub type SqliteQuery<'q> = sqlx::query::Query<'q, sqlx::Sqlite, SqliteArguments<'q>>;

/// A persistable record: a named collection plus a string primary id.
///
/// The trait also carries the relational row mapping (insert statement and
/// parameter binding) so the SQLite backend can stay fully generic; the
/// document backend uses the serde impls instead and ignores the SQL side.
pub trait Entity:
    Clone
    + Send
    + Sync
    + Unpin
    + Serialize
    + DeserializeOwned
    + for<'r> sqlx::FromRow<'r, SqliteRow>
    + 'static
{
    /// Name of the collection (and SQLite table) holding this entity.
    const COLLECTION: &'static str;

    /// The record's primary id. Assigned at creation, immutable afterwards.
    fn id(&self) -> &str;

    /// `INSERT OR REPLACE` statement covering every column of the record.
    fn insert_sql() -> &'static str;

    /// Bind this record's fields to the insert statement, in column order.
    fn bind_insert<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q>;
}

/// Backend-agnostic persistence over named record collections.
///
/// Both implementations guarantee read-your-own-write: a `put` followed by a
/// `get` of the same id returns a value deep-equal to what was written.
/// Absence is represented as an empty/absent result, never an error; a
/// backend-level I/O failure surfaces as a [`StorageError`].
#[async_trait]
pub trait EntityStore: Clone + Send + Sync + 'static {
    /// All records in the collection. Unordered at this layer; ordering is a
    /// service-level concern.
    async fn get_all<E: Entity>(&self) -> Result<Vec<E>, StorageError>;

    /// A single record by id, or `None` if absent.
    async fn get<E: Entity>(&self, id: &str) -> Result<Option<E>, StorageError>;

    /// Insert-or-replace by id. Idempotent.
    async fn put<E: Entity>(&self, record: &E) -> Result<(), StorageError>;

    /// Delete by id. A no-op if the record is absent.
    async fn delete<E: Entity>(&self, id: &str) -> Result<(), StorageError>;

    /// Records matching a predicate; used for relational queries (by foreign
    /// key, by month bucket, by boolean flag).
    async fn filter<E, P>(&self, predicate: P) -> Result<Vec<E>, StorageError>
    where
        E: Entity,
        P: Fn(&E) -> bool + Send,
    {
        let mut records = self.get_all::<E>().await?;
        records.retain(|record| predicate(record));
        Ok(records)
    }
}
