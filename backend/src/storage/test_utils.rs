//! Shared helpers for storage and service tests.

use tempfile::TempDir;

use super::{JsonStore, SqliteStore, Store};

/// A JSON-backed store in a fresh temporary directory.
///
/// The directory must stay alive for as long as the store is used.
pub fn json_store() -> (TempDir, Store) {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::open(dir.path()).unwrap();
    (dir, Store::Json(store))
}

/// A SQLite-backed store on a fresh temporary database file.
pub async fn sqlite_store() -> (TempDir, Store) {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::connect(&dir.path().join("test.db")).await.unwrap();
    (dir, Store::Sqlite(store))
}
