//! Document storage backend.
//!
//! One JSON file per entity collection under a data directory, each holding a
//! flat array of records. Mutations rewrite the whole file through a
//! temporary file followed by a rename, so a crash never leaves a collection
//! half-written. The store has no foreign-key enforcement; cascade deletes
//! are performed explicitly by the service layer.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use super::traits::{Entity, EntityStore};
use super::StorageError;
use async_trait::async_trait;

const TMP_SUFFIX: &str = "tmp";

/// JSON-file-backed entity store.
#[derive(Clone)]
pub struct JsonStore {
    inner: Arc<Inner>,
}

struct Inner {
    dir: PathBuf,
    // Serializes read-modify-write cycles on the collection files.
    lock: Mutex<()>,
}

impl JsonStore {
    /// Open (creating if missing) the data directory.
    pub fn open(dir: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(dir)?;
        info!("opened json store at {}", dir.display());
        Ok(Self {
            inner: Arc::new(Inner {
                dir: dir.to_path_buf(),
                lock: Mutex::new(()),
            }),
        })
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.inner.dir.join(format!("{collection}.json"))
    }

    async fn read_collection<E: Entity>(&self) -> Result<Vec<E>, StorageError> {
        let path = self.collection_path(E::COLLECTION);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    async fn write_collection<E: Entity>(&self, records: &[E]) -> Result<(), StorageError> {
        let path = self.collection_path(E::COLLECTION);
        let tmp_path = path.with_extension(TMP_SUFFIX);
        let bytes = serde_json::to_vec_pretty(records)?;
        tokio::fs::write(&tmp_path, bytes).await?;
        tokio::fs::rename(&tmp_path, &path).await?;
        Ok(())
    }
}

#[async_trait]
impl EntityStore for JsonStore {
    async fn get_all<E: Entity>(&self) -> Result<Vec<E>, StorageError> {
        let _guard = self.inner.lock.lock().await;
        self.read_collection().await
    }

    async fn get<E: Entity>(&self, id: &str) -> Result<Option<E>, StorageError> {
        let _guard = self.inner.lock.lock().await;
        let records = self.read_collection::<E>().await?;
        Ok(records.into_iter().find(|record| record.id() == id))
    }

    async fn put<E: Entity>(&self, record: &E) -> Result<(), StorageError> {
        let _guard = self.inner.lock.lock().await;
        let mut records = self.read_collection::<E>().await?;
        match records.iter_mut().find(|existing| existing.id() == record.id()) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        self.write_collection(&records).await
    }

    async fn delete<E: Entity>(&self, id: &str) -> Result<(), StorageError> {
        let _guard = self.inner.lock.lock().await;
        let mut records = self.read_collection::<E>().await?;
        let before = records.len();
        records.retain(|record| record.id() != id);
        if records.len() != before {
            self.write_collection(&records).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{FinancialSettings, GroceryList, MonthlySavings};

    fn test_store() -> (tempfile::TempDir, JsonStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        (dir, store)
    }

    fn sample_list(id: &str, name: &str, total_cost: f64) -> GroceryList {
        GroceryList {
            id: id.to_string(),
            name: name.to_string(),
            total_cost,
            created_at: "2025-01-01T00:00:00+00:00".to_string(),
            updated_at: "2025-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[tokio::test]
    async fn put_then_get_returns_deep_equal_record() {
        let (_dir, store) = test_store();

        let list = sample_list("list_1", "Weekly", 10.47);
        store.put(&list).await.unwrap();

        let loaded: GroceryList = store.get("list_1").await.unwrap().unwrap();
        assert_eq!(loaded, list);
    }

    #[tokio::test]
    async fn missing_collection_file_reads_as_empty() {
        let (_dir, store) = test_store();
        let all: Vec<MonthlySavings> = store.get_all().await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn put_replaces_existing_record_in_place() {
        let (_dir, store) = test_store();

        store.put(&sample_list("list_1", "Weekly", 0.0)).await.unwrap();
        store.put(&sample_list("list_1", "Weekly groceries", 5.0)).await.unwrap();

        let all: Vec<GroceryList> = store.get_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Weekly groceries");
    }

    #[tokio::test]
    async fn delete_missing_record_is_a_noop() {
        let (_dir, store) = test_store();
        store.delete::<GroceryList>("no-such-id").await.unwrap();

        store.put(&sample_list("list_1", "Weekly", 0.0)).await.unwrap();
        store.delete::<GroceryList>("list_1").await.unwrap();
        store.delete::<GroceryList>("list_1").await.unwrap();

        let all: Vec<GroceryList> = store.get_all().await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn collections_are_isolated_per_entity_type() {
        let (_dir, store) = test_store();

        store.put(&sample_list("list_1", "Weekly", 0.0)).await.unwrap();

        let settings = FinancialSettings {
            id: "default".to_string(),
            monthly_income: 4500.0,
            savings_goal: 1000.0,
            current_savings: 0.0,
            created_at: "2025-01-01T00:00:00+00:00".to_string(),
            updated_at: "2025-01-01T00:00:00+00:00".to_string(),
        };
        store.put(&settings).await.unwrap();

        let lists: Vec<GroceryList> = store.get_all().await.unwrap();
        let settings_rows: Vec<FinancialSettings> = store.get_all().await.unwrap();
        assert_eq!(lists.len(), 1);
        assert_eq!(settings_rows.len(), 1);
    }
}
