//! A JSON-array-backed collection of records.
//!
//! Every call re-reads the backing file; nothing is cached between calls.
//! Mutations hold a per-collection lock across their read-modify-write and
//! replace the file through a temporary sibling plus rename, so readers only
//! ever observe a complete array.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::Record;
use crate::errors::AppError;

/// One homogeneous collection persisted as a pretty-printed JSON array.
pub struct Collection<R> {
    path: PathBuf,
    write_lock: Mutex<()>,
    allow_duplicate_ids: bool,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> Collection<R> {
    pub fn new(path: PathBuf, allow_duplicate_ids: bool) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
            allow_duplicate_ids,
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Seed the backing file with an empty array if it does not exist yet.
    pub async fn ensure_exists(&self) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        if tokio::fs::try_exists(&self.path).await? {
            return Ok(());
        }
        tracing::info!(
            "Initializing empty {} collection at {:?}",
            R::KIND.singular(),
            self.path()
        );
        self.persist(&[]).await
    }

    /// Return every record in stored order.
    pub async fn get_all(&self) -> Result<Vec<R>, AppError> {
        self.load().await
    }

    /// Return the first record whose id equals `id`.
    pub async fn find_by_key(&self, id: &str) -> Result<Option<R>, AppError> {
        let records = self.load().await?;
        Ok(records.into_iter().find(|r| r.id() == id))
    }

    /// Add `record` at the end of the collection.
    ///
    /// Fails with `Conflict` when the id is already taken, unless the
    /// collection was opened with duplicate ids allowed.
    pub async fn append(&self, record: R) -> Result<R, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;

        if !self.allow_duplicate_ids && records.iter().any(|r| r.id() == record.id()) {
            return Err(AppError::Conflict(format!(
                "{} {} already exists",
                R::KIND.label(),
                record.id()
            )));
        }

        records.push(record.clone());
        self.persist(&records).await?;
        Ok(record)
    }

    /// Overwrite the first record whose id equals `id` with `record`.
    ///
    /// This is a whole-record replacement, not a field merge. Nothing is
    /// written when no record matches.
    pub async fn replace_by_key(&self, id: &str, record: R) -> Result<R, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;

        let slot = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| AppError::NotFound(format!("{} not found", R::KIND.label())))?;
        *slot = record.clone();

        self.persist(&records).await?;
        Ok(record)
    }

    /// Remove every record whose id equals `id` and return how many went.
    ///
    /// Removing an absent id is not an error; the file is rewritten unchanged.
    pub async fn delete_by_key(&self, id: &str) -> Result<usize, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;

        let before = records.len();
        records.retain(|r| r.id() != id);
        let removed = before - records.len();

        self.persist(&records).await?;
        Ok(removed)
    }

    async fn load(&self) -> Result<Vec<R>, AppError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            AppError::StoreUnavailable(format!("Failed to read {:?}: {}", self.path, e))
        })?;
        serde_json::from_slice(&bytes).map_err(|e| {
            AppError::StoreUnavailable(format!("Failed to parse {:?}: {}", self.path, e))
        })
    }

    async fn persist(&self, records: &[R]) -> Result<(), AppError> {
        let bytes = serde_json::to_vec_pretty(records)?;
        write_atomic(&self.path, &bytes).await.map_err(|e| {
            AppError::StoreUnavailable(format!("Failed to write {:?}: {}", self.path, e))
        })
    }
}

/// Write `bytes` to a temporary sibling of `path`, flush it to disk, then
/// rename it over `path`.
async fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("collection");
    let tmp = parent.join(format!(".{}.tmp.{}", file_name, std::process::id()));

    let result = async {
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&tmp, path).await
    }
    .await;

    if result.is_err() {
        let _ = tokio::fs::remove_file(&tmp).await;
        return result;
    }

    // Persist the rename itself; not every platform allows opening a directory.
    if let Ok(dir) = tokio::fs::File::open(parent).await {
        let _ = dir.sync_all().await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Collection, FleetStore, ResourceKind};
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: String,
        value: i64,
    }

    impl Record for Item {
        const KIND: ResourceKind = ResourceKind::Bus;

        fn id(&self) -> &str {
            &self.id
        }

        fn collection(_store: &FleetStore) -> &Collection<Self> {
            unreachable!("test-only record is not part of the fleet store")
        }
    }

    fn item(id: &str, value: i64) -> Item {
        Item {
            id: id.to_string(),
            value,
        }
    }

    async fn fresh(dir: &TempDir, allow_duplicate_ids: bool) -> Collection<Item> {
        let collection = Collection::new(dir.path().join("items.json"), allow_duplicate_ids);
        collection.ensure_exists().await.unwrap();
        collection
    }

    #[tokio::test]
    async fn test_get_all_on_new_collection_is_empty() {
        let dir = TempDir::new().unwrap();
        let collection = fresh(&dir, false).await;
        assert!(collection.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ensure_exists_keeps_existing_data() {
        let dir = TempDir::new().unwrap();
        let collection = fresh(&dir, false).await;
        collection.append(item("a", 1)).await.unwrap();

        collection.ensure_exists().await.unwrap();
        assert_eq!(collection.get_all().await.unwrap(), vec![item("a", 1)]);
    }

    #[tokio::test]
    async fn test_append_adds_last_element() {
        let dir = TempDir::new().unwrap();
        let collection = fresh(&dir, false).await;

        collection.append(item("a", 1)).await.unwrap();
        let stored = collection.append(item("b", 2)).await.unwrap();
        assert_eq!(stored, item("b", 2));

        let all = collection.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all.last(), Some(&item("b", 2)));
    }

    #[tokio::test]
    async fn test_append_rejects_duplicate_id() {
        let dir = TempDir::new().unwrap();
        let collection = fresh(&dir, false).await;

        collection.append(item("a", 1)).await.unwrap();
        let err = collection.append(item("a", 2)).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(collection.get_all().await.unwrap(), vec![item("a", 1)]);
    }

    #[tokio::test]
    async fn test_replace_keeps_position_and_neighbours() {
        let dir = TempDir::new().unwrap();
        let collection = fresh(&dir, false).await;
        for (id, value) in [("a", 1), ("b", 2), ("c", 3)] {
            collection.append(item(id, value)).await.unwrap();
        }

        collection.replace_by_key("b", item("b", 20)).await.unwrap();

        assert_eq!(
            collection.get_all().await.unwrap(),
            vec![item("a", 1), item("b", 20), item("c", 3)]
        );
    }

    #[tokio::test]
    async fn test_replace_missing_id_is_not_found_and_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let collection = fresh(&dir, false).await;
        collection.append(item("a", 1)).await.unwrap();
        let before = std::fs::read(collection.path()).unwrap();

        let err = collection
            .replace_by_key("zzz", item("zzz", 9))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(std::fs::read(collection.path()).unwrap(), before);
    }

    #[tokio::test]
    async fn test_noop_replace_round_trips() {
        let dir = TempDir::new().unwrap();
        let collection = fresh(&dir, false).await;
        collection.append(item("a", 1)).await.unwrap();
        let before = collection.get_all().await.unwrap();

        collection.replace_by_key("a", item("a", 1)).await.unwrap();
        assert_eq!(collection.get_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_duplicates_replace_first_and_delete_all() {
        let dir = TempDir::new().unwrap();
        let collection = fresh(&dir, true).await;
        collection.append(item("dup", 1)).await.unwrap();
        collection.append(item("x", 5)).await.unwrap();
        collection.append(item("dup", 2)).await.unwrap();

        collection.replace_by_key("dup", item("dup", 10)).await.unwrap();
        assert_eq!(
            collection.get_all().await.unwrap(),
            vec![item("dup", 10), item("x", 5), item("dup", 2)]
        );

        let removed = collection.delete_by_key("dup").await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(collection.get_all().await.unwrap(), vec![item("x", 5)]);
    }

    #[tokio::test]
    async fn test_delete_absent_id_is_harmless() {
        let dir = TempDir::new().unwrap();
        let collection = fresh(&dir, false).await;
        collection.append(item("a", 1)).await.unwrap();

        assert_eq!(collection.delete_by_key("nope").await.unwrap(), 0);
        assert_eq!(collection.get_all().await.unwrap(), vec![item("a", 1)]);
    }

    #[tokio::test]
    async fn test_file_is_pretty_printed_and_no_temp_left_behind() {
        let dir = TempDir::new().unwrap();
        let collection = fresh(&dir, false).await;
        collection.append(item("a", 1)).await.unwrap();

        let text = std::fs::read_to_string(collection.path()).unwrap();
        assert!(text.starts_with("[\n  {\n    \"id\": \"a\""));

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_or_corrupt_file_is_store_unavailable() {
        let dir = TempDir::new().unwrap();
        let collection: Collection<Item> = Collection::new(dir.path().join("gone.json"), false);
        assert!(matches!(
            collection.get_all().await,
            Err(AppError::StoreUnavailable(_))
        ));

        std::fs::write(collection.path(), b"[{\"id\": ").unwrap();
        assert!(matches!(
            collection.append(item("a", 1)).await,
            Err(AppError::StoreUnavailable(_))
        ));
        assert!(matches!(
            collection.delete_by_key("a").await,
            Err(AppError::StoreUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_not_lost() {
        let dir = TempDir::new().unwrap();
        let collection = std::sync::Arc::new(fresh(&dir, false).await);

        let mut handles = Vec::new();
        for i in 0..20 {
            let collection = collection.clone();
            handles.push(tokio::spawn(async move {
                collection.append(item(&format!("item-{}", i), i)).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(collection.get_all().await.unwrap().len(), 20);
    }
}
