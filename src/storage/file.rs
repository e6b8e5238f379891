//! File-backed key-value storage: one file per key in a data directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::traits::KeyValueStore;
use crate::error::Result;

/// Directory of `<sanitized key>.json` files.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Open a FileStore at the given directory, creating it if needed.
    pub fn new(base_path: impl AsRef<Path>) -> Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Get the file path for a key.
    ///
    /// Anything outside `[A-Za-z0-9_-]` becomes `_`, so `@prayer_app_contacts`
    /// is stored as `_prayer_app_contacts.json`.
    fn key_path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.json", name))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.key_path(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let path = self.key_path(key);
        let temp_path = path.with_extension("json.tmp");

        // Write the temp file first, then swap it in
        fs::write(&temp_path, value.as_bytes()).await?;
        fs::rename(&temp_path, &path).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.key_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_storage() -> (FileStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStore::new(temp_dir.path()).unwrap();
        (storage, temp_dir)
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let (storage, _temp) = create_test_storage();
        storage.set("@prayer_app_contacts", "[]".to_string()).await.unwrap();
        let value = storage.get("@prayer_app_contacts").await.unwrap();
        assert_eq!(value.as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let (storage, _temp) = create_test_storage();
        assert_eq!(storage.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let (storage, _temp) = create_test_storage();
        storage.set("k", "one".to_string()).await.unwrap();
        storage.set("k", "two".to_string()).await.unwrap();
        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn test_remove() {
        let (storage, _temp) = create_test_storage();
        storage.set("k", "v".to_string()).await.unwrap();
        storage.remove("k").await.unwrap();
        assert_eq!(storage.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_not_found_is_ok() {
        let (storage, _temp) = create_test_storage();
        assert!(storage.remove("never-set").await.is_ok());
    }

    #[tokio::test]
    async fn test_multi_remove() {
        let (storage, _temp) = create_test_storage();
        storage.set("a", "1".to_string()).await.unwrap();
        storage.set("b", "2".to_string()).await.unwrap();
        storage.set("c", "3".to_string()).await.unwrap();

        storage.multi_remove(&["a".to_string(), "b".to_string()]).await.unwrap();

        assert_eq!(storage.get("a").await.unwrap(), None);
        assert_eq!(storage.get("b").await.unwrap(), None);
        assert_eq!(storage.get("c").await.unwrap().as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn test_persistence_across_instances() {
        let temp_dir = TempDir::new().unwrap();

        {
            let storage = FileStore::new(temp_dir.path()).unwrap();
            storage.set("@prayer_app_viewed_date", "Mon Oct 19 2026".to_string()).await.unwrap();
        }

        {
            let storage = FileStore::new(temp_dir.path()).unwrap();
            let value = storage.get("@prayer_app_viewed_date").await.unwrap();
            assert_eq!(value.as_deref(), Some("Mon Oct 19 2026"));
        }
    }

    #[tokio::test]
    async fn test_key_is_sanitized_and_no_temp_left() {
        let (storage, temp) = create_test_storage();
        storage.set("@prayer_app/../contacts", "[]".to_string()).await.unwrap();

        let names: Vec<String> = std::fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["_prayer_app____contacts.json".to_string()]);
    }

    #[test]
    fn test_new_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let storage = FileStore::new(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(storage.base_path(), nested.as_path());
    }
}
