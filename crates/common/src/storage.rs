//! Blob storage for uploaded images.
//!
//! The rest of the system only ever stores and echoes the URL a backend
//! returns; file bytes are never interpreted past this boundary.

use std::path::PathBuf;

use crate::{AppError, AppResult};

/// Metadata for a stored file.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Storage key (path relative to the backend root).
    pub key: String,
    /// Public URL the file is retrievable at.
    pub url: String,
    /// File size in bytes.
    pub size: u64,
}

/// Storage backend trait.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    /// Store a file under the given key.
    async fn store(&self, key: &str, data: &[u8]) -> AppResult<StoredFile>;

    /// Delete a stored file.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Get the public URL for a key.
    fn public_url(&self, key: &str) -> String;
}

/// Generate a collision-free storage key preserving the file extension.
#[must_use]
pub fn generate_storage_key(original_name: &str) -> String {
    let id = crate::IdGenerator::new().generate();
    match original_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() && ext.len() <= 8 && ext.chars().all(char::is_alphanumeric) => {
            format!("{id}.{}", ext.to_lowercase())
        }
        _ => id,
    }
}

/// Local filesystem storage backend.
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new local storage backend.
    #[must_use]
    pub const fn new(base_path: PathBuf, base_url: String) -> Self {
        Self { base_path, base_url }
    }
}

#[async_trait::async_trait]
impl StorageBackend for LocalStorage {
    async fn store(&self, key: &str, data: &[u8]) -> AppResult<StoredFile> {
        let path = self.base_path.join(key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to create directory: {e}")))?;
        }

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write file: {e}")))?;

        Ok(StoredFile {
            key: key.to_string(),
            url: self.public_url(key),
            size: data.len() as u64,
        })
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let path = self.base_path.join(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            // Deleting a missing file is a no-op.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!("Failed to delete file: {e}"))),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{key}", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_storage_key_keeps_extension() {
        let key = generate_storage_key("latte-art.JPG");
        assert!(key.ends_with(".jpg"));
        assert_eq!(key.len(), 26 + 4);
    }

    #[test]
    fn test_generate_storage_key_drops_odd_extension() {
        let key = generate_storage_key("noext");
        assert_eq!(key.len(), 26);

        let key = generate_storage_key("weird.ex!t");
        assert_eq!(key.len(), 26);
    }

    #[test]
    fn test_public_url_joins_cleanly() {
        let storage = LocalStorage::new(PathBuf::from("/tmp"), "/uploads/".to_string());
        assert_eq!(storage.public_url("abc.png"), "/uploads/abc.png");
    }

    #[tokio::test]
    async fn test_store_and_delete_round_trip() {
        let dir = std::env::temp_dir().join(format!("beanbook-storage-{}", std::process::id()));
        let storage = LocalStorage::new(dir.clone(), "/uploads".to_string());

        let stored = storage.store("test.txt", b"hello").await.unwrap();
        assert_eq!(stored.size, 5);
        assert_eq!(stored.url, "/uploads/test.txt");
        assert!(dir.join("test.txt").exists());

        storage.delete("test.txt").await.unwrap();
        assert!(!dir.join("test.txt").exists());

        // Second delete is a no-op.
        storage.delete("test.txt").await.unwrap();

        tokio::fs::remove_dir_all(dir).await.ok();
    }
}
