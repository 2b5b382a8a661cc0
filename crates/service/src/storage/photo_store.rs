use std::path::PathBuf;

use tokio::fs;
use uuid::Uuid;

use crate::errors::ServiceError;

/// Disk-backed store for uploaded photos.
///
/// Files land under `<root>/<kind>/<id>.png`; entities record the returned
/// root-relative path. Lightweight by intent, the same way small JSON state
/// is kept on disk instead of in the database.
#[derive(Clone)]
pub struct PhotoStore {
    root: PathBuf,
}

impl PhotoStore {
    /// Initialize the store rooted at `root`, creating it if missing.
    pub async fn new<P: Into<PathBuf>>(root: P) -> Result<Self, ServiceError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .await
            .map_err(|e| ServiceError::Storage(format!("create {}: {e}", root.display())))?;
        Ok(Self { root })
    }

    /// Persist `bytes` for the entity and return the root-relative path.
    pub async fn save(&self, kind: &str, id: Uuid, bytes: &[u8]) -> Result<String, ServiceError> {
        if bytes.is_empty() {
            return Err(ServiceError::Validation("uploaded file is empty".into()));
        }
        let rel = format!("{kind}/{id}.png");
        let path = self.root.join(&rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ServiceError::Storage(format!("create {}: {e}", parent.display())))?;
        }
        fs::write(&path, bytes)
            .await
            .map_err(|e| ServiceError::Storage(format!("write {rel}: {e}")))?;
        Ok(rel)
    }

    /// Read a photo back by its stored root-relative path.
    pub async fn read(&self, rel: &str) -> Result<Vec<u8>, ServiceError> {
        // Stored paths are always root-relative; refuse anything that escapes.
        if rel.contains("..") || rel.starts_with('/') {
            return Err(ServiceError::Validation("invalid photo path".into()));
        }
        fs::read(self.root.join(rel))
            .await
            .map_err(|e| ServiceError::Storage(format!("read {rel}: {e}")))
    }
}
