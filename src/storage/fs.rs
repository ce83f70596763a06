use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::storage::ObjectStore;

/// Filesystem-backed object store.
///
/// Objects live at `<root>/<bucket>/<key>`; keys may contain `/` and map to
/// subdirectories, so `2025-03-10/2025-03-10.csv` lands where you expect.
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn object_path(&self, bucket: &str, key: &str) -> PathBuf {
        self.root.join(bucket).join(key)
    }
}

#[async_trait]
impl ObjectStore for FsStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let path = self.object_path(bucket, key);
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read object {}/{}", bucket, key))
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        let path = self.object_path(bucket, key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        tokio::fs::write(&path, body)
            .await
            .with_context(|| format!("Failed to write object {}/{}", bucket, key))
    }
}
