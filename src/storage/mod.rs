pub mod event;
pub mod fs;

pub use event::StorageEvent;
pub use fs::FsStore;

use anyhow::Result;
use async_trait::async_trait;

/// Common trait for object stores.
/// Keys are bucket-scoped; writing an existing key overwrites it, which is
/// what makes reprocessing a dated object idempotent.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Read the full body of an object.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;

    /// Write an object, replacing any previous content under the key.
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()>;
}
