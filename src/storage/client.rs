use crate::core::Result;
use async_trait::async_trait;

/// Path-addressed persistence backed by a coordination service.
///
/// Implementations decide how I/O blocks, times out or is cancelled; callers
/// surface whatever error comes back and never retry on their own.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Writes `data` at `path`, failing with `NodeExists` if the path is present.
    async fn create(&self, path: &str, data: Vec<u8>) -> Result<()>;

    /// Writes `data` at `path`, creating or replacing it.
    async fn update(&self, path: &str, data: Vec<u8>) -> Result<()>;

    /// Removes `path`. Removing an absent path succeeds.
    async fn delete(&self, path: &str) -> Result<()>;

    /// Reads `path`, returning `None` when absent.
    async fn read(&self, path: &str) -> Result<Option<Vec<u8>>>;

    /// Lists the full paths whose parent directory is `path`, sorted.
    async fn list(&self, path: &str) -> Result<Vec<String>>;

    /// Releases the client. Later calls fail with `ClientClosed`.
    async fn close(&self) -> Result<()>;
}
