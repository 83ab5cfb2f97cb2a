use super::client::StoreClient;
use super::paths;
use crate::core::{Result, TopologyError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// In-memory `StoreClient`.
///
/// Clones share the same data but close independently, so several managers
/// can observe one store the way separate processes share a coordinator.
pub struct MemoryClient {
    nodes: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
    closed: AtomicBool,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self {
            nodes: Arc::new(RwLock::new(BTreeMap::new())),
            closed: AtomicBool::new(false),
        }
    }

    /// All stored paths, sorted.
    pub async fn paths(&self) -> Vec<String> {
        self.nodes.read().await.keys().cloned().collect()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(TopologyError::ClientClosed);
        }
        Ok(())
    }
}

impl Default for MemoryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MemoryClient {
    fn clone(&self) -> Self {
        Self {
            nodes: Arc::clone(&self.nodes),
            closed: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl StoreClient for MemoryClient {
    async fn create(&self, path: &str, data: Vec<u8>) -> Result<()> {
        self.ensure_open()?;
        let path = paths::clean(path);
        let mut nodes = self.nodes.write().await;
        if nodes.contains_key(&path) {
            return Err(TopologyError::NodeExists(path));
        }
        nodes.insert(path, data);
        Ok(())
    }

    async fn update(&self, path: &str, data: Vec<u8>) -> Result<()> {
        self.ensure_open()?;
        self.nodes.write().await.insert(paths::clean(path), data);
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.ensure_open()?;
        self.nodes.write().await.remove(&paths::clean(path));
        Ok(())
    }

    async fn read(&self, path: &str) -> Result<Option<Vec<u8>>> {
        self.ensure_open()?;
        Ok(self.nodes.read().await.get(&paths::clean(path)).cloned())
    }

    async fn list(&self, path: &str) -> Result<Vec<String>> {
        self.ensure_open()?;
        let dir = paths::clean(path);
        let nodes = self.nodes.read().await;
        Ok(nodes
            .keys()
            .filter(|key| paths::parent(key) == dir && key.as_str() != dir)
            .cloned()
            .collect())
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
