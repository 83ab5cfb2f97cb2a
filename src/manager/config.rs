use crate::core::{Result, TopologyError};
use crate::storage::TopologyPaths;

pub const DEFAULT_ROOT: &str = "/slotkeeper";
pub const DEFAULT_MAX_SLOT_NUM: u32 = 1024;
pub const MAX_SLOT_NUM_LIMIT: u32 = 16384;
pub const DEFAULT_FETCH_CONCURRENCY: usize = 16;

/// Topology manager configuration
///
/// Built with chained setters, checked by [`TopologyConfig::validate`] when a
/// manager is created.
#[derive(Debug, Clone)]
pub struct TopologyConfig {
    /// Product (cluster) name, one path segment under `root`
    pub product_name: String,

    /// Root path of every product in the store
    pub root: String,

    /// Total number of hash slots
    pub max_slot_num: u32,

    /// Upper bound on concurrent store reads during a context build
    pub fetch_concurrency: usize,
}

impl TopologyConfig {
    pub fn new(product_name: &str) -> Self {
        Self {
            product_name: product_name.to_string(),
            root: DEFAULT_ROOT.to_string(),
            max_slot_num: DEFAULT_MAX_SLOT_NUM,
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
        }
    }

    /// Set the store root
    pub fn root(mut self, root: &str) -> Self {
        self.root = root.to_string();
        self
    }

    /// Set the number of hash slots
    pub fn max_slot_num(mut self, max_slot_num: u32) -> Self {
        self.max_slot_num = max_slot_num;
        self
    }

    /// Set the bound on concurrent store reads
    pub fn fetch_concurrency(mut self, fetch_concurrency: usize) -> Self {
        self.fetch_concurrency = fetch_concurrency;
        self
    }

    pub fn paths(&self) -> TopologyPaths {
        TopologyPaths::new(&self.root, &self.product_name)
    }

    pub fn validate(&self) -> Result<()> {
        if self.product_name.is_empty() {
            return Err(TopologyError::ConfigError(
                "product_name cannot be empty".to_string(),
            ));
        }

        if self.product_name.contains('/') || self.product_name.starts_with('.') {
            return Err(TopologyError::ConfigError(format!(
                "product_name '{}' must be a single path segment",
                self.product_name
            )));
        }

        if !self.root.starts_with('/') {
            return Err(TopologyError::ConfigError(format!(
                "root '{}' must be an absolute path",
                self.root
            )));
        }

        if self.max_slot_num == 0 || self.max_slot_num > MAX_SLOT_NUM_LIMIT {
            return Err(TopologyError::ConfigError(format!(
                "max_slot_num must be in 1..={}",
                MAX_SLOT_NUM_LIMIT
            )));
        }

        if self.fetch_concurrency == 0 {
            return Err(TopologyError::ConfigError(
                "fetch_concurrency must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self::new("default")
    }
}
