//! Lifecycle-scoped owner of the store, the entity caches and the manager lock.
//!
//! Context builds live in `builder`, store writes in `mutators`.

pub mod config;

mod builder;
mod mutators;

pub use config::TopologyConfig;
pub use mutators::TopologyWrite;

use crate::cache::TopologyCache;
use crate::core::{Result, TopologyError};
use crate::models::TopologyLock;
use crate::storage::{StoreClient, TopologyStore};
use std::sync::{Arc, Mutex};
use tracing::{Level, event};

/// Entry point for reading and writing the topology of one product.
///
/// Share it between tasks behind an `Arc`; every method takes `&self`.
pub struct TopologyManager {
    config: TopologyConfig,
    store: TopologyStore,
    cache: TopologyCache,
    lock: Mutex<Option<TopologyLock>>,
}

impl TopologyManager {
    pub fn new(config: TopologyConfig, client: Arc<dyn StoreClient>) -> Result<Self> {
        config.validate()?;
        let store = TopologyStore::new(client, config.paths());
        event!(
            Level::DEBUG,
            product = %config.product_name,
            base = store.paths().base(),
            max_slot_num = config.max_slot_num,
            "topology manager created"
        );
        Ok(Self {
            config,
            store,
            cache: TopologyCache::new(),
            lock: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &TopologyConfig {
        &self.config
    }

    pub fn store(&self) -> &TopologyStore {
        &self.store
    }

    pub fn cache(&self) -> &TopologyCache {
        &self.cache
    }

    pub fn max_slot_num(&self) -> u32 {
        self.config.max_slot_num
    }

    fn check_slot(&self, sid: u32) -> Result<()> {
        if sid >= self.config.max_slot_num {
            return Err(TopologyError::SlotOutOfRange(sid, self.config.max_slot_num));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Cache control
    // ------------------------------------------------------------------

    pub fn dirty_slots_cache(&self, sid: u32) -> Result<()> {
        self.check_slot(sid)?;
        self.cache.dirty_slot(sid)
    }

    pub fn dirty_group_cache(&self, gid: u32) -> Result<()> {
        self.cache.dirty_group(gid)
    }

    pub fn dirty_proxy_cache(&self, token: &str) -> Result<()> {
        self.cache.dirty_proxy(token)
    }

    pub fn dirty_cache_all(&self) -> Result<()> {
        event!(Level::DEBUG, product = %self.config.product_name, "all caches invalidated");
        self.cache.dirty_all()
    }

    // ------------------------------------------------------------------
    // Manager lock
    // ------------------------------------------------------------------

    /// Takes ownership of the product. Fails with `NodeExists` while another
    /// manager holds it.
    pub async fn acquire_lock(&self, admin_addr: &str) -> Result<TopologyLock> {
        if let Some(held) = self.lock.lock()?.as_ref() {
            return Err(TopologyError::LockError(format!(
                "topology lock already held by this manager (token {})",
                held.token
            )));
        }

        let record = TopologyLock::new(self.config.product_name.clone(), admin_addr);
        self.store.acquire_lock(&record).await?;
        *self.lock.lock()? = Some(record.clone());

        event!(
            Level::INFO,
            product = %record.product_name,
            token = %record.token,
            admin_addr = %record.admin_addr,
            "topology lock acquired"
        );
        Ok(record)
    }

    pub fn held_lock(&self) -> Result<Option<TopologyLock>> {
        Ok(self.lock.lock()?.clone())
    }

    /// Releases the lock taken by [`TopologyManager::acquire_lock`].
    ///
    /// Returns `false` when this manager holds no lock or the record is
    /// already gone. A record owned by someone else is left in place.
    pub async fn release_lock(&self) -> Result<bool> {
        let Some(held) = self.lock.lock()?.take() else {
            return Ok(false);
        };

        match self.store.load_lock().await? {
            Some(stored) if stored.token == held.token => {
                self.store.release_lock().await?;
                event!(Level::INFO, token = %held.token, "topology lock released");
                Ok(true)
            }
            Some(stored) => Err(TopologyError::LockError(format!(
                "topology lock is owned by token {}, not {}",
                stored.token, held.token
            ))),
            None => {
                event!(Level::WARN, token = %held.token, "topology lock record already removed");
                Ok(false)
            }
        }
    }

    /// Closes the store client. The manager is unusable afterwards.
    pub async fn close(&self) -> Result<()> {
        event!(Level::DEBUG, product = %self.config.product_name, "closing topology manager");
        self.store.close().await
    }
}
