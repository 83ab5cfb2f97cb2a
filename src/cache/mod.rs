pub mod entity;

pub use entity::{CacheEntry, EntityCache, RefillPlan};

use crate::core::Result;
use crate::models::{Group, Proxy, SlotMapping};

/// The three entity caches of a topology manager.
///
/// Created empty with its manager and dropped with it. Nothing here talks to
/// the store: writers invalidate, context builds refill.
#[derive(Debug)]
pub struct TopologyCache {
    slots: EntityCache<u32, SlotMapping>,
    groups: EntityCache<u32, Group>,
    proxies: EntityCache<String, Proxy>,
}

impl TopologyCache {
    pub fn new() -> Self {
        Self {
            slots: EntityCache::new("slots"),
            groups: EntityCache::new("group"),
            proxies: EntityCache::new("proxy"),
        }
    }

    pub fn slots(&self) -> &EntityCache<u32, SlotMapping> {
        &self.slots
    }

    pub fn groups(&self) -> &EntityCache<u32, Group> {
        &self.groups
    }

    pub fn proxies(&self) -> &EntityCache<String, Proxy> {
        &self.proxies
    }

    pub fn dirty_slot(&self, sid: u32) -> Result<()> {
        self.slots.invalidate(sid)
    }

    pub fn dirty_group(&self, gid: u32) -> Result<()> {
        self.groups.invalidate(gid)
    }

    pub fn dirty_proxy(&self, token: &str) -> Result<()> {
        self.proxies.invalidate(token.to_string())
    }

    pub fn dirty_all(&self) -> Result<()> {
        self.slots.invalidate_all()?;
        self.groups.invalidate_all()?;
        self.proxies.invalidate_all()
    }
}

impl Default for TopologyCache {
    fn default() -> Self {
        Self::new()
    }
}
