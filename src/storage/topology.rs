use super::client::StoreClient;
use super::paths::TopologyPaths;
use crate::core::{Result, TopologyError};
use crate::models::codec::{decode, encode};
use crate::models::{Group, Proxy, SlotMapping, TopologyLock};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{Level, event};

/// Typed access to the topology entities of one product.
///
/// Owns the path layout and the codec; performs no caching.
#[derive(Clone)]
pub struct TopologyStore {
    client: Arc<dyn StoreClient>,
    paths: TopologyPaths,
}

impl TopologyStore {
    pub fn new(client: Arc<dyn StoreClient>, paths: TopologyPaths) -> Self {
        Self { client, paths }
    }

    pub fn paths(&self) -> &TopologyPaths {
        &self.paths
    }

    pub fn client(&self) -> &Arc<dyn StoreClient> {
        &self.client
    }

    async fn read_model<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        match self.client.read(path).await? {
            Some(data) => decode(path, &data).map(Some),
            None => Ok(None),
        }
    }

    /// Lists `dir` and maps every child onto its key. Children that no key
    /// maps to are never read by a point lookup either, so they are skipped.
    async fn list_keys<K>(
        &self,
        dir: &str,
        key_of: impl Fn(&str) -> Option<K>,
    ) -> Result<Vec<K>> {
        let listed = self.client.list(dir).await?;
        let mut keys = Vec::with_capacity(listed.len());
        for path in &listed {
            match key_of(path) {
                Some(key) => keys.push(key),
                None => event!(Level::WARN, path = %path, "ignoring unexpected store node"),
            }
        }
        Ok(keys)
    }

    // ------------------------------------------------------------------
    // Slot mappings
    // ------------------------------------------------------------------

    pub async fn load_slot_mapping(&self, sid: u32) -> Result<Option<SlotMapping>> {
        let path = self.paths.slot_path(sid);
        let mapping = self.read_model::<SlotMapping>(&path).await?;
        if let Some(mapping) = &mapping {
            if mapping.id != sid {
                return Err(TopologyError::CodecError(format!(
                    "'{}' holds slot {}",
                    path, mapping.id
                )));
            }
        }
        Ok(mapping)
    }

    pub async fn update_slot_mapping(&self, mapping: &SlotMapping) -> Result<()> {
        self.client
            .update(&self.paths.slot_path(mapping.id), encode(mapping)?)
            .await
    }

    // ------------------------------------------------------------------
    // Groups
    // ------------------------------------------------------------------

    /// Ids of every stored group, read from the directory listing.
    pub async fn group_ids(&self) -> Result<Vec<u32>> {
        self.list_keys(&self.paths.group_dir(), |path| self.paths.group_id_of(path))
            .await
    }

    pub async fn load_group(&self, gid: u32) -> Result<Option<Group>> {
        let path = self.paths.group_path(gid);
        let group = self.read_model::<Group>(&path).await?;
        if let Some(group) = &group {
            if group.id != gid {
                return Err(TopologyError::CodecError(format!(
                    "'{}' holds group {}",
                    path, group.id
                )));
            }
        }
        Ok(group)
    }

    pub async fn create_group(&self, group: &Group) -> Result<()> {
        self.client
            .create(&self.paths.group_path(group.id), encode(group)?)
            .await
    }

    pub async fn update_group(&self, group: &Group) -> Result<()> {
        self.client
            .update(&self.paths.group_path(group.id), encode(group)?)
            .await
    }

    pub async fn delete_group(&self, gid: u32) -> Result<()> {
        self.client.delete(&self.paths.group_path(gid)).await
    }

    // ------------------------------------------------------------------
    // Proxies
    // ------------------------------------------------------------------

    /// Tokens of every stored proxy, read from the directory listing.
    pub async fn proxy_tokens(&self) -> Result<Vec<String>> {
        self.list_keys(&self.paths.proxy_dir(), |path| self.paths.proxy_token_of(path))
            .await
    }

    pub async fn load_proxy(&self, token: &str) -> Result<Option<Proxy>> {
        let path = self.paths.proxy_path(token);
        let proxy = self.read_model::<Proxy>(&path).await?;
        if let Some(proxy) = &proxy {
            if proxy.token != token {
                return Err(TopologyError::CodecError(format!(
                    "'{}' holds proxy '{}'",
                    path, proxy.token
                )));
            }
        }
        Ok(proxy)
    }

    pub async fn create_proxy(&self, proxy: &Proxy) -> Result<()> {
        self.client
            .create(&self.paths.proxy_path(&proxy.token), encode(proxy)?)
            .await
    }

    pub async fn update_proxy(&self, proxy: &Proxy) -> Result<()> {
        self.client
            .update(&self.paths.proxy_path(&proxy.token), encode(proxy)?)
            .await
    }

    pub async fn delete_proxy(&self, token: &str) -> Result<()> {
        self.client.delete(&self.paths.proxy_path(token)).await
    }

    // ------------------------------------------------------------------
    // Manager lock
    // ------------------------------------------------------------------

    /// Writes the lock record; fails with `NodeExists` while another holder has it.
    pub async fn acquire_lock(&self, lock: &TopologyLock) -> Result<()> {
        self.client
            .create(&self.paths.lock_path(), encode(lock)?)
            .await
    }

    pub async fn load_lock(&self) -> Result<Option<TopologyLock>> {
        self.read_model(&self.paths.lock_path()).await
    }

    pub async fn release_lock(&self) -> Result<()> {
        self.client.delete(&self.paths.lock_path()).await
    }

    pub async fn close(&self) -> Result<()> {
        self.client.close().await
    }
}
