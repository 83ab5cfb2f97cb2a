use super::TopologyManager;
use crate::core::{Result, TopologyError};
use crate::models::{Group, Proxy, SlotMapping};
use crate::storage::paths::valid_token;
use tracing::{Level, event};

/// One store write, as applied by [`TopologyManager::commit`].
#[derive(Debug, Clone, PartialEq)]
pub enum TopologyWrite {
    CreateGroup(Group),
    UpdateGroup(Group),
    RemoveGroup(Group),
    CreateProxy(Proxy),
    UpdateProxy(Proxy),
    RemoveProxy(Proxy),
    UpdateSlotMapping(SlotMapping),
}

impl TopologyWrite {
    fn describe(&self) -> &'static str {
        match self {
            TopologyWrite::CreateGroup(_) => "create group",
            TopologyWrite::UpdateGroup(_) => "update group",
            TopologyWrite::RemoveGroup(_) => "remove group",
            TopologyWrite::CreateProxy(_) => "create proxy",
            TopologyWrite::UpdateProxy(_) => "update proxy",
            TopologyWrite::RemoveProxy(_) => "remove proxy",
            TopologyWrite::UpdateSlotMapping(_) => "update slot mapping",
        }
    }
}

fn check_group(group: &Group) -> Result<()> {
    if group.id == 0 {
        return Err(TopologyError::InvalidGroup(
            "group id 0 is reserved for unassigned slots".to_string(),
        ));
    }
    Ok(())
}

fn check_proxy(proxy: &Proxy) -> Result<()> {
    if !valid_token(&proxy.token) {
        return Err(TopologyError::InvalidProxy(format!(
            "token '{}' must be a non-empty path segment not starting with '.'",
            proxy.token
        )));
    }
    Ok(())
}

impl TopologyManager {
    // Mutators write through to the store and never touch the cache.

    pub async fn store_create_group(&self, group: &Group) -> Result<()> {
        check_group(group)?;
        event!(Level::DEBUG, gid = group.id, "store create group");
        self.store.create_group(group).await
    }

    pub async fn store_update_group(&self, group: &Group) -> Result<()> {
        check_group(group)?;
        event!(Level::DEBUG, gid = group.id, "store update group");
        self.store.update_group(group).await
    }

    pub async fn store_remove_group(&self, group: &Group) -> Result<()> {
        event!(Level::DEBUG, gid = group.id, "store remove group");
        self.store.delete_group(group.id).await
    }

    pub async fn store_create_proxy(&self, proxy: &Proxy) -> Result<()> {
        check_proxy(proxy)?;
        event!(Level::DEBUG, token = %proxy.token, "store create proxy");
        self.store.create_proxy(proxy).await
    }

    pub async fn store_update_proxy(&self, proxy: &Proxy) -> Result<()> {
        check_proxy(proxy)?;
        event!(Level::DEBUG, token = %proxy.token, "store update proxy");
        self.store.update_proxy(proxy).await
    }

    pub async fn store_remove_proxy(&self, proxy: &Proxy) -> Result<()> {
        event!(Level::DEBUG, token = %proxy.token, "store remove proxy");
        self.store.delete_proxy(&proxy.token).await
    }

    /// Slot mappings are only ever updated; the whole range always exists.
    pub async fn store_update_slot_mapping(&self, mapping: &SlotMapping) -> Result<()> {
        self.check_slot(mapping.id)?;
        event!(
            Level::DEBUG,
            sid = mapping.id,
            gid = mapping.group_id,
            action = %mapping.action.state,
            target = mapping.action.target_id,
            "store update slot mapping"
        );
        self.store.update_slot_mapping(mapping).await
    }

    /// Applies `writes` in order with the cache kept coherent.
    ///
    /// Every affected key is invalidated before the first write and again
    /// after the last one, also when a write fails part way. Writes are not
    /// transactional: those applied before a failure stay applied.
    pub async fn commit(&self, writes: Vec<TopologyWrite>) -> Result<()> {
        for write in &writes {
            match write {
                TopologyWrite::UpdateSlotMapping(mapping) => self.check_slot(mapping.id)?,
                TopologyWrite::CreateGroup(group) | TopologyWrite::UpdateGroup(group) => {
                    check_group(group)?
                }
                TopologyWrite::CreateProxy(proxy) | TopologyWrite::UpdateProxy(proxy) => {
                    check_proxy(proxy)?
                }
                _ => {}
            }
        }

        self.dirty_written(&writes)?;
        let mut outcome = Ok(());
        for (index, write) in writes.iter().enumerate() {
            if let Err(err) = self.apply(write).await {
                event!(
                    Level::ERROR,
                    index,
                    write = write.describe(),
                    error = %err,
                    "commit aborted"
                );
                outcome = Err(err);
                break;
            }
        }
        self.dirty_written(&writes)?;

        if outcome.is_ok() {
            event!(Level::DEBUG, writes = writes.len(), "commit applied");
        }
        outcome
    }

    async fn apply(&self, write: &TopologyWrite) -> Result<()> {
        match write {
            TopologyWrite::CreateGroup(group) => self.store_create_group(group).await,
            TopologyWrite::UpdateGroup(group) => self.store_update_group(group).await,
            TopologyWrite::RemoveGroup(group) => self.store_remove_group(group).await,
            TopologyWrite::CreateProxy(proxy) => self.store_create_proxy(proxy).await,
            TopologyWrite::UpdateProxy(proxy) => self.store_update_proxy(proxy).await,
            TopologyWrite::RemoveProxy(proxy) => self.store_remove_proxy(proxy).await,
            TopologyWrite::UpdateSlotMapping(mapping) => {
                self.store_update_slot_mapping(mapping).await
            }
        }
    }

    fn dirty_written(&self, writes: &[TopologyWrite]) -> Result<()> {
        for write in writes {
            match write {
                TopologyWrite::CreateGroup(group)
                | TopologyWrite::UpdateGroup(group)
                | TopologyWrite::RemoveGroup(group) => self.dirty_group_cache(group.id)?,
                TopologyWrite::CreateProxy(proxy)
                | TopologyWrite::UpdateProxy(proxy)
                | TopologyWrite::RemoveProxy(proxy) => self.dirty_proxy_cache(&proxy.token)?,
                TopologyWrite::UpdateSlotMapping(mapping) => self.dirty_slots_cache(mapping.id)?,
            }
        }
        Ok(())
    }
}
