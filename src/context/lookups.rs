impl Context {
    pub fn slot_mapping(&self, sid: u32) -> Result<&SlotMapping> {
        self.snapshot
            .slots
            .get(sid as usize)
            .ok_or(TopologyError::SlotMappingNotFound(sid))
    }

    /// All slot mappings, indexed by slot id.
    pub fn slot_mappings(&self) -> &[SlotMapping] {
        &self.snapshot.slots
    }

    pub fn group(&self, gid: u32) -> Result<&Group> {
        self.snapshot
            .groups
            .get(&gid)
            .ok_or(TopologyError::GroupNotFound(gid))
    }

    /// Groups ordered by id.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.snapshot.groups.values()
    }

    pub fn proxy(&self, token: &str) -> Result<&Proxy> {
        self.snapshot
            .proxies
            .get(token)
            .ok_or_else(|| TopologyError::ProxyNotFound(token.to_string()))
    }

    /// Proxies ordered by token.
    pub fn proxies(&self) -> impl Iterator<Item = &Proxy> {
        self.snapshot.proxies.values()
    }

    /// Highest proxy id, `0` without proxies.
    pub fn max_proxy_id(&self) -> u32 {
        self.proxies().map(|proxy| proxy.id).max().unwrap_or(0)
    }

    /// Address of the group's master, empty when the group has no servers.
    pub fn group_master(&self, gid: u32) -> Result<&str> {
        Ok(self.group(gid)?.master().unwrap_or_default())
    }

    /// `None` for the unassigned id `0`, not-found for any other missing id.
    fn referenced_group(&self, gid: u32) -> Result<Option<&Group>> {
        if gid == 0 {
            return Ok(None);
        }
        self.group(gid).map(Some)
    }
}
