impl Context {
    pub fn group_ids(&self) -> BTreeSet<u32> {
        self.snapshot.groups.keys().copied().collect()
    }

    /// Master address of every group that has at least one server.
    pub fn group_masters(&self) -> BTreeMap<u32, String> {
        self.groups()
            .filter_map(|group| group.master().map(|addr| (group.id, addr.to_string())))
            .collect()
    }

    /// Position of `addr` in the group's election order.
    pub fn group_index(&self, group: &Group, addr: &str) -> Result<usize> {
        group
            .server_index(addr)
            .ok_or_else(|| TopologyError::ServerNotFound(addr.to_string()))
    }

    /// The group that contains `addr`, with the server's position in it.
    pub fn group_by_server(&self, addr: &str) -> Result<(&Group, usize)> {
        self.groups()
            .find_map(|group| group.server_index(addr).map(|index| (group, index)))
            .ok_or_else(|| TopologyError::ServerNotFound(addr.to_string()))
    }

    /// True if any slot is owned by, or migrating to, the group.
    pub fn is_group_in_use(&self, gid: u32) -> bool {
        gid != 0
            && self
                .slot_mappings()
                .iter()
                .any(|m| m.group_id == gid || m.action.target_id == gid)
    }

    pub fn is_group_locked(&self, gid: u32) -> bool {
        self.snapshot.groups.get(&gid).is_some_and(Group::is_locked)
    }

    pub fn is_group_promoting(&self, gid: u32) -> bool {
        self.snapshot
            .groups
            .get(&gid)
            .is_some_and(Group::is_promoting)
    }
}
