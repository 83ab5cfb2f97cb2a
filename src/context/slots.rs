impl Context {
    /// Resolves a mapping into its routable slot using this context's groups.
    ///
    /// Any non-zero group id the mapping references must be in the context.
    /// A moving slot (`Migrating`, `Finished`) needs a target, and a
    /// `Migrating` slot also needs a source.
    ///
    /// The reference check covers `action.target_id` in every state, including
    /// states whose routing never reads the target: a stale target left on a
    /// `Nothing` or `Prepared` mapping after its group was removed still fails
    /// with `GroupNotFound`. Clear the action when removing a target group.
    pub fn to_slot(&self, mapping: &SlotMapping) -> Result<Slot> {
        let source = self.referenced_group(mapping.group_id)?;
        let target = self.referenced_group(mapping.action.target_id)?;
        let state = mapping.action.state;

        if state.uses_target() && target.is_none() {
            return Err(TopologyError::InvalidSlotMapping(format!(
                "slot {} is {} without a target group",
                mapping.id, state
            )));
        }
        if state == SlotActionState::Migrating && source.is_none() {
            return Err(TopologyError::InvalidSlotMapping(format!(
                "slot {} is migrating without a source group",
                mapping.id
            )));
        }
        Ok(resolve_slot(mapping, source, target))
    }

    pub fn to_slots<'a>(
        &self,
        mappings: impl IntoIterator<Item = &'a SlotMapping>,
    ) -> Result<Vec<Slot>> {
        mappings.into_iter().map(|m| self.to_slot(m)).collect()
    }

    /// Routable view of every slot, indexed by slot id.
    pub fn all_slots(&self) -> Result<Vec<Slot>> {
        self.to_slots(self.slot_mappings())
    }

    pub fn is_slot_locked(&self, mapping: &SlotMapping) -> Result<bool> {
        Ok(self.to_slot(mapping)?.locked)
    }

    /// Slots currently owned by `gid`.
    pub fn slot_mappings_by_group(&self, gid: u32) -> Vec<&SlotMapping> {
        self.slot_mappings()
            .iter()
            .filter(|m| m.group_id == gid)
            .collect()
    }

    /// Highest action index among slots with a pending or running action.
    pub fn max_slot_action_index(&self) -> u32 {
        self.slot_mappings()
            .iter()
            .filter(|m| m.action.state != SlotActionState::Nothing)
            .map(|m| m.action.index)
            .max()
            .unwrap_or(0)
    }
}
