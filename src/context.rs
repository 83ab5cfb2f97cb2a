use crate::core::{Result, TopologyError};
use crate::models::{Group, Proxy, Slot, SlotActionState, SlotMapping};
use crate::resolver::resolve_slot;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

#[derive(Debug)]
struct Snapshot {
    slots: Vec<SlotMapping>,
    groups: BTreeMap<u32, Group>,
    proxies: BTreeMap<String, Proxy>,
}

/// Point-in-time view of every slot mapping, group and proxy.
///
/// Never changes once built; clones share the same snapshot. Everything
/// derived from a context, slot resolution included, uses only its contents.
#[derive(Debug, Clone)]
pub struct Context {
    snapshot: Arc<Snapshot>,
}

impl Context {
    /// Assembles a context. `slots[i]` must be the mapping of slot `i`.
    pub fn new(
        slots: Vec<SlotMapping>,
        groups: BTreeMap<u32, Group>,
        proxies: BTreeMap<String, Proxy>,
    ) -> Result<Self> {
        for (index, mapping) in slots.iter().enumerate() {
            if mapping.id as usize != index {
                return Err(TopologyError::InvalidSlotMapping(format!(
                    "slot at position {} has id {}",
                    index, mapping.id
                )));
            }
        }
        Ok(Self {
            snapshot: Arc::new(Snapshot {
                slots,
                groups,
                proxies,
            }),
        })
    }

    pub fn max_slot_num(&self) -> u32 {
        self.snapshot.slots.len() as u32
    }
}

// Context queries are split by the entity they answer about.
include!("context/lookups.rs");
include!("context/groups.rs");
include!("context/slots.rs");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PromotionState;

    fn context() -> Context {
        let mut slots: Vec<SlotMapping> = (0..8).map(SlotMapping::new).collect();
        slots[0] = SlotMapping::new(0).owned_by(1);
        slots[1] = SlotMapping::new(1).owned_by(1);
        slots[2] = SlotMapping::new(2)
            .owned_by(1)
            .migrating_to(2, SlotActionState::Migrating);
        slots[2].action.index = 4;
        slots[3] = SlotMapping::new(3).owned_by(2);

        let mut groups = BTreeMap::new();
        groups.insert(1, Group::new(1).with_server("s1:6379").with_server("s1r:6379"));
        groups.insert(
            2,
            Group::new(2)
                .with_server("s2:6379")
                .with_promotion(PromotionState::Preparing),
        );
        groups.insert(3, Group::new(3));

        let mut proxies = BTreeMap::new();
        let mut proxy = Proxy::new("tok-a");
        proxy.id = 3;
        proxies.insert(proxy.token.clone(), proxy);
        let mut proxy = Proxy::new("tok-b");
        proxy.id = 9;
        proxies.insert(proxy.token.clone(), proxy);

        Context::new(slots, groups, proxies).unwrap()
    }

    #[test]
    fn test_new_rejects_misplaced_slots() {
        let slots = vec![SlotMapping::new(0), SlotMapping::new(2)];
        assert!(matches!(
            Context::new(slots, BTreeMap::new(), BTreeMap::new()),
            Err(TopologyError::InvalidSlotMapping(_))
        ));
    }

    #[test]
    fn test_lookups_surface_not_found() {
        let ctx = context();
        assert_eq!(ctx.max_slot_num(), 8);
        assert_eq!(ctx.slot_mapping(3).unwrap().group_id, 2);
        assert!(matches!(
            ctx.slot_mapping(8),
            Err(TopologyError::SlotMappingNotFound(8))
        ));
        assert!(matches!(ctx.group(4), Err(TopologyError::GroupNotFound(4))));
        assert!(ctx.proxy("tok-z").unwrap_err().is_not_found());
        assert_eq!(ctx.proxy("tok-a").unwrap().id, 3);
    }

    #[test]
    fn test_group_master() {
        let ctx = context();
        assert_eq!(ctx.group_master(1).unwrap(), "s1:6379");
        assert_eq!(ctx.group_master(3).unwrap(), "");
        assert!(ctx.group_master(4).is_err());

        let masters = ctx.group_masters();
        assert_eq!(masters.get(&2).map(String::as_str), Some("s2:6379"));
        assert!(!masters.contains_key(&3));
    }

    #[test]
    fn test_group_queries() {
        let ctx = context();
        assert_eq!(ctx.group_ids(), BTreeSet::from([1, 2, 3]));
        assert!(ctx.is_group_in_use(1));
        assert!(ctx.is_group_in_use(2));
        assert!(!ctx.is_group_in_use(3));
        assert!(ctx.is_group_promoting(2));
        assert!(!ctx.is_group_locked(2));
        assert!(!ctx.is_group_locked(99));

        let (group, index) = ctx.group_by_server("s1r:6379").unwrap();
        assert_eq!((group.id, index), (1, 1));
        assert!(matches!(
            ctx.group_by_server("nowhere:1"),
            Err(TopologyError::ServerNotFound(_))
        ));
    }

    #[test]
    fn test_slot_queries() {
        let ctx = context();
        let owned: Vec<u32> = ctx.slot_mappings_by_group(1).iter().map(|m| m.id).collect();
        assert_eq!(owned, vec![0, 1, 2]);
        assert_eq!(ctx.max_slot_action_index(), 4);
        assert_eq!(ctx.max_proxy_id(), 9);

        let slots = ctx.all_slots().unwrap();
        assert_eq!(slots.len(), 8);
        assert_eq!(slots[0], Slot::routed(0, "s1:6379", ""));
        assert_eq!(slots[2], Slot::routed(2, "s2:6379", "s1:6379"));
        assert_eq!(slots[5], Slot::routed(5, "", ""));
    }

    #[test]
    fn test_to_slot_requires_referenced_groups() {
        let ctx = context();
        let dangling = SlotMapping::new(0).owned_by(7);
        assert!(matches!(
            ctx.to_slot(&dangling),
            Err(TopologyError::GroupNotFound(7))
        ));

        let no_target = SlotMapping::new(0)
            .owned_by(1)
            .migrating_to(0, SlotActionState::Finished);
        assert!(matches!(
            ctx.to_slot(&no_target),
            Err(TopologyError::InvalidSlotMapping(_))
        ));

        let no_source = SlotMapping::new(0).migrating_to(2, SlotActionState::Migrating);
        assert!(matches!(
            ctx.to_slot(&no_source),
            Err(TopologyError::InvalidSlotMapping(_))
        ));
    }

    #[test]
    fn test_stale_target_fails_in_every_state() {
        let ctx = context();
        for state in [SlotActionState::Nothing, SlotActionState::Prepared] {
            let stale = SlotMapping::new(1).owned_by(1).migrating_to(7, state);
            assert!(matches!(
                ctx.to_slot(&stale),
                Err(TopologyError::GroupNotFound(7))
            ));
        }
    }

    #[test]
    fn test_prepared_slot_locks_even_without_target() {
        let ctx = context();
        let mapping = SlotMapping::new(1)
            .owned_by(1)
            .migrating_to(0, SlotActionState::Prepared);
        assert!(ctx.is_slot_locked(&mapping).unwrap());
    }
}
