//! Derivation of a routable slot from its mapping and the groups it touches.
//!
//! A slot is locked whenever a group whose master address would be handed
//! out for it is `Prepared` for promotion, and unconditionally while the slot
//! itself is `Prepared` for migration. `migrate_from` is only set during an
//! unlocked migration, telling the proxy to fall back to the source backend
//! for keys that have not moved yet.

use crate::models::{Group, Slot, SlotActionState, SlotMapping};

fn is_locked(group: Option<&Group>) -> bool {
    group.is_some_and(Group::is_locked)
}

fn master_of(group: Option<&Group>) -> String {
    group.and_then(Group::master).unwrap_or_default().to_string()
}

/// Resolves `mapping` against its owning group (`source`) and migration
/// target (`target`). A missing group has no master and never locks.
pub fn resolve_slot(mapping: &SlotMapping, source: Option<&Group>, target: Option<&Group>) -> Slot {
    let id = mapping.id;
    match mapping.action.state {
        SlotActionState::Prepared => Slot::locked(id),
        SlotActionState::Migrating => {
            if is_locked(source) || is_locked(target) {
                Slot::locked(id)
            } else {
                Slot::routed(id, master_of(target), master_of(source))
            }
        }
        SlotActionState::Finished => {
            if is_locked(target) {
                Slot::locked(id)
            } else {
                Slot::routed(id, master_of(target), "")
            }
        }
        SlotActionState::Nothing | SlotActionState::Pending | SlotActionState::Preparing => {
            if is_locked(source) {
                Slot::locked(id)
            } else {
                Slot::routed(id, master_of(source), "")
            }
        }
    }
}
