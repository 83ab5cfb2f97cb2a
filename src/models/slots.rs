use super::SlotActionState;
use serde::{Deserialize, Serialize};

/// Pending or in-flight migration of a slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAction {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub state: SlotActionState,
    #[serde(default)]
    pub target_id: u32,
}

/// Ownership record of one hash slot.
///
/// `group_id == 0` means the slot is not assigned to any group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotMapping {
    pub id: u32,
    #[serde(default)]
    pub group_id: u32,
    #[serde(default)]
    pub action: SlotAction,
}

impl SlotMapping {
    /// Creates an unassigned mapping, equivalent to a slot never written to the store.
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Sets the owning group.
    pub fn owned_by(mut self, group_id: u32) -> Self {
        self.group_id = group_id;
        self
    }

    /// Sets the migration target and state.
    pub fn migrating_to(mut self, target_id: u32, state: SlotActionState) -> Self {
        self.action.target_id = target_id;
        self.action.state = state;
        self
    }

    pub fn is_assigned(&self) -> bool {
        self.group_id != 0
    }
}

/// Routable view of a slot derived from a context.
///
/// Locked slots carry no addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: u32,
    pub locked: bool,
    #[serde(default)]
    pub backend_addr: String,
    #[serde(default)]
    pub migrate_from: String,
}

impl Slot {
    pub fn locked(id: u32) -> Self {
        Self {
            id,
            locked: true,
            ..Self::default()
        }
    }

    pub fn routed(id: u32, backend_addr: impl Into<String>, migrate_from: impl Into<String>) -> Self {
        Self {
            id,
            locked: false,
            backend_addr: backend_addr.into(),
            migrate_from: migrate_from.into(),
        }
    }
}
