use serde::{Deserialize, Serialize};
use std::fmt;

/// Migration state of a single slot.
///
/// `Nothing`, `Pending` and `Preparing` all route to the current owner.
/// `Prepared` is the handshake point before keys move and always locks the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SlotActionState {
    #[default]
    #[serde(rename = "")]
    Nothing,
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "preparing")]
    Preparing,
    #[serde(rename = "prepared")]
    Prepared,
    #[serde(rename = "migrating")]
    Migrating,
    #[serde(rename = "finished")]
    Finished,
}

impl SlotActionState {
    /// Every state in migration order.
    pub const ALL: [SlotActionState; 6] = [
        SlotActionState::Nothing,
        SlotActionState::Pending,
        SlotActionState::Preparing,
        SlotActionState::Prepared,
        SlotActionState::Migrating,
        SlotActionState::Finished,
    ];

    /// Returns the wire name of the state (empty for `Nothing`).
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotActionState::Nothing => "",
            SlotActionState::Pending => "pending",
            SlotActionState::Preparing => "preparing",
            SlotActionState::Prepared => "prepared",
            SlotActionState::Migrating => "migrating",
            SlotActionState::Finished => "finished",
        }
    }

    /// True once keys may live on the target group.
    pub fn uses_target(&self) -> bool {
        matches!(self, SlotActionState::Migrating | SlotActionState::Finished)
    }
}

impl fmt::Display for SlotActionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotActionState::Nothing => write!(f, "nothing"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// Master promotion state of a group.
///
/// Only `Prepared` locks: it is the window in which the old master is being
/// replaced and its address must not be handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PromotionState {
    #[default]
    #[serde(rename = "")]
    Nothing,
    #[serde(rename = "preparing")]
    Preparing,
    #[serde(rename = "prepared")]
    Prepared,
    #[serde(rename = "finished")]
    Finished,
}

impl PromotionState {
    /// Every state in promotion order.
    pub const ALL: [PromotionState; 4] = [
        PromotionState::Nothing,
        PromotionState::Preparing,
        PromotionState::Prepared,
        PromotionState::Finished,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PromotionState::Nothing => "",
            PromotionState::Preparing => "preparing",
            PromotionState::Prepared => "prepared",
            PromotionState::Finished => "finished",
        }
    }

    pub fn is_locking(&self) -> bool {
        matches!(self, PromotionState::Prepared)
    }
}

impl fmt::Display for PromotionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromotionState::Nothing => write!(f, "nothing"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}
