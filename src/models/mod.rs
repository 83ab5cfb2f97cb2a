pub mod action;
pub mod codec;
pub mod group;
pub mod lock;
pub mod proxy;
pub mod slots;

pub use action::{PromotionState, SlotActionState};
pub use group::{Group, GroupPromoting, GroupServer};
pub use lock::TopologyLock;
pub use proxy::Proxy;
pub use slots::{Slot, SlotAction, SlotMapping};
