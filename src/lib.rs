// ============================================================================
// slotkeeper Library
// ============================================================================
//
// Topology core of a sharded key-value proxy layer: slot ownership, group
// promotion and migration state, cached consistent snapshots and routable
// slot resolution on top of a path-addressed coordination store.

pub mod cache;
pub mod context;
pub mod core;
pub mod manager;
pub mod models;
pub mod resolver;
pub mod storage;

// Re-export main types for convenience
pub use context::Context;
pub use core::{Result, TopologyError};
pub use manager::{TopologyConfig, TopologyManager, TopologyWrite};
pub use models::{
    Group, GroupPromoting, GroupServer, PromotionState, Proxy, Slot, SlotAction,
    SlotActionState, SlotMapping, TopologyLock,
};
pub use resolver::resolve_slot;
pub use storage::{FsClient, MemoryClient, StoreClient, TopologyPaths, TopologyStore};
