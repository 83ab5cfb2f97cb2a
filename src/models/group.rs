use super::PromotionState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupServer {
    pub addr: String,
    #[serde(default)]
    pub datacenter: String,
}

impl GroupServer {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            datacenter: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPromoting {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub state: PromotionState,
}

/// A replica set that can own slots.
///
/// Server order is the election order: the first server is the master.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: u32,
    #[serde(default)]
    pub servers: Vec<GroupServer>,
    #[serde(default)]
    pub promoting: GroupPromoting,
    #[serde(default)]
    pub out_of_sync: bool,
}

impl Group {
    /// Creates an empty group with no servers.
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Appends a server, keeping election order.
    pub fn with_server(mut self, addr: impl Into<String>) -> Self {
        self.servers.push(GroupServer::new(addr));
        self
    }

    pub fn with_promotion(mut self, state: PromotionState) -> Self {
        self.promoting.state = state;
        self
    }

    /// Address of the current master, if the group has any server.
    pub fn master(&self) -> Option<&str> {
        self.servers.first().map(|server| server.addr.as_str())
    }

    /// Position of `addr` in the election order.
    pub fn server_index(&self, addr: &str) -> Option<usize> {
        self.servers.iter().position(|server| server.addr == addr)
    }

    pub fn is_locked(&self) -> bool {
        self.promoting.state.is_locking()
    }

    pub fn is_promoting(&self) -> bool {
        self.promoting.state != PromotionState::Nothing
    }
}
