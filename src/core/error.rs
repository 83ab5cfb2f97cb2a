use thiserror::Error;

#[derive(Error, Debug)]
pub enum TopologyError {
    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Node '{0}' already exists")]
    NodeExists(String),

    #[error("Store client is closed")]
    ClientClosed,

    #[error("Slot mapping {0} not found")]
    SlotMappingNotFound(u32),

    #[error("Slot {0} is out of range for max_slot_num {1}")]
    SlotOutOfRange(u32, u32),

    #[error("Group {0} not found")]
    GroupNotFound(u32),

    #[error("Proxy '{0}' not found")]
    ProxyNotFound(String),

    #[error("Server '{0}' not found")]
    ServerNotFound(String),

    #[error("Invalid group: {0}")]
    InvalidGroup(String),

    #[error("Invalid proxy: {0}")]
    InvalidProxy(String),

    #[error("Invalid slot mapping: {0}")]
    InvalidSlotMapping(String),

    #[error("Codec error: {0}")]
    CodecError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Lock error: {0}")]
    LockError(String),

    #[error("I/O error: {0}")]
    IoError(String),
}

impl TopologyError {
    /// True for lookups of an entity absent from a built context.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::SlotMappingNotFound(_)
                | Self::GroupNotFound(_)
                | Self::ProxyNotFound(_)
                | Self::ServerNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TopologyError>;

impl<T> From<std::sync::PoisonError<T>> for TopologyError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::LockError(err.to_string())
    }
}

impl From<std::io::Error> for TopologyError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}
