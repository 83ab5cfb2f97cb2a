pub mod client;
pub mod fs;
pub mod memory;
pub mod paths;
pub mod topology;

pub use client::StoreClient;
pub use fs::FsClient;
pub use memory::MemoryClient;
pub use paths::TopologyPaths;
pub use topology::TopologyStore;
