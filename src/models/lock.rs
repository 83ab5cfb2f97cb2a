use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ownership record written by the manager instance in charge of a product.
///
/// Only one instance may hold it; the store's create-if-absent semantics
/// provide the exclusion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyLock {
    pub token: String,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub admin_addr: String,
    pub product_name: String,
    #[serde(default)]
    pub pid: u32,
    #[serde(default)]
    pub hostname: String,
}

impl TopologyLock {
    /// Describes the current process as a lock holder with a fresh token.
    pub fn new(product_name: impl Into<String>, admin_addr: impl Into<String>) -> Self {
        Self {
            token: Uuid::new_v4().to_string(),
            start_time: Utc::now(),
            admin_addr: admin_addr.into(),
            product_name: product_name.into(),
            pid: std::process::id(),
            hostname: std::env::var("HOSTNAME").unwrap_or_default(),
        }
    }
}
