use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registration record of a running proxy instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proxy {
    #[serde(default)]
    pub id: u32,
    pub token: String,
    #[serde(default)]
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub admin_addr: String,
    #[serde(default)]
    pub proxy_addr: String,
    #[serde(default)]
    pub proto_type: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub pid: u32,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub datacenter: String,
}

impl Proxy {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            start_time: Utc::now(),
            proto_type: "tcp4".to_string(),
            ..Self::default()
        }
    }
}
