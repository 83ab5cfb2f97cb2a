use crate::core::{Result, TopologyError};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Encodes a model as pretty JSON, the on-store representation.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(value)
        .map_err(|err| TopologyError::CodecError(format!("encode: {}", err)))
}

/// Decodes a model stored at `path`.
pub fn decode<T: DeserializeOwned>(path: &str, data: &[u8]) -> Result<T> {
    serde_json::from_slice(data)
        .map_err(|err| TopologyError::CodecError(format!("decode '{}': {}", path, err)))
}
