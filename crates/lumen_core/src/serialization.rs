//! Lenient component (de)serialization.
//!
//! Persisted data is JSON. Loading never fails a whole document because of
//! one bad node: a null or absent node, or one that does not parse, is
//! logged and replaced with the type's default. [`lenient_field`] applies
//! the same rule to a single struct field.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("failed to serialize {domain}")]
    Encode {
        domain: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Serialize a value into a document node.
pub fn serialize_node<T: Serialize>(
    domain: &'static str,
    value: &T,
) -> Result<Value, SerializationError> {
    serde_json::to_value(value).map_err(|source| SerializationError::Encode { domain, source })
}

/// Deserialize a document node, falling back to `T::default()`.
pub fn deserialize_node<T>(domain: &str, node: Option<&Value>) -> T
where
    T: DeserializeOwned + Default,
{
    match node {
        None | Some(Value::Null) => {
            warn!(domain, "element is null, using defaults");
            T::default()
        }
        Some(value) => T::deserialize(value).unwrap_or_else(|error| {
            warn!(domain, %error, "malformed element, using defaults");
            T::default()
        }),
    }
}

/// `deserialize_with` helper: a field that does not parse is logged and
/// replaced with its default, leaving its sibling fields intact.
pub fn lenient_field<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(&value).unwrap_or_else(|error| {
        warn!(%error, "malformed field, using defaults");
        T::default()
    }))
}

/// Parse a whole JSON document and deserialize it leniently.
pub fn deserialize_str<T>(domain: &str, text: &str) -> T
where
    T: DeserializeOwned + Default,
{
    match serde_json::from_str::<Value>(text) {
        Ok(value) => deserialize_node(domain, Some(&value)),
        Err(error) => {
            warn!(domain, %error, "unparsable document, using defaults");
            T::default()
        }
    }
}
