//! Batch input validation
//!
//! A batch is a JSON array of `{"id": [u8, ...], "value": <any>}` objects.
//! Shape is checked for the whole batch before anything is applied.

use crate::{Error, Result};
use serde_json::Value;

/// One validated `{id, value}` pair
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchEntry {
    pub id: Vec<u8>,
    /// Bytes that get digested as the entry's value
    pub value: Vec<u8>,
}

impl BatchEntry {
    pub fn new(id: impl Into<Vec<u8>>, value: impl AsRef<[u8]>) -> Self {
        BatchEntry {
            id: id.into(),
            value: value.as_ref().to_vec(),
        }
    }
}

/// Bytes a JSON value is digested as: strings by their UTF-8 content,
/// everything else by its compact JSON text (`null` → `"null"`).
pub fn value_bytes(value: &Value) -> Vec<u8> {
    match value {
        Value::String(s) => s.as_bytes().to_vec(),
        other => other.to_string().into_bytes(),
    }
}

/// Validate a JSON batch and convert it to entries
pub fn parse_batch(batch: &Value) -> Result<Vec<BatchEntry>> {
    let items = batch
        .as_array()
        .ok_or_else(|| Error::Validation("Parameter must be an array".into()))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_entry(index, item))
        .collect()
}

fn parse_entry(index: usize, item: &Value) -> Result<BatchEntry> {
    let (id, value) = match item.as_object() {
        Some(obj) => match (obj.get("id"), obj.get("value")) {
            (Some(id), Some(value)) => (id, value),
            _ => {
                return Err(Error::Validation(format!(
                    "Element {} must have 'id' and 'value' properties",
                    index
                )))
            }
        },
        None => {
            return Err(Error::Validation(format!(
                "Element {} must be an object",
                index
            )))
        }
    };

    let id = id
        .as_array()
        .ok_or_else(|| Error::Validation(format!("Element {} 'id' must be an array", index)))?
        .iter()
        .map(|byte| {
            byte.as_u64()
                .and_then(|b| u8::try_from(b).ok())
                .ok_or_else(|| {
                    Error::Validation(format!(
                        "Element {} 'id' must only contain bytes (0-255), got {}",
                        index, byte
                    ))
                })
        })
        .collect::<Result<Vec<u8>>>()?;

    Ok(BatchEntry {
        id,
        value: value_bytes(value),
    })
}
