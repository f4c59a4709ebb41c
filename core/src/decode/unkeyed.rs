use serde_json::Value;

use super::{decode_value, CodingPath, Decode, DecodeTarget};
use crate::error::DecodeError;

/// Positional access into a JSON array.
#[derive(Debug, Clone)]
pub struct UnkeyedContainer<'a> {
    items: &'a [Value],
    path: CodingPath,
}

impl<'a> UnkeyedContainer<'a> {
    pub fn new(value: &'a Value, path: &CodingPath) -> Result<Self, DecodeError> {
        match value {
            Value::Array(items) => Ok(Self {
                items,
                path: path.clone(),
            }),
            other => Err(path.mismatch("array", other)),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Decode every element in order. Stops at the first element that fails;
    /// its index is part of the error path.
    pub fn decode_all<T: Decode>(&self) -> Result<Vec<T>, DecodeError> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| decode_value(item, &self.path.index(index)))
            .collect()
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn target() -> DecodeTarget {
        DecodeTarget::Unkeyed
    }

    fn decode(value: &Value, path: &CodingPath) -> Result<Self, DecodeError> {
        UnkeyedContainer::new(value, path)?.decode_all()
    }
}
