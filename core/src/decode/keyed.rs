use serde_json::{Map, Value};

use super::{decode_value, CodingPath, Decode};
use crate::error::DecodeError;

/// Field access into a JSON object by fixed key names.
#[derive(Debug, Clone)]
pub struct KeyedContainer<'a> {
    map: &'a Map<String, Value>,
    path: CodingPath,
}

impl<'a> KeyedContainer<'a> {
    pub fn new(value: &'a Value, path: &CodingPath) -> Result<Self, DecodeError> {
        match value {
            Value::Object(map) => Ok(Self {
                map,
                path: path.clone(),
            }),
            other => Err(path.mismatch("object", other)),
        }
    }

    pub fn path(&self) -> &CodingPath {
        &self.path
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.map.keys().map(String::as_str)
    }

    pub(crate) fn raw(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key)
    }

    /// Decode the value at `key`, failing with `MissingKey` if it is absent.
    pub fn required<T: Decode>(&self, key: &str) -> Result<T, DecodeError> {
        let value = self.map.get(key).ok_or_else(|| self.path.missing(key))?;
        decode_value(value, &self.path.key(key))
    }

    /// Decode the value at `key`; absent or `null` yields `None`.
    pub fn optional<T: Decode>(&self, key: &str) -> Result<Option<T>, DecodeError> {
        match self.map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => decode_value(value, &self.path.key(key)).map(Some),
        }
    }
}
