//! Decoder pipeline: raw bytes to typed values.
//!
//! # Design
//! Every decodable type names the JSON shape it expects through
//! `Decode::target`. `decode_value` checks the value against that shape
//! before handing it to the type's own `decode`, so each impl only deals
//! with a value of the right kind. There are four container strategies:
//!
//! - keyed: fixed-name fields of an object (`KeyedContainer`)
//! - unkeyed: positional array elements (`UnkeyedContainer`, `Vec<T>`)
//! - single value: bare scalars (`String`, numbers, `bool`)
//! - dynamic-keyed: pattern-named fields of an object (`DynamicKeys`)
//!
//! Decoding reads from a borrowed `serde_json::Value` and builds the result
//! from owned data, so a failure leaves nothing half-built behind and the
//! result never points back into the payload.

mod dynamic;
mod keyed;
mod path;
mod single;
mod unkeyed;

use std::fmt;

use serde_json::Value;

pub use dynamic::{DynamicEntry, DynamicKeys, InvalidEntry};
pub use keyed::KeyedContainer;
pub use path::CodingPath;
pub use unkeyed::UnkeyedContainer;

use crate::error::DecodeError;
use crate::resolver::KeyPattern;

/// Shape a decodable type expects its JSON value to have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeTarget {
    Keyed,
    Unkeyed,
    SingleValue,
    /// An object whose relevant fields are discovered by pattern.
    DynamicKeyed(KeyPattern),
    /// The inner shape, or `null`.
    Optional(Box<DecodeTarget>),
}

impl DecodeTarget {
    /// Name of the JSON kind this target accepts, as used in errors.
    pub fn expected(&self) -> &'static str {
        match self {
            DecodeTarget::Keyed | DecodeTarget::DynamicKeyed(_) => "object",
            DecodeTarget::Unkeyed => "array",
            DecodeTarget::SingleValue => "scalar",
            DecodeTarget::Optional(inner) => inner.expected(),
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            DecodeTarget::Keyed | DecodeTarget::DynamicKeyed(_) => value.is_object(),
            DecodeTarget::Unkeyed => value.is_array(),
            DecodeTarget::SingleValue => !value.is_object() && !value.is_array(),
            DecodeTarget::Optional(inner) => value.is_null() || inner.accepts(value),
        }
    }

    /// Verify that `value` has this target's shape.
    pub fn check(&self, value: &Value, path: &CodingPath) -> Result<(), DecodeError> {
        if self.accepts(value) {
            Ok(())
        } else {
            Err(path.mismatch(self.expected(), value))
        }
    }
}

impl fmt::Display for DecodeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeTarget::Keyed => f.write_str("keyed object"),
            DecodeTarget::Unkeyed => f.write_str("array"),
            DecodeTarget::SingleValue => f.write_str("single value"),
            DecodeTarget::DynamicKeyed(pattern) => {
                write!(f, "object with `{}<N>` keys", pattern.as_prefix())
            }
            DecodeTarget::Optional(inner) => write!(f, "optional {inner}"),
        }
    }
}

/// A type that can be read from a JSON value.
pub trait Decode: Sized {
    /// Shape this type expects. Checked by `decode_value` before `decode`.
    fn target() -> DecodeTarget;

    /// Build `Self` from a value already known to match `target()`.
    ///
    /// Call `decode_value` rather than this directly when decoding nested
    /// values, so the shape check runs.
    fn decode(value: &Value, path: &CodingPath) -> Result<Self, DecodeError>;
}

/// Shape-check `value` against `T::target()` and decode it.
pub fn decode_value<T: Decode>(value: &Value, path: &CodingPath) -> Result<T, DecodeError> {
    T::target().check(value, path)?;
    T::decode(value, path)
}

/// Parse a raw payload into a JSON value.
pub fn parse(bytes: &[u8]) -> Result<Value, DecodeError> {
    serde_json::from_slice(bytes).map_err(|e| DecodeError::MalformedPayload(e.to_string()))
}

/// Parse and decode a raw payload.
pub fn decode_slice<T: Decode>(bytes: &[u8]) -> Result<T, DecodeError> {
    let value = parse(bytes)?;
    decode_value(&value, &CodingPath::root())
}

/// JSON kind of `value`, as named in `DecodeError::TypeMismatch`.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
