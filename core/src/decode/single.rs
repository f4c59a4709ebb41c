//! Single-value strategy: scalars decoded directly, no surrounding structure.

use serde_json::Value;

use super::{decode_value, CodingPath, Decode, DecodeTarget};
use crate::error::DecodeError;

impl Decode for String {
    fn target() -> DecodeTarget {
        DecodeTarget::SingleValue
    }

    fn decode(value: &Value, path: &CodingPath) -> Result<Self, DecodeError> {
        value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| path.mismatch("string", value))
    }
}

impl Decode for bool {
    fn target() -> DecodeTarget {
        DecodeTarget::SingleValue
    }

    fn decode(value: &Value, path: &CodingPath) -> Result<Self, DecodeError> {
        value.as_bool().ok_or_else(|| path.mismatch("boolean", value))
    }
}

impl Decode for f64 {
    fn target() -> DecodeTarget {
        DecodeTarget::SingleValue
    }

    fn decode(value: &Value, path: &CodingPath) -> Result<Self, DecodeError> {
        value.as_f64().ok_or_else(|| path.mismatch("number", value))
    }
}

// Fractional or out-of-range numbers are mismatches, not truncations.
macro_rules! decode_integer {
    ($($ty:ty => $read:ident),* $(,)?) => {
        $(
            impl Decode for $ty {
                fn target() -> DecodeTarget {
                    DecodeTarget::SingleValue
                }

                fn decode(value: &Value, path: &CodingPath) -> Result<Self, DecodeError> {
                    value
                        .$read()
                        .and_then(|n| <$ty>::try_from(n).ok())
                        .ok_or_else(|| path.mismatch(stringify!($ty), value))
                }
            }
        )*
    };
}

decode_integer!(i64 => as_i64, u64 => as_u64, i32 => as_i64, u32 => as_u64);

impl<T: Decode> Decode for Option<T> {
    fn target() -> DecodeTarget {
        DecodeTarget::Optional(Box::new(T::target()))
    }

    fn decode(value: &Value, path: &CodingPath) -> Result<Self, DecodeError> {
        if value.is_null() {
            return Ok(None);
        }
        decode_value(value, path).map(Some)
    }
}
