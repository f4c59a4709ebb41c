//! Dynamic-keyed strategy.
//!
//! Decodes every field of an object whose name matches a `KeyPattern`, in
//! the order given by `resolve_keys`. Fields outside the pattern are ignored.
//! What happens to blank or undecodable matching entries is an explicit
//! policy on `DynamicKeys`; by default a bad entry fails the whole decode.

use serde_json::Value;

use super::{decode_value, Decode, KeyedContainer};
use crate::error::DecodeError;
use crate::resolver::{resolve_keys, KeyPattern};

/// What to do with a matching entry whose value fails to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InvalidEntry {
    /// Fail the whole decode with the entry's error.
    #[default]
    Abort,
    /// Log the entry and leave it out.
    Skip,
}

/// One decoded entry of a dynamic key family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicEntry<T> {
    pub key: String,
    pub suffix: Option<u64>,
    pub value: T,
}

/// Description of a dynamic key family and how to read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicKeys {
    pattern: KeyPattern,
    discard_blank: bool,
    on_invalid: InvalidEntry,
}

impl DynamicKeys {
    pub fn new(pattern: KeyPattern) -> Self {
        Self {
            pattern,
            discard_blank: false,
            on_invalid: InvalidEntry::Abort,
        }
    }

    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self::new(KeyPattern::prefix(prefix))
    }

    /// Treat `null` and whitespace-only strings as gaps rather than values.
    pub fn discard_blank(mut self) -> Self {
        self.discard_blank = true;
        self
    }

    /// Leave out entries that fail to decode instead of aborting.
    pub fn skip_invalid(mut self) -> Self {
        self.on_invalid = InvalidEntry::Skip;
        self
    }

    pub fn pattern(&self) -> &KeyPattern {
        &self.pattern
    }

    pub fn decode<T: Decode>(
        &self,
        container: &KeyedContainer<'_>,
    ) -> Result<Vec<DynamicEntry<T>>, DecodeError> {
        let mut entries = Vec::new();
        for resolved in resolve_keys(container.keys(), &self.pattern) {
            let Some(value) = container.raw(resolved.key) else {
                continue;
            };
            if self.discard_blank && is_blank(value) {
                tracing::trace!(key = resolved.key, "discarding blank dynamic entry");
                continue;
            }
            match decode_value::<T>(value, &container.path().key(resolved.key)) {
                Ok(decoded) => entries.push(DynamicEntry {
                    key: resolved.key.to_string(),
                    suffix: resolved.suffix,
                    value: decoded,
                }),
                Err(err) if self.on_invalid == InvalidEntry::Skip => {
                    tracing::warn!(key = resolved.key, error = %err, "skipping undecodable dynamic entry");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(entries)
    }

    /// Like `decode`, keeping only the values.
    pub fn decode_values<T: Decode>(
        &self,
        container: &KeyedContainer<'_>,
    ) -> Result<Vec<T>, DecodeError> {
        Ok(self
            .decode(container)?
            .into_iter()
            .map(|entry| entry.value)
            .collect())
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::decode::CodingPath;

    fn ingredients() -> DynamicKeys {
        DynamicKeys::prefix("strIngredient")
    }

    #[test]
    fn gaps_and_foreign_keys_are_skipped() {
        let value = json!({"strIngredient1": "Tomato", "strIngredient3": "Basil", "other": "x"});
        let c = KeyedContainer::new(&value, &CodingPath::root()).unwrap();
        let out: Vec<String> = ingredients().decode_values(&c).unwrap();
        assert_eq!(out, vec!["Tomato", "Basil"]);
    }

    #[test]
    fn entries_carry_key_and_suffix() {
        let value = json!({"strIngredient10": "Salt", "strIngredient2": "Rice"});
        let c = KeyedContainer::new(&value, &CodingPath::root()).unwrap();
        let out: Vec<DynamicEntry<String>> = ingredients().decode(&c).unwrap();
        assert_eq!(out[0].key, "strIngredient2");
        assert_eq!(out[0].suffix, Some(2));
        assert_eq!(out[1].value, "Salt");
        assert_eq!(out[1].suffix, Some(10));
    }

    #[test]
    fn bad_entry_aborts_by_default() {
        let value = json!({"strIngredient1": "Tomato", "strIngredient2": 5});
        let c = KeyedContainer::new(&value, &CodingPath::root()).unwrap();
        let err = ingredients().decode_values::<String>(&c).unwrap_err();
        assert_eq!(
            err,
            DecodeError::TypeMismatch {
                path: "$.strIngredient2".to_string(),
                expected: "string",
                found: "number",
            }
        );
    }

    #[test]
    fn null_entry_aborts_unless_blanks_are_discarded() {
        let value = json!({"strIngredient1": "Tomato", "strIngredient2": null, "strIngredient3": "  "});
        let c = KeyedContainer::new(&value, &CodingPath::root()).unwrap();
        assert!(ingredients().decode_values::<String>(&c).is_err());
        let out: Vec<String> = ingredients().discard_blank().decode_values(&c).unwrap();
        assert_eq!(out, vec!["Tomato"]);
    }

    #[test]
    fn blank_strings_are_kept_without_the_policy() {
        let value = json!({"strIngredient1": "Tomato", "strIngredient2": ""});
        let c = KeyedContainer::new(&value, &CodingPath::root()).unwrap();
        let out: Vec<String> = ingredients().decode_values(&c).unwrap();
        assert_eq!(out, vec!["Tomato", ""]);
    }

    #[test]
    fn skip_policy_drops_bad_entries() {
        let value = json!({"strIngredient1": "Tomato", "strIngredient2": 5, "strIngredient3": "Basil"});
        let c = KeyedContainer::new(&value, &CodingPath::root()).unwrap();
        let out: Vec<String> = ingredients().skip_invalid().decode_values(&c).unwrap();
        assert_eq!(out, vec!["Tomato", "Basil"]);
    }

    #[test]
    fn no_matching_keys_is_empty_not_error() {
        let value = json!({"idMeal": "1"});
        let c = KeyedContainer::new(&value, &CodingPath::root()).unwrap();
        assert!(ingredients().decode_values::<String>(&c).unwrap().is_empty());
    }

    #[test]
    fn unnumbered_keys_keep_payload_order_after_numbered() {
        let value = crate::decode::parse(
            br#"{"strIngredientZ":"z","strIngredient2":"two","strIngredientA":"a","strIngredient1":"one"}"#,
        )
        .unwrap();
        let c = KeyedContainer::new(&value, &CodingPath::root()).unwrap();
        let out: Vec<String> = ingredients().decode_values(&c).unwrap();
        assert_eq!(out, vec!["one", "two", "z", "a"]);
    }
}
