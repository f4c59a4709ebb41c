//! Key discovery for objects whose field set follows a naming pattern.
//!
//! TheMealDB spreads a meal's ingredients over `strIngredient1` …
//! `strIngredient20`, with gaps. The resolver picks the keys that match a
//! prefix and orders them by their numeric suffix, so the result does not
//! depend on the order the object's keys happened to arrive in.

use std::cmp::Ordering;

/// Prefix predicate for a family of dynamic keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPattern {
    prefix: String,
}

impl KeyPattern {
    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn as_prefix(&self) -> &str {
        &self.prefix
    }

    pub fn matches(&self, key: &str) -> bool {
        key.starts_with(&self.prefix)
    }

    /// Numeric suffix of `key`, if it matches and the remainder is a plain
    /// run of ASCII digits that fits in a `u64`.
    pub fn suffix(&self, key: &str) -> Option<u64> {
        let rest = key.strip_prefix(self.prefix.as_str())?;
        if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        rest.parse().ok()
    }
}

/// A key selected by `resolve_keys`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedKey<'a> {
    pub key: &'a str,
    pub suffix: Option<u64>,
}

/// Select the keys matching `pattern` and order them.
///
/// Keys with a numeric suffix come first, ascending (`2` before `10`); equal
/// suffixes such as `x1` and `x01` fall back to comparing the key text. Keys
/// without one follow in the order they were yielded.
pub fn resolve_keys<'a, I>(keys: I, pattern: &KeyPattern) -> Vec<ResolvedKey<'a>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut resolved: Vec<ResolvedKey<'a>> = keys
        .into_iter()
        .filter(|key| pattern.matches(key))
        .map(|key| ResolvedKey {
            key,
            suffix: pattern.suffix(key),
        })
        .collect();

    // sort_by is stable; unnumbered keys keep their relative order.
    resolved.sort_by(|a, b| match (a.suffix, b.suffix) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.key.cmp(b.key)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys<'a>(resolved: &[ResolvedKey<'a>]) -> Vec<&'a str> {
        resolved.iter().map(|r| r.key).collect()
    }

    #[test]
    fn suffix_requires_plain_digits() {
        let p = KeyPattern::prefix("strIngredient");
        assert_eq!(p.suffix("strIngredient7"), Some(7));
        assert_eq!(p.suffix("strIngredient10"), Some(10));
        assert_eq!(p.suffix("strIngredient"), None);
        assert_eq!(p.suffix("strIngredient+1"), None);
        assert_eq!(p.suffix("strIngredient1a"), None);
        assert_eq!(p.suffix("strIngredient99999999999999999999999"), None);
        assert_eq!(p.suffix("strMeasure1"), None);
    }

    #[test]
    fn orders_numerically_not_lexically() {
        let p = KeyPattern::prefix("strIngredient");
        let resolved = resolve_keys(
            ["strIngredient10", "strIngredient2", "strIngredient1"],
            &p,
        );
        assert_eq!(
            keys(&resolved),
            vec!["strIngredient1", "strIngredient2", "strIngredient10"]
        );
        assert_eq!(resolved[2].suffix, Some(10));
    }

    #[test]
    fn ignores_non_matching_keys_and_keeps_gaps() {
        let p = KeyPattern::prefix("strIngredient");
        let resolved = resolve_keys(["strIngredient3", "other", "strIngredient1"], &p);
        assert_eq!(keys(&resolved), vec!["strIngredient1", "strIngredient3"]);
    }

    #[test]
    fn unnumbered_keys_trail_in_first_seen_order() {
        let p = KeyPattern::prefix("strIngredient");
        let resolved = resolve_keys(
            [
                "strIngredientZ",
                "strIngredient2",
                "strIngredientA",
                "strIngredient1",
            ],
            &p,
        );
        assert_eq!(
            keys(&resolved),
            vec![
                "strIngredient1",
                "strIngredient2",
                "strIngredientZ",
                "strIngredientA"
            ]
        );
    }

    #[test]
    fn input_order_does_not_change_numbered_result() {
        let p = KeyPattern::prefix("k");
        let a = resolve_keys(["k2", "k1", "k01", "k3"], &p);
        let b = resolve_keys(["k3", "k01", "k1", "k2"], &p);
        assert_eq!(a, b);
        assert_eq!(keys(&a), vec!["k01", "k1", "k2", "k3"]);
    }

    #[test]
    fn empty_input_resolves_to_nothing() {
        let p = KeyPattern::prefix("strIngredient");
        assert!(resolve_keys(std::iter::empty::<&str>(), &p).is_empty());
    }
}
