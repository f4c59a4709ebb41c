use std::fmt;

use serde_json::Value;

use crate::error::DecodeError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Location of a value inside the payload, rendered as `$.meals[0].strMeal`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodingPath {
    segments: Vec<Segment>,
}

impl CodingPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn key(&self, key: &str) -> Self {
        let mut next = self.clone();
        next.segments.push(Segment::Key(key.to_string()));
        next
    }

    pub fn index(&self, index: usize) -> Self {
        let mut next = self.clone();
        next.segments.push(Segment::Index(index));
        next
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub(crate) fn mismatch(&self, expected: &'static str, found: &Value) -> DecodeError {
        DecodeError::TypeMismatch {
            path: self.to_string(),
            expected,
            found: super::kind_of(found),
        }
    }

    pub(crate) fn missing(&self, key: &str) -> DecodeError {
        DecodeError::MissingKey {
            path: self.to_string(),
            key: key.to_string(),
        }
    }
}

impl fmt::Display for CodingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.segments {
            match segment {
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_keys_and_indices() {
        let path = CodingPath::root().key("meals").index(0).key("strMeal");
        assert_eq!(path.to_string(), "$.meals[0].strMeal");
        assert_eq!(path.depth(), 3);
    }

    #[test]
    fn extending_does_not_touch_parent() {
        let parent = CodingPath::root().key("meals");
        let _child = parent.index(4);
        assert_eq!(parent.to_string(), "$.meals");
    }
}
