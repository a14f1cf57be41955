//! Locations inside a tree document.
//!
//! A [`Path`] is the ordered list of keys leading from the document root to
//! a node. Paths are used as lookup keys for per-location handler overrides,
//! so every accepted spelling normalizes to the same canonical form:
//!
//! - `""` is the root (no keys)
//! - `"a.b.c"` is `["a", "b", "c"]`
//! - an explicit list of keys is taken verbatim (keys may contain dots)

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Canonical location of a node: the keys from the root down.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "PathRepr", into = "PathRepr")]
pub struct Path(Vec<String>);

impl Path {
    /// The document root.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Parse a dot-separated descriptor.
    ///
    /// # Examples
    ///
    /// ```
    /// use trimerge_types::Path;
    ///
    /// assert!(Path::parse("").is_root());
    /// assert_eq!(Path::parse("a.b").segments(), ["a", "b"]);
    /// ```
    pub fn parse(descriptor: &str) -> Self {
        if descriptor.is_empty() {
            return Self::root();
        }
        Self(descriptor.split('.').map(str::to_string).collect())
    }

    /// Build a path from explicit keys, without splitting on dots.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(keys.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The path of a mapping entry below this one.
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut keys = Vec::with_capacity(self.0.len() + 1);
        keys.extend(self.0.iter().cloned());
        keys.push(key.into());
        Self(keys)
    }

    /// The path of an identity-keyed sequence item below this one.
    ///
    /// String identities are used verbatim; any other identity is keyed by
    /// its compact JSON text, so `42` and `"42"` share a key.
    pub fn identity_child(&self, identity: &Value) -> Self {
        match identity {
            Value::String(s) => self.child(s.as_str()),
            other => self.child(other.to_string()),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        f.write_str(&self.0.join("."))
    }
}

impl From<&str> for Path {
    fn from(descriptor: &str) -> Self {
        Self::parse(descriptor)
    }
}

impl From<String> for Path {
    fn from(descriptor: String) -> Self {
        Self::parse(&descriptor)
    }
}

impl From<&String> for Path {
    fn from(descriptor: &String) -> Self {
        Self::parse(descriptor)
    }
}

impl From<Vec<String>> for Path {
    fn from(keys: Vec<String>) -> Self {
        Self(keys)
    }
}

impl From<Vec<&str>> for Path {
    fn from(keys: Vec<&str>) -> Self {
        Self::from_keys(keys)
    }
}

impl From<&[&str]> for Path {
    fn from(keys: &[&str]) -> Self {
        Self::from_keys(keys.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for Path {
    fn from(keys: [&str; N]) -> Self {
        Self::from_keys(keys)
    }
}

impl From<&Path> for Path {
    fn from(path: &Path) -> Self {
        path.clone()
    }
}

/// On-the-wire spelling of a path in configuration files.
#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum PathRepr {
    Dotted(String),
    Keys(Vec<String>),
}

impl From<PathRepr> for Path {
    fn from(repr: PathRepr) -> Self {
        match repr {
            PathRepr::Dotted(s) => Self::parse(&s),
            PathRepr::Keys(keys) => Self(keys),
        }
    }
}

impl From<Path> for PathRepr {
    fn from(path: Path) -> Self {
        // Keys containing dots only survive as an explicit list.
        if path.0.iter().any(|k| k.contains('.') || k.is_empty()) {
            PathRepr::Keys(path.0)
        } else {
            PathRepr::Dotted(path.0.join("."))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_string_is_root() {
        assert_eq!(Path::parse(""), Path::root());
        assert!(Path::from("").is_root());
    }

    #[test]
    fn dotted_string_splits() {
        assert_eq!(Path::from("a.b.c"), Path::from(["a", "b", "c"]));
        assert_eq!(Path::from("items").len(), 1);
    }

    #[test]
    fn key_list_is_verbatim() {
        let p = Path::from(vec!["a.b", "c"]);
        assert_eq!(p.segments(), ["a.b", "c"]);
        assert_ne!(p, Path::from("a.b.c"));
    }

    #[test]
    fn child_appends() {
        let p = Path::root().child("items").child("3");
        assert_eq!(p, Path::from("items.3"));
    }

    #[test]
    fn identity_child_keys() {
        let base = Path::from("items");
        assert_eq!(base.identity_child(&Value::from("abc")), Path::from("items.abc"));
        assert_eq!(base.identity_child(&Value::from(42i64)), Path::from("items.42"));
        assert_eq!(
            base.identity_child(&Value::from(true)).segments(),
            ["items", "true"]
        );
    }

    #[test]
    fn display() {
        assert_eq!(Path::root().to_string(), "<root>");
        assert_eq!(Path::from("a.b").to_string(), "a.b");
    }

    #[test]
    fn deserialize_both_spellings() {
        let dotted: Path = serde_json::from_str(r#""a.b""#).unwrap();
        let keys: Path = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(dotted, keys);
    }

    #[test]
    fn serialize_keeps_dotted_keys_as_list() {
        let text = serde_json::to_string(&Path::from(vec!["a.b", "c"])).unwrap();
        assert_eq!(text, r#"["a.b","c"]"#);
        let text = serde_json::to_string(&Path::from("a.b")).unwrap();
        assert_eq!(text, r#""a.b""#);
    }

    proptest! {
        #[test]
        fn dotted_descriptor_matches_key_list(keys in proptest::collection::vec("[a-z0-9_]{1,6}", 1..5)) {
            let dotted = keys.join(".");
            prop_assert_eq!(Path::parse(&dotted), Path::from_keys(keys.clone()));
            prop_assert_eq!(Path::parse(&dotted).to_string(), dotted);
        }
    }
}
