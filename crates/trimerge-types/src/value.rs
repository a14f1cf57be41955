//! The tree value model.
//!
//! A [`Value`] is a JSON-shaped tree with one extra tag, [`Value::Absent`],
//! meaning "nothing exists at this location in this version". Mappings keep
//! their keys in a `BTreeMap`, so iteration order is always deterministic.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Error as _, Serialize, SerializeMap, Serializer};
use serde_json::Number;

use crate::error::TypeError;
use crate::kind::ValueKind;

/// Keyed children of a mapping node.
pub type Mapping = BTreeMap<String, Value>;

static ABSENT: Value = Value::Absent;

/// A node of a tree document.
///
/// Equality is structural. `Clone` produces a fully independent tree; no
/// storage is shared between a value and its clone.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<Value>),
    Mapping(Mapping),
    /// No value exists here in this branch.
    Absent,
}

impl Value {
    /// An empty mapping node.
    pub fn empty_mapping() -> Self {
        Self::Mapping(Mapping::new())
    }

    /// Build a number node from a float. Fails for NaN and infinities.
    pub fn from_f64(f: f64) -> Result<Self, TypeError> {
        Number::from_f64(f)
            .map(Self::Number)
            .ok_or_else(|| TypeError::NotRepresentable(format!("non-finite float {f}")))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Number(_) => ValueKind::Number,
            Self::String(_) => ValueKind::String,
            Self::Sequence(_) => ValueKind::Sequence,
            Self::Mapping(_) => ValueKind::Mapping,
            Self::Absent => ValueKind::Absent,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Self::Mapping(_))
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a mapping entry.
    ///
    /// Returns `Absent` when `self` is not a mapping or has no such key, so
    /// callers can treat missing keys and missing branches alike.
    pub fn get(&self, key: &str) -> &Value {
        match self {
            Self::Mapping(m) => m.get(key).unwrap_or(&ABSENT),
            _ => &ABSENT,
        }
    }

    /// Convert to a `serde_json::Value`.
    ///
    /// Mapping entries holding `Absent` are dropped; an `Absent` anywhere
    /// else is an error.
    pub fn to_json(&self) -> Result<serde_json::Value, TypeError> {
        Ok(match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => serde_json::Value::Number(n.clone()),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Sequence(items) => serde_json::Value::Array(
                items.iter().map(Value::to_json).collect::<Result<_, _>>()?,
            ),
            Self::Mapping(m) => {
                let mut out = serde_json::Map::new();
                for (key, value) in m {
                    if !value.is_absent() {
                        out.insert(key.clone(), value.to_json()?);
                    }
                }
                serde_json::Value::Object(out)
            }
            Self::Absent => return Err(TypeError::AbsentValue),
        })
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(m) => {
                Self::Mapping(m.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl TryFrom<Value> for serde_json::Value {
    type Error = TypeError;

    fn try_from(v: Value) -> Result<Self, Self::Error> {
        v.to_json()
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Self::Number(n.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Sequence(items)
    }
}

impl From<Mapping> for Value {
    fn from(m: Mapping) -> Self {
        Self::Mapping(m)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::Sequence(items) => serializer.collect_seq(items),
            Self::Mapping(m) => {
                let present = m.iter().filter(|(_, v)| !v.is_absent());
                let mut map = serializer.serialize_map(None)?;
                for (key, value) in present {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Self::Absent => Err(S::Error::custom(TypeError::AbsentValue)),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

/// Compact JSON rendering. `Absent` renders as `<absent>`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write_json_str(f, s),
            Self::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Mapping(m) => {
                f.write_str("{")?;
                let present = m.iter().filter(|(_, v)| !v.is_absent());
                for (i, (key, value)) in present.enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write_json_str(f, key)?;
                    write!(f, ":{value}")?;
                }
                f.write_str("}")
            }
            Self::Absent => f.write_str("<absent>"),
        }
    }
}

fn write_json_str(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let quoted = serde_json::to_string(s).map_err(|_| fmt::Error)?;
    f.write_str(&quoted)
}
