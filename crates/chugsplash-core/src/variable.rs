//! # Config Variables
//!
//! The recursive value type assignable to a contract's constructor or
//! storage variable.
//!
//! Numbers are integers only. Anything that does not fit in 64 bits (token
//! supplies, wei amounts) is authored as a decimal string and carried as
//! [`ConfigVariable::String`]; the EVM encoder downstream decides how to
//! interpret it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A value assignable to a contract variable.
///
/// Serializes untagged, so the wire form is plain JSON:
/// `true`, `"s"`, `42`, `[1, 2]`, `{"k": "v"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigVariable {
    /// A boolean.
    Bool(bool),
    /// An integer representable as `i64` or `u64`.
    Number(serde_json::Number),
    /// A string, including decimal strings for integers wider than 64 bits.
    String(String),
    /// An ordered sequence.
    Array(Vec<ConfigVariable>),
    /// A mapping from string keys. Key order is not significant.
    Object(BTreeMap<String, ConfigVariable>),
}

impl ConfigVariable {
    /// Short name of the variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// Nesting depth of this value.
    ///
    /// Scalars and empty containers have depth 0. A container's depth is one
    /// more than the deepest of its children.
    pub fn depth(&self) -> usize {
        match self {
            Self::Bool(_) | Self::Number(_) | Self::String(_) => 0,
            Self::Array(items) => items.iter().map(|v| v.depth() + 1).max().unwrap_or(0),
            Self::Object(map) => map.values().map(|v| v.depth() + 1).max().unwrap_or(0),
        }
    }

    /// Convert into an untyped JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => serde_json::Value::Number(n.clone()),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Array(items) => {
                serde_json::Value::Array(items.iter().map(ConfigVariable::to_json).collect())
            }
            Self::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

impl From<bool> for ConfigVariable {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for ConfigVariable {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for ConfigVariable {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for ConfigVariable {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<u64> for ConfigVariable {
    fn from(n: u64) -> Self {
        Self::Number(n.into())
    }
}

impl From<Vec<ConfigVariable>> for ConfigVariable {
    fn from(items: Vec<ConfigVariable>) -> Self {
        Self::Array(items)
    }
}

impl From<BTreeMap<String, ConfigVariable>> for ConfigVariable {
    fn from(map: BTreeMap<String, ConfigVariable>) -> Self {
        Self::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_untagged() {
        let v = ConfigVariable::Array(vec![true.into(), "s".into(), 7i64.into()]);
        assert_eq!(serde_json::to_value(&v).unwrap(), json!([true, "s", 7]));
    }

    #[test]
    fn deserializes_each_variant() {
        let v: ConfigVariable = serde_json::from_value(json!({
            "flag": false,
            "count": 3,
            "label": "x",
            "list": [1, [2]],
        }))
        .unwrap();
        let ConfigVariable::Object(map) = v else {
            panic!("expected object");
        };
        assert_eq!(map["flag"], ConfigVariable::Bool(false));
        assert_eq!(map["count"], ConfigVariable::from(3i64));
        assert_eq!(map["label"], ConfigVariable::from("x"));
        assert_eq!(map["list"].kind(), "array");
    }

    #[test]
    fn depth_counts_container_levels() {
        assert_eq!(ConfigVariable::from(1i64).depth(), 0);
        assert_eq!(ConfigVariable::Array(vec![]).depth(), 0);
        let nested = ConfigVariable::Array(vec![ConfigVariable::Array(vec![1i64.into()])]);
        assert_eq!(nested.depth(), 2);
    }

    #[test]
    fn to_json_matches_serde_output() {
        let mut map = BTreeMap::new();
        map.insert("b".to_string(), ConfigVariable::from(u64::MAX));
        map.insert("a".to_string(), ConfigVariable::from(vec!["x".into()]));
        let v = ConfigVariable::Object(map);
        assert_eq!(v.to_json(), serde_json::to_value(&v).unwrap());
    }
}
