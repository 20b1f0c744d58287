//! The Value type - the dynamic representation of untyped JSON.
//!
//! Responses whose value types aren't known at compile time (document
//! bodies, `new`/`old` revisions, free-form attributes) are decoded into
//! this closed union instead of a loosely typed object.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::ser::{Serialize, Serializer};

use crate::decode::Decoder;
use crate::timestamp::Timestamp;

/// Newtype name that asks a deserializer to hand over the raw JSON tree.
///
/// Policy-aware deserializers recognize it and skip their own number
/// coercion, so decimals reach the decoder with every digit intact.
#[doc(hidden)]
pub const VALUE_TOKEN: &str = "$arangodb::private::Value";

/// Newtype name wrapping an exact decimal on the encode side.
#[doc(hidden)]
pub const DECIMAL_TOKEN: &str = "$arangodb::private::Decimal";

/// Newtype name marking an open map: string keys, caller-owned values.
///
/// Policy-aware serializers switch to the map-value policy inside it.
#[doc(hidden)]
pub const OPEN_MAP_TOKEN: &str = "$arangodb::private::OpenMap";

/// Insertion-ordered map of dynamic values.
pub type Map = IndexMap<String, Value>;

/// A JSON value whose shape is only known at runtime.
///
/// # Design Notes
///
/// - Integers that fit in `i64` are always `Integer`; anything else numeric
///   is a `Decimal` carrying the exact numeral.
/// - Date-shaped strings are decoded as `Timestamp` (see [`Decoder`]).
/// - `Map` preserves insertion order; duplicate keys keep the last value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// JSON `null`.
    #[default]
    Null,
    /// JSON `true`/`false`.
    Bool(bool),
    /// Integral number within signed 64-bit range.
    Integer(i64),
    /// Non-integral or out-of-range number.
    Decimal(Decimal),
    /// String that isn't a recognized timestamp.
    String(String),
    /// Date-shaped string.
    Timestamp(Timestamp),
    /// Ordered sequence of values.
    Array(Vec<Value>),
    /// Object with unique string keys.
    Map(Map),
}

impl Value {
    /// Create an empty map.
    pub fn map() -> Self {
        Value::Map(Map::new())
    }

    /// Create an empty array.
    pub fn array() -> Self {
        Value::Array(Vec::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Lossy numeric view over both `Integer` and `Decimal`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Decimal(d) => d.to_f64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&Timestamp> {
        match self {
            Value::Timestamp(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key when this value is a map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()?.get(key)
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::Timestamp(_) => "timestamp",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
        }
    }
}

/// An exact decimal number, kept as the numeral that was read.
///
/// Nothing is rounded: `0.1000000000000000055511151231257827` survives a
/// decode/encode cycle digit for digit.
#[derive(Clone, Debug, PartialEq)]
pub struct Decimal(serde_json::Number);

impl Decimal {
    /// Parse a JSON numeral. Returns `None` if `text` isn't one.
    pub fn parse(text: &str) -> Option<Self> {
        text.parse::<serde_json::Number>().ok().map(Decimal)
    }

    /// Nearest `f64`.
    pub fn to_f64(&self) -> Option<f64> {
        self.0.as_f64()
    }

    pub fn as_number(&self) -> &serde_json::Number {
        &self.0
    }
}

impl From<serde_json::Number> for Decimal {
    fn from(n: serde_json::Number) -> Self {
        Decimal(n)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(DECIMAL_TOKEN, &self.0)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Decimal(d) => d.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Timestamp(t) => t.serialize(serializer),
            Value::Array(arr) => serializer.collect_seq(arr),
            Value::Map(map) => serializer.serialize_newtype_struct(OPEN_MAP_TOKEN, map),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_newtype_struct(VALUE_TOKEN, ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON value")
    }

    fn visit_newtype_struct<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        Decoder::default()
            .decode_value(json)
            .map_err(de::Error::custom)
    }
}

// Conversion from common types

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Timestamp> for Value {
    fn from(v: Timestamp) -> Self {
        Value::Timestamp(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Value::Map(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_match_variants() {
        let value = Value::from(vec![Value::from(1i64), Value::from("a"), Value::Null]);
        let arr = value.as_array().unwrap();
        assert_eq!(arr[0].as_i64(), Some(1));
        assert_eq!(arr[1].as_str(), Some("a"));
        assert!(arr[2].is_null());
        assert_eq!(value.as_map(), None);
        assert_eq!(value.kind(), "array");
    }

    #[test]
    fn get_looks_up_map_keys() {
        let mut map = Map::new();
        map.insert("_key".to_string(), Value::from("123"));
        let value = Value::from(map);
        assert_eq!(value.get("_key"), Some(&Value::from("123")));
        assert_eq!(value.get("_id"), None);
        assert_eq!(Value::from(true).get("_key"), None);
    }

    #[test]
    fn decimal_keeps_every_digit() {
        let d = Decimal::parse("0.1000000000000000055511151231257827").unwrap();
        assert_eq!(d.to_string(), "0.1000000000000000055511151231257827");
        assert!(Decimal::parse("not a number").is_none());
    }

    #[test]
    fn serializes_through_serde_json() {
        let mut map = Map::new();
        map.insert("z".to_string(), Value::from(1i64));
        map.insert("a".to_string(), Value::Decimal(Decimal::parse("12.50").unwrap()));
        map.insert(
            "when".to_string(),
            Value::Timestamp(Timestamp::parse("2024-05-01T10:30:00Z").unwrap()),
        );
        map.insert("tags".to_string(), Value::from(vec!["x", "y"]));
        map.insert("none".to_string(), Value::Null);

        let text = serde_json::to_string(&Value::Map(map)).unwrap();
        assert_eq!(
            text,
            r#"{"z":1,"a":12.50,"when":"2024-05-01T10:30:00Z","tags":["x","y"],"none":null}"#
        );
    }

    #[test]
    fn deserializes_through_decoder() {
        let value: Value =
            serde_json::from_str(r#"{"n":9223372036854775808,"d":"2024-05-01","s":"plain"}"#)
                .unwrap();
        assert!(matches!(value.get("n"), Some(Value::Decimal(_))));
        assert!(matches!(value.get("d"), Some(Value::Timestamp(_))));
        assert_eq!(value.get("s"), Some(&Value::from("plain")));
    }

    #[test]
    fn option_conversion() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }
}
