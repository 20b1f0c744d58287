//! Open-map fields: string keys, values of unknown or uniform type.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

use indexmap::IndexMap;
use serde::de::{self, Deserialize, DeserializeOwned, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, Serializer};

use arangodb_core::{check_property_name, Error, Value, OPEN_MAP_TOKEN};

/// A model field declared as a mapping of string to value.
///
/// With the default `V = Value` the entries decode as dynamic values, which
/// is how document bodies and other free-form attributes come back from the
/// server. Any other `V` decodes every entry with that type's own codec.
///
/// Keys are read exactly as written. On encode the map is rendered with the
/// unmodified policy unless `apply_options_to_map_values` is set, so
/// caller-chosen keys such as stored attribute names are never rewritten.
///
/// # Example
///
/// ```rust
/// use arangodb_serde::{JsonSerialization, OpenMap};
/// use arangodb_core::{ApiClientSerialization, Value};
/// use serde::Deserialize;
///
/// #[derive(Default, Deserialize)]
/// struct PostDocumentResponse {
///     #[serde(rename = "_key")]
///     key: String,
///     #[serde(default)]
///     new: OpenMap,
/// }
///
/// let serialization = JsonSerialization::default();
/// let response: PostDocumentResponse = serialization
///     .deserialize_slice(br#"{"_key":"1","new":{"Name":"Ann","Age":41}}"#)
///     .unwrap();
/// assert_eq!(response.new["Age"], Value::Integer(41));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct OpenMap<V = Value>(pub IndexMap<String, V>);

impl<V> OpenMap<V> {
    pub fn new() -> Self {
        OpenMap(IndexMap::new())
    }

    pub fn into_inner(self) -> IndexMap<String, V> {
        self.0
    }
}

impl<V> Default for OpenMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Deref for OpenMap<V> {
    type Target = IndexMap<String, V>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<V> DerefMut for OpenMap<V> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<V> From<IndexMap<String, V>> for OpenMap<V> {
    fn from(map: IndexMap<String, V>) -> Self {
        OpenMap(map)
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OpenMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        OpenMap(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<V> IntoIterator for OpenMap<V> {
    type Item = (String, V);
    type IntoIter = indexmap::map::IntoIter<String, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<V: Serialize> Serialize for OpenMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(OPEN_MAP_TOKEN, &self.0)
    }
}

impl<'de, V: DeserializeOwned> Deserialize<'de> for OpenMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_newtype_struct(OPEN_MAP_TOKEN, OpenMapVisitor(PhantomData))
    }
}

struct OpenMapVisitor<V>(PhantomData<V>);

impl<'de, V: DeserializeOwned> Visitor<'de> for OpenMapVisitor<V> {
    type Value = OpenMap<V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object (only objects are supported)")
    }

    fn visit_newtype_struct<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_map(self)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = IndexMap::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(key) = access.next_key::<String>()? {
            if let Err(Error::Decode { message }) = check_property_name(&key) {
                return Err(de::Error::custom(message));
            }
            let value: V = access.next_value()?;
            // Duplicate keys: the last one read wins.
            map.insert(key, value);
        }
        Ok(OpenMap(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arangodb_core::SerializationOptions;
    use serde::de::value::StrDeserializer;
    use serde::de::IntoDeserializer;
    use serde_json::json;

    use crate::de::from_json;
    use crate::ser::to_json;

    fn sample() -> OpenMap {
        [
            ("Foo_Bar", Value::from("x")),
            ("Missing", Value::Null),
            ("Count", Value::Integer(0)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn keys_are_verbatim_unless_options_apply() {
        let options = SerializationOptions::default().with_camel_case(true);
        let json = to_json(&sample(), options).unwrap();
        // ignore_null_values is on in the defaults, but not for map values.
        assert_eq!(json, json!({"Foo_Bar": "x", "Missing": null, "Count": 0}));
    }

    #[test]
    fn options_reach_map_values_when_applied() {
        let options = SerializationOptions::default()
            .with_camel_case(true)
            .with_ignore_missing_members(true)
            .with_apply_options_to_map_values(true);
        let json = to_json(&sample(), options).unwrap();
        assert_eq!(json, json!({"fooBar": "x"}));
    }

    #[test]
    fn decode_keeps_key_casing() {
        let map: OpenMap = from_json(json!({"Foo_Bar": 1, "fooBar": 2})).unwrap();
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, ["Foo_Bar", "fooBar"]);
    }

    #[test]
    fn decode_requires_object() {
        let err = from_json::<OpenMap>(json!([1, 2])).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
        assert!(err.to_string().contains("only objects are supported"));
    }

    #[test]
    fn property_name_token_is_rejected() {
        // A map key deserializer stands where an object was expected.
        let key: StrDeserializer<'_, Error> = "name".into_deserializer();
        let err = OpenMap::<Value>::deserialize(key).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn blank_keys_are_rejected() {
        let err = from_json::<OpenMap>(json!({" ": 1})).unwrap_err();
        assert!(err.to_string().contains("property name"));
    }

    #[test]
    fn uniform_value_type() {
        let map: OpenMap<u32> = from_json(json!({"a": 1, "b": 2})).unwrap();
        assert_eq!(map["b"], 2);

        let err = from_json::<OpenMap<u32>>(json!({"a": "x"})).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn plain_serde_json_sees_an_ordinary_object() {
        let text = serde_json::to_string(&sample()).unwrap();
        assert_eq!(text, r#"{"Foo_Bar":"x","Missing":null,"Count":0}"#);

        let map: OpenMap = serde_json::from_str(r#"{"when":"2024-05-01","n":1.25}"#).unwrap();
        assert!(matches!(map["when"], Value::Timestamp(_)));
        assert!(matches!(map["n"], Value::Decimal(_)));
    }
}
