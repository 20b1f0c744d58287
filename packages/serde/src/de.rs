//! Policy-aware deserializer.
//!
//! Reads a typed model out of a parsed `serde_json::Value` tree. Struct
//! fields match leniently so that whatever naming policy wrote a document
//! can read it back: the declared name first, then its camelCase spelling,
//! then an ASCII case-insensitive match. Unit enum variants are accepted by
//! name or by ordinal.
//!
//! Dynamic values are handed the raw tree (see [`VALUE_TOKEN`]) so the
//! decoder sees numbers exactly as they were written.
//!
//! Decoding does not depend on the serialization options: a document
//! written under any naming policy reads back through the same matching.
//!
//! Field names are only rewritten where serde passes the field list, which
//! is `deserialize_struct` and struct variants. Internally tagged enums,
//! untagged enums and `#[serde(flatten)]` go through serde's buffered
//! content instead, and that path matches names exactly. Such types declare
//! their wire names with `#[serde(rename_all = "camelCase")]` (or
//! `rename_all_fields` on an enum); camelCase output leaves those names
//! unchanged, so they read back under every policy.

use serde::de::value::{MapDeserializer, SeqDeserializer};
use serde::de::{self, DeserializeOwned, DeserializeSeed, IntoDeserializer, Visitor};
use serde::forward_to_deserialize_any;
use serde_json::{Number, Value as Json};

use arangodb_core::{to_camel_case, token_kind, Error, Result, VALUE_TOKEN};

/// Deserialize a typed value from a JSON tree.
pub fn from_json<T: DeserializeOwned>(json: Json) -> Result<T> {
    T::deserialize(PolicyDeserializer::new(json))
}

/// Deserializer over an owned JSON tree.
pub struct PolicyDeserializer {
    value: Json,
}

impl PolicyDeserializer {
    pub fn new(value: Json) -> Self {
        Self { value }
    }
}

/// Find the declared field a wire key stands for.
fn match_field(key: &str, fields: &'static [&'static str]) -> Option<&'static str> {
    fields
        .iter()
        .find(|f| **f == key)
        .or_else(|| fields.iter().find(|f| to_camel_case(f) == key))
        .or_else(|| fields.iter().find(|f| f.eq_ignore_ascii_case(key)))
        .copied()
}

fn visit_number<'de, V: Visitor<'de>>(n: Number, visitor: V) -> Result<V::Value> {
    if let Some(u) = n.as_u64() {
        visitor.visit_u64(u)
    } else if let Some(i) = n.as_i64() {
        visitor.visit_i64(i)
    } else if let Some(f) = n.as_f64() {
        visitor.visit_f64(f)
    } else {
        Err(Error::decode(format!("number {n} is out of range")))
    }
}

fn visit_array<'de, V: Visitor<'de>>(items: Vec<Json>, visitor: V) -> Result<V::Value> {
    let mut seq = SeqDeserializer::<_, Error>::new(items.into_iter().map(PolicyDeserializer::new));
    let value = visitor.visit_seq(&mut seq)?;
    seq.end()?;
    Ok(value)
}

fn visit_object<'de, V: Visitor<'de>>(
    entries: impl Iterator<Item = (String, Json)>,
    visitor: V,
) -> Result<V::Value> {
    let mut map = MapDeserializer::<_, Error>::new(
        entries.map(|(key, value)| (key, PolicyDeserializer::new(value))),
    );
    let value = visitor.visit_map(&mut map)?;
    map.end()?;
    Ok(value)
}

impl<'de> IntoDeserializer<'de, Error> for PolicyDeserializer {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

impl<'de> de::Deserializer<'de> for PolicyDeserializer {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value {
            Json::Null => visitor.visit_unit(),
            Json::Bool(b) => visitor.visit_bool(b),
            Json::Number(n) => visit_number(n, visitor),
            Json::String(s) => visitor.visit_string(s),
            Json::Array(items) => visit_array(items, visitor),
            Json::Object(object) => visit_object(object.into_iter(), visitor),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value {
            Json::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        if name == VALUE_TOKEN {
            return visitor
                .visit_newtype_struct(self.value)
                .map_err(|e| Error::decode(e.to_string()));
        }
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        match self.value {
            Json::Object(object) => {
                let entries = object.into_iter().map(|(key, value)| {
                    let key = match match_field(&key, fields) {
                        Some(field) => field.to_string(),
                        None => key,
                    };
                    (key, value)
                });
                visit_object(entries, visitor)
            }
            other => de::Deserializer::deserialize_any(PolicyDeserializer::new(other), visitor),
        }
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        match self.value {
            Json::String(variant) => visitor.visit_enum(variant.into_deserializer()),
            Json::Number(n) => {
                let variant = n
                    .as_u64()
                    .and_then(|i| usize::try_from(i).ok())
                    .and_then(|i| variants.get(i))
                    .ok_or_else(|| Error::decode(format!("no variant of {name} has ordinal {n}")))?;
                visitor.visit_enum((*variant).into_deserializer())
            }
            Json::Object(object) if object.len() == 1 => {
                let Some((variant, value)) = object.into_iter().next() else {
                    return Err(Error::decode(format!("expected a variant of {name}")));
                };
                visitor.visit_enum(EnumDeserializer {
                    variant,
                    value: PolicyDeserializer::new(value),
                })
            }
            other => Err(Error::decode(format!(
                "JSON token was of type {}, expected a variant of {name}",
                token_kind(&other)
            ))),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map identifier
        ignored_any
    }
}

/// Externally tagged variant: `{"Variant": payload}`.
struct EnumDeserializer {
    variant: String,
    value: PolicyDeserializer,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = PolicyDeserializer;

    fn variant_seed<S: DeserializeSeed<'de>>(self, seed: S) -> Result<(S::Value, Self::Variant)> {
        let variant =
            seed.deserialize(IntoDeserializer::<'de, Error>::into_deserializer(self.variant))?;
        Ok((variant, self.value))
    }
}

impl<'de> de::VariantAccess<'de> for PolicyDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Json::Null => Ok(()),
            other => Err(Error::decode(format!(
                "JSON token was of type {}, expected a unit variant",
                token_kind(&other)
            ))),
        }
    }

    fn newtype_variant_seed<S: DeserializeSeed<'de>>(self, seed: S) -> Result<S::Value> {
        seed.deserialize(self)
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value> {
        de::Deserializer::deserialize_seq(self, visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        de::Deserializer::deserialize_struct(self, "", fields, visitor)
    }
}
