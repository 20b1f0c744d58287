//! Dynamic value decoding.
//!
//! Turns a parsed JSON tree into [`Value`], settling the literals JSON
//! leaves ambiguous:
//!
//! - numbers try `i64` first and fall back to an exact [`Decimal`]
//! - strings that parse as ISO-8601 become [`Timestamp`]s
//!
//! The timestamp rule is a deliberate policy: any date-shaped string is
//! reclassified. Callers that need such strings back verbatim can turn it
//! off with [`Decoder::detect_timestamps`] or declare the field with a
//! concrete value type instead.

use crate::error::{Error, Result};
use crate::timestamp::Timestamp;
use crate::value::{Decimal, Map, Value};

/// Decoder for open-ended JSON values.
#[derive(Clone, Copy, Debug)]
pub struct Decoder {
    detect_timestamps: bool,
}

impl Default for Decoder {
    fn default() -> Self {
        Self {
            detect_timestamps: true,
        }
    }
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle reclassification of date-shaped strings (on by default).
    pub fn detect_timestamps(mut self, enabled: bool) -> Self {
        self.detect_timestamps = enabled;
        self
    }

    /// Decode a complete document whose top level must be an object.
    pub fn from_slice(&self, bytes: &[u8]) -> Result<Map> {
        let json: serde_json::Value = serde_json::from_slice(bytes)?;
        self.decode_map(json)
    }

    /// Decode a JSON object into a [`Map`].
    ///
    /// Fails if `json` is anything other than an object, or if any key
    /// (at any depth) is empty or whitespace.
    pub fn decode_map(&self, json: serde_json::Value) -> Result<Map> {
        match json {
            serde_json::Value::Object(object) => self.decode_object(object),
            other => Err(Error::decode(format!(
                "JSON token was of type {}, only objects are supported",
                token_kind(&other)
            ))),
        }
    }

    /// Decode one JSON value of any kind.
    pub fn decode_value(&self, json: serde_json::Value) -> Result<Value> {
        Ok(match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Decimal(Decimal::from(n)),
            },
            serde_json::Value::String(s) => self.decode_string(s),
            serde_json::Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| self.decode_value(item))
                    .collect::<Result<_>>()?,
            ),
            serde_json::Value::Object(object) => Value::Map(self.decode_object(object)?),
        })
    }

    fn decode_string(&self, s: String) -> Value {
        if self.detect_timestamps {
            if let Some(ts) = Timestamp::parse(&s) {
                log::trace!("reading {s:?} as a timestamp");
                return Value::Timestamp(ts);
            }
        }
        Value::String(s)
    }

    fn decode_object(&self, object: serde_json::Map<String, serde_json::Value>) -> Result<Map> {
        let mut map = Map::with_capacity(object.len());
        for (key, json) in object {
            check_property_name(&key)?;
            let value = self.decode_value(json)?;
            map.insert(key, value);
        }
        Ok(map)
    }
}

/// Reject property names that are empty or only whitespace.
pub fn check_property_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::decode("failed to get property name"));
    }
    Ok(())
}

/// Name of a JSON token kind, for error messages.
pub fn token_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "Null",
        serde_json::Value::Bool(true) => "True",
        serde_json::Value::Bool(false) => "False",
        serde_json::Value::Number(_) => "Number",
        serde_json::Value::String(_) => "String",
        serde_json::Value::Array(_) => "StartArray",
        serde_json::Value::Object(_) => "StartObject",
    }
}
