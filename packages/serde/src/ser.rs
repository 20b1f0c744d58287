//! Policy-driven serializer.
//!
//! Walks a `Serialize` value into a `serde_json::Value` tree, applying the
//! effective [`SerializationOptions`] as it goes:
//!
//! - struct field names are rewritten to camelCase when asked
//! - null or default-valued struct fields are dropped when asked
//! - unit enum variants become their name or their ordinal
//! - open maps switch to the map-value policy for their whole subtree
//!
//! Keys of ordinary maps (`HashMap`, `BTreeMap`) are never rewritten.
//! Serde writes a struct with `#[serde(flatten)]` fields as a map of unknown
//! length; such a map gets the struct field policy, flattened maps included.

use serde::ser::{self, Impossible, Serialize};
use serde_json::{Map as JsonMap, Number, Value as Json};

use arangodb_core::{
    to_camel_case, Error, Result, SerializationOptions, DECIMAL_TOKEN, OPEN_MAP_TOKEN,
};

/// Serialize `value` into a JSON tree under `options`.
pub fn to_json<T: Serialize + ?Sized>(value: &T, options: SerializationOptions) -> Result<Json> {
    value.serialize(PolicySerializer::new(options))
}

/// Serializer producing `serde_json::Value` under a fixed policy.
#[derive(Clone, Copy, Debug)]
pub struct PolicySerializer {
    options: SerializationOptions,
    /// Set while serializing the entries of an open map.
    open_map: bool,
}

impl PolicySerializer {
    pub fn new(options: SerializationOptions) -> Self {
        Self {
            options,
            open_map: false,
        }
    }

    fn child(&self) -> Self {
        Self::new(self.options)
    }

    fn field_name(&self, name: &str) -> String {
        if self.options.use_camel_case {
            to_camel_case(name)
        } else {
            name.to_string()
        }
    }

    /// Whether a rendered field should be left out of its object.
    fn omits(&self, value: &Json) -> bool {
        (self.options.ignore_null_values && value.is_null())
            || (self.options.ignore_missing_members && is_default(value))
    }
}

/// The zero value of the type that produced `value`, as seen on the wire.
fn is_default(value: &Json) -> bool {
    match value {
        Json::Null => true,
        Json::Bool(b) => !b,
        Json::Number(n) => is_zero_numeral(&n.to_string()),
        Json::String(s) => s.is_empty(),
        Json::Array(items) => items.is_empty(),
        Json::Object(object) => object.is_empty(),
    }
}

/// Struct name serde_json gives exact numbers under `arbitrary_precision`.
const JSON_NUMBER_TOKEN: &str = "$serde_json::private::Number";

type JsonNumberStruct = <serde_json::value::Serializer as ser::Serializer>::SerializeStruct;

/// `0`, `-0.0`, `0e5` and the like. Underflowing numerals such as `1e-400`
/// are not zero.
fn is_zero_numeral(text: &str) -> bool {
    let mantissa = text
        .split(['e', 'E'])
        .next()
        .unwrap_or_default()
        .trim_start_matches('-');
    mantissa.chars().all(|c| c == '0' || c == '.')
}

fn non_finite(v: f64) -> Error {
    Error::encode(format!("cannot encode non-finite number {v}"))
}

impl ser::Serializer for PolicySerializer {
    type Ok = Json;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeStruct;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Json> {
        Ok(Json::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Json> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<Json> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<Json> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<Json> {
        Ok(Json::Number(v.into()))
    }

    fn serialize_u8(self, v: u8) -> Result<Json> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u16(self, v: u16) -> Result<Json> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u32(self, v: u32) -> Result<Json> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u64(self, v: u64) -> Result<Json> {
        Ok(Json::Number(v.into()))
    }

    fn serialize_f32(self, v: f32) -> Result<Json> {
        if !v.is_finite() {
            return Err(non_finite(v as f64));
        }
        // Display gives the shortest text that reads back as the same f32.
        v.to_string()
            .parse::<Number>()
            .map(Json::Number)
            .map_err(|e| Error::encode(e.to_string()))
    }

    fn serialize_f64(self, v: f64) -> Result<Json> {
        Number::from_f64(v)
            .map(Json::Number)
            .ok_or_else(|| non_finite(v))
    }

    fn serialize_char(self, v: char) -> Result<Json> {
        Ok(Json::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Json> {
        Ok(Json::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Json> {
        Ok(Json::Array(
            v.iter().map(|b| Json::Number((*b).into())).collect(),
        ))
    }

    fn serialize_none(self) -> Result<Json> {
        Ok(Json::Null)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Json> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Json> {
        Ok(Json::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Json> {
        Ok(Json::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        variant: &'static str,
    ) -> Result<Json> {
        if self.options.use_string_enums {
            Ok(Json::String(variant.to_string()))
        } else {
            Ok(Json::Number(variant_index.into()))
        }
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<Json> {
        if name == DECIMAL_TOKEN {
            // serde_json knows how to write an exact numeral; let it.
            return serde_json::to_value(value).map_err(|e| Error::encode(e.to_string()));
        }
        if name == OPEN_MAP_TOKEN {
            return value.serialize(PolicySerializer {
                options: self.options.for_map_values(),
                open_map: true,
            });
        }
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Json> {
        let mut object = JsonMap::new();
        object.insert(variant.to_string(), value.serialize(self.child())?);
        Ok(Json::Object(object))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec {
            vec: Vec::with_capacity(len.unwrap_or(0)),
            ser: self.child(),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            name: variant.to_string(),
            vec: Vec::with_capacity(len),
            ser: self.child(),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap {
            map: JsonMap::new(),
            next_key: None,
            named_fields: self.open_map || len.is_none(),
            ser: self,
        })
    }

    fn serialize_struct(self, name: &'static str, len: usize) -> Result<SerializeStruct> {
        if name == JSON_NUMBER_TOKEN {
            let number = ser::Serializer::serialize_struct(serde_json::value::Serializer, name, len)
                .map_err(|e| Error::encode(e.to_string()))?;
            return Ok(SerializeStruct::Number(number));
        }
        Ok(SerializeStruct::Fields {
            map: JsonMap::new(),
            ser: self.child(),
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeStructVariant> {
        Ok(SerializeStructVariant {
            name: variant.to_string(),
            map: JsonMap::new(),
            ser: self.child(),
        })
    }
}

pub struct SerializeVec {
    vec: Vec<Json>,
    ser: PolicySerializer,
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Json;
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.vec.push(value.serialize(self.ser)?);
        Ok(())
    }

    fn end(self) -> Result<Json> {
        Ok(Json::Array(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Json;
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Json> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Json;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Json> {
        ser::SerializeSeq::end(self)
    }
}

pub struct SerializeTupleVariant {
    name: String,
    vec: Vec<Json>,
    ser: PolicySerializer,
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Json;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.vec.push(value.serialize(self.ser)?);
        Ok(())
    }

    fn end(self) -> Result<Json> {
        let mut object = JsonMap::new();
        object.insert(self.name, Json::Array(self.vec));
        Ok(Json::Object(object))
    }
}

pub struct SerializeMap {
    map: JsonMap<String, Json>,
    next_key: Option<String>,
    /// Keys are renamed and entries omitted like struct fields.
    named_fields: bool,
    ser: PolicySerializer,
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Json;
    type Error = Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<()> {
        let key = key.serialize(MapKeySerializer)?;
        self.next_key = Some(if self.named_fields {
            self.ser.field_name(&key)
        } else {
            key
        });
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| Error::encode("map value written before its key"))?;
        let value = value.serialize(self.ser.child())?;
        if self.named_fields && self.ser.omits(&value) {
            return Ok(());
        }
        self.map.insert(key, value);
        Ok(())
    }

    fn end(self) -> Result<Json> {
        Ok(Json::Object(self.map))
    }
}

pub enum SerializeStruct {
    Fields {
        map: JsonMap<String, Json>,
        ser: PolicySerializer,
    },
    /// A `serde_json::Number` carried inside a `serde_json::Value`.
    Number(JsonNumberStruct),
}

impl ser::SerializeStruct for SerializeStruct {
    type Ok = Json;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        match self {
            SerializeStruct::Fields { map, ser } => {
                let value = value.serialize(*ser)?;
                if ser.omits(&value) {
                    return Ok(());
                }
                map.insert(ser.field_name(key), value);
                Ok(())
            }
            SerializeStruct::Number(number) => {
                ser::SerializeStruct::serialize_field(number, key, value)
                    .map_err(|e| Error::encode(e.to_string()))
            }
        }
    }

    fn end(self) -> Result<Json> {
        match self {
            SerializeStruct::Fields { map, .. } => Ok(Json::Object(map)),
            SerializeStruct::Number(number) => {
                ser::SerializeStruct::end(number).map_err(|e| Error::encode(e.to_string()))
            }
        }
    }
}

pub struct SerializeStructVariant {
    name: String,
    map: JsonMap<String, Json>,
    ser: PolicySerializer,
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Json;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        let value = value.serialize(self.ser)?;
        if self.ser.omits(&value) {
            return Ok(());
        }
        self.map.insert(self.ser.field_name(key), value);
        Ok(())
    }

    fn end(self) -> Result<Json> {
        let mut object = JsonMap::new();
        object.insert(self.name, Json::Object(self.map));
        Ok(Json::Object(object))
    }
}

/// Renders map keys. JSON object keys must be strings.
struct MapKeySerializer;

fn key_must_be_a_string() -> Error {
    Error::encode("map key must be a string")
}

impl ser::Serializer for MapKeySerializer {
    type Ok = String;
    type Error = Error;

    type SerializeSeq = Impossible<String, Error>;
    type SerializeTuple = Impossible<String, Error>;
    type SerializeTupleStruct = Impossible<String, Error>;
    type SerializeTupleVariant = Impossible<String, Error>;
    type SerializeMap = Impossible<String, Error>;
    type SerializeStruct = Impossible<String, Error>;
    type SerializeStructVariant = Impossible<String, Error>;

    fn serialize_bool(self, v: bool) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i8(self, v: i8) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i16(self, v: i16) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i32(self, v: i32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i64(self, v: i64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u8(self, v: u8) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u16(self, v: u16) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u32(self, v: u32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u64(self, v: u64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_f32(self, _v: f32) -> Result<String> {
        Err(key_must_be_a_string())
    }

    fn serialize_f64(self, _v: f64) -> Result<String> {
        Err(key_must_be_a_string())
    }

    fn serialize_char(self, v: char) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_str(self, v: &str) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String> {
        Err(key_must_be_a_string())
    }

    fn serialize_none(self) -> Result<String> {
        Err(key_must_be_a_string())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, _value: &T) -> Result<String> {
        Err(key_must_be_a_string())
    }

    fn serialize_unit(self) -> Result<String> {
        Err(key_must_be_a_string())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String> {
        Err(key_must_be_a_string())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String> {
        Ok(variant.to_string())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<String> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String> {
        Err(key_must_be_a_string())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(key_must_be_a_string())
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(key_must_be_a_string())
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(key_must_be_a_string())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(key_must_be_a_string())
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(key_must_be_a_string())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(key_must_be_a_string())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(key_must_be_a_string())
    }
}
