//! The JSON serialization used by the API clients.

use serde::de::DeserializeOwned;
use serde::Serialize;

use arangodb_core::{
    resolve, ApiClientSerialization, Decoder, Error, Map, Result, SerializationOptions,
};

use crate::de::from_json;
use crate::ser::to_json;

/// Policy-driven JSON serialization.
///
/// Holds the process-wide default options, fixed at construction. Each call
/// resolves its own effective options and builds its own output, so a
/// single instance can be shared freely across threads.
///
/// # Example
///
/// ```rust
/// use arangodb_core::{ApiClientSerialization, SerializationOptions};
/// use arangodb_serde::JsonSerialization;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct JwtTokenRequestBody {
///     username: String,
///     password: String,
/// }
///
/// let serialization = JsonSerialization::new(SerializationOptions::default().with_camel_case(true));
/// let body = JwtTokenRequestBody {
///     username: "root".into(),
///     password: "secret".into(),
/// };
/// let text = serialization.serialize_to_string(&body, None).unwrap();
/// assert_eq!(text, r#"{"username":"root","password":"secret"}"#);
/// ```
#[derive(Clone, Debug, Default)]
pub struct JsonSerialization {
    defaults: SerializationOptions,
}

impl JsonSerialization {
    pub fn new(defaults: SerializationOptions) -> Self {
        Self { defaults }
    }

    /// Build a serializer whose defaults come from a JSON options document.
    pub fn from_json_config(bytes: &[u8]) -> Result<Self> {
        Ok(Self::new(SerializationOptions::from_json_slice(bytes)?))
    }

    /// Serialize into a JSON tree instead of text.
    pub fn to_json<T: Serialize + ?Sized>(
        &self,
        item: &T,
        options: Option<&SerializationOptions>,
    ) -> Result<serde_json::Value> {
        to_json(item, resolve(&self.defaults, options))
    }

    /// Decode a document of unknown shape into dynamic values.
    ///
    /// The top level must be an object.
    pub fn deserialize_dynamic(&self, bytes: &[u8]) -> Result<Map> {
        Decoder::default().from_slice(bytes)
    }
}

impl ApiClientSerialization for JsonSerialization {
    fn default_options(&self) -> &SerializationOptions {
        &self.defaults
    }

    fn serialize_to_string<T: Serialize + ?Sized>(
        &self,
        item: &T,
        options: Option<&SerializationOptions>,
    ) -> Result<String> {
        let json = self.to_json(item, options)?;
        serde_json::to_string(&json).map_err(|e| Error::encode(e.to_string()))
    }

    fn deserialize_slice<T: DeserializeOwned + Default>(&self, bytes: &[u8]) -> Result<T> {
        if bytes.is_empty() {
            log::debug!("empty response body, returning default value");
            return Ok(T::default());
        }
        let json: serde_json::Value = serde_json::from_slice(bytes)?;
        // Field matching is lenient, so decoding needs no options.
        from_json(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::{self, Read};

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct JwtTokenResponse {
        jwt: String,
    }

    struct FailingReader {
        after: Option<Vec<u8>>,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.after.take() {
                Some(bytes) => {
                    buf[..bytes.len()].copy_from_slice(&bytes);
                    Ok(bytes.len())
                }
                None => Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
            }
        }
    }

    #[test]
    fn absent_stream_yields_default() {
        let serialization = JsonSerialization::default();
        let token: JwtTokenResponse = serialization.deserialize(None::<&[u8]>).unwrap();
        assert_eq!(token, JwtTokenResponse::default());
    }

    #[test]
    fn unreadable_stream_yields_default() {
        let serialization = JsonSerialization::default();
        let token: JwtTokenResponse = serialization
            .deserialize(Some(FailingReader { after: None }))
            .unwrap();
        assert_eq!(token, JwtTokenResponse::default());
    }

    #[test]
    fn stream_failing_midway_is_an_error() {
        let serialization = JsonSerialization::default();
        let err = serialization
            .deserialize::<JwtTokenResponse, _>(Some(FailingReader {
                after: Some(b"{\"jwt\"".to_vec()),
            }))
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn empty_body_yields_default() {
        let serialization = JsonSerialization::default();
        let token: JwtTokenResponse = serialization.deserialize_slice(b"").unwrap();
        assert_eq!(token, JwtTokenResponse::default());
    }

    #[test]
    fn reads_a_stream() {
        let serialization = JsonSerialization::default();
        let token: JwtTokenResponse = serialization
            .deserialize(Some(&br#"{"jwt":"abc.def.ghi"}"#[..]))
            .unwrap();
        assert_eq!(token.jwt, "abc.def.ghi");
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let serialization = JsonSerialization::default();
        let err = serialization
            .deserialize_slice::<JwtTokenResponse>(br#"{"jwt":"#)
            .unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn serialize_returns_utf8_bytes() {
        let serialization = JsonSerialization::default();
        let bytes = serialization
            .serialize(&JwtTokenResponse { jwt: "é".into() }, None)
            .unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), r#"{"jwt":"é"}"#);
    }

    #[test]
    fn config_document_sets_defaults() {
        let serialization =
            JsonSerialization::from_json_config(br#"{"useCamelCase":true,"useStringEnums":true}"#)
                .unwrap();
        assert!(serialization.default_options().use_camel_case);
        assert!(serialization.default_options().use_string_enums);
    }

    #[test]
    fn deserialize_dynamic_requires_object() {
        let serialization = JsonSerialization::default();
        assert!(serialization.deserialize_dynamic(b"{}").unwrap().is_empty());
        assert!(serialization.deserialize_dynamic(b"[]").is_err());
    }
}
