//! The serialization seam between API clients and their wire format.

use std::io::Read;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::options::SerializationOptions;

/// Serialization used by the per-endpoint API clients.
///
/// Implementations own an immutable set of default options. Clients call
/// `serialize` for request bodies and `deserialize` for response streams;
/// they never see the JSON machinery directly.
///
/// # Example
///
/// ```rust,ignore
/// fn token_request<S: ApiClientSerialization>(
///     serialization: &S,
///     body: &JwtTokenRequestBody,
/// ) -> Result<Vec<u8>> {
///     serialization.serialize(body, None)
/// }
/// ```
pub trait ApiClientSerialization {
    /// Defaults used whenever a call doesn't bring its own options.
    fn default_options(&self) -> &SerializationOptions;

    /// Serialize `item` to JSON text.
    ///
    /// When `options` is `Some`, it is the complete policy for this call.
    fn serialize_to_string<T: Serialize + ?Sized>(
        &self,
        item: &T,
        options: Option<&SerializationOptions>,
    ) -> Result<String>;

    /// Deserialize an in-memory document. Empty input yields `T::default()`.
    fn deserialize_slice<T: DeserializeOwned + Default>(&self, bytes: &[u8]) -> Result<T>;

    /// Serialize `item` to UTF-8 encoded JSON.
    fn serialize<T: Serialize + ?Sized>(
        &self,
        item: &T,
        options: Option<&SerializationOptions>,
    ) -> Result<Vec<u8>> {
        Ok(self.serialize_to_string(item, options)?.into_bytes())
    }

    /// Deserialize a response stream.
    ///
    /// A missing stream, or one that fails before yielding a byte, means
    /// there is nothing to decode: the result is `T::default()`, not an
    /// error.
    fn deserialize<T: DeserializeOwned + Default, R: Read>(&self, stream: Option<R>) -> Result<T> {
        let Some(mut stream) = stream else {
            log::debug!("no response stream, returning default value");
            return Ok(T::default());
        };

        let mut bytes = Vec::new();
        if let Err(e) = stream.read_to_end(&mut bytes) {
            if bytes.is_empty() {
                log::debug!("response stream unreadable ({e}), returning default value");
                return Ok(T::default());
            }
            return Err(e.into());
        }

        self.deserialize_slice(&bytes)
    }
}
