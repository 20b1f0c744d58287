//! Non-blocking forms of the serialization operations.
//!
//! Encoding and decoding are CPU-bound and never wait on anything, so these
//! futures complete on first poll. They exist so transport code written
//! against async I/O can call the serializer the same way it calls
//! everything else. Cancellation is not observed mid-decode.
//!
//! Enable the `async` feature to use this trait:
//!
//! ```toml
//! [dependencies]
//! arangodb-serde = { version = "0.1", features = ["async"] }
//! ```

use std::io::Read;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use arangodb_core::{ApiClientSerialization, Result, SerializationOptions};

/// Async extension trait for serialization.
///
/// Automatically implemented for every `ApiClientSerialization` that is
/// `Sync`.
#[async_trait]
pub trait AsyncApiClientSerialization: ApiClientSerialization + Sync {
    async fn serialize_async<T: Serialize + Sync + ?Sized>(
        &self,
        item: &T,
        options: Option<&SerializationOptions>,
    ) -> Result<Vec<u8>> {
        self.serialize(item, options)
    }

    async fn serialize_to_string_async<T: Serialize + Sync + ?Sized>(
        &self,
        item: &T,
        options: Option<&SerializationOptions>,
    ) -> Result<String> {
        self.serialize_to_string(item, options)
    }

    async fn deserialize_async<T: DeserializeOwned + Default + Send, R: Read + Send>(
        &self,
        stream: Option<R>,
    ) -> Result<T> {
        self.deserialize(stream)
    }
}

// Blanket implementation for all serializations
#[async_trait]
impl<S: ApiClientSerialization + Sync> AsyncApiClientSerialization for S {}
