//! Serde Integration for the ArangoDB client
//!
//! This layer implements the client's JSON serialization on top of serde:
//! - `JsonSerialization`: the `ApiClientSerialization` used by API clients
//! - `OpenMap`: model fields holding a mapping of string to value
//! - `PolicySerializer`: serde walker that applies the naming, null,
//!   default and enum policy at runtime
//! - `PolicyDeserializer`: reads models back, matching field names leniently
//!
//! # Example
//!
//! ```rust
//! use arangodb_core::{ApiClientSerialization, SerializationOptions};
//! use arangodb_serde::JsonSerialization;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
//! struct PostCollectionBody {
//!     name: String,
//!     wait_for_sync: bool,
//! }
//!
//! let serialization = JsonSerialization::new(SerializationOptions::default().with_camel_case(true));
//! let body = PostCollectionBody { name: "users".into(), wait_for_sync: true };
//!
//! let bytes = serialization.serialize(&body, None).unwrap();
//! assert_eq!(bytes, br#"{"name":"users","waitForSync":true}"#);
//!
//! let recovered: PostCollectionBody = serialization.deserialize(Some(bytes.as_slice())).unwrap();
//! assert_eq!(recovered, body);
//! ```
//!
//! # Async Support
//!
//! Enable the `async` feature for `AsyncApiClientSerialization`.

mod de;
mod open_map;
mod ser;
mod serialization;

pub use de::{from_json, PolicyDeserializer};
pub use open_map::OpenMap;
pub use ser::{to_json, PolicySerializer};
pub use serialization::JsonSerialization;

// Re-export core types for convenience
pub use arangodb_core::{
    ApiClientSerialization, Decimal, Decoder, Error, Map, Result, SerializationOptions, Timestamp,
    Value,
};

// Async support
#[cfg(feature = "async")]
mod async_serialization;

#[cfg(feature = "async")]
pub use async_serialization::AsyncApiClientSerialization;
