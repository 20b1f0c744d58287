//! Core serialization model for the ArangoDB client.
//!
//! This crate holds the pieces every serializer shares:
//! - `Value`: tagged union for JSON whose shape is only known at runtime
//! - `Decoder`: turns parsed JSON into `Value`, settling ambiguous literals
//! - `SerializationOptions`: the naming/null/enum policy and its resolution
//! - `ApiClientSerialization`: the trait API clients program against
//!
//! The serde-driven implementation lives in `arangodb-serde`.
//!
//! # Example
//!
//! ```rust
//! use arangodb_core::{Decoder, Value};
//!
//! let map = Decoder::new().from_slice(br#"{"count": 3, "ratio": 0.5}"#).unwrap();
//! assert_eq!(map["count"], Value::Integer(3));
//! assert!(matches!(map["ratio"], Value::Decimal(_)));
//! ```

mod decode;
mod error;
mod naming;
mod options;
mod timestamp;
mod traits;
mod value;

pub use decode::{check_property_name, token_kind, Decoder};
pub use error::{Error, Result};
pub use naming::to_camel_case;
pub use options::{resolve, SerializationOptions};
pub use timestamp::Timestamp;
pub use traits::ApiClientSerialization;
pub use value::{Decimal, Map, Value, DECIMAL_TOKEN, OPEN_MAP_TOKEN, VALUE_TOKEN};
