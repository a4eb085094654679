//! Pluggable JSON serializer for real-time messaging hubs
//!
//! This crate is the seam between a messaging framework and the JSON
//! library it uses:
//! - [`JsonSerializer`] is the contract the framework calls to parse
//!   incoming text and write outgoing values
//! - [`JsonEngine`] abstracts the JSON library; [`SerdeJsonEngine`] is the
//!   reference engine, configured by [`JsonSettings`]
//! - [`JsonWritable`] lets a value write its own JSON, bypassing the engine
//!
//! [`JsonSerializer`] has generic methods and cannot be used as a trait
//! object. Hosts stay generic over `S: JsonSerializer`; engines are swapped
//! through the type parameter of [`EngineSerializer`] or by implementing
//! [`JsonEngine`].
//!
//! ```rust
//! use hub_json::{DefaultJsonSerializer, JsonSerializer, Payload};
//!
//! # fn example() -> hub_json::Result<()> {
//! let serializer = DefaultJsonSerializer::new();
//!
//! let mut sink = Vec::new();
//! serializer.serialize(Payload::value(&42), &mut sink)?;
//! assert_eq!(sink, b"42");
//!
//! let numbers: Vec<i32> = serializer.parse("[1,2,3]")?;
//! assert_eq!(numbers, vec![1, 2, 3]);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod engine;
pub mod error;
pub mod payload;
pub mod serializer;
pub mod settings;
pub mod writable;

pub use engine::{JsonEngine, SerdeJsonEngine};
pub use error::{ErrorKind, Result, SerializerError};
pub use payload::Payload;
pub use serializer::{default_serializer, DefaultJsonSerializer, EngineSerializer, JsonSerializer};
pub use settings::{Formatting, JsonSettings, NamingConvention, NullValueHandling};
pub use writable::JsonWritable;
