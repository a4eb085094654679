//! JSON engine abstraction
//!
//! The serializer never talks to a JSON library directly. Engines provide
//! three things: construction from a settings bundle, generic
//! deserialization into a target type, and generic serialization into a
//! sink. Anything implementing [`JsonEngine`] can be plugged into
//! [`EngineSerializer`](crate::EngineSerializer).

mod camel_case;
mod depth;
mod formatter;
mod serde_engine;
mod transform;

pub use serde_engine::SerdeJsonEngine;

use crate::error::Result;
use serde::de::DeserializeOwned;
use std::io::Write;

/// Engine contract consumed by the serializer.
///
/// Engines are shared across threads without locking, so their settings
/// must be fixed at construction.
pub trait JsonEngine: Send + Sync {
    /// Engine-specific configuration
    type Settings;

    /// Build an engine from its settings
    fn from_settings(settings: Self::Settings) -> Self;

    /// Settings the engine was built with
    fn settings(&self) -> &Self::Settings;

    /// Deserialize `json` into a fully populated `T`
    fn deserialize<T: DeserializeOwned>(&self, json: &str) -> Result<T>;

    /// Serialize `value` into `writer` as exactly one JSON value
    fn serialize(&self, value: &dyn erased_serde::Serialize, writer: &mut dyn Write) -> Result<()>;
}
