//! Serializer contract and the engine-backed adapter
//!
//! Hosts depend on [`JsonSerializer`] only. [`EngineSerializer`] implements
//! it on top of any [`JsonEngine`]; swapping the engine changes nothing on
//! the host side.

use crate::engine::{JsonEngine, SerdeJsonEngine};
use crate::error::{Result, SerializerError};
use crate::payload::Payload;
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use std::io::{Read, Write};

/// Parse and write operations exposed to the host framework.
///
/// Implementations hold no per-call state and may be shared across
/// threads.
///
/// The parse methods are generic over the target type, so the trait is not
/// object safe: hosts take `S: JsonSerializer` as a type parameter rather
/// than `dyn JsonSerializer`. Swapping the JSON library means choosing a
/// different `E` for [`EngineSerializer<E>`] or implementing [`JsonEngine`].
///
/// ```rust
/// use hub_json::{DefaultJsonSerializer, JsonSerializer, Payload};
///
/// fn send_ack<S: JsonSerializer>(serializer: &S, out: &mut Vec<u8>) -> hub_json::Result<()> {
///     serializer.serialize(Payload::value(&["ack"]), out)
/// }
///
/// let mut out = Vec::new();
/// send_ack(&DefaultJsonSerializer::new(), &mut out).unwrap();
/// assert_eq!(out, br#"["ack"]"#);
/// ```
pub trait JsonSerializer: Send + Sync {
    /// Deserialize `json` into a `T`.
    ///
    /// Fails without a partial result when the text is not JSON or does
    /// not fit the shape of `T`.
    fn parse<T: DeserializeOwned>(&self, json: &str) -> Result<T>;

    /// Read all of `reader` as UTF-8 text and parse it as a `T`.
    ///
    /// Errors raised by `reader` itself are source failures, whatever
    /// their kind; text that is not UTF-8 is malformed input.
    fn parse_reader<T: DeserializeOwned>(&self, reader: &mut dyn Read) -> Result<T>;

    /// Append exactly one JSON value for `value` to `writer`.
    ///
    /// A failed write may leave a partial fragment in `writer`.
    fn serialize(&self, value: Payload<'_>, writer: &mut dyn Write) -> Result<()>;

    /// Serialize `value` into a new string.
    fn stringify(&self, value: Payload<'_>) -> Result<String> {
        let mut buffer = Vec::new();
        self.serialize(value, &mut buffer)?;
        String::from_utf8(buffer).map_err(|err| SerializerError::UnsupportedValue(Box::new(err)))
    }
}

/// Serializer backed by a [`JsonEngine`].
///
/// Owns its engine exclusively; the engine's settings cannot change after
/// construction.
#[derive(Debug, Clone)]
pub struct EngineSerializer<E = SerdeJsonEngine> {
    engine: E,
}

/// Serializer over the reference `serde_json` engine
pub type DefaultJsonSerializer = EngineSerializer<SerdeJsonEngine>;

impl<E> EngineSerializer<E>
where
    E: JsonEngine,
    E::Settings: Default + std::fmt::Debug,
{
    /// Build a serializer with the engine's default settings
    pub fn new() -> Self {
        let settings = E::Settings::default();
        tracing::debug!(?settings, "building JSON serializer with default settings");
        Self::from_engine(E::from_settings(settings))
    }
}

impl<E> Default for EngineSerializer<E>
where
    E: JsonEngine,
    E::Settings: Default + std::fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EngineSerializer<E>
where
    E: JsonEngine,
    E::Settings: std::fmt::Debug,
{
    /// Build a serializer with caller-supplied settings.
    ///
    /// Absent settings are rejected with `InvalidArgument` before any
    /// engine is built.
    pub fn with_settings(settings: impl Into<Option<E::Settings>>) -> Result<Self> {
        let Some(settings) = settings.into() else {
            tracing::warn!("rejected JSON serializer construction without settings");
            return Err(SerializerError::InvalidArgument("settings"));
        };

        tracing::debug!(?settings, "building JSON serializer");
        Ok(Self::from_engine(E::from_settings(settings)))
    }
}

impl<E: JsonEngine> EngineSerializer<E> {
    /// Wrap an engine that is already built
    pub fn from_engine(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn settings(&self) -> &E::Settings {
        self.engine.settings()
    }
}

impl<E: JsonEngine> JsonSerializer for EngineSerializer<E> {
    fn parse<T: DeserializeOwned>(&self, json: &str) -> Result<T> {
        self.engine.deserialize(json)
    }

    fn parse_reader<T: DeserializeOwned>(&self, reader: &mut dyn Read) -> Result<T> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(SerializerError::SourceFailure)?;
        let json =
            String::from_utf8(bytes).map_err(|err| SerializerError::MalformedInput(Box::new(err)))?;
        self.engine.deserialize(&json)
    }

    fn serialize(&self, value: Payload<'_>, writer: &mut dyn Write) -> Result<()> {
        match value {
            Payload::Writable(writable) => writable
                .write_json(writer)
                .map_err(SerializerError::SinkFailure),
            Payload::Value(value) => self.engine.serialize(value, writer),
            Payload::Null => self.engine.serialize(&(), writer),
        }
    }
}

static DEFAULT_SERIALIZER: OnceCell<DefaultJsonSerializer> = OnceCell::new();

/// Process-wide serializer with default settings, built on first use
pub fn default_serializer() -> &'static DefaultJsonSerializer {
    DEFAULT_SERIALIZER.get_or_init(DefaultJsonSerializer::new)
}
