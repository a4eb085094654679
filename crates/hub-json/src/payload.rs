//! Values handed to a serializer for writing

use crate::writable::JsonWritable;
use serde::Serialize;
use std::fmt;

/// A value to be written as JSON.
///
/// The variant decides the write path: self-writing values go straight to
/// the sink, everything else goes through the engine.
#[derive(Clone, Copy)]
pub enum Payload<'a> {
    /// Written as `null` by the engine
    Null,
    /// Writes its own JSON; the engine is never consulted
    Writable(&'a dyn JsonWritable),
    /// Serialized generically by the engine
    Value(&'a dyn erased_serde::Serialize),
}

impl<'a> Payload<'a> {
    pub fn writable<T: JsonWritable>(value: &'a T) -> Self {
        Payload::Writable(value)
    }

    pub fn value<T: Serialize>(value: &'a T) -> Self {
        Payload::Value(value)
    }

    /// `None` becomes [`Payload::Null`]
    pub fn optional<T: Serialize>(value: Option<&'a T>) -> Self {
        value.map_or(Payload::Null, Payload::value)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Payload::Null)
    }

    pub fn is_writable(&self) -> bool {
        matches!(self, Payload::Writable(_))
    }
}

impl<'a, T: Serialize> From<&'a T> for Payload<'a> {
    fn from(value: &'a T) -> Self {
        Payload::Value(value)
    }
}

impl fmt::Debug for Payload<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Null => f.write_str("Null"),
            Payload::Writable(_) => f.write_str("Writable(..)"),
            Payload::Value(_) => f.write_str("Value(..)"),
        }
    }
}
