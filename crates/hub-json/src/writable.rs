//! Self-writing values
//!
//! A type implementing [`JsonWritable`] takes full control of its JSON
//! output. When such a value is handed to a serializer as
//! [`Payload::Writable`](crate::Payload::Writable) the engine is bypassed
//! and the value writes straight into the sink.

use serde_json::value::RawValue;
use std::io::{self, Write};
use std::sync::Arc;

/// Opt-in contract for values that write their own JSON.
///
/// Implementations must write exactly one complete JSON value (object,
/// array or scalar) and nothing else. The only failures are the sink's own.
pub trait JsonWritable {
    /// Write this value's JSON representation to `writer`
    fn write_json(&self, writer: &mut dyn Write) -> io::Result<()>;
}

impl<T: JsonWritable + ?Sized> JsonWritable for &T {
    fn write_json(&self, writer: &mut dyn Write) -> io::Result<()> {
        (**self).write_json(writer)
    }
}

impl<T: JsonWritable + ?Sized> JsonWritable for Box<T> {
    fn write_json(&self, writer: &mut dyn Write) -> io::Result<()> {
        (**self).write_json(writer)
    }
}

impl<T: JsonWritable + ?Sized> JsonWritable for Arc<T> {
    fn write_json(&self, writer: &mut dyn Write) -> io::Result<()> {
        (**self).write_json(writer)
    }
}

// Pre-serialized JSON (cached responses, relayed messages) is copied verbatim.
impl JsonWritable for RawValue {
    fn write_json(&self, writer: &mut dyn Write) -> io::Result<()> {
        writer.write_all(self.get().as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker;

    impl JsonWritable for Marker {
        fn write_json(&self, writer: &mut dyn Write) -> io::Result<()> {
            writer.write_all(br#"{"marker":1}"#)
        }
    }

    #[test]
    fn test_raw_value_is_copied_verbatim() {
        let raw = RawValue::from_string("{ \"spaced\" : [1, 2] }".to_string()).unwrap();
        let mut out = Vec::new();
        raw.write_json(&mut out).unwrap();
        assert_eq!(out, b"{ \"spaced\" : [1, 2] }");
    }

    #[test]
    fn test_smart_pointers_forward() {
        let boxed: Box<dyn JsonWritable> = Box::new(Marker);
        let shared: Arc<dyn JsonWritable> = Arc::new(Marker);

        let mut out = Vec::new();
        boxed.write_json(&mut out).unwrap();
        shared.write_json(&mut out).unwrap();
        assert_eq!(out, br#"{"marker":1}{"marker":1}"#);
    }
}
