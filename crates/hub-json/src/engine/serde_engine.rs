//! Reference engine backed by `serde_json`

use super::camel_case::CamelCaseValue;
use super::depth::exceeds_depth;
use super::formatter::SettingsFormatter;
use super::transform::{Rewritten, Rules};
use super::JsonEngine;
use crate::error::{Result, SerializerError};
use crate::settings::{Formatting, JsonSettings, NamingConvention};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter};
use std::io::{self, Write};

/// `serde_json` engine configured by [`JsonSettings`].
///
/// Holds nothing but its settings, so one instance can serve any number
/// of concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct SerdeJsonEngine {
    settings: JsonSettings,
}

impl SerdeJsonEngine {
    pub fn new(settings: JsonSettings) -> Self {
        Self { settings }
    }

    fn emit<T: ?Sized + Serialize>(&self, value: &T, writer: &mut dyn Write) -> Result<()> {
        let escape = self.settings.escape_non_ascii;
        match self.settings.formatting {
            Formatting::Compact => {
                write_with(writer, value, SettingsFormatter::new(CompactFormatter, escape))
            }
            Formatting::Indented => {
                let pretty = PrettyFormatter::with_indent(self.settings.indent.as_bytes());
                write_with(writer, value, SettingsFormatter::new(pretty, escape))
            }
        }
    }
}

impl JsonEngine for SerdeJsonEngine {
    type Settings = JsonSettings;

    fn from_settings(settings: JsonSettings) -> Self {
        Self::new(settings)
    }

    fn settings(&self) -> &JsonSettings {
        &self.settings
    }

    fn deserialize<T: DeserializeOwned>(&self, json: &str) -> Result<T> {
        if let Some(limit) = self.settings.max_depth {
            if exceeds_depth(json, limit) {
                return Err(SerializerError::DepthLimitExceeded { limit });
            }
        }

        if self.settings.naming == NamingConvention::CamelCase {
            let document: serde_json::Value =
                serde_json::from_str(json).map_err(SerializerError::from_read)?;
            return T::deserialize(CamelCaseValue::new(document))
                .map_err(SerializerError::from_read);
        }

        serde_json::from_str(json).map_err(SerializerError::from_read)
    }

    fn serialize(&self, value: &dyn erased_serde::Serialize, writer: &mut dyn Write) -> Result<()> {
        let rules = Rules::from_settings(&self.settings);
        if rules.is_active() {
            return self.emit(&Rewritten::new(value, rules), writer);
        }

        self.emit(value, writer)
    }
}

fn write_with<T, F>(writer: &mut dyn Write, value: &T, formatter: F) -> Result<()>
where
    T: ?Sized + Serialize,
    F: Formatter,
{
    let mut sink = SinkGuard::new(writer);
    let result = {
        let mut ser = serde_json::Serializer::with_formatter(&mut sink, formatter);
        value.serialize(&mut ser)
    };

    match (result, sink.failure.take()) {
        (Ok(()), _) => Ok(()),
        (Err(_), Some(failure)) => Err(SerializerError::SinkFailure(failure)),
        (Err(err), None) => Err(SerializerError::from_write(err)),
    }
}

/// Remembers the first error the caller's sink raised.
///
/// Type-erased values can re-wrap serializer errors on their way back out,
/// so the sink's own `io::Error` is kept here and surfaced unchanged.
struct SinkGuard<'w> {
    inner: &'w mut dyn Write,
    failure: Option<io::Error>,
}

impl<'w> SinkGuard<'w> {
    fn new(inner: &'w mut dyn Write) -> Self {
        Self {
            inner,
            failure: None,
        }
    }

    fn record(&mut self, err: io::Error) -> io::Error {
        if err.kind() == io::ErrorKind::Interrupted {
            return err;
        }
        let kind = err.kind();
        self.failure.get_or_insert(err);
        io::Error::from(kind)
    }
}

impl Write for SinkGuard<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.inner.write(buf) {
            Ok(written) => Ok(written),
            Err(err) => Err(self.record(err)),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.inner.flush() {
            Ok(()) => Ok(()),
            Err(err) => Err(self.record(err)),
        }
    }
}
