//! Output formatter driven by engine settings

use serde_json::ser::Formatter;
use std::io::{self, Write};

/// Wraps a compact or pretty formatter and optionally escapes non-ASCII
/// characters in strings as `\uXXXX` (UTF-16 code units, lowercase hex).
pub(crate) struct SettingsFormatter<F> {
    inner: F,
    escape_non_ascii: bool,
}

impl<F: Formatter> SettingsFormatter<F> {
    pub(crate) fn new(inner: F, escape_non_ascii: bool) -> Self {
        Self {
            inner,
            escape_non_ascii,
        }
    }
}

impl<F: Formatter> Formatter for SettingsFormatter<F> {
    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn end_object_key<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_key(writer)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + Write>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()> {
        if !self.escape_non_ascii || fragment.is_ascii() {
            return self.inner.write_string_fragment(writer, fragment);
        }

        let mut start = 0;
        for (index, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            if start < index {
                writer.write_all(fragment[start..index].as_bytes())?;
            }
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = index + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use serde_json::ser::{CompactFormatter, PrettyFormatter};

    fn render<F: Formatter, T: Serialize>(formatter: F, value: &T) -> String {
        let mut out = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        value.serialize(&mut ser).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_escapes_bmp_and_astral_characters() {
        let formatter = SettingsFormatter::new(CompactFormatter, true);
        assert_eq!(render(formatter, &"caf\u{e9} \u{1F600}!"), r#""caf\u00e9 \ud83d\ude00!""#);
    }

    #[test]
    fn test_passthrough_when_disabled() {
        let formatter = SettingsFormatter::new(CompactFormatter, false);
        assert_eq!(render(formatter, &"caf\u{e9}"), "\"caf\u{e9}\"");
    }

    #[test]
    fn test_delegates_layout_to_inner() {
        let formatter = SettingsFormatter::new(PrettyFormatter::with_indent(b"\t"), false);
        assert_eq!(render(formatter, &vec![1, 2]), "[\n\t1,\n\t2\n]");
    }
}
