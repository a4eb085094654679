//! Settings for the reference JSON engine
//!
//! `JsonSettings` is built once and handed to an engine at construction.
//! The serializer treats it as an opaque bundle; only
//! [`SerdeJsonEngine`](crate::SerdeJsonEngine) interprets the fields.
//!
//! All fields use `#[serde(default)]`, so hosts can load partial settings
//! from their own configuration documents.

use serde::{Deserialize, Serialize};

/// Nesting limit applied to reads unless configured otherwise
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Indent unit used for indented output unless configured otherwise
pub const DEFAULT_INDENT: &str = "  ";

/// Whitespace in written JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Formatting {
    #[default]
    Compact,
    Indented,
}

/// What to do with struct members whose value is `null`
///
/// Map entries and `serde_json::Value` contents are written as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NullValueHandling {
    #[default]
    Include,
    Ignore,
}

/// How struct member names appear in JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NamingConvention {
    #[default]
    Preserve,
    /// `request_id` is written as `requestId` and read back from either
    /// form. Map keys and `serde_json::Value` contents keep their names.
    /// Two members that rename to the same name fail the write.
    CamelCase,
}

/// Engine settings bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JsonSettings {
    pub formatting: Formatting,

    /// Indent unit, only used with [`Formatting::Indented`]
    pub indent: String,

    pub null_values: NullValueHandling,

    pub naming: NamingConvention,

    /// Write non-ASCII characters in strings as `\uXXXX` escapes
    pub escape_non_ascii: bool,

    /// Maximum nesting depth accepted when reading; `None` disables the check
    pub max_depth: Option<usize>,
}

impl Default for JsonSettings {
    fn default() -> Self {
        Self {
            formatting: Formatting::Compact,
            indent: DEFAULT_INDENT.to_string(),
            null_values: NullValueHandling::Include,
            naming: NamingConvention::Preserve,
            escape_non_ascii: false,
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}

impl JsonSettings {
    pub fn with_formatting(mut self, formatting: Formatting) -> Self {
        self.formatting = formatting;
        self
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn with_null_values(mut self, null_values: NullValueHandling) -> Self {
        self.null_values = null_values;
        self
    }

    pub fn with_naming(mut self, naming: NamingConvention) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_escape_non_ascii(mut self, escape: bool) -> Self {
        self.escape_non_ascii = escape;
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }
}
