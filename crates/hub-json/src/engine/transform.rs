//! Rewrites applied to values while they are written
//!
//! Only used when the settings ask for camel-cased member names or dropped
//! nulls. The rules apply to struct members; map keys and the contents of
//! `serde_json::Value` payloads are written as given. Values still stream
//! straight into the sink, so numbers keep their exact representation.

use crate::settings::{JsonSettings, NamingConvention, NullValueHandling};
use once_cell::sync::Lazy;
use serde::ser::{
    self, Impossible, Serialize, SerializeMap, SerializeSeq, SerializeStruct,
    SerializeStructVariant, SerializeTuple, SerializeTupleStruct, SerializeTupleVariant,
    Serializer,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

// Struct name serde_json uses to smuggle pre-serialized text through a serializer
const RAW_VALUE_TOKEN: &str = "$serde_json::private::RawValue";

/// Which rewrites are active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Rules {
    pub(crate) camel_case: bool,
    pub(crate) drop_nulls: bool,
}

impl Rules {
    pub(crate) fn from_settings(settings: &JsonSettings) -> Self {
        Self {
            camel_case: settings.naming == NamingConvention::CamelCase,
            drop_nulls: settings.null_values == NullValueHandling::Ignore,
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.camel_case || self.drop_nulls
    }
}

/// A value serialized with `rules` applied at every level
pub(crate) struct Rewritten<'a, T: ?Sized> {
    value: &'a T,
    rules: Rules,
}

impl<'a, T: ?Sized> Rewritten<'a, T> {
    pub(crate) fn new(value: &'a T, rules: Rules) -> Self {
        Self { value, rules }
    }
}

impl<T: ?Sized + Serialize> Serialize for Rewritten<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(RewriteSerializer {
            inner: serializer,
            rules: self.rules,
        })
    }
}

struct RewriteSerializer<S> {
    inner: S,
    rules: Rules,
}

impl<S> RewriteSerializer<S> {
    fn wrap<'a, T: ?Sized>(&self, value: &'a T) -> Rewritten<'a, T> {
        Rewritten::new(value, self.rules)
    }
}

impl<S: Serializer> Serializer for RewriteSerializer<S> {
    type Ok = S::Ok;
    type Error = S::Error;
    type SerializeSeq = Nested<S::SerializeSeq>;
    type SerializeTuple = Nested<S::SerializeTuple>;
    type SerializeTupleStruct = Nested<S::SerializeTupleStruct>;
    type SerializeTupleVariant = Nested<S::SerializeTupleVariant>;
    type SerializeMap = Nested<S::SerializeMap>;
    type SerializeStruct = Members<S::SerializeStruct>;
    type SerializeStructVariant = Members<S::SerializeStructVariant>;

    fn serialize_bool(self, v: bool) -> Result<S::Ok, S::Error> {
        self.inner.serialize_bool(v)
    }

    fn serialize_i8(self, v: i8) -> Result<S::Ok, S::Error> {
        self.inner.serialize_i8(v)
    }

    fn serialize_i16(self, v: i16) -> Result<S::Ok, S::Error> {
        self.inner.serialize_i16(v)
    }

    fn serialize_i32(self, v: i32) -> Result<S::Ok, S::Error> {
        self.inner.serialize_i32(v)
    }

    fn serialize_i64(self, v: i64) -> Result<S::Ok, S::Error> {
        self.inner.serialize_i64(v)
    }

    fn serialize_i128(self, v: i128) -> Result<S::Ok, S::Error> {
        self.inner.serialize_i128(v)
    }

    fn serialize_u8(self, v: u8) -> Result<S::Ok, S::Error> {
        self.inner.serialize_u8(v)
    }

    fn serialize_u16(self, v: u16) -> Result<S::Ok, S::Error> {
        self.inner.serialize_u16(v)
    }

    fn serialize_u32(self, v: u32) -> Result<S::Ok, S::Error> {
        self.inner.serialize_u32(v)
    }

    fn serialize_u64(self, v: u64) -> Result<S::Ok, S::Error> {
        self.inner.serialize_u64(v)
    }

    fn serialize_u128(self, v: u128) -> Result<S::Ok, S::Error> {
        self.inner.serialize_u128(v)
    }

    fn serialize_f32(self, v: f32) -> Result<S::Ok, S::Error> {
        self.inner.serialize_f32(v)
    }

    fn serialize_f64(self, v: f64) -> Result<S::Ok, S::Error> {
        self.inner.serialize_f64(v)
    }

    fn serialize_char(self, v: char) -> Result<S::Ok, S::Error> {
        self.inner.serialize_char(v)
    }

    fn serialize_str(self, v: &str) -> Result<S::Ok, S::Error> {
        self.inner.serialize_str(v)
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<S::Ok, S::Error> {
        self.inner.serialize_bytes(v)
    }

    fn serialize_none(self) -> Result<S::Ok, S::Error> {
        self.inner.serialize_none()
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<S::Ok, S::Error> {
        let value = self.wrap(value);
        self.inner.serialize_some(&value)
    }

    fn serialize_unit(self) -> Result<S::Ok, S::Error> {
        self.inner.serialize_unit()
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<S::Ok, S::Error> {
        self.inner.serialize_unit_struct(name)
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
    ) -> Result<S::Ok, S::Error> {
        self.inner.serialize_unit_variant(name, variant_index, variant)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<S::Ok, S::Error> {
        let value = self.wrap(value);
        self.inner.serialize_newtype_struct(name, &value)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<S::Ok, S::Error> {
        let value = self.wrap(value);
        self.inner
            .serialize_newtype_variant(name, variant_index, variant, &value)
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq, S::Error> {
        Ok(Nested::new(self.inner.serialize_seq(len)?, self.rules))
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple, S::Error> {
        Ok(Nested::new(self.inner.serialize_tuple(len)?, self.rules))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct, S::Error> {
        Ok(Nested::new(self.inner.serialize_tuple_struct(name, len)?, self.rules))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant, S::Error> {
        let inner = self
            .inner
            .serialize_tuple_variant(name, variant_index, variant, len)?;
        Ok(Nested::new(inner, self.rules))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap, S::Error> {
        Ok(Nested::new(self.inner.serialize_map(len)?, self.rules))
    }

    fn serialize_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStruct, S::Error> {
        let inner = self.inner.serialize_struct(name, len)?;
        if name == RAW_VALUE_TOKEN {
            return Ok(Members::verbatim(inner));
        }
        Ok(Members::new(inner, self.rules, len))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant, S::Error> {
        let inner = self
            .inner
            .serialize_struct_variant(name, variant_index, variant, len)?;
        Ok(Members::new(inner, self.rules, len))
    }

    fn is_human_readable(&self) -> bool {
        self.inner.is_human_readable()
    }
}

/// Sequences, tuples and maps: elements are rewritten, map keys are not
struct Nested<C> {
    inner: C,
    rules: Rules,
}

impl<C> Nested<C> {
    fn new(inner: C, rules: Rules) -> Self {
        Self { inner, rules }
    }
}

impl<C: SerializeSeq> SerializeSeq for Nested<C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), C::Error> {
        self.inner.serialize_element(&Rewritten::new(value, self.rules))
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        self.inner.end()
    }
}

impl<C: SerializeTuple> SerializeTuple for Nested<C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), C::Error> {
        self.inner.serialize_element(&Rewritten::new(value, self.rules))
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        self.inner.end()
    }
}

impl<C: SerializeTupleStruct> SerializeTupleStruct for Nested<C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), C::Error> {
        self.inner.serialize_field(&Rewritten::new(value, self.rules))
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        self.inner.end()
    }
}

impl<C: SerializeTupleVariant> SerializeTupleVariant for Nested<C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), C::Error> {
        self.inner.serialize_field(&Rewritten::new(value, self.rules))
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        self.inner.end()
    }
}

impl<C: SerializeMap> SerializeMap for Nested<C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), C::Error> {
        self.inner.serialize_key(key)
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), C::Error> {
        self.inner.serialize_value(&Rewritten::new(value, self.rules))
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        self.inner.end()
    }
}

/// Struct members: renamed, null members skipped, duplicates rejected
struct Members<C> {
    inner: C,
    rules: Option<Rules>,
    written: Vec<&'static str>,
}

impl<C> Members<C> {
    fn new(inner: C, rules: Rules, len: usize) -> Self {
        let written = if rules.camel_case {
            Vec::with_capacity(len)
        } else {
            Vec::new()
        };
        Self {
            inner,
            rules: Some(rules),
            written,
        }
    }

    fn verbatim(inner: C) -> Self {
        Self {
            inner,
            rules: None,
            written: Vec::new(),
        }
    }

    fn member_name<E: ser::Error>(&mut self, key: &'static str) -> Result<&'static str, E> {
        if !self.rules.is_some_and(|rules| rules.camel_case) {
            return Ok(key);
        }

        let name = camel_case_member(key);
        if self.written.contains(&name) {
            return Err(E::custom(format_args!(
                "duplicate member name `{name}` after renaming `{key}`"
            )));
        }
        self.written.push(name);
        Ok(name)
    }
}

impl<C: SerializeStruct> SerializeStruct for Members<C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), C::Error> {
        let Some(rules) = self.rules else {
            return self.inner.serialize_field(key, value);
        };
        if rules.drop_nulls && is_null(value) {
            return self.inner.skip_field(key);
        }
        let name = self.member_name(key)?;
        self.inner.serialize_field(name, &Rewritten::new(value, rules))
    }

    fn skip_field(&mut self, key: &'static str) -> Result<(), C::Error> {
        self.inner.skip_field(key)
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        self.inner.end()
    }
}

impl<C: SerializeStructVariant> SerializeStructVariant for Members<C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), C::Error> {
        let Some(rules) = self.rules else {
            return self.inner.serialize_field(key, value);
        };
        if rules.drop_nulls && is_null(value) {
            return self.inner.skip_field(key);
        }
        let name = self.member_name(key)?;
        self.inner.serialize_field(name, &Rewritten::new(value, rules))
    }

    fn skip_field(&mut self, key: &'static str) -> Result<(), C::Error> {
        self.inner.skip_field(key)
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        self.inner.end()
    }
}

// Member names are `&'static str` and form a closed set per program, so
// their camel-cased forms are interned once.
static CAMEL_CASE_MEMBERS: Lazy<RwLock<HashMap<&'static str, &'static str>>> =
    Lazy::new(Default::default);

fn camel_case_member(name: &'static str) -> &'static str {
    let known = CAMEL_CASE_MEMBERS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .copied();
    if let Some(camel) = known {
        return camel;
    }

    let camel = to_camel_case(name);
    let mut members = CAMEL_CASE_MEMBERS
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    *members.entry(name).or_insert_with(|| {
        if camel == name {
            name
        } else {
            Box::leak(camel.into_boxed_str())
        }
    })
}

/// Whether `value` writes as a bare JSON `null`
fn is_null<T: ?Sized + Serialize>(value: &T) -> bool {
    value.serialize(NullCheck).is_ok()
}

/// Succeeds only for values that serde_json writes as `null`
struct NullCheck;

#[derive(Debug)]
struct NotNull;

impl fmt::Display for NotNull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("not null")
    }
}

impl std::error::Error for NotNull {}

impl ser::Error for NotNull {
    fn custom<T: fmt::Display>(_msg: T) -> Self {
        NotNull
    }
}

impl Serializer for NullCheck {
    type Ok = ();
    type Error = NotNull;
    type SerializeSeq = Impossible<(), NotNull>;
    type SerializeTuple = Impossible<(), NotNull>;
    type SerializeTupleStruct = Impossible<(), NotNull>;
    type SerializeTupleVariant = Impossible<(), NotNull>;
    type SerializeMap = Impossible<(), NotNull>;
    type SerializeStruct = Impossible<(), NotNull>;
    type SerializeStructVariant = Impossible<(), NotNull>;

    fn serialize_none(self) -> Result<(), NotNull> {
        Ok(())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<(), NotNull> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<(), NotNull> {
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<(), NotNull> {
        Ok(())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<(), NotNull> {
        value.serialize(self)
    }

    fn serialize_bool(self, _v: bool) -> Result<(), NotNull> {
        Err(NotNull)
    }

    fn serialize_i8(self, _v: i8) -> Result<(), NotNull> {
        Err(NotNull)
    }

    fn serialize_i16(self, _v: i16) -> Result<(), NotNull> {
        Err(NotNull)
    }

    fn serialize_i32(self, _v: i32) -> Result<(), NotNull> {
        Err(NotNull)
    }

    fn serialize_i64(self, _v: i64) -> Result<(), NotNull> {
        Err(NotNull)
    }

    fn serialize_u8(self, _v: u8) -> Result<(), NotNull> {
        Err(NotNull)
    }

    fn serialize_u16(self, _v: u16) -> Result<(), NotNull> {
        Err(NotNull)
    }

    fn serialize_u32(self, _v: u32) -> Result<(), NotNull> {
        Err(NotNull)
    }

    fn serialize_u64(self, _v: u64) -> Result<(), NotNull> {
        Err(NotNull)
    }

    fn serialize_f32(self, _v: f32) -> Result<(), NotNull> {
        Err(NotNull)
    }

    fn serialize_f64(self, _v: f64) -> Result<(), NotNull> {
        Err(NotNull)
    }

    fn serialize_char(self, _v: char) -> Result<(), NotNull> {
        Err(NotNull)
    }

    fn serialize_str(self, _v: &str) -> Result<(), NotNull> {
        Err(NotNull)
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<(), NotNull> {
        Err(NotNull)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<(), NotNull> {
        Err(NotNull)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<(), NotNull> {
        Err(NotNull)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, NotNull> {
        Err(NotNull)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, NotNull> {
        Err(NotNull)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, NotNull> {
        Err(NotNull)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, NotNull> {
        Err(NotNull)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, NotNull> {
        Err(NotNull)
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, NotNull> {
        Err(NotNull)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, NotNull> {
        Err(NotNull)
    }
}

/// Camel-case a member name.
///
/// `snake_case` names are joined (`user_name` → `userName`); a leading
/// run of capitals is lowered up to the last capital of the run
/// (`URLValue` → `urlValue`, `ID` → `id`). Leading underscores are kept.
pub(crate) fn to_camel_case(name: &str) -> String {
    let trimmed = name.trim_start_matches('_');
    let prefix = &name[..name.len() - trimmed.len()];

    let mut segments = trimmed.split('_').filter(|segment| !segment.is_empty());
    let Some(first) = segments.next() else {
        return name.to_string();
    };

    let mut out = String::with_capacity(name.len());
    out.push_str(prefix);
    out.push_str(&lower_leading_capitals(first));
    for segment in segments {
        let mut chars = segment.chars();
        if let Some(head) = chars.next() {
            out.extend(head.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

fn lower_leading_capitals(segment: &str) -> String {
    let chars: Vec<char> = segment.chars().collect();
    let mut out = String::with_capacity(segment.len());

    for (index, ch) in chars.iter().enumerate() {
        if !ch.is_uppercase() {
            out.extend(chars[index..].iter());
            return out;
        }
        // Keep the capital that starts the next word: "URLValue" -> "urlValue"
        let next_is_lower = chars.get(index + 1).is_some_and(|next| !next.is_uppercase());
        if index > 0 && next_is_lower {
            out.extend(chars[index..].iter());
            return out;
        }
        out.extend(ch.to_lowercase());
    }

    out
}
