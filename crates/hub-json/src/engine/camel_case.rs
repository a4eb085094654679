//! Reading camel-cased documents back into Rust types
//!
//! When an engine writes camel-cased member names, incoming object keys
//! are matched against the target struct's field names through the same
//! renaming rule. Only struct members are renamed; map keys and
//! `serde_json::Value` targets see the document as written.

use super::transform::to_camel_case;
use serde::de::value::{MapDeserializer, SeqDeserializer, StringDeserializer};
use serde::de::{
    self, DeserializeSeed, Deserializer, EnumAccess, IntoDeserializer, VariantAccess, Visitor,
};
use serde::forward_to_deserialize_any;
use serde_json::{Error, Map, Value};

/// A parsed document whose struct members are looked up by camel-cased name
pub(crate) struct CamelCaseValue(Value);

impl CamelCaseValue {
    pub(crate) fn new(value: Value) -> Self {
        Self(value)
    }
}

impl<'de> IntoDeserializer<'de, Error> for CamelCaseValue {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

/// Map a document key onto the field it was written from.
///
/// Exact field names win, so input that was written without renaming
/// still reads.
fn field_for_key(key: String, fields: &'static [&'static str]) -> String {
    if fields.contains(&key.as_str()) {
        return key;
    }
    fields
        .iter()
        .find(|field| to_camel_case(field) == key)
        .map_or(key, |field| (*field).to_string())
}

fn visit_array<'de, V: Visitor<'de>>(items: Vec<Value>, visitor: V) -> Result<V::Value, Error> {
    let mut access: SeqDeserializer<_, Error> =
        SeqDeserializer::new(items.into_iter().map(CamelCaseValue));
    let value = visitor.visit_seq(&mut access)?;
    access.end()?;
    Ok(value)
}

fn visit_object<'de, V: Visitor<'de>>(
    members: Map<String, Value>,
    fields: Option<&'static [&'static str]>,
    visitor: V,
) -> Result<V::Value, Error> {
    let entries = members.into_iter().map(|(key, value)| {
        let key = match fields {
            Some(fields) => field_for_key(key, fields),
            None => key,
        };
        (key, CamelCaseValue(value))
    });
    let mut access: MapDeserializer<'de, _, Error> = MapDeserializer::new(entries);
    let value = visitor.visit_map(&mut access)?;
    access.end()?;
    Ok(value)
}

impl<'de> Deserializer<'de> for CamelCaseValue {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.0 {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Number(number) => {
                if let Some(n) = number.as_u64() {
                    visitor.visit_u64(n)
                } else if let Some(n) = number.as_i64() {
                    visitor.visit_i64(n)
                } else if let Some(n) = number.as_f64() {
                    visitor.visit_f64(n)
                } else {
                    Err(de::Error::custom(format_args!("number {number} out of range")))
                }
            }
            Value::String(text) => visitor.visit_string(text),
            Value::Array(items) => visit_array(items, visitor),
            Value::Object(members) => visit_object(members, None, visitor),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.0 {
            Value::Null => visitor.visit_none(),
            other => visitor.visit_some(CamelCaseValue(other)),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        match self.0 {
            Value::Object(members) => visit_object(members, Some(fields), visitor),
            other => CamelCaseValue(other).deserialize_any(visitor),
        }
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        match self.0 {
            Value::String(variant) => {
                let variant: StringDeserializer<Error> = variant.into_deserializer();
                visitor.visit_enum(variant)
            }
            Value::Object(members) => {
                let mut members = members.into_iter();
                match (members.next(), members.next()) {
                    (Some((variant, value)), None) => visitor.visit_enum(Variant { variant, value }),
                    _ => Err(de::Error::invalid_length(2, &"an object with a single key")),
                }
            }
            _ => Err(de::Error::custom("expected a string or an object for an enum")),
        }
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map identifier
    }
}

/// `{"Variant": value}` form of an enum
struct Variant {
    variant: String,
    value: Value,
}

impl<'de> EnumAccess<'de> for Variant {
    type Error = Error;
    type Variant = VariantValue;

    fn variant_seed<S: DeserializeSeed<'de>>(self, seed: S) -> Result<(S::Value, VariantValue), Error> {
        let name: StringDeserializer<Error> = self.variant.into_deserializer();
        let variant = seed.deserialize(name)?;
        Ok((variant, VariantValue(self.value)))
    }
}

struct VariantValue(Value);

impl<'de> VariantAccess<'de> for VariantValue {
    type Error = Error;

    fn unit_variant(self) -> Result<(), Error> {
        match self.0 {
            Value::Null => Ok(()),
            _ => Err(de::Error::custom("expected null for a unit variant")),
        }
    }

    fn newtype_variant_seed<S: DeserializeSeed<'de>>(self, seed: S) -> Result<S::Value, Error> {
        seed.deserialize(CamelCaseValue(self.0))
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value, Error> {
        CamelCaseValue(self.0).deserialize_any(visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        CamelCaseValue(self.0).deserialize_struct("", fields, visitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn read<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, Error> {
        T::deserialize(CamelCaseValue::new(value))
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct Invocation {
        hub_name: String,
        invocation_id: Option<u32>,
        arguments: Vec<Argument>,
        headers: BTreeMap<String, String>,
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct Argument {
        arg_kind: Kind,
    }

    #[derive(Debug, PartialEq, Deserialize)]
    enum Kind {
        Text,
        Count(u8),
        Range { start_at: u8, end_at: u8 },
    }

    #[test]
    fn test_camel_cased_members_map_to_fields() {
        let invocation: Invocation = read(json!({
            "hubName": "chat",
            "invocationId": 4,
            "arguments": [
                {"argKind": "Text"},
                {"argKind": {"Count": 2}},
                {"argKind": {"Range": {"startAt": 1, "endAt": 3}}}
            ],
            "headers": {"trace_id": "t1"}
        }))
        .unwrap();

        assert_eq!(invocation.hub_name, "chat");
        assert_eq!(invocation.invocation_id, Some(4));
        assert_eq!(
            invocation.arguments,
            vec![
                Argument { arg_kind: Kind::Text },
                Argument { arg_kind: Kind::Count(2) },
                Argument {
                    arg_kind: Kind::Range { start_at: 1, end_at: 3 }
                },
            ]
        );
        // Map keys are not renamed
        assert_eq!(invocation.headers.get("trace_id").map(String::as_str), Some("t1"));
    }

    #[test]
    fn test_original_field_names_still_read() {
        let argument: Argument = read(json!({"arg_kind": {"Count": 1}})).unwrap();
        assert_eq!(argument.arg_kind, Kind::Count(1));
    }

    #[test]
    fn test_values_are_left_as_written() {
        let value: Value = read(json!({"displayName": "ada", "user_id": null})).unwrap();
        assert_eq!(value, json!({"displayName": "ada", "user_id": null}));
    }

    #[test]
    fn test_missing_member_is_reported() {
        let err = read::<Argument>(json!({"kind": "Text"})).unwrap_err();
        assert!(err.to_string().contains("missing field `arg_kind`"));
        assert!(err.is_data());
    }
}
