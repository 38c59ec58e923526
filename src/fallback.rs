//! Legacy structural fallback for values that are not a [`Value`].
//!
//! This is a best-effort escape hatch, kept apart from the dispatcher so it is
//! never applied implicitly. Any `T: Serialize` is mapped onto its nearest
//! built-in [`Value`]:
//!
//! | Serde shape | Value |
//! |-------------|-------|
//! | bool, integers, floats | the matching scalar variant |
//! | `char`, `str`, unit enum variant | `Text` |
//! | bytes | `Bytes` |
//! | `None`, unit, unit struct | `Null` |
//! | `Some`, newtype struct, newtype variant | the wrapped value, converted by the same rules |
//! | sequences, tuples, maps, structs | `Text` holding the JSON rendering |
//!
//! The JSON rendering of compound shapes is lossy (the column type is not
//! known here) and is only as good as the type's `Serialize` impl.
//!
//! ```rust
//! use pg_append::{append_serialize, QuoteMode};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Settings { theme: &'static str, beta: bool }
//!
//! let mut buf = Vec::new();
//! append_serialize(&mut buf, &Settings { theme: "dark", beta: true }, QuoteMode::Literal);
//! assert_eq!(buf, br#"'{"theme":"dark","beta":true}'"#);
//! ```

use crate::append::{append_error, append_value, try_append_value};
use crate::error::{Error, Result};
use crate::options::QuoteMode;
use crate::value::Value;
use num_bigint::BigInt;
use serde::ser::{self, Impossible};
use serde::Serialize;

/// Converts any `T: Serialize` into its nearest built-in [`Value`].
///
/// # Examples
///
/// ```rust
/// use pg_append::{to_value, Value};
///
/// assert_eq!(to_value(&Some(3u8)).unwrap(), Value::UInt(3));
/// assert_eq!(to_value(&None::<u8>).unwrap(), Value::Null);
/// assert_eq!(to_value(&vec![1, 2]).unwrap(), Value::Text("[1,2]".to_string()));
/// ```
///
/// # Errors
///
/// Returns an error if the type's `Serialize` impl fails, or if a compound
/// shape cannot be rendered as JSON (e.g. a map with non-string keys).
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    match value.serialize(ValueSerializer) {
        Err(Error::UnsupportedShape(shape)) => {
            tracing::trace!(shape = %shape, "rendering compound value as JSON text");
            Ok(Value::Text(serde_json::to_string(value)?))
        }
        other => other,
    }
}

/// Appends any `T: Serialize` through [`to_value`] and the dispatcher.
///
/// Never fails: a value that cannot be converted is rendered as a `?!(...)` marker.
pub fn append_serialize<T>(buf: &mut Vec<u8>, value: &T, quote: QuoteMode)
where
    T: ?Sized + Serialize,
{
    match to_value(value) {
        Ok(value) => append_value(buf, &value, quote),
        Err(err) => {
            tracing::debug!(error = %err, "structural fallback failed, writing marker");
            append_error(buf, &err);
        }
    }
}

/// Fallible form of [`append_serialize`].
///
/// # Errors
///
/// Returns the conversion error, or a delegate failure of a produced value.
/// The buffer is left unchanged on error.
pub fn try_append_serialize<T>(buf: &mut Vec<u8>, value: &T, quote: QuoteMode) -> Result<()>
where
    T: ?Sized + Serialize,
{
    let value = to_value(value)?;
    try_append_value(buf, &value, quote)
}

/// Serde serializer producing a scalar [`Value`].
///
/// Compound shapes are rejected with [`Error::UnsupportedShape`]; [`to_value`]
/// catches that and falls back to JSON.
pub struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = Impossible<Value, Error>;
    type SerializeTuple = Impossible<Value, Error>;
    type SerializeTupleStruct = Impossible<Value, Error>;
    type SerializeTupleVariant = Impossible<Value, Error>;
    type SerializeMap = Impossible<Value, Error>;
    type SerializeStruct = Impossible<Value, Error>;
    type SerializeStructVariant = Impossible<Value, Error>;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Int(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value> {
        Ok(Value::BigInt(BigInt::from(v)))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::UInt(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        Ok(Value::BigInt(BigInt::from(v)))
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Float32(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::Text(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::Text(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Bytes(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        to_value(value)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::Text(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        to_value(value)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        // The variant tag is dropped, compound payloads render as JSON on their own.
        to_value(value)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(Error::unsupported_shape("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(Error::unsupported_shape("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(Error::unsupported_shape("tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Error::unsupported_shape("tuple variant"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(Error::unsupported_shape("map"))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(Error::unsupported_shape("struct"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(Error::unsupported_shape("struct variant"))
    }
}
