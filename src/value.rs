//! Dynamic value representation for SQL encoding.
//!
//! This module provides the [`Value`] enum which represents anything the
//! dispatcher knows how to render, plus the two extension points user types
//! implement to take part in encoding.
//!
//! ## Core Types
//!
//! - [`Value`]: null, bool, integers, big integers, floats, text, timestamp, bytes,
//!   and the two extension variants
//! - [`AppendSql`]: a value that appends its own SQL form
//! - [`SqlValuer`]: a value that produces an underlying [`Value`] to be encoded instead
//!
//! ## Creating Values
//!
//! ```rust
//! use pg_append::Value;
//!
//! let null = Value::Null;
//! let flag = Value::from(true);
//! let small = Value::from(-42i8);
//! let text = Value::from("hello");
//! let maybe = Value::from(None::<i32>);
//!
//! assert!(maybe.is_null());
//! assert_eq!(small.as_i64(), Some(-42));
//! assert_eq!(text.as_str(), Some("hello"));
//! assert_eq!(flag.to_string(), "TRUE");
//! ```
//!
//! ## Extension Points
//!
//! ```rust
//! use pg_append::{append_value, AppendSql, BoxError, QuoteMode, Value};
//!
//! #[derive(Debug)]
//! struct Point { x: i32, y: i32 }
//!
//! impl AppendSql for Point {
//!     fn append_sql(&self, buf: &mut Vec<u8>, quote: QuoteMode) -> Result<(), BoxError> {
//!         let text = format!("({},{})", self.x, self.y);
//!         pg_append::append_text(buf, &text, quote);
//!         Ok(())
//!     }
//! }
//!
//! let mut buf = Vec::new();
//! append_value(&mut buf, &Value::appender(Point { x: 1, y: 2 }), QuoteMode::Literal);
//! assert_eq!(buf, b"'(1,2)'");
//! ```

use crate::error::BoxError;
use crate::options::QuoteMode;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use num_bigint::BigInt;
use std::fmt;
use std::sync::Arc;

/// A value that knows how to append its own encoded form.
///
/// Implementations append to `buf` and may fail; on failure whatever they wrote
/// is discarded and the dispatcher renders an error marker (or returns the
/// error, depending on the entry point).
pub trait AppendSql: fmt::Debug + Send + Sync {
    fn append_sql(&self, buf: &mut Vec<u8>, quote: QuoteMode) -> Result<(), BoxError>;
}

/// A value that yields an underlying [`Value`] to be encoded in its place.
///
/// The produced value is dispatched again, so it may itself be an extension value.
pub trait SqlValuer: fmt::Debug + Send + Sync {
    fn sql_value(&self) -> Result<Value, BoxError>;
}

/// Any value the dispatcher can render.
///
/// # Examples
///
/// ```rust
/// use pg_append::Value;
///
/// assert!(Value::Null.is_null());
/// assert!(Value::from(1.5).is_float());
/// assert!(Value::from(vec![0xdeu8, 0xad]).is_bytes());
/// ```
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    BigInt(BigInt),
    Float32(f32),
    Float(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
    Bytes(Vec<u8>),
    Appender(Arc<dyn AppendSql>),
    Valuer(Arc<dyn SqlValuer>),
}

impl Value {
    /// Wraps a self-encoding value.
    pub fn appender<A: AppendSql + 'static>(value: A) -> Self {
        Value::Appender(Arc::new(value))
    }

    /// Wraps an indirect value.
    pub fn valuer<V: SqlValuer + 'static>(value: V) -> Self {
        Value::Valuer(Arc::new(value))
    }

    /// Returns `true` if the value is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if the value is a boolean.
    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns `true` for signed, unsigned and big integers.
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Value::Int(_) | Value::UInt(_) | Value::BigInt(_))
    }

    /// Returns `true` for both float widths.
    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Value::Float32(_) | Value::Float(_))
    }

    /// Returns `true` if the value is text.
    #[inline]
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }

    /// Returns `true` if the value is a byte sequence.
    #[inline]
    #[must_use]
    pub const fn is_bytes(&self) -> bool {
        matches!(self, Value::Bytes(_))
    }

    /// Returns `true` for the two extension variants.
    #[inline]
    #[must_use]
    pub const fn is_extension(&self) -> bool {
        matches!(self, Value::Appender(_) | Value::Valuer(_))
    }

    /// A short name of the variant, used in log output.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::BigInt(_) => "bigint",
            Value::Float32(_) => "float32",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Timestamp(_) => "timestamp",
            Value::Bytes(_) => "bytes",
            Value::Appender(_) => "appender",
            Value::Valuer(_) => "valuer",
        }
    }

    /// If the value is a boolean, returns it.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is an integer that fits in `i64`, returns it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pg_append::Value;
    ///
    /// assert_eq!(Value::from(7u16).as_i64(), Some(7));
    /// assert_eq!(Value::from(u64::MAX).as_i64(), None);
    /// assert_eq!(Value::from("7").as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::UInt(u) => i64::try_from(*u).ok(),
            Value::BigInt(b) => i64::try_from(b).ok(),
            _ => None,
        }
    }

    /// If the value is text, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is a byte sequence, returns it.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// If the value is a timestamp, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_timestamp(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::Float32(a), Value::Float32(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            // Extension values compare by identity.
            (Value::Appender(a), Value::Appender(b)) => Arc::ptr_eq(a, b),
            (Value::Valuer(a), Value::Valuer(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Renders the value as a SQL literal, the way [`append_value`](crate::append_value)
/// does with [`QuoteMode::Literal`].
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Vec::new();
        crate::append::append_value(&mut buf, self, QuoteMode::Literal);
        f.write_str(&String::from_utf8_lossy(&buf))
    }
}

macro_rules! impl_from_int {
    ($variant:ident, $target:ty; $($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value as $target)
                }
            }
        )*
    };
}

impl_from_int!(Int, i64; i8, i16, i32, i64, isize);
impl_from_int!(UInt, u64; u8, u16, u32, u64, usize);

impl From<i128> for Value {
    fn from(value: i128) -> Self {
        Value::BigInt(BigInt::from(value))
    }
}

impl From<u128> for Value {
    fn from(value: u128) -> Self {
        Value::BigInt(BigInt::from(value))
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::BigInt(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float32(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    fn from(value: DateTime<Tz>) -> Self {
        Value::Timestamp(value.with_timezone(&Utc))
    }
}

/// Naive timestamps are taken to be UTC.
impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::Timestamp(Utc.from_utc_datetime(&value))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
