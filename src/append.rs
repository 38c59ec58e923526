//! SQL text encoders.
//!
//! Every function in this module appends to a caller-owned `Vec<u8>` in a single
//! pass and never fails. [`append_value`] is the general entry point: it selects
//! the encoder matching the [`Value`] variant and renders failures of
//! user-supplied values as an inline `?!(...)` marker. [`try_append_value`] is
//! its fallible twin.
//!
//! ## Quote Modes
//!
//! | Input | Raw | Literal | Identifier |
//! |-------|-----|---------|------------|
//! | null | *(nothing)* | `NULL` | *(nothing)* |
//! | `true` | `TRUE` | `TRUE` | `TRUE` |
//! | `it's` | `it's` | `'it''s'` | `"it''s"` |
//! | `[0xde, 0xad]` | `\xdead` | `'\xdead'` | `\xdead` |
//!
//! ## Usage
//!
//! ```rust
//! use pg_append::{append_text, append_value, QuoteMode, Value};
//!
//! let mut buf = b"SELECT * FROM users WHERE name = ".to_vec();
//! append_text(&mut buf, "O'Brien", QuoteMode::Literal);
//! buf.extend_from_slice(b" AND age > ");
//! append_value(&mut buf, &Value::from(30), QuoteMode::Literal);
//!
//! assert_eq!(buf, b"SELECT * FROM users WHERE name = 'O''Brien' AND age > 30");
//! ```

use crate::error::{Error, Result};
use crate::options::QuoteMode;
use crate::value::Value;
use chrono::{DateTime, Timelike, Utc};
use num_bigint::BigInt;
use std::fmt;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Maximum chain of indirect values resolved before giving up.
const MAX_VALUER_DEPTH: usize = 32;

/// Appends `value` encoded under `quote`.
///
/// Never fails: when a self-encoding or indirect value returns an error, the
/// bytes it wrote are discarded and `?!(<message>)` is appended instead.
///
/// # Examples
///
/// ```rust
/// use pg_append::{append_value, QuoteMode, Value};
///
/// let mut buf = Vec::new();
/// append_value(&mut buf, &Value::Null, QuoteMode::Literal);
/// buf.push(b',');
/// append_value(&mut buf, &Value::from(1.5), QuoteMode::Literal);
/// assert_eq!(buf, b"NULL,1.5");
/// ```
pub fn append_value(buf: &mut Vec<u8>, value: &Value, quote: QuoteMode) {
    let start = buf.len();
    if let Err(err) = dispatch(buf, value, quote, 0) {
        buf.truncate(start);
        tracing::debug!(kind = value.kind(), error = %err, "value failed to encode, writing marker");
        append_error(buf, &err);
    }
}

/// Appends `value` encoded under `quote`, returning delegate failures.
///
/// On error the buffer is restored to its length before the call.
///
/// # Errors
///
/// Returns [`Error::Delegate`] when a self-encoding or indirect value fails.
pub fn try_append_value(buf: &mut Vec<u8>, value: &Value, quote: QuoteMode) -> Result<()> {
    let start = buf.len();
    let result = dispatch(buf, value, quote, 0);
    if result.is_err() {
        buf.truncate(start);
    }
    result
}

fn dispatch(buf: &mut Vec<u8>, value: &Value, quote: QuoteMode, depth: usize) -> Result<()> {
    match value {
        Value::Null => append_null(buf, quote),
        Value::Bool(b) => append_bool(buf, *b),
        Value::Int(i) => append_int(buf, *i),
        Value::UInt(u) => append_uint(buf, *u),
        Value::BigInt(b) => append_bigint(buf, b),
        Value::Float32(f) => append_float32(buf, *f, quote),
        Value::Float(f) => append_float(buf, *f, quote),
        Value::Text(s) => append_text(buf, s, quote),
        Value::Timestamp(ts) => append_timestamp(buf, ts, quote),
        Value::Bytes(b) => append_binary(buf, Some(b), quote),
        Value::Appender(appender) => {
            let start = buf.len();
            if let Err(err) = appender.append_sql(buf, quote) {
                buf.truncate(start);
                return Err(Error::delegate(err));
            }
        }
        Value::Valuer(valuer) => {
            if depth >= MAX_VALUER_DEPTH {
                return Err(Error::delegate("valuer nesting too deep"));
            }
            let inner = valuer.sql_value().map_err(Error::delegate)?;
            return dispatch(buf, &inner, quote, depth + 1);
        }
    }
    Ok(())
}

/// Appends `?!(<description>)`, the inline marker for a failed value.
///
/// # Examples
///
/// ```rust
/// use pg_append::append_error;
///
/// let mut buf = Vec::new();
/// append_error(&mut buf, &"boom");
/// assert_eq!(buf, b"?!(boom)");
/// ```
pub fn append_error(buf: &mut Vec<u8>, err: &dyn fmt::Display) {
    buf.extend_from_slice(b"?!(");
    buf.extend_from_slice(err.to_string().as_bytes());
    buf.push(b')');
}

/// Appends SQL `NULL` under [`QuoteMode::Literal`]; appends nothing otherwise,
/// since raw and identifier contexts have no null syntax.
///
/// # Examples
///
/// ```rust
/// use pg_append::{append_null, QuoteMode};
///
/// let mut buf = Vec::new();
/// append_null(&mut buf, QuoteMode::Identifier);
/// assert!(buf.is_empty());
/// append_null(&mut buf, QuoteMode::Literal);
/// assert_eq!(buf, b"NULL");
/// ```
pub fn append_null(buf: &mut Vec<u8>, quote: QuoteMode) {
    if quote.is_literal() {
        buf.extend_from_slice(b"NULL");
    }
}

#[inline]
pub fn append_bool(buf: &mut Vec<u8>, v: bool) {
    buf.extend_from_slice(if v { b"TRUE" } else { b"FALSE" });
}

#[inline]
pub fn append_int(buf: &mut Vec<u8>, v: i64) {
    buf.extend_from_slice(v.to_string().as_bytes());
}

#[inline]
pub fn append_uint(buf: &mut Vec<u8>, v: u64) {
    buf.extend_from_slice(v.to_string().as_bytes());
}

#[inline]
pub fn append_bigint(buf: &mut Vec<u8>, v: &BigInt) {
    buf.extend_from_slice(v.to_str_radix(10).as_bytes());
}

/// Appends the shortest decimal text that round-trips to `v`.
///
/// Non-finite values use the PostgreSQL spellings `NaN`, `Infinity` and
/// `-Infinity`, single-quoted under [`QuoteMode::Literal`].
///
/// # Examples
///
/// ```rust
/// use pg_append::{append_float, QuoteMode};
///
/// let mut buf = Vec::new();
/// append_float(&mut buf, 0.1 + 0.2, QuoteMode::Literal);
/// assert_eq!(buf, b"0.30000000000000004");
///
/// buf.clear();
/// append_float(&mut buf, f64::NEG_INFINITY, QuoteMode::Literal);
/// assert_eq!(buf, b"'-Infinity'");
/// ```
pub fn append_float(buf: &mut Vec<u8>, v: f64, quote: QuoteMode) {
    if v.is_finite() {
        buf.extend_from_slice(v.to_string().as_bytes());
    } else {
        append_non_finite(buf, v.is_nan(), v.is_sign_negative(), quote);
    }
}

/// Like [`append_float`], formatted at `f32` precision so `0.1f32` renders `0.1`.
pub fn append_float32(buf: &mut Vec<u8>, v: f32, quote: QuoteMode) {
    if v.is_finite() {
        buf.extend_from_slice(v.to_string().as_bytes());
    } else {
        append_non_finite(buf, v.is_nan(), v.is_sign_negative(), quote);
    }
}

fn append_non_finite(buf: &mut Vec<u8>, nan: bool, negative: bool, quote: QuoteMode) {
    let token: &[u8] = match (nan, negative) {
        (true, _) => b"NaN",
        (false, false) => b"Infinity",
        (false, true) => b"-Infinity",
    };
    if quote.is_literal() {
        buf.push(b'\'');
        buf.extend_from_slice(token);
        buf.push(b'\'');
    } else {
        buf.extend_from_slice(token);
    }
}

/// Appends `s` escaped for `quote`.
///
/// - NUL bytes are dropped in every mode
/// - under Literal and Identifier, `'` is doubled
/// - under Identifier only, `"` becomes `\"` and `\` becomes `\\`
///
/// # Examples
///
/// ```rust
/// use pg_append::{append_text, QuoteMode};
///
/// let mut buf = Vec::new();
/// append_text(&mut buf, r#"a"b\c"#, QuoteMode::Identifier);
/// assert_eq!(buf, br#""a\"b\\c""#);
/// ```
#[inline]
pub fn append_text(buf: &mut Vec<u8>, s: &str, quote: QuoteMode) {
    append_text_bytes(buf, s.as_bytes(), quote);
}

/// Byte-oriented form of [`append_text`]; input is processed byte for byte.
pub fn append_text_bytes(buf: &mut Vec<u8>, s: &[u8], quote: QuoteMode) {
    let wrapper = quote.wrapper();
    buf.reserve(s.len() + 2);

    if let Some(q) = wrapper {
        buf.push(q);
    }

    for &c in s {
        match c {
            0 => {}
            b'\'' if quote.is_quoted() => buf.extend_from_slice(b"''"),
            b'"' if quote.is_identifier() => buf.extend_from_slice(b"\\\""),
            b'\\' if quote.is_identifier() => buf.extend_from_slice(b"\\\\"),
            _ => buf.push(c),
        }
    }

    if let Some(q) = wrapper {
        buf.push(q);
    }
}

/// Appends a timestamp as `YYYY-MM-DD HH:MM:SS[.fraction]+00:00`.
///
/// The fraction keeps nanosecond precision with trailing zeros trimmed. The
/// text is single-quoted under [`QuoteMode::Literal`] only.
///
/// # Examples
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use pg_append::{append_timestamp, QuoteMode};
///
/// let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
/// let mut buf = Vec::new();
/// append_timestamp(&mut buf, &ts, QuoteMode::Literal);
/// assert_eq!(buf, b"'2024-01-15 10:30:00+00:00'");
/// ```
pub fn append_timestamp(buf: &mut Vec<u8>, ts: &DateTime<Utc>, quote: QuoteMode) {
    if quote.is_literal() {
        buf.push(b'\'');
    }

    buf.extend_from_slice(ts.format("%Y-%m-%d %H:%M:%S").to_string().as_bytes());
    // Leap seconds are carried as nanos >= 1e9; clamp them into the fraction.
    let nanos = ts.nanosecond() % 1_000_000_000;
    if nanos > 0 {
        let fraction = format!("{:09}", nanos);
        buf.push(b'.');
        buf.extend_from_slice(fraction.trim_end_matches('0').as_bytes());
    }
    buf.extend_from_slice(b"+00:00");

    if quote.is_literal() {
        buf.push(b'\'');
    }
}

/// Appends a byte sequence as a `\x` hex escape.
///
/// `None` follows the null rule of [`append_null`]; an empty slice renders as a
/// bare `\x`. The result is single-quoted under [`QuoteMode::Literal`] only.
///
/// # Examples
///
/// ```rust
/// use pg_append::{append_binary, QuoteMode};
///
/// let mut buf = Vec::new();
/// append_binary(&mut buf, Some(&[0xde, 0xad, 0xbe, 0xef]), QuoteMode::Literal);
/// assert_eq!(buf, br"'\xdeadbeef'");
///
/// buf.clear();
/// append_binary(&mut buf, None, QuoteMode::Literal);
/// assert_eq!(buf, b"NULL");
/// ```
pub fn append_binary(buf: &mut Vec<u8>, bytes: Option<&[u8]>, quote: QuoteMode) {
    let Some(bytes) = bytes else {
        append_null(buf, quote);
        return;
    };

    buf.reserve(bytes.len() * 2 + 4);
    if quote.is_literal() {
        buf.push(b'\'');
    }

    buf.extend_from_slice(b"\\x");
    for &b in bytes {
        buf.push(HEX_DIGITS[usize::from(b >> 4)]);
        buf.push(HEX_DIGITS[usize::from(b & 0x0f)]);
    }

    if quote.is_literal() {
        buf.push(b'\'');
    }
}

/// Appends a text-to-text map as a composite `key=>value` literal (hstore syntax).
///
/// Keys and values are always double-quoted with identifier escaping; the whole
/// literal is single-quoted under [`QuoteMode::Literal`]. `None` follows the null
/// rule. Entries are emitted in the iteration order of `map`: pass an
/// [`Hstore`](crate::Hstore) or `BTreeMap` for deterministic output.
///
/// # Examples
///
/// ```rust
/// use pg_append::{append_map, QuoteMode};
/// use std::collections::BTreeMap;
///
/// let mut tags = BTreeMap::new();
/// tags.insert("color", "red");
/// tags.insert("size", "L");
///
/// let mut buf = Vec::new();
/// append_map(&mut buf, Some(&tags), QuoteMode::Literal);
/// assert_eq!(buf, br#"'"color"=>"red","size"=>"L"'"#);
/// ```
pub fn append_map<I, K, V>(buf: &mut Vec<u8>, map: Option<I>, quote: QuoteMode)
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let Some(map) = map else {
        append_null(buf, quote);
        return;
    };

    if quote.is_literal() {
        buf.push(b'\'');
    }

    let entries_start = buf.len();
    for (key, value) in map {
        append_text(buf, key.as_ref(), QuoteMode::Identifier);
        buf.extend_from_slice(b"=>");
        append_text(buf, value.as_ref(), QuoteMode::Identifier);
        buf.push(b',');
    }
    if buf.len() > entries_start {
        // Strip trailing comma.
        buf.pop();
    }

    if quote.is_literal() {
        buf.push(b'\'');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::value::{AppendSql, SqlValuer};
    use chrono::TimeZone;

    fn encode(value: &Value, quote: QuoteMode) -> String {
        let mut buf = Vec::new();
        append_value(&mut buf, value, quote);
        String::from_utf8(buf).unwrap()
    }

    fn text(s: &str, quote: QuoteMode) -> String {
        let mut buf = Vec::new();
        append_text(&mut buf, s, quote);
        String::from_utf8(buf).unwrap()
    }

    #[derive(Debug)]
    struct Failing(&'static str);

    impl AppendSql for Failing {
        fn append_sql(&self, buf: &mut Vec<u8>, _quote: QuoteMode) -> std::result::Result<(), BoxError> {
            buf.extend_from_slice(b"partial");
            Err(self.0.into())
        }
    }

    #[derive(Debug)]
    struct Wrapped(Value);

    impl SqlValuer for Wrapped {
        fn sql_value(&self) -> std::result::Result<Value, BoxError> {
            Ok(self.0.clone())
        }
    }

    #[derive(Debug)]
    struct Unavailable;

    impl SqlValuer for Unavailable {
        fn sql_value(&self) -> std::result::Result<Value, BoxError> {
            Err("value unavailable".into())
        }
    }

    #[test]
    fn test_null_rule() {
        assert_eq!(encode(&Value::Null, QuoteMode::Literal), "NULL");
        assert_eq!(encode(&Value::Null, QuoteMode::Raw), "");
        assert_eq!(encode(&Value::Null, QuoteMode::Identifier), "");
    }

    #[test]
    fn test_scalars() {
        assert_eq!(encode(&Value::from(true), QuoteMode::Literal), "TRUE");
        assert_eq!(encode(&Value::from(false), QuoteMode::Identifier), "FALSE");
        assert_eq!(encode(&Value::from(-42), QuoteMode::Literal), "-42");
        assert_eq!(encode(&Value::from(u64::MAX), QuoteMode::Raw), "18446744073709551615");
        assert_eq!(
            encode(&Value::from(i128::MIN), QuoteMode::Literal),
            "-170141183460469231731687303715884105728"
        );
        assert_eq!(encode(&Value::from(1.5), QuoteMode::Literal), "1.5");
        assert_eq!(encode(&Value::from(0.1f32), QuoteMode::Literal), "0.1");
        assert_eq!(encode(&Value::from(1e21), QuoteMode::Literal), "1000000000000000000000");
        assert_eq!(encode(&Value::from(-0.0), QuoteMode::Literal), "-0");
    }

    #[test]
    fn test_non_finite_floats() {
        assert_eq!(encode(&Value::from(f64::NAN), QuoteMode::Literal), "'NaN'");
        assert_eq!(encode(&Value::from(f64::INFINITY), QuoteMode::Raw), "Infinity");
        assert_eq!(encode(&Value::from(f32::NEG_INFINITY), QuoteMode::Literal), "'-Infinity'");
    }

    #[test]
    fn test_text_modes() {
        let input = "a'b\"c\\d\0e";
        assert_eq!(text(input, QuoteMode::Raw), "a'b\"c\\de");
        assert_eq!(text(input, QuoteMode::Literal), "'a''b\"c\\de'");
        assert_eq!(text(input, QuoteMode::Identifier), "\"a''b\\\"c\\\\de\"");
    }

    #[test]
    fn test_text_passes_utf8_through() {
        assert_eq!(text("héllo 👋", QuoteMode::Literal), "'héllo 👋'");
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(text("", QuoteMode::Literal), "''");
        assert_eq!(text("", QuoteMode::Identifier), "\"\"");
        assert_eq!(text("", QuoteMode::Raw), "");
    }

    #[test]
    fn test_timestamp() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 5).unwrap()
            + chrono::Duration::microseconds(120);
        let value = Value::Timestamp(ts);
        assert_eq!(
            encode(&value, QuoteMode::Literal),
            "'2024-01-15 10:30:05.00012+00:00'"
        );
        assert_eq!(
            encode(&value, QuoteMode::Identifier),
            "2024-01-15 10:30:05.00012+00:00"
        );
    }

    #[test]
    fn test_binary() {
        let mut buf = Vec::new();
        append_binary(&mut buf, Some(&[]), QuoteMode::Literal);
        assert_eq!(buf, b"'\\x'");

        buf.clear();
        append_binary(&mut buf, Some(&[0x00, 0x0f, 0xf0, 0xff]), QuoteMode::Identifier);
        assert_eq!(buf, b"\\x000ff0ff");

        buf.clear();
        append_binary(&mut buf, None, QuoteMode::Raw);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_map() {
        let entries = vec![("a", "b"), ("k'ey", "va\"l")];
        let mut buf = Vec::new();
        append_map(&mut buf, Some(entries), QuoteMode::Literal);
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            r#"'"a"=>"b","k''ey"=>"va\"l"'"#
        );
    }

    #[test]
    fn test_map_empty_and_absent() {
        let mut buf = Vec::new();
        append_map(&mut buf, Some(Vec::<(&str, &str)>::new()), QuoteMode::Literal);
        assert_eq!(buf, b"''");

        buf.clear();
        append_map(&mut buf, Some(Vec::<(&str, &str)>::new()), QuoteMode::Raw);
        assert!(buf.is_empty());

        buf.clear();
        append_map(&mut buf, None::<Vec<(&str, &str)>>, QuoteMode::Literal);
        assert_eq!(buf, b"NULL");
    }

    #[test]
    fn test_appender_failure_discards_partial_output() {
        let mut buf = b"x = ".to_vec();
        append_value(&mut buf, &Value::appender(Failing("boom")), QuoteMode::Literal);
        assert_eq!(buf, b"x = ?!(boom)");
    }

    #[test]
    fn test_valuer_is_redispatched() {
        let value = Value::valuer(Wrapped(Value::from("it's")));
        assert_eq!(encode(&value, QuoteMode::Literal), "'it''s'");

        let nested = Value::valuer(Wrapped(Value::valuer(Wrapped(Value::Null))));
        assert_eq!(encode(&nested, QuoteMode::Literal), "NULL");
    }

    #[test]
    fn test_valuer_failure_marker() {
        assert_eq!(
            encode(&Value::valuer(Unavailable), QuoteMode::Literal),
            "?!(value unavailable)"
        );
    }

    #[test]
    fn test_try_append_restores_buffer() {
        let mut buf = b"prefix".to_vec();
        let err = try_append_value(
            &mut buf,
            &Value::valuer(Wrapped(Value::appender(Failing("nope")))),
            QuoteMode::Literal,
        )
        .unwrap_err();
        assert!(err.is_delegate());
        assert_eq!(err.to_string(), "nope");
        assert_eq!(buf, b"prefix");

        try_append_value(&mut buf, &Value::from(7), QuoteMode::Literal).unwrap();
        assert_eq!(buf, b"prefix7");
    }

    #[derive(Debug)]
    struct Chain(u64);

    impl SqlValuer for Chain {
        fn sql_value(&self) -> std::result::Result<Value, BoxError> {
            Ok(Value::valuer(Chain(self.0 + 1)))
        }
    }

    #[test]
    fn test_endless_valuer_chain_is_cut_off() {
        let mut buf = b"x = ".to_vec();
        append_value(&mut buf, &Value::valuer(Chain(0)), QuoteMode::Literal);
        assert_eq!(buf, b"x = ?!(valuer nesting too deep)");

        let mut buf = b"keep".to_vec();
        let err = try_append_value(&mut buf, &Value::valuer(Chain(0)), QuoteMode::Literal)
            .unwrap_err();
        assert!(err.is_delegate());
        assert_eq!(buf, b"keep");
    }

    #[test]
    fn test_nested_valuers_within_limit() {
        let mut value = Value::from("deep");
        for _ in 0..MAX_VALUER_DEPTH {
            value = Value::valuer(Wrapped(value));
        }
        assert_eq!(encode(&value, QuoteMode::Literal), "'deep'");
    }
}
