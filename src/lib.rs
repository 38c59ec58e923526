//! # pg_append
//!
//! Typed values to SQL text: escaped literals, quoted identifiers and composite
//! map literals, appended into caller-owned byte buffers.
//!
//! ## What is it for?
//!
//! Whenever a value has to be spliced into the text of a SQL statement rather
//! than sent as a bind parameter, this crate is the boundary that turns it into
//! syntax: quotes are doubled, NUL bytes dropped, identifiers split on dots and
//! quoted segment by segment, blobs hex-escaped.
//!
//! ## Key Features
//!
//! - **Three quote modes**: [`QuoteMode::Raw`], [`QuoteMode::Literal`] (`'text'`)
//!   and [`QuoteMode::Identifier`] (`"name"`)
//! - **Single pass**: every encoder appends to a `Vec<u8>` once, no intermediate strings
//! - **Extensible**: types implement [`AppendSql`] to render themselves, or
//!   [`SqlValuer`] to hand over an underlying [`Value`]
//! - **Total by default**: failures of user types become an inline `?!(message)`
//!   marker; [`try_append_value`] and [`ErrorPolicy::Propagate`] return them instead
//!
//! ## Quick Start
//!
//! ```rust
//! use pg_append::{append_identifier, append_text, append_value, QuoteMode, Value};
//!
//! let mut sql = b"SELECT ".to_vec();
//! append_identifier(&mut sql, "u.*", QuoteMode::Identifier);
//! sql.extend_from_slice(b" FROM users u WHERE u.name = ");
//! append_text(&mut sql, "O'Brien", QuoteMode::Literal);
//! sql.extend_from_slice(b" AND u.deleted_at IS ");
//! append_value(&mut sql, &Value::Null, QuoteMode::Literal);
//!
//! assert_eq!(
//!     String::from_utf8(sql).unwrap(),
//!     r#"SELECT "u".* FROM users u WHERE u.name = 'O''Brien' AND u.deleted_at IS NULL"#
//! );
//! ```
//!
//! ### Building with options
//!
//! ```rust
//! use pg_append::{hstore, AppendOptions, Appender};
//!
//! let mut sql = Appender::new(AppendOptions::literal());
//! sql.raw("UPDATE items SET attrs = ")
//!     .map(Some(&hstore! { "color" => "red" }))
//!     .raw(" WHERE ")
//!     .quoted_identifier("id")
//!     .raw(" = ")
//!     .text("42");
//!
//! assert_eq!(
//!     sql.into_string().unwrap(),
//!     r#"UPDATE items SET attrs = '"color"=>"red"' WHERE "id" = '42'"#
//! );
//! ```
//!
//! ## Logging
//!
//! Failures rendered as markers are reported through `tracing` at `debug` level.
//! The crate never installs a subscriber.

pub mod append;
pub mod appender;
pub mod error;
pub mod fallback;
pub mod ident;
pub mod macros;
pub mod map;
pub mod options;
pub mod value;

pub use append::{
    append_binary, append_bigint, append_bool, append_error, append_float, append_float32,
    append_int, append_map, append_null, append_text, append_text_bytes, append_timestamp,
    append_uint, append_value, try_append_value,
};
pub use appender::Appender;
pub use error::{BoxError, Error, Result};
pub use fallback::{append_serialize, to_value, try_append_serialize, ValueSerializer};
pub use ident::{append_identifier, append_identifier_bytes};
pub use map::Hstore;
pub use options::{AppendOptions, ErrorPolicy, QuoteMode};
pub use value::{AppendSql, SqlValuer, Value};

/// Encodes a single value into a new `String`.
///
/// # Examples
///
/// ```rust
/// use pg_append::{to_sql, QuoteMode, Value};
///
/// assert_eq!(to_sql(&Value::from("a'b"), QuoteMode::Literal), "'a''b'");
/// assert_eq!(to_sql(&Value::from(-42), QuoteMode::Literal), "-42");
/// ```
#[must_use]
pub fn to_sql(value: &Value, quote: QuoteMode) -> String {
    let mut buf = Vec::new();
    append_value(&mut buf, value, quote);
    // Text input is UTF-8 and every escape is ASCII, so this only replaces
    // bytes a delegate wrote itself.
    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    }
}

/// Quotes `s` as a single-quoted SQL string literal.
///
/// # Examples
///
/// ```rust
/// assert_eq!(pg_append::quote_literal("it's"), "'it''s'");
/// ```
#[must_use]
pub fn quote_literal(s: &str) -> String {
    let mut buf = Vec::with_capacity(s.len() + 2);
    append_text(&mut buf, s, QuoteMode::Literal);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Quotes a dotted identifier path.
///
/// # Examples
///
/// ```rust
/// assert_eq!(pg_append::quote_identifier("public.users"), r#""public"."users""#);
/// assert_eq!(pg_append::quote_identifier("t.*"), r#""t".*"#);
/// ```
#[must_use]
pub fn quote_identifier(path: &str) -> String {
    let mut buf = Vec::with_capacity(path.len() + 2);
    append_identifier(&mut buf, path, QuoteMode::Identifier);
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_sql_modes() {
        let value = Value::from("x");
        assert_eq!(to_sql(&value, QuoteMode::Raw), "x");
        assert_eq!(to_sql(&value, QuoteMode::Literal), "'x'");
        assert_eq!(to_sql(&value, QuoteMode::Identifier), "\"x\"");
    }

    #[test]
    fn test_quote_helpers() {
        assert_eq!(quote_literal("a\0b"), "'ab'");
        assert_eq!(quote_identifier("*"), "*");
        assert_eq!(quote_identifier(r#"a"b"#), r#""a""b""#);
    }

    #[test]
    fn test_display_matches_literal_mode() {
        assert_eq!(Value::from(vec![0xabu8]).to_string(), r"'\xab'");
        assert_eq!(Value::Null.to_string(), "NULL");
    }
}
