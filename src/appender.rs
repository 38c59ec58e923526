//! Buffer-owning front end driven by [`AppendOptions`].
//!
//! [`Appender`] bundles an output buffer with options so a statement can be
//! assembled fragment by fragment without threading a quote mode through every
//! call.
//!
//! ```rust
//! use pg_append::{AppendOptions, Appender, Value};
//!
//! let mut sql = Appender::new(AppendOptions::literal());
//! sql.raw("INSERT INTO ")
//!     .quoted_identifier("audit.events")
//!     .raw(" (kind, payload) VALUES (")
//!     .text("login")
//!     .raw(", ");
//! sql.value(&Value::from(vec![0x01u8, 0x02])).unwrap().raw(")");
//!
//! assert_eq!(
//!     sql.into_string().unwrap(),
//!     r#"INSERT INTO "audit"."events" (kind, payload) VALUES ('login', '\x0102')"#
//! );
//! ```

use crate::append::{
    append_binary, append_error, append_map, append_null, append_text, append_value,
    try_append_value,
};
use crate::error::Result;
use crate::fallback::to_value;
use crate::ident::append_identifier;
use crate::options::{AppendOptions, ErrorPolicy, QuoteMode};
use crate::value::Value;
use serde::Serialize;

/// Owns an output buffer and the options used to append to it.
#[derive(Debug, Clone, Default)]
pub struct Appender {
    output: Vec<u8>,
    options: AppendOptions,
}

impl Appender {
    pub fn new(options: AppendOptions) -> Self {
        // Typical statements fit without reallocating.
        Appender {
            output: Vec::with_capacity(256),
            options,
        }
    }

    /// Continues appending to an existing buffer.
    pub fn with_buffer(output: Vec<u8>, options: AppendOptions) -> Self {
        Appender { output, options }
    }

    #[must_use]
    pub fn options(&self) -> &AppendOptions {
        &self.options
    }

    /// Quote mode used by every method except [`Appender::raw`] and
    /// [`Appender::quoted_identifier`].
    #[must_use]
    pub fn quote(&self) -> QuoteMode {
        self.options.quote
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.output
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.output.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.output
    }

    /// Returns the assembled text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Utf8`](crate::Error::Utf8) if raw identifier or text
    /// bytes that were not UTF-8 were appended.
    pub fn into_string(self) -> Result<String> {
        Ok(String::from_utf8(self.output)?)
    }

    /// Appends SQL verbatim, without escaping.
    pub fn raw(&mut self, sql: &str) -> &mut Self {
        self.output.extend_from_slice(sql.as_bytes());
        self
    }

    /// Appends any [`Value`].
    ///
    /// # Errors
    ///
    /// With [`ErrorPolicy::Propagate`], returns the failure of a self-encoding
    /// or indirect value and leaves the buffer unchanged. With
    /// [`ErrorPolicy::Marker`] this never fails.
    pub fn value(&mut self, value: &Value) -> Result<&mut Self> {
        let quote = self.options.quote;
        match self.options.on_error {
            ErrorPolicy::Marker => append_value(&mut self.output, value, quote),
            ErrorPolicy::Propagate => try_append_value(&mut self.output, value, quote)?,
        }
        Ok(self)
    }

    /// Appends any `T: Serialize` through the structural fallback.
    ///
    /// # Errors
    ///
    /// Same policy as [`Appender::value`], applied to conversion failures too.
    pub fn serialize<T>(&mut self, value: &T) -> Result<&mut Self>
    where
        T: ?Sized + Serialize,
    {
        match to_value(value) {
            Ok(value) => self.value(&value),
            Err(err) if self.options.on_error == ErrorPolicy::Marker => {
                tracing::debug!(error = %err, "structural fallback failed, writing marker");
                append_error(&mut self.output, &err);
                Ok(self)
            }
            Err(err) => Err(err),
        }
    }

    pub fn null(&mut self) -> &mut Self {
        append_null(&mut self.output, self.options.quote);
        self
    }

    pub fn text(&mut self, s: &str) -> &mut Self {
        append_text(&mut self.output, s, self.options.quote);
        self
    }

    pub fn binary(&mut self, bytes: Option<&[u8]>) -> &mut Self {
        append_binary(&mut self.output, bytes, self.options.quote);
        self
    }

    /// Appends an identifier path under the configured quote mode.
    pub fn identifier(&mut self, path: &str) -> &mut Self {
        append_identifier(&mut self.output, path, self.options.quote);
        self
    }

    /// Appends an identifier path under [`QuoteMode::Identifier`], whatever the
    /// configured mode.
    pub fn quoted_identifier(&mut self, path: &str) -> &mut Self {
        append_identifier(&mut self.output, path, QuoteMode::Identifier);
        self
    }

    /// Appends a composite `key=>value` literal, sorting by key first when
    /// [`AppendOptions::sort_map_keys`] is set.
    pub fn map<I, K, V>(&mut self, map: Option<I>) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let quote = self.options.quote;
        if self.options.sort_map_keys {
            let sorted = map.map(|entries| {
                let mut entries: Vec<(K, V)> = entries.into_iter().collect();
                entries.sort_by(|a, b| a.0.as_ref().cmp(b.0.as_ref()));
                entries
            });
            append_map(&mut self.output, sorted, quote);
        } else {
            append_map(&mut self.output, map, quote);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BoxError, Error};
    use crate::value::SqlValuer;
    use std::collections::HashMap;

    #[derive(Debug)]
    struct Missing;

    impl SqlValuer for Missing {
        fn sql_value(&self) -> std::result::Result<Value, BoxError> {
            Err("secret not loaded".into())
        }
    }

    #[test]
    fn test_marker_policy() {
        let mut out = Appender::new(AppendOptions::literal());
        out.raw("x = ");
        out.value(&Value::valuer(Missing)).unwrap();
        assert_eq!(out.into_string().unwrap(), "x = ?!(secret not loaded)");
    }

    #[test]
    fn test_propagate_policy() {
        let options = AppendOptions::literal().with_error_policy(ErrorPolicy::Propagate);
        let mut out = Appender::new(options);
        out.raw("x = ");
        let err = out.value(&Value::valuer(Missing)).unwrap_err();
        assert!(matches!(err, Error::Delegate { .. }));
        assert_eq!(out.as_bytes(), b"x = ");
    }

    #[test]
    fn test_sorted_map_keys() {
        let map: HashMap<String, String> = (0..10)
            .map(|i| (format!("k{i}"), i.to_string()))
            .collect();
        let mut out = Appender::new(AppendOptions::raw().with_sorted_map_keys(true));
        out.map(Some(&map));
        let expected = (0..10)
            .map(|i| format!("\"k{i}\"=>\"{i}\""))
            .collect::<Vec<_>>()
            .join(",");
        assert_eq!(out.into_string().unwrap(), expected);
    }

    #[test]
    fn test_absent_map_and_binary() {
        let mut out = Appender::new(AppendOptions::literal());
        out.map(None::<HashMap<String, String>>).raw(",").binary(None);
        assert_eq!(out.as_bytes(), b"NULL,NULL");
    }

    #[test]
    fn test_identifier_follows_mode() {
        let mut out = Appender::new(AppendOptions::raw());
        out.identifier("t.c").raw(" ").quoted_identifier("t.c");
        assert_eq!(out.as_bytes(), br#"t.c "t"."c""#);
    }

    #[test]
    fn test_with_buffer_continues() {
        let mut out = Appender::with_buffer(b"SELECT ".to_vec(), AppendOptions::identifier());
        out.text("col").null();
        assert_eq!(out.len(), 12);
        assert_eq!(out.into_inner(), b"SELECT \"col\"");
    }

    #[test]
    fn test_into_string_rejects_invalid_utf8() {
        let mut out = Appender::new(AppendOptions::raw());
        crate::ident::append_identifier_bytes(&mut out.output, &[0xff], QuoteMode::Raw);
        assert!(matches!(out.into_string(), Err(Error::Utf8(_))));
    }
}
