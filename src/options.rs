//! Configuration options for SQL value encoding.
//!
//! This module provides types to control how values are rendered:
//!
//! - [`QuoteMode`]: which wrapping/escaping ruleset applies (none, string literal, identifier)
//! - [`ErrorPolicy`]: what happens when a user-supplied value fails to produce itself
//! - [`AppendOptions`]: main configuration struct consumed by [`Appender`](crate::Appender)
//!
//! ## Examples
//!
//! ```rust
//! use pg_append::{AppendOptions, Appender, ErrorPolicy, QuoteMode};
//!
//! // Quote everything as SQL identifiers
//! let options = AppendOptions::identifier();
//! let mut out = Appender::new(options);
//! out.identifier("users.name");
//! assert_eq!(out.as_bytes(), b"\"users\".\"name\"");
//!
//! // Fail instead of writing an inline `?!(...)` marker
//! let options = AppendOptions::new()
//!     .with_quote(QuoteMode::Literal)
//!     .with_error_policy(ErrorPolicy::Propagate)
//!     .with_sorted_map_keys(true);
//! ```

/// Output shape selector.
///
/// - **Raw**: no wrapping; only NUL bytes are dropped from text
/// - **Literal**: single-quoted SQL string literal, `NULL` for absent values
/// - **Identifier**: double-quoted SQL identifier
///
/// # Examples
///
/// ```rust
/// use pg_append::{append_text, QuoteMode};
///
/// let mut buf = Vec::new();
/// append_text(&mut buf, "it's", QuoteMode::Literal);
/// assert_eq!(buf, b"'it''s'");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum QuoteMode {
    Raw,
    #[default]
    Literal,
    Identifier,
}

impl QuoteMode {
    /// Returns `true` for [`QuoteMode::Literal`].
    #[inline]
    #[must_use]
    pub const fn is_literal(self) -> bool {
        matches!(self, QuoteMode::Literal)
    }

    /// Returns `true` for [`QuoteMode::Identifier`].
    #[inline]
    #[must_use]
    pub const fn is_identifier(self) -> bool {
        matches!(self, QuoteMode::Identifier)
    }

    /// Returns `true` when the mode wraps its output in quotes.
    #[inline]
    #[must_use]
    pub const fn is_quoted(self) -> bool {
        !matches!(self, QuoteMode::Raw)
    }

    /// The byte opening and closing a quoted text value, if any.
    #[inline]
    #[must_use]
    pub const fn wrapper(self) -> Option<u8> {
        match self {
            QuoteMode::Raw => None,
            QuoteMode::Literal => Some(b'\''),
            QuoteMode::Identifier => Some(b'"'),
        }
    }
}

/// What to do when a self-encoding or indirect value fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Write `?!(<message>)` in place of the value and keep going.
    #[default]
    Marker,
    /// Return the failure to the caller and leave the buffer as it was.
    Propagate,
}

/// Configuration options for [`Appender`](crate::Appender).
///
/// # Examples
///
/// ```rust
/// use pg_append::{AppendOptions, ErrorPolicy, QuoteMode};
///
/// let options = AppendOptions::default();
/// assert_eq!(options.quote, QuoteMode::Literal);
/// assert_eq!(options.on_error, ErrorPolicy::Marker);
/// assert!(!options.sort_map_keys);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppendOptions {
    pub quote: QuoteMode,
    pub on_error: ErrorPolicy,
    pub sort_map_keys: bool,
}

impl AppendOptions {
    /// Creates default options (literal quoting, inline error markers, map order kept).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options rendering single-quoted SQL literals.
    #[must_use]
    pub fn literal() -> Self {
        Self::default()
    }

    /// Options rendering double-quoted SQL identifiers.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pg_append::{AppendOptions, QuoteMode};
    ///
    /// assert_eq!(AppendOptions::identifier().quote, QuoteMode::Identifier);
    /// ```
    #[must_use]
    pub fn identifier() -> Self {
        AppendOptions {
            quote: QuoteMode::Identifier,
            ..Default::default()
        }
    }

    /// Options rendering values without any wrapping.
    #[must_use]
    pub fn raw() -> Self {
        AppendOptions {
            quote: QuoteMode::Raw,
            ..Default::default()
        }
    }

    /// Sets the quote mode.
    #[must_use]
    pub fn with_quote(mut self, quote: QuoteMode) -> Self {
        self.quote = quote;
        self
    }

    /// Sets the policy applied to failing self-encoding or indirect values.
    #[must_use]
    pub fn with_error_policy(mut self, on_error: ErrorPolicy) -> Self {
        self.on_error = on_error;
        self
    }

    /// Sorts map entries by key before emission, making output independent of
    /// the input map's iteration order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pg_append::{AppendOptions, Appender};
    /// use std::collections::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert("b", "2");
    /// map.insert("a", "1");
    ///
    /// let mut out = Appender::new(AppendOptions::new().with_sorted_map_keys(true));
    /// out.map(Some(&map));
    /// assert_eq!(out.as_bytes(), br#"'"a"=>"1","b"=>"2"'"#);
    /// ```
    #[must_use]
    pub fn with_sorted_map_keys(mut self, sort: bool) -> Self {
        self.sort_map_keys = sort;
        self
    }
}
