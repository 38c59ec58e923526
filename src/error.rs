//! Error types for SQL value encoding.
//!
//! The total entry points of this crate ([`append_value`](crate::append_value),
//! [`append_serialize`](crate::append_serialize)) never return an error: a failure
//! coming from a user-supplied value is rendered inline as a `?!(...)` marker.
//! The fallible entry points ([`try_append_value`](crate::try_append_value),
//! [`Appender`](crate::Appender) with [`ErrorPolicy::Propagate`](crate::ErrorPolicy))
//! surface the same failures as [`Error`].
//!
//! ## Error Categories
//!
//! - **Delegate failures**: an [`AppendSql`](crate::AppendSql) or
//!   [`SqlValuer`](crate::SqlValuer) implementation returned an error
//! - **Fallback failures**: a value handed to the structural fallback could not be
//!   rendered (e.g. a `Serialize` impl that errors, or JSON with non-string keys)
//! - **UTF-8 errors**: an assembled buffer holding raw identifier bytes was
//!   converted into a `String`
//!
//! ## Examples
//!
//! ```rust
//! use pg_append::{try_append_value, Error, QuoteMode, SqlValuer, Value, BoxError};
//! use std::sync::Arc;
//!
//! #[derive(Debug)]
//! struct Broken;
//!
//! impl SqlValuer for Broken {
//!     fn sql_value(&self) -> Result<Value, BoxError> {
//!         Err("connection string missing".into())
//!     }
//! }
//!
//! let mut buf = b"SELECT ".to_vec();
//! let err = try_append_value(&mut buf, &Value::valuer(Broken), QuoteMode::Literal).unwrap_err();
//! assert!(matches!(err, Error::Delegate { .. }));
//! assert_eq!(buf, b"SELECT ");
//! ```

use std::fmt;
use thiserror::Error;

/// Boxed error returned by [`AppendSql`](crate::AppendSql) and
/// [`SqlValuer`](crate::SqlValuer) implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Represents all possible errors that can occur while encoding values.
#[derive(Debug, Error)]
pub enum Error {
    /// A self-encoding or indirect value failed. Displays the delegate's own message.
    #[error("{source}")]
    Delegate { source: BoxError },

    /// The structural fallback met a compound shape (sequence, map, struct)
    /// that has no built-in scalar equivalent.
    #[error("Unsupported shape: {0}")]
    UnsupportedShape(String),

    /// Rendering a compound shape as JSON failed.
    #[error("JSON error: {0}")]
    Json(String),

    /// The encoded buffer is not valid UTF-8.
    #[error("Invalid UTF-8 in encoded output: {0}")]
    Utf8(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Wraps a failure coming from a user-supplied value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pg_append::Error;
    ///
    /// let err = Error::delegate("boom");
    /// assert_eq!(err.to_string(), "boom");
    /// ```
    pub fn delegate<E: Into<BoxError>>(err: E) -> Self {
        Error::Delegate { source: err.into() }
    }

    /// Creates an unsupported shape error; the fallback reacts to it by rendering JSON.
    pub fn unsupported_shape(shape: &str) -> Self {
        Error::UnsupportedShape(shape.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pg_append::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Returns `true` for failures raised by a user-supplied value.
    #[must_use]
    pub fn is_delegate(&self) -> bool {
        matches!(self, Error::Delegate { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Error::Utf8(err.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
