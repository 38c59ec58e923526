//! Column and table identifier quoting.
//!
//! A raw identifier is a dotted path such as `schema.table.column` in which any
//! segment, or the whole path, may be the wildcard `*`. Under
//! [`QuoteMode::Identifier`] every non-wildcard segment is double-quoted and
//! embedded `"` characters are doubled; wildcards and dots pass through bare.
//! The other modes emit the path unchanged.
//!
//! ```rust
//! use pg_append::{append_identifier, QuoteMode};
//!
//! let mut buf = Vec::new();
//! append_identifier(&mut buf, "public.users.*", QuoteMode::Identifier);
//! assert_eq!(buf, br#""public"."users".*"#);
//! ```

use crate::options::QuoteMode;

/// Byte cursor with one byte of lookahead over a raw identifier path.
struct Cursor<'a> {
    input: &'a [u8],
    position: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a [u8]) -> Self {
        Cursor { input, position: 0 }
    }

    fn next_byte(&mut self) -> Option<u8> {
        let c = self.input.get(self.position).copied()?;
        self.position += 1;
        Some(c)
    }

    /// Consumes the next byte if it equals `expected`.
    fn skip(&mut self, expected: u8) -> bool {
        if self.input.get(self.position) == Some(&expected) {
            self.position += 1;
            true
        } else {
            false
        }
    }
}

/// Appends a dotted identifier path, quoting each segment under
/// [`QuoteMode::Identifier`].
///
/// # Examples
///
/// ```rust
/// use pg_append::{append_identifier, QuoteMode};
///
/// let mut buf = Vec::new();
/// append_identifier(&mut buf, "a.b", QuoteMode::Identifier);
/// assert_eq!(buf, br#""a"."b""#);
///
/// buf.clear();
/// append_identifier(&mut buf, "*", QuoteMode::Identifier);
/// assert_eq!(buf, b"*");
///
/// buf.clear();
/// append_identifier(&mut buf, "a.b", QuoteMode::Raw);
/// assert_eq!(buf, b"a.b");
/// ```
#[inline]
pub fn append_identifier(buf: &mut Vec<u8>, path: &str, quote: QuoteMode) {
    append_identifier_bytes(buf, path.as_bytes(), quote);
}

/// Byte-oriented form of [`append_identifier`].
pub fn append_identifier_bytes(buf: &mut Vec<u8>, path: &[u8], quote: QuoteMode) {
    let quoting = quote.is_identifier();
    let mut cursor = Cursor::new(path);
    let mut quoted = false;

    buf.reserve(path.len() + 2);
    while let Some(c) = cursor.next_byte() {
        match c {
            b'*' if !quoted => {
                buf.push(b'*');
                continue;
            }
            b'.' => {
                if quoted && quoting {
                    buf.push(b'"');
                    quoted = false;
                }
                buf.push(b'.');
                if cursor.skip(b'*') {
                    buf.push(b'*');
                } else if quoting {
                    buf.push(b'"');
                    quoted = true;
                }
                continue;
            }
            _ => {}
        }

        if !quoted && quoting {
            buf.push(b'"');
            quoted = true;
        }
        if quoting && c == b'"' {
            buf.extend_from_slice(b"\"\"");
        } else {
            buf.push(c);
        }
    }

    if quoted && quoting {
        buf.push(b'"');
    }
}
