//! Ordered text map for composite `key=>value` literals.
//!
//! This module provides [`Hstore`], a wrapper around [`IndexMap`] that keeps
//! insertion order, so the literal produced by [`append_map`](crate::append_map)
//! is deterministic. Plain `HashMap`s are accepted by the encoder too, but their
//! entries come out in whatever order the hasher yields.
//!
//! ## Examples
//!
//! ```rust
//! use pg_append::{append_map, Hstore, QuoteMode};
//!
//! let mut attrs = Hstore::new();
//! attrs.insert("color", "red");
//! attrs.insert("size", "L");
//!
//! let mut buf = Vec::new();
//! append_map(&mut buf, Some(&attrs), QuoteMode::Literal);
//! assert_eq!(buf, br#"'"color"=>"red","size"=>"L"'"#);
//! ```

use crate::error::BoxError;
use crate::options::QuoteMode;
use crate::value::{AppendSql, Value};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};

/// An insertion-ordered map of text keys to text values.
///
/// # Examples
///
/// ```rust
/// use pg_append::Hstore;
///
/// let mut map = Hstore::new();
/// map.insert("first", "1");
/// map.insert("second", "2");
///
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hstore(IndexMap<String, String>);

impl Hstore {
    #[must_use]
    pub fn new() -> Self {
        Hstore(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Hstore(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair, returning the previous value of the key.
    ///
    /// A replaced key keeps its original position.
    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Removes a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sorts entries by key so iteration, and encoded output, no longer depend on
    /// insertion order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pg_append::Hstore;
    ///
    /// let mut map: Hstore = [("b", "2"), ("a", "1")].into_iter().collect();
    /// map.sort_keys();
    /// assert_eq!(map.keys().next().map(String::as_str), Some("a"));
    /// ```
    pub fn sort_keys(&mut self) {
        self.0.sort_keys();
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, String> {
        self.0.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, String, String> {
        self.0.values()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, String> {
        self.0.iter()
    }
}

/// Lets an `Hstore` travel through [`append_value`](crate::append_value) as a
/// self-encoding value.
impl AppendSql for Hstore {
    fn append_sql(&self, buf: &mut Vec<u8>, quote: QuoteMode) -> Result<(), BoxError> {
        crate::append::append_map(buf, Some(self), quote);
        Ok(())
    }
}

impl From<Hstore> for Value {
    fn from(map: Hstore) -> Self {
        Value::appender(map)
    }
}

impl From<HashMap<String, String>> for Hstore {
    fn from(map: HashMap<String, String>) -> Self {
        Hstore(map.into_iter().collect())
    }
}

impl From<BTreeMap<String, String>> for Hstore {
    fn from(map: BTreeMap<String, String>) -> Self {
        Hstore(map.into_iter().collect())
    }
}

impl From<Hstore> for HashMap<String, String> {
    fn from(map: Hstore) -> Self {
        map.0.into_iter().collect()
    }
}

impl IntoIterator for Hstore {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Hstore {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Hstore {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Hstore(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
