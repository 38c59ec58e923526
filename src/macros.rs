/// Builds an [`Hstore`](crate::Hstore) from `key => value` pairs, keeping the
/// written order.
///
/// ```rust
/// use pg_append::hstore;
///
/// let map = hstore! {
///     "color" => "red",
///     "size" => "L",
/// };
/// assert_eq!(map.len(), 2);
/// assert_eq!(map.get("size"), Some("L"));
/// ```
#[macro_export]
macro_rules! hstore {
    // Handle empty map
    () => {
        $crate::Hstore::new()
    };

    // Handle non-empty map
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::Hstore::new();
        $(
            map.insert($key, $value);
        )+
        map
    }};
}
