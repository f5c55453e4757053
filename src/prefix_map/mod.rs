//! PrefixMaps are string keyed maps that support finding values with a longest prefix
//!
//! The parser uses them to match operator symbols at the cursor: when several registered symbols
//! start at the same position (e.g. `<` and `<->`), the longest one wins. Each [`ParserConfig`]
//! keeps one map per arity, so the map type decides how fast every operator lookup is.
//!
//! A `qp-trie` backed map is the default. Without the `qp-trie` feature a std [`HashPrefixMap`] is
//! used instead, and the `fnv` feature adds a [`FnvHashPrefixMap`] alias. [`LinearPrefixMap`] is
//! the simplest implementation and serves as the reference the others are tested against.
//!
//! # Example
//!
//! ```
//! use polish_notation::prefix_map::{LinearPrefixMap, PrefixMap};
//! use polish_notation::{parse_with, OperatorRegistry, ParserConfig};
//!
//! let config: ParserConfig<LinearPrefixMap<_, _>> =
//!     ParserConfig::with_map(OperatorRegistry::default());
//! let parsed = parse_with("a & !b", &config).unwrap();
//! assert_eq!(parsed.tree.render(polish_notation::Notation::Polish), "&a!b");
//! ```
//!
//! [`ParserConfig`]: crate::ParserConfig

mod hash;
mod linear;
#[cfg(feature = "qp-trie")]
mod trie;

#[cfg(feature = "fnv")]
use ::fnv::FnvBuildHasher;
pub use hash::HashPrefixMap;
pub use linear::LinearPrefixMap;
#[cfg(feature = "qp-trie")]
pub use trie::QpTriePrefixMap;

/// A hash prefix map using the fnv hasher
///
/// Requires the `fnv` feature.
///
/// # Example
/// ```
/// use polish_notation::prefix_map::FnvHashPrefixMap;
/// use polish_notation::{parse_with, OperatorRegistry, ParserConfig};
///
/// let config = ParserConfig::with_map_from(
///     OperatorRegistry::default(),
///     FnvHashPrefixMap::from_iter_hasher,
/// );
/// let parsed = parse_with("a | b", &config).unwrap();
/// ```
#[cfg(feature = "fnv")]
pub type FnvHashPrefixMap<K, V> = HashPrefixMap<K, V, FnvBuildHasher>;

/// A PrefixMap is a map that supports operations on the prefix of an input
pub trait PrefixMap<V> {
    /// Get the byte length and value of the longest key that is a prefix of `inp`
    ///
    /// # Example
    /// ```
    /// use polish_notation::prefix_map::{HashPrefixMap, PrefixMap};
    ///
    /// let map = HashPrefixMap::from_iter([("<", 1), ("<->", 3)]);
    /// assert_eq!(map.get_longest_prefix("<-a"), Some((1, &1)));
    /// assert_eq!(map.get_longest_prefix("<->a"), Some((3, &3)));
    /// ```
    fn get_longest_prefix<P: AsRef<str>>(&self, inp: P) -> Option<(usize, &V)>;

    /// Get the value stored under exactly `key`
    ///
    /// # Example
    /// ```
    /// use polish_notation::prefix_map::{HashPrefixMap, PrefixMap};
    ///
    /// let map = HashPrefixMap::from_iter([("<", 1), ("<->", 3)]);
    /// assert_eq!(map.get("<->"), Some(&3));
    /// assert_eq!(map.get("<-"), None);
    /// ```
    fn get<P: AsRef<str>>(&self, key: P) -> Option<&V> {
        let key = key.as_ref();
        match self.get_longest_prefix(key) {
            Some((len, val)) if len == key.len() => Some(val),
            _ => None,
        }
    }
}
