use super::PrefixMap;
use qp_trie::Trie;
use std::borrow::Borrow;

#[derive(Debug, PartialEq, Eq, Clone)]
struct ByteKey<K>(K);

impl<K> Borrow<[u8]> for ByteKey<K>
where
    K: Borrow<str>,
{
    fn borrow(&self) -> &[u8] {
        self.0.borrow().as_bytes()
    }
}

/// A prefix map backed by a qp-trie
///
/// This is the default operator map and requires the `qp-trie` feature (enabled by default). A
/// lookup walks the trie one byte at a time and stops as soon as no key continues the input, so
/// it takes `O(longest_match)`.
///
/// # Example
/// ```
/// use polish_notation::prefix_map::{PrefixMap, QpTriePrefixMap};
///
/// let map = QpTriePrefixMap::from_iter([("~", 3), ("~>", 7)]);
/// assert_eq!(map.get_longest_prefix("~>b"), Some((2, &7)));
/// ```
#[derive(Debug, Clone)]
pub struct QpTriePrefixMap<K: Clone, V>(Trie<ByteKey<K>, V>);

impl<K, V> FromIterator<(K, V)> for QpTriePrefixMap<K, V>
where
    K: Borrow<str> + Clone,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        QpTriePrefixMap(
            iter.into_iter()
                .map(|(key, val)| (ByteKey(key), val))
                .collect(),
        )
    }
}

impl<K, V> PrefixMap<V> for QpTriePrefixMap<K, V>
where
    K: Borrow<str> + Clone,
{
    fn get_longest_prefix<P: AsRef<str>>(&self, inp: P) -> Option<(usize, &V)> {
        let bytes = inp.as_ref().as_bytes();
        let empty: &[u8] = &[];
        let mut found = self.0.get(empty).map(|val| (0, val));
        let mut branch = self.0.subtrie(empty);
        for end in 1..=bytes.len() {
            let key = &bytes[..end];
            branch = branch.subtrie(key);
            if branch.is_empty() {
                break;
            }
            if let Some(val) = branch.get(key) {
                found = Some((end, val));
            }
        }
        found
    }
}
