use super::PrefixMap;
use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

/// A prefix map that buckets keys by byte length with one hashmap per length
///
/// This is the default operator map when the `qp-trie` feature is disabled. A lookup probes every
/// bucket from the longest possible key length downwards, so it takes `O(longest_key)` hashes.
///
/// # Example
/// ```
/// use polish_notation::prefix_map::HashPrefixMap;
/// use polish_notation::BUILTIN_OPERATORS;
///
/// let map = HashPrefixMap::from_iter(BUILTIN_OPERATORS.map(|op| (op.symbol.clone(), op)));
/// ```
#[derive(Debug, Clone)]
pub struct HashPrefixMap<K, V, S = RandomState> {
    buckets: Box<[HashMap<K, V, S>]>,
}

impl<K, V, S> HashPrefixMap<K, V, S>
where
    K: Borrow<str> + Hash + Eq,
    S: BuildHasher + Default,
{
    /// Create from an iterator and custom hasher
    pub fn from_iter_hasher<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = (K, V)>,
    {
        let mut buckets: Vec<HashMap<K, V, S>> = Vec::new();
        for (key, val) in iter {
            let len = key.borrow().len();
            if buckets.len() <= len {
                buckets.resize_with(len + 1, HashMap::default);
            }
            buckets[len].insert(key, val);
        }
        HashPrefixMap {
            buckets: buckets.into(),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for HashPrefixMap<K, V>
where
    K: Borrow<str> + Hash + Eq,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self::from_iter_hasher(iter)
    }
}

impl<K, V, S> PrefixMap<V> for HashPrefixMap<K, V, S>
where
    K: Borrow<str> + Hash + Eq,
    S: BuildHasher,
{
    fn get_longest_prefix<P: AsRef<str>>(&self, inp: P) -> Option<(usize, &V)> {
        let inp = inp.as_ref();
        let longest = self.buckets.len().min(inp.len() + 1);
        self.buckets[..longest]
            .iter()
            .enumerate()
            .rev()
            .filter(|(len, _)| inp.is_char_boundary(*len))
            .find_map(|(len, bucket)| bucket.get(&inp[..len]).map(|val| (len, val)))
    }
}
