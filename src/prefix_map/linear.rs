use super::PrefixMap;
use std::borrow::Borrow;

/// A very simple prefix map
///
/// Keys are kept sorted longest first, so the first key that prefixes the input is the answer.
/// Lookups take `O(num_keys)`, which is plenty for the handful of operators a formula language
/// usually has. When a key is inserted more than once the last value wins, matching the
/// replacement semantics of [`OperatorRegistry::register`][crate::OperatorRegistry::register].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearPrefixMap<K, V>(Box<[(K, V)]>);

impl<K, V> LinearPrefixMap<K, V>
where
    K: Borrow<str> + Eq,
{
    /// Create from a vector of entries
    pub fn from_vec<B>(inp: B) -> Self
    where
        B: Into<Vec<(K, V)>>,
    {
        let mut entries = inp.into();
        // later entries first so the stable sort and dedup keep the most recent value
        entries.reverse();
        entries.sort_by(|(left, _), (right, _)| {
            let left = left.borrow();
            let right = right.borrow();
            right
                .len()
                .cmp(&left.len())
                .then_with(|| left.as_bytes().cmp(right.as_bytes()))
        });
        entries.dedup_by(|(next, _), (kept, _)| next == kept);
        LinearPrefixMap(entries.into())
    }

    /// The number of distinct keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no keys
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for LinearPrefixMap<K, V>
where
    K: Borrow<str> + Eq,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self::from_vec(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<K: Borrow<str>, V> PrefixMap<V> for LinearPrefixMap<K, V> {
    fn get_longest_prefix<P: AsRef<str>>(&self, inp: P) -> Option<(usize, &V)> {
        let inp = inp.as_ref();
        self.0
            .iter()
            .map(|(key, val)| (key.borrow(), val))
            .find(|(key, _)| inp.starts_with(key))
            .map(|(key, val)| (key.len(), val))
    }
}
