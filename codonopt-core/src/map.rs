use std::borrow::Borrow;
use std::hash::{Hash, Hasher};

use fxhash::FxHasher;

use crate::consts::DEFAULT_BUCKETS;

///
/// A fixed-bucket, chained hash map.
///
/// Collisions are resolved by appending to a per-bucket chain; lookups do a
/// linear scan within the chain. There is no resizing: the bucket count is
/// chosen at construction, and pathological clustering for a too-small
/// bucket count over a large key set is an accepted limitation.
///
/// Iteration visits buckets in ascending index order and each chain in
/// insertion order. Because the bucket hash ([FxHasher]) is unkeyed, that
/// order is reproducible across runs, which keeps downstream argmax scans
/// run-reproducible.
///
#[derive(Debug, Clone)]
pub struct ChainedMap<K, V> {
    buckets: Vec<Vec<(K, V)>>,
    len: usize,
}

fn bucket_of<Q: Hash + ?Sized>(key: &Q, n_buckets: usize) -> usize {
    let mut hasher = FxHasher::default();
    key.hash(&mut hasher);
    (hasher.finish() as usize) % n_buckets
}

impl<K, V> ChainedMap<K, V>
where
    K: Hash + Eq,
{
    pub fn new() -> Self {
        Self::with_buckets(DEFAULT_BUCKETS)
    }

    pub fn with_buckets(n_buckets: usize) -> Self {
        assert!(n_buckets > 0, "bucket count must be non-zero");
        ChainedMap {
            buckets: (0..n_buckets).map(|_| Vec::new()).collect(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    ///
    /// Insert a key-value pair, overwriting the value if the key is already
    /// present. A key never occupies more than one chain slot.
    ///
    pub fn insert(&mut self, key: K, value: V) {
        let index = bucket_of(&key, self.buckets.len());
        let chain = &mut self.buckets[index];
        match chain.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => {
                chain.push((key, value));
                self.len += 1;
            }
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = bucket_of(key, self.buckets.len());
        self.buckets[index]
            .iter()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = bucket_of(key, self.buckets.len());
        self.buckets[index]
            .iter_mut()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    ///
    /// Get a mutable reference to the value for `key`, inserting the result
    /// of `default` first if the key is absent. This is the lazy-creation
    /// primitive the nested accumulators are built on.
    ///
    pub fn get_or_insert_with(&mut self, key: K, default: impl FnOnce() -> V) -> &mut V {
        let index = bucket_of(&key, self.buckets.len());
        let chain = &mut self.buckets[index];
        let position = chain.iter().position(|(k, _)| *k == key);
        match position {
            Some(position) => &mut chain[position].1,
            None => {
                chain.push((key, default()));
                self.len += 1;
                let last = chain.len() - 1;
                &mut chain[last].1
            }
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.buckets.iter().flatten().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets.iter().flatten().map(|(k, v)| (k, v))
    }
}

impl<K, V> Default for ChainedMap<K, V>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> IntoIterator for ChainedMap<K, V> {
    type Item = (K, V);
    type IntoIter = std::iter::Flatten<std::vec::IntoIter<Vec<(K, V)>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.into_iter().flatten()
    }
}
