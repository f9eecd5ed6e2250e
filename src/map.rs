use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::iter::{Extend, FromIterator, FusedIterator};
use std::ops::Index;

mod raw;

use raw::RawOrderedMap;

use serde::de::DeserializeSeed;

use crate::error::OutOfRange;
use crate::hash::RandomState;

/// A Hash table based collection that iterates in insertion order
///
/// Entries live in a sequence, and a hash index maps each key to its current position in that sequence.
/// Every operation keeps the two in sync: positional insertions and removals rewrite the recorded position of each
/// entry they shift, so [`get_index_of`](Self::get_index_of) and [`key_at`](Self::key_at) always agree.
///
/// Inserting a key that is already present moves it to the end (or to the requested position for
/// [`insert_at`](Self::insert_at)), so a key never occupies more than one slot.
///
/// Not synchronized; share it across threads only behind a lock.
#[derive(Clone)]
pub struct OrderedMap<K, V, S = RandomState<2, 4>> {
    inner: RawOrderedMap<K, V>,
    hasher: S,
}

impl<K: core::fmt::Debug, V: core::fmt::Debug, S> core::fmt::Debug for OrderedMap<K, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self).finish()
    }
}

impl<K, V, S: Default> Default for OrderedMap<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K: PartialEq, V: PartialEq, S> PartialEq for OrderedMap<K, V, S> {
    /// Two maps are equal when they hold equal entries in the same order.
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<K: Eq, V: Eq, S> Eq for OrderedMap<K, V, S> {}

impl<K, V> OrderedMap<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RawOrderedMap::new(),
            hasher: RandomState::new(),
        }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            inner: RawOrderedMap::with_capacity(cap),
            hasher: RandomState::new(),
        }
    }
}

impl<K, V, S> OrderedMap<K, V, S> {
    pub const fn with_hasher(hasher: S) -> Self {
        Self {
            inner: RawOrderedMap::new(),
            hasher,
        }
    }

    pub fn with_capacity_and_hasher(cap: usize, hasher: S) -> Self {
        Self {
            inner: RawOrderedMap::with_capacity(cap),
            hasher,
        }
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.inner.clear()
    }

    /// The entries, in order.
    pub fn as_slice(&self) -> &[(K, V)] {
        self.inner.as_slice()
    }

    pub fn get_index(&self, position: usize) -> Option<(&K, &V)> {
        self.inner.get_at(position).map(|(k, v)| (k, v))
    }

    pub fn get_index_mut(&mut self, position: usize) -> Option<(&K, &mut V)> {
        self.inner.get_at_mut(position).map(|(k, v)| (&*k, v))
    }

    fn out_of_range(&self, position: usize) -> OutOfRange {
        OutOfRange {
            position,
            len: self.len(),
        }
    }

    /// Returns the value at `position`, or an error if `position >= self.len()`.
    pub fn value_at(&self, position: usize) -> Result<&V, OutOfRange> {
        match self.inner.get_at(position) {
            Some((_, v)) => Ok(v),
            None => Err(self.out_of_range(position)),
        }
    }

    pub fn value_at_mut(&mut self, position: usize) -> Result<&mut V, OutOfRange> {
        let err = self.out_of_range(position);
        self.inner.get_at_mut(position).map(|(_, v)| v).ok_or(err)
    }

    /// Returns the key at `position`, or an error if `position >= self.len()`.
    pub fn key_at(&self, position: usize) -> Result<&K, OutOfRange> {
        match self.inner.get_at(position) {
            Some((k, _)) => Ok(k),
            None => Err(self.out_of_range(position)),
        }
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> OrderedMap<K, V, S> {
    fn hash_key<Q: Hash + ?Sized>(hasher: &S, key: &Q) -> u64 {
        hasher.hash_one(key)
    }

    fn key_eq<Q: Hash + Eq + ?Sized>(key: &Q) -> impl FnMut(&K) -> bool + '_
    where
        K: Borrow<Q>,
    {
        move |k| <K as Borrow<Q>>::borrow(k) == key
    }

    pub fn reserve(&mut self, additional: usize) {
        let Self { inner, hasher } = self;

        inner.reserve(additional, |key| Self::hash_key(hasher, key));
    }

    pub fn contains_key<Q: Hash + Eq + ?Sized>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
    {
        self.get_index_of(key).is_some()
    }

    pub fn get<Q: Hash + Eq + ?Sized>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
    {
        let hash = Self::hash_key(&self.hasher, key);
        self.inner.get(hash, Self::key_eq(key)).map(|(_, v)| v)
    }

    pub fn get_key_value<Q: Hash + Eq + ?Sized>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
    {
        let hash = Self::hash_key(&self.hasher, key);

        self.inner.get(hash, Self::key_eq(key)).map(|(k, v)| (k, v))
    }

    pub fn get_mut<Q: Hash + Eq + ?Sized>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
    {
        let hash = Self::hash_key(&self.hasher, key);
        self.inner.get_mut(hash, Self::key_eq(key)).map(|(_, v)| v)
    }

    /// Returns the current position of `key` in iteration order.
    pub fn get_index_of<Q: Hash + Eq + ?Sized>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
    {
        let hash = Self::hash_key(&self.hasher, key);
        self.inner.position(hash, Self::key_eq(key))
    }

    /// Appends `key` and `value` as the last entry.
    ///
    /// If `key` was already present, its old entry is removed first and the old value is returned.
    /// The entries that followed it move one position earlier.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hasher = &self.hasher;
        let hash = Self::hash_key(hasher, &key);
        self.inner
            .push(hash, key, value, |key| Self::hash_key(hasher, key), K::eq)
            .map(|(_, val)| val)
    }

    /// Inserts `key` and `value` at `position`, moving every entry at or after it one position later.
    ///
    /// `position` may equal `self.len()`, which appends. Anything larger is an error, and leaves the map untouched.
    ///
    /// If `key` was already present, its old entry is removed first and the old value is returned. `position` then
    /// refers to the map without that entry, and is clamped to its length.
    pub fn insert_at(&mut self, position: usize, key: K, value: V) -> Result<Option<V>, OutOfRange> {
        if position > self.len() {
            return Err(self.out_of_range(position));
        }

        let hasher = &self.hasher;
        let hash = Self::hash_key(hasher, &key);
        let prev = self.inner.insert_at(
            position,
            hash,
            key,
            value,
            |key| Self::hash_key(hasher, key),
            K::eq,
        );

        Ok(prev.map(|(_, val)| val))
    }

    /// Returns the value for `key`, appending `value` for it first if it is absent.
    ///
    /// An existing entry keeps both its value and its position.
    pub fn get_or_insert_mut(&mut self, key: K, value: V) -> &mut V {
        self.get_or_insert_with_mut(key, |_| value)
    }

    pub fn get_or_insert_with_mut<D: FnOnce(&K) -> V>(&mut self, key: K, val: D) -> &mut V {
        let hasher = &self.hasher;
        let hash = Self::hash_key(hasher, &key);
        let (position, _) =
            self.inner
                .get_or_push_with(hash, key, val, |key| Self::hash_key(hasher, key), K::eq);

        match self.inner.get_at_mut(position) {
            Some((_, val)) => val,
            None => unreachable!("entry at {} vanished after insertion", position),
        }
    }

    /// Removes the entry at `position`, moving every entry after it one position earlier.
    pub fn remove_at(&mut self, position: usize) -> Result<(K, V), OutOfRange> {
        let err = self.out_of_range(position);
        let hasher = &self.hasher;

        self.inner
            .remove_at(position, |key| Self::hash_key(hasher, key))
            .ok_or(err)
    }

    /// Removes `key`, returning its value if it was present.
    ///
    /// The entries that followed it move one position earlier.
    pub fn remove<Q: Hash + Eq + ?Sized>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
    {
        self.remove_entry(key).map(|(_, val)| val)
    }

    pub fn remove_entry<Q: Hash + Eq + ?Sized>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
    {
        let hasher = &self.hasher;
        let hash = Self::hash_key(hasher, key);
        self.inner
            .remove(hash, Self::key_eq(key), |k| Self::hash_key(hasher, k))
            .map(|(_, entry)| entry)
    }

    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        let hasher = &self.hasher;
        self.inner.is_consistent(|key| Self::hash_key(hasher, key))
    }
}

impl<K: Hash + Eq, Q: Hash + Eq + ?Sized, V, S: BuildHasher> Index<&Q> for OrderedMap<K, V, S>
where
    K: Borrow<Q>,
{
    type Output = V;

    #[track_caller]
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no such key in table")
    }
}

impl<K, V, S> OrderedMap<K, V, S> {
    pub fn iter(&self) -> Iter<K, V> {
        Iter(self.inner.iter())
    }

    pub fn iter_mut(&mut self) -> IterMut<K, V> {
        IterMut(self.inner.iter_mut())
    }

    pub fn keys(&self) -> Keys<K, V> {
        Keys(self.inner.iter())
    }

    pub fn values(&self) -> Values<K, V> {
        Values(self.inner.iter())
    }

    pub fn values_mut(&mut self) -> ValuesMut<K, V> {
        ValuesMut(self.inner.iter_mut())
    }
}

impl<K, V, S> IntoIterator for OrderedMap<K, V, S> {
    type IntoIter = IntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self.inner.into_iter())
    }
}

impl<'a, K, V, S> IntoIterator for &'a OrderedMap<K, V, S> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut OrderedMap<K, V, S> {
    type IntoIter = IterMut<'a, K, V>;
    type Item = (&'a K, &'a mut V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K: Hash + Eq, V, S: Default + BuildHasher> FromIterator<(K, V)> for OrderedMap<K, V, S> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::default();

        map.extend(iter);

        map
    }
}

impl<'a, 'b, K: Hash + Eq + Clone, V: Clone, S: Default + BuildHasher> FromIterator<(&'a K, &'b V)>
    for OrderedMap<K, V, S>
{
    fn from_iter<T: IntoIterator<Item = (&'a K, &'b V)>>(iter: T) -> Self {
        let mut map = Self::default();

        map.extend(iter);

        map
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> Extend<(K, V)> for OrderedMap<K, V, S> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);

        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, 'b, K: Hash + Eq + Clone, V: Clone, S: BuildHasher> Extend<(&'a K, &'b V)>
    for OrderedMap<K, V, S>
{
    fn extend<T: IntoIterator<Item = (&'a K, &'b V)>>(&mut self, iter: T) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);

        for (k, v) in iter {
            self.insert(k.clone(), v.clone());
        }
    }
}

pub struct IntoIter<K, V>(raw::IntoIter<K, V>);

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}

pub struct Iter<'a, K, V>(raw::Iter<'a, K, V>);

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(k, v)| (k, v))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}
impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

pub struct IterMut<'a, K, V>(raw::IterMut<'a, K, V>);

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, v)| (&*k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for IterMut<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(k, v)| (&*k, v))
    }
}

impl<'a, K, V> ExactSizeIterator for IterMut<'a, K, V> {}
impl<'a, K, V> FusedIterator for IterMut<'a, K, V> {}

pub struct Keys<'a, K, V>(raw::Iter<'a, K, V>);

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Keys<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(k, _)| k)
    }
}

impl<'a, K, V> ExactSizeIterator for Keys<'a, K, V> {}
impl<'a, K, V> FusedIterator for Keys<'a, K, V> {}

pub struct Values<'a, K, V>(raw::Iter<'a, K, V>);

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Values<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(_, v)| v)
    }
}

impl<'a, K, V> ExactSizeIterator for Values<'a, K, V> {}
impl<'a, K, V> FusedIterator for Values<'a, K, V> {}

pub struct ValuesMut<'a, K, V>(raw::IterMut<'a, K, V>);

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for ValuesMut<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(_, v)| v)
    }
}

impl<'a, K, V> ExactSizeIterator for ValuesMut<'a, K, V> {}
impl<'a, K, V> FusedIterator for ValuesMut<'a, K, V> {}

impl<K: serde::ser::Serialize, V: serde::ser::Serialize, S> serde::ser::Serialize
    for OrderedMap<K, V, S>
{
    fn serialize<__S>(&self, serializer: __S) -> Result<__S::Ok, __S::Error>
    where
        __S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut ser = serializer.serialize_map(Some(self.len()))?;

        for (key, value) in self {
            ser.serialize_entry(key, value)?;
        }

        ser.end()
    }
}

impl<
        'de,
        K: serde::de::Deserialize<'de> + Hash + Eq,
        V: serde::de::Deserialize<'de>,
        S: BuildHasher + Default,
    > serde::de::Deserialize<'de> for OrderedMap<K, V, S>
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        de::WithHasher::new(S::default()).deserialize(deserializer)
    }
}

pub mod de;

#[cfg(test)]
mod test {
    use super::*;

    fn abc() -> OrderedMap<&'static str, i32> {
        let mut map = OrderedMap::new();
        map.insert("a", 1);
        map.insert("b", 2);
        map.insert("c", 3);
        map
    }

    fn entries<K: Clone, V: Clone, S>(map: &OrderedMap<K, V, S>) -> Vec<(K, V)> {
        map.as_slice().to_vec()
    }

    #[test]
    fn appends_in_call_order() {
        let map = abc();
        assert_eq!(entries(&map), [("a", 1), ("b", 2), ("c", 3)]);
        assert_eq!(map.len(), 3);
        assert_eq!(map.get("b"), Some(&2));
        assert!(map.is_consistent());
    }

    #[test]
    fn reinsert_moves_to_end() {
        let mut map = abc();
        assert_eq!(map.insert("a", 10), Some(1));
        assert_eq!(entries(&map), [("b", 2), ("c", 3), ("a", 10)]);
        assert_eq!(map.len(), 3);
        assert_eq!(map.get_index_of("a"), Some(2));
        assert_eq!(map.get_index_of("b"), Some(0));
        assert!(map.is_consistent());
    }

    #[test]
    fn insert_at_shifts_and_reindexes() {
        let mut map = abc();
        assert_eq!(map.insert_at(1, "x", 9), Ok(None));
        assert_eq!(entries(&map), [("a", 1), ("x", 9), ("b", 2), ("c", 3)]);
        assert_eq!(map.get_index_of("b"), Some(2));
        assert_eq!(map.get_index_of("c"), Some(3));
        assert!(map.is_consistent());
    }

    #[test]
    fn insert_at_front_and_end() {
        let mut map = abc();
        map.insert_at(0, "first", 0).unwrap();
        map.insert_at(map.len(), "last", 4).unwrap();
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), ["first", "a", "b", "c", "last"]);
        assert!(map.is_consistent());
    }

    #[test]
    fn insert_at_past_end_fails_without_mutation() {
        let mut map = abc();
        assert_eq!(
            map.insert_at(4, "x", 9),
            Err(OutOfRange {
                position: 4,
                len: 3
            })
        );
        assert_eq!(entries(&map), [("a", 1), ("b", 2), ("c", 3)]);
        assert!(!map.contains_key("x"));
    }

    #[test]
    fn insert_at_existing_key_moves_it() {
        let mut map = abc();
        assert_eq!(map.insert_at(0, "c", 30), Ok(Some(3)));
        assert_eq!(entries(&map), [("c", 30), ("a", 1), ("b", 2)]);

        // position 3 is valid before "a" is removed, and clamps to the end after
        assert_eq!(map.insert_at(3, "a", 10), Ok(Some(1)));
        assert_eq!(entries(&map), [("c", 30), ("b", 2), ("a", 10)]);
        assert!(map.is_consistent());
    }

    #[test]
    fn remove_by_key_reindexes() {
        let mut map = abc();
        map.insert_at(1, "x", 9).unwrap();
        assert_eq!(map.remove("a"), Some(1));
        assert_eq!(entries(&map), [("x", 9), ("b", 2), ("c", 3)]);
        assert_eq!(map.get("a"), None);
        assert_eq!(map.get_index_of("a"), None);
        assert_eq!(map.get_index_of("b"), Some(1));
        assert!(map.is_consistent());
    }

    #[test]
    fn remove_missing_key_is_noop() {
        let mut map = abc();
        assert_eq!(map.remove("zzz"), None);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn remove_at_reindexes() {
        let mut map = abc();
        assert_eq!(map.remove_at(1), Ok(("b", 2)));
        assert_eq!(map.get_index_of("c"), Some(1));
        assert!(!map.contains_key("b"));
        assert_eq!(
            map.remove_at(2),
            Err(OutOfRange {
                position: 2,
                len: 2
            })
        );
        assert!(map.is_consistent());
    }

    #[test]
    fn positional_access_is_bounds_checked() {
        let mut map = abc();
        assert_eq!(map.key_at(2), Ok(&"c"));
        assert_eq!(map.value_at(0), Ok(&1));
        assert_eq!(map.value_at(3).unwrap_err().len, 3);
        assert!(map.key_at(usize::MAX).is_err());

        *map.value_at_mut(1).unwrap() = 20;
        assert_eq!(map.get("b"), Some(&20));
        assert!(map.value_at_mut(3).is_err());
        assert_eq!(map.get_index(5), None);
    }

    #[test]
    fn get_or_insert_keeps_position() {
        let mut map = abc();
        *map.get_or_insert_mut("a", 100) += 1;
        assert_eq!(entries(&map), [("a", 2), ("b", 2), ("c", 3)]);

        let v = map.get_or_insert_with_mut("d", |k| k.len() as i32);
        assert_eq!(*v, 1);
        assert_eq!(map.get_index_of("d"), Some(3));
        assert!(map.is_consistent());
    }

    #[test]
    fn iterators_follow_sequence_order() {
        let mut map = abc();
        for v in map.values_mut() {
            *v *= 10;
        }
        for (_, v) in &mut map {
            *v += 1;
        }
        assert_eq!(map.values().copied().collect::<Vec<_>>(), [11, 21, 31]);
        assert_eq!(map.iter().rev().next(), Some((&"c", &31)));
        assert_eq!(map.keys().len(), 3);
        assert_eq!(
            map.into_iter().collect::<Vec<_>>(),
            [("a", 11), ("b", 21), ("c", 31)]
        );
    }

    #[test]
    fn collect_keeps_last_duplicate() {
        let map: OrderedMap<&str, i32> = [("a", 1), ("b", 2), ("a", 3)].into_iter().collect();
        assert_eq!(entries(&map), [("b", 2), ("a", 3)]);
        assert!(map.is_consistent());
    }

    #[test]
    fn equality_respects_order() {
        let ab: OrderedMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
        let ba: OrderedMap<&str, i32> = [("b", 2), ("a", 1)].into_iter().collect();
        assert_ne!(ab, ba);
        assert_eq!(ab, ab.iter().collect::<OrderedMap<&str, i32>>());
    }

    #[test]
    fn debug_prints_in_order() {
        assert_eq!(format!("{:?}", abc()), r#"{"a": 1, "b": 2, "c": 3}"#);
    }

    #[test]
    fn borrowed_lookups() {
        let mut map = OrderedMap::new();
        map.insert(String::from("key"), 1);
        assert_eq!(map["key"], 1);
        assert_eq!(map.get_key_value("key"), Some((&String::from("key"), &1)));
        assert_eq!(map.remove_entry("key"), Some((String::from("key"), 1)));
        assert!(map.is_empty());
    }

    #[test]
    #[should_panic(expected = "no such key in table")]
    fn index_missing_key_panics() {
        let map = abc();
        let _missing = map["nope"];
    }

    #[test]
    fn survives_many_mixed_operations() {
        let mut map = OrderedMap::with_capacity(4);
        for i in 0..64u32 {
            map.insert(i, i * 2);
        }
        for i in (0..64u32).step_by(3) {
            map.remove(&i);
        }
        for i in 0..16u32 {
            map.insert_at((i as usize * 7) % (map.len() + 1), 100 + i, i)
                .unwrap();
        }
        while map.len() > 20 {
            map.remove_at(map.len() / 2).unwrap();
        }
        assert!(map.is_consistent());
        for (pos, (key, val)) in map.iter().enumerate() {
            assert_eq!(map.get_index_of(key), Some(pos));
            assert_eq!(map.get(key), Some(val));
        }
    }

    #[test]
    fn clear_empties_both_views() {
        let mut map = abc();
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.get("a"), None);
        map.insert("a", 5);
        assert_eq!(map.get_index_of("a"), Some(0));
    }
}
