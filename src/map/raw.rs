use hashbrown::raw::RawTable;

use std::iter::FusedIterator;

use crate::log::{log_debug, LogLevel};

/// The entry sequence plus a hash index of positions into it.
///
/// Buckets of `index` store positions into `entries`, and are hashed and compared through the key stored at that position.
/// Every method here leaves the two in sync: each key in `entries` has exactly one bucket, holding its current position.
#[derive(Clone)]
pub struct RawOrderedMap<K, V> {
    index: RawTable<usize>,
    entries: Vec<(K, V)>,
}

impl<K, V> RawOrderedMap<K, V> {
    pub const fn new() -> Self {
        Self {
            index: RawTable::new(),
            entries: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: RawTable::with_capacity(capacity),
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn position<E: FnMut(&K) -> bool>(&self, hash: u64, mut eq: E) -> Option<usize> {
        let entries = &self.entries;
        self.index.get(hash, |pos| eq(&entries[*pos].0)).copied()
    }

    pub fn get<E: FnMut(&K) -> bool>(&self, hash: u64, eq: E) -> Option<&(K, V)> {
        let pos = self.position(hash, eq)?;

        // SAFETY: every bucket holds a position in bounds of `entries`
        Some(unsafe { self.entries.get_unchecked(pos) })
    }

    pub fn get_mut<E: FnMut(&K) -> bool>(&mut self, hash: u64, eq: E) -> Option<&mut (K, V)> {
        let pos = self.position(hash, eq)?;

        // SAFETY: every bucket holds a position in bounds of `entries`
        Some(unsafe { self.entries.get_unchecked_mut(pos) })
    }

    pub fn get_at(&self, pos: usize) -> Option<&(K, V)> {
        self.entries.get(pos)
    }

    pub fn get_at_mut(&mut self, pos: usize) -> Option<&mut (K, V)> {
        self.entries.get_mut(pos)
    }

    /// If `key` is not present, appends the pair built by `val_ctor` and returns `true`.
    /// Otherwise returns `false`, leaving the existing entry (and its position) alone.
    /// In both cases, returns the position of the entry for `key`.
    pub fn get_or_push_with<H: Fn(&K) -> u64, E: FnMut(&K, &K) -> bool, D: FnOnce(&K) -> V>(
        &mut self,
        hash: u64,
        key: K,
        val_ctor: D,
        hasher: H,
        mut eq: E,
    ) -> (usize, bool) {
        let Self { index, entries } = self;
        match index.find_or_find_insert_slot(
            hash,
            |pos| eq(&key, &entries[*pos].0),
            |pos| hasher(&entries[*pos].0),
        ) {
            // SAFETY: `bucket` is live, we have not touched `index` since finding it
            Ok(bucket) => (unsafe { *bucket.as_ref() }, false),
            Err(slot) => {
                let pos = self.entries.len();
                let val = val_ctor(&key);
                self.entries.push((key, val));
                // SAFETY: We just got this `slot` and we haven't mutated `index` since getting it
                unsafe {
                    self.index.insert_in_slot(hash, slot, pos);
                }

                (pos, true)
            }
        }
    }

    /// Appends `(key, val)` at the end of the sequence.
    ///
    /// An existing entry for `key` is removed first (repairing the positions after it), and returned.
    pub fn push<H: Fn(&K) -> u64, E: FnMut(&K, &K) -> bool>(
        &mut self,
        hash: u64,
        key: K,
        val: V,
        hasher: H,
        mut eq: E,
    ) -> Option<(K, V)> {
        let prev = self
            .remove(hash, |k| eq(&key, k), &hasher)
            .map(|(_, entry)| entry);

        let pos = self.entries.len();
        self.entries.push((key, val));

        let Self { index, entries } = self;
        index.insert(hash, pos, |pos| hasher(&entries[*pos].0));

        prev
    }

    /// Inserts `(key, val)` at `pos`, shifting every entry at or after `pos` one slot later.
    ///
    /// An existing entry for `key` is removed first, and returned.
    /// `pos` is then clamped to the length of the sequence without that entry.
    pub fn insert_at<H: Fn(&K) -> u64, E: FnMut(&K, &K) -> bool>(
        &mut self,
        pos: usize,
        hash: u64,
        key: K,
        val: V,
        hasher: H,
        mut eq: E,
    ) -> Option<(K, V)> {
        let prev = self
            .remove(hash, |k| eq(&key, k), &hasher)
            .map(|(_, entry)| entry);

        let pos = pos.min(self.entries.len());
        self.entries.insert(pos, (key, val));
        self.reindex_shifted_later(pos + 1, &hasher);

        let Self { index, entries } = self;
        index.insert(hash, pos, |pos| hasher(&entries[*pos].0));

        prev
    }

    /// Removes the entry for the key matched by `eq`, returning its former position along with it.
    pub fn remove<H: Fn(&K) -> u64, E: FnMut(&K) -> bool>(
        &mut self,
        hash: u64,
        mut eq: E,
        hasher: H,
    ) -> Option<(usize, (K, V))> {
        let Self { index, entries } = self;
        let pos = index.remove_entry(hash, |pos| eq(&entries[*pos].0))?;

        let entry = self.entries.remove(pos);
        self.reindex_shifted_earlier(pos, &hasher);

        Some((pos, entry))
    }

    pub fn remove_at<H: Fn(&K) -> u64>(&mut self, pos: usize, hasher: H) -> Option<(K, V)> {
        let hash = hasher(&self.entries.get(pos)?.0);

        let removed = self.index.remove_entry(hash, |p| *p == pos);
        debug_assert_eq!(removed, Some(pos), "entry at {} was not indexed", pos);

        let entry = self.entries.remove(pos);
        self.reindex_shifted_earlier(pos, &hasher);

        Some(entry)
    }

    /// Rewrites the bucket of every entry in `entries[start..]`, which have each moved one slot later.
    ///
    /// Walks back to front, so the bucket being rewritten is the only one holding its old position.
    fn reindex_shifted_later<H: Fn(&K) -> u64>(&mut self, start: usize, hasher: &H) {
        let Self { index, entries } = self;

        for pos in (start..entries.len()).rev() {
            let hash = hasher(&entries[pos].0);
            let bucket = index.get_mut(hash, |p| *p == pos - 1);
            debug_assert!(bucket.is_some(), "displaced entry at {} was not indexed", pos);
            if let Some(p) = bucket {
                *p = pos;
            }
        }

        log_debug!(
            LogLevel::Trace,
            "reindexed {} entries shifted later from position {}",
            entries.len().saturating_sub(start),
            start
        );
    }

    /// Rewrites the bucket of every entry in `entries[start..]`, which have each moved one slot earlier.
    ///
    /// Walks front to back, so the bucket being rewritten is the only one holding its old position.
    fn reindex_shifted_earlier<H: Fn(&K) -> u64>(&mut self, start: usize, hasher: &H) {
        let Self { index, entries } = self;

        for pos in start..entries.len() {
            let hash = hasher(&entries[pos].0);
            let bucket = index.get_mut(hash, |p| *p == pos + 1);
            debug_assert!(bucket.is_some(), "displaced entry at {} was not indexed", pos);
            if let Some(p) = bucket {
                *p = pos;
            }
        }

        log_debug!(
            LogLevel::Trace,
            "reindexed {} entries shifted earlier from position {}",
            entries.len().saturating_sub(start),
            start
        );
    }

    /// Checks that every entry is indexed at its own position, and that nothing else is.
    #[cfg(test)]
    pub fn is_consistent<H: Fn(&K) -> u64>(&self, hasher: H) -> bool {
        self.index.len() == self.entries.len()
            && self
                .entries
                .iter()
                .enumerate()
                .all(|(pos, (key, _))| self.index.get(hasher(key), |p| *p == pos).is_some())
    }

    pub fn reserve<H: Fn(&K) -> u64>(&mut self, additional: usize, hasher: H) {
        let Self { index, entries } = self;
        index.reserve(additional, |pos| hasher(&entries[*pos].0));
        self.entries.reserve(additional)
    }

    pub fn capacity(&self) -> usize {
        self.index.capacity().min(self.entries.capacity())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn as_slice(&self) -> &[(K, V)] {
        &self.entries
    }

    pub fn iter(&self) -> Iter<K, V> {
        Iter(self.entries.iter())
    }

    /// Note:
    /// Returns an iterator over `&mut (K,V)`.
    /// Care must be taken by consumers not to mutate `K` in any way that disturbs its hash. Otherwise, the index will stop finding it
    pub fn iter_mut(&mut self) -> IterMut<K, V> {
        IterMut(self.entries.iter_mut())
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.entries.clear();
    }
}

impl<K, V> IntoIterator for RawOrderedMap<K, V> {
    type IntoIter = IntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self.entries.into_iter())
    }
}

pub struct IntoIter<K, V>(std::vec::IntoIter<(K, V)>);

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back()
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

pub struct Iter<'a, K, V>(core::slice::Iter<'a, (K, V)>);

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}
impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back()
    }
}

impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

pub struct IterMut<'a, K, V>(core::slice::IterMut<'a, (K, V)>);

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = &'a mut (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, K, V> ExactSizeIterator for IterMut<'a, K, V> {}
impl<'a, K, V> DoubleEndedIterator for IterMut<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back()
    }
}

impl<'a, K, V> FusedIterator for IterMut<'a, K, V> {}
