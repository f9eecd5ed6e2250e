use serde::de::{DeserializeSeed, Error, IgnoredAny, MapAccess, SeqAccess, Visitor};

use core::marker::PhantomData;
use std::hash::{BuildHasher, Hash};

/// Deserializes an [`OrderedMap`][super::OrderedMap] using the hasher `S`, and optionally seeds for keys and values.
///
/// Accepts either a map or a sequence of `(key, value)` pairs. Entries are inserted in the order they are read, so a
/// key that appears twice ends up at the position of its last occurrence, holding its last value.
#[derive(Clone)]
pub struct WithHasher<K, V, S>(K, V, S);

impl<'de, K: DeserializeSeed<'de> + Clone, V: DeserializeSeed<'de> + Clone, S: BuildHasher>
    DeserializeSeed<'de> for WithHasher<K, V, S>
where
    K::Value: Hash + Eq,
{
    type Value = super::OrderedMap<K::Value, V::Value, S>;
    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(WithHasherVisitor(self.0, self.1, self.2))
    }
}

impl<K, V, S> WithHasher<PhantomData<K>, PhantomData<V>, S> {
    pub const fn new(hasher: S) -> Self {
        Self(PhantomData, PhantomData, hasher)
    }
}

impl<K, V, S> WithHasher<K, V, S> {
    pub const fn new_seeded(key_seed: K, val_seed: V, hasher: S) -> Self {
        Self(key_seed, val_seed, hasher)
    }
}

struct WithHasherVisitor<K, V, S>(K, V, S);

impl<'de, K: DeserializeSeed<'de> + Clone, V: DeserializeSeed<'de> + Clone, S: BuildHasher>
    Visitor<'de> for WithHasherVisitor<K, V, S>
where
    K::Value: Hash + Eq,
{
    type Value = super::OrderedMap<K::Value, V::Value, S>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a map, or a sequence of key-value pairs")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let cap = map.size_hint().unwrap_or(0);

        let mut ret = super::OrderedMap::with_capacity_and_hasher(cap, self.2);

        while let Some((key, val)) = map.next_entry_seed(self.0.clone(), self.1.clone())? {
            ret.insert(key, val);
        }
        Ok(ret)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let cap = seq.size_hint().unwrap_or(0);

        let mut ret = super::OrderedMap::with_capacity_and_hasher(cap, self.2);

        while let Some((key, val)) =
            seq.next_element_seed(SeededPair(self.0.clone(), self.1.clone()))?
        {
            ret.insert(key, val);
        }
        Ok(ret)
    }
}

/// Deserializes a 2-element sequence with a separate seed for each element.
#[derive(Copy, Clone)]
struct SeededPair<A, B>(A, B);

struct SeededPairVisitor<A, B>(A, B);

impl<'de, A: DeserializeSeed<'de>, B: DeserializeSeed<'de>> Visitor<'de>
    for SeededPairVisitor<A, B>
{
    type Value = (A::Value, B::Value);

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a key-value pair")
    }

    fn visit_seq<I>(self, mut seq: I) -> Result<Self::Value, I::Error>
    where
        I: SeqAccess<'de>,
    {
        let key = seq
            .next_element_seed(self.0)?
            .ok_or_else(|| I::Error::invalid_length(0, &PAIR))?;
        let val = seq
            .next_element_seed(self.1)?
            .ok_or_else(|| I::Error::invalid_length(1, &PAIR))?;

        let mut len = 2;
        while let Some(IgnoredAny) = seq.next_element()? {
            len += 1;
        }

        if len != 2 {
            Err(I::Error::invalid_length(len, &PAIR))
        } else {
            Ok((key, val))
        }
    }
}

const PAIR: &str = "a tuple of length 2";

impl<'de, A: DeserializeSeed<'de>, B: DeserializeSeed<'de>> DeserializeSeed<'de>
    for SeededPair<A, B>
{
    type Value = (A::Value, B::Value);
    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_tuple(2, SeededPairVisitor(self.0, self.1))
    }
}
