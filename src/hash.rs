use core::hash::BuildHasher;

pub use lccc_siphash::SipHasher;

use crate::rand::Rand;

/// Builds keyed [`SipHasher`]s with `C` compression and `D` finalization rounds.
///
/// Two `RandomState`s built by [`RandomState::new`] hash the same key differently, so lookup cost does not depend on
/// keys an adversary can choose. Clones share their keys.
#[derive(Clone, Debug)]
pub struct RandomState<const C: usize, const D: usize>(u64, u64);

impl<const C: usize, const D: usize> Default for RandomState<C, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const C: usize, const D: usize> RandomState<C, D> {
    pub fn new() -> RandomState<C, D> {
        let mut rand = Rand::init();

        Self::from_generator(&mut rand)
    }

    pub fn from_generator(gen: &mut Rand) -> RandomState<C, D> {
        Self(gen.gen(), gen.gen())
    }

    pub const fn with_keys(k0: u64, k1: u64) -> RandomState<C, D> {
        Self(k0, k1)
    }
}

impl<const C: usize, const D: usize> BuildHasher for RandomState<C, D> {
    type Hasher = SipHasher<C, D>;

    fn build_hasher(&self) -> Self::Hasher {
        SipHasher::new_with_keys(self.0, self.1)
    }
}
