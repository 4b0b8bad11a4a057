//! Hash containers with a fixed, process independent seed.
//!
//! Re-exports *hashbrown* and *foldhash*.

use core::hash::BuildHasher;

use foldhash::fast::{FixedState, FoldHasher};

pub use foldhash;
pub use hashbrown;

// -----------------------------------------------------------------------------
// FixedHashState

const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x7A3D_95C1_0E6B_24F9);

/// Hasher built by [`FixedHashState`].
pub type FixedHasher = FoldHasher<'static>;

/// A [`BuildHasher`] whose output only depends on the hashed input.
///
/// # Examples
///
/// ```
/// use core::hash::BuildHasher;
/// use tg_utils::hash::FixedHashState;
///
/// assert_eq!(FixedHashState.hash_one(7_u32), FixedHashState.hash_one(7_u32));
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// Containers

/// A [`hashbrown::HashMap`] using [`FixedHashState`].
pub type HashMap<K, V> = hashbrown::HashMap<K, V, FixedHashState>;

/// A [`hashbrown::HashSet`] using [`FixedHashState`].
pub type HashSet<K> = hashbrown::HashSet<K, FixedHashState>;

#[cfg(test)]
mod tests {
    use super::{HashMap, HashSet};

    #[test]
    fn containers_work_with_default() {
        let mut map = HashMap::<&str, u32>::default();
        map.insert("a", 1);
        map.insert("b", 2);
        assert_eq!(map.get("b"), Some(&2));

        let mut set = HashSet::<u32>::default();
        assert!(set.insert(3));
        assert!(!set.insert(3));
    }
}
