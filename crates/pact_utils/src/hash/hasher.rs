//! Hash states with deterministic output.
//!
//! [`FixedHashState`] runs `foldhash` with a fixed seed, so a value hashes the
//! same way in every process. [`NoOpHashState`] passes a pre-computed `u64`
//! straight through, which is what a `TypeId` already is.

use core::hash::{BuildHasher, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHasher

const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x51A7_C0DE_9E37_79B9);

/// The hasher produced by [`FixedHashState`].
pub type FixedHasher = FoldHasher<'static>;

/// A `foldhash` state with a fixed seed.
///
/// # Examples
///
/// ```
/// use core::hash::{BuildHasher, Hash, Hasher};
/// use pact_utils::hash::FixedHashState;
///
/// let hash = |value: &str| {
///     let mut hasher = FixedHashState.build_hasher();
///     value.hash(&mut hasher);
///     hasher.finish()
/// };
///
/// assert_eq!(hash("Circle"), hash("Circle"));
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
// NoOpHasher

/// A hasher that keeps the last `u64` written to it.
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHasher {
    hash: u64,
}

impl Hasher for NoOpHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        // Little-endian fold so `write_u32(n)` and `write_u64(n)` agree.
        for byte in bytes.iter().rev() {
            self.hash = self.hash.rotate_left(8).wrapping_add(*byte as u64);
        }
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.hash = i;
    }
}

/// Hash state for keys that are already well distributed, such as `TypeId`.
///
/// # Examples
///
/// ```
/// use core::hash::{BuildHasher, Hash, Hasher};
/// use pact_utils::hash::NoOpHashState;
///
/// let mut hasher = NoOpHashState.build_hasher();
/// 7_u64.hash(&mut hasher);
///
/// assert_eq!(hasher.finish(), 7);
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHashState;

impl BuildHasher for NoOpHashState {
    type Hasher = NoOpHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        NoOpHasher { hash: 0 }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_write_widths_agree() {
        let mut narrow = NoOpHashState.build_hasher();
        narrow.write_u32(1234);
        let mut wide = NoOpHashState.build_hasher();
        wide.write_u64(1234);
        assert_eq!(narrow.finish(), wide.finish());
    }

    #[test]
    fn fixed_state_is_stable() {
        let a = FixedHashState.hash_one("pact");
        let b = FixedHashState.hash_one("pact");
        assert_eq!(a, b);
        assert_ne!(a, FixedHashState.hash_one("tcap"));
    }
}
