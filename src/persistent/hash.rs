//! Hash computation and slicing for the trie.
//!
//! A value's 64-bit hash code is consumed five bits at a time, least
//! significant chunk first. Chunk `d` selects the slot at depth `d`.

use std::hash::{BuildHasher, Hash};

// =============================================================================
// Constants
// =============================================================================

/// Bits of hash consumed per trie level.
pub const BITS_PER_LEVEL: usize = 5;

/// Branching factor (2^5 = 32).
pub const BRANCHING_FACTOR: usize = 1 << BITS_PER_LEVEL;

/// Number of levels a 64-bit hash can route through (the last carries 4 bits).
pub const MAX_DEPTH: usize = (u64::BITS as usize).div_ceil(BITS_PER_LEVEL);

/// Bit mask for extracting a chunk.
const MASK: u64 = (BRANCHING_FACTOR - 1) as u64;

// =============================================================================
// Default hash builder
// =============================================================================

/// Hash builder used when none is supplied.
///
/// Selected at compile time:
///
/// - `fxhash` feature: [`rustc_hash::FxBuildHasher`]
/// - `ahash` feature: `ahash::AHasher` with fixed keys
/// - otherwise: the standard library's `SipHash` with fixed keys
///
/// Every choice is deterministic, so two sets built from the same values
/// in the same order have the same shape.
#[cfg(feature = "fxhash")]
pub type DefaultHashBuilder = rustc_hash::FxBuildHasher;

/// Hash builder used when none is supplied.
#[cfg(all(feature = "ahash", not(feature = "fxhash")))]
pub type DefaultHashBuilder = std::hash::BuildHasherDefault<ahash::AHasher>;

/// Hash builder used when none is supplied.
#[cfg(not(any(feature = "fxhash", feature = "ahash")))]
pub type DefaultHashBuilder =
    std::hash::BuildHasherDefault<std::collections::hash_map::DefaultHasher>;

// =============================================================================
// Slicing
// =============================================================================

/// Computes the hash of a value with the set's hash builder.
#[inline]
pub(crate) fn compute_hash<Q, S>(hash_builder: &S, value: &Q) -> u64
where
    Q: Hash + ?Sized,
    S: BuildHasher,
{
    hash_builder.hash_one(value)
}

/// Extracts the chunk of `hash` that routes a value at `depth`.
#[inline]
pub(crate) const fn hash_index(hash: u64, depth: usize) -> usize {
    debug_assert!(depth < MAX_DEPTH);
    ((hash >> (depth * BITS_PER_LEVEL)) & MASK) as usize
}

/// Returns the single-bit mask for the chunk of `hash` at `depth`.
#[inline]
pub(crate) const fn bit_for(hash: u64, depth: usize) -> u32 {
    1u32 << hash_index(hash, depth)
}

/// Returns the dense-array position of `bit` within `bitmap`.
///
/// Counts the set bits below `bit`.
#[inline]
pub(crate) const fn position_of(bitmap: u32, bit: u32) -> usize {
    (bitmap & (bit - 1)).count_ones() as usize
}
