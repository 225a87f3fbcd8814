//! Persistent (immutable) hash set.
//!
//! This module provides [`PersistentHashSet`], a hash array mapped trie
//! (HAMT) that uses structural sharing to minimize copying.
//!
//! # Structural Sharing
//!
//! Inserting or removing a value rebuilds only the nodes on the path from
//! the root to the affected slot. Every other subtree is shared, by
//! reference count, between the old and the new version.
//!
//! # Layout
//!
//! - `hash`: slicing a 64-bit hash into 5-bit chunks, default hash builder
//! - `node`: the trie's node variants
//! - `trie`: lookup, insertion and removal on nodes
//! - `iter`: stack-based cursors over a trie
//! - `hashset`: the public set handle
//!
//! # Examples
//!
//! ```rust
//! use hamt_set::persistent::PersistentHashSet;
//!
//! let set = PersistentHashSet::new()
//!     .insert(1)
//!     .insert(2)
//!     .insert(3);
//! assert!(set.contains(&1));
//!
//! // Structural sharing: the original set is preserved
//! let updated = set.insert(4);
//! assert_eq!(set.len(), 3);      // Original unchanged
//! assert_eq!(updated.len(), 4);  // New version
//!
//! // Set operations
//! let other: PersistentHashSet<i32> = [2, 3, 4].into_iter().collect();
//! let union = set.union(&other);
//! let intersection = set.intersection(&other);
//!
//! assert_eq!(union.len(), 4);        // {1, 2, 3, 4}
//! assert_eq!(intersection.len(), 2); // {2, 3}
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod hash;
mod hashset;
mod iter;
mod node;
mod trie;

pub use hash::BITS_PER_LEVEL;
pub use hash::BRANCHING_FACTOR;
pub use hash::DefaultHashBuilder;
pub use hash::MAX_DEPTH;
pub use hashset::PersistentHashSet;
pub use iter::PersistentHashSetIntoIterator;
pub use iter::PersistentHashSetIterator;

// Rayon parallel iterator re-exports
#[cfg(feature = "rayon")]
pub use hashset::PersistentHashSetParallelIterator;
#[cfg(feature = "rayon")]
pub use hashset::PersistentHashSetParallelRefIterator;

// =============================================================================
// Tests
// =============================================================================
