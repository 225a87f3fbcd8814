//! Trie node types.
//!
//! Nodes are immutable once built. Every mutation in [`super::trie`]
//! allocates fresh nodes along a single root-to-slot path and shares the
//! rest through [`ReferenceCounter`] clones.

use super::ReferenceCounter;
use super::hash::{BRANCHING_FACTOR, bit_for, hash_index, position_of};

// =============================================================================
// Node Definition
// =============================================================================

/// Internal node structure for the HAMT.
#[derive(Clone)]
pub(crate) enum Node<T> {
    /// No values. Only ever the root of an empty set.
    Empty,
    /// A single value. Appears as a root, or transiently while a path is rebuilt.
    Leaf { hash: u64, value: T },
    /// Bitmap-indexed branch.
    ///
    /// Invariant: `bitmap.count_ones() == children.len()`, `children` in bit order.
    Branch {
        bitmap: u32,
        children: ReferenceCounter<[Child<T>]>,
    },
    /// Distinct values sharing the full 64-bit hash `hash`.
    ///
    /// Invariant: `values.len() >= 2`.
    Collision {
        hash: u64,
        values: ReferenceCounter<[T]>,
    },
}

/// A dense-array slot of a branch.
#[derive(Clone)]
pub(crate) enum Child<T> {
    /// A value stored directly in the slot.
    Leaf { hash: u64, value: T },
    /// A deeper branch or collision node.
    Node(ReferenceCounter<Node<T>>),
}

// =============================================================================
// Constructors
// =============================================================================

impl<T> Node<T> {
    /// Builds a branch from a bitmap and its dense children.
    pub(crate) fn branch(bitmap: u32, children: Vec<Child<T>>) -> Self {
        debug_assert_eq!(bitmap.count_ones() as usize, children.len());
        debug_assert!(children.len() <= BRANCHING_FACTOR);
        Self::Branch {
            bitmap,
            children: ReferenceCounter::from(children),
        }
    }

    /// Builds a collision node.
    pub(crate) fn collision(hash: u64, values: Vec<T>) -> Self {
        debug_assert!(values.len() >= 2);
        Self::Collision {
            hash,
            values: ReferenceCounter::from(values),
        }
    }

    /// Builds the smallest node holding `first` and `second`, which have
    /// different hashes, rooted at `depth`.
    ///
    /// Descends one level per shared chunk until the chunks diverge.
    pub(crate) fn pair(
        first: Child<T>,
        first_hash: u64,
        second: Child<T>,
        second_hash: u64,
        depth: usize,
    ) -> Self {
        debug_assert_ne!(first_hash, second_hash);
        let first_index = hash_index(first_hash, depth);
        let second_index = hash_index(second_hash, depth);

        if first_index == second_index {
            let subnode = Self::pair(first, first_hash, second, second_hash, depth + 1);
            Self::branch(
                bit_for(first_hash, depth),
                vec![Child::Node(ReferenceCounter::new(subnode))],
            )
        } else {
            let bitmap = (1u32 << first_index) | (1u32 << second_index);
            let children = if first_index < second_index {
                vec![first, second]
            } else {
                vec![second, first]
            };
            Self::branch(bitmap, children)
        }
    }

    /// Converts a node returned from a subtree back into a branch slot.
    ///
    /// Leaves are inlined; anything else is boxed behind a reference counter.
    pub(crate) fn into_child(self) -> Child<T> {
        match self {
            Self::Leaf { hash, value } => Child::Leaf { hash, value },
            other => Child::Node(ReferenceCounter::new(other)),
        }
    }

    /// Returns `true` if this is [`Node::Empty`].
    pub(crate) const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

#[cfg(test)]
impl<T> Child<T> {
    /// Returns the hash of an inlined leaf.
    pub(crate) const fn leaf_hash(&self) -> Option<u64> {
        match self {
            Self::Leaf { hash, .. } => Some(*hash),
            Self::Node(_) => None,
        }
    }
}

// =============================================================================
// Lookup helpers
// =============================================================================

/// Locates the slot for `hash` at `depth` within a branch.
///
/// Returns `(bit, position, occupied)`.
#[inline]
pub(crate) const fn locate(bitmap: u32, hash: u64, depth: usize) -> (u32, usize, bool) {
    let bit = bit_for(hash, depth);
    (bit, position_of(bitmap, bit), bitmap & bit != 0)
}

// =============================================================================
// Invariant checker (tests only)
// =============================================================================

#[cfg(test)]
impl<T: Eq> Node<T> {
    /// Walks the subtree at `depth` and panics on any structural violation.
    ///
    /// Returns the number of values reachable from this node.
    pub(crate) fn check_invariants(&self, depth: usize) -> usize {
        match self {
            Self::Empty => {
                assert_eq!(depth, 0, "Empty below the root");
                0
            }
            Self::Leaf { .. } => 1,
            Self::Branch { bitmap, children } => {
                assert_eq!(bitmap.count_ones() as usize, children.len());
                assert!(!children.is_empty(), "empty branch");

                let mut total = 0;
                let mut remaining = *bitmap;
                for child in children.iter() {
                    let index = remaining.trailing_zeros() as usize;
                    remaining &= remaining - 1;
                    match child {
                        Child::Leaf { hash, .. } => {
                            assert_eq!(hash_index(*hash, depth), index, "leaf in wrong slot");
                            total += 1;
                        }
                        Child::Node(node) => {
                            assert!(!node.is_empty(), "Empty inside a branch");
                            assert!(
                                !matches!(**node, Self::Leaf { .. }),
                                "boxed leaf inside a branch"
                            );
                            total += node.check_invariants(depth + 1);
                        }
                    }
                }
                total
            }
            Self::Collision { values, .. } => {
                assert!(values.len() >= 2, "collision with fewer than two values");
                for (index, value) in values.iter().enumerate() {
                    assert!(
                        values[index + 1..].iter().all(|other| other != value),
                        "duplicate value in collision"
                    );
                }
                values.len()
            }
        }
    }
}
