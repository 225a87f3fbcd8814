//! Persistent (immutable) hash set.
//!
//! This module provides [`PersistentHashSet`], an immutable hash set backed
//! by a hash array mapped trie.
//!
//! # Overview
//!
//! Every `insert` or `remove` returns a new set and leaves the original
//! untouched. Only the nodes on the path from the root to the affected slot
//! are rebuilt; every other subtree is shared between the two versions.
//!
//! - O(log32 N) contains (effectively O(1) for practical sizes)
//! - O(log32 N) insert
//! - O(log32 N) remove
//! - O(1) len, `is_empty` and clone
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
//!
//! assert!(set.contains(&1));
//! assert!(set.contains(&2));
//! assert!(!set.contains(&4));
//!
//! // Structural sharing: the original set is preserved
//! let updated = set.insert(4);
//! assert_eq!(set.len(), 3);      // Original unchanged
//! assert_eq!(updated.len(), 4);  // New version
//! ```
//!
//! # Set Operations
//!
//! ```rust
//! use hamt_set::persistent::PersistentHashSet;
//!
//! let set_a: PersistentHashSet<i32> = [1, 2, 3].into_iter().collect();
//! let set_b: PersistentHashSet<i32> = [2, 3, 4].into_iter().collect();
//!
//! assert_eq!(set_a.union(&set_b).len(), 4);                // {1, 2, 3, 4}
//! assert_eq!(set_a.intersection(&set_b).len(), 2);         // {2, 3}
//! assert_eq!(set_a.difference(&set_b).len(), 1);           // {1}
//! assert_eq!(set_a.symmetric_difference(&set_b).len(), 2); // {1, 4}
//! ```
//!
//! # Custom hashing
//!
//! The hash function is a [`BuildHasher`] type parameter, as with
//! [`std::collections::HashSet`]. Values whose hashes collide are still
//! told apart by `Eq`.
//!
//! ```rust
//! use std::hash::{BuildHasherDefault, Hasher};
//! use hamt_set::persistent::PersistentHashSet;
//!
//! #[derive(Default)]
//! struct Constant;
//!
//! impl Hasher for Constant {
//!     fn finish(&self) -> u64 { 7 }
//!     fn write(&mut self, _: &[u8]) {}
//! }
//!
//! let set = PersistentHashSet::with_hasher(BuildHasherDefault::<Constant>::default())
//!     .insert("a")
//!     .insert("b");
//! assert_eq!(set.len(), 2);
//! assert!(set.contains("a") && set.contains("b"));
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use super::hash::{DefaultHashBuilder, compute_hash};
use super::iter::{PersistentHashSetIntoIterator, PersistentHashSetIterator};
use super::node::Node;
use super::{ReferenceCounter, trie};

// =============================================================================
// PersistentHashSet Definition
// =============================================================================

/// A persistent (immutable) hash set based on HAMT.
///
/// `PersistentHashSet` is an immutable data structure that uses structural
/// sharing to efficiently support functional programming patterns.
///
/// # Time Complexity
///
/// | Operation              | Complexity        |
/// |------------------------|-------------------|
/// | `new`                  | O(1)              |
/// | `contains` / `count`   | O(log32 N)        |
/// | `insert`               | O(log32 N)        |
/// | `remove`               | O(log32 N)        |
/// | `len`                  | O(1)              |
/// | `is_empty`             | O(1)              |
/// | `union`                | O(min(n,m) * log32(max(n,m))) |
/// | `intersection`         | O(min(n,m) * log32(max(n,m))) |
/// | `difference`           | O(min(n,m) * log32 n) |
/// | `symmetric_difference` | O(m * log32 n)    |
///
/// # Examples
///
/// ```rust
/// use hamt_set::persistent::PersistentHashSet;
///
/// let set = PersistentHashSet::singleton(42);
/// assert!(set.contains(&42));
/// assert!(!set.contains(&0));
/// ```
#[derive(Clone)]
pub struct PersistentHashSet<T, S = DefaultHashBuilder> {
    /// Root node of the trie
    root: Node<T>,
    /// Number of elements
    length: usize,
    /// Hash function shared by every version derived from this set
    hasher: S,
}

impl<T> PersistentHashSet<T> {
    /// Creates a new empty set.
    ///
    /// Does not allocate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hamt_set::persistent::PersistentHashSet;
    ///
    /// let set: PersistentHashSet<i32> = PersistentHashSet::new();
    /// assert!(set.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }
}

impl<T, S> PersistentHashSet<T, S> {
    /// Creates a new empty set that hashes with `hasher`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::collections::hash_map::RandomState;
    /// use hamt_set::persistent::PersistentHashSet;
    ///
    /// let set = PersistentHashSet::with_hasher(RandomState::new()).insert(1);
    /// assert!(set.contains(&1));
    /// ```
    #[inline]
    #[must_use]
    pub const fn with_hasher(hasher: S) -> Self {
        Self {
            root: Node::Empty,
            length: 0,
            hasher,
        }
    }

    /// Returns a reference to the set's hash builder.
    #[inline]
    #[must_use]
    pub const fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Returns the number of elements in the set.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hamt_set::persistent::PersistentHashSet;
    ///
    /// let set = PersistentHashSet::new().insert(1).insert(2);
    /// assert_eq!(set.len(), 2);
    /// ```
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the set contains no elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hamt_set::persistent::PersistentHashSet;
    ///
    /// let empty: PersistentHashSet<i32> = PersistentHashSet::new();
    /// assert!(empty.is_empty());
    ///
    /// let non_empty = empty.insert(42);
    /// assert!(!non_empty.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns an iterator over the elements of the set.
    ///
    /// The order is determined by the hashes and the insertion history of
    /// colliding values. It is stable for a given set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hamt_set::persistent::PersistentHashSet;
    ///
    /// let set = PersistentHashSet::new().insert(1).insert(2).insert(3);
    /// let sum: i32 = set.iter().sum();
    /// assert_eq!(sum, 6);
    /// ```
    #[must_use]
    pub fn iter(&self) -> PersistentHashSetIterator<'_, T> {
        PersistentHashSetIterator::new(&self.root, self.length)
    }

    /// Returns a cursor positioned past the last element.
    ///
    /// Every exhausted iterator over this set compares equal to it, and so
    /// does [`iter`](Self::iter) on an empty set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hamt_set::persistent::PersistentHashSet;
    ///
    /// let empty: PersistentHashSet<i32> = PersistentHashSet::new();
    /// assert_eq!(empty.iter(), empty.end());
    /// ```
    #[must_use]
    pub fn end(&self) -> PersistentHashSetIterator<'_, T> {
        PersistentHashSetIterator::end()
    }

    /// Returns `true` if both sets share the same trie root.
    ///
    /// A `true` result means the sets are equal. Sets with at most one
    /// element keep it inline and only compare as shared when both are
    /// empty, so `false` does not imply inequality. The same holds for
    /// cursors: [`iter`](Self::iter) on two clones of a one-element set
    /// gives cursors that compare unequal until exhausted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hamt_set::persistent::PersistentHashSet;
    ///
    /// let set: PersistentHashSet<i32> = (0..100).collect();
    /// assert!(set.ptr_eq(&set.clone()));
    /// assert!(set.ptr_eq(&set.insert(5)));
    /// assert!(!set.ptr_eq(&set.insert(500)));
    /// ```
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.root, &other.root) {
            (Node::Empty, Node::Empty) => true,
            (Node::Branch { children: left, .. }, Node::Branch { children: right, .. }) => {
                ReferenceCounter::ptr_eq(left, right)
            }
            (Node::Collision { values: left, .. }, Node::Collision { values: right, .. }) => {
                ReferenceCounter::ptr_eq(left, right)
            }
            _ => false,
        }
    }
}

impl<T: Clone + Hash + Eq> PersistentHashSet<T> {
    /// Creates a set containing a single element.
    ///
    /// # Arguments
    ///
    /// * `element` - The element to include in the set
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hamt_set::persistent::PersistentHashSet;
    ///
    /// let set = PersistentHashSet::singleton(42);
    /// assert_eq!(set.len(), 1);
    /// assert!(set.contains(&42));
    /// ```
    #[inline]
    #[must_use]
    pub fn singleton(element: T) -> Self {
        Self::new().insert(element)
    }
}

impl<T, S> PersistentHashSet<T, S>
where
    T: Clone + Hash + Eq,
    S: BuildHasher + Clone,
{
    /// Returns `true` if the set contains the specified element.
    ///
    /// The element may be any borrowed form of the set's element type,
    /// but `Hash` and `Eq` on the borrowed form must match those for
    /// the element type.
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hamt_set::persistent::PersistentHashSet;
    ///
    /// let set = PersistentHashSet::new()
    ///     .insert("hello".to_string())
    ///     .insert("world".to_string());
    ///
    /// // Can use &str to look up String elements
    /// assert!(set.contains("hello"));
    /// assert!(set.contains("world"));
    /// assert!(!set.contains("other"));
    /// ```
    #[must_use]
    pub fn contains<Q>(&self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(element).is_some()
    }

    /// Returns the number of stored elements equal to `element`: 0 or 1.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hamt_set::persistent::PersistentHashSet;
    ///
    /// let empty: PersistentHashSet<i32> = PersistentHashSet::new();
    /// let set = empty.insert(42);
    /// assert_eq!(set.count(&42), 1);
    /// assert_eq!(empty.count(&42), 0);
    /// ```
    #[must_use]
    pub fn count<Q>(&self, element: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        usize::from(self.contains(element))
    }

    /// Returns a reference to the stored element equal to `element`, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hamt_set::persistent::PersistentHashSet;
    ///
    /// let set = PersistentHashSet::new().insert("key".to_string());
    /// assert_eq!(set.get("key").map(String::as_str), Some("key"));
    /// assert_eq!(set.get("other"), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, element: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = compute_hash(&self.hasher, element);
        trie::lookup(&self.root, element, hash)
    }

    /// Inserts an element into the set.
    ///
    /// If the set already contains an equal element, returns a set that
    /// shares the original's trie and has the same length.
    ///
    /// # Arguments
    ///
    /// * `element` - The element to insert
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hamt_set::persistent::PersistentHashSet;
    ///
    /// let set1 = PersistentHashSet::new().insert(1);
    /// let set2 = set1.insert(2);
    ///
    /// assert_eq!(set1.len(), 1); // Original unchanged
    /// assert_eq!(set2.len(), 2); // New version
    /// ```
    #[must_use]
    pub fn insert(&self, element: T) -> Self {
        let mut result = self.clone();
        result.insert_mut(element);
        result
    }

    /// Removes an element from the set.
    ///
    /// Returns a new set without the element. If the element doesn't exist,
    /// returns a clone of the original set.
    ///
    /// # Arguments
    ///
    /// * `element` - The element to remove
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hamt_set::persistent::PersistentHashSet;
    ///
    /// let set = PersistentHashSet::new().insert(1).insert(2);
    /// let removed = set.remove(&1);
    ///
    /// assert_eq!(set.len(), 2);      // Original unchanged
    /// assert_eq!(removed.len(), 1);  // New version
    /// assert!(!removed.contains(&1));
    /// ```
    #[must_use]
    pub fn remove<Q>(&self, element: &Q) -> Self
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut result = self.clone();
        result.remove_mut(element);
        result
    }

    /// Rebinds this handle to a version containing `element`.
    ///
    /// Other handles sharing the old trie are unaffected.
    fn insert_mut(&mut self, element: T) -> bool {
        let hash = compute_hash(&self.hasher, &element);
        match trie::insert(&self.root, element, hash, 0) {
            Some(root) => {
                self.root = root;
                self.length += 1;
                true
            }
            None => false,
        }
    }

    /// Rebinds this handle to a version without `element`.
    fn remove_mut<Q>(&mut self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = compute_hash(&self.hasher, element);
        match trie::remove(&self.root, element, hash, 0) {
            Some(root) => {
                self.root = root;
                self.length -= 1;
                true
            }
            None => false,
        }
    }

    /// Returns the union of two sets.
    ///
    /// The union contains all elements that are in either set. The result
    /// is built on top of the larger operand and keeps its hasher.
    ///
    /// # Arguments
    ///
    /// * `other` - The other set to union with
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hamt_set::persistent::PersistentHashSet;
    ///
    /// let set_a: PersistentHashSet<i32> = [1, 2].into_iter().collect();
    /// let set_b: PersistentHashSet<i32> = [2, 3].into_iter().collect();
    ///
    /// let union = set_a.union(&set_b);
    ///
    /// assert_eq!(union.len(), 3);
    /// assert!(union.contains(&1));
    /// assert!(union.contains(&2));
    /// assert!(union.contains(&3));
    /// ```
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let (larger, smaller) = if self.len() >= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        let mut result = larger.clone();
        result.extend(smaller.iter().cloned());
        result
    }

    /// Returns the intersection of two sets.
    ///
    /// The intersection contains only elements that are in both sets.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hamt_set::persistent::PersistentHashSet;
    ///
    /// let set_a: PersistentHashSet<i32> = [1, 2, 3].into_iter().collect();
    /// let set_b: PersistentHashSet<i32> = [2, 3, 4].into_iter().collect();
    ///
    /// let intersection = set_a.intersection(&set_b);
    /// assert_eq!(intersection.len(), 2);
    /// assert!(intersection.contains(&2));
    /// assert!(intersection.contains(&3));
    /// ```
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let (larger, smaller) = if self.len() >= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        let mut result = Self::with_hasher(self.hasher.clone());
        result.extend(
            smaller
                .iter()
                .filter(|element| larger.contains(*element))
                .cloned(),
        );
        result
    }

    /// Returns the difference of two sets.
    ///
    /// The difference contains elements that are in `self` but not in `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hamt_set::persistent::PersistentHashSet;
    ///
    /// let set_a: PersistentHashSet<i32> = [1, 2, 3].into_iter().collect();
    /// let set_b: PersistentHashSet<i32> = [2, 3, 4].into_iter().collect();
    ///
    /// let difference = set_a.difference(&set_b);
    /// assert_eq!(difference.len(), 1);
    /// assert!(difference.contains(&1));
    /// ```
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        if other.len() < self.len() {
            let mut result = self.clone();
            for element in other {
                result.remove_mut(element);
            }
            result
        } else {
            let mut result = Self::with_hasher(self.hasher.clone());
            result.extend(
                self.iter()
                    .filter(|element| !other.contains(*element))
                    .cloned(),
            );
            result
        }
    }

    /// Returns the symmetric difference of two sets.
    ///
    /// The symmetric difference contains elements that are in exactly one
    /// of the two sets.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hamt_set::persistent::PersistentHashSet;
    ///
    /// let set_a: PersistentHashSet<i32> = [1, 2, 3].into_iter().collect();
    /// let set_b: PersistentHashSet<i32> = [2, 3, 4].into_iter().collect();
    ///
    /// let symmetric_difference = set_a.symmetric_difference(&set_b);
    /// assert_eq!(symmetric_difference.len(), 2);
    /// assert!(symmetric_difference.contains(&1));
    /// assert!(symmetric_difference.contains(&4));
    /// ```
    #[must_use]
    pub fn symmetric_difference(&self, other: &Self) -> Self {
        let mut result = self.clone();
        for element in other {
            if !result.remove_mut(element) {
                result.insert_mut(element.clone());
            }
        }
        result
    }

    /// Returns `true` if every element of `self` is in `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hamt_set::persistent::PersistentHashSet;
    ///
    /// let subset: PersistentHashSet<i32> = [1, 2].into_iter().collect();
    /// let superset: PersistentHashSet<i32> = [1, 2, 3].into_iter().collect();
    ///
    /// assert!(subset.is_subset(&superset));
    /// assert!(!superset.is_subset(&subset));
    /// ```
    #[must_use]
    pub fn is_subset(&self, other: &Self) -> bool {
        self.len() <= other.len() && self.iter().all(|element| other.contains(element))
    }

    /// Returns `true` if every element of `other` is in `self`.
    #[must_use]
    pub fn is_superset(&self, other: &Self) -> bool {
        other.is_subset(self)
    }

    /// Returns `true` if the sets have no elements in common.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hamt_set::persistent::PersistentHashSet;
    ///
    /// let set_a: PersistentHashSet<i32> = [1, 2].into_iter().collect();
    /// let set_b: PersistentHashSet<i32> = [3, 4].into_iter().collect();
    ///
    /// assert!(set_a.is_disjoint(&set_b));
    /// assert!(!set_a.is_disjoint(&set_a));
    /// ```
    #[must_use]
    pub fn is_disjoint(&self, other: &Self) -> bool {
        let (larger, smaller) = if self.len() >= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        !smaller.iter().any(|element| larger.contains(element))
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T, S: Default> Default for PersistentHashSet<T, S> {
    #[inline]
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<T, S> FromIterator<T> for PersistentHashSet<T, S>
where
    T: Clone + Hash + Eq,
    S: BuildHasher + Clone + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}

impl<T, S> Extend<T> for PersistentHashSet<T, S>
where
    T: Clone + Hash + Eq,
    S: BuildHasher + Clone,
{
    /// Rebinds this handle to a version containing every yielded element.
    ///
    /// Clones of the handle taken before the call keep their contents.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.insert_mut(element);
        }
    }
}

impl<T: Clone, S> IntoIterator for PersistentHashSet<T, S> {
    type Item = T;
    type IntoIter = PersistentHashSetIntoIterator<T>;

    fn into_iter(self) -> Self::IntoIter {
        PersistentHashSetIntoIterator::new(&self.root, self.length)
    }
}

impl<'a, T, S> IntoIterator for &'a PersistentHashSet<T, S> {
    type Item = &'a T;
    type IntoIter = PersistentHashSetIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, S> PartialEq for PersistentHashSet<T, S>
where
    T: Clone + Hash + Eq,
    S: BuildHasher + Clone,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.ptr_eq(other) || self.iter().all(|element| other.contains(element))
    }
}

impl<T, S> Eq for PersistentHashSet<T, S>
where
    T: Clone + Hash + Eq,
    S: BuildHasher + Clone,
{
}

impl<T: fmt::Debug, S> fmt::Debug for PersistentHashSet<T, S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display, S> fmt::Display for PersistentHashSet<T, S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for element in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "}}")
    }
}

// Shared handles are only thread-safe with atomic reference counts.
#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentHashSet<i32>: Send, Sync);
#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(PersistentHashSet<i32>: Send, Sync);

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize, S> serde::Serialize for PersistentHashSet<T, S> {
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
struct PersistentHashSetVisitor<T, S> {
    marker: std::marker::PhantomData<(T, S)>,
}

#[cfg(feature = "serde")]
impl<T, S> PersistentHashSetVisitor<T, S> {
    const fn new() -> Self {
        Self {
            marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, T, S> serde::de::Visitor<'de> for PersistentHashSetVisitor<T, S>
where
    T: serde::Deserialize<'de> + Clone + Hash + Eq,
    S: BuildHasher + Clone + Default,
{
    type Value = PersistentHashSet<T, S>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        // Duplicates in the input collapse, as with repeated insert.
        let mut set = PersistentHashSet::default();
        while let Some(element) = seq.next_element()? {
            set.insert_mut(element);
        }
        Ok(set)
    }
}

#[cfg(feature = "serde")]
impl<'de, T, S> serde::Deserialize<'de> for PersistentHashSet<T, S>
where
    T: serde::Deserialize<'de> + Clone + Hash + Eq,
    S: BuildHasher + Clone + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(PersistentHashSetVisitor::new())
    }
}

// =============================================================================
// Rayon Support
// =============================================================================

#[cfg(feature = "rayon")]
mod parallel {
    use rayon::iter::plumbing::UnindexedConsumer;
    use rayon::iter::{IntoParallelIterator, ParallelIterator};

    use super::PersistentHashSet;

    /// A parallel iterator over references to the elements of a
    /// [`PersistentHashSet`].
    ///
    /// The trie is flattened on the calling thread, then split by rayon.
    pub struct PersistentHashSetParallelRefIterator<'a, T: Sync> {
        inner: rayon::vec::IntoIter<&'a T>,
    }

    impl<'a, T: Sync + 'a> ParallelIterator for PersistentHashSetParallelRefIterator<'a, T> {
        type Item = &'a T;

        fn drive_unindexed<C>(self, consumer: C) -> C::Result
        where
            C: UnindexedConsumer<Self::Item>,
        {
            self.inner.drive_unindexed(consumer)
        }

        fn opt_len(&self) -> Option<usize> {
            self.inner.opt_len()
        }
    }

    /// An owning parallel iterator over the elements of a [`PersistentHashSet`].
    pub struct PersistentHashSetParallelIterator<T: Send> {
        inner: rayon::vec::IntoIter<T>,
    }

    impl<T: Send> ParallelIterator for PersistentHashSetParallelIterator<T> {
        type Item = T;

        fn drive_unindexed<C>(self, consumer: C) -> C::Result
        where
            C: UnindexedConsumer<Self::Item>,
        {
            self.inner.drive_unindexed(consumer)
        }

        fn opt_len(&self) -> Option<usize> {
            self.inner.opt_len()
        }
    }

    impl<'a, T: Sync + 'a, S> IntoParallelIterator for &'a PersistentHashSet<T, S> {
        type Item = &'a T;
        type Iter = PersistentHashSetParallelRefIterator<'a, T>;

        fn into_par_iter(self) -> Self::Iter {
            let elements: Vec<&'a T> = self.iter().collect();
            PersistentHashSetParallelRefIterator {
                inner: elements.into_par_iter(),
            }
        }
    }

    impl<T: Clone + Send, S> IntoParallelIterator for PersistentHashSet<T, S> {
        type Item = T;
        type Iter = PersistentHashSetParallelIterator<T>;

        fn into_par_iter(self) -> Self::Iter {
            let elements: Vec<T> = self.into_iter().collect();
            PersistentHashSetParallelIterator {
                inner: elements.into_par_iter(),
            }
        }
    }
}

#[cfg(feature = "rayon")]
pub use parallel::{PersistentHashSetParallelIterator, PersistentHashSetParallelRefIterator};

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
impl<T: Eq, S> PersistentHashSet<T, S> {
    /// Panics if the trie is malformed or disagrees with the cached length.
    fn check_invariants(&self) {
        assert_eq!(self.root.check_invariants(0), self.length);
    }
}


// =============================================================================
// Send + Sync Tests (arc feature only)
// =============================================================================
