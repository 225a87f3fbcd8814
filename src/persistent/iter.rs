//! Cursors over a frozen trie.
//!
//! [`PersistentHashSetIterator`] walks the trie depth-first with an explicit
//! stack of `(array, position)` frames. The stack is kept *settled*: it is
//! either empty or its top frame points at the next value to yield. Two
//! cursors over the same root are therefore equal exactly when they would
//! yield the same remaining sequence, and an exhausted cursor equals
//! [`PersistentHashSet::end`](super::PersistentHashSet::end).

use std::fmt;
use std::iter::FusedIterator;
use std::ptr;

use arrayvec::ArrayVec;

use super::hash::MAX_DEPTH;
use super::node::{Child, Node};

/// Deepest possible stack: a root, one branch per level and a collision node.
const STACK_CAPACITY: usize = MAX_DEPTH + 2;

// =============================================================================
// Frames
// =============================================================================

/// A position within one node of the trie.
enum Frame<'a, T> {
    /// A leaf root, not yet yielded.
    Single(&'a T),
    /// The next slot of a branch's dense array.
    Branch {
        children: &'a [Child<T>],
        position: usize,
    },
    /// The next entry of a collision node.
    Collision { values: &'a [T], position: usize },
}

impl<T> Clone for Frame<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Frame<'_, T> {}

impl<T> PartialEq for Frame<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Single(left), Self::Single(right)) => ptr::eq(*left, *right),
            (
                Self::Branch {
                    children: left,
                    position: left_position,
                },
                Self::Branch {
                    children: right,
                    position: right_position,
                },
            ) => ptr::eq(*left, *right) && left_position == right_position,
            (
                Self::Collision {
                    values: left,
                    position: left_position,
                },
                Self::Collision {
                    values: right,
                    position: right_position,
                },
            ) => ptr::eq(*left, *right) && left_position == right_position,
            _ => false,
        }
    }
}

impl<'a, T> Frame<'a, T> {
    /// Frame positioned at the start of `node`, or `None` for an empty node.
    fn enter(node: &'a Node<T>) -> Option<Self> {
        match node {
            Node::Empty => None,
            Node::Leaf { value, .. } => Some(Self::Single(value)),
            Node::Branch { children, .. } => Some(Self::Branch {
                children,
                position: 0,
            }),
            Node::Collision { values, .. } => Some(Self::Collision {
                values,
                position: 0,
            }),
        }
    }
}

// =============================================================================
// PersistentHashSetIterator
// =============================================================================

/// An iterator over the elements of a [`PersistentHashSet`](super::PersistentHashSet).
///
/// Elements are visited in ascending slot order at each level, nested
/// branches first-to-last, collision entries in their stored order. The
/// order is stable for a given set but otherwise unspecified.
///
/// Cursors compare equal when they sit at the same position of the same
/// trie, which makes it possible to drive iteration against an end marker.
/// A one-element set stores its value inline, so each handle owns its own
/// copy: cursors taken from two clones of such a set compare unequal until
/// both are exhausted, while cursors from the same handle compare as usual.
///
/// ```rust
/// use hamt_set::persistent::PersistentHashSet;
///
/// let set: PersistentHashSet<i32> = (0..10).collect();
/// let mut cursor = set.iter();
/// let mut visited = 0;
/// while cursor != set.end() {
///     cursor.next();
///     visited += 1;
/// }
/// assert_eq!(visited, 10);
/// ```
pub struct PersistentHashSetIterator<'a, T> {
    stack: ArrayVec<Frame<'a, T>, STACK_CAPACITY>,
    remaining: usize,
}

impl<'a, T> PersistentHashSetIterator<'a, T> {
    pub(crate) fn new(root: &'a Node<T>, length: usize) -> Self {
        let mut iterator = Self {
            stack: ArrayVec::new(),
            remaining: length,
        };
        if let Some(frame) = Frame::enter(root) {
            iterator.stack.push(frame);
        }
        iterator.settle();
        iterator
    }

    /// A cursor past the last element.
    pub(crate) fn end() -> Self {
        Self {
            stack: ArrayVec::new(),
            remaining: 0,
        }
    }

    /// Returns the element the cursor points at without advancing.
    #[must_use]
    pub fn peek(&self) -> Option<&'a T> {
        match *self.stack.last()? {
            Frame::Single(value) => Some(value),
            Frame::Branch { children, position } => match &children[position] {
                Child::Leaf { value, .. } => Some(value),
                Child::Node(_) => None,
            },
            Frame::Collision { values, position } => values.get(position),
        }
    }

    /// Pops exhausted frames and descends into nested nodes until the top
    /// frame points at a value or the stack is empty.
    ///
    /// A parent is advanced past a subtree before the subtree is entered.
    fn settle(&mut self) {
        loop {
            let entered = match self.stack.last_mut() {
                None | Some(Frame::Single(_)) => return,
                Some(&mut Frame::Branch {
                    children,
                    ref mut position,
                }) => match children.get(*position) {
                    None => None,
                    Some(Child::Leaf { .. }) => return,
                    Some(Child::Node(subnode)) => {
                        *position += 1;
                        Some(Frame::enter(subnode))
                    }
                },
                Some(Frame::Collision { values, position }) => {
                    if *position < values.len() {
                        return;
                    }
                    None
                }
            };
            match entered {
                Some(Some(child)) => self.stack.push(child),
                Some(None) => {}
                None => {
                    self.stack.pop();
                }
            }
        }
    }

    /// Moves the top frame one step forward; a yielded single is popped.
    fn advance_top(&mut self) {
        match self.stack.last_mut() {
            Some(Frame::Single(_)) => {
                self.stack.pop();
            }
            Some(Frame::Branch { position, .. } | Frame::Collision { position, .. }) => {
                *position += 1;
            }
            None => {}
        }
    }
}

impl<'a, T> Iterator for PersistentHashSetIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.peek()?;
        self.advance_top();
        self.settle();
        self.remaining = self.remaining.saturating_sub(1);
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for PersistentHashSetIterator<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for PersistentHashSetIterator<'_, T> {}

impl<T> Clone for PersistentHashSetIterator<'_, T> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

impl<T> PartialEq for PersistentHashSetIterator<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.stack == other.stack
    }
}

impl<T> Eq for PersistentHashSetIterator<'_, T> {}

impl<T> fmt::Debug for PersistentHashSetIterator<'_, T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("PersistentHashSetIterator")
            .field("depth", &self.stack.len())
            .field("remaining", &self.remaining)
            .finish()
    }
}

// =============================================================================
// PersistentHashSetIntoIterator
// =============================================================================

/// An owning iterator over the elements of a [`PersistentHashSet`](super::PersistentHashSet).
///
/// The trie may be shared with other sets, so elements are cloned out of it.
pub struct PersistentHashSetIntoIterator<T> {
    inner: std::vec::IntoIter<T>,
}

impl<T: Clone> PersistentHashSetIntoIterator<T> {
    pub(crate) fn new(root: &Node<T>, length: usize) -> Self {
        let elements: Vec<T> = PersistentHashSetIterator::new(root, length)
            .cloned()
            .collect();
        Self {
            inner: elements.into_iter(),
        }
    }
}

impl<T> Iterator for PersistentHashSetIntoIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for PersistentHashSetIntoIterator<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for PersistentHashSetIntoIterator<T> {}
