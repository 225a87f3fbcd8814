//! Lookup, insertion and removal over [`Node`].
//!
//! All operations take a precomputed 64-bit hash and never mutate their
//! input. Insert and remove return `None` when the trie would be unchanged,
//! letting the caller keep its existing root instead of rebuilding it.

use std::borrow::Borrow;

use super::ReferenceCounter;
use super::node::{Child, Node, locate};

// =============================================================================
// Lookup
// =============================================================================

/// Returns the stored value equal to `value`, if any.
pub(crate) fn lookup<'a, T, Q>(root: &'a Node<T>, value: &Q, hash: u64) -> Option<&'a T>
where
    T: Borrow<Q>,
    Q: Eq + ?Sized,
{
    let mut node = root;
    let mut depth = 0;

    loop {
        match node {
            Node::Empty => return None,
            Node::Leaf {
                hash: stored_hash,
                value: stored,
            } => return is_match(*stored_hash, stored, hash, value).then_some(stored),
            Node::Branch { bitmap, children } => {
                let (_, position, occupied) = locate(*bitmap, hash, depth);
                if !occupied {
                    return None;
                }
                match &children[position] {
                    Child::Leaf {
                        hash: stored_hash,
                        value: stored,
                    } => return is_match(*stored_hash, stored, hash, value).then_some(stored),
                    Child::Node(subnode) => {
                        node = &**subnode;
                        depth += 1;
                    }
                }
            }
            Node::Collision {
                hash: collision_hash,
                values,
            } => {
                if *collision_hash != hash {
                    return None;
                }
                return values.iter().find(|stored| (*stored).borrow() == value);
            }
        }
    }
}

#[inline]
fn is_match<T, Q>(stored_hash: u64, stored: &T, hash: u64, value: &Q) -> bool
where
    T: Borrow<Q>,
    Q: Eq + ?Sized,
{
    stored_hash == hash && stored.borrow() == value
}

// =============================================================================
// Insert
// =============================================================================

/// Inserts `value` below `node`, which sits at `depth`.
///
/// Returns `None` if an equal value is already present.
pub(crate) fn insert<T>(node: &Node<T>, value: T, hash: u64, depth: usize) -> Option<Node<T>>
where
    T: Clone + Eq,
{
    match node {
        Node::Empty => Some(Node::Leaf { hash, value }),
        Node::Leaf {
            hash: stored_hash,
            value: stored,
        } => insert_beside_leaf(*stored_hash, stored, value, hash, depth),
        Node::Branch { bitmap, children } => {
            insert_into_branch(*bitmap, children, value, hash, depth)
        }
        Node::Collision {
            hash: collision_hash,
            values,
        } => {
            if *collision_hash == hash {
                insert_into_collision(hash, values, value)
            } else {
                // Only reached for a collision root, which is held by value.
                Some(Node::pair(
                    Child::Node(ReferenceCounter::new(node.clone())),
                    *collision_hash,
                    Child::Leaf { hash, value },
                    hash,
                    depth,
                ))
            }
        }
    }
}

/// Resolves an insert landing on an existing leaf at `depth`.
///
/// Equal hashes form a collision node; otherwise the two values are split
/// into branches until their chunks diverge.
fn insert_beside_leaf<T>(
    stored_hash: u64,
    stored: &T,
    value: T,
    hash: u64,
    depth: usize,
) -> Option<Node<T>>
where
    T: Clone + Eq,
{
    if stored_hash == hash {
        if *stored == value {
            return None;
        }
        return Some(Node::collision(hash, vec![stored.clone(), value]));
    }

    let existing = Child::Leaf {
        hash: stored_hash,
        value: stored.clone(),
    };
    Some(Node::pair(
        existing,
        stored_hash,
        Child::Leaf { hash, value },
        hash,
        depth,
    ))
}

fn insert_into_branch<T>(
    bitmap: u32,
    children: &ReferenceCounter<[Child<T>]>,
    value: T,
    hash: u64,
    depth: usize,
) -> Option<Node<T>>
where
    T: Clone + Eq,
{
    let (bit, position, occupied) = locate(bitmap, hash, depth);

    if !occupied {
        let mut new_children = Vec::with_capacity(children.len() + 1);
        new_children.extend_from_slice(&children[..position]);
        new_children.push(Child::Leaf { hash, value });
        new_children.extend_from_slice(&children[position..]);
        return Some(Node::branch(bitmap | bit, new_children));
    }

    let new_child = match &children[position] {
        Child::Leaf {
            hash: stored_hash,
            value: stored,
        } => insert_beside_leaf(*stored_hash, stored, value, hash, depth + 1)?,
        Child::Node(subnode) => match &**subnode {
            // The collision node moves down unchanged; reuse its handle.
            Node::Collision {
                hash: collision_hash,
                ..
            } if *collision_hash != hash => Node::pair(
                Child::Node(ReferenceCounter::clone(subnode)),
                *collision_hash,
                Child::Leaf { hash, value },
                hash,
                depth + 1,
            ),
            _ => insert(subnode, value, hash, depth + 1)?,
        },
    }
    .into_child();

    let mut new_children = children.to_vec();
    new_children[position] = new_child;
    Some(Node::branch(bitmap, new_children))
}

fn insert_into_collision<T>(hash: u64, values: &[T], value: T) -> Option<Node<T>>
where
    T: Clone + Eq,
{
    if values.contains(&value) {
        return None;
    }
    let mut new_values = Vec::with_capacity(values.len() + 1);
    new_values.extend_from_slice(values);
    new_values.push(value);
    Some(Node::collision(hash, new_values))
}

// =============================================================================
// Remove
// =============================================================================

/// Removes the value equal to `value` from below `node`, which sits at `depth`.
///
/// Returns `None` if no such value is present. The returned node may be
/// [`Node::Empty`] (the subtree is gone) or a [`Node::Leaf`] (the subtree
/// collapsed to a single value).
pub(crate) fn remove<T, Q>(node: &Node<T>, value: &Q, hash: u64, depth: usize) -> Option<Node<T>>
where
    T: Clone + Borrow<Q>,
    Q: Eq + ?Sized,
{
    match node {
        Node::Empty => None,
        Node::Leaf {
            hash: stored_hash,
            value: stored,
        } => is_match(*stored_hash, stored, hash, value).then_some(Node::Empty),
        Node::Branch { bitmap, children } => {
            remove_from_branch(*bitmap, children, value, hash, depth)
        }
        Node::Collision {
            hash: collision_hash,
            values,
        } => {
            if *collision_hash == hash {
                remove_from_collision(hash, values, value)
            } else {
                None
            }
        }
    }
}

fn remove_from_branch<T, Q>(
    bitmap: u32,
    children: &ReferenceCounter<[Child<T>]>,
    value: &Q,
    hash: u64,
    depth: usize,
) -> Option<Node<T>>
where
    T: Clone + Borrow<Q>,
    Q: Eq + ?Sized,
{
    let (bit, position, occupied) = locate(bitmap, hash, depth);
    if !occupied {
        return None;
    }

    let replacement = match &children[position] {
        Child::Leaf {
            hash: stored_hash,
            value: stored,
        } => is_match(*stored_hash, stored, hash, value).then_some(Node::Empty)?,
        Child::Node(subnode) => remove(subnode, value, hash, depth + 1)?,
    };

    let mut new_children = children.to_vec();
    if replacement.is_empty() {
        new_children.remove(position);
        Some(collapse(bitmap & !bit, new_children))
    } else {
        new_children[position] = replacement.into_child();
        Some(collapse(bitmap, new_children))
    }
}

/// Builds the node for a branch's remaining children.
///
/// A branch with no children becomes [`Node::Empty`]. A branch whose only
/// child is a leaf or a collision node is replaced by that child, since
/// neither depends on the depth it is stored at.
fn collapse<T>(bitmap: u32, mut children: Vec<Child<T>>) -> Node<T>
where
    T: Clone,
{
    match children.len() {
        0 => Node::Empty,
        1 => match children.pop() {
            Some(Child::Leaf { hash, value }) => Node::Leaf { hash, value },
            Some(Child::Node(subnode)) if matches!(*subnode, Node::Collision { .. }) => {
                ReferenceCounter::unwrap_or_clone(subnode)
            }
            Some(child) => Node::branch(bitmap, vec![child]),
            None => Node::Empty,
        },
        _ => Node::branch(bitmap, children),
    }
}

fn remove_from_collision<T, Q>(hash: u64, values: &[T], value: &Q) -> Option<Node<T>>
where
    T: Clone + Borrow<Q>,
    Q: Eq + ?Sized,
{
    let found = values.iter().position(|stored| stored.borrow() == value)?;

    let mut remaining: Vec<T> = values
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != found)
        .map(|(_, stored)| stored.clone())
        .collect();

    if remaining.len() == 1
        && let Some(last) = remaining.pop()
    {
        return Some(Node::Leaf { hash, value: last });
    }
    Some(Node::collision(hash, remaining))
}

// =============================================================================
// Tests
// =============================================================================
