#![cfg(feature = "persistent")]
//! Property-based tests for PersistentHashSet laws.
//!
//! These tests verify that PersistentHashSet satisfies the mathematical
//! properties expected of a set, and that it agrees with
//! `std::collections::HashSet` under arbitrary operation sequences.

use hamt_set::algorithm::accumulate;
use hamt_set::persistent::PersistentHashSet;
use proptest::prelude::*;
use std::collections::HashSet;
use std::hash::{BuildHasherDefault, Hasher};

/// Folds every value into one of sixteen hash codes.
#[derive(Default)]
struct SixteenBuckets(u64);

impl Hasher for SixteenBuckets {
    fn finish(&self) -> u64 {
        self.0 % 16
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.0 = self.0.wrapping_mul(31).wrapping_add(u64::from(*byte));
        }
    }
}

type Colliding = BuildHasherDefault<SixteenBuckets>;

#[derive(Debug, Clone)]
enum Operation {
    Insert(i16),
    Remove(i16),
}

fn operation_strategy() -> impl Strategy<Value = Operation> {
    prop_oneof![
        any::<i16>().prop_map(Operation::Insert),
        any::<i16>().prop_map(Operation::Remove),
        (0i16..64).prop_map(Operation::Insert),
        (0i16..64).prop_map(Operation::Remove),
    ]
}

// =============================================================================
// Insert-Contains Law
// Description: An inserted element is always contained in the set
// =============================================================================

proptest! {
    #[test]
    fn prop_insert_contains_law(
        elements in prop::collection::vec(any::<i32>(), 0..50),
        new_element: i32
    ) {
        let set: PersistentHashSet<i32> = elements.into_iter().collect();
        let with_element = set.insert(new_element);

        prop_assert_eq!(with_element.count(&new_element), 1);
    }
}

// =============================================================================
// Remove-Contains Law
// Description: A removed element is never contained in the result set
// =============================================================================

proptest! {
    #[test]
    fn prop_remove_contains_law(
        elements in prop::collection::vec(any::<i32>(), 0..50),
        element_to_remove: i32
    ) {
        let set: PersistentHashSet<i32> = elements.into_iter().collect();
        let without_element = set.remove(&element_to_remove);

        prop_assert_eq!(without_element.count(&element_to_remove), 0);
    }
}

// =============================================================================
// Insert Idempotence Law
// Description: Inserting twice is the same as inserting once
// =============================================================================

proptest! {
    #[test]
    fn prop_insert_idempotence_law(
        elements in prop::collection::vec(any::<i32>(), 0..50),
        element: i32
    ) {
        let set: PersistentHashSet<i32> = elements.into_iter().collect();
        let once = set.insert(element);
        let twice = once.insert(element);

        prop_assert_eq!(once.len(), twice.len());
        prop_assert_eq!(once.count(&element), twice.count(&element));
        prop_assert_eq!(once, twice);
    }
}

// =============================================================================
// Length Laws
// Description: Insert and remove change the length by exactly 0 or 1
// =============================================================================

proptest! {
    #[test]
    fn prop_insert_length_law(
        elements in prop::collection::vec(any::<i32>(), 0..50),
        new_element: i32
    ) {
        let set: PersistentHashSet<i32> = elements.into_iter().collect();
        let with_element = set.insert(new_element);

        if set.contains(&new_element) {
            prop_assert_eq!(with_element.len(), set.len());
        } else {
            prop_assert_eq!(with_element.len(), set.len() + 1);
        }
    }
}

proptest! {
    #[test]
    fn prop_remove_length_law(
        elements in prop::collection::vec(any::<i32>(), 0..50),
        element_to_remove: i32
    ) {
        let set: PersistentHashSet<i32> = elements.into_iter().collect();
        let without_element = set.remove(&element_to_remove);

        if set.contains(&element_to_remove) {
            prop_assert_eq!(without_element.len(), set.len() - 1);
        } else {
            prop_assert_eq!(without_element.len(), set.len());
        }
    }
}

proptest! {
    #[test]
    fn prop_length_consistency_law(elements in prop::collection::vec(any::<i32>(), 0..100)) {
        let set: PersistentHashSet<i32> = elements.iter().copied().collect();
        let unique: HashSet<i32> = elements.into_iter().collect();

        prop_assert_eq!(set.len(), unique.len());
        prop_assert_eq!(set.iter().count(), set.len());
    }
}

// =============================================================================
// Immutability Law
// Description: Deriving new versions never changes the original
// =============================================================================

proptest! {
    #[test]
    fn prop_immutability_law(
        elements in prop::collection::vec(any::<i32>(), 0..50),
        operations in prop::collection::vec(any::<(bool, i32)>(), 0..30)
    ) {
        let set: PersistentHashSet<i32> = elements.iter().copied().collect();
        let snapshot: HashSet<i32> = elements.into_iter().collect();

        let mut derived = set.clone();
        for (is_insert, element) in operations {
            derived = if is_insert { derived.insert(element) } else { derived.remove(&element) };
        }

        prop_assert_eq!(derived.iter().count(), derived.len());
        prop_assert_eq!(set.len(), snapshot.len());
        for element in &snapshot {
            prop_assert!(set.contains(element));
        }
    }
}

// =============================================================================
// Model Law
// Description: Any sequence of operations agrees with std HashSet
// =============================================================================

proptest! {
    #[test]
    fn prop_model_law(operations in prop::collection::vec(operation_strategy(), 0..200)) {
        let mut set: PersistentHashSet<i16> = PersistentHashSet::new();
        let mut model: HashSet<i16> = HashSet::new();

        for operation in operations {
            match operation {
                Operation::Insert(element) => {
                    set = set.insert(element);
                    model.insert(element);
                }
                Operation::Remove(element) => {
                    set = set.remove(&element);
                    model.remove(&element);
                }
            }
            prop_assert_eq!(set.len(), model.len());
        }

        let visited: HashSet<i16> = set.iter().copied().collect();
        prop_assert_eq!(visited, model);
    }
}

proptest! {
    #[test]
    fn prop_colliding_model_law(operations in prop::collection::vec(operation_strategy(), 0..200)) {
        let mut set: PersistentHashSet<i16, Colliding> = PersistentHashSet::default();
        let mut model: HashSet<i16> = HashSet::new();

        for operation in operations {
            match operation {
                Operation::Insert(element) => {
                    set = set.insert(element);
                    model.insert(element);
                }
                Operation::Remove(element) => {
                    set = set.remove(&element);
                    model.remove(&element);
                }
            }
        }

        prop_assert_eq!(set.len(), model.len());
        for element in &model {
            prop_assert_eq!(set.count(element), 1);
        }
        let visited: Vec<i16> = set.iter().copied().collect();
        let unique: HashSet<i16> = visited.iter().copied().collect();
        prop_assert_eq!(visited.len(), unique.len());
        prop_assert_eq!(unique, model);
    }
}

// =============================================================================
// Union Laws
// =============================================================================

proptest! {
    #[test]
    fn prop_union_identity_law(elements in prop::collection::vec(any::<i32>(), 0..50)) {
        let set: PersistentHashSet<i32> = elements.into_iter().collect();
        let empty: PersistentHashSet<i32> = PersistentHashSet::new();

        prop_assert_eq!(set.union(&empty), set.clone());
        prop_assert_eq!(empty.union(&set), set);
    }
}

proptest! {
    #[test]
    fn prop_union_commutativity_law(
        elements_a in prop::collection::vec(any::<i32>(), 0..50),
        elements_b in prop::collection::vec(any::<i32>(), 0..50)
    ) {
        let set_a: PersistentHashSet<i32> = elements_a.into_iter().collect();
        let set_b: PersistentHashSet<i32> = elements_b.into_iter().collect();

        prop_assert_eq!(set_a.union(&set_b), set_b.union(&set_a));
    }
}

proptest! {
    #[test]
    fn prop_union_associativity_law(
        elements_a in prop::collection::vec(any::<i32>(), 0..30),
        elements_b in prop::collection::vec(any::<i32>(), 0..30),
        elements_c in prop::collection::vec(any::<i32>(), 0..30)
    ) {
        let set_a: PersistentHashSet<i32> = elements_a.into_iter().collect();
        let set_b: PersistentHashSet<i32> = elements_b.into_iter().collect();
        let set_c: PersistentHashSet<i32> = elements_c.into_iter().collect();

        prop_assert_eq!(
            set_a.union(&set_b).union(&set_c),
            set_a.union(&set_b.union(&set_c))
        );
    }
}

// =============================================================================
// Intersection and Difference Laws
// =============================================================================

proptest! {
    #[test]
    fn prop_intersection_commutativity_law(
        elements_a in prop::collection::vec(0i32..100, 0..50),
        elements_b in prop::collection::vec(0i32..100, 0..50)
    ) {
        let set_a: PersistentHashSet<i32> = elements_a.into_iter().collect();
        let set_b: PersistentHashSet<i32> = elements_b.into_iter().collect();

        prop_assert_eq!(set_a.intersection(&set_b), set_b.intersection(&set_a));
    }
}

proptest! {
    #[test]
    fn prop_difference_self_law(elements in prop::collection::vec(any::<i32>(), 0..50)) {
        let set: PersistentHashSet<i32> = elements.into_iter().collect();
        prop_assert!(set.difference(&set).is_empty());
    }
}

proptest! {
    #[test]
    fn prop_partition_law(
        elements_a in prop::collection::vec(0i32..100, 0..50),
        elements_b in prop::collection::vec(0i32..100, 0..50)
    ) {
        // A = (A \ B) ∪ (A ∩ B), and the two parts are disjoint.
        let set_a: PersistentHashSet<i32> = elements_a.into_iter().collect();
        let set_b: PersistentHashSet<i32> = elements_b.into_iter().collect();

        let only_a = set_a.difference(&set_b);
        let both = set_a.intersection(&set_b);

        prop_assert!(only_a.is_disjoint(&both));
        prop_assert_eq!(only_a.union(&both), set_a);
    }
}

proptest! {
    #[test]
    fn prop_symmetric_difference_law(
        elements_a in prop::collection::vec(0i32..100, 0..50),
        elements_b in prop::collection::vec(0i32..100, 0..50)
    ) {
        let set_a: PersistentHashSet<i32> = elements_a.into_iter().collect();
        let set_b: PersistentHashSet<i32> = elements_b.into_iter().collect();

        let expected = set_a.difference(&set_b).union(&set_b.difference(&set_a));
        prop_assert_eq!(set_a.symmetric_difference(&set_b), expected);
        prop_assert!(set_a.symmetric_difference(&set_a).is_empty());
    }
}

proptest! {
    #[test]
    fn prop_subset_superset_duality_law(
        elements_a in prop::collection::vec(0i32..30, 0..20),
        elements_b in prop::collection::vec(0i32..30, 0..40)
    ) {
        let set_a: PersistentHashSet<i32> = elements_a.into_iter().collect();
        let set_b: PersistentHashSet<i32> = elements_b.into_iter().collect();

        prop_assert_eq!(set_a.is_subset(&set_b), set_b.is_superset(&set_a));
        prop_assert!(set_a.is_subset(&set_a.union(&set_b)));
    }
}

// =============================================================================
// Accumulate Law
// Description: Summing over the set equals summing the unique source values
// =============================================================================

proptest! {
    #[test]
    fn prop_accumulate_sum_law(elements in prop::collection::vec(any::<i32>(), 0..100)) {
        let set: PersistentHashSet<i64> = elements.iter().map(|element| i64::from(*element)).collect();
        let unique: HashSet<i64> = elements.iter().map(|element| i64::from(*element)).collect();

        prop_assert_eq!(accumulate(&set, 0i64), unique.iter().sum::<i64>());
    }
}
