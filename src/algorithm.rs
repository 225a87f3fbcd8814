//! Reductions over sequential collections.
//!
//! These work with anything that implements [`IntoIterator`], including
//! `&PersistentHashSet`, and visit each element exactly once in the
//! collection's iteration order.
//!
//! # Examples
//!
//! ```rust
//! use hamt_set::algorithm::{accumulate, accumulate_with};
//!
//! assert_eq!(accumulate(vec![1, 2, 3], 0), 6);
//! assert_eq!(accumulate_with(["a", "b"], String::new(), |mut text, piece| {
//!     text.push_str(piece);
//!     text
//! }), "ab");
//! ```

use std::ops::Add;

/// Sums the elements of `iterable` onto `initial` with `+`, left to right.
///
/// Equivalent to `accumulate_with(iterable, initial, |sum, element| sum + element)`.
///
/// # Arguments
///
/// * `iterable` - The collection to reduce
/// * `initial` - The starting accumulator, returned as-is for an empty collection
///
/// # Examples
///
/// ```rust
/// use hamt_set::algorithm::accumulate;
/// use hamt_set::persistent::PersistentHashSet;
///
/// let set: PersistentHashSet<u64> = (0..100).collect();
/// assert_eq!(accumulate(&set, 0u64), 4950);
/// ```
pub fn accumulate<I, R>(iterable: I, initial: R) -> R
where
    I: IntoIterator,
    R: Add<I::Item, Output = R>,
{
    accumulate_with(iterable, initial, |accumulator, element| accumulator + element)
}

/// Folds the elements of `iterable` onto `initial` with `operation`, left to right.
///
/// `operation` receives the running accumulator and the next element. The
/// result depends on iteration order unless `operation` is commutative and
/// associative.
///
/// # Examples
///
/// ```rust
/// use hamt_set::algorithm::accumulate_with;
///
/// let product = accumulate_with(1..=5, 1, |product, element| product * element);
/// assert_eq!(product, 120);
/// ```
pub fn accumulate_with<I, R, F>(iterable: I, initial: R, operation: F) -> R
where
    I: IntoIterator,
    F: FnMut(R, I::Item) -> R,
{
    iterable.into_iter().fold(initial, operation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_accumulate_empty_returns_initial() {
        assert_eq!(accumulate(Vec::<i32>::new(), 17), 17);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 0)]
    #[case(10, 45)]
    #[case(1_000, 499_500)]
    fn test_accumulate_range(#[case] count: u64, #[case] expected: u64) {
        assert_eq!(accumulate(0..count, 0), expected);
    }

    #[rstest]
    fn test_accumulate_references() {
        let values = [1.5_f64, 2.5, 3.0];
        assert!((accumulate(&values, 0.0) - 7.0).abs() < f64::EPSILON);
    }

    #[rstest]
    fn test_accumulate_with_applies_left_to_right() {
        let trace = accumulate_with([1, 2, 3], Vec::new(), |mut seen, element| {
            seen.push(element);
            seen
        });
        assert_eq!(trace, vec![1, 2, 3]);
    }

    #[rstest]
    fn test_accumulate_with_non_commutative_operation() {
        let result = accumulate_with([1, 2, 3], 100, |accumulator, element| accumulator - element);
        assert_eq!(result, 94);
    }
}
