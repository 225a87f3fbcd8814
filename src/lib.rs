//! # hamt-set
//!
//! A persistent hash set for Rust, built on a hash array mapped trie.
//!
//! ## Overview
//!
//! [`PersistentHashSet`](persistent::PersistentHashSet) never changes once
//! built. Inserting or removing a value returns a new set that shares all
//! untouched structure with the old one, so keeping old versions around is
//! cheap and any version can be read while others are derived from it.
//!
//! - **Persistent Data Structures**: `PersistentHashSet` with set algebra
//! - **Algorithms**: `accumulate` and `accumulate_with` reductions
//!
//! ## Feature Flags
//!
//! - `persistent`: The persistent hash set (enabled by default)
//! - `arc`: Thread-safe reference counting (`Arc` instead of `Rc`)
//! - `serde`: Serialization support
//! - `rayon`: Parallel iteration (implies `arc`)
//! - `fxhash`: Default hash builder from `rustc-hash`
//! - `ahash`: Default hash builder from `ahash`
//! - `full`: `persistent`, `serde` and `rayon`
//!
//! ## Example
//!
//! ```rust
//! use hamt_set::prelude::*;
//!
//! let set: PersistentHashSet<u32> = (0..10).collect();
//! let smaller = set.remove(&9);
//!
//! assert_eq!(accumulate(&set, 0), 45);
//! assert_eq!(accumulate(&smaller, 0), 36);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and functions.
///
/// # Usage
///
/// ```rust
/// use hamt_set::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algorithm::*;

    #[cfg(feature = "persistent")]
    pub use crate::persistent::*;
}

pub mod algorithm;

#[cfg(feature = "persistent")]
pub mod persistent;
