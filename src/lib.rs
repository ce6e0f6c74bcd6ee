//! ## Introduction
//!
//! This crate implements ordered collections based on threaded red-black trees. A red-black tree
//! keeps itself balanced as keys are inserted and removed, so lookups, insertions and removals all
//! take logarithmic time in the worst case. The tree is also 'threaded': a leaf with no left or
//! right child instead points at its in-order predecessor or successor, so stepping from one key
//! to the next in either direction needs no stack and never climbs back up through parents.
//!
//! ## Benefits
//!
//! The crate complements the standard `alloc::collections` types, but provides the following
//! benefits:
//!
//! - Keys stored in the collections do not need to be hashable.
//! - Keys are sorted by a comparator. Keys that support `Ord` are sorted by [`Ordered`] by default,
//!   but any [`compare::Compare`] implementation (including a closure) can be supplied instead.
//! - With the default comparator keys can be looked up by any form they borrow as, so a
//!   `StringMap` can be searched with a `&str`.
//! - Collections that accept duplicate keys, `Multimap` and `Multiset`, keep elements with equal
//!   keys in the order they were inserted.
//! - Elements are addressed by a [`Position`], a plain `Copy` handle that does not borrow the
//!   collection. Positions survive insertions and the removal of any other element, can be
//!   stepped forwards and backwards, and can be passed back as a hint when inserting.
//! - Elements do not move once inserted. The storage of the elements is separate to the storage
//!   of the structure of the tree, and removed slots are recycled for future insertions.
//! - The crate is small and `#![no_std]`.
//!
//! ## Contents
//!
//! <center>
//!
//! | Type             | Stores       | Duplicates | Sorts By   |
//! |:-----------------|:-------------|:-----------|:-----------|
//! | `Map`            | Key/Value    | No         | Comparator |
//! | `Multimap`       | Key/Value    | Yes        | Comparator |
//! | `Set`            | Key          | No         | Comparator |
//! | `Multiset`       | Key          | Yes        | Comparator |
//! | `StringMap`      | String/Value | No         | Ord        |
//! | `StringMultimap` | String/Value | Yes        | Ord        |
//! | `StringSet`      | String       | No         | Ord        |
//! | `StringMultiset` | String       | Yes        | Ord        |
//!
//! </center>
//!
//! All of the collections are thin wrappers over `raw::RawTree`, which is generic over how the
//! key is found within an element and whether duplicate keys are accepted. That in turn is built
//! on `util::Tree`, which manages the structure of the tree as a set of `usize` indices into an
//! external vector of data, without storing the vector itself.
//!
//! ## Logging
//!
//! The crate logs through the `log` facade: clearing and assigning at `debug`, swaps and
//! hinted inserts that miss at `trace`, and any failure found by `validate()` at `error`.

#![no_std]
#![warn(missing_docs)]

mod cursor;
mod error;
mod map;
mod set;
pub mod raw;
pub mod util;

pub use cursor::{Cursor, IntoIter, Iter, Position};
pub use error::TreeError;
pub use raw::Ordered;
pub use map::*;
pub use set::*;
