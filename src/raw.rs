//! The generic engine behind the maps and sets

#![warn(missing_docs)]

extern crate alloc;

use alloc::{collections::TryReserveError, vec::Vec};
use compare::Compare;
use core::{borrow::Borrow, cmp::Ordering, marker::PhantomData, mem};
use log::{debug, error, trace};

use crate::{
    cursor::{Cursor, IntoIter, Iter, Position},
    error::TreeError,
    util::{Location, Tree},
};

//-----------------------------------------------------------------------------------------------//

/// Extracts the key that orders an element
pub trait KeyOf<T> {
    /// The type of the key
    type Key;

    /// Get the key of an element
    fn key_of(item: &T) -> &Self::Key;
}

/// The element is its own key, as in the sets
pub struct Identity;

impl<T> KeyOf<T> for Identity {
    type Key = T;

    #[inline]
    fn key_of(item: &T) -> &T {
        item
    }
}

/// The key is the first half of a pair, as in the maps
pub struct First;

impl<K, V> KeyOf<(K, V)> for First {
    type Key = K;

    #[inline]
    fn key_of(item: &(K, V)) -> &K {
        &item.0
    }
}

/// Decides what happens to an element whose key is already present
pub trait Policy {
    /// Whether equal keys are kept side by side
    const MULTI: bool;
}

/// Elements with a key already present are rejected
pub struct Unique;

impl Policy for Unique {
    const MULTI: bool = false;
}

/// Elements with a key already present are placed after the existing run of equal keys
pub struct Multi;

impl Policy for Multi {
    const MULTI: bool = true;
}

/// Orders keys by their `Ord` implementation
///
/// A key can be looked up through any form it borrows as, so a collection keyed by
/// `CompactString` can be searched with a `&str`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Ordered;

impl<Q, K> Compare<Q, K> for Ordered
where
    Q: Ord + ?Sized,
    K: Borrow<Q>,
{
    #[inline]
    fn compare(&self, l: &Q, r: &K) -> Ordering {
        l.cmp(r.borrow())
    }
}

//-----------------------------------------------------------------------------------------------//

/// A threaded red-black tree of elements
///
/// `X` picks the key out of each element, `P` says whether equal keys are accepted and `C`
/// orders the keys. Elements are kept in a vector alongside the [`Tree`], at the index of their
/// leaf, and never move once inserted.
pub struct RawTree<T, X, P, C> {
    tree: Tree,
    slots: Vec<Option<T>>,
    cmp: C,
    marker: PhantomData<fn() -> (X, P)>,
}

// Comparisons take the key stored at a leaf. Every linked leaf has an element.
#[inline]
fn key_at<T, X: KeyOf<T>>(slots: &[Option<T>], leaf: usize) -> &X::Key {
    match &slots[leaf] {
        Some(item) => X::key_of(item),
        None => unreachable!("leaf {leaf} is linked without an element"),
    }
}

enum Fit {
    Before(usize),
    Existing(usize),
    Miss,
}

impl<T, X, P, C> RawTree<T, X, P, C>
where
    X: KeyOf<T>,
    P: Policy,
    C: Compare<X::Key>,
{
    /// Construct an empty tree ordered by `cmp`
    pub fn with_cmp(cmp: C) -> Self {
        RawTree {
            tree: Tree::new(),
            slots: Vec::new(),
            cmp,
            marker: PhantomData,
        }
    }

    /// Construct an empty tree ordered by `cmp`, pre-allocating a given capacity
    pub fn with_capacity_cmp(capacity: usize, cmp: C) -> Self {
        RawTree {
            tree: Tree::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
            cmp,
            marker: PhantomData,
        }
    }

    /// Get the comparator
    #[inline]
    pub fn cmp(&self) -> &C {
        &self.cmp
    }

    /// Get the number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.tree.count()
    }

    /// Check if there are no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// The largest number of elements the tree could ever hold
    pub fn max_size(&self) -> usize {
        let per_element = Tree::LEAF_SIZE + mem::size_of::<Option<T>>();
        isize::MAX as usize / per_element
    }

    /// Remove all elements
    pub fn clear(&mut self) {
        debug!("clearing {} elements", self.len());
        self.tree.clear();
        self.slots.truncate(0);
    }

    /// Reserves capacity for at least `additional` more elements
    pub fn reserve(&mut self, additional: usize) {
        debug_assert_eq!(self.slots.len(), self.tree.allocated_count());

        let required = self.tree.reserve(additional);
        if required > 0 {
            self.slots.reserve(required);
        }
    }

    /// Fallible version of [`RawTree::reserve`]
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let required = self.tree.try_reserve(additional)?;
        if required > 0 {
            self.slots.try_reserve(required)?;
        }
        Ok(())
    }

    /// Exchange the contents of two trees, without touching any element
    pub fn swap(&mut self, other: &mut Self) {
        trace!("swapping trees of {} and {} elements", self.len(), other.len());
        mem::swap(self, other);
    }

    /// Replace the contents with the elements of `iter`
    ///
    /// The new tree is built in full before the old one is dropped, so a panic while building
    /// leaves the old contents in place.
    pub fn assign<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
        C: Clone,
    {
        let mut fresh = Self::with_cmp(self.cmp.clone());
        fresh.extend(iter);
        debug!("assigning {} elements over {}", fresh.len(), self.len());
        *self = fresh;
    }

    //-------------------------------------------------------------------------------------------//

    /// The position of the first element, or `end()` if empty
    #[inline]
    pub fn begin(&self) -> Position {
        Position(self.tree.first())
    }

    /// The past-the-end position
    #[inline]
    pub fn end(&self) -> Position {
        Position::END
    }

    /// The position after `pos`
    ///
    /// The position after the last element is `end()`, and the position after `end()` is
    /// `begin()`.
    pub fn next_pos(&self, pos: Position) -> Position {
        if pos.is_end() || self.occupied(pos.0) {
            Position(self.tree.next(pos.0))
        } else {
            Position::END
        }
    }

    /// The position before `pos`
    ///
    /// The position before `end()` is the last element.
    pub fn prev_pos(&self, pos: Position) -> Position {
        if pos.is_end() || self.occupied(pos.0) {
            Position(self.tree.prev(pos.0))
        } else {
            Position::END
        }
    }

    /// The element at `pos`, or `None` at `end()`
    #[inline]
    pub fn get_at(&self, pos: Position) -> Option<&T> {
        self.slots.get(pos.0).and_then(Option::as_ref)
    }

    // Mutable access must not change the key, so it stays within the crate
    #[inline]
    pub(crate) fn get_at_mut(&mut self, pos: Position) -> Option<&mut T> {
        self.slots.get_mut(pos.0).and_then(Option::as_mut)
    }

    /// The first element
    pub fn first(&self) -> Option<&T> {
        self.get_at(self.begin())
    }

    /// The last element
    pub fn last(&self) -> Option<&T> {
        self.get_at(Position(self.tree.last()))
    }

    /// Remove and return the first element
    pub fn pop_first(&mut self) -> Option<T> {
        self.take(self.begin())
    }

    /// Remove and return the last element
    pub fn pop_last(&mut self) -> Option<T> {
        self.take(Position(self.tree.last()))
    }

    /// Iterate over all elements in order
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.tree, &self.slots)
    }

    /// Iterate over the elements from `first` up to, but not including, `last`
    pub fn range(&self, first: Position, last: Position) -> Iter<'_, T> {
        let first = self.normalise(first);
        let last = self.normalise(last);
        Iter::between(&self.tree, &self.slots, first.0, last.0)
    }

    /// A cursor starting at `pos`
    pub fn cursor(&self, pos: Position) -> Cursor<'_, T> {
        Cursor::new(&self.tree, &self.slots, self.normalise(pos).0)
    }

    //-------------------------------------------------------------------------------------------//

    /// Insert an element
    ///
    /// With the `Unique` policy an element whose key is already present is dropped, and the
    /// position of the existing element is returned with `false`. With the `Multi` policy the
    /// element always goes in, after any elements with an equal key.
    pub fn insert(&mut self, value: T) -> (Position, bool) {
        let at = {
            let (slots, cmp) = (&self.slots, &self.cmp);
            let key = X::key_of(&value);
            self.tree
                .locate(P::MULTI, |x| cmp.compare(key, key_at::<T, X>(slots, x)))
        };

        if let Location::Found(leaf) = at {
            return (Position(leaf), false);
        }

        // Storage is reserved before anything is linked, so a failed allocation changes nothing
        self.reserve(1);
        let leaf = self.tree.insert(at);
        self.store(leaf, value);
        (Position(leaf), true)
    }

    /// Insert an element, using `hint` as a suggestion of where it goes
    ///
    /// If the element belongs immediately before `hint` or immediately after it, it is linked
    /// there without searching the tree. Otherwise this falls back to [`RawTree::insert`]. The
    /// position of the new element (or, with the `Unique` policy, of the element already holding
    /// the key) is returned.
    pub fn insert_hint(&mut self, hint: Position, value: T) -> Position {
        match self.fit(self.normalise(hint).0, X::key_of(&value)) {
            Fit::Before(before) => {
                self.reserve(1);
                let leaf = self.tree.insert_before(before);
                self.store(leaf, value);
                Position(leaf)
            }
            Fit::Existing(leaf) => Position(leaf),
            Fit::Miss => {
                trace!("hint {} does not fit, searching from the root", hint.0);
                self.insert(value).0
            }
        }
    }

    // Check whether a key can go right next to `hint`
    //
    // Only the hint and one neighbour are compared. Equal keys are never placed in front of an
    // equal key already present, so runs of equal keys keep their insertion order.
    fn fit(&self, hint: usize, key: &X::Key) -> Fit {
        if self.is_empty() {
            return Fit::Before(!0);
        }

        let cmp = |x: usize| self.cmp.compare(key, key_at::<T, X>(&self.slots, x));

        if !hint == 0 {
            let last = self.tree.last();
            return match cmp(last) {
                Ordering::Greater => Fit::Before(!0),
                Ordering::Equal if P::MULTI => Fit::Before(!0),
                Ordering::Equal => Fit::Existing(last),
                Ordering::Less => Fit::Miss,
            };
        }

        match cmp(hint) {
            Ordering::Equal if !P::MULTI => Fit::Existing(hint),
            Ordering::Less => {
                let prev = self.tree.prev(hint);
                if !prev == 0 {
                    return Fit::Before(hint);
                }
                match cmp(prev) {
                    Ordering::Greater => Fit::Before(hint),
                    Ordering::Equal if P::MULTI => Fit::Before(hint),
                    Ordering::Equal => Fit::Existing(prev),
                    Ordering::Less => Fit::Miss,
                }
            }
            _ => {
                let next = self.tree.next(hint);
                if !next == 0 {
                    return Fit::Before(!0);
                }
                match cmp(next) {
                    Ordering::Less => Fit::Before(next),
                    Ordering::Equal if !P::MULTI => Fit::Existing(next),
                    _ => Fit::Miss,
                }
            }
        }
    }

    fn store(&mut self, leaf: usize, value: T) {
        if leaf == self.slots.len() {
            self.slots.push(Some(value));
        } else {
            self.slots[leaf] = Some(value);
        }
    }

    #[inline]
    fn occupied(&self, leaf: usize) -> bool {
        matches!(self.slots.get(leaf), Some(Some(_)))
    }

    // A position to a removed element is treated as `end()`
    #[inline]
    fn normalise(&self, pos: Position) -> Position {
        if self.occupied(pos.0) {
            pos
        } else {
            Position::END
        }
    }

    //-------------------------------------------------------------------------------------------//

    /// Find an element by key, returning `end()` if not present
    ///
    /// With the `Multi` policy this is the first of the elements with an equal key. The key
    /// can be any type the comparator can order against the stored keys.
    pub fn find<Q: ?Sized>(&self, key: &Q) -> Position
    where
        C: Compare<Q, X::Key>,
    {
        let (slots, cmp) = (&self.slots, &self.cmp);
        Position(self.tree.find(|x| {
            <C as Compare<Q, X::Key>>::compare(cmp, key, key_at::<T, X>(slots, x))
        }))
    }

    /// Check if an element with the key is present
    pub fn contains<Q: ?Sized>(&self, key: &Q) -> bool
    where
        C: Compare<Q, X::Key>,
    {
        !self.find(key).is_end()
    }

    /// Count the elements with the key
    pub fn count<Q: ?Sized>(&self, key: &Q) -> usize
    where
        C: Compare<Q, X::Key>,
    {
        let mut leaf = self.find(key).0;
        if !P::MULTI {
            return usize::from(!leaf != 0);
        }

        let mut n = 0;
        while !leaf != 0
            && <C as Compare<Q, X::Key>>::compares_eq(
                &self.cmp,
                key,
                key_at::<T, X>(&self.slots, leaf),
            )
        {
            n += 1;
            leaf = self.tree.next(leaf);
        }
        n
    }

    /// The position of the first element whose key is not less than `key`
    pub fn lower_bound<Q: ?Sized>(&self, key: &Q) -> Position
    where
        C: Compare<Q, X::Key>,
    {
        let (slots, cmp) = (&self.slots, &self.cmp);
        Position(self.tree.lower_bound(|x| {
            <C as Compare<Q, X::Key>>::compare(cmp, key, key_at::<T, X>(slots, x))
        }))
    }

    /// The position of the first element whose key is greater than `key`
    pub fn upper_bound<Q: ?Sized>(&self, key: &Q) -> Position
    where
        C: Compare<Q, X::Key>,
    {
        let (slots, cmp) = (&self.slots, &self.cmp);
        Position(self.tree.upper_bound(|x| {
            <C as Compare<Q, X::Key>>::compare(cmp, key, key_at::<T, X>(slots, x))
        }))
    }

    /// The positions bounding the elements whose key equals `key`
    pub fn equal_range<Q: ?Sized>(&self, key: &Q) -> (Position, Position)
    where
        C: Compare<Q, X::Key>,
    {
        (self.lower_bound(key), self.upper_bound(key))
    }

    //-------------------------------------------------------------------------------------------//

    /// Remove the element at `pos`, returning the position that followed it
    ///
    /// Positions to every other element stay valid. Erasing at `end()` or at a position whose
    /// element was already removed does nothing and returns `end()`.
    pub fn erase(&mut self, pos: Position) -> Position {
        if !self.occupied(pos.0) {
            return Position::END;
        }

        let next = self.tree.next(pos.0);
        self.tree.remove(pos.0);
        self.slots[pos.0] = None;
        Position(next)
    }

    /// Remove the element at `pos` and return it
    pub fn take(&mut self, pos: Position) -> Option<T> {
        if !self.occupied(pos.0) {
            return None;
        }

        self.tree.remove(pos.0);
        self.slots[pos.0].take()
    }

    /// Remove every element with the key, returning how many were removed
    pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> usize
    where
        C: Compare<Q, X::Key>,
    {
        let (first, last) = self.equal_range(key);
        let mut pos = first;
        let mut n = 0;
        while pos != last {
            pos = self.erase(pos);
            n += 1;
        }
        n
    }

    /// Remove the elements from `first` up to, but not including, `last`
    ///
    /// `last` is returned, being the position that now follows the removed elements.
    pub fn erase_range(&mut self, first: Position, last: Position) -> Position {
        let last = self.normalise(last);
        let mut pos = self.normalise(first);
        while pos != last && !pos.is_end() {
            pos = self.erase(pos);
        }
        last
    }

    /// Keep only the elements for which `f` returns `true`
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&T) -> bool,
    {
        let mut pos = self.begin();
        while let Some(item) = self.get_at(pos) {
            pos = if f(item) {
                self.next_pos(pos)
            } else {
                self.erase(pos)
            };
        }
    }

    /// Check the tree is well formed
    ///
    /// Returns the black height of the tree, or the first problem found.
    pub fn validate(&self) -> Result<usize, TreeError> {
        let (slots, cmp) = (&self.slots, &self.cmp);

        let mut pos = self.tree.first();
        while !pos != 0 {
            if !self.occupied(pos) {
                error!("leaf {pos} is linked without an element");
                return Err(TreeError::VacantLeaf(pos));
            }
            pos = self.tree.next(pos);
        }

        self.tree
            .validate(P::MULTI, |a, b| {
                cmp.compare(key_at::<T, X>(slots, a), key_at::<T, X>(slots, b))
            })
            .map_err(|err| {
                error!("invalid tree: {err}");
                err
            })
    }
}

impl<T, X, P, C> Clone for RawTree<T, X, P, C>
where
    T: Clone,
    C: Clone,
{
    fn clone(&self) -> Self {
        RawTree {
            tree: self.tree.clone(),
            slots: self.slots.clone(),
            cmp: self.cmp.clone(),
            marker: PhantomData,
        }
    }
}

impl<T, X, P, C> Extend<T> for RawTree<T, X, P, C>
where
    X: KeyOf<T>,
    P: Policy,
    C: Compare<X::Key>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for value in iter {
            // Sorted input lands after the last element without a search
            let end = self.end();
            self.insert_hint(end, value);
        }
    }
}

impl<T, X, P, C> IntoIterator for RawTree<T, X, P, C> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.tree, self.slots)
    }
}

impl<'a, T, X, P, C> IntoIterator for &'a RawTree<T, X, P, C>
where
    X: KeyOf<T>,
    P: Policy,
    C: Compare<X::Key>,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//-----------------------------------------------------------------------------------------------//

#[cfg(test)]
type Numbers = RawTree<i32, Identity, Multi, compare::Natural<i32>>;

#[test]
// Hinted inserts that fit are linked in place, others fall back to a search
fn test_raw_0() {
    let mut raw = Numbers::with_cmp(compare::natural());
    let ten = raw.insert(10).0;
    let twenty = raw.insert(20).0;

    let fifteen = raw.insert_hint(twenty, 15);
    debug_assert_eq!(raw.prev_pos(twenty), fifteen);
    debug_assert_eq!(raw.next_pos(ten), fifteen);

    // A duplicate hinted at its twin goes after it
    let second = raw.insert_hint(ten, 10);
    debug_assert_eq!(raw.next_pos(ten), second);

    // A hint in the wrong place still inserts in order
    raw.insert_hint(ten, 30);
    raw.insert_hint(raw.end(), 5);

    let v: Vec<i32> = raw.iter().copied().collect();
    debug_assert_eq!(v, [5, 10, 10, 15, 20, 30]);
    debug_assert!(raw.validate().is_ok());
}

#[test]
// Keys are found through the forms they borrow as
fn test_raw_2() {
    use alloc::string::{String, ToString};

    let mut raw: RawTree<String, Identity, Unique, Ordered> = RawTree::with_cmp(Ordered);
    for word in ["pear", "apple", "fig"] {
        raw.insert(word.to_string());
    }

    debug_assert_eq!(raw.get_at(raw.find("fig")).map(String::as_str), Some("fig"));
    debug_assert_eq!(raw.count("apple"), 1);
    debug_assert!(raw.find("plum").is_end());
    debug_assert_eq!(raw.get_at(raw.lower_bound("b")).map(String::as_str), Some("fig"));
    debug_assert_eq!(raw.remove("pear"), 1);
    debug_assert_eq!(raw.len(), 2);
    debug_assert!(raw.validate().is_ok());
}

#[test]
// A stale position is treated as the end
fn test_raw_1() {
    let mut raw = Numbers::with_cmp(compare::natural());
    let one = raw.insert(1).0;
    let two = raw.insert(2).0;

    debug_assert_eq!(raw.erase(one), two);
    debug_assert_eq!(raw.get_at(one), None);
    debug_assert_eq!(raw.erase(one), raw.end());
    debug_assert_eq!(raw.next_pos(one), raw.end());
    debug_assert_eq!(raw.len(), 1);
    debug_assert_eq!(raw.cursor(one).get(), None);
}
