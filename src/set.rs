//! Implementation of sets, backed by a threaded red-black tree
#![warn(missing_docs)]

extern crate alloc;

use alloc::collections::TryReserveError;
use compact_str::CompactString;
use compare::Compare;
use core::fmt;

use crate::{
    cursor::{Cursor, IntoIter, Iter, Position},
    error::TreeError,
    raw::{Identity, Multi, Ordered, RawTree, Unique},
};

//-----------------------------------------------------------------------------------------------//

/// A set of unique keys, implemented using a threaded red-black tree.
///
/// Keys are ordered by the comparator `C`, which defaults to [`Ordered`], the `Ord` order of
/// `K`. Lookups accept any type the comparator can order against `K`.
pub struct Set<K, C = Ordered>
where
    C: Compare<K>,
{
    raw: RawTree<K, Identity, Unique, C>,
}

impl<K> Set<K>
where
    K: Ord,
{
    /// Constructor
    pub fn new() -> Set<K> {
        Set::with_cmp(Ordered)
    }

    /// Constructor
    pub fn with_capacity(capacity: usize) -> Set<K> {
        Set {
            raw: RawTree::with_capacity_cmp(capacity, Ordered),
        }
    }
}

impl<K, C> Set<K, C>
where
    C: Compare<K>,
{
    /// Constructor, ordering keys with `cmp`
    pub fn with_cmp(cmp: C) -> Set<K, C> {
        Set {
            raw: RawTree::with_cmp(cmp),
        }
    }

    /// Construct from the keys of `iter`, ordering them with `cmp`
    pub fn from_iter_cmp<I>(iter: I, cmp: C) -> Set<K, C>
    where
        I: IntoIterator<Item = K>,
    {
        let mut set = Set::with_cmp(cmp);
        set.extend(iter);
        set
    }

    /// Get the comparator
    #[inline]
    pub fn cmp(&self) -> &C {
        self.raw.cmp()
    }

    /// Get the number of keys in the `Set`
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Check if there are any keys in the `Set`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// The largest number of keys the `Set` could hold
    #[inline]
    pub fn max_size(&self) -> usize {
        self.raw.max_size()
    }

    /// Remove all keys from the `Set`
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Reserves capacity for at least `additional` more keys
    pub fn reserve(&mut self, additional: usize) {
        self.raw.reserve(additional);
    }

    /// Tries to reserve capacity for at least `additional` more keys
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.raw.try_reserve(additional)
    }

    /// Exchange the contents of two sets
    pub fn swap(&mut self, other: &mut Self) {
        self.raw.swap(&mut other.raw);
    }

    /// Replace the contents of the `Set` with the keys of `iter`
    pub fn assign<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = K>,
        C: Clone,
    {
        self.raw.assign(iter);
    }

    /// Insert a key.
    ///
    /// If the key is already present the set is unchanged and `false` is returned along with the
    /// position of the existing key.
    pub fn insert(&mut self, key: K) -> (Position, bool) {
        self.raw.insert(key)
    }

    /// Insert a key, searching from `hint` first
    pub fn insert_hint(&mut self, hint: Position, key: K) -> Position {
        self.raw.insert_hint(hint, key)
    }

    /// Get a reference to the stored key equal to `key`
    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&K>
    where
        C: Compare<Q, K>,
    {
        self.raw.get_at(self.raw.find(key))
    }

    /// Check if the key is in the `Set`
    pub fn contains<Q: ?Sized>(&self, key: &Q) -> bool
    where
        C: Compare<Q, K>,
    {
        self.raw.contains(key)
    }

    /// Find a key, returning `end()` if not present
    pub fn find<Q: ?Sized>(&self, key: &Q) -> Position
    where
        C: Compare<Q, K>,
    {
        self.raw.find(key)
    }

    /// Count the keys equal to `key`, which is either 0 or 1
    pub fn count<Q: ?Sized>(&self, key: &Q) -> usize
    where
        C: Compare<Q, K>,
    {
        self.raw.count(key)
    }

    /// The position of the first key not less than `key`
    pub fn lower_bound<Q: ?Sized>(&self, key: &Q) -> Position
    where
        C: Compare<Q, K>,
    {
        self.raw.lower_bound(key)
    }

    /// The position of the first key greater than `key`
    pub fn upper_bound<Q: ?Sized>(&self, key: &Q) -> Position
    where
        C: Compare<Q, K>,
    {
        self.raw.upper_bound(key)
    }

    /// The positions bounding the key
    pub fn equal_range<Q: ?Sized>(&self, key: &Q) -> (Position, Position)
    where
        C: Compare<Q, K>,
    {
        self.raw.equal_range(key)
    }

    /// Get the key at a position
    pub fn get_at(&self, pos: Position) -> Option<&K> {
        self.raw.get_at(pos)
    }

    /// Remove the key at a position, returning the position that followed it
    pub fn erase(&mut self, pos: Position) -> Position {
        self.raw.erase(pos)
    }

    /// Remove a key, returning the number of keys removed
    pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> usize
    where
        C: Compare<Q, K>,
    {
        self.raw.remove(key)
    }

    /// Remove the keys from `first` up to, but not including, `last`
    pub fn erase_range(&mut self, first: Position, last: Position) -> Position {
        self.raw.erase_range(first, last)
    }

    /// Keep only the keys for which `f` returns `true`
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&K) -> bool,
    {
        self.raw.retain(f);
    }

    /// Get the first key in the set
    pub fn first(&self) -> Option<&K> {
        self.raw.first()
    }

    /// Get the last key in the set
    pub fn last(&self) -> Option<&K> {
        self.raw.last()
    }

    /// Pop the first key from the set
    pub fn pop_first(&mut self) -> Option<K> {
        self.raw.pop_first()
    }

    /// Pop the last key from the set
    pub fn pop_last(&mut self) -> Option<K> {
        self.raw.pop_last()
    }

    /// The position of the first key
    #[inline]
    pub fn begin(&self) -> Position {
        self.raw.begin()
    }

    /// The past-the-end position
    #[inline]
    pub fn end(&self) -> Position {
        self.raw.end()
    }

    /// The position after `pos`
    pub fn next_pos(&self, pos: Position) -> Position {
        self.raw.next_pos(pos)
    }

    /// The position before `pos`
    pub fn prev_pos(&self, pos: Position) -> Position {
        self.raw.prev_pos(pos)
    }

    /// A cursor starting at `pos`
    pub fn cursor(&self, pos: Position) -> Cursor<'_, K> {
        self.raw.cursor(pos)
    }

    /// Iterate over the keys in the `Set`
    pub fn iter(&self) -> Iter<'_, K> {
        self.raw.iter()
    }

    /// Iterate over the keys from `first` up to, but not including, `last`
    pub fn range(&self, first: Position, last: Position) -> Iter<'_, K> {
        self.raw.range(first, last)
    }

    /// Check the tree behind the `Set` is well formed, returning its black height
    pub fn validate(&self) -> Result<usize, TreeError> {
        self.raw.validate()
    }
}

impl<K> Default for Set<K>
where
    K: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, C> Clone for Set<K, C>
where
    K: Clone,
    C: Compare<K> + Clone,
{
    fn clone(&self) -> Self {
        Set {
            raw: self.raw.clone(),
        }
    }
}

impl<K, C> fmt::Debug for Set<K, C>
where
    K: fmt::Debug,
    C: Compare<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K, C> PartialEq for Set<K, C>
where
    C: Compare<K>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| self.cmp().compares_eq(a, b))
    }
}

impl<K, C> Eq for Set<K, C> where C: Compare<K> {}

impl<'a, K, C> IntoIterator for &'a Set<K, C>
where
    C: Compare<K>,
{
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, C> IntoIterator for Set<K, C>
where
    C: Compare<K>,
{
    type Item = K;
    type IntoIter = IntoIter<K>;

    fn into_iter(self) -> Self::IntoIter {
        self.raw.into_iter()
    }
}

impl<K> FromIterator<K> for Set<K>
where
    K: Ord,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Set::from_iter_cmp(iter, Ordered)
    }
}

impl<K, C> Extend<K> for Set<K, C>
where
    C: Compare<K>,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        self.raw.extend(iter);
    }
}

impl<K, const N: usize> From<[K; N]> for Set<K>
where
    K: Ord,
{
    fn from(keys: [K; N]) -> Self {
        keys.into_iter().collect()
    }
}

//-----------------------------------------------------------------------------------------------//

/// A set that may hold the same key several times, implemented using a threaded red-black tree.
///
/// Equal keys are kept in the order they were inserted.
pub struct Multiset<K, C = Ordered>
where
    C: Compare<K>,
{
    raw: RawTree<K, Identity, Multi, C>,
}

impl<K> Multiset<K>
where
    K: Ord,
{
    /// Constructor
    pub fn new() -> Multiset<K> {
        Multiset::with_cmp(Ordered)
    }

    /// Constructor
    pub fn with_capacity(capacity: usize) -> Multiset<K> {
        Multiset {
            raw: RawTree::with_capacity_cmp(capacity, Ordered),
        }
    }
}

impl<K, C> Multiset<K, C>
where
    C: Compare<K>,
{
    /// Constructor, ordering keys with `cmp`
    pub fn with_cmp(cmp: C) -> Multiset<K, C> {
        Multiset {
            raw: RawTree::with_cmp(cmp),
        }
    }

    /// Construct from the keys of `iter`, ordering them with `cmp`
    pub fn from_iter_cmp<I>(iter: I, cmp: C) -> Multiset<K, C>
    where
        I: IntoIterator<Item = K>,
    {
        let mut set = Multiset::with_cmp(cmp);
        set.extend(iter);
        set
    }

    /// Get the comparator
    #[inline]
    pub fn cmp(&self) -> &C {
        self.raw.cmp()
    }

    /// Get the number of keys in the `Multiset`, counting duplicates
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Check if there are any keys in the `Multiset`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// The largest number of keys the `Multiset` could hold
    #[inline]
    pub fn max_size(&self) -> usize {
        self.raw.max_size()
    }

    /// Remove all keys from the `Multiset`
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Reserves capacity for at least `additional` more keys
    pub fn reserve(&mut self, additional: usize) {
        self.raw.reserve(additional);
    }

    /// Tries to reserve capacity for at least `additional` more keys
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.raw.try_reserve(additional)
    }

    /// Exchange the contents of two multisets
    pub fn swap(&mut self, other: &mut Self) {
        self.raw.swap(&mut other.raw);
    }

    /// Replace the contents of the `Multiset` with the keys of `iter`
    pub fn assign<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = K>,
        C: Clone,
    {
        self.raw.assign(iter);
    }

    /// Insert a key after any equal keys, returning its position
    pub fn insert(&mut self, key: K) -> Position {
        self.raw.insert(key).0
    }

    /// Insert a key, searching from `hint` first
    pub fn insert_hint(&mut self, hint: Position, key: K) -> Position {
        self.raw.insert_hint(hint, key)
    }

    /// Get a reference to the first stored key equal to `key`
    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&K>
    where
        C: Compare<Q, K>,
    {
        self.raw.get_at(self.raw.find(key))
    }

    /// Check if the key is in the `Multiset`
    pub fn contains<Q: ?Sized>(&self, key: &Q) -> bool
    where
        C: Compare<Q, K>,
    {
        self.raw.contains(key)
    }

    /// Find the first key equal to `key`, returning `end()` if not present
    pub fn find<Q: ?Sized>(&self, key: &Q) -> Position
    where
        C: Compare<Q, K>,
    {
        self.raw.find(key)
    }

    /// Count the keys equal to `key`
    pub fn count<Q: ?Sized>(&self, key: &Q) -> usize
    where
        C: Compare<Q, K>,
    {
        self.raw.count(key)
    }

    /// The position of the first key not less than `key`
    pub fn lower_bound<Q: ?Sized>(&self, key: &Q) -> Position
    where
        C: Compare<Q, K>,
    {
        self.raw.lower_bound(key)
    }

    /// The position of the first key greater than `key`
    pub fn upper_bound<Q: ?Sized>(&self, key: &Q) -> Position
    where
        C: Compare<Q, K>,
    {
        self.raw.upper_bound(key)
    }

    /// The positions bounding the run of keys equal to `key`
    pub fn equal_range<Q: ?Sized>(&self, key: &Q) -> (Position, Position)
    where
        C: Compare<Q, K>,
    {
        self.raw.equal_range(key)
    }

    /// Get the key at a position
    pub fn get_at(&self, pos: Position) -> Option<&K> {
        self.raw.get_at(pos)
    }

    /// Remove the key at a position, returning the position that followed it
    pub fn erase(&mut self, pos: Position) -> Position {
        self.raw.erase(pos)
    }

    /// Remove every key equal to `key`, returning the number removed
    pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> usize
    where
        C: Compare<Q, K>,
    {
        self.raw.remove(key)
    }

    /// Remove the keys from `first` up to, but not including, `last`
    pub fn erase_range(&mut self, first: Position, last: Position) -> Position {
        self.raw.erase_range(first, last)
    }

    /// Keep only the keys for which `f` returns `true`
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&K) -> bool,
    {
        self.raw.retain(f);
    }

    /// Get the first key in the multiset
    pub fn first(&self) -> Option<&K> {
        self.raw.first()
    }

    /// Get the last key in the multiset
    pub fn last(&self) -> Option<&K> {
        self.raw.last()
    }

    /// Pop the first key from the multiset
    pub fn pop_first(&mut self) -> Option<K> {
        self.raw.pop_first()
    }

    /// Pop the last key from the multiset
    pub fn pop_last(&mut self) -> Option<K> {
        self.raw.pop_last()
    }

    /// The position of the first key
    #[inline]
    pub fn begin(&self) -> Position {
        self.raw.begin()
    }

    /// The past-the-end position
    #[inline]
    pub fn end(&self) -> Position {
        self.raw.end()
    }

    /// The position after `pos`
    pub fn next_pos(&self, pos: Position) -> Position {
        self.raw.next_pos(pos)
    }

    /// The position before `pos`
    pub fn prev_pos(&self, pos: Position) -> Position {
        self.raw.prev_pos(pos)
    }

    /// A cursor starting at `pos`
    pub fn cursor(&self, pos: Position) -> Cursor<'_, K> {
        self.raw.cursor(pos)
    }

    /// Iterate over the keys in the `Multiset`
    pub fn iter(&self) -> Iter<'_, K> {
        self.raw.iter()
    }

    /// Iterate over the keys from `first` up to, but not including, `last`
    pub fn range(&self, first: Position, last: Position) -> Iter<'_, K> {
        self.raw.range(first, last)
    }

    /// Check the tree behind the `Multiset` is well formed, returning its black height
    pub fn validate(&self) -> Result<usize, TreeError> {
        self.raw.validate()
    }
}

impl<K> Default for Multiset<K>
where
    K: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, C> Clone for Multiset<K, C>
where
    K: Clone,
    C: Compare<K> + Clone,
{
    fn clone(&self) -> Self {
        Multiset {
            raw: self.raw.clone(),
        }
    }
}

impl<K, C> fmt::Debug for Multiset<K, C>
where
    K: fmt::Debug,
    C: Compare<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<K, C> PartialEq for Multiset<K, C>
where
    C: Compare<K>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| self.cmp().compares_eq(a, b))
    }
}

impl<K, C> Eq for Multiset<K, C> where C: Compare<K> {}

impl<'a, K, C> IntoIterator for &'a Multiset<K, C>
where
    C: Compare<K>,
{
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, C> IntoIterator for Multiset<K, C>
where
    C: Compare<K>,
{
    type Item = K;
    type IntoIter = IntoIter<K>;

    fn into_iter(self) -> Self::IntoIter {
        self.raw.into_iter()
    }
}

impl<K> FromIterator<K> for Multiset<K>
where
    K: Ord,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Multiset::from_iter_cmp(iter, Ordered)
    }
}

impl<K, C> Extend<K> for Multiset<K, C>
where
    C: Compare<K>,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        self.raw.extend(iter);
    }
}

impl<K, const N: usize> From<[K; N]> for Multiset<K>
where
    K: Ord,
{
    fn from(keys: [K; N]) -> Self {
        keys.into_iter().collect()
    }
}

//-----------------------------------------------------------------------------------------------//

/// A set of strings.
///
/// This is specialised version of `Set` that stores keys as a compact string, so short keys are
/// held inline without a separate allocation. Lookups take a `&str`.
pub type StringSet = Set<CompactString>;

/// A multiset of strings, storing keys as a compact string.
pub type StringMultiset = Multiset<CompactString>;

//-----------------------------------------------------------------------------------------------//

#[test]
// Bounds and erasure on a small set
fn test_set_0() {
    use alloc::vec::Vec;

    let mut set = Set::new();
    for key in [5, 3, 8, 1, 4] {
        set.insert(key);
    }

    let v: Vec<i32> = set.iter().copied().collect();
    debug_assert_eq!(v, [1, 3, 4, 5, 8]);

    debug_assert_eq!(set.get_at(set.lower_bound(&4)), Some(&4));
    debug_assert_eq!(set.get_at(set.upper_bound(&4)), Some(&5));

    debug_assert_eq!(set.remove(&4), 1);
    let v: Vec<i32> = set.iter().copied().collect();
    debug_assert_eq!(v, [1, 3, 5, 8]);
    debug_assert_eq!(set.len(), 4);
    debug_assert!(set.validate().is_ok());
}

#[test]
// Duplicate keys in a multiset
fn test_set_1() {
    let mut set = Multiset::new();
    let a = set.insert(2);
    let b = set.insert(2);
    let c = set.insert(2);

    debug_assert_eq!(set.count(&2), 3);

    // The run is kept in insertion order
    let (first, last) = set.equal_range(&2);
    debug_assert_eq!(first, a);
    debug_assert_eq!(set.next_pos(a), b);
    debug_assert_eq!(set.next_pos(b), c);
    debug_assert_eq!(set.next_pos(c), last);
    debug_assert!(last.is_end());
    debug_assert_eq!(set.range(first, last).count(), 3);

    debug_assert_eq!(set.remove(&2), 3);
    debug_assert_eq!(set.len(), 0);
    debug_assert!(set.is_empty());
    debug_assert_eq!(set.begin(), set.end());
}

#[test]
// A very simple test of a set of strings
fn test_set_2() {
    use alloc::vec::Vec;

    let mut set: StringSet = ["Five", "One", "Nine"]
        .into_iter()
        .map(CompactString::from)
        .collect();

    debug_assert!(set.contains(&CompactString::from("Five")));
    debug_assert!(!set.contains(&CompactString::from("Seven")));
    debug_assert!(!set.insert(CompactString::from("One")).1);

    let v: Vec<&str> = set.iter().map(CompactString::as_str).collect();
    debug_assert_eq!(v, ["Five", "Nine", "One"]);

    let mut words = StringMultiset::new();
    words.extend(["b", "a", "b"].into_iter().map(CompactString::from));
    debug_assert_eq!(words.count(&CompactString::from("b")), 2);

    set.clear();
    debug_assert!(set.is_empty());
}

#[test]
// Stepping forwards and backwards, including through the end
fn test_set_3() {
    use alloc::vec::Vec;

    let set = Set::from([10, 20, 30]);

    let v: Vec<i32> = set.iter().rev().copied().collect();
    debug_assert_eq!(v, [30, 20, 10]);

    let mut cursor = set.cursor(set.find(&30));
    debug_assert_eq!(cursor.get(), Some(&30));
    debug_assert_eq!(cursor.peek_prev(), Some(&20));
    cursor.move_next();
    debug_assert!(cursor.position().is_end());
    debug_assert_eq!(cursor.get(), None);
    cursor.move_next();
    debug_assert_eq!(cursor.get(), Some(&10));
    cursor.move_prev();
    cursor.move_prev();
    debug_assert_eq!(cursor.get(), Some(&30));

    debug_assert_eq!(set.prev_pos(set.end()), set.find(&30));
    debug_assert_eq!(set.next_pos(set.end()), set.begin());

    // Both ends of an iterator meet in the middle
    let mut iter = set.iter();
    debug_assert_eq!(iter.next(), Some(&10));
    debug_assert_eq!(iter.next_back(), Some(&30));
    debug_assert_eq!(iter.next(), Some(&20));
    debug_assert_eq!(iter.next_back(), None);
    debug_assert_eq!(iter.next(), None);
}

#[test]
// Erasing a range and the positions left behind
fn test_set_4() {
    use alloc::vec::Vec;

    let mut set: Set<i32> = (0..10).collect();
    let three = set.find(&3);
    let seven = set.find(&7);
    let nine = set.find(&9);

    let after = set.erase_range(three, seven);
    debug_assert_eq!(after, seven);
    debug_assert_eq!(set.get_at(after), Some(&7));
    debug_assert_eq!(set.get_at(nine), Some(&9));
    debug_assert_eq!(set.get_at(three), None);

    let v: Vec<i32> = set.iter().copied().collect();
    debug_assert_eq!(v, [0, 1, 2, 7, 8, 9]);

    set.retain(|k| k % 2 == 0);
    let v: Vec<i32> = set.iter().copied().collect();
    debug_assert_eq!(v, [0, 2, 8]);
    debug_assert!(set.validate().is_ok());

    let end = set.end();
    debug_assert_eq!(set.erase_range(set.begin(), end), end);
    debug_assert!(set.is_empty());
}

#[test]
// Erasing random keys, checking the tree after every erase
fn test_set_5() {
    use alloc::vec::Vec;
    use rand::prelude::*;

    const COUNT: usize = 1000;
    const ERASE: usize = 400;

    let mut rng = SmallRng::seed_from_u64(1234567890);

    let mut set = Set::new();
    while set.len() < COUNT {
        set.insert(rng.random_range(0..1000000));
    }
    debug_assert!(set.validate().is_ok());

    let mut keys: Vec<i32> = set.iter().copied().collect();
    keys.shuffle(&mut rng);

    for (n, key) in keys[..ERASE].iter().enumerate() {
        debug_assert_eq!(set.remove(key), 1);
        debug_assert_eq!(set.len(), COUNT - n - 1);
        debug_assert!(set.validate().is_ok());

        let v: Vec<i32> = set.iter().copied().collect();
        debug_assert!(v.windows(2).all(|w| w[0] < w[1]));
    }

    for key in &keys[..ERASE] {
        debug_assert!(set.find(key).is_end());
    }
    for key in &keys[ERASE..] {
        debug_assert_eq!(set.get(key), Some(key));
    }
}

#[test]
// A stress test with inserting duplicates and popping from both ends
fn test_set_6() {
    use rand::prelude::*;

    const COUNT: usize = 100000;

    let mut rng = SmallRng::seed_from_u64(9876543210);

    let mut set = Multiset::new();
    for _ in 0..COUNT {
        set.insert(rng.random_range(0..1000));
    }

    debug_assert_eq!(set.len(), COUNT);
    debug_assert!(set.validate().is_ok());

    let mut prev = 0;
    for _ in 0..COUNT / 2 {
        let key = set.pop_first().unwrap();
        debug_assert!(key >= prev);
        prev = key;
    }

    let mut prev = 1000;
    for _ in 0..COUNT / 2 {
        let key = set.pop_last().unwrap();
        debug_assert!(key <= prev);
        prev = key;
    }

    debug_assert!(set.is_empty());
    debug_assert!(set.validate().is_ok());
}

#[test]
// Hinted inserts from sorted input, and owning iteration
fn test_set_7() {
    use alloc::vec::Vec;

    let mut set = Set::with_capacity(100);
    let mut hint = set.end();
    for key in (0..100).rev() {
        hint = set.insert_hint(hint, key);
    }
    debug_assert_eq!(set.len(), 100);
    debug_assert!(set.validate().is_ok());

    // An existing key is found through the hint and not inserted again
    let fifty = set.find(&50);
    debug_assert_eq!(set.insert_hint(fifty, 50), fifty);
    debug_assert_eq!(set.len(), 100);

    let copy = set.clone();
    let v: Vec<i32> = set.into_iter().collect();
    debug_assert_eq!(v, (0..100).collect::<Vec<i32>>());
    debug_assert_eq!(copy.first(), Some(&0));
    debug_assert_eq!(copy.last(), Some(&99));
}

#[test]
// Sets of strings are searched with a `&str`
fn test_set_8() {
    use alloc::vec::Vec;

    let mut set: StringSet = ["pear", "apple", "fig"]
        .into_iter()
        .map(CompactString::from)
        .collect();

    debug_assert!(set.contains("fig"));
    debug_assert!(!set.contains("plum"));
    debug_assert_eq!(set.count("apple"), 1);
    debug_assert_eq!(set.get("pear").map(CompactString::as_str), Some("pear"));
    debug_assert!(set.find("plum").is_end());
    debug_assert_eq!(set.get_at(set.upper_bound("fig")).map(CompactString::as_str), Some("pear"));

    debug_assert_eq!(set.remove("apple"), 1);
    let v: Vec<&str> = set.iter().map(CompactString::as_str).collect();
    debug_assert_eq!(v, ["fig", "pear"]);

    let mut words = StringMultiset::new();
    words.extend(["b", "a", "b"].into_iter().map(CompactString::from));
    let (first, last) = words.equal_range("b");
    debug_assert_eq!(words.range(first, last).count(), 2);
    debug_assert_eq!(words.remove("b"), 2);
    debug_assert!(words.validate().is_ok());
}
