//! Implementation of maps, backed by a threaded red-black tree
#![warn(missing_docs)]

extern crate alloc;

use alloc::collections::TryReserveError;
use compact_str::CompactString;
use compare::Compare;
use core::fmt;

use crate::{
    cursor::{Cursor, IntoIter, Iter, Position},
    error::TreeError,
    raw::{First, Multi, Ordered, RawTree, Unique},
};

//-----------------------------------------------------------------------------------------------//

/// A map between unique keys and values, implemented using a threaded red-black tree.
///
/// Keys are ordered by the comparator `C`, which defaults to [`Ordered`], the `Ord` order of
/// `K`. Lookups accept any type the comparator can order against `K`.
pub struct Map<K, V, C = Ordered>
where
    C: Compare<K>,
{
    raw: RawTree<(K, V), First, Unique, C>,
}

impl<K, V> Map<K, V>
where
    K: Ord,
{
    /// Constructor
    pub fn new() -> Map<K, V> {
        Map::with_cmp(Ordered)
    }

    /// Constructor
    pub fn with_capacity(capacity: usize) -> Map<K, V> {
        Map {
            raw: RawTree::with_capacity_cmp(capacity, Ordered),
        }
    }
}

impl<K, V, C> Map<K, V, C>
where
    C: Compare<K>,
{
    /// Constructor, ordering keys with `cmp`
    pub fn with_cmp(cmp: C) -> Map<K, V, C> {
        Map {
            raw: RawTree::with_cmp(cmp),
        }
    }

    /// Construct from the key/value pairs of `iter`, ordering keys with `cmp`
    ///
    /// Where a key appears more than once the first pair is kept.
    pub fn from_iter_cmp<I>(iter: I, cmp: C) -> Map<K, V, C>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = Map::with_cmp(cmp);
        map.extend(iter);
        map
    }

    /// Get the comparator
    #[inline]
    pub fn cmp(&self) -> &C {
        self.raw.cmp()
    }

    /// Get the number of key/value pairs in the `Map`
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Check if there are any key/value pairs in the `Map`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// The largest number of key/value pairs the `Map` could hold
    #[inline]
    pub fn max_size(&self) -> usize {
        self.raw.max_size()
    }

    /// Remove all key/value pairs from the `Map`
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Reserves capacity for at least `additional` more key/value pairs
    pub fn reserve(&mut self, additional: usize) {
        self.raw.reserve(additional);
    }

    /// Tries to reserve capacity for at least `additional` more key/value pairs
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.raw.try_reserve(additional)
    }

    /// Exchange the contents of two maps
    pub fn swap(&mut self, other: &mut Self) {
        self.raw.swap(&mut other.raw);
    }

    /// Replace the contents of the `Map` with the key/value pairs of `iter`
    pub fn assign<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
        C: Clone,
    {
        self.raw.assign(iter);
    }

    /// Insert a key/value pair.
    ///
    /// If the key is already present the map is unchanged and `false` is returned along with the
    /// position of the existing pair.
    pub fn insert(&mut self, key: K, value: V) -> (Position, bool) {
        self.raw.insert((key, value))
    }

    /// Insert a key/value pair, searching from `hint` first.
    ///
    /// Returns the position of the new pair, or of the existing pair with the same key.
    pub fn insert_hint(&mut self, hint: Position, key: K, value: V) -> Position {
        self.raw.insert_hint(hint, (key, value))
    }

    /// Get a value by key.
    ///
    /// If the key is not in the tree then `None` is returned.
    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V>
    where
        C: Compare<Q, K>,
    {
        self.raw.get_at(self.raw.find(key)).map(|kv| &kv.1)
    }

    /// Get a mutable referernce by key.
    ///
    /// If the key is not in the tree then `None` is returned - this function will not create a key
    /// if it does not exist. In this case use `insert` instead.
    pub fn get_mut<Q: ?Sized>(&mut self, key: &Q) -> Option<&mut V>
    where
        C: Compare<Q, K>,
    {
        let pos = self.raw.find(key);
        self.raw.get_at_mut(pos).map(|kv| &mut kv.1)
    }

    /// Check if the key is in the `Map`
    pub fn contains_key<Q: ?Sized>(&self, key: &Q) -> bool
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

    /// Count the pairs with the key, which is either 0 or 1
    pub fn count<Q: ?Sized>(&self, key: &Q) -> usize
    where
        C: Compare<Q, K>,
    {
        self.raw.count(key)
    }

    /// The position of the first pair whose key is not less than `key`
    pub fn lower_bound<Q: ?Sized>(&self, key: &Q) -> Position
    where
        C: Compare<Q, K>,
    {
        self.raw.lower_bound(key)
    }

    /// The position of the first pair whose key is greater than `key`
    pub fn upper_bound<Q: ?Sized>(&self, key: &Q) -> Position
    where
        C: Compare<Q, K>,
    {
        self.raw.upper_bound(key)
    }

    /// The positions bounding the pair with the key
    pub fn equal_range<Q: ?Sized>(&self, key: &Q) -> (Position, Position)
    where
        C: Compare<Q, K>,
    {
        self.raw.equal_range(key)
    }

    /// Get the key/value pair at a position
    pub fn get_at(&self, pos: Position) -> Option<(&K, &V)> {
        self.raw.get_at(pos).map(|kv| (&kv.0, &kv.1))
    }

    /// Get the key and a mutable reference to the value at a position
    pub fn get_at_mut(&mut self, pos: Position) -> Option<(&K, &mut V)> {
        self.raw.get_at_mut(pos).map(|kv| (&kv.0, &mut kv.1))
    }

    /// Remove the pair at a position, returning the position that followed it
    pub fn erase(&mut self, pos: Position) -> Position {
        self.raw.erase(pos)
    }

    /// Remove a key, returning the number of pairs removed
    pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> usize
    where
        C: Compare<Q, K>,
    {
        self.raw.remove(key)
    }

    /// Remove the pairs from `first` up to, but not including, `last`
    pub fn erase_range(&mut self, first: Position, last: Position) -> Position {
        self.raw.erase_range(first, last)
    }

    /// Keep only the pairs for which `f` returns `true`
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.raw.retain(|kv| f(&kv.0, &kv.1));
    }

    /// Get the first key in the map
    pub fn first(&self) -> Option<(&K, &V)> {
        self.raw.first().map(|kv| (&kv.0, &kv.1))
    }

    /// Get the last key in the map
    pub fn last(&self) -> Option<(&K, &V)> {
        self.raw.last().map(|kv| (&kv.0, &kv.1))
    }

    /// Pop the first key from the map
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.raw.pop_first()
    }

    /// Pop the last key from the map
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.raw.pop_last()
    }

    /// The position of the first pair
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
    pub fn cursor(&self, pos: Position) -> Cursor<'_, (K, V)> {
        self.raw.cursor(pos)
    }

    /// Iterate over the key/value pairs in the `Map`
    pub fn iter(&self) -> Iter<'_, (K, V)> {
        self.raw.iter()
    }

    /// Iterate over the key/value pairs from `first` up to, but not including, `last`
    pub fn range(&self, first: Position, last: Position) -> Iter<'_, (K, V)> {
        self.raw.range(first, last)
    }

    /// Iterate over the keys in the `Map`
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + '_ {
        self.raw.iter().map(|kv| &kv.0)
    }

    /// Iterate over the values in the `Map`
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + '_ {
        self.raw.iter().map(|kv| &kv.1)
    }

    /// Check the tree behind the `Map` is well formed, returning its black height
    pub fn validate(&self) -> Result<usize, TreeError> {
        self.raw.validate()
    }
}

impl<K, V> Default for Map<K, V>
where
    K: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> Clone for Map<K, V, C>
where
    K: Clone,
    V: Clone,
    C: Compare<K> + Clone,
{
    fn clone(&self) -> Self {
        Map {
            raw: self.raw.clone(),
        }
    }
}

impl<K, V, C> fmt::Debug for Map<K, V, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
    C: Compare<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter().map(|kv| (&kv.0, &kv.1))).finish()
    }
}

impl<K, V, C> PartialEq for Map<K, V, C>
where
    V: PartialEq,
    C: Compare<K>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| self.cmp().compares_eq(&a.0, &b.0) && a.1 == b.1)
    }
}

impl<K, V, C> Eq for Map<K, V, C>
where
    V: Eq,
    C: Compare<K>,
{
}

impl<'a, K, V, C> IntoIterator for &'a Map<K, V, C>
where
    C: Compare<K>,
{
    type Item = &'a (K, V);
    type IntoIter = Iter<'a, (K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, C> IntoIterator for Map<K, V, C>
where
    C: Compare<K>,
{
    type Item = (K, V);
    type IntoIter = IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.raw.into_iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Map<K, V>
where
    K: Ord,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Map::from_iter_cmp(iter, Ordered)
    }
}

impl<K, V, C> Extend<(K, V)> for Map<K, V, C>
where
    C: Compare<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.raw.extend(iter);
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Map<K, V>
where
    K: Ord,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

//-----------------------------------------------------------------------------------------------//

/// A map that may hold several values for the same key, implemented using a threaded red-black
/// tree.
///
/// Pairs with equal keys are kept in the order they were inserted.
pub struct Multimap<K, V, C = Ordered>
where
    C: Compare<K>,
{
    raw: RawTree<(K, V), First, Multi, C>,
}

impl<K, V> Multimap<K, V>
where
    K: Ord,
{
    /// Constructor
    pub fn new() -> Multimap<K, V> {
        Multimap::with_cmp(Ordered)
    }

    /// Constructor
    pub fn with_capacity(capacity: usize) -> Multimap<K, V> {
        Multimap {
            raw: RawTree::with_capacity_cmp(capacity, Ordered),
        }
    }
}

impl<K, V, C> Multimap<K, V, C>
where
    C: Compare<K>,
{
    /// Constructor, ordering keys with `cmp`
    pub fn with_cmp(cmp: C) -> Multimap<K, V, C> {
        Multimap {
            raw: RawTree::with_cmp(cmp),
        }
    }

    /// Construct from the key/value pairs of `iter`, ordering keys with `cmp`
    pub fn from_iter_cmp<I>(iter: I, cmp: C) -> Multimap<K, V, C>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = Multimap::with_cmp(cmp);
        map.extend(iter);
        map
    }

    /// Get the comparator
    #[inline]
    pub fn cmp(&self) -> &C {
        self.raw.cmp()
    }

    /// Get the number of key/value pairs in the `Multimap`
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Check if there are any key/value pairs in the `Multimap`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// The largest number of key/value pairs the `Multimap` could hold
    #[inline]
    pub fn max_size(&self) -> usize {
        self.raw.max_size()
    }

    /// Remove all key/value pairs from the `Multimap`
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Reserves capacity for at least `additional` more key/value pairs
    pub fn reserve(&mut self, additional: usize) {
        self.raw.reserve(additional);
    }

    /// Tries to reserve capacity for at least `additional` more key/value pairs
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.raw.try_reserve(additional)
    }

    /// Exchange the contents of two multimaps
    pub fn swap(&mut self, other: &mut Self) {
        self.raw.swap(&mut other.raw);
    }

    /// Replace the contents of the `Multimap` with the key/value pairs of `iter`
    pub fn assign<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
        C: Clone,
    {
        self.raw.assign(iter);
    }

    /// Insert a key/value pair after any pairs with an equal key, returning its position
    pub fn insert(&mut self, key: K, value: V) -> Position {
        self.raw.insert((key, value)).0
    }

    /// Insert a key/value pair, searching from `hint` first
    pub fn insert_hint(&mut self, hint: Position, key: K, value: V) -> Position {
        self.raw.insert_hint(hint, (key, value))
    }

    /// Get the first value inserted for a key.
    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V>
    where
        C: Compare<Q, K>,
    {
        self.raw.get_at(self.raw.find(key)).map(|kv| &kv.1)
    }

    /// Get a mutable reference to the first value inserted for a key.
    ///
    /// The other values with the key can be reached by position, through `equal_range` and
    /// `get_at_mut`.
    pub fn get_mut<Q: ?Sized>(&mut self, key: &Q) -> Option<&mut V>
    where
        C: Compare<Q, K>,
    {
        let pos = self.raw.find(key);
        self.raw.get_at_mut(pos).map(|kv| &mut kv.1)
    }

    /// Iterate over all the pairs with a key, in the order they were inserted
    pub fn get_all<Q: ?Sized>(&self, key: &Q) -> Iter<'_, (K, V)>
    where
        C: Compare<Q, K>,
    {
        let (first, last) = self.raw.equal_range(key);
        self.raw.range(first, last)
    }

    /// Check if the key is in the `Multimap`
    pub fn contains_key<Q: ?Sized>(&self, key: &Q) -> bool
    where
        C: Compare<Q, K>,
    {
        self.raw.contains(key)
    }

    /// Find the first pair with a key, returning `end()` if not present
    pub fn find<Q: ?Sized>(&self, key: &Q) -> Position
    where
        C: Compare<Q, K>,
    {
        self.raw.find(key)
    }

    /// Count the pairs with the key
    pub fn count<Q: ?Sized>(&self, key: &Q) -> usize
    where
        C: Compare<Q, K>,
    {
        self.raw.count(key)
    }

    /// The position of the first pair whose key is not less than `key`
    pub fn lower_bound<Q: ?Sized>(&self, key: &Q) -> Position
    where
        C: Compare<Q, K>,
    {
        self.raw.lower_bound(key)
    }

    /// The position of the first pair whose key is greater than `key`
    pub fn upper_bound<Q: ?Sized>(&self, key: &Q) -> Position
    where
        C: Compare<Q, K>,
    {
        self.raw.upper_bound(key)
    }

    /// The positions bounding the pairs with the key
    pub fn equal_range<Q: ?Sized>(&self, key: &Q) -> (Position, Position)
    where
        C: Compare<Q, K>,
    {
        self.raw.equal_range(key)
    }

    /// Get the key/value pair at a position
    pub fn get_at(&self, pos: Position) -> Option<(&K, &V)> {
        self.raw.get_at(pos).map(|kv| (&kv.0, &kv.1))
    }

    /// Get the key and a mutable reference to the value at a position
    pub fn get_at_mut(&mut self, pos: Position) -> Option<(&K, &mut V)> {
        self.raw.get_at_mut(pos).map(|kv| (&kv.0, &mut kv.1))
    }

    /// Remove the pair at a position, returning the position that followed it
    pub fn erase(&mut self, pos: Position) -> Position {
        self.raw.erase(pos)
    }

    /// Remove every pair with a key, returning the number of pairs removed
    pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> usize
    where
        C: Compare<Q, K>,
    {
        self.raw.remove(key)
    }

    /// Remove the pairs from `first` up to, but not including, `last`
    pub fn erase_range(&mut self, first: Position, last: Position) -> Position {
        self.raw.erase_range(first, last)
    }

    /// Keep only the pairs for which `f` returns `true`
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.raw.retain(|kv| f(&kv.0, &kv.1));
    }

    /// Get the first pair in the multimap
    pub fn first(&self) -> Option<(&K, &V)> {
        self.raw.first().map(|kv| (&kv.0, &kv.1))
    }

    /// Get the last pair in the multimap
    pub fn last(&self) -> Option<(&K, &V)> {
        self.raw.last().map(|kv| (&kv.0, &kv.1))
    }

    /// Pop the first pair from the multimap
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.raw.pop_first()
    }

    /// Pop the last pair from the multimap
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.raw.pop_last()
    }

    /// The position of the first pair
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
    pub fn cursor(&self, pos: Position) -> Cursor<'_, (K, V)> {
        self.raw.cursor(pos)
    }

    /// Iterate over the key/value pairs in the `Multimap`
    pub fn iter(&self) -> Iter<'_, (K, V)> {
        self.raw.iter()
    }

    /// Iterate over the key/value pairs from `first` up to, but not including, `last`
    pub fn range(&self, first: Position, last: Position) -> Iter<'_, (K, V)> {
        self.raw.range(first, last)
    }

    /// Iterate over the keys in the `Multimap`, repeating duplicates
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + '_ {
        self.raw.iter().map(|kv| &kv.0)
    }

    /// Iterate over the values in the `Multimap`
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + '_ {
        self.raw.iter().map(|kv| &kv.1)
    }

    /// Check the tree behind the `Multimap` is well formed, returning its black height
    pub fn validate(&self) -> Result<usize, TreeError> {
        self.raw.validate()
    }
}

impl<K, V> Default for Multimap<K, V>
where
    K: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> Clone for Multimap<K, V, C>
where
    K: Clone,
    V: Clone,
    C: Compare<K> + Clone,
{
    fn clone(&self) -> Self {
        Multimap {
            raw: self.raw.clone(),
        }
    }
}

impl<K, V, C> fmt::Debug for Multimap<K, V, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
    C: Compare<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<K, V, C> PartialEq for Multimap<K, V, C>
where
    V: PartialEq,
    C: Compare<K>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| self.cmp().compares_eq(&a.0, &b.0) && a.1 == b.1)
    }
}

impl<K, V, C> Eq for Multimap<K, V, C>
where
    V: Eq,
    C: Compare<K>,
{
}

impl<'a, K, V, C> IntoIterator for &'a Multimap<K, V, C>
where
    C: Compare<K>,
{
    type Item = &'a (K, V);
    type IntoIter = Iter<'a, (K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, C> IntoIterator for Multimap<K, V, C>
where
    C: Compare<K>,
{
    type Item = (K, V);
    type IntoIter = IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.raw.into_iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Multimap<K, V>
where
    K: Ord,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Multimap::from_iter_cmp(iter, Ordered)
    }
}

impl<K, V, C> Extend<(K, V)> for Multimap<K, V, C>
where
    C: Compare<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.raw.extend(iter);
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Multimap<K, V>
where
    K: Ord,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

//-----------------------------------------------------------------------------------------------//

/// A map between strings and values.
///
/// This is specialised version of `Map` that stores keys as a compact string, so short keys are
/// held inline without a separate allocation. Lookups take a `&str`.
pub type StringMap<V> = Map<CompactString, V>;

/// A multimap between strings and values, storing keys as a compact string.
pub type StringMultimap<V> = Multimap<CompactString, V>;

//-----------------------------------------------------------------------------------------------//

#[test]
// A very simple test of inserting into a map
fn test_map_0() {
    use alloc::{
        string::{String, ToString},
        vec,
        vec::Vec,
    };

    let mut map = Map::new();

    map.insert(5, "Five".to_string());
    map.insert(1, "One".to_string());
    map.insert(9, "Nine".to_string());

    debug_assert_eq!(map.get(&5), Some(&"Five".to_string()));
    debug_assert_eq!(map.get(&4), None);

    // A duplicate key leaves the map unchanged
    let (pos, inserted) = map.insert(5, "Cinq".to_string());
    debug_assert!(!inserted);
    debug_assert_eq!(map.get_at(pos), Some((&5, &"Five".to_string())));

    let v: Vec<(i32, String)> = map.iter().cloned().collect();
    debug_assert_eq!(
        v,
        vec![
            (1, "One".to_string()),
            (5, "Five".to_string()),
            (9, "Nine".to_string())
        ]
    );
}

#[test]
// A very simple test of a map keyed by strings
fn test_map_1() {
    use alloc::vec::Vec;

    let mut map = StringMap::new();

    map.insert(CompactString::from("Five"), 5);
    map.insert(CompactString::from("One"), 1);
    map.insert(CompactString::from("Nine"), 9);

    debug_assert_eq!(map.get(&CompactString::from("Five")), Some(&5));
    debug_assert_eq!(map.get(&CompactString::from("Seven")), None);

    if let Some(value) = map.get_mut(&CompactString::from("One")) {
        *value = 100;
    }

    let v: Vec<(&str, i32)> = map.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    debug_assert_eq!(v, [("Five", 5), ("Nine", 9), ("One", 100)]);
}

#[test]
// Values with the same key keep their insertion order
fn test_map_2() {
    use alloc::vec::Vec;

    let mut map = Multimap::new();

    map.insert(2, 'a');
    map.insert(1, 'b');
    let c = map.insert(2, 'c');
    map.insert(3, 'd');
    map.insert(2, 'e');

    debug_assert_eq!(map.count(&2), 3);
    debug_assert_eq!(map.get(&2), Some(&'a'));
    let v: Vec<char> = map.get_all(&2).map(|kv| kv.1).collect();
    debug_assert_eq!(v, ['a', 'c', 'e']);

    // Erasing from the middle of a run leaves the rest in order
    map.erase(c);
    let v: Vec<char> = map.get_all(&2).map(|kv| kv.1).collect();
    debug_assert_eq!(v, ['a', 'e']);

    debug_assert_eq!(map.remove(&2), 2);
    debug_assert_eq!(map.len(), 2);
    debug_assert!(map.validate().is_ok());
}

#[test]
// A comparator other than the `Ord` order
fn test_map_3() {
    use alloc::vec::Vec;

    let mut map = Map::with_cmp(|a: &i32, b: &i32| b.cmp(a));
    map.extend([(1, 'a'), (3, 'c'), (2, 'b')]);

    let v: Vec<i32> = map.keys().copied().collect();
    debug_assert_eq!(v, [3, 2, 1]);
    debug_assert_eq!(map.get_at(map.lower_bound(&2)), Some((&2, &'b')));
    debug_assert_eq!(map.get_at(map.upper_bound(&2)), Some((&1, &'a')));
}

#[test]
// Copies, moves and swaps
fn test_map_4() {
    let mut a = Map::from([(1, 10), (2, 20)]);
    let mut b = a.clone();
    b.insert(3, 30);

    debug_assert_eq!(a.len(), 2);
    debug_assert_eq!(b.len(), 3);

    let first = a.begin();
    a.swap(&mut b);
    debug_assert_eq!(a.len(), 3);
    debug_assert_eq!(b.len(), 2);

    // Positions follow the elements, not the container
    debug_assert_eq!(b.get_at(first), Some((&1, &10)));

    let c = core::mem::take(&mut a);
    debug_assert!(a.is_empty());
    debug_assert_eq!(c.len(), 3);

    b.assign([(7, 70)]);
    debug_assert_eq!(b, Map::from([(7, 70)]));
}

#[test]
// A stress test with inserting and getting
fn test_map_5() {
    use alloc::string::ToString;
    use rand::prelude::*;

    const COUNT: usize = 100000;

    let mut rng = SmallRng::seed_from_u64(1234567890);

    let mut map = Map::new();
    for _ in 0..COUNT {
        let key = rng.random_range(0..usize::MAX);
        let value = key.to_string();
        map.insert(key, value);
    }

    debug_assert_eq!(map.len(), COUNT);
    debug_assert!(map.validate().is_ok());

    let mut rng = SmallRng::seed_from_u64(1234567890);

    for _ in 0..COUNT {
        let key = rng.random_range(0..usize::MAX);
        let value = key.to_string();
        debug_assert_eq!(map.get(&key), Some(&value));
    }
}

#[test]
// A stress test with inserting and popping from both ends
fn test_map_6() {
    use alloc::string::ToString;
    use rand::prelude::*;

    const COUNT: usize = 100000;

    let mut rng = SmallRng::seed_from_u64(9876543210);

    let mut map = Map::new();
    for _ in 0..COUNT {
        let key = rng.random_range(0..usize::MAX);
        let value = key.to_string();
        map.insert(key, value);
    }

    let mut prev = 0;
    for _ in 0..COUNT / 2 {
        let (key, value) = map.pop_first().unwrap();
        debug_assert_eq!(key.to_string(), value);
        debug_assert!(key >= prev);
        prev = key;
    }

    let mut prev = usize::MAX;
    for _ in 0..COUNT / 2 {
        let (key, value) = map.pop_last().unwrap();
        debug_assert_eq!(key.to_string(), value);
        debug_assert!(key <= prev);
        prev = key;
    }

    debug_assert_eq!(map.len(), 0);
    debug_assert!(map.validate().is_ok());
}

#[test]
// Maps keyed by strings are searched with a `&str`
fn test_map_7() {
    use alloc::vec::Vec;

    let mut map: StringMap<i32> = [("Five", 5), ("One", 1), ("Nine", 9)]
        .into_iter()
        .map(|(k, v)| (CompactString::from(k), v))
        .collect();

    debug_assert_eq!(map.get("Five"), Some(&5));
    debug_assert_eq!(map.get("Seven"), None);
    debug_assert!(map.contains_key("One"));
    debug_assert_eq!(map.get_at(map.lower_bound("O")), Some((&CompactString::from("One"), &1)));

    if let Some(value) = map.get_mut("One") {
        *value = 100;
    }
    debug_assert_eq!(map.remove("Nine"), 1);
    debug_assert_eq!(map.remove("Nine"), 0);

    let v: Vec<(&str, i32)> = map.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    debug_assert_eq!(v, [("Five", 5), ("One", 100)]);

    let mut words = StringMultimap::new();
    words.insert(CompactString::from("b"), 1);
    words.insert(CompactString::from("a"), 2);
    words.insert(CompactString::from("b"), 3);
    debug_assert_eq!(words.count("b"), 2);
    let v: Vec<i32> = words.get_all("b").map(|kv| kv.1).collect();
    debug_assert_eq!(v, [1, 3]);
}

#[test]
// Changing the values of a multimap in place
fn test_map_8() {
    use alloc::vec::Vec;

    let mut map = Multimap::new();
    map.insert(1, 10);
    map.insert(2, 20);
    map.insert(2, 21);

    // Only the first value of the run is reached by key
    if let Some(value) = map.get_mut(&2) {
        *value += 100;
    }
    debug_assert_eq!(map.get_mut(&3), None);

    let (first, last) = map.equal_range(&2);
    let second = map.next_pos(first);
    debug_assert_ne!(second, last);
    if let Some((_, value)) = map.get_at_mut(second) {
        *value += 200;
    }

    let v: Vec<(i32, i32)> = map.iter().copied().collect();
    debug_assert_eq!(v, [(1, 10), (2, 120), (2, 221)]);
    debug_assert!(map.validate().is_ok());
}
