//! Positions, cursors and iterators over the threaded trees

#![warn(missing_docs)]

extern crate alloc;

use alloc::vec::Vec;
use core::iter::FusedIterator;

use crate::util::Tree;

//-----------------------------------------------------------------------------------------------//

/// A position within a collection
///
/// A position is a plain handle: it does not borrow the collection, so it can be kept across
/// insertions and passed back to `erase` or `insert_hint`. It either refers to an element or is
/// the past-the-end position returned by `end()`. Erasing an element only invalidates positions
/// to that element; using such a position afterwards is a logic error, and lookups through it
/// give `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position(pub(crate) usize);

impl Position {
    /// The past-the-end position, shared by all collections
    pub const END: Position = Position(!0);

    /// Check if this is the past-the-end position
    #[inline]
    pub fn is_end(self) -> bool {
        !self.0 == 0
    }

    /// The index of the leaf this position refers to
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

//-----------------------------------------------------------------------------------------------//

/// A bidirectional cursor over a collection
///
/// Moving forwards past the last element reaches the past-the-end position, and moving forwards
/// again wraps around to the first element (and the reverse when moving backwards).
pub struct Cursor<'a, T> {
    tree: &'a Tree,
    slots: &'a [Option<T>],
    leaf: usize,
}

impl<'a, T> Cursor<'a, T> {
    pub(crate) fn new(tree: &'a Tree, slots: &'a [Option<T>], leaf: usize) -> Self {
        Cursor { tree, slots, leaf }
    }

    /// The position of the cursor
    #[inline]
    pub fn position(&self) -> Position {
        Position(self.leaf)
    }

    /// The element under the cursor, or `None` at the past-the-end position
    #[inline]
    pub fn get(&self) -> Option<&'a T> {
        slot(self.slots, self.leaf)
    }

    /// Move to the next element
    pub fn move_next(&mut self) {
        self.leaf = self.tree.next(self.leaf);
    }

    /// Move to the previous element
    pub fn move_prev(&mut self) {
        self.leaf = self.tree.prev(self.leaf);
    }

    /// The element after the cursor, without moving
    pub fn peek_next(&self) -> Option<&'a T> {
        slot(self.slots, self.tree.next(self.leaf))
    }

    /// The element before the cursor, without moving
    pub fn peek_prev(&self) -> Option<&'a T> {
        slot(self.slots, self.tree.prev(self.leaf))
    }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        Cursor {
            tree: self.tree,
            slots: self.slots,
            leaf: self.leaf,
        }
    }
}

#[inline]
fn slot<T>(slots: &[Option<T>], leaf: usize) -> Option<&T> {
    slots.get(leaf).and_then(Option::as_ref)
}

//-----------------------------------------------------------------------------------------------//

/// Iterator over the elements between two positions of a collection
///
/// Iterating from either end only follows threads and child links, so the iterator holds no
/// stack and never climbs to a parent.
pub struct Iter<'a, T> {
    tree: &'a Tree,
    slots: &'a [Option<T>],
    front: usize,
    back: usize,
    count: Option<usize>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(tree: &'a Tree, slots: &'a [Option<T>]) -> Self {
        Iter {
            tree,
            slots,
            front: tree.first(),
            back: !0,
            count: Some(tree.count()),
        }
    }

    pub(crate) fn between(
        tree: &'a Tree,
        slots: &'a [Option<T>],
        front: usize,
        back: usize,
    ) -> Self {
        Iter {
            tree,
            slots,
            front,
            back,
            count: None,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.front == self.back || !self.front == 0 {
            return None;
        }

        let leaf = self.front;
        self.front = self.tree.next(leaf);
        if let Some(count) = self.count.as_mut() {
            *count -= 1;
        }

        slot(self.slots, leaf)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.count {
            Some(count) => (count, Some(count)),
            None => (0, Some(self.tree.count())),
        }
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            return None;
        }

        let leaf = self.tree.prev(self.back);
        if !leaf == 0 {
            return None;
        }
        self.back = leaf;
        if let Some(count) = self.count.as_mut() {
            *count -= 1;
        }

        slot(self.slots, leaf)
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            slots: self.slots,
            front: self.front,
            back: self.back,
            count: self.count,
        }
    }
}

//-----------------------------------------------------------------------------------------------//

/// Owning iterator over the elements of a collection
pub struct IntoIter<T> {
    tree: Tree,
    slots: Vec<Option<T>>,
    front: usize,
    back: usize,
    count: usize,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(tree: Tree, slots: Vec<Option<T>>) -> Self {
        IntoIter {
            front: tree.first(),
            back: !0,
            count: tree.count(),
            tree,
            slots,
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.count == 0 {
            return None;
        }

        let leaf = self.front;
        self.front = self.tree.next(leaf);
        self.count -= 1;

        self.slots[leaf].take()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.count, Some(self.count))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.count == 0 {
            return None;
        }

        let leaf = self.tree.prev(self.back);
        self.back = leaf;
        self.count -= 1;

        self.slots[leaf].take()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}
