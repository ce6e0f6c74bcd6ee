//! Utility types to support threaded red-black trees

#![warn(missing_docs)]

extern crate alloc;
use alloc::{collections::TryReserveError, vec::Vec};

use core::{cmp::Ordering, fmt::Display, mem};

use crate::error::TreeError;

//-----------------------------------------------------------------------------------------------//

// A leaf in a threaded red-black tree
//
// A side flagged as a thread does not own a subtree. Instead it holds the in-order neighbour on
// that side, or `!0` (the header) when there is none.
#[derive(Clone)]
struct Leaf {
    parent: usize,
    left: usize,
    right: usize,
    red: bool,
    left_thread: bool,
    right_thread: bool,
}

// The anchor of a tree, stood in for by `!0` wherever a leaf refers to it
#[derive(Clone)]
struct Header {
    root: usize,
    first: usize,
    last: usize,
}

impl Header {
    const EMPTY: Header = Header {
        root: !0,
        first: !0,
        last: !0,
    };
}

//-----------------------------------------------------------------------------------------------//

/// Where a new leaf belongs, as found by a descent from the root
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    /// A leaf comparing equal already exists
    Found(usize),
    /// The tree is empty, the new leaf becomes the root
    Root,
    /// The new leaf becomes the left child of the given leaf
    Left(usize),
    /// The new leaf becomes the right child of the given leaf
    Right(usize),
}

/// A threaded red-black tree of integer leaves
///
/// Like the other types in this crate, `Tree` only manages the structure of the tree. Keys live
/// in a caller-owned vector indexed by leaf, and every search takes a closure that compares the
/// search key against the key stored for a given leaf.
///
/// Every leaf side that has no child is a thread to the in-order neighbour on that side, so
/// stepping forwards or backwards never climbs parent links. The value `!0` is the header: it is
/// the parent of the root, the target of the outermost threads, and the past-the-end position.
#[derive(Clone)]
pub struct Tree {
    leaf: Vec<Leaf>,
    head: Header,
    recycle: usize,
    count: usize,
}

impl Tree {
    /// The size in bytes of the bookkeeping held per leaf
    pub const LEAF_SIZE: usize = mem::size_of::<Leaf>();

    /// Construct an empty tree
    pub fn new() -> Tree {
        Tree {
            leaf: Vec::new(),
            head: Header::EMPTY,
            recycle: !0,
            count: 0,
        }
    }

    /// Construct an empty tree, pre-allocating a given capacity
    pub fn with_capacity(capacity: usize) -> Tree {
        Tree {
            leaf: Vec::with_capacity(capacity),
            head: Header::EMPTY,
            recycle: !0,
            count: 0,
        }
    }

    /// Get the number of leaves in the tree
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Get the number of recycled leaves in the tree
    #[inline]
    pub fn recycle_count(&self) -> usize {
        self.leaf.len() - self.count
    }

    /// Get the current allocated size of the tree. This is the current `count` plus the
    /// `recycle_count`. Note that this is not necessarily the same as the allocated capacity.
    #[inline]
    pub fn allocated_count(&self) -> usize {
        self.leaf.len()
    }

    /// Remove all leaves from the tree
    pub fn clear(&mut self) {
        self.leaf.truncate(0);
        self.head = Header::EMPTY;
        self.recycle = !0;
        self.count = 0;
    }

    /// Check if the tree has no leaves
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Reserves capacity for at least `additional` more leaves
    ///
    /// Leaves that have been freed and are waiting to be recycled are subtracted from the
    /// `additional` requested. This function returns the amount of new leaf storage that was
    /// required (if any), so that callers keeping a parallel vector can reserve the same.
    pub fn reserve(&mut self, additional: usize) -> usize {
        let recycle_count = self.recycle_count();
        if additional > recycle_count {
            let required = additional - recycle_count;
            self.leaf.reserve(required);
            required
        } else {
            0
        }
    }

    /// Fallible version of [`Tree::reserve`]
    pub fn try_reserve(&mut self, additional: usize) -> Result<usize, TryReserveError> {
        let recycle_count = self.recycle_count();
        if additional > recycle_count {
            let required = additional - recycle_count;
            self.leaf.try_reserve(required)?;
            Ok(required)
        } else {
            Ok(0)
        }
    }

    /// Get the root leaf, or `!0` if the tree is empty
    #[inline]
    pub fn root(&self) -> usize {
        self.head.root
    }

    /// Get the first leaf in the tree, or `!0` if the tree is empty
    #[inline]
    pub fn first(&self) -> usize {
        self.head.first
    }

    /// Get the last leaf in the tree, or `!0` if the tree is empty
    #[inline]
    pub fn last(&self) -> usize {
        self.head.last
    }

    /// Get the next leaf in the tree
    ///
    /// Stepping past the last leaf gives `!0`, and stepping forwards from `!0` gives the first
    /// leaf. Only right links are followed: a thread directly, a child down to its leftmost leaf.
    #[inline]
    pub fn next(&self, leaf: usize) -> usize {
        if !leaf == 0 {
            return self.head.first;
        }
        let l = &self.leaf[leaf];
        if l.right_thread {
            l.right
        } else {
            leftmost(&self.leaf, l.right)
        }
    }

    /// Get the previous leaf in the tree
    ///
    /// The mirror of [`Tree::next`]. Stepping backwards from `!0` gives the last leaf.
    #[inline]
    pub fn prev(&self, leaf: usize) -> usize {
        if !leaf == 0 {
            return self.head.last;
        }
        let l = &self.leaf[leaf];
        if l.left_thread {
            l.left
        } else {
            rightmost(&self.leaf, l.left)
        }
    }

    /// Locate where a key belongs
    ///
    /// `compare` is called with a leaf and should return the ordering of the search key relative to
    /// the key of that leaf. When `multi` is set a comparison of `Equal` continues to the right, so
    /// that the returned location is immediately after the run of equal keys and never `Found`.
    pub fn locate<F>(&self, multi: bool, mut compare: F) -> Location
    where
        F: FnMut(usize) -> Ordering,
    {
        let mut x = self.head.root;

        // First leaf is a special case
        if !x == 0 {
            return Location::Root;
        }

        loop {
            let left = match compare(x) {
                Ordering::Less => true,
                Ordering::Greater => false,
                Ordering::Equal if multi => false,
                Ordering::Equal => return Location::Found(x),
            };

            let l = &self.leaf[x];
            if left {
                if l.left_thread {
                    return Location::Left(x);
                }
                x = l.left;
            } else {
                if l.right_thread {
                    return Location::Right(x);
                }
                x = l.right;
            }
        }
    }

    /// Get the first leaf whose key is not less than the search key, or `!0`
    pub fn lower_bound<F>(&self, mut compare: F) -> usize
    where
        F: FnMut(usize) -> Ordering,
    {
        let mut x = self.head.root;
        let mut y = !0;

        while !x != 0 {
            let l = &self.leaf[x];
            if compare(x) != Ordering::Greater {
                y = x;
                if l.left_thread {
                    break;
                }
                x = l.left;
            } else {
                if l.right_thread {
                    break;
                }
                x = l.right;
            }
        }

        y
    }

    /// Get the first leaf whose key is greater than the search key, or `!0`
    pub fn upper_bound<F>(&self, mut compare: F) -> usize
    where
        F: FnMut(usize) -> Ordering,
    {
        let mut x = self.head.root;
        let mut y = !0;

        while !x != 0 {
            let l = &self.leaf[x];
            if compare(x) == Ordering::Less {
                y = x;
                if l.left_thread {
                    break;
                }
                x = l.left;
            } else {
                if l.right_thread {
                    break;
                }
                x = l.right;
            }
        }

        y
    }

    /// Get the first leaf whose key equals the search key, or `!0`
    pub fn find<F>(&self, mut compare: F) -> usize
    where
        F: FnMut(usize) -> Ordering,
    {
        let y = self.lower_bound(&mut compare);
        if !y != 0 && compare(y) == Ordering::Equal {
            y
        } else {
            !0
        }
    }

    /// Insert a leaf at a location found by [`Tree::locate`]
    ///
    /// The new leaf is returned, and for `Location::Found` that is the existing leaf. Note the
    /// new leaf may be a 'recycled' value that has previously been removed, or a new leaf value
    /// that is the next in the ascending sequence that has not been used before.
    pub fn insert(&mut self, at: Location) -> usize {
        let z = match at {
            Location::Found(leaf) => return leaf,
            Location::Root => self.attach_root(),
            Location::Left(parent) => self.attach_left(parent),
            Location::Right(parent) => self.attach_right(parent),
        };
        insert_fixup(&mut self.leaf, &mut self.head.root, z);
        z
    }

    /// Insert a leaf immediately before another in the order of the tree
    ///
    /// Inserting before `!0` appends a leaf after the last one. The caller is responsible for the
    /// keys being in order around the new leaf.
    pub fn insert_before(&mut self, leaf: usize) -> usize {
        let z = if !leaf == 0 {
            if self.is_empty() {
                self.attach_root()
            } else {
                self.attach_right(self.head.last)
            }
        } else if self.leaf[leaf].left_thread {
            self.attach_left(leaf)
        } else {
            self.attach_right(rightmost(&self.leaf, self.leaf[leaf].left))
        };
        insert_fixup(&mut self.leaf, &mut self.head.root, z);
        z
    }

    /// Remove a leaf
    ///
    /// The leaf is unlinked and added to the 'recycle bin' for possible future reallocation. No
    /// other leaf changes index, so the caller's indices to every other leaf stay valid.
    pub fn remove(&mut self, leaf: usize) {
        debug_assert!(!leaf != 0);

        if self.head.first == leaf {
            self.head.first = self.next(leaf);
        }
        if self.head.last == leaf {
            self.head.last = self.prev(leaf);
        }

        unlink(&mut self.leaf, &mut self.head.root, leaf);
        self.free(leaf);
    }

    /// Check the structure of the tree
    ///
    /// Parent links, red-black colouring, threads and the header are all re-derived from the
    /// child links alone. `compare` is called with two leaves adjacent in order and must not
    /// return `Greater`, nor `Equal` unless `multi` is set. On success the black height of the
    /// tree is returned.
    pub fn validate<F>(&self, multi: bool, mut compare: F) -> Result<usize, TreeError>
    where
        F: FnMut(usize, usize) -> Ordering,
    {
        let root = self.head.root;
        if !root != 0 {
            if !self.leaf[root].parent != 0 {
                return Err(TreeError::BrokenParent(root));
            }
            if self.leaf[root].red {
                return Err(TreeError::RedRoot);
            }
        }

        let blacks = check_colour(&self.leaf, root)?;

        let mut order = Vec::with_capacity(self.count);
        in_order(&self.leaf, root, &mut order);

        if order.len() != self.count {
            return Err(TreeError::CountMismatch {
                expect: self.count,
                found: order.len(),
            });
        }
        if order.first().copied().unwrap_or(!0) != self.head.first
            || order.last().copied().unwrap_or(!0) != self.head.last
        {
            return Err(TreeError::BrokenHeader);
        }

        for (i, &x) in order.iter().enumerate() {
            let l = &self.leaf[x];
            let prev = if i == 0 { !0 } else { order[i - 1] };
            let next = order.get(i + 1).copied().unwrap_or(!0);

            if l.left_thread && l.left != prev {
                return Err(TreeError::BrokenThread {
                    leaf: x,
                    expect: prev,
                    found: l.left,
                });
            }
            if l.right_thread && l.right != next {
                return Err(TreeError::BrokenThread {
                    leaf: x,
                    expect: next,
                    found: l.right,
                });
            }

            if !next != 0 {
                match compare(x, next) {
                    Ordering::Less => {}
                    Ordering::Equal if multi => {}
                    _ => return Err(TreeError::SortError(x, next)),
                }
            }
        }

        Ok(blacks)
    }

    // Allocate and initialise a new red leaf, threaded on both sides
    fn alloc(&mut self, parent: usize, left: usize, right: usize) -> usize {
        // Increase the leaf count
        self.count += 1;

        let fresh = Leaf {
            parent,
            left,
            right,
            red: true,
            left_thread: true,
            right_thread: true,
        };

        // Recycle an old leaf
        let leaf = self.recycle;
        if !leaf != 0 {
            self.recycle = self.leaf[leaf].parent;
            self.leaf[leaf] = fresh;
            return leaf;
        }

        // Inititialise a new one
        self.leaf.push(fresh);
        self.leaf.len() - 1
    }

    // Free a leaf and add it to the recycle queue
    fn free(&mut self, leaf: usize) {
        // Decrease the leaf count
        self.count -= 1;

        // Recycle the leaf
        self.leaf[leaf].parent = self.recycle;
        self.recycle = leaf;
    }

    fn attach_root(&mut self) -> usize {
        debug_assert!(self.is_empty());
        let z = self.alloc(!0, !0, !0);
        self.head = Header {
            root: z,
            first: z,
            last: z,
        };
        z
    }

    // The new leaf inherits the predecessor thread of `parent`
    fn attach_left(&mut self, parent: usize) -> usize {
        debug_assert!(self.leaf[parent].left_thread);
        let z = self.alloc(parent, self.leaf[parent].left, parent);
        let p = &mut self.leaf[parent];
        p.left = z;
        p.left_thread = false;
        if self.head.first == parent {
            self.head.first = z;
        }
        z
    }

    // The new leaf inherits the successor thread of `parent`
    fn attach_right(&mut self, parent: usize) -> usize {
        debug_assert!(self.leaf[parent].right_thread);
        let z = self.alloc(parent, parent, self.leaf[parent].right);
        let p = &mut self.leaf[parent];
        p.right = z;
        p.right_thread = false;
        if self.head.last == parent {
            self.head.last = z;
        }
        z
    }
}

impl Default for Tree {
    fn default() -> Self {
        Tree::new()
    }
}

impl Display for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[ ")?;
        let mut leaf = self.first();
        while !leaf != 0 {
            write!(f, "{leaf} ")?;
            leaf = self.next(leaf);
        }
        write!(f, "]")?;
        Ok(())
    }
}

//-----------------------------------------------------------------------------------------------//

// IMPLEMENTATION NOTE
//
// The functions below are low level. They take the leaf slice and the root of the tree directly,
// and each one keeps both the colouring and the threads consistent. Use with caution.

fn leftmost(leaf: &[Leaf], mut x: usize) -> usize {
    while !leaf[x].left_thread {
        x = leaf[x].left;
    }
    x
}

fn rightmost(leaf: &[Leaf], mut x: usize) -> usize {
    while !leaf[x].right_thread {
        x = leaf[x].right;
    }
    x
}

// Is `x` the left child of `p`? A thread is never mistaken for a child here, since a thread on
// the left of `p` leads to its predecessor, which is never a child of `p`.
#[inline]
fn is_left_child(leaf: &[Leaf], p: usize, x: usize) -> bool {
    !leaf[p].left_thread && leaf[p].left == x
}

#[inline]
fn red_left(leaf: &[Leaf], x: usize) -> bool {
    !leaf[x].left_thread && leaf[leaf[x].left].red
}

#[inline]
fn red_right(leaf: &[Leaf], x: usize) -> bool {
    !leaf[x].right_thread && leaf[leaf[x].right].red
}

// Point whatever held `old` (a parent's child slot, or the root) at `new`
fn replace_child(leaf: &mut [Leaf], root: &mut usize, p: usize, old: usize, new: usize) {
    if !p == 0 {
        *root = new;
    } else if is_left_child(leaf, p, old) {
        leaf[p].left = new;
    } else {
        debug_assert!(!leaf[p].right_thread && leaf[p].right == old);
        leaf[p].right = new;
    }
}

//              (p)                       (p)
//               |                         |
//               x                         y
//              / \                       / \
//             a   y        ==>          x   c
//                / \                   / \
//               b   c                 a   b
//
// When `b` is absent, the left thread of `y` led to `x`. After the rotation `x` has no right
// child, so its right side becomes a thread to its successor `y`.
fn rotate_left(leaf: &mut [Leaf], root: &mut usize, x: usize) {
    debug_assert!(!leaf[x].right_thread);
    let y = leaf[x].right;

    if leaf[y].left_thread {
        debug_assert_eq!(leaf[y].left, x);
        leaf[x].right = y;
        leaf[x].right_thread = true;
    } else {
        let b = leaf[y].left;
        leaf[x].right = b;
        leaf[b].parent = x;
    }

    let p = leaf[x].parent;
    leaf[y].parent = p;
    replace_child(leaf, root, p, x, y);

    leaf[y].left = x;
    leaf[y].left_thread = false;
    leaf[x].parent = y;
}

// The mirror image of `rotate_left`
fn rotate_right(leaf: &mut [Leaf], root: &mut usize, x: usize) {
    debug_assert!(!leaf[x].left_thread);
    let y = leaf[x].left;

    if leaf[y].right_thread {
        debug_assert_eq!(leaf[y].right, x);
        leaf[x].left = y;
        leaf[x].left_thread = true;
    } else {
        let b = leaf[y].right;
        leaf[x].left = b;
        leaf[b].parent = x;
    }

    let p = leaf[x].parent;
    leaf[y].parent = p;
    replace_child(leaf, root, p, x, y);

    leaf[y].right = x;
    leaf[y].right_thread = false;
    leaf[x].parent = y;
}

// Restore the red-black rules after linking the red leaf `z`
fn insert_fixup(leaf: &mut [Leaf], root: &mut usize, mut z: usize) {
    loop {
        let mut p = leaf[z].parent;
        if !p == 0 || !leaf[p].red {
            break;
        }

        // A red parent is never the root
        let g = leaf[p].parent;

        if is_left_child(leaf, g, p) {
            let u = leaf[g].right;
            if !leaf[g].right_thread && leaf[u].red {
                leaf[p].red = false;
                leaf[u].red = false;
                leaf[g].red = true;
                z = g;
            } else {
                if !is_left_child(leaf, p, z) {
                    z = p;
                    rotate_left(leaf, root, z);
                    p = leaf[z].parent;
                }
                leaf[p].red = false;
                leaf[g].red = true;
                rotate_right(leaf, root, g);
            }
        } else {
            let u = leaf[g].left;
            if !leaf[g].left_thread && leaf[u].red {
                leaf[p].red = false;
                leaf[u].red = false;
                leaf[g].red = true;
                z = g;
            } else {
                if is_left_child(leaf, p, z) {
                    z = p;
                    rotate_right(leaf, root, z);
                    p = leaf[z].parent;
                }
                leaf[p].red = false;
                leaf[g].red = true;
                rotate_left(leaf, root, g);
            }
        }
    }

    let r = *root;
    leaf[r].red = false;
}

// Unlink `z` from the tree, patching the threads of its neighbours
//
// A leaf with two children is replaced by its successor `y`, which is moved (not copied) into the
// position of `z`. `x` tracks the subtree that took the place of the leaf physically removed, and
// may be `!0`, in which case `xparent` says where it hangs.
fn unlink(leaf: &mut [Leaf], root: &mut usize, z: usize) {
    let p = leaf[z].parent;
    let x;
    let xparent;
    let removed_red;

    if leaf[z].left_thread && leaf[z].right_thread {
        if !p == 0 {
            *root = !0;
        } else if is_left_child(leaf, p, z) {
            leaf[p].left = leaf[z].left;
            leaf[p].left_thread = true;
        } else {
            leaf[p].right = leaf[z].right;
            leaf[p].right_thread = true;
        }
        x = !0;
        xparent = p;
        removed_red = leaf[z].red;
    } else if leaf[z].left_thread {
        // Only a right child: its leftmost leaf was threaded back to `z`
        let c = leaf[z].right;
        let s = leftmost(leaf, c);
        leaf[s].left = leaf[z].left;
        leaf[c].parent = p;
        replace_child(leaf, root, p, z, c);
        x = c;
        xparent = p;
        removed_red = leaf[z].red;
    } else if leaf[z].right_thread {
        // Only a left child: its rightmost leaf was threaded forward to `z`
        let c = leaf[z].left;
        let s = rightmost(leaf, c);
        leaf[s].right = leaf[z].right;
        leaf[c].parent = p;
        replace_child(leaf, root, p, z, c);
        x = c;
        xparent = p;
        removed_red = leaf[z].red;
    } else {
        let a = leaf[z].left;
        let b = leaf[z].right;
        let y = leftmost(leaf, b);

        // The predecessor of `z` now precedes `y`
        let q = rightmost(leaf, a);
        leaf[q].right = y;

        leaf[y].left = a;
        leaf[y].left_thread = false;
        leaf[a].parent = y;

        if y != b {
            xparent = leaf[y].parent;
            if leaf[y].right_thread {
                leaf[xparent].left = y;
                leaf[xparent].left_thread = true;
                x = !0;
            } else {
                x = leaf[y].right;
                leaf[x].parent = xparent;
                leaf[xparent].left = x;
            }
            leaf[y].right = b;
            leaf[y].right_thread = false;
            leaf[b].parent = y;
        } else {
            xparent = y;
            x = if leaf[y].right_thread { !0 } else { leaf[y].right };
        }

        leaf[y].parent = p;
        replace_child(leaf, root, p, z, y);

        removed_red = leaf[y].red;
        leaf[y].red = leaf[z].red;
    }

    if !removed_red {
        erase_fixup(leaf, root, x, xparent);
    }
}

// Restore the red-black rules after a black leaf was removed above `x`
fn erase_fixup(leaf: &mut [Leaf], root: &mut usize, mut x: usize, mut xparent: usize) {
    while x != *root && (!x == 0 || !leaf[x].red) {
        // An absent `x` sits on the threaded side, the sibling side always has a child
        let x_left = if !x == 0 {
            leaf[xparent].left_thread
        } else {
            is_left_child(leaf, xparent, x)
        };

        if x_left {
            let mut w = leaf[xparent].right;
            if leaf[w].red {
                leaf[w].red = false;
                leaf[xparent].red = true;
                rotate_left(leaf, root, xparent);
                w = leaf[xparent].right;
            }
            if !red_left(leaf, w) && !red_right(leaf, w) {
                leaf[w].red = true;
                x = xparent;
                xparent = leaf[x].parent;
            } else {
                if !red_right(leaf, w) {
                    let wl = leaf[w].left;
                    leaf[wl].red = false;
                    leaf[w].red = true;
                    rotate_right(leaf, root, w);
                    w = leaf[xparent].right;
                }
                leaf[w].red = leaf[xparent].red;
                leaf[xparent].red = false;
                let wr = leaf[w].right;
                leaf[wr].red = false;
                rotate_left(leaf, root, xparent);
                x = *root;
                break;
            }
        } else {
            let mut w = leaf[xparent].left;
            if leaf[w].red {
                leaf[w].red = false;
                leaf[xparent].red = true;
                rotate_right(leaf, root, xparent);
                w = leaf[xparent].left;
            }
            if !red_left(leaf, w) && !red_right(leaf, w) {
                leaf[w].red = true;
                x = xparent;
                xparent = leaf[x].parent;
            } else {
                if !red_left(leaf, w) {
                    let wr = leaf[w].right;
                    leaf[wr].red = false;
                    leaf[w].red = true;
                    rotate_left(leaf, root, w);
                    w = leaf[xparent].left;
                }
                leaf[w].red = leaf[xparent].red;
                leaf[xparent].red = false;
                let wl = leaf[w].left;
                leaf[wl].red = false;
                rotate_right(leaf, root, xparent);
                x = *root;
                break;
            }
        }
    }

    if !x != 0 {
        leaf[x].red = false;
    }
}

//-----------------------------------------------------------------------------------------------//

// Check parent links and colouring below `x`, returning the black height
fn check_colour(leaf: &[Leaf], x: usize) -> Result<usize, TreeError> {
    if !x == 0 {
        return Ok(1);
    }

    let l = &leaf[x];
    let left = if l.left_thread { !0 } else { l.left };
    let right = if l.right_thread { !0 } else { l.right };

    for child in [left, right] {
        if !child != 0 {
            if leaf[child].parent != x {
                return Err(TreeError::BrokenParent(child));
            }
            if l.red && leaf[child].red {
                return Err(TreeError::ConsecutiveReds(child));
            }
        }
    }

    let lblacks = check_colour(leaf, left)?;
    let rblacks = check_colour(leaf, right)?;
    if lblacks != rblacks {
        return Err(TreeError::UnbalancedBlacks {
            leaf: x,
            left: lblacks,
            right: rblacks,
        });
    }

    Ok(lblacks + usize::from(!l.red))
}

// Collect the leaves below `x` in order, following child links only
fn in_order(leaf: &[Leaf], x: usize, order: &mut Vec<usize>) {
    if !x == 0 {
        return;
    }
    let l = &leaf[x];
    if !l.left_thread {
        in_order(leaf, l.left, order);
    }
    order.push(x);
    if !l.right_thread {
        in_order(leaf, l.right, order);
    }
}

//-----------------------------------------------------------------------------------------------//

#[cfg(test)]
fn insert_key(tree: &mut Tree, keys: &mut Vec<u32>, key: u32, multi: bool) -> usize {
    let at = tree.locate(multi, |x| key.cmp(&keys[x]));
    let leaf = tree.insert(at);
    if leaf == keys.len() {
        keys.push(key);
    } else {
        keys[leaf] = key;
    }
    leaf
}

#[test]
// Threads of a small tree lead to the in-order neighbours
fn test_tree_0() {
    use alloc::{string::ToString, vec};

    let mut tree = Tree::new();
    let mut keys = Vec::new();

    for key in [5, 3, 8, 1, 4] {
        insert_key(&mut tree, &mut keys, key, false);
        debug_assert!(tree.validate(false, |a, b| keys[a].cmp(&keys[b])).is_ok());
    }

    let mut order = Vec::new();
    let mut x = tree.first();
    while !x != 0 {
        order.push(keys[x]);
        x = tree.next(x);
    }
    debug_assert_eq!(order, vec![1, 3, 4, 5, 8]);

    let mut order = Vec::new();
    let mut x = tree.last();
    while !x != 0 {
        order.push(keys[x]);
        x = tree.prev(x);
    }
    debug_assert_eq!(order, vec![8, 5, 4, 3, 1]);

    debug_assert_eq!(tree.next(!0), tree.first());
    debug_assert_eq!(tree.prev(!0), tree.last());
    debug_assert_eq!(tree.to_string(), "[ 3 1 4 0 2 ]");
}

#[test]
// A duplicate key is found, unless duplicates are allowed
fn test_tree_1() {
    let mut tree = Tree::new();
    let mut keys = Vec::new();

    let a = insert_key(&mut tree, &mut keys, 7, false);
    debug_assert_eq!(tree.locate(false, |x| 7.cmp(&keys[x])), Location::Found(a));
    debug_assert_eq!(tree.locate(true, |x| 7.cmp(&keys[x])), Location::Right(a));

    let b = insert_key(&mut tree, &mut keys, 7, true);
    let c = insert_key(&mut tree, &mut keys, 7, true);
    debug_assert_eq!(tree.count(), 3);

    // Equal keys keep the order they were inserted in
    debug_assert_eq!(tree.first(), a);
    debug_assert_eq!(tree.next(a), b);
    debug_assert_eq!(tree.next(b), c);
    debug_assert_eq!(tree.last(), c);

    debug_assert_eq!(tree.find(|x| 7.cmp(&keys[x])), a);
    debug_assert_eq!(tree.lower_bound(|x| 7.cmp(&keys[x])), a);
    debug_assert_eq!(tree.upper_bound(|x| 7.cmp(&keys[x])), !0);
    debug_assert_eq!(tree.find(|x| 6.cmp(&keys[x])), !0);
    debug_assert!(tree.validate(true, |a, b| keys[a].cmp(&keys[b])).is_ok());
    debug_assert!(tree.validate(false, |a, b| keys[a].cmp(&keys[b])).is_err());
}

#[test]
// Leaves inserted by position end up exactly where they were asked to go
fn test_tree_2() {
    let mut tree = Tree::new();

    let b = tree.insert_before(!0);
    let d = tree.insert_before(!0);
    let a = tree.insert_before(b);
    let c = tree.insert_before(d);
    let e = tree.insert_before(!0);

    let mut order = Vec::new();
    let mut x = tree.first();
    while !x != 0 {
        order.push(x);
        x = tree.next(x);
    }
    debug_assert_eq!(order, alloc::vec![a, b, c, d, e]);
    debug_assert!(tree.validate(false, |x, y| {
        let rank = |leaf| order.iter().position(|&o| o == leaf);
        rank(x).cmp(&rank(y))
    })
    .is_ok());
}

#[test]
// A stress test with inserting and removing, checking every step
fn test_tree_3() {
    use rand::prelude::*;

    const COUNT: usize = 2000;

    let mut rng = SmallRng::seed_from_u64(1234567890);
    let mut tree = Tree::new();
    let mut keys = Vec::new();
    let mut live = Vec::new();

    for _ in 0..COUNT {
        let key = rng.random_range(0..500);
        live.push(insert_key(&mut tree, &mut keys, key, true));
        debug_assert!(tree.validate(true, |a, b| keys[a].cmp(&keys[b])).is_ok());
    }

    live.shuffle(&mut rng);
    for (i, leaf) in live.iter().enumerate() {
        tree.remove(*leaf);
        debug_assert_eq!(tree.count(), COUNT - i - 1);
        debug_assert!(tree.validate(true, |a, b| keys[a].cmp(&keys[b])).is_ok());
    }

    debug_assert!(tree.is_empty());
    debug_assert_eq!(tree.first(), !0);
    debug_assert_eq!(tree.last(), !0);
    debug_assert_eq!(tree.recycle_count(), COUNT);

    // Freed leaves are handed out again before the tree grows
    insert_key(&mut tree, &mut keys, 1, true);
    debug_assert_eq!(tree.allocated_count(), COUNT);
}
