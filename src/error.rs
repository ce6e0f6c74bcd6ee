use core::fmt;

/// TreeError enumerates the ways a tree can be found broken by `validate()`.
///
/// Leaves are identified by their index, the same value held by a
/// [`Position`](crate::Position). None of these are expected in a tree that
/// is only modified through the public API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeError {
    /// The root is coloured red.
    RedRoot,
    /// A red leaf has a red parent.
    ConsecutiveReds(usize),
    /// Paths below a leaf pass through different numbers of black leaves.
    UnbalancedBlacks {
        /// The leaf whose subtrees disagree.
        leaf: usize,
        /// Black height of the left subtree.
        left: usize,
        /// Black height of the right subtree.
        right: usize,
    },
    /// Two leaves adjacent in order are not in sort order.
    SortError(usize, usize),
    /// A thread does not lead to the in-order neighbour.
    BrokenThread {
        /// The leaf holding the thread.
        leaf: usize,
        /// The true neighbour, `!0` for the header.
        expect: usize,
        /// Where the thread leads.
        found: usize,
    },
    /// A leaf's parent link does not lead to the leaf owning it.
    BrokenParent(usize),
    /// The header's first or last link is wrong.
    BrokenHeader,
    /// The maintained count disagrees with the number of linked leaves.
    CountMismatch {
        /// The maintained count.
        expect: usize,
        /// The number of leaves reachable from the root.
        found: usize,
    },
    /// A linked leaf has no element stored for it.
    VacantLeaf(usize),
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::RedRoot => write!(f, "root is red"),
            TreeError::ConsecutiveReds(leaf) => write!(f, "red leaf {leaf} has a red parent"),
            TreeError::UnbalancedBlacks { leaf, left, right } => {
                write!(f, "unbalanced blacks below {leaf}, left: {left} right: {right}")
            }
            TreeError::SortError(a, b) => write!(f, "leaves {a} and {b} are out of order"),
            TreeError::BrokenThread {
                leaf,
                expect,
                found,
            } => write!(
                f,
                "thread of leaf {leaf} leads to {found}, expected {expect}"
            ),
            TreeError::BrokenParent(leaf) => write!(f, "parent link of leaf {leaf} is broken"),
            TreeError::BrokenHeader => write!(f, "header does not match first and last leaves"),
            TreeError::CountMismatch { expect, found } => {
                write!(f, "count is {expect} but {found} leaves are linked")
            }
            TreeError::VacantLeaf(leaf) => write!(f, "leaf {leaf} has no element"),
        }
    }
}
