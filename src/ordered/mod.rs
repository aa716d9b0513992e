//! Ordered collections over a comparator.
//!
//! This module provides [`AvlSet`], an ordered set of unique elements
//! backed by an AVL tree whose nodes also carry a doubly linked ascending
//! chain, plus the [`OrderedSet`] capability trait that the set algebra
//! operates over.
//!
//! # Structure
//!
//! Every element lives in exactly one tree node. The node stores the
//! owning `left`/`right` subtree links used for logarithmic descent, and
//! two non-owning `previous`/`next` links forming the in-order chain.
//! Rebalancing rotations rewire parent/child relationships only; the
//! chain is untouched because rotations never change which elements a
//! subtree contains.
//!
//! # Time Complexity
//!
//! | Operation        | Cost            |
//! |------------------|-----------------|
//! | `insert`         | O(log n)        |
//! | `remove`         | O(log n)        |
//! | `contains`       | O(log n)        |
//! | `find`           | O(log n)        |
//! | `lower_bound`    | O(log n)        |
//! | `len`            | O(1)            |
//! | cursor `advance` | O(1)            |
//! | `iter`           | O(1) + O(n)     |
//! | `union`          | O(m log (n+m))  |
//! | `intersection`   | O(n log m)      |
//! | `difference`     | O(m log n)      |
//!
//! # Examples
//!
//! ```rust
//! use chainset::ordered::AvlSet;
//!
//! let mut set = AvlSet::new();
//! set.insert(3);
//! set.insert(1);
//! set.insert(2);
//! set.insert(2);
//!
//! assert_eq!(set.len(), 3);
//! let ascending: Vec<i32> = set.iter().copied().collect();
//! assert_eq!(ascending, vec![1, 2, 3]);
//!
//! let cursor = set.find(&2);
//! assert_eq!(cursor.element(&set), Ok(&2));
//! ```

mod algebra;
mod arena;
mod avl_set;
mod compare;
mod cursor;

pub use algebra::OrderedSet;
pub use algebra::difference_boxed;
pub use algebra::intersection_boxed;
pub use algebra::is_disjoint;
pub use algebra::is_equal;
pub use algebra::is_subset;
pub use algebra::is_superset;
pub use algebra::union_boxed;
pub use avl_set::AvlSet;
pub use compare::Compare;
pub use compare::NaturalOrder;
pub use cursor::Cursor;
pub use cursor::IntoIter;
pub use cursor::Iter;
