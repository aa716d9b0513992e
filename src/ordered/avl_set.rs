//! Ordered set on an AVL tree threaded with an in-order chain.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use crate::error::AllocationError;

use super::arena::{Node, NodeArena, NodeId};
use super::compare::{Compare, NaturalOrder};
use super::cursor::{Cursor, IntoIter, Iter};

/// Source of per-instance brands. A brand ties every cursor to the set
/// that issued it; copies receive a fresh brand, moves keep theirs.
static NEXT_BRAND: AtomicU64 = AtomicU64::new(1);

fn next_brand() -> u64 {
    NEXT_BRAND.fetch_add(1, AtomicOrdering::Relaxed)
}

/// An ordered set of unique elements.
///
/// `AvlSet` keeps its elements in an AVL-balanced binary search tree whose
/// nodes are additionally threaded into a doubly linked ascending chain.
/// The tree gives O(log n) insert/remove/lookup; the chain gives O(1)
/// neighbor access in sorted order, so iteration and cursor navigation
/// never walk the tree.
///
/// Elements are ordered by the comparator `C` (the element type's own
/// ordering by default); two elements the comparator reports as equal are
/// the same element, and inserting an element that is already present is a
/// no-op.
///
/// # Type Parameters
///
/// * `T` - The element type.
/// * `C` - The ordering predicate; defaults to [`NaturalOrder`].
///
/// # Examples
///
/// ```rust
/// use chainset::ordered::AvlSet;
///
/// let mut set = AvlSet::new();
/// set.insert(5);
/// set.insert(1);
/// set.insert(3);
/// set.insert(3);
///
/// assert_eq!(set.len(), 3);
/// let ascending: Vec<i32> = set.iter().copied().collect();
/// assert_eq!(ascending, vec![1, 3, 5]);
/// ```
pub struct AvlSet<T, C = NaturalOrder> {
    arena: NodeArena<T>,
    root: Option<NodeId>,
    /// First element in sorted order; the sentinel's `next`.
    minimum: NodeId,
    /// Last element in sorted order; the sentinel's `previous`.
    maximum: NodeId,
    comparator: C,
    brand: u64,
}

static_assertions::assert_impl_all!(AvlSet<i32>: Send, Sync);

impl<T> AvlSet<T, NaturalOrder> {
    /// Creates a new empty set ordered by the element type's own ordering.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chainset::ordered::AvlSet;
    ///
    /// let set: AvlSet<i32> = AvlSet::new();
    /// assert!(set.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<T, C> AvlSet<T, C> {
    /// Creates a new empty set ordered by an explicit comparator.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::cmp::Ordering;
    /// use chainset::ordered::{AvlSet, Compare};
    ///
    /// #[derive(Clone, Copy, Default)]
    /// struct Descending;
    ///
    /// impl Compare<i32> for Descending {
    ///     fn compare(&self, left: &i32, right: &i32) -> Ordering {
    ///         right.cmp(left)
    ///     }
    /// }
    ///
    /// let mut set = AvlSet::with_comparator(Descending);
    /// set.insert(1);
    /// set.insert(2);
    /// assert_eq!(set.first(), Some(&2));
    /// ```
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            arena: NodeArena::new(),
            root: None,
            minimum: NodeId::SENTINEL,
            maximum: NodeId::SENTINEL,
            comparator,
            brand: next_brand(),
        }
    }

    /// Returns the number of elements in the set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chainset::ordered::AvlSet;
    ///
    /// let set: AvlSet<i32> = [1, 2, 3].into();
    /// assert_eq!(set.len(), 3);
    /// ```
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the set contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a reference to the comparator ordering this set.
    #[inline]
    pub const fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Removes all elements.
    ///
    /// Every outstanding cursor into this set stops resolving; the end
    /// cursor remains valid.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.minimum = NodeId::SENTINEL;
        self.maximum = NodeId::SENTINEL;
    }

    /// Returns a reference to the smallest element, or `None` if empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chainset::ordered::AvlSet;
    ///
    /// let set: AvlSet<i32> = [3, 1, 2].into();
    /// assert_eq!(set.first(), Some(&1));
    /// ```
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        if self.minimum.is_sentinel() {
            None
        } else {
            Some(&self.arena.node(self.minimum).element)
        }
    }

    /// Returns a reference to the largest element, or `None` if empty.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        if self.maximum.is_sentinel() {
            None
        } else {
            Some(&self.arena.node(self.maximum).element)
        }
    }

    /// Returns a cursor at the smallest element, or the end cursor if the
    /// set is empty.
    #[must_use]
    pub const fn cursor_front(&self) -> Cursor {
        Cursor::new(self.brand, self.minimum)
    }

    /// Returns a cursor at the largest element, or the end cursor if the
    /// set is empty.
    #[must_use]
    pub const fn cursor_back(&self) -> Cursor {
        Cursor::new(self.brand, self.maximum)
    }

    /// Returns the cursor denoting the end position.
    ///
    /// The end position holds no element; it is where `find` misses
    /// resolve to, and what advancing past the largest element yields.
    #[must_use]
    pub const fn cursor_end(&self) -> Cursor {
        Cursor::new(self.brand, NodeId::SENTINEL)
    }

    /// Returns an iterator over the elements in ascending order.
    ///
    /// Iteration follows the in-order chain; the tree is not traversed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chainset::ordered::AvlSet;
    ///
    /// let set: AvlSet<i32> = [2, 3, 1].into();
    /// let ascending: Vec<i32> = set.iter().copied().collect();
    /// assert_eq!(ascending, vec![1, 2, 3]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T, C> {
        Iter::over(self)
    }

    /// Returns an iterator over the elements in descending order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chainset::ordered::AvlSet;
    ///
    /// let set: AvlSet<i32> = [2, 3, 1].into();
    /// let descending: Vec<i32> = set.iter_descending().copied().collect();
    /// assert_eq!(descending, vec![3, 2, 1]);
    /// ```
    #[must_use]
    pub fn iter_descending(&self) -> std::iter::Rev<Iter<'_, T, C>> {
        self.iter().rev()
    }

    // Accessors for the cursor and iterator layer.

    #[inline]
    pub(super) const fn brand_value(&self) -> u64 {
        self.brand
    }

    #[inline]
    pub(super) const fn minimum_id(&self) -> NodeId {
        self.minimum
    }

    #[inline]
    pub(super) const fn maximum_id(&self) -> NodeId {
        self.maximum
    }

    #[inline]
    pub(super) fn resolve_node(&self, id: NodeId) -> Option<&Node<T>> {
        self.arena.resolve(id)
    }

    #[inline]
    pub(super) fn node_ref(&self, id: NodeId) -> &Node<T> {
        self.arena.node(id)
    }

    /// Consumes the set, returning its elements in ascending order.
    pub(super) fn drain_ascending(mut self) -> Vec<T> {
        let mut elements = Vec::with_capacity(self.len());
        let mut id = self.minimum;
        while !id.is_sentinel() {
            let node = self.arena.release(id);
            elements.push(node.element);
            id = node.next;
        }
        self.root = None;
        self.minimum = NodeId::SENTINEL;
        self.maximum = NodeId::SENTINEL;
        elements
    }
}

impl<T, C: Compare<T>> AvlSet<T, C> {
    /// Inserts an element, reporting allocation failure instead of
    /// panicking.
    ///
    /// Returns `Ok(true)` if the element was absent and is now present,
    /// `Ok(false)` if an equal element was already present; insertion is
    /// idempotent. The node is allocated before
    /// the tree or the chain is touched, so an `Err` leaves the set
    /// exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError`] when node storage cannot be reserved.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chainset::ordered::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// assert_eq!(set.try_insert(7), Ok(true));
    /// assert_eq!(set.try_insert(7), Ok(false));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn try_insert(&mut self, element: T) -> Result<bool, AllocationError> {
        let (root, inserted) = self.insert_below(self.root, element, None)?;
        self.root = Some(root);
        Ok(inserted)
    }

    /// Inserts an element.
    ///
    /// Returns `true` if the element was absent and is now present,
    /// `false` if an equal element was already present.
    ///
    /// # Panics
    ///
    /// Panics if node storage cannot be reserved, like the standard
    /// library collections; use [`Self::try_insert`] to handle that case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chainset::ordered::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// assert!(set.insert(7));
    /// assert!(!set.insert(7));
    /// ```
    pub fn insert(&mut self, element: T) -> bool {
        match self.try_insert(element) {
            Ok(inserted) => inserted,
            Err(error) => panic!("{error}"),
        }
    }

    /// Removes an element.
    ///
    /// Returns `true` if the element was present and has been removed,
    /// `false` if it was absent; removal of an absent element is a
    /// no-op. Every cursor at the removed element
    /// stops resolving from this point on.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chainset::ordered::AvlSet;
    ///
    /// let mut set: AvlSet<i32> = [1, 2, 3].into();
    /// assert!(set.remove(&2));
    /// assert!(!set.remove(&2));
    /// assert_eq!(set.len(), 2);
    /// ```
    pub fn remove(&mut self, element: &T) -> bool {
        let (root, removed) = self.remove_below(self.root, element);
        self.root = root;
        removed
    }

    /// Returns `true` if the set contains an element equal to the given
    /// one under the comparator.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chainset::ordered::AvlSet;
    ///
    /// let set: AvlSet<i32> = [1, 2, 3].into();
    /// assert!(set.contains(&2));
    /// assert!(!set.contains(&4));
    /// ```
    #[must_use]
    pub fn contains(&self, element: &T) -> bool {
        self.find_in(self.root, element).is_some()
    }

    /// Returns a cursor at the element equal to the given one, or the end
    /// cursor if no such element exists.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chainset::ordered::AvlSet;
    ///
    /// let set: AvlSet<i32> = [1, 2, 3].into();
    /// assert_eq!(set.find(&2).element(&set), Ok(&2));
    /// assert!(set.find(&9).is_end());
    /// ```
    #[must_use]
    pub fn find(&self, element: &T) -> Cursor {
        self.cursor_at(self.find_in(self.root, element))
    }

    /// Returns a cursor at the smallest element that does not order
    /// before the given one, or the end cursor if every element does.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chainset::ordered::AvlSet;
    ///
    /// let set: AvlSet<i32> = [1, 2, -1, 4, 7, 13].into();
    /// assert_eq!(set.lower_bound(&10).element(&set), Ok(&13));
    /// assert_eq!(set.lower_bound(&0).element(&set), Ok(&1));
    /// assert_eq!(set.lower_bound(&1).element(&set), Ok(&1));
    /// assert!(set.lower_bound(&15).is_end());
    /// ```
    #[must_use]
    pub fn lower_bound(&self, element: &T) -> Cursor {
        self.cursor_at(self.lower_bound_in(self.root, element))
    }

    const fn cursor_at(&self, node: Option<NodeId>) -> Cursor {
        match node {
            Some(id) => Cursor::new(self.brand, id),
            None => Cursor::new(self.brand, NodeId::SENTINEL),
        }
    }

    fn find_in(&self, node: Option<NodeId>, element: &T) -> Option<NodeId> {
        let node_id = node?;
        let current = self.arena.node(node_id);
        match self.comparator.compare(element, &current.element) {
            Ordering::Equal => Some(node_id),
            Ordering::Less => self.find_in(current.left, element),
            Ordering::Greater => self.find_in(current.right, element),
        }
    }

    fn lower_bound_in(&self, node: Option<NodeId>, element: &T) -> Option<NodeId> {
        let node_id = node?;
        let current = self.arena.node(node_id);
        match self.comparator.compare(&current.element, element) {
            Ordering::Equal => Some(node_id),
            Ordering::Less => self.lower_bound_in(current.right, element),
            // A hit in the left subtree orders before this node and still
            // not before the query, so it wins without another comparison.
            Ordering::Greater => self.lower_bound_in(current.left, element).or(Some(node_id)),
        }
    }

    fn insert_below(
        &mut self,
        node: Option<NodeId>,
        element: T,
        parent: Option<NodeId>,
    ) -> Result<(NodeId, bool), AllocationError> {
        let Some(node_id) = node else {
            return Ok((self.splice_new(element, parent)?, true));
        };
        match self.comparator.compare(&element, &self.arena.node(node_id).element) {
            Ordering::Equal => Ok((node_id, false)),
            Ordering::Less => {
                let left = self.arena.node(node_id).left;
                let (child, inserted) = self.insert_below(left, element, Some(node_id))?;
                self.arena.node_mut(node_id).left = Some(child);
                Ok((self.rebalance(node_id), inserted))
            }
            Ordering::Greater => {
                let right = self.arena.node(node_id).right;
                let (child, inserted) = self.insert_below(right, element, Some(node_id))?;
                self.arena.node_mut(node_id).right = Some(child);
                Ok((self.rebalance(node_id), inserted))
            }
        }
    }

    /// Allocates a leaf for `element` and splices it into the chain next
    /// to `parent`, which is always its in-order neighbor.
    ///
    /// The slot is reserved before any link is rewritten: a failed
    /// reservation leaves both the tree and the chain untouched.
    fn splice_new(&mut self, element: T, parent: Option<NodeId>) -> Result<NodeId, AllocationError> {
        let (previous, next) = match parent {
            None => (NodeId::SENTINEL, NodeId::SENTINEL),
            Some(parent_id) => {
                let parent_node = self.arena.node(parent_id);
                if self.comparator.compare(&element, &parent_node.element) == Ordering::Less {
                    (parent_node.previous, parent_id)
                } else {
                    (parent_id, parent_node.next)
                }
            }
        };
        let new_id = self.arena.try_allocate(Node::new(element, previous, next))?;
        if previous.is_sentinel() {
            self.minimum = new_id;
        } else {
            self.arena.node_mut(previous).next = new_id;
        }
        if next.is_sentinel() {
            self.maximum = new_id;
        } else {
            self.arena.node_mut(next).previous = new_id;
        }
        Ok(new_id)
    }

    fn remove_below(&mut self, node: Option<NodeId>, element: &T) -> (Option<NodeId>, bool) {
        let Some(node_id) = node else {
            return (None, false);
        };
        match self.comparator.compare(element, &self.arena.node(node_id).element) {
            Ordering::Less => {
                let left = self.arena.node(node_id).left;
                let (child, removed) = self.remove_below(left, element);
                self.arena.node_mut(node_id).left = child;
                (Some(self.rebalance(node_id)), removed)
            }
            Ordering::Greater => {
                let right = self.arena.node(node_id).right;
                let (child, removed) = self.remove_below(right, element);
                self.arena.node_mut(node_id).right = child;
                (Some(self.rebalance(node_id)), removed)
            }
            Ordering::Equal => {
                // Chain first: neighbors are relinked and the extreme
                // markers refreshed before the tree is restructured.
                self.unlink_chain(node_id);
                let node = self.arena.release(node_id);
                let Some(right_id) = node.right else {
                    return (node.left, true);
                };
                let (remainder, successor) = self.detach_minimum(right_id);
                let successor_node = self.arena.node_mut(successor);
                successor_node.left = node.left;
                successor_node.right = remainder;
                (Some(self.rebalance(successor)), true)
            }
        }
    }

    /// Detaches the minimum of the subtree rooted at `node_id`, returning
    /// the rebalanced remainder and the detached node's id.
    fn detach_minimum(&mut self, node_id: NodeId) -> (Option<NodeId>, NodeId) {
        let Some(left_id) = self.arena.node(node_id).left else {
            return (self.arena.node(node_id).right, node_id);
        };
        let (remainder, minimum) = self.detach_minimum(left_id);
        self.arena.node_mut(node_id).left = remainder;
        (Some(self.rebalance(node_id)), minimum)
    }

    /// Relinks the chain neighbors of `node_id` to each other and updates
    /// the minimum/maximum markers when an extreme is removed.
    fn unlink_chain(&mut self, node_id: NodeId) {
        let (previous, next) = {
            let node = self.arena.node(node_id);
            (node.previous, node.next)
        };
        if previous.is_sentinel() {
            self.minimum = next;
        } else {
            self.arena.node_mut(previous).next = next;
        }
        if next.is_sentinel() {
            self.maximum = previous;
        } else {
            self.arena.node_mut(next).previous = previous;
        }
    }

    fn height_of(&self, node: Option<NodeId>) -> u32 {
        node.map_or(0, |id| self.arena.node(id).height)
    }

    fn refresh_height(&mut self, node_id: NodeId) {
        let (left, right) = {
            let node = self.arena.node(node_id);
            (node.left, node.right)
        };
        let height = 1 + self.height_of(left).max(self.height_of(right));
        self.arena.node_mut(node_id).height = height;
    }

    fn balance_factor(&self, node_id: NodeId) -> i64 {
        let node = self.arena.node(node_id);
        i64::from(self.height_of(node.right)) - i64::from(self.height_of(node.left))
    }

    /// Refreshes the cached height of `node_id` and resolves a ±2 balance
    /// factor with the appropriate single or double rotation. Returns the
    /// id now rooting this subtree.
    fn rebalance(&mut self, node_id: NodeId) -> NodeId {
        self.refresh_height(node_id);
        match self.balance_factor(node_id) {
            2 => {
                // a +2 factor implies the right child exists
                let right = self.arena.node(node_id).right.unwrap();
                if self.balance_factor(right) < 0 {
                    let rotated = self.rotate_right(right);
                    self.arena.node_mut(node_id).right = Some(rotated);
                }
                self.rotate_left(node_id)
            }
            -2 => {
                let left = self.arena.node(node_id).left.unwrap();
                if self.balance_factor(left) > 0 {
                    let rotated = self.rotate_left(left);
                    self.arena.node_mut(node_id).left = Some(rotated);
                }
                self.rotate_right(node_id)
            }
            _ => node_id,
        }
    }

    /// Left rotation. The caller guarantees a right child. Chain links are
    /// untouched: the subtree holds the same elements before and after.
    fn rotate_left(&mut self, node_id: NodeId) -> NodeId {
        let pivot = self.arena.node(node_id).right.unwrap();
        let transplanted = self.arena.node(pivot).left;
        self.arena.node_mut(node_id).right = transplanted;
        self.arena.node_mut(pivot).left = Some(node_id);
        self.refresh_height(node_id);
        self.refresh_height(pivot);
        pivot
    }

    /// Right rotation, mirror of [`Self::rotate_left`].
    fn rotate_right(&mut self, node_id: NodeId) -> NodeId {
        let pivot = self.arena.node(node_id).left.unwrap();
        let transplanted = self.arena.node(pivot).right;
        self.arena.node_mut(node_id).left = transplanted;
        self.arena.node_mut(pivot).right = Some(node_id);
        self.refresh_height(node_id);
        self.refresh_height(pivot);
        pivot
    }
}

impl<T> Default for AvlSet<T, NaturalOrder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: std::fmt::Debug, C> std::fmt::Debug for AvlSet<T, C> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Clone, C: Compare<T> + Clone> Clone for AvlSet<T, C> {
    /// Deep copy: an independent node set with the same logical content.
    ///
    /// Cursors taken from the source are never valid against the copy.
    fn clone(&self) -> Self {
        let mut copy = Self::with_comparator(self.comparator.clone());
        for element in self {
            copy.insert(element.clone());
        }
        copy
    }
}

impl<T: Ord> FromIterator<T> for AvlSet<T, NaturalOrder> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T, C: Compare<T>> Extend<T> for AvlSet<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.insert(element);
        }
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for AvlSet<T, NaturalOrder> {
    /// Builds a set from an array, deduplicating equal elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chainset::ordered::AvlSet;
    ///
    /// let set: AvlSet<i32> = [5, 1, 5, 3].into();
    /// assert_eq!(set.len(), 3);
    /// ```
    fn from(elements: [T; N]) -> Self {
        elements.into_iter().collect()
    }
}

impl<'a, T, C> IntoIterator for &'a AvlSet<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, C>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C> IntoIterator for AvlSet<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::from_vec(self.drain_ascending())
    }
}

#[cfg(feature = "serde")]
impl<T: serde::Serialize, C> serde::Serialize for AvlSet<T, C> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
struct AvlSetVisitor<T, C> {
    marker: std::marker::PhantomData<(T, C)>,
}

#[cfg(feature = "serde")]
impl<T, C> AvlSetVisitor<T, C> {
    const fn new() -> Self {
        Self {
            marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, T, C> serde::de::Visitor<'de> for AvlSetVisitor<T, C>
where
    T: serde::Deserialize<'de>,
    C: Compare<T> + Default,
{
    type Value = AvlSet<T, C>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut set = AvlSet::with_comparator(C::default());
        while let Some(element) = seq.next_element()? {
            set.try_insert(element).map_err(serde::de::Error::custom)?;
        }
        Ok(set)
    }
}

#[cfg(feature = "serde")]
impl<'de, T, C> serde::Deserialize<'de> for AvlSet<T, C>
where
    T: serde::Deserialize<'de>,
    C: Compare<T> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(AvlSetVisitor::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// Checks the full representation: AVL balance and cached heights,
    /// BST ordering, chain consistency in both directions, and the cached
    /// element count.
    fn assert_invariants<T: Ord + Clone + std::fmt::Debug>(set: &AvlSet<T>) {
        fn walk<T: Ord + Clone + std::fmt::Debug>(
            set: &AvlSet<T>,
            node: Option<NodeId>,
            in_order: &mut Vec<T>,
        ) -> u32 {
            let Some(id) = node else { return 0 };
            let current = set.arena.node(id);
            let left_height = walk(set, current.left, in_order);
            in_order.push(current.element.clone());
            let right_height = walk(set, current.right, in_order);
            assert!(
                left_height.abs_diff(right_height) <= 1,
                "balance violated at {:?}",
                current.element
            );
            assert_eq!(
                current.height,
                1 + left_height.max(right_height),
                "cached height wrong at {:?}",
                current.element
            );
            1 + left_height.max(right_height)
        }

        let mut in_order = Vec::new();
        walk(set, set.root, &mut in_order);
        assert!(
            in_order.windows(2).all(|pair| pair[0] < pair[1]),
            "in-order traversal is not strictly ascending"
        );
        assert_eq!(in_order.len(), set.len(), "cached count out of sync");

        let mut forward = Vec::new();
        let mut id = set.minimum;
        while !id.is_sentinel() {
            let node = set.arena.node(id);
            forward.push(node.element.clone());
            id = node.next;
        }
        assert_eq!(forward, in_order, "forward chain disagrees with the tree");

        let mut backward = Vec::new();
        let mut id = set.maximum;
        while !id.is_sentinel() {
            let node = set.arena.node(id);
            backward.push(node.element.clone());
            id = node.previous;
        }
        backward.reverse();
        assert_eq!(backward, in_order, "backward chain disagrees with the tree");
    }

    #[rstest]
    fn empty_set_has_consistent_markers() {
        let set: AvlSet<i32> = AvlSet::new();
        assert!(set.is_empty());
        assert_eq!(set.first(), None);
        assert_eq!(set.last(), None);
        assert_invariants(&set);
    }

    #[rstest]
    fn ascending_insertions_stay_balanced() {
        let mut set = AvlSet::new();
        for value in 0..64 {
            assert!(set.insert(value));
            assert_invariants(&set);
        }
        assert_eq!(set.len(), 64);
    }

    #[rstest]
    fn descending_insertions_stay_balanced() {
        let mut set = AvlSet::new();
        for value in (0..64).rev() {
            assert!(set.insert(value));
            assert_invariants(&set);
        }
        assert_eq!(set.first(), Some(&0));
        assert_eq!(set.last(), Some(&63));
    }

    #[rstest]
    fn zigzag_insertions_exercise_double_rotations() {
        let mut set = AvlSet::new();
        // right-left and left-right cases
        for value in [10, 30, 20, 50, 40, 5, 1, 3] {
            set.insert(value);
            assert_invariants(&set);
        }
        let ascending: Vec<i32> = set.iter().copied().collect();
        assert_eq!(ascending, vec![1, 3, 5, 10, 20, 30, 40, 50]);
    }

    #[rstest]
    fn removal_of_every_shape_keeps_invariants() {
        let mut set: AvlSet<i32> = (0..32).collect();
        // leaf, single-child and two-children victims, extremes included
        for value in [31, 0, 16, 8, 24, 1, 30, 15, 17] {
            assert!(set.remove(&value));
            assert_invariants(&set);
        }
        assert_eq!(set.len(), 32 - 9);
    }

    #[rstest]
    fn remove_root_with_two_children_promotes_successor() {
        let mut set: AvlSet<i32> = [20, 10, 30, 25, 35].into();
        assert!(set.remove(&20));
        assert_invariants(&set);
        let ascending: Vec<i32> = set.iter().copied().collect();
        assert_eq!(ascending, vec![10, 25, 30, 35]);
    }

    #[rstest]
    fn pseudo_random_operations_match_model() {
        let mut set = AvlSet::new();
        let mut model = std::collections::BTreeSet::new();
        let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
        for step in 0..2000_u32 {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            let value = ((state >> 33) % 128) as i32;
            if step % 3 == 2 {
                assert_eq!(set.remove(&value), model.remove(&value));
            } else {
                assert_eq!(set.insert(value), model.insert(value));
            }
            if step % 64 == 0 {
                assert_invariants(&set);
            }
        }
        assert_invariants(&set);
        assert!(set.iter().eq(model.iter()));
    }

    #[rstest]
    fn clear_resets_to_a_usable_empty_set() {
        let mut set: AvlSet<i32> = (0..10).collect();
        set.clear();
        assert!(set.is_empty());
        assert_invariants(&set);

        set.insert(5);
        assert_eq!(set.len(), 1);
        assert_invariants(&set);
    }

    #[rstest]
    fn clone_is_independent() {
        let mut original: AvlSet<i32> = [1, 2, 3].into();
        let copy = original.clone();

        original.remove(&2);
        assert!(!original.contains(&2));
        assert!(copy.contains(&2));
        assert_invariants(&copy);
    }

    #[rstest]
    fn extend_and_from_array_deduplicate() {
        let mut set: AvlSet<i32> = [5, 1, 5, 3].into();
        set.extend([3, 4, 4, 2]);
        let ascending: Vec<i32> = set.iter().copied().collect();
        assert_eq!(ascending, vec![1, 2, 3, 4, 5]);
    }

    #[rstest]
    fn into_iterator_drains_in_ascending_order() {
        let set: AvlSet<i32> = [3, 1, 2].into();
        let drained: Vec<i32> = set.into_iter().collect();
        assert_eq!(drained, vec![1, 2, 3]);
    }

    #[rstest]
    fn debug_formats_as_a_set() {
        let set: AvlSet<i32> = [2, 1].into();
        assert_eq!(format!("{set:?}"), "{1, 2}");
    }

    #[cfg(feature = "serde")]
    mod serde_tests {
        use super::*;

        #[rstest]
        fn serializes_in_ascending_order() {
            let set: AvlSet<i32> = [3, 1, 2].into();
            let json = serde_json::to_string(&set).unwrap();
            assert_eq!(json, "[1,2,3]");
        }

        #[rstest]
        fn deserializes_and_deduplicates() {
            let set: AvlSet<i32> = serde_json::from_str("[3,1,2,3]").unwrap();
            assert_eq!(set.len(), 3);
            assert!(set.contains(&3));
        }
    }
}
