//! Set algebra over the ordered-set capability.
//!
//! Every algorithm in this module consumes only the [`OrderedSet`]
//! contract (a size, a membership test and ascending iteration), so two
//! operands never need to share a concrete representation, a comparator
//! type, or a balance shape. The constructive operations exist in two
//! forms: typed methods on [`AvlSet`] returning a set of the same
//! configuration, and erased functions over `dyn OrderedSet` returning a
//! newly allocated set of unspecified concrete type.

use std::cmp::Ordering;
use std::ops::{BitAnd, BitOr, Sub};

use super::avl_set::AvlSet;
use super::compare::Compare;

/// The capability shared by every set the algebra can operate on.
///
/// Implementations only promise unique elements, a membership test and
/// ascending iteration; nothing about internal representation.
///
/// # Examples
///
/// ```rust
/// use chainset::ordered::{AvlSet, OrderedSet, is_subset};
///
/// let small: AvlSet<i32> = [1, 4].into();
/// let large: AvlSet<i32> = [1, 2, 3, 4].into();
/// let erased: &dyn OrderedSet<i32> = &large;
///
/// assert!(is_subset(&small, erased));
/// ```
pub trait OrderedSet<T> {
    /// Number of elements.
    fn len(&self) -> usize;

    /// Returns `true` if there are no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Membership test.
    fn contains(&self, element: &T) -> bool;

    /// Ascending iteration over the elements.
    fn ascending(&self) -> Box<dyn Iterator<Item = &T> + '_>;
}

impl<T, C: Compare<T>> OrderedSet<T> for AvlSet<T, C> {
    fn len(&self) -> usize {
        Self::len(self)
    }

    fn is_empty(&self) -> bool {
        Self::is_empty(self)
    }

    fn contains(&self, element: &T) -> bool {
        Self::contains(self, element)
    }

    fn ascending(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        Box::new(self.iter())
    }
}

/// Returns `true` if no element of `left` is a member of `right`.
///
/// Disjointness is symmetric, so one membership direction suffices.
///
/// # Examples
///
/// ```rust
/// use chainset::ordered::{AvlSet, is_disjoint};
///
/// let left: AvlSet<i32> = [1, 2, -1, 4, 7, 13].into();
/// let right: AvlSet<i32> = [10, 15, 16, 19, -10, -12].into();
/// assert!(is_disjoint(&left, &right));
/// ```
pub fn is_disjoint<T, Left, Right>(left: &Left, right: &Right) -> bool
where
    Left: OrderedSet<T> + ?Sized,
    Right: OrderedSet<T> + ?Sized,
{
    left.ascending().all(|element| !right.contains(element))
}

/// Returns `true` if every element of `left` is a member of `right`.
pub fn is_subset<T, Left, Right>(left: &Left, right: &Right) -> bool
where
    Left: OrderedSet<T> + ?Sized,
    Right: OrderedSet<T> + ?Sized,
{
    left.ascending().all(|element| right.contains(element))
}

/// Returns `true` if every element of `right` is a member of `left`.
pub fn is_superset<T, Left, Right>(left: &Left, right: &Right) -> bool
where
    Left: OrderedSet<T> + ?Sized,
    Right: OrderedSet<T> + ?Sized,
{
    is_subset(right, left)
}

/// Returns `true` if the two sets hold the same elements.
///
/// Both membership directions are checked, so the operands may disagree
/// about representation and even about how they count.
pub fn is_equal<T, Left, Right>(left: &Left, right: &Right) -> bool
where
    Left: OrderedSet<T> + ?Sized,
    Right: OrderedSet<T> + ?Sized,
{
    is_subset(left, right) && is_subset(right, left)
}

/// Union as an erased operation: a newly allocated set holding every
/// element of both operands.
///
/// # Examples
///
/// ```rust
/// use chainset::ordered::{AvlSet, OrderedSet, union_boxed};
///
/// let left: AvlSet<i32> = [1, 2].into();
/// let right: AvlSet<i32> = [2, 3].into();
/// let union = union_boxed(&left, &right);
/// assert_eq!(union.len(), 3);
/// ```
pub fn union_boxed<T: Clone + Ord + 'static>(
    left: &dyn OrderedSet<T>,
    right: &dyn OrderedSet<T>,
) -> Box<dyn OrderedSet<T>> {
    let mut result: AvlSet<T> = AvlSet::new();
    for element in left.ascending() {
        result.insert(element.clone());
    }
    for element in right.ascending() {
        result.insert(element.clone());
    }
    Box::new(result)
}

/// Intersection as an erased operation: a newly allocated set holding the
/// elements of `left` that are members of `right`.
pub fn intersection_boxed<T: Clone + Ord + 'static>(
    left: &dyn OrderedSet<T>,
    right: &dyn OrderedSet<T>,
) -> Box<dyn OrderedSet<T>> {
    let mut result: AvlSet<T> = AvlSet::new();
    for element in left.ascending() {
        if right.contains(element) {
            result.insert(element.clone());
        }
    }
    Box::new(result)
}

/// Difference as an erased operation: a copy of `left` with every element
/// of `right` removed. Removal of an absent element is a no-op, so the
/// result equals the filtered form.
pub fn difference_boxed<T: Clone + Ord + 'static>(
    left: &dyn OrderedSet<T>,
    right: &dyn OrderedSet<T>,
) -> Box<dyn OrderedSet<T>> {
    let mut result: AvlSet<T> = AvlSet::new();
    for element in left.ascending() {
        result.insert(element.clone());
    }
    for element in right.ascending() {
        result.remove(element);
    }
    Box::new(result)
}

impl<T, C: Compare<T>> AvlSet<T, C> {
    /// Returns `true` if this set and `other` share no element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chainset::ordered::AvlSet;
    ///
    /// let set: AvlSet<i32> = [1, 2, -1, 4, 7, 13].into();
    /// let other: AvlSet<i32> = [10, 7, 3].into();
    /// assert!(!set.is_disjoint(&other));
    /// ```
    #[must_use]
    pub fn is_disjoint(&self, other: &(impl OrderedSet<T> + ?Sized)) -> bool {
        is_disjoint(self, other)
    }

    /// Returns `true` if every element of this set is a member of `other`.
    #[must_use]
    pub fn is_subset(&self, other: &(impl OrderedSet<T> + ?Sized)) -> bool {
        is_subset(self, other)
    }

    /// Returns `true` if every element of `other` is a member of this set.
    #[must_use]
    pub fn is_superset(&self, other: &(impl OrderedSet<T> + ?Sized)) -> bool {
        is_superset(self, other)
    }

    /// Returns `true` if this set and `other` hold the same elements,
    /// whatever their concrete representations.
    #[must_use]
    pub fn is_equal(&self, other: &(impl OrderedSet<T> + ?Sized)) -> bool {
        is_equal(self, other)
    }
}

impl<T: Clone, C: Compare<T> + Clone> AvlSet<T, C> {
    /// Returns a copy of this set with every element of `other` inserted.
    ///
    /// Duplicates are absorbed by insertion's idempotence.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chainset::ordered::AvlSet;
    ///
    /// let left: AvlSet<i32> = [1, 2].into();
    /// let right: AvlSet<i32> = [2, 3].into();
    /// let union = left.union(&right);
    /// assert_eq!(union.len(), 3);
    /// ```
    #[must_use]
    pub fn union(&self, other: &(impl OrderedSet<T> + ?Sized)) -> Self {
        let mut result = self.clone();
        for element in other.ascending() {
            result.insert(element.clone());
        }
        result
    }

    /// Returns a new set holding the elements of this set that are
    /// members of `other`.
    #[must_use]
    pub fn intersection(&self, other: &(impl OrderedSet<T> + ?Sized)) -> Self {
        let mut result = Self::with_comparator(self.comparator().clone());
        for element in self {
            if other.contains(element) {
                result.insert(element.clone());
            }
        }
        result
    }

    /// Returns a new set holding the elements of this set that are not
    /// members of `other`.
    #[must_use]
    pub fn difference(&self, other: &(impl OrderedSet<T> + ?Sized)) -> Self {
        let mut result = Self::with_comparator(self.comparator().clone());
        for element in self {
            if !other.contains(element) {
                result.insert(element.clone());
            }
        }
        result
    }
}

impl<T, C: Compare<T>> PartialEq for AvlSet<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|element| other.contains(element))
    }
}

impl<T, C: Compare<T>> Eq for AvlSet<T, C> {}

impl<T, C: Compare<T>> PartialOrd for AvlSet<T, C> {
    /// The subset lattice: `Less` means proper subset, `Greater` proper
    /// superset, `None` incomparable. `<=` therefore reads "is a subset
    /// of" and `>=` "is a superset of".
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chainset::ordered::AvlSet;
    ///
    /// let small: AvlSet<i32> = [1, 4, 5].into();
    /// let large: AvlSet<i32> = [1, 2, 3, 4, 5].into();
    /// assert!(small <= large);
    /// assert!(large >= small);
    /// assert!(!(large <= small));
    /// ```
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.is_subset(other), other.is_subset(self)) {
            (true, true) => Some(Ordering::Equal),
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            (false, false) => None,
        }
    }
}

impl<T: Clone, C: Compare<T> + Clone> BitOr<&AvlSet<T, C>> for &AvlSet<T, C> {
    type Output = AvlSet<T, C>;

    /// Union, as `&a | &b`.
    fn bitor(self, rhs: &AvlSet<T, C>) -> AvlSet<T, C> {
        self.union(rhs)
    }
}

impl<T: Clone, C: Compare<T> + Clone> BitAnd<&AvlSet<T, C>> for &AvlSet<T, C> {
    type Output = AvlSet<T, C>;

    /// Intersection, as `&a & &b`.
    fn bitand(self, rhs: &AvlSet<T, C>) -> AvlSet<T, C> {
        self.intersection(rhs)
    }
}

impl<T: Clone, C: Compare<T> + Clone> Sub<&AvlSet<T, C>> for &AvlSet<T, C> {
    type Output = AvlSet<T, C>;

    /// Difference, as `&a - &b`.
    fn sub(self, rhs: &AvlSet<T, C>) -> AvlSet<T, C> {
        self.difference(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn predicates_work_across_trait_objects() {
        let concrete: AvlSet<i32> = [1, 2, 3].into();
        let erased: &dyn OrderedSet<i32> = &concrete;

        let other: AvlSet<i32> = [2, 3].into();
        assert!(is_superset(erased, &other));
        assert!(is_subset(&other, erased));
        assert!(!is_disjoint(erased, &other));
        assert!(is_equal(erased, &concrete));
    }

    #[rstest]
    fn boxed_operations_return_working_sets() {
        let left: AvlSet<i32> = [1, 2, 3].into();
        let right: AvlSet<i32> = [3, 4].into();

        let union = union_boxed(&left, &right);
        assert_eq!(union.len(), 4);
        assert!(union.contains(&4));

        let intersection = intersection_boxed(&left, &right);
        assert_eq!(intersection.len(), 1);
        assert!(intersection.contains(&3));

        let difference = difference_boxed(&left, &right);
        assert_eq!(difference.len(), 2);
        assert!(!difference.contains(&3));
    }

    #[rstest]
    fn equality_ignores_insertion_order() {
        let first: AvlSet<i32> = [1, 2, 3].into();
        let second: AvlSet<i32> = [3, 1, 2].into();
        assert_eq!(first, second);
    }

    #[rstest]
    fn incomparable_sets_have_no_order() {
        let left: AvlSet<i32> = [1, 2].into();
        let right: AvlSet<i32> = [2, 3].into();
        assert_eq!(left.partial_cmp(&right), None);
        assert!(!(left <= right));
        assert!(!(left >= right));
    }

    #[rstest]
    fn operators_mirror_the_named_operations() {
        let left: AvlSet<i32> = [1, 2, 3].into();
        let right: AvlSet<i32> = [3, 4].into();

        assert_eq!(&left | &right, [1, 2, 3, 4].into());
        assert_eq!(&left & &right, [3].into());
        assert_eq!(&left - &right, [1, 2].into());
    }
}
