//! Error types for set mutation and cursor navigation.
//!
//! This module provides the two failure conditions an [`AvlSet`] can
//! surface: node storage exhaustion during an insert, and access through a
//! cursor whose position is no longer resolvable. Neither condition leaves
//! the set in a partially mutated state.
//!
//! [`AvlSet`]: crate::ordered::AvlSet

use std::collections::TryReserveError;

/// Represents a failure to reserve storage for a new node.
///
/// Insertion reserves space for the node before touching the tree or the
/// order chain, so when this error is returned the set is exactly as it
/// was before the call.
///
/// # Examples
///
/// ```rust
/// use chainset::ordered::AvlSet;
///
/// let mut set = AvlSet::new();
/// // On success the reservation is consumed by the new node.
/// assert_eq!(set.try_insert(1), Ok(true));
/// assert_eq!(set.try_insert(1), Ok(false));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationError {
    source: TryReserveError,
}

impl AllocationError {
    pub(crate) const fn new(source: TryReserveError) -> Self {
        Self { source }
    }
}

impl std::fmt::Display for AllocationError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "node storage could not be reserved: {}",
            self.source
        )
    }
}

impl std::error::Error for AllocationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Represents an access through a cursor that no longer denotes a live
/// element.
///
/// Cursor resolution is checked deterministically: a stale cursor is
/// reported as an error rather than reading retired storage.
///
/// # Examples
///
/// ```rust
/// use chainset::error::InvalidCursorError;
/// use chainset::ordered::AvlSet;
///
/// let mut set: AvlSet<i32> = [1, 2, 3].into();
/// let cursor = set.find(&2);
/// set.remove(&2);
/// assert_eq!(cursor.element(&set), Err(InvalidCursorError::Retired));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidCursorError {
    /// The element the cursor referred to has been erased.
    Retired,
    /// The cursor belongs to a different set instance. Cursors taken from
    /// a source set are never valid against its copies.
    ForeignSet,
    /// The cursor denotes the end position, which holds no element.
    EndPosition,
}

impl std::fmt::Display for InvalidCursorError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Retired => write!(formatter, "cursor refers to an erased element"),
            Self::ForeignSet => write!(formatter, "cursor belongs to a different set"),
            Self::EndPosition => write!(formatter, "cursor is at the end position"),
        }
    }
}

impl std::error::Error for InvalidCursorError {}

/// Represents errors that can occur when working with an ordered set.
///
/// This enum provides a unified error type over the two failure kinds.
/// Operations report the specific kind at their own signatures; `SetError`
/// exists for callers that funnel both through one channel.
///
/// # Examples
///
/// ```rust
/// use chainset::error::{InvalidCursorError, SetError};
///
/// let error = SetError::from(InvalidCursorError::Retired);
/// assert_eq!(
///     format!("{}", error),
///     "cursor refers to an erased element"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetError {
    /// Node storage could not be reserved.
    Allocation(AllocationError),
    /// A cursor failed to resolve to a live element.
    Cursor(InvalidCursorError),
}

impl std::fmt::Display for SetError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Allocation(error) => write!(formatter, "{error}"),
            Self::Cursor(error) => write!(formatter, "{error}"),
        }
    }
}

impl std::error::Error for SetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Allocation(error) => Some(error),
            Self::Cursor(error) => Some(error),
        }
    }
}

impl From<AllocationError> for SetError {
    fn from(error: AllocationError) -> Self {
        Self::Allocation(error)
    }
}

impl From<InvalidCursorError> for SetError {
    fn from(error: InvalidCursorError) -> Self {
        Self::Cursor(error)
    }
}
