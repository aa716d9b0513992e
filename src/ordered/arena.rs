//! Generational slot arena for tree nodes.
//!
//! Nodes are owned by the arena; the tree's `left`/`right` links and the
//! order chain's `previous`/`next` links are [`NodeId`] values, never
//! owning references. Each slot carries a generation counter that is
//! bumped when the slot is retired, so a [`NodeId`] taken before an erase
//! fails to resolve afterwards instead of reading reused storage.

use crate::error::AllocationError;

/// Identity of one node slot: an index plus the generation the slot had
/// when the node was created.
///
/// The distinguished [`NodeId::SENTINEL`] value denotes the end-of-sequence
/// position. It occupies no slot; the set stores the sentinel's chain
/// neighbors (the current minimum and maximum) directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// The end-of-sequence identity.
    pub(super) const SENTINEL: Self = Self {
        index: u32::MAX,
        generation: u32::MAX,
    };

    /// Returns `true` if this id denotes the end-of-sequence position.
    #[inline]
    pub(super) const fn is_sentinel(self) -> bool {
        self.index == Self::SENTINEL.index && self.generation == Self::SENTINEL.generation
    }
}

static_assertions::assert_eq_size!(NodeId, u64);

/// One element's node: the value, the cached subtree height, the owning
/// subtree links and the non-owning chain links.
#[derive(Debug, Clone)]
pub(super) struct Node<T> {
    pub(super) element: T,
    pub(super) height: u32,
    pub(super) left: Option<NodeId>,
    pub(super) right: Option<NodeId>,
    /// In-order predecessor; [`NodeId::SENTINEL`] when this is the minimum.
    pub(super) previous: NodeId,
    /// In-order successor; [`NodeId::SENTINEL`] when this is the maximum.
    pub(super) next: NodeId,
}

impl<T> Node<T> {
    /// Creates a leaf node already threaded between `previous` and `next`.
    pub(super) const fn new(element: T, previous: NodeId, next: NodeId) -> Self {
        Self {
            element,
            height: 1,
            left: None,
            right: None,
            previous,
            next,
        }
    }
}

#[derive(Debug, Clone)]
enum Entry<T> {
    Occupied(Node<T>),
    Vacant { next_free: Option<u32> },
}

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    entry: Entry<T>,
}

/// Slab of node slots with a free list.
///
/// The live-slot count doubles as the owning set's cached element count,
/// since every element occupies exactly one slot.
#[derive(Debug, Clone)]
pub(super) struct NodeArena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<u32>,
    live: usize,
}

impl<T> NodeArena<T> {
    pub(super) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            live: 0,
        }
    }

    /// Number of live nodes.
    #[inline]
    pub(super) const fn len(&self) -> usize {
        self.live
    }

    /// Stores a node, reserving slot storage before any state changes.
    ///
    /// On reservation failure the arena (and therefore the set) is
    /// unchanged; the caller surfaces the error before touching the tree.
    pub(super) fn try_allocate(&mut self, node: Node<T>) -> Result<NodeId, AllocationError> {
        if let Some(index) = self.free_head {
            let slot = &mut self.slots[index as usize];
            let Entry::Vacant { next_free } = slot.entry else {
                unreachable!("free list points at an occupied slot");
            };
            self.free_head = next_free;
            slot.entry = Entry::Occupied(node);
            self.live += 1;
            return Ok(NodeId {
                index,
                generation: slot.generation,
            });
        }

        self.slots.try_reserve(1).map_err(AllocationError::new)?;
        // index u32::MAX is reserved for the sentinel
        assert!(
            self.slots.len() < u32::MAX as usize,
            "node arena capacity exceeded"
        );
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            entry: Entry::Occupied(node),
        });
        self.live += 1;
        Ok(NodeId {
            index,
            generation: 0,
        })
    }

    /// Retires a slot and returns the evicted node.
    ///
    /// The slot's generation is bumped as part of the same step, so every
    /// outstanding id for the old occupant stops resolving immediately.
    pub(super) fn release(&mut self, id: NodeId) -> Node<T> {
        let slot = &mut self.slots[id.index as usize];
        debug_assert_eq!(slot.generation, id.generation, "release of a stale id");
        slot.generation = slot.generation.wrapping_add(1);
        let entry = std::mem::replace(
            &mut slot.entry,
            Entry::Vacant {
                next_free: self.free_head,
            },
        );
        let Entry::Occupied(node) = entry else {
            unreachable!("release of a vacant slot");
        };
        self.free_head = Some(id.index);
        self.live -= 1;
        node
    }

    /// Retires every live slot, preserving generation history so that
    /// pre-clear ids keep failing to resolve after the storage is reused.
    pub(super) fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if matches!(slot.entry, Entry::Occupied(_)) {
                slot.generation = slot.generation.wrapping_add(1);
                slot.entry = Entry::Vacant {
                    next_free: self.free_head,
                };
                self.free_head = Some(index as u32);
            }
        }
        self.live = 0;
    }

    /// Checked lookup used by the cursor layer: `None` unless `id` still
    /// names a live node of the same generation.
    pub(super) fn resolve(&self, id: NodeId) -> Option<&Node<T>> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        match &slot.entry {
            Entry::Occupied(node) => Some(node),
            Entry::Vacant { .. } => None,
        }
    }

    /// Internal lookup along links maintained by the tree itself.
    #[inline]
    pub(super) fn node(&self, id: NodeId) -> &Node<T> {
        match &self.slots[id.index as usize].entry {
            Entry::Occupied(node) => node,
            Entry::Vacant { .. } => unreachable!("live link resolved to a vacant slot"),
        }
    }

    /// Mutable counterpart of [`Self::node`].
    #[inline]
    pub(super) fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        match &mut self.slots[id.index as usize].entry {
            Entry::Occupied(node) => node,
            Entry::Vacant { .. } => unreachable!("live link resolved to a vacant slot"),
        }
    }
}
