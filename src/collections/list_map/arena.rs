use std::{alloc::Layout, mem, ptr, ptr::NonNull};

use super::Tuning;
use crate::alloc::AllocError;

/// In debug mode or feature unsafe-optim not enabled, same as assert! otherwise does nothing.
#[cfg(any(debug_assertions, not(feature = "unsafe-optim")))]
macro_rules! safe_assert {
    ( $cond: expr ) => {
        assert!($cond)
    };
}

/// In debug mode or feature unsafe-optim not enabled, same as assert! otherwise does nothing.
#[cfg(all(not(debug_assertions), feature = "unsafe-optim"))]
macro_rules! safe_assert {
    ( $cond: expr ) => {
        if !$cond {
            unsafe { std::hint::unreachable_unchecked() }
        }
    };
}

/// Index of a node slot in a [`NodeArena`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(super) struct NodeHandle(usize);

/// A key-value pair linked to the node with the next larger key.
pub(super) struct Node<K, V> {
    pub key: K,
    pub value: V,
    pub next: Option<NodeHandle>,
}

enum Slot<K, V> {
    Full(Node<K, V>),
    /// Vacant slot, holding the next entry of the free list.
    Free(Option<NodeHandle>),
}

/// Contiguous storage for list nodes, addressed by [`NodeHandle`].
///
/// Removed slots go on an intrusive free list and are reused before the
/// arena grows. The arena does not own its allocator: memory is obtained
/// from and returned to the [`Tuning`] passed in by the owning map, so the
/// owner must call [`NodeArena::dealloc`] before the arena is dropped.
pub(super) struct NodeArena<K, V> {
    p: NonNull<Slot<K, V>>,
    /// Slots `0..init` have been written.
    init: usize,
    /// Slots allocated.
    alloc: usize,
    /// Slots holding a node.
    count: usize,
    free: Option<NodeHandle>,
}

unsafe impl<K: Send, V: Send> Send for NodeArena<K, V> {}
unsafe impl<K: Sync, V: Sync> Sync for NodeArena<K, V> {}

impl<K, V> NodeArena<K, V> {
    pub const fn new() -> Self {
        Self {
            p: NonNull::dangling(),
            init: 0,
            alloc: 0,
            count: 0,
            free: None,
        }
    }

    /// Number of nodes stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Number of slots allocated.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.alloc
    }

    /// Make sure `additional` nodes can be inserted without allocating.
    ///
    /// On failure the arena is unchanged.
    pub fn reserve<A: Tuning>(&mut self, additional: usize, atune: &A) -> Result<(), AllocError> {
        if self.alloc - self.count >= additional {
            return Ok(());
        }
        let need = self.count.checked_add(additional).ok_or(AllocError)?;
        let na = atune.full_action(self.alloc).max(need);
        self.set_alloc(na, atune)
    }

    fn set_alloc<A: Tuning>(&mut self, na: usize, atune: &A) -> Result<(), AllocError> {
        safe_assert!(na > self.alloc);
        let new_layout = Layout::array::<Slot<K, V>>(na).map_err(|_| AllocError)?;
        let new_ptr = if self.alloc == 0 {
            atune.allocate(new_layout)?
        } else {
            let old_layout = Layout::array::<Slot<K, V>>(self.alloc).map_err(|_| AllocError)?;
            // Slots are moved bitwise; nothing refers to them by address.
            unsafe { atune.grow(self.p.cast::<u8>(), old_layout, new_layout)? }
        };
        #[cfg(feature = "log")]
        log::trace!("node arena grown from {} to {} slots", self.alloc, na);
        self.p = new_ptr.cast::<Slot<K, V>>();
        self.alloc = na;
        Ok(())
    }

    #[inline]
    fn ix(&self, i: usize) -> *mut Slot<K, V> {
        safe_assert!(i < self.init);
        unsafe { self.p.as_ptr().add(i) }
    }

    /// Store a node and return its handle. A slot must have been reserved.
    pub fn insert(&mut self, node: Node<K, V>) -> NodeHandle {
        let h = match self.free {
            Some(h) => {
                let slot = unsafe { &mut *self.ix(h.0) };
                match mem::replace(slot, Slot::Full(node)) {
                    Slot::Free(next) => self.free = next,
                    Slot::Full(_) => unreachable!("free list refers to an occupied slot"),
                }
                h
            }
            None => {
                safe_assert!(self.init < self.alloc);
                let h = NodeHandle(self.init);
                unsafe {
                    ptr::write(self.p.as_ptr().add(self.init), Slot::Full(node));
                }
                self.init += 1;
                h
            }
        };
        self.count += 1;
        h
    }

    /// Take the node out of its slot, putting the slot on the free list.
    pub fn remove(&mut self, h: NodeHandle) -> Node<K, V> {
        let slot = unsafe { &mut *self.ix(h.0) };
        match mem::replace(slot, Slot::Free(self.free)) {
            Slot::Full(node) => {
                self.free = Some(h);
                self.count -= 1;
                node
            }
            Slot::Free(_) => unreachable!("node handle refers to a vacant slot"),
        }
    }

    #[inline]
    pub fn node(&self, h: NodeHandle) -> &Node<K, V> {
        match unsafe { &*self.ix(h.0) } {
            Slot::Full(node) => node,
            Slot::Free(_) => unreachable!("node handle refers to a vacant slot"),
        }
    }

    #[inline]
    pub fn node_mut(&mut self, h: NodeHandle) -> &mut Node<K, V> {
        match unsafe { &mut *self.ix(h.0) } {
            Slot::Full(node) => node,
            Slot::Free(_) => unreachable!("node handle refers to a vacant slot"),
        }
    }

    /// Drop any remaining nodes and release the slot memory.
    pub fn dealloc<A: Tuning>(&mut self, atune: &A) {
        let init = mem::replace(&mut self.init, 0);
        self.count = 0;
        self.free = None;
        for i in 0..init {
            unsafe {
                ptr::drop_in_place(self.p.as_ptr().add(i));
            }
        }
        if self.alloc != 0 {
            if let Ok(layout) = Layout::array::<Slot<K, V>>(self.alloc) {
                unsafe {
                    atune.deallocate(self.p.cast::<u8>(), layout);
                }
            }
        }
        self.alloc = 0;
        self.p = NonNull::dangling();
    }
}
