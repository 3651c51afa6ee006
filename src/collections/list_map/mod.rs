//! [`ListMap`], an ordered map kept as a sorted singly linked list.
//!
//! Every lookup, insertion and removal walks the list from the smallest key,
//! so operations are O(n). In exchange the map is small, its behaviour under
//! allocation failure is exact, and it carries an internal cursor for
//! first/next traversal that needs no borrowed iterator.
//!
//! # Example
//!
//! ```
//!     use listmap::collections::ListMap;
//!     let mut mymap = ListMap::new();
//!     mymap.put(&"France", &"Paris").unwrap();
//!     mymap.put(&"England", &"London").unwrap();
//!     assert_eq!(mymap.first_key(), Some("England"));
//!     assert_eq!(mymap.next_key(), Some("France"));
//!     assert_eq!(mymap.next_key(), None);
//!     println!("The capital of France is {}", mymap["France"]);
//! ```
//!
//!# Features
//!
//! This crate supports the following cargo features:
//! - `serde` : enables serialisation of [`ListMap`] via serde crate.
//! - `unsafe-optim` : skips internal consistency checks in release builds.
//! - `log` : reports refused allocations and arena growth via the log crate.

use std::{
    alloc::Layout,
    borrow::Borrow,
    cell::Cell,
    cmp::Ordering,
    fmt,
    fmt::Debug,
    iter::FusedIterator,
    ptr::NonNull,
};

use crate::alloc::{AllocError, Allocator, Global};
use crate::collections::MapError;

mod arena;
use arena::{Node, NodeArena, NodeHandle};

/// Ordered map stored as a singly linked list of nodes sorted by key.
///
/// Nodes live in an arena obtained from the map's [`Tuning`], which is also
/// its [`Allocator`]. Every operation that needs a new node reserves it
/// before touching the list, so a refused allocation leaves the map exactly
/// as it was.
///
/// # Cursor
///
/// The map holds a single hidden cursor driven by [`first_key`] and
/// [`next_key`] (or [`cursor_next`]). Starting a traversal discards any
/// other, and [`len`], [`contains_key`], [`put`], [`insert`], [`remove`],
/// [`pop_first`], [`clear`], [`try_reserve`] and [`try_clone`] cancel it.
/// [`get`] and the borrowing iterators ([`iter`], [`keys`], [`values`]) leave
/// it alone, and any number of those may be alive at once.
///
/// [`first_key`]: ListMap::first_key
/// [`next_key`]: ListMap::next_key
/// [`cursor_next`]: ListMap::cursor_next
/// [`len`]: ListMap::len
/// [`contains_key`]: ListMap::contains_key
/// [`put`]: ListMap::put
/// [`insert`]: ListMap::insert
/// [`remove`]: ListMap::remove
/// [`pop_first`]: ListMap::pop_first
/// [`clear`]: ListMap::clear
/// [`try_reserve`]: ListMap::try_reserve
/// [`try_clone`]: ListMap::try_clone
/// [`get`]: ListMap::get
/// [`iter`]: ListMap::iter
/// [`keys`]: ListMap::keys
/// [`values`]: ListMap::values
pub struct ListMap<K, V, A: Tuning = DefaultTuning> {
    head: Option<NodeHandle>,
    nodes: NodeArena<K, V>,
    cursor: Cell<Option<NodeHandle>>,
    atune: A,
}
impl<K, V> Default for ListMap<K, V> {
    /// Creates an empty ListMap.
    fn default() -> Self {
        Self::new()
    }
}
impl<K, V, A: Tuning> Drop for ListMap<K, V, A> {
    fn drop(&mut self) {
        self.clear();
    }
}
impl<K: Clone, V: Clone, A: Tuning> Clone for ListMap<K, V, A> {
    /// # Panics
    ///
    /// Panics if the tuning's allocator refuses the node storage.
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(map) => map,
            Err(e) => panic!("ListMap clone failed: {e}"),
        }
    }
}

impl<K, V> ListMap<K, V> {
    /// Returns a new, empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::with_tuning(CustomTuning::default())
    }

    /// Returns a new, empty map with specified allocator.
    ///
    /// # Example
    ///
    /// ```
    /// use listmap::{ alloc::Global, collections::list_map::ListMap };
    /// let a = Global {};
    /// let mut map = ListMap::new_in(a);
    /// map.put(&"England", &"London").unwrap();
    /// ```
    #[must_use]
    pub fn new_in<AL>(a: AL) -> ListMap<K, V, CustomTuning<AL>>
    where
        AL: Allocator + Clone,
    {
        ListMap::with_tuning(CustomTuning::new_in(DEFAULT_ALLOC_UNIT, a))
    }
}

/// Outcome of walking the list for a key.
enum Search {
    /// The key is held by `node`, whose predecessor is `prev`.
    Found {
        node: NodeHandle,
        prev: Option<NodeHandle>,
    },
    /// The key belongs straight after `prev` (or at the head if `None`).
    Vacant { prev: Option<NodeHandle> },
}

impl<K, V, A: Tuning> ListMap<K, V, A> {
    /// Returns a new, empty map with specified allocation tuning.
    ///
    /// # Example
    ///
    /// ```
    ///     use listmap::collections::list_map::{ListMap,DefaultTuning};
    ///     let mut mymap = ListMap::with_tuning(DefaultTuning::new(4));
    ///     mymap.put(&"England", &"London").unwrap();
    ///     assert_eq!(mymap.capacity(), 4);
    /// ```
    #[must_use]
    pub fn with_tuning(atune: A) -> Self {
        Self {
            head: None,
            nodes: NodeArena::new(),
            cursor: Cell::new(None),
            atune,
        }
    }

    /// Get a cloned copy of the tuning.
    pub fn get_tuning(&self) -> A {
        self.atune.clone()
    }

    /// Get number of key-value pairs in the map. Cancels any cursor traversal.
    pub fn len(&self) -> usize {
        self.cursor.set(None);
        self.nodes.len()
    }

    /// Is the map empty? Cancels any cursor traversal.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of nodes the map can hold before it next allocates.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Make sure at least `additional` more keys can be inserted without
    /// allocating. Cancels any cursor traversal.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), MapError> {
        self.cursor.set(None);
        self.nodes.reserve(additional, &self.atune)?;
        Ok(())
    }

    /// Remove all key-value pairs, smallest key first, and release the node
    /// storage. The map can be used again afterwards.
    pub fn clear(&mut self) {
        #[cfg(feature = "log")]
        log::trace!("clearing ListMap of {} nodes", self.nodes.len());
        self.cursor.set(None);
        while let Some(h) = self.head {
            self.head = self.nodes.remove(h).next;
        }
        self.nodes.dealloc(&self.atune);
    }

    /// Does the map have an entry for the specified key.
    /// Cancels any cursor traversal.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.cursor.set(None);
        matches!(self.search(key), Search::Found { .. })
    }

    /// Get reference to the value corresponding to the key.
    ///
    /// Unlike most operations this leaves the cursor where it is.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get_key_value(key).map(|(_k, v)| v)
    }

    /// Get a mutable reference to the value corresponding to the key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.search(key) {
            Search::Found { node, .. } => Some(&mut self.nodes.node_mut(node).value),
            Search::Vacant { .. } => None,
        }
    }

    /// Get references to the corresponding key and value.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.search(key) {
            Search::Found { node, .. } => {
                let n = self.nodes.node(node);
                Some((&n.key, &n.value))
            }
            Search::Vacant { .. } => None,
        }
    }

    /// Get references to first key and value.
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.iter().next()
    }

    /// Insert copies of key and value, or if key is already in map, replace
    /// the value with a copy of `value`.
    ///
    /// The copies are made before the map is modified, so if a `clone`
    /// panics or no node can be allocated the map is unchanged.
    /// Cancels any cursor traversal.
    pub fn put(&mut self, key: &K, value: &V) -> Result<(), MapError>
    where
        K: Ord + Clone,
        V: Clone,
    {
        self.cursor.set(None);
        match self.search(key) {
            Search::Found { node, .. } => {
                let value = value.clone();
                self.nodes.node_mut(node).value = value;
            }
            Search::Vacant { prev } => {
                let value = value.clone();
                let key = key.clone();
                self.link(prev, key, value)?;
            }
        }
        Ok(())
    }

    /// Insert key-value pair into map, or if key is already in map, replaces
    /// value and returns old value. Cancels any cursor traversal.
    ///
    /// On error the key and value are dropped and the map is unchanged.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, MapError>
    where
        K: Ord,
    {
        self.cursor.set(None);
        match self.search(&key) {
            Search::Found { node, .. } => Ok(Some(std::mem::replace(
                &mut self.nodes.node_mut(node).value,
                value,
            ))),
            Search::Vacant { prev } => {
                self.link(prev, key, value)?;
                Ok(None)
            }
        }
    }

    /// Remove key-value pair from map, returning the value.
    /// Cancels any cursor traversal.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<V, MapError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.cursor.set(None);
        match self.search(key) {
            Search::Found { node, prev } => {
                let removed = self.nodes.remove(node);
                match prev {
                    Some(p) => self.nodes.node_mut(p).next = removed.next,
                    None => self.head = removed.next,
                }
                Ok(removed.value)
            }
            Search::Vacant { .. } => Err(MapError::ItemDoesNotExist),
        }
    }

    /// Remove first key-value pair from map. Cancels any cursor traversal.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.cursor.set(None);
        let h = self.head?;
        let node = self.nodes.remove(h);
        self.head = node.next;
        Some((node.key, node.value))
    }

    /// Start a cursor traversal, returning a copy of the smallest key.
    ///
    /// Any traversal already in progress is discarded. Returns `None` and
    /// leaves no traversal in progress if the map is empty.
    pub fn first_key(&self) -> Option<K>
    where
        K: Clone,
    {
        self.cursor.set(self.head);
        self.head.map(|h| self.nodes.node(h).key.clone())
    }

    /// Advance the cursor, returning a copy of the next key.
    ///
    /// Returns `Ok(None)` when the traversal passes the last key, after which
    /// no traversal is in progress.
    ///
    /// # Errors
    ///
    /// [`MapError::InvalidState`] if no traversal is in progress.
    pub fn cursor_next(&self) -> Result<Option<K>, MapError>
    where
        K: Clone,
    {
        let at = self.cursor.get().ok_or(MapError::InvalidState)?;
        let next = self.nodes.node(at).next;
        self.cursor.set(next);
        Ok(next.map(|h| self.nodes.node(h).key.clone()))
    }

    /// Advance the cursor, returning a copy of the next key, or `None` if
    /// the traversal is finished or was never started.
    pub fn next_key(&self) -> Option<K>
    where
        K: Clone,
    {
        self.cursor_next().ok().flatten()
    }

    /// Make an independent deep copy of the map with the same tuning.
    ///
    /// Node storage for the whole copy is reserved first. If that fails the
    /// source is untouched and [`MapError::OutOfMemory`] is returned.
    /// Cancels any cursor traversal on the source.
    pub fn try_clone(&self) -> Result<Self, MapError>
    where
        K: Clone,
        V: Clone,
    {
        self.cursor.set(None);
        let mut map = Self::with_tuning(self.atune.clone());
        if let Err(e) = map.nodes.reserve(self.nodes.len(), &map.atune) {
            #[cfg(feature = "log")]
            log::debug!("no memory to copy ListMap of {} nodes", self.nodes.len());
            return Err(e.into());
        }
        let mut tail = None;
        for (k, v) in self.iter() {
            tail = Some(map.link(tail, k.clone(), v.clone())?);
        }
        Ok(map)
    }

    /// Get iterator of references to key-value pairs, in ascending key order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: &self.nodes,
            at: self.head,
            len: self.nodes.len(),
        }
    }

    /// Get iterator of references to keys.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys(self.iter())
    }

    /// Get iterator of references to values.
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V> {
        Values(self.iter())
    }

    /// Get consuming iterator that returns all the keys, in sorted order.
    #[must_use]
    pub fn into_keys(self) -> IntoKeys<K, V, A> {
        IntoKeys(self.into_iter())
    }

    /// Get consuming iterator that returns all the values, in key order.
    #[must_use]
    pub fn into_values(self) -> IntoValues<K, V, A> {
        IntoValues(self.into_iter())
    }

    fn search<Q>(&self, key: &Q) -> Search
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut prev = None;
        let mut at = self.head;
        while let Some(h) = at {
            let node = self.nodes.node(h);
            match key.cmp(node.key.borrow()) {
                Ordering::Greater => {
                    prev = at;
                    at = node.next;
                }
                Ordering::Equal => return Search::Found { node: h, prev },
                Ordering::Less => break,
            }
        }
        Search::Vacant { prev }
    }

    /// Store a new node straight after `prev`, or at the head if `prev` is `None`.
    fn link(&mut self, prev: Option<NodeHandle>, key: K, value: V) -> Result<NodeHandle, MapError> {
        if let Err(e) = self.nodes.reserve(1, &self.atune) {
            #[cfg(feature = "log")]
            log::debug!("no memory for node {} of ListMap", self.nodes.len() + 1);
            return Err(e.into());
        }
        let next = match prev {
            Some(p) => self.nodes.node(p).next,
            None => self.head,
        };
        let h = self.nodes.insert(Node { key, value, next });
        match prev {
            Some(p) => self.nodes.node_mut(p).next = Some(h),
            None => self.head = Some(h),
        }
        Ok(h)
    }

    #[cfg(test)]
    pub(crate) fn check(&self)
    where
        K: Ord,
    {
        let mut n = 0;
        let mut prev: Option<&K> = None;
        for (k, _) in self.iter() {
            if let Some(p) = prev {
                assert!(p < k, "keys out of order");
            }
            prev = Some(k);
            n += 1;
        }
        assert_eq!(n, self.nodes.len());
    }
} // End impl ListMap

impl<K: PartialEq, V: PartialEq, A: Tuning> PartialEq for ListMap<K, V, A> {
    fn eq(&self, other: &ListMap<K, V, A>) -> bool {
        self.nodes.len() == other.nodes.len() && self.iter().eq(other.iter())
    }
}
impl<K: Eq, V: Eq, A: Tuning> Eq for ListMap<K, V, A> {}

impl<K, V, A: Tuning> IntoIterator for ListMap<K, V, A> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, A>;

    /// Convert ListMap to Iterator.
    fn into_iter(self) -> IntoIter<K, V, A> {
        IntoIter { map: self }
    }
}

impl<'a, K, V, A: Tuning> IntoIterator for &'a ListMap<K, V, A> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for ListMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> ListMap<K, V> {
        let mut map = ListMap::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for ListMap<K, V> {
    fn from(arr: [(K, V); N]) -> ListMap<K, V> {
        let mut map = ListMap::new();
        map.extend(arr);
        map
    }
}

impl<K: Ord, V, A: Tuning> Extend<(K, V)> for ListMap<K, V, A> {
    /// # Panics
    ///
    /// Panics if a node cannot be allocated.
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            if let Err(e) = self.insert(k, v) {
                panic!("ListMap extend failed: {e}");
            }
        }
    }
}

impl<'a, K: Ord + Clone, V: Clone, A: Tuning> Extend<(&'a K, &'a V)> for ListMap<K, V, A> {
    /// # Panics
    ///
    /// Panics if a node cannot be allocated.
    fn extend<I: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            if let Err(e) = self.put(k, v) {
                panic!("ListMap extend failed: {e}");
            }
        }
    }
}

impl<K, Q, V, A: Tuning> std::ops::Index<&Q> for ListMap<K, V, A>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the `ListMap`.
    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Some(v) => v,
            None => panic!("no entry found for key"),
        }
    }
}

impl<K: Debug, V: Debug, A: Tuning> Debug for ListMap<K, V, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(feature = "serde")]
use serde::{
    de::{Error as _, MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

#[cfg(feature = "serde")]
use std::marker::PhantomData;

#[cfg(feature = "serde")]
impl<K: Serialize, V: Serialize, A: Tuning> Serialize for ListMap<K, V, A> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.nodes.len()))?;
        for (k, v) in self {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Most node slots reserved up front from a serialized length.
#[cfg(feature = "serde")]
const MAX_HINT_RESERVE: usize = 4096;

#[cfg(feature = "serde")]
struct ListMapVisitor<K, V> {
    marker: PhantomData<fn() -> ListMap<K, V>>,
}

#[cfg(feature = "serde")]
impl<K, V> ListMapVisitor<K, V> {
    fn new() -> Self {
        ListMapVisitor {
            marker: PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> Visitor<'de> for ListMapVisitor<K, V>
where
    K: Deserialize<'de> + Ord,
    V: Deserialize<'de>,
{
    type Value = ListMap<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("ListMap")
    }

    fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut map = ListMap::new();
        // The length comes from the input, so it only sizes the first block.
        if let Some(n) = access.size_hint() {
            map.try_reserve(n.min(MAX_HINT_RESERVE))
                .map_err(M::Error::custom)?;
        }
        // Serialized maps arrive in ascending order, so append at the tail
        // until a key turns up out of order.
        let mut tail: Option<NodeHandle> = None;
        while let Some((k, v)) = access.next_entry()? {
            if let Some(t) = tail {
                if map.nodes.node(t).key >= k {
                    map.insert(k, v).map_err(M::Error::custom)?;
                    break;
                }
            }
            tail = Some(map.link(tail, k, v).map_err(M::Error::custom)?);
        }
        while let Some((k, v)) = access.next_entry()? {
            map.insert(k, v).map_err(M::Error::custom)?;
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> Deserialize<'de> for ListMap<K, V>
where
    K: Deserialize<'de> + Ord,
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(ListMapVisitor::new())
    }
}

/// Allocation unit used by [`ListMap::new`] and [`ListMap::new_in`].
const DEFAULT_ALLOC_UNIT: u16 = 8;

/// Trait for controlling node storage allocation for [ListMap].
pub trait Tuning: Clone + Allocator {
    /// Returns the number of node slots to allocate when all `alloc` slots
    /// currently allocated are in use. Must be greater than `alloc`.
    fn full_action(&self, alloc: usize) -> usize;
}

/// Default allocation tuning.
pub type DefaultTuning = CustomTuning<Global>;

/// Implementation of [Tuning]. Storage starts at the allocation unit and
/// doubles each time it fills. Default allocation unit is 8.
#[derive(Clone)]
pub struct CustomTuning<AL: Allocator + Clone = Global> {
    alloc_unit: u16,
    allocator: AL,
}
impl<AL: Allocator + Clone> CustomTuning<AL> {
    /// Construct with specified allocation unit.
    pub fn new(alloc_unit: u16) -> Self
    where
        AL: Default,
    {
        assert!(alloc_unit > 0);
        Self {
            alloc_unit,
            allocator: AL::default(),
        }
    }

    /// Construct with specified allocation unit and allocator.
    pub fn new_in(alloc_unit: u16, alloc: AL) -> Self {
        assert!(alloc_unit > 0);
        Self {
            alloc_unit,
            allocator: alloc,
        }
    }
}
impl<AL: Allocator + Clone + Default> Default for CustomTuning<AL> {
    fn default() -> Self {
        Self {
            alloc_unit: DEFAULT_ALLOC_UNIT,
            allocator: AL::default(),
        }
    }
}
impl<AL: Allocator + Clone> Tuning for CustomTuning<AL> {
    fn full_action(&self, alloc: usize) -> usize {
        alloc.saturating_add(alloc.max(self.alloc_unit as usize))
    }
}
unsafe impl<AL: Allocator + Clone> Allocator for CustomTuning<AL> {
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        self.allocator.allocate(layout)
    }
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.allocator.deallocate(ptr, layout);
    }
    unsafe fn grow(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<[u8]>, AllocError> {
        self.allocator.grow(ptr, old_layout, new_layout)
    }
}

/// Iterator returned by [`ListMap::iter`].
#[derive(Clone)]
pub struct Iter<'a, K, V> {
    nodes: &'a NodeArena<K, V>,
    at: Option<NodeHandle>,
    len: usize,
}
impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        let node = nodes.node(self.at?);
        self.at = node.next;
        self.len -= 1;
        Some((&node.key, &node.value))
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}
impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {
    fn len(&self) -> usize {
        self.len
    }
}
impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

/// Consuming iterator for [`ListMap`].
pub struct IntoIter<K, V, A: Tuning = DefaultTuning> {
    map: ListMap<K, V, A>,
}
impl<K, V, A: Tuning> Iterator for IntoIter<K, V, A> {
    type Item = (K, V);
    fn next(&mut self) -> Option<Self::Item> {
        self.map.pop_first()
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.map.nodes.len();
        (len, Some(len))
    }
}
impl<K, V, A: Tuning> ExactSizeIterator for IntoIter<K, V, A> {
    fn len(&self) -> usize {
        self.map.nodes.len()
    }
}
impl<K, V, A: Tuning> FusedIterator for IntoIter<K, V, A> {}

/// Consuming iterator returned by [`ListMap::into_keys`].
pub struct IntoKeys<K, V, A: Tuning = DefaultTuning>(IntoIter<K, V, A>);
impl<K, V, A: Tuning> Iterator for IntoKeys<K, V, A> {
    type Item = K;
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.0.next()?.0)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}
impl<K, V, A: Tuning> ExactSizeIterator for IntoKeys<K, V, A> {
    fn len(&self) -> usize {
        self.0.len()
    }
}
impl<K, V, A: Tuning> FusedIterator for IntoKeys<K, V, A> {}

/// Consuming iterator returned by [`ListMap::into_values`].
pub struct IntoValues<K, V, A: Tuning = DefaultTuning>(IntoIter<K, V, A>);
impl<K, V, A: Tuning> Iterator for IntoValues<K, V, A> {
    type Item = V;
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.0.next()?.1)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}
impl<K, V, A: Tuning> ExactSizeIterator for IntoValues<K, V, A> {
    fn len(&self) -> usize {
        self.0.len()
    }
}
impl<K, V, A: Tuning> FusedIterator for IntoValues<K, V, A> {}

/// Iterator returned by [`ListMap::keys`].
#[derive(Clone)]
pub struct Keys<'a, K, V>(Iter<'a, K, V>);
impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.0.next()?.0)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}
impl<'a, K, V> ExactSizeIterator for Keys<'a, K, V> {
    fn len(&self) -> usize {
        self.0.len()
    }
}
impl<'a, K, V> FusedIterator for Keys<'a, K, V> {}

/// Iterator returned by [`ListMap::values`].
#[derive(Clone)]
pub struct Values<'a, K, V>(Iter<'a, K, V>);
impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.0.next()?.1)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}
impl<'a, K, V> ExactSizeIterator for Values<'a, K, V> {
    fn len(&self) -> usize {
        self.0.len()
    }
}
impl<'a, K, V> FusedIterator for Values<'a, K, V> {}

// Tests.

#[cfg(all(test, not(miri), feature = "cap"))]
#[global_allocator]
static ALLOCATOR: cap::Cap<std::alloc::System> =
    cap::Cap::new(std::alloc::System, usize::max_value());

#[cfg(test)]
fn print_memory() {
    #[cfg(all(test, not(miri), feature = "cap"))]
    println!("Memory allocated: {} bytes", ALLOCATOR.allocated());
}

/* mimalloc cannot be used with miri */
#[cfg(all(test, not(miri), not(feature = "cap")))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;
