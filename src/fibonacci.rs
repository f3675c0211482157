//! Fibonacci Heap implementation
//!
//! A Fibonacci heap is a data structure for priority queue operations with:
//! - O(1) amortized insert and decrease_key
//! - O(log n) amortized extract_min and delete
//!
//! The structure consists of a collection of heap-ordered trees. Roots are
//! linked in a circular doubly linked list and the heap maintains a pointer
//! to the minimum root. Work is deferred: insert and decrease_key only
//! splice nodes into the root ring, and extract_min pays the bill by
//! consolidating roots until all root degrees are pairwise distinct.
//!
//! Nodes are stored in a [`slotmap`] arena and addressed by generational
//! keys, so a [`NodeHandle`] to a removed node fails cleanly with
//! [`HeapError::InvalidNodeReference`] instead of dangling.

use slotmap::{SecondaryMap, SlotMap};

use crate::error::HeapError;
use crate::node::{Node, NodeKey};
use crate::ring;

/// Handle to an element in a Fibonacci heap
///
/// Returned by [`FibonacciHeap::insert`] and consumed by
/// [`FibonacciHeap::decrease_key`] and [`FibonacciHeap::delete`]. The handle
/// stays valid until the node it names is extracted or deleted; after that,
/// operations on it fail with [`HeapError::InvalidNodeReference`].
///
/// Note: a handle is tied to the heap that minted it. Handles minted by a
/// heap consumed through [`FibonacciHeap::merge`] are invalidated.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeHandle {
    node: NodeKey,
}

/// Fibonacci Heap
///
/// A mergeable min-priority queue over `(key, value)` pairs. Keys are any
/// totally ordered type and may repeat; ties break arbitrarily. Values are
/// carried but never compared.
///
/// # Example
///
/// ```rust
/// use fibheap::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// let handle = heap.insert(5, "item");
/// heap.decrease_key(handle, 1).unwrap();
/// assert_eq!(heap.find_min(), Ok((&1, &"item")));
/// ```
pub struct FibonacciHeap<K: Ord, V> {
    nodes: SlotMap<NodeKey, Node<K, V>>,
    min: Option<NodeKey>,
}

impl<K: Ord, V> Default for FibonacciHeap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> std::fmt::Debug for FibonacciHeap<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FibonacciHeap")
            .field("len", &self.nodes.len())
            .finish()
    }
}

impl<K: Ord, V> FibonacciHeap<K, V> {
    /// Creates a new empty heap
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            min: None,
        }
    }

    /// Creates a new empty heap with room for `capacity` nodes before the
    /// arena reallocates
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: SlotMap::with_capacity_and_key(capacity),
            min: None,
        }
    }

    /// Returns true if the heap is empty
    pub fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    /// Returns the number of elements in the heap
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Inserts an element with the given key, returning a handle
    ///
    /// The handle can be used later with [`decrease_key`](Self::decrease_key)
    /// or [`delete`](Self::delete). Duplicate keys are permitted.
    ///
    /// # Time Complexity
    /// O(1) worst case.
    pub fn insert(&mut self, key: K, value: V) -> NodeHandle {
        let node = self.nodes.insert_with_key(|k| Node {
            key,
            value,
            parent: None,
            child: None,
            left: k,
            right: k,
            degree: 0,
            marked: false,
        });

        match self.min {
            Some(min) => {
                ring::splice_before(&mut self.nodes, min, node);
                if self.nodes[node].key < self.nodes[min].key {
                    self.min = Some(node);
                }
            }
            None => self.min = Some(node),
        }

        NodeHandle { node }
    }

    /// Returns the minimum key and associated value without removing it,
    /// or `None` if the heap is empty
    ///
    /// # Time Complexity
    /// O(1).
    pub fn peek(&self) -> Option<(&K, &V)> {
        self.min.map(|min| {
            let node = &self.nodes[min];
            (&node.key, &node.value)
        })
    }

    /// Returns the minimum key and associated value without removing it
    ///
    /// # Errors
    /// Returns [`HeapError::EmptyHeap`] if the heap is empty.
    ///
    /// # Time Complexity
    /// O(1).
    pub fn find_min(&self) -> Result<(&K, &V), HeapError> {
        self.peek().ok_or(HeapError::EmptyHeap)
    }

    /// Removes and returns the minimum key and associated value, or `None`
    /// if the heap is empty
    ///
    /// # Time Complexity
    /// O(log n) amortized.
    pub fn pop(&mut self) -> Option<(K, V)> {
        let min = self.min?;
        Some(self.remove_root(min))
    }

    /// Removes and returns the minimum key and associated value
    ///
    /// The extracted node's children are promoted to the root ring and the
    /// ring is then consolidated until all root degrees are distinct.
    ///
    /// # Errors
    /// Returns [`HeapError::EmptyHeap`] if the heap is empty.
    ///
    /// # Time Complexity
    /// O(log n) amortized; a single call may link many equal-degree roots,
    /// paid for by the O(1) credit of prior inserts and cuts.
    pub fn extract_min(&mut self) -> Result<(K, V), HeapError> {
        self.pop().ok_or(HeapError::EmptyHeap)
    }

    /// Decreases the key of the element identified by the handle
    ///
    /// If the new key undercuts the parent's key, the node is cut to the
    /// root ring and a cascading cut walks up the ancestor chain, cutting
    /// every already-marked ancestor and marking the first unmarked one.
    ///
    /// # Errors
    /// - [`HeapError::InvalidNodeReference`] if the node was already
    ///   extracted or deleted
    /// - [`HeapError::InvalidKeyOrder`] if `new_key` is greater than the
    ///   current key (a key increase must be modeled as delete + insert)
    ///
    /// A failed call leaves the heap untouched.
    ///
    /// # Time Complexity
    /// O(1) amortized; a single call is bounded by the length of the cut
    /// chain, but each cut either sets one new mark or discharges a
    /// pre-paid one.
    pub fn decrease_key(&mut self, handle: NodeHandle, new_key: K) -> Result<(), HeapError> {
        let x = handle.node;
        let node = self
            .nodes
            .get_mut(x)
            .ok_or(HeapError::InvalidNodeReference)?;
        if new_key > node.key {
            return Err(HeapError::InvalidKeyOrder);
        }

        node.key = new_key;
        if let Some(p) = node.parent {
            if self.nodes[x].key < self.nodes[p].key {
                self.cut(x, p);
                self.cascading_cut(p);
            }
        }

        // The node is a root here unless the heap property still held above
        // it, in which case min cannot have changed.
        if self.nodes[x].parent.is_none() {
            if let Some(min) = self.min {
                if self.nodes[x].key < self.nodes[min].key {
                    self.min = Some(x);
                }
            }
        }
        Ok(())
    }

    /// Deletes the element identified by the handle, returning its key and
    /// value
    ///
    /// Equivalent to decreasing the node's key below every other key and
    /// then extracting the minimum, but operates on node identity directly:
    /// the node is cut to the root ring (with the same cascading cuts a
    /// decrease would trigger) and then removed exactly as `extract_min`
    /// removes the minimum. No other node's relative order is disturbed.
    ///
    /// # Errors
    /// Returns [`HeapError::InvalidNodeReference`] if the node was already
    /// extracted or deleted.
    ///
    /// # Time Complexity
    /// O(log n) amortized, dominated by the induced consolidation.
    pub fn delete(&mut self, handle: NodeHandle) -> Result<(K, V), HeapError> {
        let x = handle.node;
        if !self.nodes.contains_key(x) {
            return Err(HeapError::InvalidNodeReference);
        }
        if let Some(p) = self.nodes[x].parent {
            self.cut(x, p);
            self.cascading_cut(p);
        }
        Ok(self.remove_root(x))
    }

    /// Merges another heap into this one, consuming the other heap
    ///
    /// The other heap's root ring is spliced into this one's and `min` is
    /// updated to the smaller of the two minimums. Because each heap owns
    /// its own node arena, the absorbed nodes are first rehomed into this
    /// heap's arena, which takes O(len) of the absorbed heap; handles minted
    /// by the absorbed heap are invalidated.
    pub fn merge(&mut self, mut other: Self) {
        let Some(other_min) = other.min else {
            return;
        };
        let Some(self_min) = self.min else {
            *self = other;
            return;
        };

        // Rehome the absorbed nodes, then patch every link through the
        // old-key -> new-key map.
        let mut remap: SecondaryMap<NodeKey, NodeKey> = SecondaryMap::new();
        let mut moved = Vec::with_capacity(other.nodes.len());
        for (old, node) in other.nodes.drain() {
            let new = self.nodes.insert(node);
            remap.insert(old, new);
            moved.push(new);
        }
        for &k in &moved {
            let node = &self.nodes[k];
            let (left, right, parent, child) = (node.left, node.right, node.parent, node.child);
            let node = &mut self.nodes[k];
            node.left = remap[left];
            node.right = remap[right];
            node.parent = parent.map(|p| remap[p]);
            node.child = child.map(|c| remap[c]);
        }

        let other_min = remap[other_min];
        ring::concat(&mut self.nodes, self_min, other_min);
        if self.nodes[other_min].key < self.nodes[self_min].key {
            self.min = Some(other_min);
        }
    }

    /// Removes a root node, promoting its children and consolidating
    ///
    /// `x` must be a root. This is the shared back half of `pop` and
    /// `delete`.
    fn remove_root(&mut self, x: NodeKey) -> (K, V) {
        debug_assert!(self.nodes[x].parent.is_none());

        if let Some(child) = self.nodes[x].child {
            for c in ring::members(&self.nodes, child) {
                let node = &mut self.nodes[c];
                node.parent = None;
                node.marked = false;
            }
            self.nodes[x].child = None;
            ring::concat(&mut self.nodes, x, child);
        }

        let survivor = ring::splice_out(&mut self.nodes, x);
        let node = self.nodes.remove(x).expect("root node present in arena");

        match survivor {
            None => self.min = None,
            Some(s) => self.consolidate(s),
        }
        (node.key, node.value)
    }

    /// Consolidates the root ring by linking trees of equal degree until all
    /// root degrees are pairwise distinct, then rebuilds the ring and
    /// recomputes `min`
    fn consolidate(&mut self, start: NodeKey) {
        // Max degree is bounded by log_phi(n); one spare slot absorbs the
        // link that can bump a degree past the running maximum.
        let phi = (1.0 + 5.0_f64.sqrt()) / 2.0;
        let max_degree = (self.nodes.len() as f64).log(phi) as usize + 2;
        let mut degree_table: Vec<Option<NodeKey>> = vec![None; max_degree + 1];

        for root in ring::members(&self.nodes, start) {
            let mut x = root;
            let mut d = self.nodes[x].degree;

            while let Some(mut y) = degree_table[d] {
                // x keeps the smaller key and gains y as a child
                if self.nodes[y].key < self.nodes[x].key {
                    std::mem::swap(&mut x, &mut y);
                }
                self.link(y, x);
                degree_table[d] = None;
                d += 1;
            }
            degree_table[d] = Some(x);
        }

        // Rebuild the root ring from the table and find the new minimum.
        self.min = None;
        for root in degree_table.into_iter().flatten() {
            match self.min {
                None => {
                    ring::make_singleton(&mut self.nodes, root);
                    self.min = Some(root);
                }
                Some(min) => {
                    ring::splice_before(&mut self.nodes, min, root);
                    if self.nodes[root].key < self.nodes[min].key {
                        self.min = Some(root);
                    }
                }
            }
        }
    }

    /// Links root `y` as a new child of root `x`
    ///
    /// `x`'s key must not exceed `y`'s.
    fn link(&mut self, y: NodeKey, x: NodeKey) {
        ring::splice_out(&mut self.nodes, y);
        self.nodes[y].parent = Some(x);
        self.nodes[y].marked = false;

        match self.nodes[x].child {
            Some(child) => ring::splice_before(&mut self.nodes, child, y),
            None => self.nodes[x].child = Some(y),
        }
        self.nodes[x].degree += 1;
    }

    /// Cuts `x` from its parent `p` and splices it into the root ring
    fn cut(&mut self, x: NodeKey, p: NodeKey) {
        let survivor = ring::splice_out(&mut self.nodes, x);
        if self.nodes[p].child == Some(x) {
            self.nodes[p].child = survivor;
        }
        self.nodes[p].degree -= 1;

        self.nodes[x].parent = None;
        self.nodes[x].marked = false;
        match self.min {
            Some(min) => ring::splice_before(&mut self.nodes, min, x),
            // Unreachable in practice: a cut implies a non-empty heap.
            None => self.min = Some(x),
        }
    }

    /// Walks up from `p`, cutting every already-marked ancestor and marking
    /// the first unmarked non-root one
    ///
    /// Iterative rather than recursive, so the chain length is bounded only
    /// by tree height, never by stack depth.
    fn cascading_cut(&mut self, p: NodeKey) {
        let mut current = p;
        while let Some(parent) = self.nodes[current].parent {
            if !self.nodes[current].marked {
                self.nodes[current].marked = true;
                break;
            }
            self.cut(current, parent);
            current = parent;
        }
    }

    /// Verifies the structural invariants of the heap, returning false on
    /// the first violation
    ///
    /// Checked invariants:
    /// - `min` is unset iff the heap is empty, and holds the globally
    ///   smallest key otherwise
    /// - every ring (root ring and every child ring) is a valid circular
    ///   doubly-linked list with `prev` the exact inverse of `next`
    /// - the min-heap property holds in every tree
    /// - `degree` equals the live child ring length for every node
    /// - roots are unmarked and parentless
    /// - every arena node is reachable from the root ring exactly once
    ///
    /// Intended for tests and debugging; runs in O(n).
    pub fn verify_structure(&self) -> bool {
        let Some(min) = self.min else {
            return self.nodes.is_empty();
        };
        if self.nodes.is_empty() || self.nodes[min].parent.is_some() {
            return false;
        }

        let roots = ring::members(&self.nodes, min);
        if !self.verify_ring(&roots) {
            return false;
        }

        let mut reachable = 0usize;
        for &root in &roots {
            let node = &self.nodes[root];
            if node.parent.is_some() || node.marked {
                return false;
            }
            if node.key < self.nodes[min].key {
                return false;
            }
            match self.verify_subtree(root) {
                Some(count) => reachable += count,
                None => return false,
            }
        }
        reachable == self.nodes.len()
    }

    /// Checks that `prev` inverts `next` around a collected ring
    fn verify_ring(&self, ring: &[NodeKey]) -> bool {
        // members() truncates runaway walks at the arena population; a ring
        // that long without closing is corrupt.
        if ring.len() > self.nodes.len() {
            return false;
        }
        for i in 0..ring.len() {
            let prev = ring[if i == 0 { ring.len() - 1 } else { i - 1 }];
            if self.nodes[ring[i]].left != prev {
                return false;
            }
        }
        true
    }

    /// Verifies one tree: heap order, degree counts, parent back-references,
    /// and child ring validity. Returns the node count, or `None` on any
    /// violation.
    fn verify_subtree(&self, root: NodeKey) -> Option<usize> {
        let mut count = 0usize;
        let mut stack = vec![root];
        while let Some(x) = stack.pop() {
            count += 1;
            let node = &self.nodes[x];
            match node.child {
                None => {
                    if node.degree != 0 {
                        return None;
                    }
                }
                Some(child) => {
                    let children = ring::members(&self.nodes, child);
                    if children.len() != node.degree || !self.verify_ring(&children) {
                        return None;
                    }
                    for &c in &children {
                        let child_node = &self.nodes[c];
                        if child_node.parent != Some(x) || child_node.key < node.key {
                            return None;
                        }
                        stack.push(c);
                    }
                }
            }
        }
        Some(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut heap = FibonacciHeap::new();
        assert!(heap.is_empty());
        assert_eq!(heap.len(), 0);

        let _h1 = heap.insert(5, "a");
        let _h2 = heap.insert(3, "b");
        let _h3 = heap.insert(7, "c");

        assert_eq!(heap.len(), 3);
        assert_eq!(heap.find_min(), Ok((&3, &"b")));

        assert_eq!(heap.extract_min(), Ok((3, "b")));
        assert_eq!(heap.find_min(), Ok((&5, &"a")));
    }

    #[test]
    fn test_empty_heap_errors() {
        let mut heap: FibonacciHeap<i32, &str> = FibonacciHeap::new();
        assert_eq!(heap.find_min(), Err(HeapError::EmptyHeap));
        assert_eq!(heap.extract_min(), Err(HeapError::EmptyHeap));
        assert_eq!(heap.peek(), None);
        assert_eq!(heap.pop(), None);
    }

    #[test]
    fn test_decrease_key() {
        let mut heap = FibonacciHeap::new();
        let _h1 = heap.insert(10, "a");
        let h2 = heap.insert(20, "b");
        let h3 = heap.insert(30, "c");

        assert_eq!(heap.find_min(), Ok((&10, &"a")));

        heap.decrease_key(h2, 5).unwrap();
        assert_eq!(heap.find_min(), Ok((&5, &"b")));

        heap.decrease_key(h3, 1).unwrap();
        assert_eq!(heap.find_min(), Ok((&1, &"c")));
    }

    #[test]
    fn test_decrease_key_rejects_increase() {
        let mut heap = FibonacciHeap::new();
        let h = heap.insert(10, "a");
        assert_eq!(heap.decrease_key(h, 11), Err(HeapError::InvalidKeyOrder));
        // Structure untouched
        assert_eq!(heap.find_min(), Ok((&10, &"a")));
        // Equal key is allowed
        assert_eq!(heap.decrease_key(h, 10), Ok(()));
    }

    #[test]
    fn test_stale_handle() {
        let mut heap = FibonacciHeap::new();
        let h = heap.insert(1, "a");
        assert_eq!(heap.extract_min(), Ok((1, "a")));
        assert_eq!(
            heap.decrease_key(h, 0),
            Err(HeapError::InvalidNodeReference)
        );
        assert_eq!(heap.delete(h), Err(HeapError::InvalidNodeReference));
    }

    #[test]
    fn test_delete() {
        let mut heap = FibonacciHeap::new();
        let _h1 = heap.insert(5, "a");
        let h2 = heap.insert(3, "b");
        let _h3 = heap.insert(8, "c");

        assert_eq!(heap.delete(h2), Ok((3, "b")));
        assert_eq!(heap.len(), 2);
        assert_eq!(heap.find_min(), Ok((&5, &"a")));
        // Second delete of the same handle fails
        assert_eq!(heap.delete(h2), Err(HeapError::InvalidNodeReference));
    }

    #[test]
    fn test_merge() {
        let mut heap1 = FibonacciHeap::new();
        heap1.insert(5, "a");
        heap1.insert(10, "b");

        let mut heap2 = FibonacciHeap::new();
        heap2.insert(3, "c");
        heap2.insert(7, "d");

        heap1.merge(heap2);
        assert_eq!(heap1.find_min(), Ok((&3, &"c")));
        assert_eq!(heap1.len(), 4);
        assert!(heap1.verify_structure());
    }

    #[test]
    fn test_merge_with_empty() {
        let mut heap1 = FibonacciHeap::new();
        heap1.insert(5, "a");
        heap1.merge(FibonacciHeap::new());
        assert_eq!(heap1.len(), 1);

        let mut heap2: FibonacciHeap<i32, &str> = FibonacciHeap::new();
        let mut donor = FibonacciHeap::new();
        donor.insert(2, "b");
        heap2.merge(donor);
        assert_eq!(heap2.find_min(), Ok((&2, &"b")));
    }

    #[test]
    fn test_sorted_extraction() {
        let mut heap = FibonacciHeap::new();
        for key in [9, 4, 6, 1, 8, 2, 7, 3, 5, 0] {
            heap.insert(key, key);
        }
        for expected in 0..10 {
            assert_eq!(heap.extract_min(), Ok((expected, expected)));
            assert!(heap.verify_structure());
        }
        assert!(heap.is_empty());
    }

    #[test]
    fn test_duplicate_keys() {
        let mut heap = FibonacciHeap::new();
        heap.insert(1, "first");
        heap.insert(1, "second");
        heap.insert(1, "third");
        assert_eq!(heap.len(), 3);

        let mut values = Vec::new();
        while let Some((key, value)) = heap.pop() {
            assert_eq!(key, 1);
            values.push(value);
        }
        values.sort();
        assert_eq!(values, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_decrease_key_inside_tree() {
        // Consolidate into real trees, then decrease keys of buried nodes so
        // cuts and cascading cuts actually fire.
        let mut heap = FibonacciHeap::new();
        let handles: Vec<_> = (0..64).map(|i| heap.insert(100 + i, i)).collect();
        assert_eq!(heap.extract_min(), Ok((100, 0)));

        for (i, &h) in handles.iter().enumerate().skip(1).rev() {
            heap.decrease_key(h, i as i32).unwrap();
            assert!(heap.verify_structure());
        }
        assert_eq!(heap.find_min(), Ok((&1, &1)));
    }
}
