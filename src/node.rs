//! Internal node representation
//!
//! Nodes live in a `SlotMap` arena and refer to each other through
//! generational keys. Strong ownership belongs to the arena alone; `parent`,
//! `child`, `left`, and `right` are plain keys, so removing a node from the
//! arena is enough to invalidate every outstanding reference to it.

use slotmap::new_key_type;

new_key_type! {
    /// Arena key identifying one node
    pub(crate) struct NodeKey;
}

/// Internal node structure
///
/// Each node maintains:
/// - `key` and `value`: the data stored in the heap; only `key` is compared
/// - `parent`: key of the parent node (`None` for roots)
/// - `child`: key of one designated child, the entry point into the child
///   ring (`None` for leaves)
/// - `left`/`right`: neighbors in the circular sibling ring; a node alone in
///   its ring points at itself in both directions
/// - `degree`: number of direct children, always equal to the child ring length
/// - `marked`: true once the node has lost a child since it last became a
///   child itself; always false on roots
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) child: Option<NodeKey>,
    pub(crate) left: NodeKey,
    pub(crate) right: NodeKey,
    pub(crate) degree: usize,
    pub(crate) marked: bool,
}
