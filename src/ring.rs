//! Circular doubly-linked ring primitives
//!
//! Both the root ring and every node's child ring are circular doubly-linked
//! lists threaded through the `left`/`right` keys of nodes in the arena. This
//! module centralizes the pointer surgery so the heap proper never touches
//! `left`/`right` directly:
//!
//! - a single node points to itself in both directions
//! - there is no head or tail, any member is a valid entry point
//! - splicing a member in or out is O(1) regardless of ring length
//! - concatenating two rings is O(1)

use slotmap::SlotMap;

use crate::node::{Node, NodeKey};

pub(crate) type Nodes<K, V> = SlotMap<NodeKey, Node<K, V>>;

/// Makes `x` a ring of one: both neighbors point back at `x`.
pub(crate) fn make_singleton<K, V>(nodes: &mut Nodes<K, V>, x: NodeKey) {
    nodes[x].left = x;
    nodes[x].right = x;
}

/// Splices `x` into the ring containing `at`, immediately to the left of
/// `at`. `x` must not currently belong to any other ring.
pub(crate) fn splice_before<K, V>(nodes: &mut Nodes<K, V>, at: NodeKey, x: NodeKey) {
    let at_left = nodes[at].left;
    nodes[x].right = at;
    nodes[x].left = at_left;
    nodes[at_left].right = x;
    nodes[at].left = x;
}

/// Removes `x` from its ring, leaving `x` as a singleton.
///
/// Returns a surviving member of the ring (`x`'s former right neighbor), or
/// `None` if `x` was the only member.
pub(crate) fn splice_out<K, V>(nodes: &mut Nodes<K, V>, x: NodeKey) -> Option<NodeKey> {
    let left = nodes[x].left;
    let right = nodes[x].right;
    if right == x {
        return None;
    }
    nodes[left].right = right;
    nodes[right].left = left;
    nodes[x].left = x;
    nodes[x].right = x;
    Some(right)
}

/// Concatenates the ring containing `b` into the ring containing `a`.
/// The two rings must be distinct.
pub(crate) fn concat<K, V>(nodes: &mut Nodes<K, V>, a: NodeKey, b: NodeKey) {
    let a_left = nodes[a].left;
    let b_left = nodes[b].left;
    nodes[a_left].right = b;
    nodes[b].left = a_left;
    nodes[b_left].right = a;
    nodes[a].left = b_left;
}

/// Collects every member of the ring containing `start`, in `right` order
/// beginning at `start`.
///
/// Bails out early if the walk exceeds the arena population, so a corrupted
/// ring cannot loop forever; callers that care (the structural verifier)
/// detect the truncation by length.
pub(crate) fn members<K, V>(nodes: &Nodes<K, V>, start: NodeKey) -> Vec<NodeKey> {
    let mut out = Vec::new();
    let mut current = start;
    loop {
        out.push(current);
        current = nodes[current].right;
        if current == start || out.len() > nodes.len() {
            break;
        }
    }
    out
}
