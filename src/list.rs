//! Circular doubly linked boundary list over an arena of vertex nodes.

use alloc::vec::Vec;
use core::num::NonZeroU32;
use num_traits::float::Float;

use crate::predicates::{area, equals};

/// Handle of a node in the arena. Slot 0 holds a sentinel so handles are never zero.
pub(crate) type NodeIndex = NonZeroU32;

pub(crate) struct Node<T: Float> {
    /// vertex index in the source point sequence
    pub(crate) i: u32,
    /// z-order curve value
    pub(crate) z: u32,
    /// vertex coordinates x
    pub(crate) x: T,
    /// vertex coordinates y
    pub(crate) y: T,
    /// previous vertex node in the boundary ring
    pub(crate) prev_i: NodeIndex,
    /// next vertex node in the boundary ring
    pub(crate) next_i: NodeIndex,
    /// previous node in z-order
    pub(crate) prev_z_i: Option<NodeIndex>,
    /// next node in z-order
    pub(crate) next_z_i: Option<NodeIndex>,
    /// duplicated by a split; never removed as a degenerate point
    pub(crate) steiner: bool,
}

impl<T: Float> Node<T> {
    pub(crate) fn new(i: u32, x: T, y: T) -> Self {
        Self {
            i,
            z: 0,
            x,
            y,
            prev_i: NodeIndex::MIN,
            next_i: NodeIndex::MIN,
            prev_z_i: None,
            next_z_i: None,
            steiner: false,
        }
    }
}

/// Handle the next pushed node will get.
fn next_handle<T: Float>(nodes: &[Node<T>]) -> NodeIndex {
    NodeIndex::new(nodes.len() as u32).unwrap_or(NodeIndex::MIN)
}

/// Clears the arena and pushes the sentinel node.
pub(crate) fn reset<T: Float>(nodes: &mut Vec<Node<T>>, capacity: usize) {
    nodes.clear();
    nodes.reserve(capacity + 1);
    nodes.push(Node::new(0, T::infinity(), T::infinity()));
}

/// Creates a ring from `data` in engine winding. `forward` iterates the points in input
/// order, otherwise in reverse; source indices always refer to `data`.
///
/// A last point equal to the first one is dropped.
pub(crate) fn linked_list<T: Float>(
    nodes: &mut Vec<Node<T>>,
    data: &[[T; 2]],
    forward: bool,
) -> Option<NodeIndex> {
    let mut last_i: Option<NodeIndex> = None;
    let iter = data.iter().enumerate();

    if forward {
        for (i, &[x, y]) in iter {
            last_i = Some(insert_node(nodes, i as u32, x, y, last_i));
        }
    } else {
        for (i, &[x, y]) in iter.rev() {
            last_i = Some(insert_node(nodes, i as u32, x, y, last_i));
        }
    }

    if let Some(li) = last_i {
        let last = node!(nodes, li);
        if equals(last, node!(nodes, last.next_i)) {
            let (_, next_i) = remove_node(nodes, li);
            last_i = Some(next_i);
        }
    }

    last_i
}

/// create a node and optionally link it with previous one (in a circular doubly linked list)
pub(crate) fn insert_node<T: Float>(
    nodes: &mut Vec<Node<T>>,
    i: u32,
    x: T,
    y: T,
    last: Option<NodeIndex>,
) -> NodeIndex {
    let mut p = Node::new(i, x, y);
    let p_i = next_handle(nodes);
    match last {
        Some(last_i) => {
            let last = node_mut!(nodes, last_i);
            let last_next_i = last.next_i;
            (p.next_i, last.next_i) = (last_next_i, p_i);
            p.prev_i = last_i;
            node_mut!(nodes, last_next_i).prev_i = p_i;
        }
        None => {
            (p.prev_i, p.next_i) = (p_i, p_i);
        }
    }
    nodes.push(p);
    p_i
}

/// Unlinks a node from its ring and from the z-order list. Returns its former neighbors.
pub(crate) fn remove_node<T: Float>(
    nodes: &mut [Node<T>],
    p_i: NodeIndex,
) -> (NodeIndex, NodeIndex) {
    let p = node!(nodes, p_i);
    let p_next_i = p.next_i;
    let p_prev_i = p.prev_i;
    let p_next_z_i = p.next_z_i;
    let p_prev_z_i = p.prev_z_i;

    node_mut!(nodes, p_next_i).prev_i = p_prev_i;
    node_mut!(nodes, p_prev_i).next_i = p_next_i;

    if let Some(prev_z_i) = p_prev_z_i {
        node_mut!(nodes, prev_z_i).next_z_i = p_next_z_i;
    }
    if let Some(next_z_i) = p_next_z_i {
        node_mut!(nodes, next_z_i).prev_z_i = p_prev_z_i;
    }
    (p_prev_i, p_next_i)
}

/// Cuts the ring along the diagonal a-b into two rings sharing that diagonal.
///
/// `a` and `b` stay in the first ring; their Steiner duplicates form the cut of the
/// second ring, whose handle (the duplicate of `b`) is returned.
pub(crate) fn split_polygon<T: Float>(
    nodes: &mut Vec<Node<T>>,
    a_i: NodeIndex,
    b_i: NodeIndex,
) -> NodeIndex {
    let a2_i = next_handle(nodes);
    let b2_i = a2_i.saturating_add(1);

    let a = node_mut!(nodes, a_i);
    let mut a2 = Node::new(a.i, a.x, a.y);
    a2.steiner = true;
    let an_i = a.next_i;
    a.next_i = b_i;
    a2.prev_i = b2_i;
    a2.next_i = an_i;
    node_mut!(nodes, an_i).prev_i = a2_i;

    let b = node_mut!(nodes, b_i);
    let mut b2 = Node::new(b.i, b.x, b.y);
    b2.steiner = true;
    let bp_i = b.prev_i;
    b.prev_i = a_i;
    b2.next_i = a2_i;
    b2.prev_i = bp_i;
    node_mut!(nodes, bp_i).next_i = b2_i;

    nodes.extend([a2, b2]);

    b2_i
}

/// Removes duplicate and exactly collinear points, except Steiner points.
///
/// Walks from `start` until a pass reaches `end` (default `start`) with nothing left to
/// remove. Returns `None` when the ring collapses to a single node.
pub(crate) fn filter_points<T: Float>(
    nodes: &mut [Node<T>],
    start_i: NodeIndex,
    end_i: Option<NodeIndex>,
) -> Option<NodeIndex> {
    let mut end_i = end_i.unwrap_or(start_i);

    let mut p_i = start_i;
    loop {
        let p = node!(nodes, p_i);
        let p_next = node!(nodes, p.next_i);
        if !p.steiner && (equals(p, p_next) || area(node!(nodes, p.prev_i), p, p_next) == T::zero())
        {
            let (prev_i, next_i) = remove_node(nodes, p_i);
            (p_i, end_i) = (prev_i, prev_i);
            if p_i == next_i {
                return None;
            }
        } else {
            p_i = p.next_i;
            if p_i == end_i {
                return Some(end_i);
            }
        }
    }
}

/// Number of nodes in the ring containing `start_i`.
pub(crate) fn ring_len<T: Float>(nodes: &[Node<T>], start_i: NodeIndex) -> usize {
    let mut len = 0;
    let mut p_i = start_i;
    loop {
        len += 1;
        p_i = node!(nodes, p_i).next_i;
        if p_i == start_i {
            return len;
        }
    }
}

/// Twice the area of the ring; positive when it runs in engine winding.
pub(crate) fn ring_signed_area<T: Float>(nodes: &[Node<T>], start_i: NodeIndex) -> T {
    let mut sum = T::zero();
    let mut p_i = start_i;
    loop {
        let p = node!(nodes, p_i);
        let prev = node!(nodes, p.prev_i);
        sum = sum + (prev.x - p.x) * (p.y + prev.y);
        p_i = p.next_i;
        if p_i == start_i {
            return sum;
        }
    }
}
